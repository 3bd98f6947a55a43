use anyhow::Result;
use log::LevelFilter;

use sysdash::cli::build_cli;
use sysdash::commands;
use sysdash::core::Config;

fn main() -> Result<()> {
    let matches = build_cli().get_matches();
    let verbose = matches.get_flag("verbose");

    let is_dashboard = matches!(matches.subcommand(), None | Some(("monitor", _)));
    if is_dashboard {
        // The dashboard owns the terminal, so log lines go to a file instead
        let log_file = sysdash::log_file_path();
        let level = if verbose { LevelFilter::Debug } else { LevelFilter::Info };
        if let Err(e) = sysdash::init_logging(level, log_file.as_deref()) {
            eprintln!("Warning: {}", e);
        }
    } else {
        let level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };
        if let Err(e) = sysdash::init_logging(level, None) {
            eprintln!("Warning: {}", e);
        }
    }

    let config = Config::load()?;

    match matches.subcommand() {
        Some(("monitor", sub_matches)) => commands::monitor(sub_matches, &config),
        Some(("snapshot", sub_matches)) => commands::snapshot(sub_matches),
        Some(("processes", sub_matches)) => commands::processes(sub_matches, &config),
        Some(("connections", sub_matches)) => commands::connections(sub_matches, &config),
        Some(("hardware", sub_matches)) => commands::hardware(sub_matches),
        Some(("sensors", sub_matches)) => commands::sensors(sub_matches),
        Some(("kill", sub_matches)) => commands::kill(sub_matches),
        Some(("config", sub_matches)) => commands::config::execute(sub_matches),
        // clap rejects unknown subcommands before we get here
        _ => commands::monitor(&matches, &config),
    }
}
