use anyhow::{Context, Result};
use clap::ArgMatches;
use colored::Colorize;

use crate::core::system_monitor::terminate_process;
use crate::ui::monitor_tui::describe_error;

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let pid = *matches
        .get_one::<u32>("pid")
        .context("PID argument is required")?;
    let force = matches.get_flag("force");

    match terminate_process(pid, force) {
        Ok(message) => {
            println!("{} {}", "✓".green(), message);
            Ok(())
        }
        Err(e) => {
            let (title, text) = describe_error(&e);
            eprintln!("{} {}: {}", "✗".red(), title.red().bold(), text);
            Err(e).with_context(|| format!("Failed to terminate process {}", pid))
        }
    }
}
