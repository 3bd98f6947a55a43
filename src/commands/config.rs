use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let config_path = Config::get_config_path()?;

    match matches.subcommand() {
        Some(("show", _)) => show(&config_path),
        Some(("set", sub_matches)) => set(sub_matches, &config_path),
        Some(("reset", _)) => reset(&config_path),
        Some(("path", _)) => {
            println!("{}", config_path.display());
            Ok(())
        }
        _ => {
            println!("Use 'sysdash config --help' for more information.");
            Ok(())
        }
    }
}

fn show(config_path: &Path) -> Result<()> {
    let config = Config::load_from(config_path)?;
    let data = serde_json::to_value(&config).context("Failed to serialize config")?;

    println!("{}", "Current settings:".cyan().bold());
    for key in Config::keys() {
        let value = data.get(*key).map(|v| v.to_string()).unwrap_or_default();
        println!("  {:<24} {}", key.white(), value.trim_matches('"').green());
    }
    println!();
    println!("{} {}", "File:".dimmed(), config_path.display());
    Ok(())
}

fn set(matches: &clap::ArgMatches, config_path: &Path) -> Result<()> {
    let key = matches
        .get_one::<String>("key")
        .context("Key argument is required")?;
    let value = matches
        .get_one::<String>("value")
        .context("Value argument is required")?;

    let mut config = Config::load_from(config_path)?;
    if let Err(e) = config.set_value(key, value) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        eprintln!("Valid keys: {}", Config::keys().join(", ").yellow());
        return Err(e);
    }
    config.save_to(config_path)?;

    println!("{} {} = {}", "✓".green(), key.white().bold(), value.green());
    Ok(())
}

fn reset(config_path: &Path) -> Result<()> {
    Config::default().save_to(config_path)?;
    println!("{}", "✓ Settings restored to defaults".green());
    Ok(())
}
