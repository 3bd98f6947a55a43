// Command handlers module
pub mod config;
pub mod connections;
pub mod hardware;
pub mod kill;
pub mod monitor;
pub mod processes;
pub mod sensors;
pub mod snapshot;

use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;

// Re-exports for cleaner imports
pub use connections::execute as connections;
pub use hardware::execute as hardware;
pub use kill::execute as kill;
pub use monitor::execute as monitor;
pub use processes::execute as processes;
pub use sensors::execute as sensors;
pub use snapshot::execute as snapshot;

/// Pretty-print any report as JSON on stdout
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

pub(crate) fn print_section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
    println!("{}", "─".repeat(title.chars().count().max(40)).dimmed());
}

pub(crate) fn print_field(label: &str, value: impl std::fmt::Display) {
    println!("  {:<18} {}", label.dimmed(), value);
}
