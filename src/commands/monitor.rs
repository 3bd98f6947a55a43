//! Interactive dashboard command handler.

use anyhow::{Context, Result};
use clap::ArgMatches;

use crate::core::config::clamp_interval;
use crate::core::{Config, ThemeKind};
use crate::ui::monitor_tui::{run_monitor_app, MonitorAppConfig};

/// Execute the monitor command
pub fn execute(matches: &ArgMatches, config: &Config) -> Result<()> {
    let settings = resolve_settings(matches, config)?;

    log::info!(
        "Starting dashboard (interval {} ms, theme {})",
        settings.refresh_interval_ms,
        settings.theme
    );

    run_monitor_app(MonitorAppConfig::from(&settings)).context("Failed to run system monitor")
}

/// Saved settings with the command line overrides applied
pub fn resolve_settings(matches: &ArgMatches, config: &Config) -> Result<Config> {
    let mut settings = config.clone();

    if let Some(interval) = matches.get_one::<u64>("interval") {
        let clamped = clamp_interval(*interval);
        if clamped != *interval {
            log::warn!("Refresh interval {} ms clamped to {} ms", interval, clamped);
        }
        settings.refresh_interval_ms = clamped;
    }

    if let Some(theme) = matches.get_one::<String>("theme") {
        settings.theme = theme.parse::<ThemeKind>()?;
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::build_cli;

    fn monitor_matches(args: &[&str]) -> ArgMatches {
        let matches = build_cli().try_get_matches_from(args).unwrap();
        match matches.subcommand() {
            Some(("monitor", sub)) => sub.clone(),
            _ => matches,
        }
    }

    #[test]
    fn test_overrides_win_over_saved_settings() {
        let matches = monitor_matches(&["sysdash", "monitor", "-i", "750", "--theme", "fluent"]);
        let settings = resolve_settings(&matches, &Config::default()).unwrap();
        assert_eq!(settings.refresh_interval_ms, 750);
        assert_eq!(settings.theme, ThemeKind::Fluent);
    }

    #[test]
    fn test_interval_is_clamped() {
        let matches = monitor_matches(&["sysdash", "--interval", "10"]);
        let settings = resolve_settings(&matches, &Config::default()).unwrap();
        assert_eq!(settings.refresh_interval_ms, 250);
    }

    #[test]
    fn test_saved_settings_used_without_flags() {
        let saved = Config {
            refresh_interval_ms: 5000,
            theme: ThemeKind::Fluent,
            ..Default::default()
        };
        let matches = monitor_matches(&["sysdash"]);
        assert_eq!(resolve_settings(&matches, &saved).unwrap(), saved);
    }
}
