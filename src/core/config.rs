use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::system_monitor::{ProcessSort, MAX_CONNECTIONS, MAX_PROCESSES};

pub const MIN_REFRESH_INTERVAL_MS: u64 = 250;
pub const MAX_REFRESH_INTERVAL_MS: u64 = 60_000;

/// Colour palette used by the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeKind {
    #[default]
    Classic,
    Fluent,
}

impl ThemeKind {
    pub fn toggled(self) -> Self {
        match self {
            ThemeKind::Classic => ThemeKind::Fluent,
            ThemeKind::Fluent => ThemeKind::Classic,
        }
    }
}

impl fmt::Display for ThemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ThemeKind::Classic => write!(f, "classic"),
            ThemeKind::Fluent => write!(f, "fluent"),
        }
    }
}

impl FromStr for ThemeKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(ThemeKind::Classic),
            "fluent" => Ok(ThemeKind::Fluent),
            other => bail!("Unknown theme '{}' (expected classic or fluent)", other),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base polling interval for the system overview
    pub refresh_interval_ms: u64,
    /// Maximum number of processes shown, at most 200
    pub process_limit: usize,
    /// Maximum number of connections shown, at most 500
    pub connection_limit: usize,
    pub process_cache_secs: u64,
    pub connection_cache_secs: u64,
    pub theme: ThemeKind,
    pub default_sort: ProcessSort,
    /// Points kept for the overview charts
    pub history_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_interval_ms: 2000,
            process_limit: MAX_PROCESSES,
            connection_limit: MAX_CONNECTIONS,
            process_cache_secs: 2,
            connection_cache_secs: 3,
            theme: ThemeKind::Classic,
            default_sort: ProcessSort::Cpu,
            history_size: 60,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Config::default());
        }

        let data = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        let mut config = match serde_json::from_str::<Config>(&data) {
            Ok(config) => config,
            Err(e) => {
                // A broken file must not keep the monitor from starting
                log::warn!(
                    "Ignoring unreadable config file {:?}: {}",
                    config_path,
                    e
                );
                Config::default()
            }
        };
        config.normalize();

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::get_config_path()?;
        self.save_to(&config_path)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
        }

        let data = serde_json::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, data)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir =
            dirs::config_dir().with_context(|| "Could not determine config directory")?;

        Ok(config_dir.join("sysdash").join("config.json"))
    }

    /// Clamp values that would make the pollers misbehave
    pub fn normalize(&mut self) {
        self.refresh_interval_ms = clamp_interval(self.refresh_interval_ms);
        if self.process_limit == 0 {
            self.process_limit = MAX_PROCESSES;
        }
        self.process_limit = self.process_limit.min(MAX_PROCESSES);
        if self.connection_limit == 0 {
            self.connection_limit = MAX_CONNECTIONS;
        }
        self.connection_limit = self.connection_limit.min(MAX_CONNECTIONS);
        if self.history_size == 0 {
            self.history_size = Config::default().history_size;
        }
    }

    /// Set a single key from its textual form, as used by `config set`
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "refresh_interval_ms" => {
                let ms: u64 = parse_number(key, value)?;
                if !(MIN_REFRESH_INTERVAL_MS..=MAX_REFRESH_INTERVAL_MS).contains(&ms) {
                    bail!(
                        "refresh_interval_ms must be between {} and {}",
                        MIN_REFRESH_INTERVAL_MS,
                        MAX_REFRESH_INTERVAL_MS
                    );
                }
                self.refresh_interval_ms = ms;
            }
            "process_limit" => self.process_limit = parse_limit(key, value, MAX_PROCESSES)?,
            "connection_limit" => {
                self.connection_limit = parse_limit(key, value, MAX_CONNECTIONS)?
            }
            "process_cache_secs" => self.process_cache_secs = parse_number(key, value)?,
            "connection_cache_secs" => self.connection_cache_secs = parse_number(key, value)?,
            "history_size" => self.history_size = parse_positive(key, value)?,
            "theme" => self.theme = value.parse()?,
            "default_sort" => self.default_sort = value.parse()?,
            other => bail!("Unknown config key '{}'", other),
        }
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &[
            "refresh_interval_ms",
            "process_limit",
            "connection_limit",
            "process_cache_secs",
            "connection_cache_secs",
            "theme",
            "default_sort",
            "history_size",
        ]
    }
}

pub fn clamp_interval(ms: u64) -> u64 {
    ms.clamp(MIN_REFRESH_INTERVAL_MS, MAX_REFRESH_INTERVAL_MS)
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| anyhow::anyhow!("Invalid value '{}' for {}", value, key))
}

fn parse_limit(key: &str, value: &str, max: usize) -> Result<usize> {
    let n = parse_positive(key, value)?;
    if n > max {
        bail!("{} must be at most {}", key, max);
    }
    Ok(n)
}

fn parse_positive(key: &str, value: &str) -> Result<usize> {
    let n: usize = parse_number(key, value)?;
    if n == 0 {
        bail!("{} must be greater than zero", key);
    }
    Ok(n)
}
