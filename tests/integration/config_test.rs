use std::fs;

use sysdash::core::config::{Config, ThemeKind, MAX_REFRESH_INTERVAL_MS};
use sysdash::core::system_monitor::ProcessSort;
use tempfile::TempDir;

#[test]
fn test_config_load_missing_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let config = Config {
        refresh_interval_ms: 1500,
        theme: ThemeKind::Fluent,
        default_sort: ProcessSort::Memory,
        history_size: 120,
        ..Default::default()
    };
    config.save_to(&path).unwrap();

    assert!(path.exists());
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_config_empty_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "   \n").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_corrupt_file_returns_default() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), Config::default());
}

#[test]
fn test_config_out_of_range_values_are_normalized_on_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    fs::write(
        &path,
        r#"{"refresh_interval_ms": 900000, "process_limit": 0, "theme": "fluent"}"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.refresh_interval_ms, MAX_REFRESH_INTERVAL_MS);
    assert_eq!(config.process_limit, 200);
    assert_eq!(config.theme, ThemeKind::Fluent);
}

#[test]
fn test_set_value_then_save_persists() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");

    let mut config = Config::load_from(&path).unwrap();
    config.set_value("connection_limit", "42").unwrap();
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap().connection_limit, 42);
}

#[test]
fn test_every_key_is_settable() {
    let mut config = Config::default();
    for key in Config::keys() {
        let value = match *key {
            "theme" => "classic",
            "default_sort" => "pid",
            "refresh_interval_ms" => "1000",
            _ => "7",
        };
        config
            .set_value(key, value)
            .unwrap_or_else(|e| panic!("{} rejected: {}", key, e));
    }
    assert_eq!(config.default_sort, ProcessSort::Pid);
}
