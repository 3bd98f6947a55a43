use chrono::{DateTime, Local};

/// Format a byte count with 1024-based units ("1.5 KB", "3.0 GB")
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

    let mut value = bytes as f64;
    for unit in UNITS {
        if value < 1024.0 {
            return format!("{:.1} {}", value, unit);
        }
        value /= 1024.0;
    }
    format!("{:.1} PB", value)
}

/// Format bytes per second for network display
pub fn format_speed(bytes_per_sec: f64) -> String {
    format!("{}/s", format_bytes(bytes_per_sec.max(0.0) as u64))
}

/// Format a CPU frequency given in MHz
pub fn format_frequency(freq_mhz: f64) -> String {
    if freq_mhz >= 1000.0 {
        format!("{:.2} GHz", freq_mhz / 1000.0)
    } else {
        format!("{:.0} MHz", freq_mhz)
    }
}

/// Format elapsed seconds as "2d 3h 15m", "3h 15m" or "15m"
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86400;
    let hours = (secs % 86400) / 3600;
    let minutes = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Format a unix timestamp in local time (YYYY-MM-DD HH:MM:SS)
pub fn format_timestamp(unix_secs: u64) -> String {
    if unix_secs == 0 {
        return "N/A".to_string();
    }
    match DateTime::from_timestamp(unix_secs as i64, 0) {
        Some(utc) => utc
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "N/A".to_string(),
    }
}

pub fn format_battery_time(seconds_left: Option<u64>) -> String {
    match seconds_left {
        Some(secs) => format!("{}h {}m", secs / 3600, (secs % 3600) / 60),
        None => "Charging or unknown".to_string(),
    }
}

pub fn format_percent(value: f32) -> String {
    format!("{:.1}%", value)
}

/// Placeholder for values the OS would not give us
pub fn or_na<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Cut a value to `max` characters, marking the cut with "..."
pub fn truncate_value(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        value.to_string()
    } else {
        let kept: String = value.chars().take(max).collect();
        format!("{}...", kept)
    }
}
