// UI and formatting module

pub mod formatters;
pub mod monitor_tui;

// Re-export commonly used items for cleaner imports
pub use formatters::{
    format_battery_time, format_bytes, format_frequency, format_percent, format_speed,
    format_timestamp, format_uptime, or_na, truncate_value,
};
