//! Terminal dashboard for system monitoring.
//!
//! Provides a real-time, tabbed view using ratatui.

mod app;
mod event_handler;
mod panels;
mod render;
mod theme;
mod widgets;

pub use app::{describe_error, run_monitor_app, AppAction, MonitorApp, MonitorAppConfig, Popup, Tab};
pub use event_handler::{map_key, InputMode, MonitorEvent};
pub use theme::Theme;
