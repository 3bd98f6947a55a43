//! System monitoring core functionality.
//!
//! Thin controllers over `sysinfo` and the OS that map readings into the
//! snapshot records in [`metrics`], plus the background pollers that keep a
//! merged [`Snapshot`] current for the dashboard.

pub mod cache;
mod collector;
pub mod connections;
pub mod details;
mod hardware;
mod history;
pub mod metrics;
pub mod processes;
pub mod runtime;
mod sensors;
pub mod tasks;
mod traffic;

pub use cache::TimedCache;
pub use collector::{collect_system_info, main_disk, MetricsCollector};
pub use connections::{
    list_connections, process_traffic, socket_table, ConnectionFilter, ProtocolFilter,
    MAX_CONNECTIONS,
};
pub use details::{process_details, system_details};
pub use hardware::{collect_hardware, percent_of};
pub use history::{MetricsHistory, DEFAULT_HISTORY_SIZE};
pub use metrics::*;
pub use processes::{
    collect_processes, list_refresh_kind, open_process_location, terminate_process,
    ProcessQuery, ProcessSort, MAX_PROCESSES,
};
pub use runtime::{MetricsRuntime, PollConfig, UiState};
pub use sensors::{collect_battery, collect_temperatures};
pub use traffic::{collect_traffic, TrafficMeter, TrafficTracker};
