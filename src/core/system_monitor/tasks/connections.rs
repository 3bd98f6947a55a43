//! Socket table and per-process connection counts.

use std::time::{Duration, Instant};

use sysinfo::{ProcessesToUpdate, System};

use super::{poll_loop, Cadence, SubsystemUpdate, TaskContext, Trigger};
use crate::core::system_monitor::cache::TimedCache;
use crate::core::system_monitor::metrics::NetworkConnection;
use crate::core::system_monitor::{
    collect_processes, list_refresh_kind, process_traffic, socket_table,
};

/// Polling frequency: 3 seconds while the network view is open.
///
/// The cache holds the full socket table; the dashboard's filter and the
/// cap are applied on every publish.
pub async fn connections_task(ctx: TaskContext, cache_ttl: Duration, limit: usize) {
    let mut system = System::new();
    let mut cache: TimedCache<Vec<NetworkConnection>> = TimedCache::new(cache_ttl);
    let mut last_error: Option<String> = None;

    poll_loop(
        "Connections",
        ctx,
        Cadence::Fixed(Duration::from_secs(3)),
        |ui| ui.collect_connections,
        move |ui, trigger| {
            let now = Instant::now();
            if trigger == Trigger::Forced {
                cache.invalidate();
            }

            let (table, error) = match cache.fresh(now) {
                Some(list) => (list.clone(), None),
                None => match socket_table() {
                    Ok(list) => {
                        cache.store(now, list.clone());
                        last_error = None;
                        (list, None)
                    }
                    Err(e) => {
                        let message = e.to_string();
                        if last_error.as_deref() != Some(message.as_str()) {
                            log::warn!("Failed to list connections: {}", message);
                            last_error = Some(message.clone());
                        }
                        // Keep showing the last good table
                        (cache.last().cloned().unwrap_or_default(), Some(message))
                    }
                },
            };

            system.refresh_processes_specifics(ProcessesToUpdate::All, true, list_refresh_kind());
            let processes = collect_processes(&system);

            Some(SubsystemUpdate::Connections {
                process_traffic: process_traffic(&table, &processes),
                connections: ui.connection_filter.apply(&table, limit),
                error,
            })
        },
    )
    .await;
}
