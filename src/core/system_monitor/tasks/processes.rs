//! Process table, polled only while it is on screen.

use std::time::{Duration, Instant};

use sysinfo::{ProcessesToUpdate, System};

use super::{poll_loop, Cadence, SubsystemUpdate, TaskContext, Trigger};
use crate::core::system_monitor::cache::TimedCache;
use crate::core::system_monitor::metrics::ProcessInfo;
use crate::core::system_monitor::{collect_processes, list_refresh_kind};

/// Polling frequency: 2 seconds, and on demand
pub async fn process_task(ctx: TaskContext, cache_ttl: Duration) {
    let mut system = System::new();
    let mut cache: TimedCache<Vec<ProcessInfo>> = TimedCache::new(cache_ttl);

    poll_loop(
        "Process",
        ctx,
        Cadence::Fixed(Duration::from_secs(2)),
        |ui| ui.collect_processes,
        move |_, trigger| {
            let now = Instant::now();
            if trigger == Trigger::Forced {
                cache.invalidate();
            }
            if let Some(list) = cache.fresh(now) {
                return Some(SubsystemUpdate::Processes(list.clone()));
            }

            system.refresh_memory();
            system.refresh_processes_specifics(ProcessesToUpdate::All, true, list_refresh_kind());
            let list = collect_processes(&system);
            cache.store(now, list.clone());
            Some(SubsystemUpdate::Processes(list))
        },
    )
    .await;
}
