//! Interface throughput.

use sysinfo::Networks;
use tokio::time::Duration;

use super::{poll_loop, Cadence, SubsystemUpdate, TaskContext};
use crate::core::system_monitor::{collect_traffic, TrafficTracker};

/// Polling frequency: 1 second (needed for accurate rate calculation)
pub async fn network_task(ctx: TaskContext) {
    let mut networks = Networks::new_with_refreshed_list();
    let mut tracker = TrafficTracker::new();

    poll_loop(
        "Network",
        ctx,
        Cadence::Fixed(Duration::from_secs(1)),
        |_| true,
        move |_, _| {
            networks.refresh(true);
            Some(SubsystemUpdate::Traffic(collect_traffic(
                &networks,
                &mut tracker,
            )))
        },
    )
    .await;
}
