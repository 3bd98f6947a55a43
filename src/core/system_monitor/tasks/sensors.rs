//! Temperatures and battery.

use sysinfo::Components;
use tokio::time::Duration;

use super::{poll_loop, Cadence, SubsystemUpdate, TaskContext};
use crate::core::system_monitor::{collect_battery, collect_temperatures};

/// Polling frequency: 5 seconds (sensors update slowly)
pub async fn sensors_task(ctx: TaskContext) {
    let mut components = Components::new_with_refreshed_list();

    poll_loop(
        "Sensors",
        ctx,
        Cadence::Fixed(Duration::from_secs(5)),
        |_| true,
        move |_, _| {
            components.refresh(true);
            Some(SubsystemUpdate::Sensors {
                temperatures: collect_temperatures(&components),
                battery: collect_battery(),
            })
        },
    )
    .await;
}
