//! Hardware inventory.

use sysinfo::{CpuRefreshKind, Disks, MemoryRefreshKind, Networks, RefreshKind, System};
use tokio::time::Duration;

use super::{poll_loop, Cadence, SubsystemUpdate, TaskContext};
use crate::core::system_monitor::collect_hardware;

/// Polling frequency: 10 seconds (changes rarely)
pub async fn hardware_task(ctx: TaskContext) {
    let refresh_kind = RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::nothing().with_frequency())
        .with_memory(MemoryRefreshKind::everything());
    let mut system = System::new_with_specifics(refresh_kind);
    let mut disks = Disks::new_with_refreshed_list();
    let mut networks = Networks::new_with_refreshed_list();

    poll_loop(
        "Hardware",
        ctx,
        Cadence::Fixed(Duration::from_secs(10)),
        |_| true,
        move |_, _| {
            system.refresh_specifics(refresh_kind);
            disks.refresh(true);
            networks.refresh(true);
            Some(SubsystemUpdate::Hardware(collect_hardware(
                &system, &disks, &networks,
            )))
        },
    )
    .await;
}
