//! CPU, memory, main disk and uptime.

use sysinfo::{
    CpuRefreshKind, Disks, MemoryRefreshKind, Networks, ProcessRefreshKind, ProcessesToUpdate,
    RefreshKind, System,
};

use super::{poll_loop, Cadence, SubsystemUpdate, TaskContext};
use crate::core::system_monitor::collect_system_info;

/// Polling frequency: the user-adjustable base interval
pub async fn system_task(ctx: TaskContext) {
    let refresh_kind = RefreshKind::nothing()
        .with_cpu(CpuRefreshKind::nothing().with_cpu_usage())
        .with_memory(MemoryRefreshKind::everything());
    let mut system = System::new_with_specifics(refresh_kind);
    let mut disks = Disks::new_with_refreshed_list();
    let mut networks = Networks::new_with_refreshed_list();

    // CPU usage needs two samples
    tokio::time::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).await;

    poll_loop("System", ctx, Cadence::Base, |_| true, move |_, _| {
        system.refresh_cpu_usage();
        system.refresh_memory();
        // Only the process table itself, for the count
        system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            true,
            ProcessRefreshKind::nothing(),
        );
        disks.refresh(true);
        networks.refresh(true);

        Some(SubsystemUpdate::System(collect_system_info(
            &system, &disks, &networks,
        )))
    })
    .await;
}
