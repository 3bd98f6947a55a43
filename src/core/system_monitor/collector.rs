use std::path::Path;

use sysinfo::{
    Components, CpuRefreshKind, Disk, Disks, MemoryRefreshKind, Networks, ProcessesToUpdate,
    RefreshKind, System,
};

use crate::error::Result;

use super::connections::{process_traffic, socket_table, ConnectionFilter, MAX_CONNECTIONS};
use super::hardware::{collect_hardware, percent_of};
use super::metrics::*;
use super::processes::{collect_processes, list_refresh_kind, ProcessQuery};
use super::sensors::{collect_battery, collect_temperatures};
use super::traffic::{collect_traffic, TrafficTracker};

/// Headline figures from already refreshed sources
pub fn collect_system_info(system: &System, disks: &Disks, networks: &Networks) -> SystemInfo {
    let memory_total = system.total_memory();
    let memory_used = system.used_memory();

    let (disk_total, disk_free) = main_disk(disks)
        .map(|d| (d.total_space(), d.available_space()))
        .unwrap_or((0, 0));
    let disk_used = disk_total.saturating_sub(disk_free);

    let (bytes_sent, bytes_recv) = networks.values().fold((0u64, 0u64), |(tx, rx), data| {
        (tx + data.total_transmitted(), rx + data.total_received())
    });

    SystemInfo {
        cpu_percent: system.global_cpu_usage(),
        cpu_count: system.cpus().len(),
        memory_percent: percent_of(memory_used, memory_total),
        memory_used,
        memory_total,
        memory_available: system.available_memory(),
        disk_percent: percent_of(disk_used, disk_total),
        disk_used,
        disk_total,
        disk_free,
        boot_time: System::boot_time(),
        uptime_secs: System::uptime(),
        process_count: system
            .processes()
            .values()
            .filter(|p| p.thread_kind().is_none())
            .count(),
        bytes_sent,
        bytes_recv,
    }
}

/// The system disk: `/` on Unix, `C:\` on Windows, else the largest one
pub fn main_disk(disks: &Disks) -> Option<&Disk> {
    let root = if cfg!(windows) { Path::new("C:\\") } else { Path::new("/") };
    disks
        .list()
        .iter()
        .find(|d| d.mount_point() == root)
        .or_else(|| disks.list().iter().max_by_key(|d| d.total_space()))
}

/// Synchronous collector for one-shot reads outside the dashboard.
pub struct MetricsCollector {
    system: System,
    disks: Disks,
    networks: Networks,
    components: Components,
    traffic: TrafficTracker,
}

impl MetricsCollector {
    pub fn new() -> Self {
        let refresh_kind = RefreshKind::nothing()
            .with_cpu(CpuRefreshKind::everything())
            .with_memory(MemoryRefreshKind::everything());

        Self {
            system: System::new_with_specifics(refresh_kind),
            disks: Disks::new_with_refreshed_list(),
            networks: Networks::new_with_refreshed_list(),
            components: Components::new_with_refreshed_list(),
            traffic: TrafficTracker::new(),
        }
    }

    /// Refresh CPU, memory and processes twice so usage figures have a baseline
    pub fn warm_up(&mut self) {
        self.refresh_processes();
        std::thread::sleep(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL);
        self.refresh_processes();
    }

    fn refresh_processes(&mut self) {
        self.system.refresh_cpu_all();
        self.system.refresh_memory();
        self.system
            .refresh_processes_specifics(ProcessesToUpdate::All, true, list_refresh_kind());
    }

    pub fn system_info(&mut self) -> SystemInfo {
        self.disks.refresh(true);
        self.networks.refresh(true);
        collect_system_info(&self.system, &self.disks, &self.networks)
    }

    pub fn processes(&self) -> Vec<ProcessInfo> {
        collect_processes(&self.system)
    }

    pub fn traffic(&mut self) -> TrafficInfo {
        self.networks.refresh(true);
        collect_traffic(&self.networks, &mut self.traffic)
    }

    pub fn hardware(&mut self) -> HardwareInfo {
        self.disks.refresh(true);
        collect_hardware(&self.system, &self.disks, &self.networks)
    }

    pub fn temperatures(&mut self) -> Vec<TemperatureReading> {
        self.components.refresh(true);
        collect_temperatures(&self.components)
    }

    /// Every subsystem in one snapshot
    pub fn collect(&mut self) -> Result<Snapshot> {
        self.warm_up();

        let system = self.system_info();
        let processes = self.processes();
        let (table, connections_error) = match socket_table() {
            Ok(table) => (table, None),
            Err(e) => {
                log::debug!("Connection listing failed: {}", e);
                (Vec::new(), Some(e.to_string()))
            }
        };

        Ok(Snapshot {
            timestamp: chrono::Utc::now().timestamp(),
            system,
            process_traffic: process_traffic(&table, &processes),
            processes: ProcessQuery::default().apply(&processes),
            connections: ConnectionFilter::default().apply(&table, MAX_CONNECTIONS),
            connections_error,
            traffic: self.traffic(),
            hardware: Some(self.hardware()),
            temperatures: self.temperatures(),
            battery: collect_battery(),
            last_error: None,
            history: Default::default(),
        })
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
