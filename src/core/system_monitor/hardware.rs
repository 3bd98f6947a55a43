//! Static-ish hardware inventory: CPU, memory, partitions, interfaces.

use sysinfo::{Disk, Disks, Networks, System};

use super::metrics::{
    CpuHardware, DiskPartition, HardwareInfo, InterfaceInfo, IpNetworkInfo, MemoryHardware,
};

pub fn collect_hardware(system: &System, disks: &Disks, networks: &Networks) -> HardwareInfo {
    HardwareInfo {
        cpu: collect_cpu(system),
        memory: collect_memory(system),
        disks: disks.list().iter().map(partition_from).collect(),
        interfaces: collect_interfaces(networks),
    }
}

fn collect_cpu(system: &System) -> CpuHardware {
    let cpus = system.cpus();
    let first = cpus.first();
    let (min_frequency_mhz, max_frequency_mhz) = frequency_bounds_mhz();

    CpuHardware {
        brand: first
            .map(|c| c.brand().trim().to_string())
            .unwrap_or_default(),
        vendor: first.map(|c| c.vendor_id().to_string()).unwrap_or_default(),
        arch: std::env::consts::ARCH.to_string(),
        physical_cores: System::physical_core_count(),
        logical_cores: cpus.len(),
        frequencies_mhz: cpus.iter().map(|c| c.frequency()).collect(),
        min_frequency_mhz,
        max_frequency_mhz,
    }
}

/// cpufreq limits of the first core, in MHz
#[cfg(target_os = "linux")]
fn frequency_bounds_mhz() -> (Option<u64>, Option<u64>) {
    fn read_khz(name: &str) -> Option<u64> {
        let path = format!("/sys/devices/system/cpu/cpu0/cpufreq/{}", name);
        let khz: u64 = std::fs::read_to_string(path).ok()?.trim().parse().ok()?;
        Some(khz / 1000)
    }
    (read_khz("cpuinfo_min_freq"), read_khz("cpuinfo_max_freq"))
}

#[cfg(not(target_os = "linux"))]
fn frequency_bounds_mhz() -> (Option<u64>, Option<u64>) {
    (None, None)
}

fn collect_memory(system: &System) -> MemoryHardware {
    let total = system.total_memory();
    let used = system.used_memory();
    let swap_total = system.total_swap();
    let swap_used = system.used_swap();

    MemoryHardware {
        total,
        available: system.available_memory(),
        used,
        percent: percent_of(used, total),
        swap_total,
        swap_used,
        swap_free: system.free_swap(),
        swap_percent: percent_of(swap_used, swap_total),
    }
}

pub fn partition_from(disk: &Disk) -> DiskPartition {
    let total = disk.total_space();
    let free = disk.available_space();
    let used = total.saturating_sub(free);

    DiskPartition {
        device: disk.name().to_string_lossy().to_string(),
        mount_point: disk.mount_point().to_string_lossy().to_string(),
        fs_type: disk.file_system().to_string_lossy().to_string(),
        removable: disk.is_removable(),
        total,
        used,
        free,
        percent: percent_of(used, total),
    }
}

fn collect_interfaces(networks: &Networks) -> Vec<InterfaceInfo> {
    let mut interfaces: Vec<InterfaceInfo> = networks
        .iter()
        .map(|(name, data)| InterfaceInfo {
            name: name.clone(),
            mac: data.mac_address().to_string(),
            addresses: data
                .ip_networks()
                .iter()
                .map(|net| IpNetworkInfo {
                    addr: net.addr,
                    prefix: net.prefix,
                })
                .collect(),
        })
        .collect();
    interfaces.sort_by(|a, b| a.name.cmp(&b.name));
    interfaces
}

/// `part / whole` as a percentage; 0 when `whole` is 0
pub fn percent_of(part: u64, whole: u64) -> f32 {
    if whole == 0 {
        0.0
    } else {
        (part as f64 / whole as f64 * 100.0) as f32
    }
}
