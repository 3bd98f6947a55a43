use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use super::history::MetricsHistory;

/// Everything the dashboard shows, merged from the subsystem pollers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: i64, // Unix timestamp
    pub system: SystemInfo,
    pub processes: Vec<ProcessInfo>,
    pub connections: Vec<NetworkConnection>,
    pub connections_error: Option<String>,
    pub process_traffic: Vec<ProcessTraffic>,
    pub traffic: TrafficInfo,
    pub hardware: Option<HardwareInfo>,
    pub temperatures: Vec<TemperatureReading>,
    pub battery: Option<BatteryInfo>,
    pub last_error: Option<String>,
    #[serde(skip)]
    pub history: MetricsHistory,
}

/// Headline figures for the overview tab
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemInfo {
    pub cpu_percent: f32,
    pub cpu_count: usize,
    pub memory_percent: f32,
    pub memory_used: u64,
    pub memory_total: u64,
    pub memory_available: u64,
    pub disk_percent: f32,
    pub disk_used: u64,
    pub disk_total: u64,
    pub disk_free: u64,
    pub boot_time: u64, // Unix timestamp
    pub uptime_secs: u64,
    pub process_count: usize,
    pub bytes_sent: u64,
    pub bytes_recv: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: u32,
    pub parent_pid: Option<u32>,
    pub name: String,
    pub cpu_percent: f32,
    pub memory_percent: f32,
    pub memory_bytes: u64,
    pub status: String,
    pub start_time: u64, // Unix timestamp
    pub disk_read_bytes: u64,
    pub disk_written_bytes: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDetails {
    pub info: ProcessInfo,
    pub exe: Option<String>,
    pub cwd: Option<String>,
    pub cmdline: Vec<String>,
    pub thread_count: Option<usize>,
    pub parent: Option<(u32, String)>,
    pub children: Vec<(u32, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Protocol {
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "TCP"),
            Protocol::Udp => write!(f, "UDP"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConnection {
    pub protocol: Protocol,
    pub local_addr: SocketAddr,
    /// None for sockets with no peer
    pub remote_addr: Option<SocketAddr>,
    pub state: String,
    pub pid: Option<u32>,
    #[serde(skip)]
    pub inode: u64,
}

impl NetworkConnection {
    pub fn is_listening(&self) -> bool {
        self.state == "LISTEN"
    }

    pub fn remote_display(&self) -> String {
        self.remote_addr
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrafficInfo {
    pub total_sent: u64,
    pub total_recv: u64,
    pub packets_sent: u64,
    pub packets_recv: u64,
    pub upload_speed: f64,   // bytes/s
    pub download_speed: f64, // bytes/s
    pub interfaces: Vec<InterfaceTraffic>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceTraffic {
    pub name: String,
    pub total_sent: u64,
    pub total_recv: u64,
    pub upload_speed: f64,
    pub download_speed: f64,
    pub errors: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessTraffic {
    pub pid: u32,
    pub name: String,
    pub connections_count: usize,
    /// Process I/O counters, the closest per-process traffic figure available
    pub bytes_read: u64,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HardwareInfo {
    pub cpu: CpuHardware,
    pub memory: MemoryHardware,
    pub disks: Vec<DiskPartition>,
    pub interfaces: Vec<InterfaceInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CpuHardware {
    pub brand: String,
    pub vendor: String,
    pub arch: String,
    pub physical_cores: Option<usize>,
    pub logical_cores: usize,
    pub frequencies_mhz: Vec<u64>,
    pub min_frequency_mhz: Option<u64>,
    pub max_frequency_mhz: Option<u64>,
}

impl CpuHardware {
    pub fn average_frequency_mhz(&self) -> Option<u64> {
        if self.frequencies_mhz.is_empty() {
            return None;
        }
        Some(self.frequencies_mhz.iter().sum::<u64>() / self.frequencies_mhz.len() as u64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryHardware {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f32,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
    pub swap_percent: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiskPartition {
    pub device: String,
    pub mount_point: String,
    pub fs_type: String,
    pub removable: bool,
    pub total: u64,
    pub used: u64,
    pub free: u64,
    pub percent: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterfaceInfo {
    pub name: String,
    pub mac: String,
    pub addresses: Vec<IpNetworkInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpNetworkInfo {
    pub addr: IpAddr,
    pub prefix: u8,
}

impl fmt::Display for IpNetworkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.prefix)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemperatureReading {
    pub label: String,
    pub current_celsius: f32,
    pub high_celsius: Option<f32>,
    pub critical_celsius: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatteryInfo {
    pub percent: f32,
    pub power_plugged: bool,
    pub state: String,
    /// Only set while discharging with a usable estimate
    pub seconds_left: Option<u64>,
    pub vendor: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemDetails {
    pub host_name: String,
    pub os_name: String,
    pub os_version: String,
    pub kernel_version: String,
    pub arch: String,
    pub boot_time: u64,
    pub users: Vec<String>,
    pub environment: Vec<(String, String)>,
}
