//! Socket table listing.
//!
//! On Linux the kernel socket tables are read through `procfs` and socket
//! inodes are matched to their owning process through each process's fds.

use std::collections::HashMap;
use std::net::SocketAddr;

use super::metrics::{NetworkConnection, ProcessInfo, ProcessTraffic, Protocol};
use crate::error::{Result, SysdashError};

/// Protocol selector for the connections view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProtocolFilter {
    #[default]
    All,
    Tcp,
    Udp,
}

impl ProtocolFilter {
    pub fn next(self) -> Self {
        match self {
            ProtocolFilter::All => ProtocolFilter::Tcp,
            ProtocolFilter::Tcp => ProtocolFilter::Udp,
            ProtocolFilter::Udp => ProtocolFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProtocolFilter::All => "All",
            ProtocolFilter::Tcp => "TCP",
            ProtocolFilter::Udp => "UDP",
        }
    }

    fn accepts(self, protocol: Protocol) -> bool {
        match self {
            ProtocolFilter::All => true,
            ProtocolFilter::Tcp => protocol == Protocol::Tcp,
            ProtocolFilter::Udp => protocol == Protocol::Udp,
        }
    }
}

impl std::str::FromStr for ProtocolFilter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ProtocolFilter::All),
            "tcp" => Ok(ProtocolFilter::Tcp),
            "udp" => Ok(ProtocolFilter::Udp),
            other => anyhow::bail!("Unknown protocol '{}' (expected all, tcp or udp)", other),
        }
    }
}

/// Most sockets ever returned or shown
pub const MAX_CONNECTIONS: usize = 500;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionFilter {
    pub protocol: ProtocolFilter,
    pub listening_only: bool,
    /// A number selects a PID or port; other text is matched against
    /// addresses and state
    pub text: String,
}

impl ConnectionFilter {
    pub fn matches(&self, conn: &NetworkConnection) -> bool {
        if !self.protocol.accepts(conn.protocol) {
            return false;
        }
        if self.listening_only && !conn.is_listening() {
            return false;
        }
        let text = self.text.trim();
        if text.is_empty() {
            return true;
        }
        if let Ok(number) = text.parse::<u32>() {
            return conn.pid == Some(number)
                || u32::from(conn.local_addr.port()) == number
                || conn
                    .remote_addr
                    .map(|addr| u32::from(addr.port()) == number)
                    .unwrap_or(false);
        }
        let text = text.to_lowercase();
        conn.local_addr.to_string().contains(&text)
            || conn.remote_display().to_lowercase().contains(&text)
            || conn.state.to_lowercase().contains(&text)
    }

    /// Filter the whole table first so the cap never hides a match
    pub fn apply(&self, connections: &[NetworkConnection], limit: usize) -> Vec<NetworkConnection> {
        connections
            .iter()
            .filter(|c| self.matches(c))
            .take(limit.min(MAX_CONNECTIONS))
            .cloned()
            .collect()
    }
}

/// Every TCP and UDP socket on the host, with owners where visible
pub fn socket_table() -> Result<Vec<NetworkConnection>> {
    let mut connections = read_socket_tables()?;
    let owners = socket_owners();
    for conn in &mut connections {
        conn.pid = owners.get(&conn.inode).copied();
    }
    Ok(connections)
}

/// Sockets passing `filter`, at most `limit` of them and never more than
/// [`MAX_CONNECTIONS`]
pub fn list_connections(filter: &ConnectionFilter, limit: usize) -> Result<Vec<NetworkConnection>> {
    Ok(filter.apply(&socket_table()?, limit))
}

#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn connection_from(
    protocol: Protocol,
    local_addr: SocketAddr,
    remote: SocketAddr,
    state: &str,
    inode: u64,
) -> NetworkConnection {
    let remote_addr = if remote.port() == 0 && remote.ip().is_unspecified() {
        None
    } else {
        Some(remote)
    };

    NetworkConnection {
        protocol,
        local_addr,
        remote_addr,
        state: state.to_string(),
        pid: None,
        inode,
    }
}

#[cfg(target_os = "linux")]
#[allow(unreachable_patterns)]
pub fn tcp_state_name(state: &procfs::net::TcpState) -> &'static str {
    use procfs::net::TcpState;

    match state {
        TcpState::Established => "ESTABLISHED",
        TcpState::SynSent => "SYN_SENT",
        TcpState::SynRecv => "SYN_RECV",
        TcpState::FinWait1 => "FIN_WAIT1",
        TcpState::FinWait2 => "FIN_WAIT2",
        TcpState::TimeWait => "TIME_WAIT",
        TcpState::Close => "CLOSE",
        TcpState::CloseWait => "CLOSE_WAIT",
        TcpState::LastAck => "LAST_ACK",
        TcpState::Listen => "LISTEN",
        TcpState::Closing => "CLOSING",
        _ => "N/A",
    }
}

/// A missing table (IPv6 disabled) is skipped, anything else fails the read
#[cfg(target_os = "linux")]
fn table_error(table: &str, err: procfs::ProcError) -> Result<()> {
    match err {
        procfs::ProcError::NotFound(_) => {
            log::debug!("Socket table {} not present", table);
            Ok(())
        }
        procfs::ProcError::PermissionDenied(_) => Err(SysdashError::permission_denied(format!(
            "cannot read socket table /proc/net/{}",
            table
        ))),
        other => Err(SysdashError::metric_collection(format!(
            "/proc/net/{}: {}",
            table, other
        ))),
    }
}

#[cfg(target_os = "linux")]
fn read_socket_tables() -> Result<Vec<NetworkConnection>> {
    let mut connections = Vec::new();

    for (table, entries) in [("tcp", procfs::net::tcp()), ("tcp6", procfs::net::tcp6())] {
        match entries {
            Ok(entries) => connections.extend(entries.into_iter().map(|e| {
                connection_from(
                    Protocol::Tcp,
                    e.local_address,
                    e.remote_address,
                    tcp_state_name(&e.state),
                    e.inode,
                )
            })),
            Err(e) => table_error(table, e)?,
        }
    }

    // UDP has no connection state worth showing
    for (table, entries) in [("udp", procfs::net::udp()), ("udp6", procfs::net::udp6())] {
        match entries {
            Ok(entries) => connections.extend(entries.into_iter().map(|e| {
                connection_from(Protocol::Udp, e.local_address, e.remote_address, "N/A", e.inode)
            })),
            Err(e) => table_error(table, e)?,
        }
    }

    Ok(connections)
}

#[cfg(not(target_os = "linux"))]
fn read_socket_tables() -> Result<Vec<NetworkConnection>> {
    Err(SysdashError::unsupported(
        "connection listing is only available on Linux",
    ))
}

/// Map socket inode -> owning PID. Processes whose fds we may not read
/// are skipped silently.
#[cfg(target_os = "linux")]
fn socket_owners() -> HashMap<u64, u32> {
    use procfs::process::{all_processes, FDTarget};

    let mut owners = HashMap::new();
    let processes = match all_processes() {
        Ok(processes) => processes,
        Err(e) => {
            log::debug!("Cannot enumerate processes for socket owners: {}", e);
            return owners;
        }
    };

    for process in processes.flatten() {
        let Ok(fds) = process.fd() else {
            continue;
        };
        let pid = process.pid() as u32;
        for fd in fds.flatten() {
            if let FDTarget::Socket(inode) = fd.target {
                owners.entry(inode).or_insert(pid);
            }
        }
    }
    owners
}

#[cfg(not(target_os = "linux"))]
fn socket_owners() -> HashMap<u64, u32> {
    HashMap::new()
}

/// Group connections by owning process, most connections first
pub fn process_traffic(
    connections: &[NetworkConnection],
    processes: &[ProcessInfo],
) -> Vec<ProcessTraffic> {
    let by_pid: HashMap<u32, &ProcessInfo> = processes.iter().map(|p| (p.pid, p)).collect();

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for pid in connections.iter().filter_map(|c| c.pid) {
        *counts.entry(pid).or_default() += 1;
    }

    let mut result: Vec<ProcessTraffic> = counts
        .into_iter()
        .filter_map(|(pid, connections_count)| {
            // Processes that exited since the socket scan are dropped
            let process = by_pid.get(&pid)?;
            Some(ProcessTraffic {
                pid,
                name: process.name.clone(),
                connections_count,
                bytes_read: process.disk_read_bytes,
                bytes_written: process.disk_written_bytes,
            })
        })
        .collect();

    result.sort_by(|a, b| {
        b.connections_count
            .cmp(&a.connections_count)
            .then(a.pid.cmp(&b.pid))
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn(protocol: Protocol, state: &str, pid: Option<u32>) -> NetworkConnection {
        NetworkConnection {
            protocol,
            local_addr: "127.0.0.1:8080".parse().unwrap(),
            remote_addr: None,
            state: state.to_string(),
            pid,
            inode: 0,
        }
    }

    #[test]
    fn test_unbound_remote_becomes_none() {
        let listening = connection_from(
            Protocol::Tcp,
            "127.0.0.1:631".parse().unwrap(),
            "0.0.0.0:0".parse().unwrap(),
            "LISTEN",
            23003,
        );
        assert!(listening.remote_addr.is_none());
        assert_eq!(listening.remote_display(), "N/A");
        assert_eq!(listening.inode, 23003);
        assert!(listening.pid.is_none());

        let established = connection_from(
            Protocol::Tcp,
            "10.0.2.15:41394".parse().unwrap(),
            "142.90.29.46:443".parse().unwrap(),
            "ESTABLISHED",
            91234,
        );
        assert_eq!(
            established.remote_addr,
            Some("142.90.29.46:443".parse().unwrap())
        );

        let udp6 = connection_from(
            Protocol::Udp,
            "[::1]:53".parse().unwrap(),
            "[::]:0".parse().unwrap(),
            "N/A",
            4455,
        );
        assert!(udp6.remote_addr.is_none());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_tcp_state_names() {
        use procfs::net::TcpState;

        assert_eq!(tcp_state_name(&TcpState::Established), "ESTABLISHED");
        assert_eq!(tcp_state_name(&TcpState::TimeWait), "TIME_WAIT");
        assert_eq!(tcp_state_name(&TcpState::Listen), "LISTEN");
        assert_eq!(tcp_state_name(&TcpState::Closing), "CLOSING");
    }

    #[test]
    fn test_filter_protocol_and_listening() {
        let conns = vec![
            conn(Protocol::Tcp, "LISTEN", Some(1)),
            conn(Protocol::Tcp, "ESTABLISHED", Some(2)),
            conn(Protocol::Udp, "N/A", None),
        ];

        let tcp = ConnectionFilter {
            protocol: ProtocolFilter::Tcp,
            ..Default::default()
        };
        assert_eq!(tcp.apply(&conns, 500).len(), 2);

        let listening = ConnectionFilter {
            listening_only: true,
            ..Default::default()
        };
        assert_eq!(listening.apply(&conns, 500).len(), 1);
    }

    #[test]
    fn test_numeric_filter_selects_pid_or_port() {
        let conns = vec![
            conn(Protocol::Tcp, "LISTEN", Some(1)),
            conn(Protocol::Tcp, "ESTABLISHED", Some(2)),
            conn(Protocol::Udp, "N/A", None),
        ];

        // "2" appears inside 127.0.0.1 but only the PID counts
        let by_pid = ConnectionFilter {
            text: "2".to_string(),
            ..Default::default()
        };
        let found = by_pid.apply(&conns, 500);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].state, "ESTABLISHED");

        let by_port = ConnectionFilter {
            text: "8080".to_string(),
            ..Default::default()
        };
        assert_eq!(by_port.apply(&conns, 500).len(), 3);
    }

    #[test]
    fn test_text_filter_matches_state_and_address() {
        let conns = vec![
            conn(Protocol::Tcp, "LISTEN", Some(1)),
            conn(Protocol::Tcp, "ESTABLISHED", Some(2)),
        ];

        let by_state = ConnectionFilter {
            text: "listen".to_string(),
            ..Default::default()
        };
        assert_eq!(by_state.apply(&conns, 500)[0].pid, Some(1));

        let by_addr = ConnectionFilter {
            text: "127.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(by_addr.apply(&conns, 500).len(), 2);
    }

    #[test]
    fn test_filter_caps_at_limit() {
        let conns: Vec<_> = (0..800)
            .map(|_| conn(Protocol::Tcp, "ESTABLISHED", None))
            .collect();
        assert_eq!(ConnectionFilter::default().apply(&conns, 20).len(), 20);
        assert_eq!(
            ConnectionFilter::default().apply(&conns, 100_000).len(),
            MAX_CONNECTIONS
        );
    }

    #[test]
    fn test_listening_sockets_after_cap_are_still_found() {
        let mut conns: Vec<_> = (0..700)
            .map(|_| conn(Protocol::Tcp, "ESTABLISHED", None))
            .collect();
        conns.extend((0..5).map(|pid| conn(Protocol::Tcp, "LISTEN", Some(pid))));

        let listening = ConnectionFilter {
            listening_only: true,
            ..Default::default()
        };
        let found = listening.apply(&conns, MAX_CONNECTIONS);
        assert_eq!(found.len(), 5);
        assert!(found.iter().all(|c| c.is_listening()));
    }

    #[test]
    fn test_process_traffic_groups_and_sorts() {
        let conns = vec![
            conn(Protocol::Tcp, "ESTABLISHED", Some(7)),
            conn(Protocol::Tcp, "ESTABLISHED", Some(9)),
            conn(Protocol::Tcp, "ESTABLISHED", Some(9)),
            conn(Protocol::Udp, "N/A", None),
            conn(Protocol::Tcp, "LISTEN", Some(404)),
        ];
        let procs = vec![
            ProcessInfo {
                pid: 7,
                name: "curl".to_string(),
                disk_read_bytes: 10,
                ..Default::default()
            },
            ProcessInfo {
                pid: 9,
                name: "firefox".to_string(),
                disk_written_bytes: 20,
                ..Default::default()
            },
        ];

        let traffic = process_traffic(&conns, &procs);
        assert_eq!(traffic.len(), 2);
        assert_eq!(traffic[0].pid, 9);
        assert_eq!(traffic[0].connections_count, 2);
        assert_eq!(traffic[0].bytes_written, 20);
        assert_eq!(traffic[1].name, "curl");
    }
}
