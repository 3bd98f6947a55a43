#[cfg(target_os = "linux")]
use std::net::TcpListener;

use sysdash::core::system_monitor::socket_table;
#[cfg(target_os = "linux")]
use sysdash::core::system_monitor::{
    list_connections, process_traffic, ConnectionFilter, MetricsCollector, ProtocolFilter,
    MAX_CONNECTIONS,
};

#[cfg(target_os = "linux")]
#[test]
fn test_listening_socket_is_listed() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let connections = socket_table().unwrap();
    let filter = ConnectionFilter {
        protocol: ProtocolFilter::Tcp,
        listening_only: true,
        text: String::new(),
    };
    let listening = filter.apply(&connections, usize::MAX);

    let ours = listening
        .iter()
        .find(|c| c.local_addr.port() == port)
        .expect("listener missing from socket table");
    assert_eq!(ours.state, "LISTEN");
    assert!(ours.remote_addr.is_none());
    assert_eq!(ours.pid, Some(std::process::id()));
}

#[cfg(target_os = "linux")]
#[test]
fn test_connection_limit_is_respected() {
    let _listeners: Vec<TcpListener> = (0..3)
        .map(|_| TcpListener::bind("127.0.0.1:0").unwrap())
        .collect();

    let all = ConnectionFilter::default();
    assert!(list_connections(&all, 2).unwrap().len() <= 2);
    assert!(list_connections(&all, usize::MAX).unwrap().len() <= MAX_CONNECTIONS);
}

#[cfg(target_os = "linux")]
#[test]
fn test_port_filter_finds_listener() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();

    let filter = ConnectionFilter {
        text: port.to_string(),
        ..Default::default()
    };
    let found = list_connections(&filter, MAX_CONNECTIONS).unwrap();
    assert!(found
        .iter()
        .any(|c| c.local_addr.port() == port && c.is_listening()));
}

#[cfg(target_os = "linux")]
#[test]
fn test_process_traffic_groups_live_sockets() {
    let _listener = TcpListener::bind("127.0.0.1:0").unwrap();

    let mut collector = MetricsCollector::new();
    collector.warm_up();
    let processes = collector.processes();
    let connections = socket_table().unwrap();

    let traffic = process_traffic(&connections, &processes);
    let me = traffic
        .iter()
        .find(|t| t.pid == std::process::id())
        .expect("current process missing from traffic view");
    assert!(me.connections_count >= 1);
    assert!(traffic
        .windows(2)
        .all(|pair| pair[0].connections_count >= pair[1].connections_count));
}

#[cfg(not(target_os = "linux"))]
#[test]
fn test_connections_unsupported_elsewhere() {
    assert!(socket_table().is_err());
}
