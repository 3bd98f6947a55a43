use std::process::{Command, Stdio};

use sysdash::core::system_monitor::{
    process_details, terminate_process, MetricsCollector, ProcessQuery, ProcessSort,
    MAX_CONNECTIONS, MAX_PROCESSES,
};
use sysdash::SysdashError;

// Far above any pid_max the kernel allows
const MISSING_PID: u32 = 4_000_000_000;

#[test]
fn test_system_info_is_consistent() {
    let mut collector = MetricsCollector::new();
    collector.warm_up();
    let info = collector.system_info();

    assert!(info.cpu_count > 0);
    assert!((0.0..=100.0).contains(&info.cpu_percent));
    assert!(info.memory_total > 0);
    assert!(info.memory_used <= info.memory_total);
    assert!(info.process_count > 0);
    assert!(info.disk_used <= info.disk_total || info.disk_total == 0);
}

#[test]
fn test_process_list_contains_current_process() {
    let mut collector = MetricsCollector::new();
    collector.warm_up();
    let processes = collector.processes();

    let me = std::process::id();
    assert!(processes.iter().any(|p| p.pid == me));
}

#[test]
fn test_query_caps_and_orders_live_processes() {
    let mut collector = MetricsCollector::new();
    collector.warm_up();
    let all = collector.processes();

    let top = ProcessQuery::default().apply(&all);
    assert!(top.len() <= MAX_PROCESSES);

    let oversized = ProcessQuery {
        limit: 5000,
        ..Default::default()
    }
    .apply(&all);
    assert!(oversized.len() <= MAX_PROCESSES);
    assert!(top
        .windows(2)
        .all(|pair| pair[0].cpu_percent >= pair[1].cpu_percent));

    let by_pid = ProcessQuery {
        sort: ProcessSort::Pid,
        limit: 3,
        ..Default::default()
    }
    .apply(&all);
    assert!(by_pid.len() <= 3);
    assert!(by_pid.windows(2).all(|pair| pair[0].pid <= pair[1].pid));
}

#[test]
fn test_full_snapshot_collects() {
    let mut collector = MetricsCollector::new();
    let snapshot = collector.collect().unwrap();

    assert!(snapshot.timestamp > 0);
    assert!(!snapshot.processes.is_empty());
    assert!(snapshot.processes.len() <= MAX_PROCESSES);
    assert!(snapshot.connections.len() <= MAX_CONNECTIONS);
    assert!(snapshot.hardware.is_some());
    assert!(snapshot.last_error.is_none());
}

#[test]
fn test_details_of_current_process() {
    let details = process_details(std::process::id()).unwrap();
    assert_eq!(details.info.pid, std::process::id());
    assert!(details.thread_count.map(|n| n > 0).unwrap_or(true));
}

#[test]
fn test_details_of_missing_process_fail() {
    assert!(matches!(
        process_details(MISSING_PID),
        Err(SysdashError::NoSuchProcess(_))
    ));
}

#[test]
fn test_terminate_missing_process_reports_not_found() {
    assert!(matches!(
        terminate_process(MISSING_PID, false),
        Err(SysdashError::NoSuchProcess(_))
    ));
}

#[cfg(unix)]
#[test]
fn test_terminate_child_process() {
    let mut child = Command::new("sleep")
        .arg("30")
        .stdout(Stdio::null())
        .spawn()
        .unwrap();

    let message = terminate_process(child.id(), false).unwrap();
    assert!(message.contains(&child.id().to_string()));

    let status = child.wait().unwrap();
    assert!(!status.success());
}
