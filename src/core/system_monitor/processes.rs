//! Process listing, ordering and control.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;

use sysinfo::{Pid, Process, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};

use super::metrics::ProcessInfo;
use crate::error::{Result, SysdashError};

/// Column the process table is ordered by
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessSort {
    #[default]
    Cpu,
    Memory,
    Name,
    Pid,
}

impl ProcessSort {
    pub fn next(self) -> Self {
        match self {
            ProcessSort::Cpu => ProcessSort::Memory,
            ProcessSort::Memory => ProcessSort::Name,
            ProcessSort::Name => ProcessSort::Pid,
            ProcessSort::Pid => ProcessSort::Cpu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProcessSort::Cpu => "CPU",
            ProcessSort::Memory => "Memory",
            ProcessSort::Name => "Name",
            ProcessSort::Pid => "PID",
        }
    }
}

impl fmt::Display for ProcessSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessSort::Cpu => write!(f, "cpu"),
            ProcessSort::Memory => write!(f, "memory"),
            ProcessSort::Name => write!(f, "name"),
            ProcessSort::Pid => write!(f, "pid"),
        }
    }
}

impl FromStr for ProcessSort {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cpu" => Ok(ProcessSort::Cpu),
            "memory" | "mem" => Ok(ProcessSort::Memory),
            "name" => Ok(ProcessSort::Name),
            "pid" => Ok(ProcessSort::Pid),
            other => anyhow::bail!("Unknown sort '{}' (expected cpu, memory, name or pid)", other),
        }
    }
}

/// Most processes ever returned or shown
pub const MAX_PROCESSES: usize = 200;

/// Sort, filter and cap applied to the raw process list before display
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessQuery {
    pub sort: ProcessSort,
    pub filter: String,
    pub limit: usize,
}

impl Default for ProcessQuery {
    fn default() -> Self {
        Self {
            sort: ProcessSort::Cpu,
            filter: String::new(),
            limit: MAX_PROCESSES,
        }
    }
}

impl ProcessQuery {
    /// Sort the whole list first so the cap keeps the top entries
    pub fn apply(&self, processes: &[ProcessInfo]) -> Vec<ProcessInfo> {
        let mut sorted: Vec<ProcessInfo> = processes
            .iter()
            .filter(|p| matches_filter(p, &self.filter))
            .cloned()
            .collect();
        sort_processes(&mut sorted, self.sort);
        sorted.truncate(self.limit.min(MAX_PROCESSES));
        sorted
    }
}

pub fn sort_processes(processes: &mut [ProcessInfo], sort: ProcessSort) {
    processes.sort_by(|a, b| {
        let primary = match sort {
            ProcessSort::Cpu => b
                .cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(Ordering::Equal),
            ProcessSort::Memory => b
                .memory_percent
                .partial_cmp(&a.memory_percent)
                .unwrap_or(Ordering::Equal),
            ProcessSort::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            ProcessSort::Pid => Ordering::Equal,
        };
        primary.then(a.pid.cmp(&b.pid))
    });
}

/// Case-insensitive name substring or exact PID match; empty matches all
pub fn matches_filter(process: &ProcessInfo, filter: &str) -> bool {
    let filter = filter.trim();
    if filter.is_empty() {
        return true;
    }
    if process.pid.to_string() == filter {
        return true;
    }
    process.name.to_lowercase().contains(&filter.to_lowercase())
}

pub fn process_info_from(process: &Process, total_memory: u64) -> ProcessInfo {
    let mem = process.memory();
    let disk = process.disk_usage();
    ProcessInfo {
        pid: process.pid().as_u32(),
        parent_pid: process.parent().map(|p| p.as_u32()),
        name: process.name().to_string_lossy().to_string(),
        cpu_percent: process.cpu_usage(),
        memory_percent: if total_memory > 0 {
            (mem as f32 / total_memory as f32) * 100.0
        } else {
            0.0
        },
        memory_bytes: mem,
        status: process.status().to_string(),
        start_time: process.start_time(),
        disk_read_bytes: disk.total_read_bytes,
        disk_written_bytes: disk.total_written_bytes,
    }
}

/// Map every process (threads excluded) of an already refreshed `System`
pub fn collect_processes(system: &System) -> Vec<ProcessInfo> {
    let total_memory = system.total_memory();
    system
        .processes()
        .values()
        .filter(|p| p.thread_kind().is_none())
        .map(|p| process_info_from(p, total_memory))
        .collect()
}

/// Refresh kind used by the process poller
pub fn list_refresh_kind() -> ProcessRefreshKind {
    ProcessRefreshKind::nothing()
        .with_cpu()
        .with_memory()
        .with_disk_usage()
}

fn lookup_process(pid: u32) -> Result<(System, Pid)> {
    let pid = Pid::from_u32(pid);
    let mut system = System::new();
    system.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[pid]),
        true,
        ProcessRefreshKind::nothing().with_exe(UpdateKind::OnlyIfNotSet),
    );
    if system.process(pid).is_none() {
        return Err(SysdashError::NoSuchProcess(pid.as_u32()));
    }
    Ok((system, pid))
}

/// Ask a process to exit (SIGTERM), or kill it outright when `force` is set.
///
/// Returns the message shown to the user on success.
pub fn terminate_process(pid: u32, force: bool) -> Result<String> {
    let (system, sys_pid) = lookup_process(pid)?;
    let name = system
        .process(sys_pid)
        .map(|p| p.name().to_string_lossy().to_string())
        .unwrap_or_default();

    send_signal(&system, sys_pid, force)?;

    log::info!(
        "{} process {} (PID: {})",
        if force { "Killed" } else { "Terminated" },
        name,
        pid
    );

    Ok(if force {
        format!("Force killed process {} (PID: {})", name, pid)
    } else {
        format!("Terminated process {} (PID: {})", name, pid)
    })
}

#[cfg(unix)]
fn send_signal(_system: &System, pid: Pid, force: bool) -> Result<()> {
    let signal = if force { libc::SIGKILL } else { libc::SIGTERM };
    let raw = pid.as_u32() as libc::pid_t;

    // SAFETY: kill(2) takes plain integers and touches no memory of ours
    let rc = unsafe { libc::kill(raw, signal) };
    if rc == 0 {
        return Ok(());
    }

    let err = std::io::Error::last_os_error();
    match err.raw_os_error() {
        Some(libc::EPERM) => Err(SysdashError::permission_denied(format!(
            "cannot terminate process {}",
            pid
        ))),
        Some(libc::ESRCH) => Err(SysdashError::NoSuchProcess(pid.as_u32())),
        _ => Err(SysdashError::process_signal(format!("PID {}: {}", pid, err))),
    }
}

#[cfg(not(unix))]
fn send_signal(system: &System, pid: Pid, force: bool) -> Result<()> {
    let process = system
        .process(pid)
        .ok_or(SysdashError::NoSuchProcess(pid.as_u32()))?;

    let delivered = if force {
        process.kill()
    } else {
        process
            .kill_with(sysinfo::Signal::Term)
            .unwrap_or_else(|| process.kill())
    };

    if delivered {
        Ok(())
    } else {
        // The platform API does not tell a refusal apart from other failures
        Err(SysdashError::permission_denied(format!(
            "cannot terminate process {}",
            pid
        )))
    }
}

/// Reveal the executable of `pid` in the platform file manager
pub fn open_process_location(pid: u32) -> Result<String> {
    let (system, sys_pid) = lookup_process(pid)?;
    let exe = system
        .process(sys_pid)
        .and_then(|p| p.exe())
        .map(Path::to_path_buf)
        .ok_or_else(|| {
            SysdashError::permission_denied(format!(
                "cannot read the executable path of process {}",
                pid
            ))
        })?;

    if !exe.exists() {
        return Err(SysdashError::other(format!(
            "Executable {} no longer exists",
            exe.display()
        )));
    }

    let mut command = if cfg!(target_os = "windows") {
        let mut c = Command::new("explorer");
        c.arg(format!("/select,{}", exe.display()));
        c
    } else if cfg!(target_os = "macos") {
        let mut c = Command::new("open");
        c.arg("-R").arg(&exe);
        c
    } else {
        let mut c = Command::new("xdg-open");
        c.arg(exe.parent().unwrap_or(&exe));
        c
    };

    command.spawn()?;
    Ok(format!("Opened location of {}", exe.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proc(pid: u32, name: &str, cpu: f32, mem: f32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: name.to_string(),
            cpu_percent: cpu,
            memory_percent: mem,
            status: "Runnable".to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<ProcessInfo> {
        vec![
            proc(30, "bash", 1.0, 0.5),
            proc(10, "Firefox", 25.0, 12.0),
            proc(20, "cargo", 25.0, 3.0),
            proc(40, "sshd", 0.0, 0.1),
        ]
    }

    fn pids(list: &[ProcessInfo]) -> Vec<u32> {
        list.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn test_sort_by_cpu_breaks_ties_by_pid() {
        let mut list = sample();
        sort_processes(&mut list, ProcessSort::Cpu);
        assert_eq!(pids(&list), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_sort_by_memory_descending() {
        let mut list = sample();
        sort_processes(&mut list, ProcessSort::Memory);
        assert_eq!(pids(&list), vec![10, 20, 30, 40]);
        assert!(list[0].memory_percent >= list[1].memory_percent);
    }

    #[test]
    fn test_sort_by_name_ignores_case() {
        let mut list = sample();
        sort_processes(&mut list, ProcessSort::Name);
        let names: Vec<_> = list.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["bash", "cargo", "Firefox", "sshd"]);
    }

    #[test]
    fn test_sort_by_pid() {
        let mut list = sample();
        sort_processes(&mut list, ProcessSort::Pid);
        assert_eq!(pids(&list), vec![10, 20, 30, 40]);
    }

    #[test]
    fn test_filter_by_name_and_pid() {
        let list = sample();
        assert!(matches_filter(&list[1], "fire"));
        assert!(matches_filter(&list[1], "FIRE"));
        assert!(matches_filter(&list[0], "30"));
        assert!(!matches_filter(&list[0], "3"));
        assert!(matches_filter(&list[0], "  "));
    }

    #[test]
    fn test_query_caps_after_sorting() {
        let query = ProcessQuery {
            sort: ProcessSort::Cpu,
            filter: String::new(),
            limit: 2,
        };
        assert_eq!(pids(&query.apply(&sample())), vec![10, 20]);
    }

    #[test]
    fn test_query_never_exceeds_default_cap() {
        let many: Vec<ProcessInfo> = (0..450).map(|i| proc(i, "worker", 0.0, 0.0)).collect();
        let shown = ProcessQuery::default().apply(&many);
        assert_eq!(shown.len(), 200);
    }

    #[test]
    fn test_query_limit_above_cap_is_ignored() {
        let many: Vec<ProcessInfo> = (0..450).map(|i| proc(i, "worker", 0.0, 0.0)).collect();
        let query = ProcessQuery {
            limit: 5000,
            ..Default::default()
        };
        assert_eq!(query.apply(&many).len(), MAX_PROCESSES);
    }

    #[test]
    fn test_sort_cycle_and_parse() {
        assert_eq!(ProcessSort::Pid.next(), ProcessSort::Cpu);
        assert_eq!("mem".parse::<ProcessSort>().unwrap(), ProcessSort::Memory);
        assert!("size".parse::<ProcessSort>().is_err());
    }

    #[test]
    fn test_terminate_missing_process() {
        // PIDs this large are never handed out
        let result = terminate_process(u32::MAX - 7, false);
        assert!(matches!(result, Err(SysdashError::NoSuchProcess(_))));
    }
}
