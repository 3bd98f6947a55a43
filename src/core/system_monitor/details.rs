//! On-demand detail views: a single process, or the host itself.

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind, Users};

use super::metrics::{ProcessDetails, SystemDetails};
use super::processes::process_info_from;
use crate::error::{Result, SysdashError};
use crate::ui::formatters::truncate_value;

const ENVIRONMENT_KEYS: [&str; 6] = [
    "PATH",
    "HOME",
    "USER",
    "SHELL",
    "COMPUTERNAME",
    "PROCESSOR_IDENTIFIER",
];
const ENVIRONMENT_VALUE_MAX: usize = 100;

/// Load full details for `pid`.
///
/// All processes are refreshed so that children can be listed.
pub fn process_details(pid: u32) -> Result<ProcessDetails> {
    let mut system = System::new();
    system.refresh_memory();
    system.refresh_processes_specifics(
        ProcessesToUpdate::All,
        true,
        ProcessRefreshKind::nothing()
            .with_memory()
            .with_disk_usage()
            .with_exe(UpdateKind::OnlyIfNotSet)
            .with_cwd(UpdateKind::OnlyIfNotSet)
            .with_cmd(UpdateKind::OnlyIfNotSet)
            .with_tasks(),
    );
    details_from_system(&system, pid)
}

pub fn details_from_system(system: &System, pid: u32) -> Result<ProcessDetails> {
    let sys_pid = Pid::from_u32(pid);
    let process = system
        .process(sys_pid)
        .ok_or(SysdashError::NoSuchProcess(pid))?;

    let info = process_info_from(process, system.total_memory());

    let parent = process.parent().and_then(|ppid| {
        system
            .process(ppid)
            .map(|p| (ppid.as_u32(), p.name().to_string_lossy().to_string()))
    });

    let mut children: Vec<(u32, String)> = system
        .processes()
        .values()
        .filter(|p| p.thread_kind().is_none() && p.parent() == Some(sys_pid))
        .map(|p| (p.pid().as_u32(), p.name().to_string_lossy().to_string()))
        .collect();
    children.sort_by_key(|(child_pid, _)| *child_pid);

    Ok(ProcessDetails {
        info,
        exe: process.exe().map(|p| p.display().to_string()),
        cwd: process.cwd().map(|p| p.display().to_string()),
        cmdline: process
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy().to_string())
            .collect(),
        thread_count: process.tasks().map(|tasks| tasks.len()),
        parent,
        children,
    })
}

pub fn system_details() -> SystemDetails {
    let users = Users::new_with_refreshed_list();
    let mut user_names: Vec<String> = users.iter().map(|u| u.name().to_string()).collect();
    user_names.sort();
    user_names.dedup();

    SystemDetails {
        host_name: System::host_name().unwrap_or_else(|| "Unknown".to_string()),
        os_name: System::name().unwrap_or_else(|| "Unknown".to_string()),
        os_version: System::long_os_version().unwrap_or_else(|| "Unknown".to_string()),
        kernel_version: System::kernel_version().unwrap_or_else(|| "Unknown".to_string()),
        arch: std::env::consts::ARCH.to_string(),
        boot_time: System::boot_time(),
        users: user_names,
        environment: environment_snapshot(|key| std::env::var(key).ok()),
    }
}

fn environment_snapshot<F>(lookup: F) -> Vec<(String, String)>
where
    F: Fn(&str) -> Option<String>,
{
    ENVIRONMENT_KEYS
        .iter()
        .map(|key| {
            let value = lookup(key).unwrap_or_else(|| "N/A".to_string());
            (key.to_string(), truncate_value(&value, ENVIRONMENT_VALUE_MAX))
        })
        .collect()
}
