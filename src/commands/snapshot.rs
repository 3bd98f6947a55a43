use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;

use super::{print_field, print_json, print_section};
use crate::core::system_monitor::{system_details, MetricsCollector, SystemInfo};
use crate::ui::formatters::{format_bytes, format_percent, format_timestamp, format_uptime};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut collector = MetricsCollector::new();
    collector.warm_up();
    let info = collector.system_info();

    if matches.get_flag("json") {
        return print_json(&info);
    }

    print_overview(&info);
    Ok(())
}

fn print_overview(info: &SystemInfo) {
    let details = system_details();

    println!(
        "{} {}",
        "System snapshot:".cyan().bold(),
        details.host_name.white().bold()
    );

    print_section("CPU & Memory");
    print_field(
        "CPU",
        format!("{} of {} cores", usage(info.cpu_percent), info.cpu_count),
    );
    print_field(
        "Memory",
        format!(
            "{} ({} / {}, {} available)",
            usage(info.memory_percent),
            format_bytes(info.memory_used),
            format_bytes(info.memory_total),
            format_bytes(info.memory_available)
        ),
    );
    print_field(
        "Main disk",
        format!(
            "{} ({} / {}, {} free)",
            usage(info.disk_percent),
            format_bytes(info.disk_used),
            format_bytes(info.disk_total),
            format_bytes(info.disk_free)
        ),
    );

    print_section("System");
    print_field("OS", format!("{} {}", details.os_name, details.os_version));
    print_field("Boot time", format_timestamp(info.boot_time));
    print_field("Uptime", format_uptime(info.uptime_secs));
    print_field("Processes", info.process_count);
    print_field("Sent", format_bytes(info.bytes_sent));
    print_field("Received", format_bytes(info.bytes_recv));
}

fn usage(percent: f32) -> colored::ColoredString {
    let text = format_percent(percent);
    if percent >= 90.0 {
        text.red().bold()
    } else if percent >= 70.0 {
        text.yellow()
    } else {
        text.green()
    }
}
