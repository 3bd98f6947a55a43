use anyhow::Result;
use clap::ArgMatches;

use super::{print_field, print_json, print_section};
use crate::core::system_monitor::{HardwareInfo, MetricsCollector};
use crate::ui::formatters::{format_bytes, format_frequency, format_percent, or_na};

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut collector = MetricsCollector::new();
    let hardware = collector.hardware();

    if matches.get_flag("json") {
        return print_json(&hardware);
    }

    print_hardware(&hardware);
    Ok(())
}

fn print_hardware(hw: &HardwareInfo) {
    let cpu = &hw.cpu;
    print_section("Processor");
    print_field("Model", &cpu.brand);
    print_field("Vendor", &cpu.vendor);
    print_field("Architecture", &cpu.arch);
    print_field("Physical cores", or_na(cpu.physical_cores));
    print_field("Logical cores", cpu.logical_cores);
    print_field(
        "Frequency",
        or_na(cpu.average_frequency_mhz().map(|f| format_frequency(f as f64))),
    );
    print_field(
        "Min / max",
        format!(
            "{} / {}",
            or_na(cpu.min_frequency_mhz.map(|f| format_frequency(f as f64))),
            or_na(cpu.max_frequency_mhz.map(|f| format_frequency(f as f64)))
        ),
    );

    let mem = &hw.memory;
    print_section("Memory");
    print_field("Total", format_bytes(mem.total));
    print_field("Available", format_bytes(mem.available));
    print_field(
        "Used",
        format!("{} ({})", format_bytes(mem.used), format_percent(mem.percent)),
    );
    print_field(
        "Swap",
        format!(
            "{} / {} ({}), {} free",
            format_bytes(mem.swap_used),
            format_bytes(mem.swap_total),
            format_percent(mem.swap_percent),
            format_bytes(mem.swap_free)
        ),
    );

    print_section("Disks");
    if hw.disks.is_empty() {
        println!("  N/A");
    }
    for disk in &hw.disks {
        print_field(
            &disk.mount_point,
            format!(
                "{} {} {} / {} ({}){}",
                disk.device,
                disk.fs_type,
                format_bytes(disk.used),
                format_bytes(disk.total),
                format_percent(disk.percent),
                if disk.removable { " removable" } else { "" }
            ),
        );
    }

    print_section("Network interfaces");
    if hw.interfaces.is_empty() {
        println!("  N/A");
    }
    for iface in &hw.interfaces {
        let addresses: Vec<String> = iface.addresses.iter().map(|a| a.to_string()).collect();
        print_field(
            &iface.name,
            format!(
                "{}  {}",
                iface.mac,
                if addresses.is_empty() {
                    "N/A".to_string()
                } else {
                    addresses.join(", ")
                }
            ),
        );
    }
}
