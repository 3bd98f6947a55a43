use anyhow::Result;
use clap::ArgMatches;
use colored::Colorize;
use serde::Serialize;

use super::{print_field, print_json, print_section};
use crate::core::system_monitor::{collect_battery, BatteryInfo, MetricsCollector, TemperatureReading};
use crate::ui::formatters::{format_battery_time, format_percent, or_na};

#[derive(Debug, Serialize)]
struct SensorReport {
    temperatures: Vec<TemperatureReading>,
    battery: Option<BatteryInfo>,
}

pub fn execute(matches: &ArgMatches) -> Result<()> {
    let mut collector = MetricsCollector::new();
    let report = SensorReport {
        temperatures: collector.temperatures(),
        battery: collect_battery(),
    };

    if matches.get_flag("json") {
        return print_json(&report);
    }

    print_section("Temperatures");
    if report.temperatures.is_empty() {
        println!("  {}", "No temperature sensors available".yellow());
    }
    for reading in &report.temperatures {
        let current = format!("{:.1}°C", reading.current_celsius);
        let current = match reading.critical_celsius.or(reading.high_celsius) {
            Some(limit) if reading.current_celsius >= limit => current.red().bold(),
            _ => current.green(),
        };
        print_field(
            &reading.label,
            format!(
                "{}  (high {}, critical {})",
                current,
                or_na(reading.high_celsius.map(|t| format!("{:.0}°C", t))),
                or_na(reading.critical_celsius.map(|t| format!("{:.0}°C", t)))
            ),
        );
    }

    print_section("Battery");
    match &report.battery {
        Some(battery) => {
            print_field("Charge", format_percent(battery.percent));
            print_field("State", &battery.state);
            print_field("Plugged in", if battery.power_plugged { "yes" } else { "no" });
            print_field("Time left", format_battery_time(battery.seconds_left));
            print_field("Vendor", or_na(battery.vendor.clone()));
            print_field("Model", or_na(battery.model.clone()));
        }
        None => println!("  {}", "No battery detected".yellow()),
    }

    Ok(())
}
