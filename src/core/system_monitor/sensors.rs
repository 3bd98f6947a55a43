//! Temperature sensors and battery status.

use sysinfo::Components;

use super::metrics::{BatteryInfo, TemperatureReading};

/// Readings for every sensor that currently reports a temperature
pub fn collect_temperatures(components: &Components) -> Vec<TemperatureReading> {
    components
        .iter()
        .filter_map(|comp| {
            let current = comp.temperature().filter(|t| t.is_finite())?;
            Some(TemperatureReading {
                label: comp.label().to_string(),
                current_celsius: current,
                high_celsius: comp.max().filter(|t| t.is_finite()),
                critical_celsius: comp.critical().filter(|t| t.is_finite()),
            })
        })
        .collect()
}

/// First battery reported by the platform, if there is one
pub fn collect_battery() -> Option<BatteryInfo> {
    use battery::units::ratio::percent;
    use battery::units::time::second;
    use battery::{Manager, State};

    let manager = match Manager::new() {
        Ok(manager) => manager,
        Err(e) => {
            log::debug!("Battery backend unavailable: {}", e);
            return None;
        }
    };

    let battery = match manager.batteries().ok()?.next() {
        Some(Ok(battery)) => battery,
        Some(Err(e)) => {
            log::debug!("Failed to read battery: {}", e);
            return None;
        }
        None => {
            log::debug!("No battery present");
            return None;
        }
    };

    let state = battery.state();
    let seconds_left = match state {
        State::Discharging => battery.time_to_empty().map(|t| t.get::<second>() as u64),
        _ => None,
    };

    Some(BatteryInfo {
        percent: battery.state_of_charge().get::<percent>(),
        power_plugged: matches!(state, State::Charging | State::Full),
        state: state_label(state).to_string(),
        seconds_left,
        vendor: battery.vendor().map(str::to_string),
        model: battery.model().map(str::to_string),
    })
}

fn state_label(state: battery::State) -> &'static str {
    match state {
        battery::State::Charging => "Charging",
        battery::State::Discharging => "Discharging",
        battery::State::Full => "Full",
        battery::State::Empty => "Empty",
        _ => "Unknown",
    }
}
