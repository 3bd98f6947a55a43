//! Network throughput from cumulative interface counters.

use std::collections::HashMap;
use std::time::Instant;

use sysinfo::Networks;

use super::metrics::{InterfaceTraffic, TrafficInfo};

/// Turns cumulative byte counters into per-second rates.
#[derive(Debug, Clone, Default)]
pub struct TrafficMeter {
    last: Option<(Instant, u64, u64)>,
}

impl TrafficMeter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record counters read at `now` and return `(upload, download)` in bytes/s.
    ///
    /// The first sample, a zero elapsed time, and a counter that went
    /// backwards all give a rate of 0.
    pub fn sample(&mut self, now: Instant, sent: u64, recv: u64) -> (f64, f64) {
        let rates = match self.last {
            Some((at, prev_sent, prev_recv)) => {
                let elapsed = now.saturating_duration_since(at).as_secs_f64();
                if elapsed <= 0.0 {
                    (0.0, 0.0)
                } else {
                    (
                        rate(prev_sent, sent, elapsed),
                        rate(prev_recv, recv, elapsed),
                    )
                }
            }
            None => (0.0, 0.0),
        };
        self.last = Some((now, sent, recv));
        rates
    }
}

fn rate(prev: u64, current: u64, elapsed_secs: f64) -> f64 {
    if current < prev {
        return 0.0;
    }
    (current - prev) as f64 / elapsed_secs
}

/// Meters for the host totals and for each interface by name.
#[derive(Debug, Default)]
pub struct TrafficTracker {
    total: TrafficMeter,
    interfaces: HashMap<String, TrafficMeter>,
}

impl TrafficTracker {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Build a `TrafficInfo` from already refreshed `networks`
pub fn collect_traffic(networks: &Networks, tracker: &mut TrafficTracker) -> TrafficInfo {
    let now = Instant::now();
    let mut info = TrafficInfo::default();

    let mut names: Vec<&String> = networks.keys().collect();
    names.sort();

    for name in names {
        let Some(data) = networks.get(name) else {
            continue;
        };
        let sent = data.total_transmitted();
        let recv = data.total_received();

        info.total_sent += sent;
        info.total_recv += recv;
        info.packets_sent += data.total_packets_transmitted();
        info.packets_recv += data.total_packets_received();

        let (upload_speed, download_speed) = tracker
            .interfaces
            .entry(name.clone())
            .or_default()
            .sample(now, sent, recv);

        info.interfaces.push(InterfaceTraffic {
            name: name.clone(),
            total_sent: sent,
            total_recv: recv,
            upload_speed,
            download_speed,
            errors: data.total_errors_on_received() + data.total_errors_on_transmitted(),
        });
    }

    // Interfaces that disappeared take their meters with them
    tracker
        .interfaces
        .retain(|name, _| networks.contains_key(name));

    let (upload, download) = tracker.total.sample(now, info.total_sent, info.total_recv);
    info.upload_speed = upload;
    info.download_speed = download;
    info
}
