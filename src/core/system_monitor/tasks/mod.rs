//! Async pollers, one per subsystem.
//!
//! Every poller runs the same loop: tick on its own interval, skip while the
//! dashboard is paused or the data is not on screen, collect on demand when
//! a refresh is forced.

mod connections;
mod hardware;
mod network;
mod processes;
mod sensors;
mod system;

pub use connections::connections_task;
pub use hardware::hardware_task;
pub use network::network_task;
pub use processes::process_task;
pub use sensors::sensors_task;
pub use system::system_task;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval_at, Duration, Instant, Interval, MissedTickBehavior};

use super::metrics::*;
use super::runtime::UiState;

/// Partial updates sent from the pollers to the orchestrator.
#[derive(Debug, Clone)]
pub enum SubsystemUpdate {
    System(SystemInfo),
    Processes(Vec<ProcessInfo>),
    Traffic(TrafficInfo),
    Connections {
        connections: Vec<NetworkConnection>,
        process_traffic: Vec<ProcessTraffic>,
        error: Option<String>,
    },
    Sensors {
        temperatures: Vec<TemperatureReading>,
        battery: Option<BatteryInfo>,
    },
    Hardware(HardwareInfo),
    /// A poll failed; shown in the status bar
    Error(String),
}

/// Channels shared by every poller
pub struct TaskContext {
    pub update_tx: mpsc::Sender<SubsystemUpdate>,
    pub ui_rx: watch::Receiver<UiState>,
    pub shutdown: broadcast::Receiver<()>,
}

#[derive(Debug, Clone, Copy)]
pub enum Cadence {
    Fixed(Duration),
    /// Follows the user-adjustable refresh interval
    Base,
}

impl Cadence {
    fn period(self, ui: &UiState) -> Duration {
        match self {
            Cadence::Fixed(period) => period,
            Cadence::Base => Duration::from_millis(ui.interval_ms.max(1)),
        }
    }
}

/// Why a poller is collecting this time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Tick,
    /// The data just came on screen
    Shown,
    /// The user asked for a refresh
    Forced,
}

fn ticker(period: Duration, first_at: Instant) -> Interval {
    let mut ticker = interval_at(first_at, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

/// Drive `collect` until shutdown or until the orchestrator goes away.
pub async fn poll_loop<V, C>(
    name: &'static str,
    mut ctx: TaskContext,
    cadence: Cadence,
    visible: V,
    mut collect: C,
) where
    V: Fn(&UiState) -> bool + Send,
    C: FnMut(&UiState, Trigger) -> Option<SubsystemUpdate> + Send,
{
    log::debug!("{} task started", name);

    let mut ui = ctx.ui_rx.borrow_and_update().clone();
    let mut period = cadence.period(&ui);
    let mut ticks = ticker(period, Instant::now());
    let mut was_visible = visible(&ui);

    loop {
        let trigger = tokio::select! {
            _ = ticks.tick() => {
                if ui.paused || !visible(&ui) {
                    continue;
                }
                Trigger::Tick
            }
            changed = ctx.ui_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let previous = std::mem::replace(&mut ui, ctx.ui_rx.borrow_and_update().clone());

                let new_period = cadence.period(&ui);
                if new_period != period {
                    period = new_period;
                    ticks = ticker(period, Instant::now() + period);
                }

                let now_visible = visible(&ui);
                let shown = now_visible && !was_visible;
                was_visible = now_visible;

                if !now_visible {
                    continue;
                }
                if ui.refresh_generation != previous.refresh_generation {
                    Trigger::Forced
                } else if shown && !ui.paused {
                    Trigger::Shown
                } else {
                    continue;
                }
            }
            _ = ctx.shutdown.recv() => {
                break;
            }
        };

        if let Some(update) = collect(&ui, trigger) {
            if ctx.update_tx.send(update).await.is_err() {
                break;
            }
        }
    }

    log::debug!("{} task shutting down", name);
}
