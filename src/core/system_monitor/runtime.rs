//! Tokio runtime and orchestrator for the background pollers.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};

use super::connections::{ConnectionFilter, MAX_CONNECTIONS};
use super::history::MetricsHistory;
use super::metrics::Snapshot;
use super::tasks::{
    connections_task, hardware_task, network_task, process_task, sensors_task, system_task,
    SubsystemUpdate, TaskContext,
};
use crate::core::config::{clamp_interval, Config};

/// Settings the pollers are started with
#[derive(Debug, Clone)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub process_cache: Duration,
    pub connection_cache: Duration,
    pub connection_limit: usize,
    pub history_size: usize,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PollConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval_ms: clamp_interval(config.refresh_interval_ms),
            process_cache: Duration::from_secs(config.process_cache_secs),
            connection_cache: Duration::from_secs(config.connection_cache_secs),
            connection_limit: config.connection_limit.min(MAX_CONNECTIONS),
            history_size: config.history_size,
        }
    }
}

/// What the dashboard currently needs, published to every poller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiState {
    pub collect_processes: bool,
    pub collect_connections: bool,
    pub paused: bool,
    pub interval_ms: u64,
    /// Bumped by every forced refresh
    pub refresh_generation: u64,
    /// Applied to the full socket table before the cap
    pub connection_filter: ConnectionFilter,
}

/// Handle on the background collection.
pub struct MetricsRuntime {
    pub snapshot_rx: watch::Receiver<Arc<Snapshot>>,
    ui_tx: watch::Sender<UiState>,
    shutdown_tx: broadcast::Sender<()>,
    runtime: tokio::runtime::Runtime,
}

impl MetricsRuntime {
    /// Create the runtime with all pollers spawned.
    pub fn new(config: &PollConfig) -> anyhow::Result<Self> {
        log::info!("Starting metrics runtime ({} ms interval)", config.interval_ms);

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_time()
            .thread_name("metrics-worker")
            .build()?;

        let (snapshot_tx, snapshot_rx) = watch::channel(Arc::new(Snapshot {
            history: MetricsHistory::with_capacity(config.history_size),
            ..Default::default()
        }));
        let (ui_tx, ui_rx) = watch::channel(UiState {
            collect_processes: false,
            collect_connections: false,
            paused: false,
            interval_ms: clamp_interval(config.interval_ms),
            refresh_generation: 0,
            connection_filter: ConnectionFilter::default(),
        });
        let (shutdown_tx, _) = broadcast::channel::<()>(1);

        let spawn_config = config.clone();
        let shutdown_for_spawn = shutdown_tx.clone();
        runtime.spawn(async move {
            spawn_all_tasks(
                &spawn_config,
                snapshot_tx,
                ui_rx,
                shutdown_for_spawn.subscribe(),
            )
        });

        Ok(Self {
            snapshot_rx,
            ui_tx,
            shutdown_tx,
            runtime,
        })
    }

    /// The most recent merged snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot_rx.borrow().clone()
    }

    pub fn ui_state(&self) -> UiState {
        self.ui_tx.borrow().clone()
    }

    /// Change the base interval; returns the clamped value in effect
    pub fn set_interval(&self, ms: u64) -> u64 {
        let ms = clamp_interval(ms);
        self.ui_tx.send_if_modified(|state| {
            let changed = state.interval_ms != ms;
            state.interval_ms = ms;
            changed
        });
        ms
    }

    pub fn set_paused(&self, paused: bool) {
        self.ui_tx.send_if_modified(|state| {
            let changed = state.paused != paused;
            state.paused = paused;
            changed
        });
    }

    /// Tell the pollers which expensive views are on screen
    pub fn set_views(&self, processes: bool, connections: bool) {
        self.ui_tx.send_if_modified(|state| {
            let changed =
                state.collect_processes != processes || state.collect_connections != connections;
            state.collect_processes = processes;
            state.collect_connections = connections;
            changed
        });
    }

    /// Change the connection filter and poll the socket table again
    pub fn set_connection_filter(&self, filter: &ConnectionFilter) {
        self.ui_tx.send_if_modified(|state| {
            if state.connection_filter == *filter {
                return false;
            }
            state.connection_filter = filter.clone();
            state.refresh_generation = state.refresh_generation.wrapping_add(1);
            true
        });
    }

    /// Bypass the process and connection caches on the next poll
    pub fn request_refresh(&self) {
        self.ui_tx.send_modify(|state| {
            state.refresh_generation = state.refresh_generation.wrapping_add(1);
        });
    }

    /// Stop every poller and tear the runtime down.
    pub fn shutdown(self) {
        log::info!("Shutting down metrics runtime");
        let _ = self.shutdown_tx.send(());
        self.runtime.shutdown_timeout(Duration::from_secs(1));
    }
}

fn spawn_all_tasks(
    config: &PollConfig,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    ui_rx: watch::Receiver<UiState>,
    shutdown: broadcast::Receiver<()>,
) {
    let (update_tx, update_rx) = mpsc::channel::<SubsystemUpdate>(32);

    let context = || TaskContext {
        update_tx: update_tx.clone(),
        ui_rx: ui_rx.clone(),
        shutdown: shutdown.resubscribe(),
    };

    tokio::spawn(orchestrator_task(
        update_rx,
        snapshot_tx,
        config.history_size,
        shutdown.resubscribe(),
    ));

    tokio::spawn(system_task(context()));
    tokio::spawn(process_task(context(), config.process_cache));
    tokio::spawn(network_task(context()));
    tokio::spawn(connections_task(
        context(),
        config.connection_cache,
        config.connection_limit,
    ));
    tokio::spawn(sensors_task(context()));
    tokio::spawn(hardware_task(context()));

    log::debug!("All pollers spawned");
}

/// Merge one partial update into the current snapshot
pub fn apply_update(snapshot: &mut Snapshot, update: SubsystemUpdate) {
    match update {
        SubsystemUpdate::System(system) => {
            snapshot
                .history
                .push_usage(system.cpu_percent, system.memory_percent);
            snapshot.system = system;
        }
        SubsystemUpdate::Processes(processes) => {
            snapshot.processes = processes;
        }
        SubsystemUpdate::Traffic(traffic) => {
            snapshot
                .history
                .push_traffic(traffic.upload_speed, traffic.download_speed);
            snapshot.traffic = traffic;
        }
        SubsystemUpdate::Connections {
            connections,
            process_traffic,
            error,
        } => {
            snapshot.connections = connections;
            snapshot.process_traffic = process_traffic;
            snapshot.connections_error = error;
        }
        SubsystemUpdate::Sensors {
            temperatures,
            battery,
        } => {
            snapshot.temperatures = temperatures;
            snapshot.battery = battery;
        }
        SubsystemUpdate::Hardware(hardware) => {
            snapshot.hardware = Some(hardware);
        }
        SubsystemUpdate::Error(message) => {
            log::warn!("Poll failed: {}", message);
            snapshot.last_error = Some(message);
        }
    }
    snapshot.timestamp = chrono::Utc::now().timestamp();
}

async fn orchestrator_task(
    mut update_rx: mpsc::Receiver<SubsystemUpdate>,
    snapshot_tx: watch::Sender<Arc<Snapshot>>,
    history_size: usize,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut current = Snapshot {
        history: MetricsHistory::with_capacity(history_size),
        ..Default::default()
    };

    loop {
        tokio::select! {
            Some(update) = update_rx.recv() => {
                apply_update(&mut current, update);
                // Fails only once the UI has dropped its receiver
                let _ = snapshot_tx.send(Arc::new(current.clone()));
            }
            _ = shutdown.recv() => {
                log::debug!("Orchestrator shutting down");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::metrics::{SystemInfo, TrafficInfo};

    #[test]
    fn test_apply_update_merges_and_records_history() {
        let mut snapshot = Snapshot::default();
        apply_update(
            &mut snapshot,
            SubsystemUpdate::System(SystemInfo {
                cpu_percent: 42.0,
                memory_percent: 10.0,
                ..Default::default()
            }),
        );
        apply_update(
            &mut snapshot,
            SubsystemUpdate::Traffic(TrafficInfo {
                download_speed: 1024.0,
                ..Default::default()
            }),
        );

        assert_eq!(snapshot.system.cpu_percent, 42.0);
        assert_eq!(snapshot.history.cpu_usage.back(), Some(&42.0));
        assert_eq!(snapshot.history.download.back(), Some(&1024.0));
        assert!(snapshot.timestamp > 0);
    }

    #[test]
    fn test_poll_config_caps_connection_limit() {
        let config = Config {
            connection_limit: 100_000,
            ..Default::default()
        };
        assert_eq!(PollConfig::from(&config).connection_limit, MAX_CONNECTIONS);
    }

    #[test]
    fn test_apply_error_sets_last_error() {
        let mut snapshot = Snapshot::default();
        apply_update(&mut snapshot, SubsystemUpdate::Error("disk gone".to_string()));
        assert_eq!(snapshot.last_error.as_deref(), Some("disk gone"));
    }

    #[test]
    fn test_runtime_controls() {
        let runtime = MetricsRuntime::new(&PollConfig::default()).unwrap();

        assert_eq!(runtime.set_interval(10), 250);
        assert_eq!(runtime.set_interval(1_000_000), 60_000);
        assert_eq!(runtime.set_interval(1500), 1500);

        runtime.set_paused(true);
        runtime.set_views(true, false);
        runtime.request_refresh();

        let listening = ConnectionFilter {
            listening_only: true,
            ..Default::default()
        };
        runtime.set_connection_filter(&listening);
        runtime.set_connection_filter(&listening);

        let state = runtime.ui_state();
        assert_eq!(state.connection_filter, listening);
        assert!(state.paused);
        assert!(state.collect_processes);
        assert!(!state.collect_connections);
        assert_eq!(state.interval_ms, 1500);
        assert_eq!(state.refresh_generation, 2);

        runtime.shutdown();
    }

    #[test]
    fn test_runtime_publishes_system_snapshot() {
        let runtime = MetricsRuntime::new(&PollConfig::default()).unwrap();
        let mut rx = runtime.snapshot_rx.clone();

        let deadline = std::time::Instant::now() + Duration::from_secs(10);
        let mut seen = false;
        while std::time::Instant::now() < deadline {
            if rx.borrow_and_update().system.cpu_count > 0 {
                seen = true;
                break;
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        assert!(seen);
        runtime.shutdown();
    }
}
