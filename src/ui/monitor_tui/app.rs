use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::{clamp_interval, Config, ThemeKind};
use crate::core::system_monitor::{
    open_process_location, process_details, system_details, terminate_process, ConnectionFilter,
    MetricsRuntime, NetworkConnection, PollConfig, ProcessDetails, ProcessInfo, ProcessQuery,
    ProcessSort, Snapshot, SystemDetails, MAX_CONNECTIONS, MAX_PROCESSES,
};
use crate::error::SysdashError;

use super::event_handler::{map_key, InputMode, MonitorEvent};
use super::render::render_ui;
use super::theme::Theme;

const INTERVAL_STEP_MS: u64 = 250;
const PAGE_SIZE: usize = 10;
const FRAME_TIME: Duration = Duration::from_millis(200);

type Tty = Terminal<CrosstermBackend<io::Stdout>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Processes,
    Network,
    Hardware,
    Sensors,
    System,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Processes,
        Tab::Network,
        Tab::Hardware,
        Tab::Sensors,
        Tab::System,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Processes => "Processes",
            Tab::Network => "Network",
            Tab::Hardware => "Hardware",
            Tab::Sensors => "Sensors",
            Tab::System => "System",
        }
    }

    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    fn offset(self, delta: isize) -> Tab {
        let len = Tab::ALL.len() as isize;
        let next = (self.index() as isize + delta).rem_euclid(len);
        Tab::ALL[next as usize]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Popup {
    Details(Box<ProcessDetails>),
    Confirm { pid: u32, name: String, force: bool },
    Message { title: String, text: String, is_error: bool },
}

/// Side effects the event loop carries out for the app
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppAction {
    None,
    Refresh,
    SetInterval(u64),
    SetPaused(bool),
    /// The Network tab's filter changed; the poller must pick it up
    ApplyConnectionFilter,
    Terminate { pid: u32, force: bool },
    OpenLocation(u32),
    LoadDetails(u32),
    LoadSystemDetails,
}

/// Configuration for the monitor app
#[derive(Debug, Clone)]
pub struct MonitorAppConfig {
    pub interval_ms: u64,
    pub theme: ThemeKind,
    pub sort: ProcessSort,
    pub process_limit: usize,
    pub connection_limit: usize,
    pub poll: PollConfig,
}

impl From<&Config> for MonitorAppConfig {
    fn from(config: &Config) -> Self {
        Self {
            interval_ms: clamp_interval(config.refresh_interval_ms),
            theme: config.theme,
            sort: config.default_sort,
            process_limit: config.process_limit.min(MAX_PROCESSES),
            connection_limit: config.connection_limit.min(MAX_CONNECTIONS),
            poll: PollConfig::from(config),
        }
    }
}

impl Default for MonitorAppConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

/// Monitor application state
pub struct MonitorApp {
    pub snapshot: Arc<Snapshot>,
    pub theme: Theme,
    pub tab: Tab,
    pub should_quit: bool,
    pub show_help: bool,
    pub popup: Option<Popup>,
    pub query: ProcessQuery,
    /// Some while the filter of the current tab is being typed
    pub filter_input: Option<String>,
    pub processes: Vec<ProcessInfo>,
    pub selected_process: usize,
    pub connection_filter: ConnectionFilter,
    pub connection_limit: usize,
    pub connections: Vec<NetworkConnection>,
    pub selected_connection: usize,
    pub interval_ms: u64,
    pub paused: bool,
    pub status: Option<String>,
    pub system_details: Option<SystemDetails>,
}

impl MonitorApp {
    pub fn new(config: &MonitorAppConfig) -> Self {
        Self {
            snapshot: Arc::new(Snapshot::default()),
            theme: Theme::for_kind(config.theme),
            tab: Tab::Overview,
            should_quit: false,
            show_help: false,
            popup: None,
            query: ProcessQuery {
                sort: config.sort,
                filter: String::new(),
                limit: config.process_limit.min(MAX_PROCESSES),
            },
            filter_input: None,
            processes: Vec::new(),
            selected_process: 0,
            connection_filter: ConnectionFilter::default(),
            connection_limit: config.connection_limit.min(MAX_CONNECTIONS),
            connections: Vec::new(),
            selected_connection: 0,
            interval_ms: clamp_interval(config.interval_ms),
            paused: false,
            status: None,
            system_details: None,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match (&self.popup, &self.filter_input) {
            (Some(Popup::Confirm { .. }), _) => InputMode::Confirm,
            (Some(_), _) => InputMode::Popup,
            (None, Some(_)) => InputMode::Filter,
            (None, None) if self.show_help => InputMode::Popup,
            _ => InputMode::Normal,
        }
    }

    /// Which expensive pollers the current tab needs
    pub fn views(&self) -> (bool, bool) {
        (self.tab == Tab::Processes, self.tab == Tab::Network)
    }

    pub fn set_snapshot(&mut self, snapshot: Arc<Snapshot>) {
        self.snapshot = snapshot;
        self.rebuild_processes();
        self.rebuild_connections();
    }

    fn rebuild_processes(&mut self) {
        self.processes = self.query.apply(&self.snapshot.processes);
        self.selected_process = clamp_selection(self.selected_process, self.processes.len());
    }

    fn rebuild_connections(&mut self) {
        self.connections = self
            .connection_filter
            .apply(&self.snapshot.connections, self.connection_limit);
        self.selected_connection =
            clamp_selection(self.selected_connection, self.connections.len());
    }

    pub fn selected_process_info(&self) -> Option<&ProcessInfo> {
        self.processes.get(self.selected_process)
    }

    pub fn show_message(&mut self, title: &str, text: impl Into<String>, is_error: bool) {
        self.popup = Some(Popup::Message {
            title: title.to_string(),
            text: text.into(),
            is_error,
        });
    }

    pub fn show_error(&mut self, err: &SysdashError) {
        let (title, text) = describe_error(err);
        self.show_message(title, text, true);
    }

    pub fn show_details(&mut self, mut details: ProcessDetails) {
        // A fresh read has no CPU baseline; keep the polled figure
        if let Some(listed) = self.processes.iter().find(|p| p.pid == details.info.pid) {
            details.info.cpu_percent = listed.cpu_percent;
        }
        self.popup = Some(Popup::Details(Box::new(details)));
    }

    /// Handle a keyboard event
    pub fn handle_event(&mut self, event: MonitorEvent) -> AppAction {
        match event {
            MonitorEvent::Quit => self.should_quit = true,
            MonitorEvent::ToggleHelp => self.show_help = !self.show_help,
            MonitorEvent::ClosePopup => {
                if self.popup.take().is_none() {
                    self.show_help = false;
                }
            }
            MonitorEvent::NextTab => return self.switch_tab(self.tab.offset(1)),
            MonitorEvent::PrevTab => return self.switch_tab(self.tab.offset(-1)),
            MonitorEvent::SelectTab(index) => {
                if let Some(tab) = Tab::ALL.get(index) {
                    return self.switch_tab(*tab);
                }
            }
            MonitorEvent::Up => self.move_selection(-1),
            MonitorEvent::Down => self.move_selection(1),
            MonitorEvent::PageUp => self.move_selection(-(PAGE_SIZE as isize)),
            MonitorEvent::PageDown => self.move_selection(PAGE_SIZE as isize),
            MonitorEvent::CycleSort => {
                if self.tab == Tab::Processes {
                    self.query.sort = self.query.sort.next();
                    self.rebuild_processes();
                }
            }
            MonitorEvent::StartFilter => match self.tab {
                Tab::Processes => self.filter_input = Some(self.query.filter.clone()),
                Tab::Network => self.filter_input = Some(self.connection_filter.text.clone()),
                _ => {}
            },
            MonitorEvent::FilterChar(c) => {
                if let Some(input) = self.filter_input.as_mut() {
                    input.push(c);
                }
            }
            MonitorEvent::FilterBackspace => {
                if let Some(input) = self.filter_input.as_mut() {
                    input.pop();
                }
            }
            MonitorEvent::FilterApply => {
                if let Some(input) = self.filter_input.take() {
                    let text = input.trim().to_string();
                    if self.tab == Tab::Network {
                        self.connection_filter.text = text;
                        self.selected_connection = 0;
                        self.rebuild_connections();
                        return AppAction::ApplyConnectionFilter;
                    }
                    self.query.filter = text;
                    self.selected_process = 0;
                    self.rebuild_processes();
                }
            }
            MonitorEvent::FilterCancel => self.filter_input = None,
            MonitorEvent::ShowDetails => {
                if self.tab == Tab::Processes {
                    if let Some(p) = self.selected_process_info() {
                        return AppAction::LoadDetails(p.pid);
                    }
                }
            }
            MonitorEvent::Terminate | MonitorEvent::ForceKill => {
                if self.tab == Tab::Processes {
                    if let Some(p) = self.selected_process_info() {
                        self.popup = Some(Popup::Confirm {
                            pid: p.pid,
                            name: p.name.clone(),
                            force: event == MonitorEvent::ForceKill,
                        });
                    }
                }
            }
            MonitorEvent::Confirm => {
                if let Some(Popup::Confirm { pid, force, .. }) = self.popup.take() {
                    return AppAction::Terminate { pid, force };
                }
            }
            MonitorEvent::Cancel => self.popup = None,
            MonitorEvent::OpenLocation => {
                if self.tab == Tab::Processes {
                    if let Some(p) = self.selected_process_info() {
                        return AppAction::OpenLocation(p.pid);
                    }
                }
            }
            MonitorEvent::Refresh => {
                self.status = Some("Refreshing...".to_string());
                return AppAction::Refresh;
            }
            MonitorEvent::TogglePause => {
                self.paused = !self.paused;
                self.status = Some(if self.paused {
                    "Auto refresh paused".to_string()
                } else {
                    "Auto refresh resumed".to_string()
                });
                return AppAction::SetPaused(self.paused);
            }
            MonitorEvent::IncreaseInterval => {
                self.interval_ms = clamp_interval(self.interval_ms + INTERVAL_STEP_MS);
                return AppAction::SetInterval(self.interval_ms);
            }
            MonitorEvent::DecreaseInterval => {
                self.interval_ms =
                    clamp_interval(self.interval_ms.saturating_sub(INTERVAL_STEP_MS));
                return AppAction::SetInterval(self.interval_ms);
            }
            MonitorEvent::ToggleTheme => {
                self.theme = Theme::for_kind(self.theme.kind.toggled());
            }
            MonitorEvent::CycleProtocol => {
                if self.tab == Tab::Network {
                    self.connection_filter.protocol = self.connection_filter.protocol.next();
                    self.rebuild_connections();
                    return AppAction::ApplyConnectionFilter;
                }
            }
            MonitorEvent::ToggleListening => {
                if self.tab == Tab::Network {
                    self.connection_filter.listening_only = !self.connection_filter.listening_only;
                    self.rebuild_connections();
                    return AppAction::ApplyConnectionFilter;
                }
            }
            MonitorEvent::None => {}
        }
        AppAction::None
    }

    fn switch_tab(&mut self, tab: Tab) -> AppAction {
        self.tab = tab;
        self.filter_input = None;
        if tab == Tab::System && self.system_details.is_none() {
            AppAction::LoadSystemDetails
        } else {
            AppAction::None
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let (selected, len) = match self.tab {
            Tab::Processes => (&mut self.selected_process, self.processes.len()),
            Tab::Network => (&mut self.selected_connection, self.connections.len()),
            _ => return,
        };
        let next = (*selected as isize + delta).max(0) as usize;
        *selected = clamp_selection(next, len);
    }
}

fn clamp_selection(index: usize, len: usize) -> usize {
    index.min(len.saturating_sub(1))
}

/// Title and text for an action failure
pub fn describe_error(err: &SysdashError) -> (&'static str, String) {
    match err {
        SysdashError::PermissionDenied(msg) => (
            "Permission denied",
            format!("{}. Try running with elevated privileges.", msg),
        ),
        SysdashError::NoSuchProcess(pid) => (
            "Process not found",
            format!("Process {} no longer exists.", pid),
        ),
        other => ("Error", other.to_string()),
    }
}

fn perform(action: AppAction, app: &mut MonitorApp, runtime: &MetricsRuntime) {
    match action {
        AppAction::None => {}
        AppAction::Refresh => {
            runtime.request_refresh();
            if app.tab == Tab::System {
                app.system_details = Some(system_details());
            }
        }
        AppAction::SetInterval(ms) => {
            app.interval_ms = runtime.set_interval(ms);
            app.status = Some(format!("Refresh interval {} ms", app.interval_ms));
        }
        AppAction::SetPaused(paused) => runtime.set_paused(paused),
        AppAction::ApplyConnectionFilter => {
            runtime.set_connection_filter(&app.connection_filter);
        }
        AppAction::Terminate { pid, force } => match terminate_process(pid, force) {
            Ok(message) => {
                app.show_message("Success", message, false);
                runtime.request_refresh();
            }
            Err(e) => {
                log::warn!("Failed to terminate {}: {}", pid, e);
                app.show_error(&e);
            }
        },
        AppAction::OpenLocation(pid) => match open_process_location(pid) {
            Ok(message) => app.status = Some(message),
            Err(e) => app.show_error(&e),
        },
        AppAction::LoadDetails(pid) => match process_details(pid) {
            Ok(details) => app.show_details(details),
            Err(e) => app.show_error(&e),
        },
        AppAction::LoadSystemDetails => app.system_details = Some(system_details()),
    }
}

/// Run the monitor TUI application
pub fn run_monitor_app(config: MonitorAppConfig) -> Result<()> {
    let runtime =
        MetricsRuntime::new(&config.poll).context("Failed to start metrics collection")?;

    let mut terminal = match setup_terminal() {
        Ok(terminal) => terminal,
        Err(e) => {
            runtime.shutdown();
            return Err(e.into());
        }
    };

    let mut app = MonitorApp::new(&config);
    let result = event_loop(&mut terminal, &mut app, &runtime);

    // Restore terminal even when the loop failed
    let restored = restore_terminal(&mut terminal);
    runtime.shutdown();
    result?;
    restored?;
    Ok(())
}

fn setup_terminal() -> crate::Result<Tty> {
    enable_raw_mode().map_err(|e| SysdashError::tui(format!("Failed to enable raw mode: {}", e)))?;
    let mut stdout = io::stdout();
    undo_on_failure(
        "Failed to enter alternate screen",
        execute!(stdout, EnterAlternateScreen),
        disable_raw_mode,
    )?;
    undo_on_failure(
        "Failed to create terminal",
        Terminal::new(CrosstermBackend::new(stdout)),
        || {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            disable_raw_mode()
        },
    )
}

/// Every step runs; the first failure is reported
fn restore_terminal(terminal: &mut Tty) -> crate::Result<()> {
    let steps = [
        ("Failed to disable raw mode", disable_raw_mode()),
        (
            "Failed to leave alternate screen",
            execute!(terminal.backend_mut(), LeaveAlternateScreen),
        ),
        ("Failed to show cursor", terminal.show_cursor()),
    ];
    first_failure(steps)
}

fn undo_on_failure<T>(
    step: &str,
    result: io::Result<T>,
    undo: impl FnOnce() -> io::Result<()>,
) -> crate::Result<T> {
    result.map_err(|e| {
        if let Err(undo_err) = undo() {
            log::warn!("Terminal rollback failed: {}", undo_err);
        }
        SysdashError::tui(format!("{}: {}", step, e))
    })
}

fn first_failure(
    steps: impl IntoIterator<Item = (&'static str, io::Result<()>)>,
) -> crate::Result<()> {
    let mut failure = None;
    for (step, result) in steps {
        if let Err(e) = result {
            log::warn!("{}: {}", step, e);
            failure.get_or_insert_with(|| SysdashError::tui(format!("{}: {}", step, e)));
        }
    }
    failure.map_or(Ok(()), Err)
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut MonitorApp,
    runtime: &MetricsRuntime,
) -> Result<()> {
    let mut snapshot_rx = runtime.snapshot_rx.clone();

    loop {
        if snapshot_rx.has_changed().unwrap_or(false) {
            let snapshot = snapshot_rx.borrow_and_update().clone();
            app.set_snapshot(snapshot);
        }

        let (processes, connections) = app.views();
        runtime.set_views(processes, connections);

        terminal.draw(|frame| render_ui(frame, app))?;

        if event::poll(FRAME_TIME).context("Event poll failed")? {
            if let Event::Key(key) = event::read().context("Event read failed")? {
                if key.kind == KeyEventKind::Press {
                    let action = app.handle_event(map_key(key, app.input_mode()));
                    perform(action, app, runtime);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::system_monitor::{NetworkConnection, Protocol};

    fn proc(pid: u32, name: &str, cpu: f32) -> ProcessInfo {
        ProcessInfo {
            pid,
            name: name.to_string(),
            cpu_percent: cpu,
            ..Default::default()
        }
    }

    fn app_with_processes() -> MonitorApp {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        let snapshot = Snapshot {
            processes: vec![proc(1, "init", 0.5), proc(42, "firefox", 30.0), proc(7, "bash", 2.0)],
            ..Default::default()
        };
        app.set_snapshot(Arc::new(snapshot));
        app.handle_event(MonitorEvent::SelectTab(1));
        app
    }

    #[test]
    fn test_tab_cycle_wraps() {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        app.handle_event(MonitorEvent::PrevTab);
        assert_eq!(app.tab, Tab::System);
        app.handle_event(MonitorEvent::NextTab);
        assert_eq!(app.tab, Tab::Overview);
    }

    #[test]
    fn test_system_tab_requests_details_once() {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        assert_eq!(
            app.handle_event(MonitorEvent::SelectTab(5)),
            AppAction::LoadSystemDetails
        );
        app.system_details = Some(SystemDetails::default());
        app.handle_event(MonitorEvent::SelectTab(0));
        assert_eq!(app.handle_event(MonitorEvent::SelectTab(5)), AppAction::None);
    }

    #[test]
    fn test_processes_sorted_and_selection_clamped() {
        let mut app = app_with_processes();
        assert_eq!(app.processes[0].pid, 42);

        for _ in 0..10 {
            app.handle_event(MonitorEvent::Down);
        }
        assert_eq!(app.selected_process, 2);
        app.handle_event(MonitorEvent::PageUp);
        assert_eq!(app.selected_process, 0);

        app.handle_event(MonitorEvent::CycleSort);
        assert_eq!(app.query.sort, ProcessSort::Memory);
    }

    #[test]
    fn test_filter_editing() {
        let mut app = app_with_processes();
        app.handle_event(MonitorEvent::StartFilter);
        assert_eq!(app.input_mode(), InputMode::Filter);
        for c in "bas".chars() {
            app.handle_event(MonitorEvent::FilterChar(c));
        }
        app.handle_event(MonitorEvent::FilterApply);
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert_eq!(app.processes.len(), 1);
        assert_eq!(app.processes[0].name, "bash");
    }

    #[test]
    fn test_terminate_requires_confirmation() {
        let mut app = app_with_processes();
        assert_eq!(app.handle_event(MonitorEvent::ForceKill), AppAction::None);
        assert_eq!(app.input_mode(), InputMode::Confirm);
        assert_eq!(
            app.handle_event(MonitorEvent::Confirm),
            AppAction::Terminate { pid: 42, force: true }
        );
        assert!(app.popup.is_none());

        app.handle_event(MonitorEvent::Terminate);
        app.handle_event(MonitorEvent::Cancel);
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_process_actions_ignored_on_other_tabs() {
        let mut app = app_with_processes();
        app.handle_event(MonitorEvent::SelectTab(0));
        assert_eq!(app.handle_event(MonitorEvent::ShowDetails), AppAction::None);
        app.handle_event(MonitorEvent::Terminate);
        assert!(app.popup.is_none());
    }

    #[test]
    fn test_interval_steps_are_clamped() {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        app.interval_ms = 250;
        assert_eq!(
            app.handle_event(MonitorEvent::DecreaseInterval),
            AppAction::SetInterval(250)
        );
        assert_eq!(
            app.handle_event(MonitorEvent::IncreaseInterval),
            AppAction::SetInterval(500)
        );
    }

    #[test]
    fn test_pause_and_theme_toggle() {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        assert_eq!(app.handle_event(MonitorEvent::TogglePause), AppAction::SetPaused(true));
        app.handle_event(MonitorEvent::ToggleTheme);
        assert_eq!(app.theme.kind, ThemeKind::Fluent);
    }

    #[test]
    fn test_connection_filters_on_network_tab() {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        let conn = |protocol, state: &str| NetworkConnection {
            protocol,
            local_addr: "0.0.0.0:22".parse().unwrap(),
            remote_addr: None,
            state: state.to_string(),
            pid: None,
            inode: 0,
        };
        app.set_snapshot(Arc::new(Snapshot {
            connections: vec![conn(Protocol::Tcp, "LISTEN"), conn(Protocol::Udp, "N/A")],
            ..Default::default()
        }));
        app.handle_event(MonitorEvent::SelectTab(2));
        assert_eq!(app.views(), (false, true));

        assert_eq!(
            app.handle_event(MonitorEvent::CycleProtocol),
            AppAction::ApplyConnectionFilter
        );
        assert_eq!(app.connections.len(), 1);
        app.handle_event(MonitorEvent::CycleProtocol);
        assert_eq!(app.connections[0].protocol, Protocol::Udp);
        app.handle_event(MonitorEvent::ToggleListening);
        assert!(app.connections.is_empty());
    }

    #[test]
    fn test_connection_text_filter_on_network_tab() {
        let mut app = MonitorApp::new(&MonitorAppConfig::default());
        let conn = |port: u16, pid| NetworkConnection {
            protocol: Protocol::Tcp,
            local_addr: format!("127.0.0.1:{}", port).parse().unwrap(),
            remote_addr: None,
            state: "LISTEN".to_string(),
            pid,
            inode: 0,
        };
        app.set_snapshot(Arc::new(Snapshot {
            connections: vec![conn(22, Some(1)), conn(8080, Some(2))],
            ..Default::default()
        }));

        // Filtering is tab scoped
        app.handle_event(MonitorEvent::StartFilter);
        assert_eq!(app.input_mode(), InputMode::Normal);

        app.handle_event(MonitorEvent::SelectTab(2));
        app.handle_event(MonitorEvent::StartFilter);
        assert_eq!(app.input_mode(), InputMode::Filter);
        for c in "8080".chars() {
            app.handle_event(MonitorEvent::FilterChar(c));
        }
        assert_eq!(
            app.handle_event(MonitorEvent::FilterApply),
            AppAction::ApplyConnectionFilter
        );
        assert_eq!(app.connection_filter.text, "8080");
        assert!(app.query.filter.is_empty());
        assert_eq!(app.connections.len(), 1);
        assert_eq!(app.connections[0].pid, Some(2));

        app.handle_event(MonitorEvent::StartFilter);
        assert_eq!(app.filter_input.as_deref(), Some("8080"));
        app.handle_event(MonitorEvent::FilterCancel);
        assert_eq!(app.connections.len(), 1);
    }

    #[test]
    fn test_limits_above_caps_are_lowered() {
        let config = Config {
            process_limit: 10_000,
            connection_limit: 10_000,
            ..Default::default()
        };
        let mut app_config = MonitorAppConfig::from(&config);
        assert_eq!(app_config.process_limit, MAX_PROCESSES);
        assert_eq!(app_config.connection_limit, MAX_CONNECTIONS);

        app_config.process_limit = usize::MAX;
        app_config.connection_limit = usize::MAX;
        let mut app = MonitorApp::new(&app_config);
        assert_eq!(app.query.limit, MAX_PROCESSES);
        assert_eq!(app.connection_limit, MAX_CONNECTIONS);

        let processes = (0..300).map(|pid| proc(pid, "worker", 0.0)).collect();
        app.set_snapshot(Arc::new(Snapshot {
            processes,
            ..Default::default()
        }));
        assert_eq!(app.processes.len(), MAX_PROCESSES);
    }

    #[test]
    fn test_terminal_rollback_runs_only_on_failure() {
        let mut undone = false;
        let ok = undo_on_failure("Failed to enter alternate screen", Ok(5), || {
            undone = true;
            Ok(())
        });
        assert_eq!(ok.unwrap(), 5);
        assert!(!undone);

        let failed: crate::Result<()> = undo_on_failure(
            "Failed to enter alternate screen",
            Err(io::Error::other("not a tty")),
            || {
                undone = true;
                Ok(())
            },
        );
        assert!(undone);
        match failed {
            Err(SysdashError::Tui(msg)) => assert!(msg.contains("alternate screen")),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_restore_reports_first_failure() {
        let result = first_failure([
            ("Failed to disable raw mode", Ok(())),
            ("Failed to leave alternate screen", Err(io::Error::other("gone"))),
            ("Failed to show cursor", Err(io::Error::other("hidden"))),
        ]);
        match result {
            Err(SysdashError::Tui(msg)) => {
                assert_eq!(msg, "Failed to leave alternate screen: gone")
            }
            other => panic!("unexpected result {:?}", other),
        }
        assert!(first_failure([("Failed to show cursor", Ok(()))]).is_ok());
    }

    #[test]
    fn test_describe_error() {
        let (title, _) = describe_error(&SysdashError::NoSuchProcess(9));
        assert_eq!(title, "Process not found");
        let (title, text) = describe_error(&SysdashError::permission_denied("cannot terminate process 1"));
        assert_eq!(title, "Permission denied");
        assert!(text.contains("elevated"));
    }

    #[test]
    fn test_details_keep_listed_cpu() {
        let mut app = app_with_processes();
        let details = ProcessDetails {
            info: proc(42, "firefox", 0.0),
            exe: None,
            cwd: None,
            cmdline: Vec::new(),
            thread_count: None,
            parent: None,
            children: Vec::new(),
        };
        app.show_details(details);
        match &app.popup {
            Some(Popup::Details(d)) => assert_eq!(d.info.cpu_percent, 30.0),
            other => panic!("unexpected popup {:?}", other),
        }
        assert_eq!(app.input_mode(), InputMode::Popup);
    }
}
