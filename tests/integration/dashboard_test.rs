use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use sysdash::core::system_monitor::{MetricsRuntime, PollConfig, ProcessInfo, Snapshot};
use sysdash::ui::monitor_tui::{
    map_key, AppAction, InputMode, MonitorApp, MonitorAppConfig, Popup, Tab,
};

fn process(pid: u32, name: &str, cpu: f32) -> ProcessInfo {
    ProcessInfo {
        pid,
        name: name.to_string(),
        cpu_percent: cpu,
        ..Default::default()
    }
}

fn app_with_processes() -> MonitorApp {
    let mut app = MonitorApp::new(&MonitorAppConfig::default());
    app.set_snapshot(Arc::new(Snapshot {
        processes: vec![
            process(10, "nginx", 5.0),
            process(20, "postgres", 40.0),
            process(30, "nginx-worker", 12.0),
        ],
        ..Default::default()
    }));
    app
}

fn press(app: &mut MonitorApp, code: KeyCode) -> AppAction {
    let event = map_key(KeyEvent::new(code, KeyModifiers::NONE), app.input_mode());
    app.handle_event(event)
}

#[test]
fn test_typed_filter_narrows_process_table() {
    let mut app = app_with_processes();
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.tab, Tab::Processes);

    press(&mut app, KeyCode::Char('/'));
    assert_eq!(app.input_mode(), InputMode::Filter);
    for c in "nginx".chars() {
        press(&mut app, KeyCode::Char(c));
    }
    press(&mut app, KeyCode::Enter);

    assert_eq!(app.input_mode(), InputMode::Normal);
    let pids: Vec<u32> = app.processes.iter().map(|p| p.pid).collect();
    assert_eq!(pids, vec![30, 10]);
}

#[test]
fn test_terminate_requires_confirmation() {
    let mut app = app_with_processes();
    press(&mut app, KeyCode::Char('2'));

    // Highest CPU first, so the selection starts on postgres
    assert_eq!(press(&mut app, KeyCode::Char('x')), AppAction::None);
    assert!(matches!(
        app.popup,
        Some(Popup::Confirm { pid: 20, force: false, .. })
    ));

    assert_eq!(
        press(&mut app, KeyCode::Char('y')),
        AppAction::Terminate { pid: 20, force: false }
    );
    assert!(app.popup.is_none());
}

#[test]
fn test_cancelled_kill_does_nothing() {
    let mut app = app_with_processes();
    press(&mut app, KeyCode::Char('2'));
    press(&mut app, KeyCode::Down);
    press(&mut app, KeyCode::Char('X'));
    assert_eq!(press(&mut app, KeyCode::Esc), AppAction::None);
    assert!(app.popup.is_none());
    assert!(!app.should_quit);
}

#[test]
fn test_expensive_views_follow_active_tab() {
    let mut app = app_with_processes();
    assert_eq!(app.views(), (false, false));
    press(&mut app, KeyCode::Char('2'));
    assert_eq!(app.views(), (true, false));
    press(&mut app, KeyCode::Char('3'));
    assert_eq!(app.views(), (false, true));
    assert_eq!(press(&mut app, KeyCode::Char('6')), AppAction::LoadSystemDetails);
}

#[test]
fn test_interval_keys_stay_in_range() {
    let mut app = MonitorApp::new(&MonitorAppConfig {
        interval_ms: 250,
        ..Default::default()
    });
    assert_eq!(press(&mut app, KeyCode::Char('-')), AppAction::SetInterval(250));
    assert_eq!(press(&mut app, KeyCode::Char('+')), AppAction::SetInterval(500));
}

#[test]
fn test_runtime_publishes_snapshots() {
    let runtime = MetricsRuntime::new(&PollConfig::default()).unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let mut snapshot = runtime.snapshot();
    while snapshot.system.memory_total == 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(100));
        snapshot = runtime.snapshot();
    }

    assert!(snapshot.timestamp > 0);
    assert!(snapshot.system.memory_total > 0);
    assert_eq!(runtime.set_interval(10), 250);
    runtime.shutdown();
}
