use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What the keyboard is currently routed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing into the process filter
    Filter,
    /// A yes/no question is open
    Confirm,
    /// A dismissable popup (details, message, help) is open
    Popup,
}

/// Events that can occur in the monitor TUI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonitorEvent {
    Quit,
    ToggleHelp,
    NextTab,
    PrevTab,
    SelectTab(usize),
    Up,
    Down,
    PageUp,
    PageDown,
    CycleSort,
    StartFilter,
    FilterChar(char),
    FilterBackspace,
    FilterApply,
    FilterCancel,
    ShowDetails,
    Terminate,
    ForceKill,
    OpenLocation,
    Refresh,
    TogglePause,
    IncreaseInterval,
    DecreaseInterval,
    ToggleTheme,
    CycleProtocol,
    ToggleListening,
    Confirm,
    Cancel,
    ClosePopup,
    None,
}

/// Translate a key press into an event for the current input mode
pub fn map_key(key: KeyEvent, mode: InputMode) -> MonitorEvent {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return MonitorEvent::Quit;
    }

    match mode {
        InputMode::Filter => match key.code {
            KeyCode::Enter => MonitorEvent::FilterApply,
            KeyCode::Esc => MonitorEvent::FilterCancel,
            KeyCode::Backspace => MonitorEvent::FilterBackspace,
            KeyCode::Char(c) => MonitorEvent::FilterChar(c),
            _ => MonitorEvent::None,
        },
        InputMode::Confirm => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => MonitorEvent::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => MonitorEvent::Cancel,
            _ => MonitorEvent::None,
        },
        InputMode::Popup => MonitorEvent::ClosePopup,
        InputMode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => MonitorEvent::Quit,
            KeyCode::Char('?') | KeyCode::Char('h') => MonitorEvent::ToggleHelp,
            KeyCode::Tab => MonitorEvent::NextTab,
            KeyCode::BackTab => MonitorEvent::PrevTab,
            KeyCode::Char(c @ '1'..='6') => MonitorEvent::SelectTab(c as usize - '1' as usize),
            KeyCode::Up | KeyCode::Char('k') => MonitorEvent::Up,
            KeyCode::Down | KeyCode::Char('j') => MonitorEvent::Down,
            KeyCode::PageUp => MonitorEvent::PageUp,
            KeyCode::PageDown => MonitorEvent::PageDown,
            KeyCode::Char('s') => MonitorEvent::CycleSort,
            KeyCode::Char('/') => MonitorEvent::StartFilter,
            KeyCode::Enter => MonitorEvent::ShowDetails,
            KeyCode::Char('x') => MonitorEvent::Terminate,
            KeyCode::Char('X') => MonitorEvent::ForceKill,
            KeyCode::Char('o') => MonitorEvent::OpenLocation,
            KeyCode::Char('r') | KeyCode::F(5) => MonitorEvent::Refresh,
            KeyCode::Char('p') => MonitorEvent::TogglePause,
            KeyCode::Char('+') | KeyCode::Char('=') => MonitorEvent::IncreaseInterval,
            KeyCode::Char('-') => MonitorEvent::DecreaseInterval,
            KeyCode::Char('t') => MonitorEvent::ToggleTheme,
            KeyCode::Char('u') => MonitorEvent::CycleProtocol,
            KeyCode::Char('l') => MonitorEvent::ToggleListening,
            _ => MonitorEvent::None,
        },
    }
}
