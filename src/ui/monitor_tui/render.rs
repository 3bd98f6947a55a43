use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use super::app::{MonitorApp, Popup, Tab};
use super::panels;
use super::theme::Theme;
use crate::core::system_monitor::ProcessDetails;
use crate::ui::formatters::{format_bytes, format_timestamp, or_na};

/// Main render function
pub fn render_ui(frame: &mut Frame, app: &MonitorApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Min(0),    // Active view
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_tabs(frame, chunks[0], app);

    match app.tab {
        Tab::Overview => panels::render_overview(frame, chunks[1], app),
        Tab::Processes => panels::render_processes(frame, chunks[1], app),
        Tab::Network => panels::render_network(frame, chunks[1], app),
        Tab::Hardware => panels::render_hardware(frame, chunks[1], app),
        Tab::Sensors => panels::render_sensors(frame, chunks[1], app),
        Tab::System => panels::render_system(frame, chunks[1], app),
    }

    render_status_bar(frame, chunks[2], app);

    match &app.popup {
        Some(Popup::Details(details)) => render_details_popup(frame, area, &app.theme, details),
        Some(Popup::Confirm { pid, name, force }) => {
            render_confirm_popup(frame, area, &app.theme, *pid, name, *force)
        }
        Some(Popup::Message {
            title,
            text,
            is_error,
        }) => render_message_popup(frame, area, &app.theme, title, text, *is_error),
        None if app.show_help => render_help_overlay(frame, area, &app.theme),
        None => {}
    }
}

fn render_tabs(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Line::from(format!("{} {}", i + 1, tab.title())))
        .collect();

    let host = app
        .system_details
        .as_ref()
        .map(|d| d.host_name.clone())
        .unwrap_or_else(|| "sysdash".to_string());

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!(" {} │ {} ", host, theme.kind))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .style(Style::default().fg(theme.muted))
        .highlight_style(theme.title())
        .select(app.tab.index());

    frame.render_widget(tabs, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        format!(
            " {} │ {} ms │ updated {} ",
            if app.paused { "PAUSED" } else { "LIVE" },
            app.interval_ms,
            if app.snapshot.timestamp > 0 {
                format_timestamp(app.snapshot.timestamp as u64)
            } else {
                "never".to_string()
            }
        ),
        Style::default().fg(if app.paused { theme.warn } else { theme.accent }),
    )];

    if let Some(err) = &app.snapshot.last_error {
        spans.push(Span::styled(
            format!("│ {} ", err),
            Style::default().fg(theme.critical),
        ));
    } else if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("│ {} ", status),
            Style::default().fg(theme.text),
        ));
    }

    spans.push(Span::styled(
        "│ ? help  q quit",
        Style::default().fg(theme.muted),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn popup_block<'a>(theme: &Theme, title: String, color: Color) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme.popup_bg).fg(theme.text))
}

fn label_line<'a>(theme: &Theme, label: &'a str, value: String) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{:<14}", label), Style::default().fg(theme.muted)),
        Span::raw(value),
    ])
}

fn render_details_popup(frame: &mut Frame, area: Rect, theme: &Theme, details: &ProcessDetails) {
    let info = &details.info;
    let mut lines = vec![
        label_line(theme, "PID", info.pid.to_string()),
        label_line(theme, "Name", info.name.clone()),
        label_line(theme, "Status", info.status.clone()),
        label_line(theme, "CPU", format!("{:.1}%", info.cpu_percent)),
        label_line(
            theme,
            "Memory",
            format!("{} ({:.1}%)", format_bytes(info.memory_bytes), info.memory_percent),
        ),
        label_line(theme, "Threads", or_na(details.thread_count)),
        label_line(theme, "Started", format_timestamp(info.start_time)),
        label_line(theme, "Disk read", format_bytes(info.disk_read_bytes)),
        label_line(theme, "Disk written", format_bytes(info.disk_written_bytes)),
        label_line(theme, "Executable", or_na(details.exe.clone())),
        label_line(theme, "Working dir", or_na(details.cwd.clone())),
        label_line(
            theme,
            "Command line",
            if details.cmdline.is_empty() {
                "N/A".to_string()
            } else {
                details.cmdline.join(" ")
            },
        ),
        label_line(
            theme,
            "Parent",
            or_na(
                details
                    .parent
                    .as_ref()
                    .map(|(pid, name)| format!("{} ({})", name, pid)),
            ),
        ),
        Line::from(""),
        Line::from(Span::styled(
            format!("Children ({})", details.children.len()),
            theme.header(),
        )),
    ];

    lines.extend(
        details
            .children
            .iter()
            .map(|(pid, name)| Line::from(format!("  {:>7}  {}", pid, name))),
    );

    let popup_area = centered_rect(70, 70, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(popup_block(
                theme,
                format!(" Process {} ", info.pid),
                theme.accent,
            ))
            .wrap(Wrap { trim: false }),
        popup_area,
    );
}

fn render_confirm_popup(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    pid: u32,
    name: &str,
    force: bool,
) {
    let verb = if force { "Force kill" } else { "Terminate" };
    let lines = vec![
        Line::from(""),
        Line::from(format!("{} process {} (PID: {})?", verb, name, pid)),
        Line::from(""),
        Line::from(Span::styled(
            "y / Enter: confirm    n / Esc: cancel",
            Style::default().fg(theme.muted),
        )),
    ];

    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(popup_block(theme, format!(" {} ", verb), theme.warn)),
        popup_area,
    );
}

fn render_message_popup(
    frame: &mut Frame,
    area: Rect,
    theme: &Theme,
    title: &str,
    text: &str,
    is_error: bool,
) {
    let color = if is_error { theme.critical } else { theme.good };
    let popup_area = centered_rect(50, 25, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(vec![Line::from(""), Line::from(text.to_string())])
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(popup_block(theme, format!(" {} ", title), color)),
        popup_area,
    );
}

fn render_help_overlay(frame: &mut Frame, area: Rect, theme: &Theme) {
    let help_text = r#"
    sysdash - Help

    General
    ─────────────────────────────────────
    q / Esc        Quit
    ? / h          Toggle this help screen
    Tab/Shift+Tab  Next / previous tab
    1..6           Jump to tab
    r / F5         Refresh now
    p              Pause / resume auto refresh
    + / -          Change refresh interval
    t              Toggle theme

    Processes
    ─────────────────────────────────────
    ↑↓ / j k       Move selection (PgUp/PgDn)
    s              Cycle sort column
    /              Filter by name or PID
    Enter          Process details
    x / X          Terminate / force kill
    o              Open executable location

    Network
    ─────────────────────────────────────
    u              Cycle protocol filter
    l              Listening sockets only
    /              Filter by PID, port or address

    Press any key to close this help
    "#;

    let popup_area = centered_rect(60, 80, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(
        Paragraph::new(help_text)
            .block(popup_block(theme, " Help ".to_string(), theme.accent))
            .alignment(Alignment::Left),
        popup_area,
    );
}

/// Helper function to create a centered rect
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
