//! One renderer per dashboard tab.

use ratatui::{
    prelude::*,
    widgets::{
        BarChart, Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState, Wrap,
    },
};

use super::app::MonitorApp;
use super::theme::Theme;
use super::widgets::{battery_color, colored_gauge, tail_for_width, temp_color};
use crate::ui::formatters::{
    format_battery_time, format_bytes, format_frequency, format_percent, format_speed,
    format_timestamp, format_uptime, or_na,
};

fn panel<'a>(theme: &Theme, title: String, focused: bool) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(theme.block_border(focused))
}

fn header_row<'a>(theme: &Theme, labels: &[&'a str]) -> Row<'a> {
    Row::new(
        labels
            .iter()
            .map(|l| Cell::from(*l).style(theme.header()))
            .collect::<Vec<_>>(),
    )
    .height(1)
}

fn history_chart<'a>(
    theme: &Theme,
    title: &'a str,
    data: &'a [(&'a str, u64)],
    color: Color,
    max: Option<u64>,
) -> BarChart<'a> {
    let chart = BarChart::default()
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        )
        .direction(Direction::Vertical)
        .bar_width(1)
        .bar_gap(1)
        .bar_style(Style::default().fg(color))
        .value_style(Style::default().fg(color).bg(color))
        .data(data);
    match max {
        Some(max) => chart.max(max),
        None => chart,
    }
}

fn bars(data: &[u64], width: u16) -> Vec<(&'static str, u64)> {
    tail_for_width(data, width)
        .iter()
        .map(|&v| ("", v))
        .collect()
}

pub fn render_overview(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let system = &app.snapshot.system;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Percentage(45),
            Constraint::Min(6),
        ])
        .split(area);

    let gauges = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(rows[0]);

    let gauge_specs = [
        (
            format!(" CPU ({} cores) ", system.cpu_count),
            system.cpu_percent,
            format_percent(system.cpu_percent),
        ),
        (
            " Memory ".to_string(),
            system.memory_percent,
            format!(
                "{} / {} ({})",
                format_bytes(system.memory_used),
                format_bytes(system.memory_total),
                format_percent(system.memory_percent)
            ),
        ),
        (
            " Disk ".to_string(),
            system.disk_percent,
            format!(
                "{} free of {} ({})",
                format_bytes(system.disk_free),
                format_bytes(system.disk_total),
                format_percent(system.disk_percent)
            ),
        ),
    ];

    for (slot, (title, value, label)) in gauges.iter().zip(gauge_specs) {
        frame.render_widget(
            colored_gauge(theme, value as f64, label).block(panel(theme, title, false)),
            *slot,
        );
    }

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[1]);

    let history = &app.snapshot.history;
    let cpu_data = bars(&history.cpu_as_u64(), charts[0].width);
    let mem_data = bars(&history.memory_as_u64(), charts[1].width);
    frame.render_widget(
        history_chart(theme, "CPU History", &cpu_data, theme.accent, Some(1000)),
        charts[0],
    );
    frame.render_widget(
        history_chart(theme, "Memory History", &mem_data, theme.warn, Some(1000)),
        charts[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[2]);

    let traffic = &app.snapshot.traffic;
    let down_data = bars(&history.download_as_u64(), bottom[0].width);
    let down_title = format!(
        "↓ {}  ↑ {}",
        format_speed(traffic.download_speed),
        format_speed(traffic.upload_speed)
    );
    frame.render_widget(
        history_chart(theme, &down_title, &down_data, theme.good, None),
        bottom[0],
    );

    let mut lines = vec![
        Line::from(format!("Uptime:      {}", format_uptime(system.uptime_secs))),
        Line::from(format!("Boot time:   {}", format_timestamp(system.boot_time))),
        Line::from(format!("Processes:   {}", system.process_count)),
        Line::from(format!(
            "Memory free: {}",
            format_bytes(system.memory_available)
        )),
        Line::from(format!(
            "Net total:   ↑ {}  ↓ {}",
            format_bytes(system.bytes_sent),
            format_bytes(system.bytes_recv)
        )),
    ];
    if let Some(battery) = &app.snapshot.battery {
        lines.push(Line::from(Span::styled(
            format!(
                "Battery:     {:.0}% {}",
                battery.percent,
                if battery.power_plugged { "(plugged in)" } else { "" }
            ),
            Style::default().fg(battery_color(theme, battery.percent)),
        )));
    }

    frame.render_widget(
        Paragraph::new(lines).block(panel(theme, " System ".to_string(), false)),
        bottom[1],
    );
}

pub fn render_processes(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;

    let (table_area, filter_area) = split_for_filter(area, app);

    let filter_note = if app.query.filter.is_empty() {
        String::new()
    } else {
        format!(" │ filter: {}", app.query.filter)
    };
    let title = format!(
        " Processes ({} of {}) │ sort: {}{} [s:sort /:filter Enter:details x/X:kill o:open] ",
        app.processes.len(),
        app.snapshot.processes.len(),
        app.query.sort.label(),
        filter_note
    );

    let header = header_row(
        theme,
        &["PID", "Name", "CPU %", "Mem %", "Memory", "Status", "Started"],
    );

    let rows: Vec<Row> = app
        .processes
        .iter()
        .map(|p| {
            Row::new(vec![
                Cell::from(p.pid.to_string()),
                Cell::from(p.name.clone()),
                Cell::from(format!("{:.1}", p.cpu_percent))
                    .style(Style::default().fg(theme.usage_color(p.cpu_percent as f64))),
                Cell::from(format!("{:.1}", p.memory_percent)),
                Cell::from(format_bytes(p.memory_bytes)),
                Cell::from(p.status.clone()),
                Cell::from(format_timestamp(p.start_time)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Percentage(30),
            Constraint::Length(7),
            Constraint::Length(7),
            Constraint::Length(11),
            Constraint::Length(10),
            Constraint::Length(20),
        ],
    )
    .header(header)
    .row_highlight_style(theme.selected())
    .block(panel(theme, title, true));

    let mut state = TableState::default().with_selected(if app.processes.is_empty() {
        None
    } else {
        Some(app.selected_process)
    });
    frame.render_stateful_widget(table, table_area, &mut state);
    render_filter_input(frame, filter_area, app);
}

/// Reserves a line under the table while a filter is being typed
fn split_for_filter(area: Rect, app: &MonitorApp) -> (Rect, Option<Rect>) {
    if app.filter_input.is_none() {
        return (area, None);
    }
    let split = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);
    (split[0], Some(split[1]))
}

fn render_filter_input(frame: &mut Frame, area: Option<Rect>, app: &MonitorApp) {
    if let (Some(area), Some(input)) = (area, &app.filter_input) {
        frame.render_widget(
            Paragraph::new(format!("{}█", input)).block(panel(
                &app.theme,
                " Filter (Enter: apply, Esc: cancel) ".to_string(),
                true,
            )),
            area,
        );
    }
}

pub fn render_network(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let snapshot = &app.snapshot;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    let traffic = &snapshot.traffic;
    let summary = vec![
        Line::from(format!("Upload:     {}", format_speed(traffic.upload_speed))),
        Line::from(format!("Download:   {}", format_speed(traffic.download_speed))),
        Line::from(format!("Sent:       {}", format_bytes(traffic.total_sent))),
        Line::from(format!("Received:   {}", format_bytes(traffic.total_recv))),
        Line::from(format!(
            "Packets:    ↑ {}  ↓ {}",
            traffic.packets_sent, traffic.packets_recv
        )),
    ];
    frame.render_widget(
        Paragraph::new(summary).block(panel(theme, " Traffic ".to_string(), false)),
        top[0],
    );

    let iface_rows: Vec<Row> = traffic
        .interfaces
        .iter()
        .map(|iface| {
            Row::new(vec![
                Cell::from(iface.name.clone()),
                Cell::from(format_speed(iface.upload_speed)),
                Cell::from(format_speed(iface.download_speed)),
                Cell::from(format_bytes(iface.total_sent)),
                Cell::from(format_bytes(iface.total_recv)),
                Cell::from(iface.errors.to_string()),
            ])
        })
        .collect();
    frame.render_widget(
        Table::new(
            iface_rows,
            [
                Constraint::Percentage(22),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
                Constraint::Percentage(16),
                Constraint::Percentage(10),
            ],
        )
        .header(header_row(theme, &["Interface", "Up", "Down", "Sent", "Recv", "Errors"]))
        .block(panel(theme, " Interfaces ".to_string(), false)),
        top[1],
    );

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(rows[1]);

    let (table_area, filter_area) = split_for_filter(bottom[0], app);

    let filter = &app.connection_filter;
    let text_note = if filter.text.is_empty() {
        String::new()
    } else {
        format!(" │ filter: {}", filter.text)
    };
    let mut title = format!(
        " Connections ({}) │ {}{}{} [u:protocol l:listening /:filter] ",
        app.connections.len(),
        filter.protocol.label(),
        if filter.listening_only { " │ listening" } else { "" },
        text_note
    );
    if let Some(err) = &snapshot.connections_error {
        title = format!("{}│ {} ", title, err);
    }

    let conn_rows: Vec<Row> = app
        .connections
        .iter()
        .map(|c| {
            Row::new(vec![
                Cell::from(c.protocol.to_string()),
                Cell::from(c.local_addr.to_string()),
                Cell::from(c.remote_display()),
                Cell::from(c.state.clone()),
                Cell::from(or_na(c.pid)),
            ])
        })
        .collect();

    let border = if snapshot.connections_error.is_some() {
        Style::default().fg(theme.critical)
    } else {
        theme.block_border(true)
    };

    let table = Table::new(
        conn_rows,
        [
            Constraint::Length(5),
            Constraint::Percentage(32),
            Constraint::Percentage(32),
            Constraint::Length(12),
            Constraint::Length(8),
        ],
    )
    .header(header_row(theme, &["Proto", "Local", "Remote", "State", "PID"]))
    .row_highlight_style(theme.selected())
    .block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border),
    );

    let mut state = TableState::default().with_selected(if app.connections.is_empty() {
        None
    } else {
        Some(app.selected_connection)
    });
    frame.render_stateful_widget(table, table_area, &mut state);
    render_filter_input(frame, filter_area, app);

    let traffic_rows: Vec<Row> = snapshot
        .process_traffic
        .iter()
        .map(|t| {
            Row::new(vec![
                Cell::from(t.name.clone()),
                Cell::from(t.connections_count.to_string()),
                Cell::from(format_bytes(t.bytes_read)),
                Cell::from(format_bytes(t.bytes_written)),
            ])
        })
        .collect();
    frame.render_widget(
        Table::new(
            traffic_rows,
            [
                Constraint::Percentage(40),
                Constraint::Length(6),
                Constraint::Percentage(25),
                Constraint::Percentage(25),
            ],
        )
        .header(header_row(theme, &["Process", "Conns", "Read", "Written"]))
        .block(panel(theme, " By process ".to_string(), false)),
        bottom[1],
    );
}

pub fn render_hardware(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let Some(hw) = &app.snapshot.hardware else {
        frame.render_widget(
            Paragraph::new("Collecting hardware information...")
                .block(panel(theme, " Hardware ".to_string(), false)),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(9),
            Constraint::Percentage(50),
            Constraint::Min(4),
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    let cpu = &hw.cpu;
    let mhz = |v: Option<u64>| or_na(v.map(|f| format_frequency(f as f64)));
    let cpu_lines = vec![
        Line::from(format!("Model:     {}", cpu.brand)),
        Line::from(format!("Vendor:    {}", cpu.vendor)),
        Line::from(format!("Arch:      {}", cpu.arch)),
        Line::from(format!(
            "Cores:     {} physical / {} logical",
            or_na(cpu.physical_cores),
            cpu.logical_cores
        )),
        Line::from(format!("Frequency: {}", mhz(cpu.average_frequency_mhz()))),
        Line::from(format!(
            "Range:     {} - {}",
            mhz(cpu.min_frequency_mhz),
            mhz(cpu.max_frequency_mhz)
        )),
    ];
    frame.render_widget(
        Paragraph::new(cpu_lines)
            .wrap(Wrap { trim: true })
            .block(panel(theme, " CPU ".to_string(), false)),
        top[0],
    );

    let mem = &hw.memory;
    let mem_lines = vec![
        Line::from(format!("Total:     {}", format_bytes(mem.total))),
        Line::from(format!("Used:      {}", format_bytes(mem.used))),
        Line::from(format!("Available: {}", format_bytes(mem.available))),
        Line::from(format!("Usage:     {}", format_percent(mem.percent))),
        Line::from(format!(
            "Swap:      {} / {} ({})",
            format_bytes(mem.swap_used),
            format_bytes(mem.swap_total),
            format_percent(mem.swap_percent)
        )),
        Line::from(format!("Swap free: {}", format_bytes(mem.swap_free))),
    ];
    frame.render_widget(
        Paragraph::new(mem_lines).block(panel(theme, " Memory ".to_string(), false)),
        top[1],
    );

    let disk_rows: Vec<Row> = hw
        .disks
        .iter()
        .map(|d| {
            Row::new(vec![
                Cell::from(d.device.clone()),
                Cell::from(d.mount_point.clone()),
                Cell::from(d.fs_type.clone()),
                Cell::from(if d.removable { "yes" } else { "no" }),
                Cell::from(format_bytes(d.total)),
                Cell::from(format_bytes(d.used)),
                Cell::from(format_bytes(d.free)),
                Cell::from(format_percent(d.percent))
                    .style(Style::default().fg(theme.usage_color(d.percent as f64))),
            ])
        })
        .collect();
    frame.render_widget(
        Table::new(
            disk_rows,
            [
                Constraint::Percentage(18),
                Constraint::Percentage(20),
                Constraint::Length(8),
                Constraint::Length(9),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(10),
                Constraint::Length(7),
            ],
        )
        .header(header_row(
            theme,
            &["Device", "Mount", "FS", "Removable", "Total", "Used", "Free", "Use"],
        ))
        .block(panel(theme, " Disks ".to_string(), false)),
        rows[1],
    );

    let iface_rows: Vec<Row> = hw
        .interfaces
        .iter()
        .map(|i| {
            let addresses = i
                .addresses
                .iter()
                .map(|a| a.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            Row::new(vec![
                Cell::from(i.name.clone()),
                Cell::from(i.mac.clone()),
                Cell::from(if addresses.is_empty() {
                    "N/A".to_string()
                } else {
                    addresses
                }),
            ])
        })
        .collect();
    frame.render_widget(
        Table::new(
            iface_rows,
            [
                Constraint::Percentage(20),
                Constraint::Length(19),
                Constraint::Min(20),
            ],
        )
        .header(header_row(theme, &["Interface", "MAC", "Addresses"]))
        .block(panel(theme, " Network interfaces ".to_string(), false)),
        rows[2],
    );
}

pub fn render_sensors(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let snapshot = &app.snapshot;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(8)])
        .split(area);

    if snapshot.temperatures.is_empty() {
        frame.render_widget(
            Paragraph::new("No temperature sensors detected")
                .style(Style::default().fg(theme.muted))
                .block(panel(theme, " Temperatures ".to_string(), false)),
            rows[0],
        );
    } else {
        let temp_rows: Vec<Row> = snapshot
            .temperatures
            .iter()
            .map(|t| {
                let celsius = |v: Option<f32>| or_na(v.map(|c| format!("{:.1}°C", c)));
                Row::new(vec![
                    Cell::from(t.label.clone()),
                    Cell::from(format!("{:.1}°C", t.current_celsius)).style(Style::default().fg(
                        temp_color(theme, t.current_celsius, t.high_celsius, t.critical_celsius),
                    )),
                    Cell::from(celsius(t.high_celsius)),
                    Cell::from(celsius(t.critical_celsius)),
                ])
            })
            .collect();
        frame.render_widget(
            Table::new(
                temp_rows,
                [
                    Constraint::Percentage(40),
                    Constraint::Percentage(20),
                    Constraint::Percentage(20),
                    Constraint::Percentage(20),
                ],
            )
            .header(header_row(theme, &["Sensor", "Current", "High", "Critical"]))
            .block(panel(theme, " Temperatures ".to_string(), false)),
            rows[0],
        );
    }

    let battery_block = panel(theme, " Battery ".to_string(), false);
    match &snapshot.battery {
        Some(battery) => {
            let inner = battery_block.inner(rows[1]);
            frame.render_widget(battery_block, rows[1]);

            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(0)])
                .split(inner);

            frame.render_widget(
                Gauge::default()
                    .gauge_style(
                        Style::default()
                            .fg(battery_color(theme, battery.percent))
                            .bg(theme.gauge_bg),
                    )
                    .ratio((battery.percent as f64 / 100.0).clamp(0.0, 1.0))
                    .label(format!("{:.0}%", battery.percent)),
                parts[0],
            );

            let lines = vec![
                Line::from(format!("State:     {}", battery.state)),
                Line::from(format!(
                    "Power:     {}",
                    if battery.power_plugged { "Plugged in" } else { "On battery" }
                )),
                Line::from(format!(
                    "Time left: {}",
                    format_battery_time(battery.seconds_left)
                )),
                Line::from(format!(
                    "Model:     {} {}",
                    battery.vendor.as_deref().unwrap_or(""),
                    battery.model.as_deref().unwrap_or("N/A")
                )),
            ];
            frame.render_widget(Paragraph::new(lines), parts[1]);
        }
        None => {
            frame.render_widget(
                Paragraph::new("No battery detected")
                    .style(Style::default().fg(theme.muted))
                    .block(battery_block),
                rows[1],
            );
        }
    }
}

pub fn render_system(frame: &mut Frame, area: Rect, app: &MonitorApp) {
    let theme = &app.theme;
    let Some(details) = &app.system_details else {
        frame.render_widget(
            Paragraph::new("Loading system details...")
                .block(panel(theme, " System ".to_string(), false)),
            area,
        );
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(10), Constraint::Min(4)])
        .split(area);

    let lines = vec![
        Line::from(format!("Host name:  {}", details.host_name)),
        Line::from(format!("OS:         {}", details.os_name)),
        Line::from(format!("Version:    {}", details.os_version)),
        Line::from(format!("Kernel:     {}", details.kernel_version)),
        Line::from(format!("Arch:       {}", details.arch)),
        Line::from(format!("Boot time:  {}", format_timestamp(details.boot_time))),
        Line::from(format!(
            "Users:      {}",
            if details.users.is_empty() {
                "N/A".to_string()
            } else {
                details.users.join(", ")
            }
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(panel(theme, " System [r:reload] ".to_string(), false)),
        rows[0],
    );

    let env_rows: Vec<Row> = details
        .environment
        .iter()
        .map(|(key, value)| Row::new(vec![Cell::from(key.clone()), Cell::from(value.clone())]))
        .collect();
    frame.render_widget(
        Table::new(env_rows, [Constraint::Length(22), Constraint::Min(10)])
            .header(header_row(theme, &["Variable", "Value"]))
            .block(panel(theme, " Environment ".to_string(), false)),
        rows[1],
    );
}
