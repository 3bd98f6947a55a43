use ratatui::{prelude::*, widgets::Gauge};

use super::theme::Theme;

/// Create a gauge coloured by usage thresholds
pub fn colored_gauge<'a>(theme: &Theme, value: f64, label: String) -> Gauge<'a> {
    let value = value.clamp(0.0, 100.0);
    Gauge::default()
        .gauge_style(
            Style::default()
                .fg(theme.usage_color(value))
                .bg(theme.gauge_bg),
        )
        .ratio(value / 100.0)
        .label(label)
}

/// Colour for a temperature, relative to the sensor's limits when known
pub fn temp_color(theme: &Theme, temp: f32, high: Option<f32>, critical: Option<f32>) -> Color {
    if let Some(crit) = critical.filter(|c| *c > 0.0) {
        if temp >= crit {
            return theme.critical;
        }
    }
    if let Some(high) = high.filter(|h| *h > 0.0) {
        if temp >= high {
            return theme.high;
        }
    }
    match temp {
        t if t < 50.0 => theme.good,
        t if t < 70.0 => theme.warn,
        t if t < 85.0 => theme.high,
        _ => theme.critical,
    }
}

/// Colour for a battery charge level
pub fn battery_color(theme: &Theme, percent: f32) -> Color {
    if percent < 20.0 {
        theme.critical
    } else if percent < 50.0 {
        theme.warn
    } else {
        theme.good
    }
}

/// Keep the newest points that fit `width` columns at one column per bar plus a gap
pub fn tail_for_width(data: &[u64], width: u16) -> &[u64] {
    let max_bars = (width.saturating_sub(2) as usize) / 2;
    &data[data.len().saturating_sub(max_bars)..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_color_uses_limits() {
        let theme = Theme::default();
        assert_eq!(temp_color(&theme, 40.0, None, None), theme.good);
        assert_eq!(temp_color(&theme, 66.0, Some(65.0), None), theme.high);
        assert_eq!(temp_color(&theme, 90.0, Some(80.0), Some(90.0)), theme.critical);
    }

    #[test]
    fn test_tail_for_width() {
        let data: Vec<u64> = (0..60).collect();
        assert_eq!(tail_for_width(&data, 12), &data[55..]);
        assert_eq!(tail_for_width(&data, 200).len(), 60);
        assert!(tail_for_width(&data, 0).is_empty());
    }
}
