use ratatui::style::{Color, Modifier, Style};

use crate::core::config::ThemeKind;

/// Colour palette applied to every view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub kind: ThemeKind,
    pub accent: Color,
    pub border: Color,
    pub text: Color,
    pub muted: Color,
    pub selection_bg: Color,
    pub gauge_bg: Color,
    pub popup_bg: Color,
    pub good: Color,
    pub warn: Color,
    pub high: Color,
    pub critical: Color,
}

impl Theme {
    pub fn for_kind(kind: ThemeKind) -> Self {
        match kind {
            ThemeKind::Classic => Self {
                kind,
                accent: Color::Cyan,
                border: Color::Gray,
                text: Color::White,
                muted: Color::DarkGray,
                selection_bg: Color::DarkGray,
                gauge_bg: Color::Black,
                popup_bg: Color::DarkGray,
                good: Color::Cyan,
                warn: Color::LightYellow,
                high: Color::LightRed,
                critical: Color::Red,
            },
            ThemeKind::Fluent => Self {
                kind,
                accent: Color::Rgb(0, 120, 212),
                border: Color::Rgb(96, 94, 92),
                text: Color::Rgb(243, 242, 241),
                muted: Color::Rgb(161, 159, 157),
                selection_bg: Color::Rgb(0, 90, 158),
                gauge_bg: Color::Rgb(41, 40, 39),
                popup_bg: Color::Rgb(32, 31, 30),
                good: Color::Rgb(16, 124, 16),
                warn: Color::Rgb(255, 185, 0),
                high: Color::Rgb(247, 99, 12),
                critical: Color::Rgb(209, 52, 56),
            },
        }
    }

    pub fn title(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn block_border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.border)
        }
    }

    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .bg(self.selection_bg)
            .fg(self.text)
            .add_modifier(Modifier::BOLD)
    }

    /// Colour for a 0-100 usage value
    pub fn usage_color(&self, percent: f64) -> Color {
        match percent {
            v if v < 50.0 => self.good,
            v if v < 75.0 => self.warn,
            v if v < 90.0 => self.high,
            _ => self.critical,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::for_kind(ThemeKind::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        let classic = Theme::for_kind(ThemeKind::Classic);
        let fluent = Theme::for_kind(ThemeKind::Fluent);
        assert_ne!(classic.accent, fluent.accent);
        assert_eq!(fluent.kind, ThemeKind::Fluent);
    }

    #[test]
    fn test_usage_thresholds() {
        let theme = Theme::default();
        assert_eq!(theme.usage_color(10.0), theme.good);
        assert_eq!(theme.usage_color(60.0), theme.warn);
        assert_eq!(theme.usage_color(80.0), theme.high);
        assert_eq!(theme.usage_color(95.0), theme.critical);
    }
}
