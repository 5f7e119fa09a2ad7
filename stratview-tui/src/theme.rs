//! Color tokens and style helpers for the dashboard.
//!
//! Dark terminal palette: cyan accent for focus, green/pink for gains and
//! losses, steel blue for secondary text.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(POSITIVE)
}

pub fn negative() -> Style {
    Style::default().fg(NEGATIVE)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn neutral() -> Style {
    Style::default().fg(NEUTRAL)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

/// Sign-keyed style for returns and PnL values. Only strictly positive
/// values read as gains; a flat zero renders as a loss color.
pub fn value_style(value: f64) -> Style {
    if value > 0.0 {
        positive()
    } else {
        negative()
    }
}

/// Pagination control style: muted when the boundary disables it.
pub fn control_style(enabled: bool) -> Style {
    if enabled {
        accent()
    } else {
        muted().add_modifier(Modifier::DIM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_style_keyed_to_sign() {
        assert_eq!(value_style(0.05), positive());
        assert_eq!(value_style(0.0), negative());
        assert_eq!(value_style(-0.01), negative());
    }

    #[test]
    fn disabled_controls_are_dimmed() {
        assert_ne!(control_style(true), control_style(false));
    }
}
