//! Parrot/neon style tokens for the Tickerboard TUI.
//!
//! # Color Palette
//! - **Accent**: Electric cyan (focus, highlights)
//! - **Positive**: Neon green (selected, success)
//! - **Negative**: Hot pink (errors, failed instruments)
//! - **Warning**: Neon orange (user-correctable conditions)
//! - **Neutral**: Cool purple (headings)
//! - **Muted**: Steel blue (secondary text)

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);
pub const TEXT_PRIMARY: Color = Color::White;

/// One colour per chart series, cycled by position in the sorted view.
const SERIES: [Color; 6] = [
    ACCENT,
    Color::Rgb(255, 215, 0),
    POSITIVE,
    NEGATIVE,
    NEUTRAL,
    WARNING,
];

pub fn series_color(index: usize) -> Color {
    SERIES[index % SERIES.len()]
}

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
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

pub fn text() -> Style {
    Style::default().fg(TEXT_PRIMARY)
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
        neutral()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn series_colors_cycle() {
        assert_eq!(series_color(0), ACCENT);
        assert_eq!(series_color(SERIES.len()), ACCENT);
        assert_ne!(series_color(0), series_color(1));
    }

    #[test]
    fn focus_styles_differ() {
        assert_ne!(panel_border(true), panel_border(false));
        assert_ne!(panel_title(true), panel_title(false));
    }
}
