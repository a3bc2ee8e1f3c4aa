//! Color palette and shared styles for the single page.

use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Cyan;
pub const ERROR_RED: Color = Color::Red;
pub const INFO_YELLOW: Color = Color::Yellow;
pub const DIM: Color = Color::DarkGray;
pub const TEXT: Color = Color::Gray;

pub fn title_style() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ACCENT)
}

pub fn border_default() -> Style {
    Style::default().fg(DIM)
}

pub fn key_hint() -> Style {
    Style::default().fg(DIM)
}

pub fn error_style() -> Style {
    Style::default().fg(ERROR_RED)
}

/// Informational messages ("no results"), distinct from hard failures.
pub fn info_style() -> Style {
    Style::default().fg(INFO_YELLOW)
}

/// The item currently applied as the axis selection.
pub fn selected_item() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

/// The row under the cursor in a list or table.
pub fn highlight() -> Style {
    Style::default().add_modifier(Modifier::REVERSED)
}
