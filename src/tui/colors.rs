//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);
pub const GOLD: Color = Color::Rgb(255, 215, 0);
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Header and status bar background.
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);

/// Foreground for a pending task's row.
pub fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::Low => Color::Gray,
        Priority::Medium => Color::White,
        Priority::High => GOLD,
        Priority::Urgent => Color::LightRed,
    }
}
