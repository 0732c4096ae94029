//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::{PriorityBand, StatusTone};

/// Brand accent, used for in-progress work and medium priorities.
pub const BRAND: Color = Color::Rgb(255, 140, 0);
pub const SUCCESS: Color = Color::Rgb(34, 160, 80);
pub const DANGER: Color = Color::Rgb(210, 45, 45);
pub const NEUTRAL: Color = Color::Gray;
/// Highlighted borders of focused fields.
pub const GOLD: Color = Color::Rgb(255, 215, 0);

pub fn tone_color(tone: StatusTone) -> Color {
    match tone {
        StatusTone::Success => SUCCESS,
        StatusTone::Brand => BRAND,
        StatusTone::Danger => DANGER,
        StatusTone::Neutral => NEUTRAL,
    }
}

pub fn band_color(band: PriorityBand) -> Color {
    match band {
        PriorityBand::High => DANGER,
        PriorityBand::Medium => BRAND,
        PriorityBand::Low => SUCCESS,
    }
}
