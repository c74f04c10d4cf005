//! Color constants and axis helpers for the TUI.

use ratatui::style::Color;

/// Simulated SoC line.
pub const SOC_COLOR: Color = Color::Cyan;
/// Closed-form SoC line.
pub const ANALYTICAL_COLOR: Color = Color::DarkGray;
/// SoC ceiling line.
pub const CEILING_COLOR: Color = Color::Red;
pub const SOC_HIGH: Color = Color::Green;
pub const SOC_MID: Color = Color::Yellow;
pub const SOC_LOW: Color = Color::Red;
pub const HEADER_FG: Color = Color::White;
pub const HEADER_BG: Color = Color::DarkGray;
pub const FOOTER_FG: Color = Color::DarkGray;
/// Shunt-active indicator.
pub const SHUNT_ACTIVE: Color = Color::Magenta;
pub const ERROR_FG: Color = Color::Red;

/// Gauge color for a state of charge.
pub fn soc_color(soc: f64) -> Color {
    if soc >= 0.5 {
        SOC_HIGH
    } else if soc >= 0.2 {
        SOC_MID
    } else {
        SOC_LOW
    }
}

/// Y-axis bounds covering every series with 10% padding.
pub fn auto_bounds_y(series: &[&[(f64, f64)]]) -> [f64; 2] {
    let all = series.iter().flat_map(|s| s.iter()).map(|&(_, y)| y);
    let min = all.clone().fold(f64::INFINITY, f64::min);
    let max = all.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 100.0];
    }
    let range = (max - min).max(1.0);
    let pad = range * 0.1;
    [min - pad, max + pad]
}
