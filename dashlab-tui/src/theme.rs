//! Parrot/neon theme tokens for the DashLab TUI
//!
//! # Color Palette
//! - **Background**: Near-black / deep charcoal (base layer)
//! - **Accent**: Electric cyan (primary highlights, focus, price line)
//! - **Positive**: Neon green (gains, successful loads)
//! - **Negative**: Hot pink (losses, failures)
//! - **Warning**: Neon orange (empty results, alerts)
//! - **Neutral**: Cool purple (density overlay, secondary series)
//! - **Muted**: Steel blue (axes, hints, disabled)

use dashlab_core::status::Severity;
use ratatui::style::{Color, Modifier, Style};

pub const ACCENT: Color = Color::Rgb(0, 255, 255);
pub const POSITIVE: Color = Color::Rgb(0, 255, 128);
pub const NEGATIVE: Color = Color::Rgb(255, 20, 147);
pub const WARNING: Color = Color::Rgb(255, 140, 0);
pub const NEUTRAL: Color = Color::Rgb(147, 112, 219);
pub const MUTED: Color = Color::Rgb(100, 149, 237);

/// Parrot/neon theme for DashLab TUI
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Electric cyan accent (focus, highlights)
    pub accent: Color,
    /// Neon green (gains, success)
    pub positive: Color,
    /// Hot pink (losses, errors)
    pub negative: Color,
    /// Neon orange (warnings)
    pub warning: Color,
    /// Cool purple (secondary series)
    pub neutral: Color,
    /// Steel blue (muted text, axes)
    pub muted: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    pub fn parrot_neon() -> Self {
        Self {
            background: Color::Rgb(18, 18, 20),
            accent: ACCENT,
            positive: POSITIVE,
            negative: NEGATIVE,
            warning: WARNING,
            neutral: NEUTRAL,
            muted: MUTED,
        }
    }

    /// Price change color (up = green, down = pink)
    pub fn change_color(&self, change: f64) -> Color {
        if change >= 0.0 {
            self.positive
        } else {
            self.negative
        }
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.positive,
            Severity::Info => self.accent,
            Severity::Warning => self.warning,
            Severity::Error => self.negative,
        }
    }
}

// Style shorthands for the screen renderers.

pub fn accent() -> Style {
    Style::default().fg(ACCENT)
}

pub fn muted() -> Style {
    Style::default().fg(MUTED)
}

pub fn warning() -> Style {
    Style::default().fg(WARNING)
}

pub fn severity(severity: Severity) -> Style {
    Style::default().fg(Theme::default().severity_color(severity))
}

pub fn panel_border(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT)
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        muted()
    }
}
