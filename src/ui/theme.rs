//! Theme color definitions for the UI

use crate::config::Theme;
use ratatui::style::Color;

/// Color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    /// Primary foreground text
    pub fg: Color,
    /// Dimmed/secondary text and borders
    pub dim: Color,
    /// Accent color (headings, key names)
    pub accent: Color,
    /// Time while running
    pub running: Color,
    /// Time while stopped
    pub stopped: Color,
    /// Warnings such as buffer overflow
    pub warning: Color,
}

impl ThemeColors {
    /// Create a color palette for the given theme variant
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            fg: Color::Rgb(200, 200, 210),
            dim: Color::Rgb(90, 90, 110),
            accent: Color::Rgb(80, 200, 220),
            running: Color::Rgb(80, 200, 120),
            stopped: Color::Rgb(240, 180, 80),
            warning: Color::Rgb(240, 90, 100),
        }
    }

    pub fn light() -> Self {
        Self {
            fg: Color::Rgb(40, 40, 50),
            dim: Color::Rgb(140, 140, 155),
            accent: Color::Rgb(0, 120, 160),
            running: Color::Rgb(20, 140, 60),
            stopped: Color::Rgb(180, 110, 0),
            warning: Color::Rgb(200, 40, 50),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn themes_differ() {
        let dark = ThemeColors::from_theme(Theme::Dark);
        let light = ThemeColors::from_theme(Theme::Light);
        assert_ne!(dark.fg, light.fg);
        assert_ne!(dark.running, dark.stopped);
    }
}
