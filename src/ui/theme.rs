//! Color palettes for the UI
//!
//! Dark and light palettes switch at runtime. RGB mode replaces key colours
//! with a hue sweep across the keyboard.

use crate::config::Theme;
use ratatui::style::Color;

/// Complete color palette for the UI
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    pub bg: Color,
    pub fg: Color,
    /// Secondary text and borders
    pub dim: Color,
    /// Headings, active tab, caret
    pub accent: Color,
    /// Correct words, good stats
    pub correct: Color,
    /// Pause overlay, warnings
    pub warn: Color,
    /// Mistyped words
    pub incorrect: Color,
    /// Key that has never been pressed
    pub key_idle: Color,
    /// Key currently held
    pub key_active: Color,
    /// Key pressed at least once since reset
    pub key_tested: Color,
    pub key_text: Color,
    pub key_text_active: Color,
}

impl ThemeColors {
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self::dark(),
            Theme::Light => Self::light(),
        }
    }

    pub fn dark() -> Self {
        Self {
            bg: Color::Rgb(18, 18, 24),
            fg: Color::Rgb(214, 214, 222),
            dim: Color::Rgb(96, 96, 118),
            accent: Color::Rgb(226, 183, 20),
            correct: Color::Rgb(110, 210, 140),
            warn: Color::Rgb(245, 170, 70),
            incorrect: Color::Rgb(235, 85, 95),
            key_idle: Color::Rgb(38, 38, 48),
            key_active: Color::Rgb(226, 183, 20),
            key_tested: Color::Rgb(60, 74, 96),
            key_text: Color::Rgb(176, 176, 188),
            key_text_active: Color::Rgb(18, 18, 24),
        }
    }

    pub fn light() -> Self {
        Self {
            bg: Color::Rgb(242, 242, 246),
            fg: Color::Rgb(32, 32, 42),
            dim: Color::Rgb(132, 132, 150),
            accent: Color::Rgb(170, 120, 0),
            correct: Color::Rgb(30, 140, 70),
            warn: Color::Rgb(190, 110, 0),
            incorrect: Color::Rgb(200, 45, 55),
            key_idle: Color::Rgb(222, 222, 230),
            key_active: Color::Rgb(170, 120, 0),
            key_tested: Color::Rgb(186, 204, 228),
            key_text: Color::Rgb(48, 48, 60),
            key_text_active: Color::Rgb(255, 255, 255),
        }
    }
}

/// Rainbow colour for a key at horizontal position `x` (key units).
///
/// `phase` shifts the sweep so the host can animate it.
pub fn rainbow(x: f32, phase: f32) -> Color {
    let hue = (x * 20.0 + phase).rem_euclid(360.0);
    hsv_to_rgb(hue, 0.75, 0.95)
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> Color {
    let chroma = value * saturation;
    let sector = hue / 60.0;
    let x = chroma * (1.0 - (sector.rem_euclid(2.0) - 1.0).abs());
    let (r, g, b) = match sector as u32 {
        0 => (chroma, x, 0.0),
        1 => (x, chroma, 0.0),
        2 => (0.0, chroma, x),
        3 => (0.0, x, chroma),
        4 => (x, 0.0, chroma),
        _ => (chroma, 0.0, x),
    };
    let m = value - chroma;
    let channel = |c: f32| ((c + m) * 255.0).round() as u8;
    Color::Rgb(channel(r), channel(g), channel(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_theme_selects_correct_palette() {
        let dark = ThemeColors::from_theme(Theme::Dark);
        let light = ThemeColors::from_theme(Theme::Light);
        assert_eq!(dark.bg, ThemeColors::dark().bg);
        assert_ne!(dark.bg, light.bg);
    }

    #[test]
    fn active_and_tested_keys_differ() {
        for colors in [ThemeColors::dark(), ThemeColors::light()] {
            assert_ne!(colors.key_active, colors.key_tested);
            assert_ne!(colors.key_tested, colors.key_idle);
        }
    }

    #[test]
    fn rainbow_starts_red() {
        assert_eq!(rainbow(0.0, 0.0), Color::Rgb(242, 61, 61));
    }

    #[test]
    fn rainbow_wraps_hue() {
        assert_eq!(rainbow(0.0, 360.0), rainbow(0.0, 0.0));
        assert_eq!(rainbow(18.0, 0.0), rainbow(0.0, 0.0));
        assert_ne!(rainbow(3.0, 0.0), rainbow(0.0, 0.0));
    }
}
