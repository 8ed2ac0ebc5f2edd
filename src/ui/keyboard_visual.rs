//! Visual keyboard layout rendering

use super::theme::{rainbow, ThemeColors};
use crate::keyboard::{KeyCode, KeyDescriptor, KeyEventTracker, Layout};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

/// Narrowest and widest cell count per key unit
const MIN_UNIT: u16 = 3;
const MAX_UNIT: u16 = 6;

/// Renders a layout table with tracker highlighting
pub struct KeyboardVisual<'a> {
    layout: &'a Layout,
    tracker: &'a KeyEventTracker,
    colors: ThemeColors,
    /// Rainbow phase when RGB mode is on
    rgb_phase: Option<f32>,
}

impl<'a> KeyboardVisual<'a> {
    pub fn new(layout: &'a Layout, tracker: &'a KeyEventTracker, colors: ThemeColors) -> Self {
        Self {
            layout,
            tracker,
            colors,
            rgb_phase: None,
        }
    }

    pub fn rgb(mut self, phase: Option<f32>) -> Self {
        self.rgb_phase = phase;
        self
    }

    /// Cells per key unit that fit `width`, if any
    fn unit_width(&self, width: u16) -> Option<u16> {
        let units = self.layout.width().ceil().max(1.0) as u16;
        let unit = (width / units).min(MAX_UNIT);
        (unit >= MIN_UNIT).then_some(unit)
    }

    fn key_style(&self, key: &KeyDescriptor) -> Style {
        let code = KeyCode::from(key.code);
        if self.tracker.is_active_key(&code) {
            let bg = match self.rgb_phase {
                Some(phase) => rainbow(key.x, phase),
                None => self.colors.key_active,
            };
            Style::default()
                .bg(bg)
                .fg(self.colors.key_text_active)
                .add_modifier(Modifier::BOLD)
        } else if self.tracker.is_tested_key(&code) {
            Style::default().bg(self.colors.key_tested).fg(self.colors.key_text)
        } else {
            Style::default().bg(self.colors.key_idle).fg(self.colors.key_text)
        }
    }

    fn render_key(&self, buf: &mut Buffer, area: Rect, unit: u16, key: &KeyDescriptor) {
        let x = area.x + (key.x * unit as f32).round() as u16;
        let y = area.y + key.y.round() as u16;
        // One cell of spacing between neighbours
        let w = ((key.w * unit as f32).round() as u16).saturating_sub(1).max(1);
        let rows = key.h.round().max(1.0) as u16;
        let style = self.key_style(key);

        let label: String = key.label.chars().take(w as usize).collect();
        for row in 0..rows {
            let ry = y + row;
            if ry >= area.y + area.height || x + w > area.x + area.width {
                continue;
            }
            let text = if row == 0 { label.as_str() } else { "" };
            buf.set_string(x, ry, format!("{:^w$}", text, w = w as usize), style);
        }
    }
}

impl<'a> Widget for KeyboardVisual<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let rows = self.layout.height().ceil() as u16;
        let unit = match self.unit_width(area.width) {
            Some(unit) if area.height >= rows => unit,
            _ => {
                buf.set_string(
                    area.x,
                    area.y,
                    "⌨ Window too small",
                    Style::default().fg(self.colors.dim),
                );
                return;
            }
        };

        // Center horizontally
        let used = (self.layout.width() * unit as f32).ceil() as u16;
        let inner = Rect {
            x: area.x + area.width.saturating_sub(used) / 2,
            width: used.min(area.width),
            ..area
        };

        for key in &self.layout.keys {
            self.render_key(buf, inner, unit, key);
        }
    }
}
