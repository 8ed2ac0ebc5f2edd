//! Keyboard event types

use super::{KeyCode, KeyInfo, KeyLocation};
use chrono::{DateTime, Local};
use std::time::Instant;

/// Type of keyboard event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEventKind {
    /// Key was pressed down (auto-repeat included)
    Down,
    /// Key was released
    Up,
}

/// Whether a handler took ownership of a keystroke.
///
/// `Suppress` means the platform default action (scrolling, focus changes,
/// terminal shortcuts) must not run for this key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Pass,
    Suppress,
}

impl Disposition {
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Self::Suppress)
    }
}

/// An immutable keyboard event record
#[derive(Debug, Clone)]
pub struct KeyEvent {
    /// What the key produced
    pub display_char: String,
    /// Physical key position
    pub code: KeyCode,
    /// Legacy numeric key code
    pub numeric_code: u32,
    pub location: KeyLocation,
    /// Monotonic time used for throughput
    pub timestamp: Instant,
    /// Wall clock time for the history view
    pub wall_time: DateTime<Local>,
    pub kind: KeyEventKind,
}

impl KeyEvent {
    pub fn new(info: KeyInfo, kind: KeyEventKind, timestamp: Instant) -> Self {
        Self {
            display_char: info.display_char,
            code: info.code,
            numeric_code: info.numeric_code,
            location: info.location,
            timestamp,
            wall_time: Local::now(),
            kind,
        }
    }

    pub fn down(info: KeyInfo, timestamp: Instant) -> Self {
        Self::new(info, KeyEventKind::Down, timestamp)
    }

    pub fn up(info: KeyInfo, timestamp: Instant) -> Self {
        Self::new(info, KeyEventKind::Up, timestamp)
    }

    /// Label for the history view ("Space" instead of a blank)
    pub fn display_label(&self) -> &str {
        if self.display_char == " " {
            "Space"
        } else {
            &self.display_char
        }
    }
}
