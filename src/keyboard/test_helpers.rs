//! Shared test utilities for keyboard modules
//!
//! Provides builders for synthetic key events keyed by physical code.

use super::{KeyEvent, KeyInfo};
use std::time::Instant;

/// Key info for a physical code with a placeholder display character.
pub fn info(code: &str) -> KeyInfo {
    let display = code.strip_prefix("Key").unwrap_or(code).to_lowercase();
    KeyInfo::new(display, code, 0)
}

/// Creates a key-down event stamped `Instant::now()`.
pub fn down(code: &str) -> KeyEvent {
    KeyEvent::down(info(code), Instant::now())
}

/// Creates a key-up event stamped `Instant::now()`.
pub fn up(code: &str) -> KeyEvent {
    KeyEvent::up(info(code), Instant::now())
}

/// Creates a key-down event with a specific timestamp.
pub fn down_at(code: &str, timestamp: Instant) -> KeyEvent {
    KeyEvent::down(info(code), timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::KeyEventKind;

    #[test]
    fn down_creates_down_event() {
        let event = down("KeyA");
        assert_eq!(event.code.as_str(), "KeyA");
        assert_eq!(event.kind, KeyEventKind::Down);
        assert_eq!(event.display_char, "a");
    }

    #[test]
    fn up_creates_up_event() {
        let event = up("Space");
        assert_eq!(event.kind, KeyEventKind::Up);
        assert_eq!(event.display_char, "space");
    }

    #[test]
    fn down_at_uses_provided_timestamp() {
        let ts = Instant::now();
        assert_eq!(down_at("KeyZ", ts).timestamp, ts);
    }
}
