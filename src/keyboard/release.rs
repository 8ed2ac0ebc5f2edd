//! Synthetic key-up for terminals without release reporting
//!
//! Legacy terminal input only reports presses. Each press (and auto-repeat)
//! pushes a per-key deadline forward; once a key has been quiet for the hold
//! window it is treated as released.

use super::{KeyCode, KeyInfo};
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Default hold window before a silent key counts as released
pub const DEFAULT_HOLD: Duration = Duration::from_millis(150);

pub struct SyntheticRelease {
    hold: Duration,
    pending: HashMap<KeyCode, (KeyInfo, Instant)>,
}

impl SyntheticRelease {
    pub fn new(hold: Duration) -> Self {
        Self {
            hold,
            pending: HashMap::new(),
        }
    }

    /// Note a press or repeat of `info` at `now`
    pub fn note_press(&mut self, info: &KeyInfo, now: Instant) {
        self.pending
            .insert(info.code.clone(), (info.clone(), now + self.hold));
    }

    /// Remove and return keys whose hold window has elapsed
    pub fn expired(&mut self, now: Instant) -> Vec<KeyInfo> {
        let due: Vec<KeyCode> = self
            .pending
            .iter()
            .filter(|(_, (_, deadline))| *deadline <= now)
            .map(|(code, _)| code.clone())
            .collect();

        due.into_iter()
            .filter_map(|code| self.pending.remove(&code).map(|(info, _)| info))
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

impl Default for SyntheticRelease {
    fn default() -> Self {
        Self::new(DEFAULT_HOLD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keyboard::test_helpers::info;

    #[test]
    fn key_releases_after_hold_window() {
        let mut release = SyntheticRelease::default();
        let t0 = Instant::now();
        release.note_press(&info("KeyA"), t0);

        assert!(release.expired(t0 + Duration::from_millis(100)).is_empty());
        let released = release.expired(t0 + DEFAULT_HOLD);
        assert_eq!(released.len(), 1);
        assert_eq!(released[0].code.as_str(), "KeyA");
        assert_eq!(release.pending_count(), 0);
    }

    #[test]
    fn repeat_extends_deadline() {
        let mut release = SyntheticRelease::default();
        let t0 = Instant::now();
        release.note_press(&info("KeyA"), t0);
        release.note_press(&info("KeyA"), t0 + Duration::from_millis(100));

        assert!(release.expired(t0 + Duration::from_millis(200)).is_empty());
        assert_eq!(release.expired(t0 + Duration::from_millis(250)).len(), 1);
    }

    #[test]
    fn keys_expire_independently() {
        let mut release = SyntheticRelease::new(Duration::from_millis(50));
        let t0 = Instant::now();
        release.note_press(&info("KeyA"), t0);
        release.note_press(&info("KeyB"), t0 + Duration::from_millis(40));

        let first = release.expired(t0 + Duration::from_millis(60));
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].code.as_str(), "KeyA");
        assert_eq!(release.pending_count(), 1);
    }
}
