//! Keyboard state tracking

use super::{Disposition, KeyCode, KeyEvent, KeyEventKind};
use crate::utils::BoundedLog;
use log::{debug, trace};
use std::collections::HashSet;
use std::time::Instant;

/// Number of key-down events kept in the history log
pub const EVENT_LOG_CAPACITY: usize = 50;

/// Everything the tracker knows about the current session
#[derive(Debug, Clone)]
pub struct TrackerState {
    /// Keys currently held down
    pub active_keys: HashSet<KeyCode>,
    /// Every key pressed since the last reset
    pub tested_keys: HashSet<KeyCode>,
    /// Recent key-downs, newest first
    pub event_log: BoundedLog<KeyEvent>,
    pub last_event: Option<KeyEvent>,
    /// Time of the first key-down since the last reset
    pub session_start: Option<Instant>,
    /// Key-downs since the last reset
    pub press_count: u64,
}

impl Default for TrackerState {
    fn default() -> Self {
        Self {
            active_keys: HashSet::new(),
            tested_keys: HashSet::new(),
            event_log: BoundedLog::new(EVENT_LOG_CAPACITY),
            last_event: None,
            session_start: None,
            press_count: 0,
        }
    }
}

/// Tracks held and tested keys from raw key-down/key-up signals.
///
/// The tracker starts active. While inactive every signal is passed through
/// untouched, which lets the host suspend tracking while another mode owns
/// the keyboard.
pub struct KeyEventTracker {
    enabled: bool,
    state: TrackerState,
}

impl KeyEventTracker {
    pub fn new() -> Self {
        Self {
            enabled: true,
            state: TrackerState::default(),
        }
    }

    /// Enable or suspend tracking. State is kept across suspensions.
    pub fn activate(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!("key tracker {}", if enabled { "started" } else { "stopped" });
        }
        self.enabled = enabled;
    }

    pub fn start(&mut self) {
        self.activate(true);
    }

    pub fn stop(&mut self) {
        self.activate(false);
    }

    pub fn is_active(&self) -> bool {
        self.enabled
    }

    /// Dispatch an event by its kind
    pub fn process_event(&mut self, event: KeyEvent) -> Disposition {
        match event.kind {
            KeyEventKind::Down => self.on_key_down(event),
            KeyEventKind::Up => self.on_key_up(&event.code),
        }
    }

    /// Record a key-down
    pub fn on_key_down(&mut self, event: KeyEvent) -> Disposition {
        if !self.enabled {
            return Disposition::Pass;
        }

        let state = &mut self.state;
        if state.session_start.is_none() {
            state.session_start = Some(event.timestamp);
        }
        state.press_count += 1;
        state.active_keys.insert(event.code.clone());
        state.tested_keys.insert(event.code.clone());
        trace!("key down {} ({} held)", event.code, state.active_keys.len());

        state.event_log.push(event.clone());
        state.last_event = Some(event);
        Disposition::Suppress
    }

    /// Record a key-up. Tested keys are never removed here.
    pub fn on_key_up(&mut self, code: &KeyCode) -> Disposition {
        if !self.enabled {
            return Disposition::Pass;
        }
        self.state.active_keys.remove(code);
        trace!("key up {code}");
        Disposition::Suppress
    }

    /// Clear the session history. Held keys stay active.
    pub fn on_reset(&mut self) {
        let state = &mut self.state;
        state.tested_keys.clear();
        state.event_log.clear();
        state.last_event = None;
        state.press_count = 0;
        state.session_start = None;
        debug!("key tracker reset ({} keys still held)", state.active_keys.len());
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    /// Key presses per second since the session started, zero before the first press
    pub fn throughput(&self, now: Instant) -> f64 {
        let Some(start) = self.state.session_start else {
            return 0.0;
        };
        let elapsed = now.saturating_duration_since(start).as_secs_f64();
        if elapsed > 0.0 {
            self.state.press_count as f64 / elapsed
        } else {
            0.0
        }
    }

    pub fn is_active_key(&self, code: &KeyCode) -> bool {
        self.state.active_keys.contains(code)
    }

    pub fn is_tested_key(&self, code: &KeyCode) -> bool {
        self.state.tested_keys.contains(code)
    }

    /// Current rollover count
    pub fn active_count(&self) -> usize {
        self.state.active_keys.len()
    }

    pub fn tested_count(&self) -> usize {
        self.state.tested_keys.len()
    }
}

impl Default for KeyEventTracker {
    fn default() -> Self {
        Self::new()
    }
}
