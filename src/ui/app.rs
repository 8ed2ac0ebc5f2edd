//! Main application state and logic
//!
//! `App` owns the tracker and the speed test engine and routes terminal key
//! events to whichever one the current view belongs to. Ctrl chords are
//! host commands and never reach either.

use super::theme::ThemeColors;
use crate::config::Config;
use crate::feedback::{KeyFeedback, SilentFeedback};
use crate::keyboard::{
    apply_shift, layout, translate, Disposition, KeyCode, KeyEvent, KeyEventTracker, Layout,
    SyntheticRelease,
};
use crate::typing::{EngineStatus, ResultLog, TypingEngine, TypingKey};
use crossterm::event::{
    KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventKind as CtKeyEventKind, KeyModifiers,
};
use log::{debug, warn};
use std::path::PathBuf;
use std::time::Instant;

/// Current view/tab in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppView {
    Tester,
    SpeedTest,
}

impl AppView {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Tester => "Keyboard Tester",
            Self::SpeedTest => "Speed Test",
        }
    }

    pub fn all() -> &'static [AppView] {
        &[Self::Tester, Self::SpeedTest]
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Tester => 0,
            Self::SpeedTest => 1,
        }
    }

    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Tester,
            _ => Self::SpeedTest,
        }
    }
}

/// Application running state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Running,
    Quitting,
}

/// Main application
pub struct App {
    pub view: AppView,
    pub state: AppState,
    /// Session settings
    pub config: Config,
    /// Table for the selected form factor
    pub layout: Layout,
    pub tracker: KeyEventTracker,
    pub engine: TypingEngine,
    pub results: ResultLog,
    pub show_help: bool,
    pub start_time: Instant,
    /// Last status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
    config_path: Option<PathBuf>,
    feedback: Box<dyn KeyFeedback>,
    release: SyntheticRelease,
    /// Whether the terminal reports key releases itself
    release_events: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let engine = TypingEngine::new(config.typing.difficulty, config.typing.time_limit);
        Self {
            view: AppView::Tester,
            state: AppState::Running,
            layout: layout(config.keyboard.layout),
            config,
            tracker: KeyEventTracker::new(),
            engine,
            results: ResultLog::new(),
            show_help: false,
            start_time: Instant::now(),
            status_message: None,
            status_time: None,
            config_path: None,
            feedback: Box::new(SilentFeedback),
            release: SyntheticRelease::default(),
            release_events: false,
        }
    }

    /// Persist theme changes to `path`
    pub fn with_config_path(mut self, path: PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    pub fn set_feedback(&mut self, feedback: Box<dyn KeyFeedback>) {
        self.feedback = feedback;
    }

    /// Tell the app whether real key-release events will arrive
    pub fn set_release_events(&mut self, enabled: bool) {
        self.release_events = enabled;
    }

    pub fn colors(&self) -> ThemeColors {
        ThemeColors::from_theme(self.config.ui.theme)
    }

    /// Rainbow phase for RGB mode, None when it is off
    pub fn rgb_phase(&self, now: Instant) -> Option<f32> {
        self.config.ui.rgb_mode.then(|| {
            let millis = now.saturating_duration_since(self.start_time).as_millis();
            (millis / 10 % 360) as f32
        })
    }

    /// Route one terminal key event
    pub fn handle_key(&mut self, key: &CtKeyEvent, now: Instant) -> Disposition {
        if let CtKeyCode::Char(c) = key.code {
            if key.modifiers.contains(KeyModifiers::CONTROL) {
                if key.kind != CtKeyEventKind::Release {
                    self.run_command(c.to_ascii_lowercase());
                }
                return Disposition::Suppress;
            }
        }

        match self.view {
            AppView::Tester => self.handle_tester_key(key, now),
            AppView::SpeedTest => self.handle_typing_key(key),
        }
    }

    fn handle_tester_key(&mut self, key: &CtKeyEvent, now: Instant) -> Disposition {
        let Some(info) = translate(key) else {
            return Disposition::Pass;
        };

        match key.kind {
            CtKeyEventKind::Press | CtKeyEventKind::Repeat => {
                if !self.release_events {
                    self.release.note_press(&info, now);
                }
                let code = info.code.clone();
                let disposition = self.tracker.on_key_down(KeyEvent::down(info, now));
                if self.tracker.is_active() {
                    self.play(Some(&code));
                }
                disposition
            }
            CtKeyEventKind::Release => self.tracker.on_key_up(&info.code),
        }
    }

    fn handle_typing_key(&mut self, key: &CtKeyEvent) -> Disposition {
        if key.kind == CtKeyEventKind::Release {
            return Disposition::Pass;
        }

        let typing_key = match key.code {
            CtKeyCode::Char(' ') => TypingKey::Boundary,
            CtKeyCode::Char(c) => TypingKey::Char(apply_shift(c, key.modifiers)),
            CtKeyCode::Backspace => TypingKey::Backspace,
            CtKeyCode::Up | CtKeyCode::Down | CtKeyCode::Left | CtKeyCode::Right => {
                TypingKey::Arrow
            }
            CtKeyCode::Esc => TypingKey::Cancel,
            CtKeyCode::Enter if self.engine.status() == EngineStatus::Finished => {
                self.engine.reset();
                self.set_status("New test ready".to_string());
                return Disposition::Suppress;
            }
            _ => TypingKey::Other,
        };

        let outcome = self.engine.handle_key(typing_key);
        if outcome.audible {
            self.play(None);
        }
        if typing_key == TypingKey::Cancel && outcome.disposition.is_suppressed() {
            let msg = match self.engine.status() {
                EngineStatus::Paused => "Paused",
                _ => "Resumed",
            };
            self.set_status(msg.to_string());
        }
        self.collect_result();
        outcome.disposition
    }

    fn play(&mut self, code: Option<&KeyCode>) {
        let profile = self.config.keyboard.sound_profile;
        if !profile.is_mute() {
            self.feedback.play(profile, code);
        }
    }

    /// Drive time-based behaviour. Call once per frame.
    pub fn poll(&mut self, now: Instant) {
        self.engine.poll_timer(now);
        self.collect_result();

        for info in self.release.expired(now) {
            self.tracker.on_key_up(&info.code);
        }
    }

    fn collect_result(&mut self) {
        if let Some(result) = self.engine.take_result() {
            self.set_status(format!(
                "Test complete: {} WPM, {}% accuracy",
                result.wpm, result.accuracy_percent
            ));
            self.results.record(result);
        }
    }

    fn run_command(&mut self, c: char) {
        match c {
            'q' | 'c' => self.quit(),
            't' => self.switch_view(),
            'r' => self.reset_current(),
            'l' => self.next_layout(),
            's' => {
                let profile = self.config.keyboard.sound_profile.next();
                self.config.keyboard.sound_profile = profile;
                self.set_status(format!("Sound: {}", profile.name()));
            }
            'g' => {
                self.config.ui.rgb_mode = !self.config.ui.rgb_mode;
                let state = if self.config.ui.rgb_mode { "on" } else { "off" };
                self.set_status(format!("RGB mode {state}"));
            }
            'd' => self.toggle_theme(),
            'e' => {
                self.config.typing.difficulty = self.config.typing.difficulty.next();
                self.reconfigure_engine();
            }
            'n' => {
                self.config.typing.time_limit = self.config.typing.time_limit.next();
                self.reconfigure_engine();
            }
            'k' => self.show_help = !self.show_help,
            _ => {}
        }
    }

    /// Toggle between the tester and the speed test
    pub fn switch_view(&mut self) {
        self.view = AppView::from_index((self.view.index() + 1) % AppView::all().len());
        self.tracker.activate(self.view == AppView::Tester);
        self.engine.reset();
        debug!("switched to {}", self.view.name());
        self.set_status(self.view.name().to_string());
    }

    /// Reset whatever the current view shows
    pub fn reset_current(&mut self) {
        match self.view {
            AppView::Tester => {
                self.tracker.on_reset();
                self.set_status("Tester reset".to_string());
            }
            AppView::SpeedTest => {
                self.engine.reset();
                self.set_status("Speed test reset".to_string());
            }
        }
    }

    pub fn next_layout(&mut self) {
        let id = self.config.keyboard.layout.next();
        self.config.keyboard.layout = id;
        self.layout = layout(id);
        self.set_status(format!("Layout: {}", id.name()));
    }

    fn reconfigure_engine(&mut self) {
        let difficulty = self.config.typing.difficulty;
        let time_limit = self.config.typing.time_limit;
        self.engine.configure(difficulty, time_limit);
        self.set_status(format!("{} / {}s", difficulty.name(), time_limit.secs()));
    }

    /// Flip the theme and write it to the config file. Only the theme
    /// entry on disk changes.
    pub fn toggle_theme(&mut self) {
        let theme = self.config.ui.theme.toggle();
        self.config.ui.theme = theme;

        let Some(path) = self.config_path.clone() else {
            self.set_status(format!("Theme: {theme}"));
            return;
        };
        match Config::save_theme_to(&path, theme) {
            Ok(()) => self.set_status(format!("Theme: {theme}")),
            Err(e) => {
                warn!("failed to save theme to {}: {e}", path.display());
                self.set_status(format!("Theme not saved: {e}"));
            }
        }
    }

    pub fn quit(&mut self) {
        self.state = AppState::Quitting;
    }

    /// Set a status message
    pub fn set_status(&mut self, message: String) {
        self.status_message = Some(message);
        self.status_time = Some(Instant::now());
    }

    /// Get status message if still valid (within 3 seconds)
    pub fn get_status(&self) -> Option<&str> {
        match (&self.status_message, self.status_time) {
            (Some(msg), Some(time)) if time.elapsed().as_secs() < 3 => Some(msg),
            _ => None,
        }
    }

    /// Get elapsed time formatted
    pub fn elapsed_formatted(&self) -> String {
        let secs = self.start_time.elapsed().as_secs();
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: CtKeyCode, modifiers: KeyModifiers) -> CtKeyEvent {
        CtKeyEvent::new(code, modifiers)
    }

    fn ctrl(c: char) -> CtKeyEvent {
        key(CtKeyCode::Char(c), KeyModifiers::CONTROL)
    }

    #[test]
    fn view_index_roundtrip() {
        for view in AppView::all() {
            assert_eq!(AppView::from_index(view.index()), *view);
        }
    }

    #[test]
    fn app_starts_in_tester() {
        let app = App::default();
        assert_eq!(app.view, AppView::Tester);
        assert!(app.tracker.is_active());
        assert_eq!(app.layout.id, app.config.keyboard.layout);
    }

    #[test]
    fn ctrl_chords_are_not_tracked() {
        let mut app = App::default();
        let now = Instant::now();
        assert!(app.handle_key(&ctrl('g'), now).is_suppressed());
        assert!(app.config.ui.rgb_mode);
        assert_eq!(app.tracker.state().press_count, 0);
    }

    #[test]
    fn switching_view_suspends_tracker() {
        let mut app = App::default();
        app.handle_key(&ctrl('t'), Instant::now());
        assert_eq!(app.view, AppView::SpeedTest);
        assert!(!app.tracker.is_active());

        app.handle_key(&ctrl('t'), Instant::now());
        assert!(app.tracker.is_active());
    }

    #[test]
    fn synthetic_release_clears_active_key() {
        let mut app = App::default();
        let t0 = Instant::now();
        app.handle_key(&key(CtKeyCode::Char('a'), KeyModifiers::NONE), t0);
        assert_eq!(app.tracker.active_count(), 1);

        app.poll(t0 + std::time::Duration::from_millis(200));
        assert_eq!(app.tracker.active_count(), 0);
        assert_eq!(app.tracker.tested_count(), 1);
    }

    #[test]
    fn real_release_events_skip_synthetic_release() {
        let mut app = App::default();
        app.set_release_events(true);
        let t0 = Instant::now();
        app.handle_key(&key(CtKeyCode::Char('a'), KeyModifiers::NONE), t0);
        app.poll(t0 + std::time::Duration::from_secs(1));
        assert_eq!(app.tracker.active_count(), 1);

        let release = CtKeyEvent {
            code: CtKeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: CtKeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        app.handle_key(&release, t0 + std::time::Duration::from_secs(2));
        assert_eq!(app.tracker.active_count(), 0);
    }

    #[test]
    fn layout_cycles() {
        let mut app = App::default();
        let before = app.config.keyboard.layout;
        app.handle_key(&ctrl('l'), Instant::now());
        assert_ne!(app.config.keyboard.layout, before);
        assert_eq!(app.layout.id, app.config.keyboard.layout);
    }

    #[test]
    fn quit_chords() {
        let mut app = App::default();
        app.handle_key(&ctrl('q'), Instant::now());
        assert_eq!(app.state, AppState::Quitting);

        let mut app = App::default();
        app.handle_key(&ctrl('c'), Instant::now());
        assert_eq!(app.state, AppState::Quitting);
    }

    #[test]
    fn status_message_is_visible() {
        let mut app = App::default();
        app.set_status("hello".to_string());
        assert_eq!(app.get_status(), Some("hello"));
    }

    #[test]
    fn rgb_phase_only_in_rgb_mode() {
        let mut app = App::default();
        assert!(app.rgb_phase(Instant::now()).is_none());
        app.config.ui.rgb_mode = true;
        assert!(app.rgb_phase(Instant::now()).is_some());
    }
}
