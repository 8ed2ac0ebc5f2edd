//! Speed test state machine
//!
//! Words are scored only when committed. The countdown is armed by the first
//! `poll_timer` call after the engine enters `Running`, so every state change
//! itself is independent of the clock.

use super::countdown::{Countdown, TimeLimit};
use super::results::SessionResult;
use super::text::{produce, Difficulty};
use crate::keyboard::Disposition;
use chrono::Local;
use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::mem;
use std::time::Instant;

/// Words generated when a test is set up
pub const INITIAL_WORDS: usize = 50;
/// Refill once fewer than this many words remain ahead of the cursor
pub const LOW_WATER_MARK: usize = 20;
/// Words appended per refill
pub const REFILL_BATCH: usize = 30;

const CHARS_PER_WORD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

impl EngineStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "Ready",
            Self::Running => "Running",
            Self::Paused => "Paused",
            Self::Finished => "Finished",
        }
    }
}

/// Aggregated scoring for the current test
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub correct_chars: u32,
    pub incorrect_chars: u32,
    /// Always `correct_chars + incorrect_chars`
    pub total_chars: u32,
    pub wpm: u32,
    /// 100 until anything has been committed
    pub accuracy_percent: u32,
}

impl Default for EngineStats {
    fn default() -> Self {
        Self {
            correct_chars: 0,
            incorrect_chars: 0,
            total_chars: 0,
            wpm: 0,
            accuracy_percent: 100,
        }
    }
}

/// A keystroke as the speed test sees it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingKey {
    /// Printable character
    Char(char),
    /// Word separator
    Boundary,
    Backspace,
    /// Navigation keys, swallowed
    Arrow,
    /// Pause/resume toggle
    Cancel,
    Other,
}

/// Result of feeding one keystroke to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyOutcome {
    pub disposition: Disposition,
    /// Whether the keystroke warrants audible feedback
    pub audible: bool,
}

impl KeyOutcome {
    fn silent(disposition: Disposition) -> Self {
        Self {
            disposition,
            audible: false,
        }
    }

    fn accepted(accepted: bool) -> Self {
        Self {
            disposition: Disposition::Suppress,
            audible: accepted,
        }
    }
}

/// How a word in the queue should be shown
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordState {
    Pending,
    Current,
    Correct,
    Incorrect,
}

/// Score a typed word against its target.
///
/// Positions are compared up to the longer of the two; a missing or extra
/// character counts as incorrect. Returns `(correct, incorrect)`.
pub fn score_word(typed: &str, target: &str) -> (u32, u32) {
    let mut typed = typed.chars();
    let mut target = target.chars();
    let (mut correct, mut incorrect) = (0, 0);

    loop {
        match (typed.next(), target.next()) {
            (None, None) => break,
            (Some(a), Some(b)) if a == b => correct += 1,
            _ => incorrect += 1,
        }
    }

    (correct, incorrect)
}

pub struct TypingEngine<R = StdRng> {
    rng: R,
    difficulty: Difficulty,
    words: Vec<String>,
    cursor: usize,
    input: String,
    typed_words: BTreeMap<usize, String>,
    countdown: Countdown,
    status: EngineStatus,
    stats: EngineStats,
    result: Option<SessionResult>,
}

impl TypingEngine<StdRng> {
    pub fn new(difficulty: Difficulty, time_limit: TimeLimit) -> Self {
        Self::with_rng(difficulty, time_limit, StdRng::from_entropy())
    }
}

impl Default for TypingEngine<StdRng> {
    fn default() -> Self {
        Self::new(Difficulty::default(), TimeLimit::default())
    }
}

impl<R: Rng> TypingEngine<R> {
    /// Create an engine drawing text from `rng`
    pub fn with_rng(difficulty: Difficulty, time_limit: TimeLimit, rng: R) -> Self {
        let mut engine = Self {
            rng,
            difficulty,
            words: Vec::new(),
            cursor: 0,
            input: String::new(),
            typed_words: BTreeMap::new(),
            countdown: Countdown::new(time_limit),
            status: EngineStatus::Idle,
            stats: EngineStats::default(),
            result: None,
        };
        engine.reset();
        engine
    }

    /// Back to idle with a fresh word queue. Cancels the countdown.
    pub fn reset(&mut self) {
        self.countdown.reset();
        self.words = produce(self.difficulty, INITIAL_WORDS, &mut self.rng);
        self.cursor = 0;
        self.input.clear();
        self.typed_words.clear();
        self.status = EngineStatus::Idle;
        self.stats = EngineStats::default();
        self.result = None;
        debug!(
            "speed test reset ({}, {}s, {} words)",
            self.difficulty,
            self.countdown.limit(),
            self.words.len()
        );
    }

    /// Change difficulty and time limit, then reset
    pub fn configure(&mut self, difficulty: Difficulty, time_limit: TimeLimit) {
        self.difficulty = difficulty;
        self.countdown = Countdown::new(time_limit);
        self.reset();
    }

    /// Idle to running. No effect in any other state.
    pub fn start(&mut self) {
        if self.status == EngineStatus::Idle {
            self.status = EngineStatus::Running;
            debug!("speed test started");
        }
    }

    pub fn pause(&mut self) {
        if self.status == EngineStatus::Running {
            self.status = EngineStatus::Paused;
            self.countdown.cancel();
            debug!("speed test paused with {}s left", self.countdown.remaining());
        }
    }

    /// Paused to running; the countdown re-arms on the next poll
    pub fn resume(&mut self) {
        if self.status == EngineStatus::Paused {
            self.status = EngineStatus::Running;
            debug!("speed test resumed");
        }
    }

    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            EngineStatus::Running => self.pause(),
            EngineStatus::Paused => self.resume(),
            _ => return false,
        }
        true
    }

    /// Replace the in-progress word. Rejected while paused or finished.
    pub fn submit_input(&mut self, value: &str) -> bool {
        if matches!(self.status, EngineStatus::Paused | EngineStatus::Finished) {
            return false;
        }
        value.clone_into(&mut self.input);
        trace!("input {:?}", self.input);
        true
    }

    /// Finalize the current word. Starts an idle test.
    pub fn commit_word(&mut self) -> bool {
        if matches!(self.status, EngineStatus::Paused | EngineStatus::Finished) {
            return false;
        }
        self.start();
        self.commit_current();
        self.recompute_stats();
        true
    }

    fn commit_current(&mut self) {
        let (correct, incorrect) = score_word(&self.input, &self.words[self.cursor]);
        // The boundary keystroke itself is always a correct character
        let correct = correct + 1;

        self.stats.correct_chars += correct;
        self.stats.incorrect_chars += incorrect;
        self.stats.total_chars = self.stats.correct_chars + self.stats.incorrect_chars;

        trace!("committed word {} (+{correct} / -{incorrect})", self.cursor);
        self.typed_words.insert(self.cursor, mem::take(&mut self.input));
        self.cursor += 1;
        self.refill();
    }

    fn refill(&mut self) {
        if self.words.len() - self.cursor < LOW_WATER_MARK {
            let batch = produce(self.difficulty, REFILL_BATCH, &mut self.rng);
            debug!("appending {} words at cursor {}", batch.len(), self.cursor);
            self.words.extend(batch);
        }
    }

    /// Feed one keystroke
    pub fn handle_key(&mut self, key: TypingKey) -> KeyOutcome {
        if self.status == EngineStatus::Finished {
            return KeyOutcome::silent(Disposition::Pass);
        }

        match key {
            TypingKey::Arrow => KeyOutcome::silent(Disposition::Suppress),
            TypingKey::Cancel => {
                if self.toggle_pause() {
                    KeyOutcome::silent(Disposition::Suppress)
                } else {
                    KeyOutcome::silent(Disposition::Pass)
                }
            }
            TypingKey::Char(c) => {
                if self.status == EngineStatus::Paused {
                    return KeyOutcome::silent(Disposition::Suppress);
                }
                self.start();
                let mut value = self.input.clone();
                value.push(c);
                KeyOutcome::accepted(self.submit_input(&value))
            }
            TypingKey::Boundary => KeyOutcome::accepted(self.commit_word()),
            TypingKey::Backspace => {
                let mut value = self.input.clone();
                if value.pop().is_some() {
                    self.submit_input(&value);
                }
                KeyOutcome::silent(Disposition::Suppress)
            }
            TypingKey::Other => KeyOutcome::silent(Disposition::Pass),
        }
    }

    /// Count down one second. Ignored unless running.
    pub fn tick(&mut self) {
        if self.status != EngineStatus::Running {
            return;
        }
        let expired = self.countdown.decrement();
        self.recompute_stats();
        if expired {
            self.finish();
        }
    }

    /// Drive the countdown from the host clock
    pub fn poll_timer(&mut self, now: Instant) {
        if self.status != EngineStatus::Running {
            return;
        }
        if !self.countdown.is_armed() {
            self.countdown.arm(now);
            return;
        }
        while self.countdown.take_due(now) {
            self.tick();
        }
    }

    fn finish(&mut self) {
        if !self.input.is_empty() {
            self.commit_current();
        }
        self.status = EngineStatus::Finished;
        self.countdown.cancel();
        self.recompute_stats();

        self.result = Some(SessionResult {
            difficulty: self.difficulty,
            time_limit: self.countdown.limit(),
            wpm: self.stats.wpm,
            accuracy_percent: self.stats.accuracy_percent,
            correct_chars: self.stats.correct_chars,
            incorrect_chars: self.stats.incorrect_chars,
            words_committed: self.cursor,
            finished_at: Local::now(),
        });
        debug!(
            "speed test finished: {} wpm, {}% accuracy",
            self.stats.wpm, self.stats.accuracy_percent
        );
    }

    /// Recompute WPM and accuracy from the counters and elapsed time
    pub fn recompute_stats(&mut self) {
        let limit_secs = self.countdown.limit().secs();
        let elapsed = match self.countdown.elapsed_secs() {
            0 => limit_secs,
            secs => secs,
        };
        let minutes = elapsed as f64 / 60.0;

        let words = self.stats.correct_chars as f64 / CHARS_PER_WORD;
        self.stats.wpm = (words / minutes).round().max(0.0) as u32;

        self.stats.accuracy_percent = if self.stats.total_chars > 0 {
            (100.0 * self.stats.correct_chars as f64 / self.stats.total_chars as f64).round() as u32
        } else {
            100
        };
    }

    /// Take the summary of a finished test, once
    pub fn take_result(&mut self) -> Option<SessionResult> {
        self.result.take()
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn stats(&self) -> &EngineStats {
        &self.stats
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor
    }

    pub fn current_input(&self) -> &str {
        &self.input
    }

    pub fn current_word(&self) -> &str {
        &self.words[self.cursor]
    }

    pub fn typed_words(&self) -> &BTreeMap<usize, String> {
        &self.typed_words
    }

    pub fn time_remaining(&self) -> u64 {
        self.countdown.remaining()
    }

    pub fn time_limit(&self) -> TimeLimit {
        self.countdown.limit()
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn word_state(&self, index: usize) -> WordState {
        if index == self.cursor && self.status != EngineStatus::Finished {
            return WordState::Current;
        }
        match self.typed_words.get(&index) {
            Some(typed) if self.words.get(index) == Some(typed) => WordState::Correct,
            Some(_) => WordState::Incorrect,
            None => WordState::Pending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;
    use std::time::Duration;

    fn engine() -> TypingEngine {
        TypingEngine::with_rng(Difficulty::Medium, TimeLimit::Thirty, StdRng::seed_from_u64(3))
    }

    fn type_word(engine: &mut TypingEngine, word: &str) {
        for c in word.chars() {
            engine.handle_key(TypingKey::Char(c));
        }
    }

    #[test]
    fn score_matching_word() {
        assert_eq!(score_word("cat", "cat"), (3, 0));
    }

    #[test]
    fn score_substitution() {
        assert_eq!(score_word("cot", "cat"), (2, 1));
    }

    #[test]
    fn score_missing_and_extra_characters() {
        assert_eq!(score_word("ca", "cat"), (2, 1));
        assert_eq!(score_word("cats", "cat"), (3, 1));
        assert_eq!(score_word("", "cat"), (0, 3));
    }

    #[test]
    fn new_engine_is_idle_with_full_queue() {
        let engine = engine();
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert!(engine.words().len() >= INITIAL_WORDS);
        assert_eq!(engine.cursor_index(), 0);
        assert_eq!(engine.time_remaining(), 30);
        assert_eq!(engine.stats(), &EngineStats::default());
        assert_eq!(engine.stats().accuracy_percent, 100);
    }

    #[test]
    fn first_character_starts_test() {
        let mut engine = engine();
        let outcome = engine.handle_key(TypingKey::Char('x'));
        assert_eq!(engine.status(), EngineStatus::Running);
        assert_eq!(engine.current_input(), "x");
        assert!(outcome.audible);
        assert!(outcome.disposition.is_suppressed());
    }

    #[test]
    fn submit_input_does_not_score() {
        let mut engine = engine();
        assert!(engine.submit_input("anything"));
        assert_eq!(engine.current_input(), "anything");
        assert_eq!(engine.stats().total_chars, 0);
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn boundary_starts_idle_test() {
        let mut engine = engine();
        assert!(engine.commit_word());
        assert_eq!(engine.status(), EngineStatus::Running);
        assert_eq!(engine.cursor_index(), 1);
        assert_eq!(engine.typed_words().get(&0).map(String::as_str), Some(""));
    }

    #[test]
    fn exact_word_earns_boundary_credit() {
        let mut engine = engine();
        let word = engine.current_word().to_string();
        type_word(&mut engine, &word);
        engine.handle_key(TypingKey::Boundary);

        let len = word.chars().count() as u32;
        assert_eq!(engine.stats().correct_chars, len + 1);
        assert_eq!(engine.stats().incorrect_chars, 0);
        assert_eq!(engine.word_state(0), WordState::Correct);
        assert_eq!(engine.current_input(), "");
    }

    #[test]
    fn mistyped_word_counts_errors() {
        let mut engine = engine();
        let word = engine.current_word().to_string();
        let mut chars: Vec<char> = word.chars().collect();
        chars[0] = if chars[0] == '#' { '%' } else { '#' };
        let typo: String = chars.into_iter().collect();

        engine.submit_input(&typo);
        engine.commit_word();

        let len = word.chars().count() as u32;
        assert_eq!(engine.stats().correct_chars, len);
        assert_eq!(engine.stats().incorrect_chars, 1);
        assert_eq!(engine.word_state(0), WordState::Incorrect);
    }

    #[test]
    fn three_correct_words() {
        let mut engine = engine();
        let mut expected = 0;
        for _ in 0..3 {
            let word = engine.current_word().to_string();
            expected += word.chars().count() as u32 + 1;
            type_word(&mut engine, &word);
            engine.handle_key(TypingKey::Boundary);
        }

        assert_eq!(engine.cursor_index(), 3);
        assert_eq!(engine.stats().incorrect_chars, 0);
        assert_eq!(engine.stats().correct_chars, expected);
        assert_eq!(engine.stats().accuracy_percent, 100);
    }

    #[test]
    fn queue_never_runs_low() {
        let mut engine = engine();
        for _ in 0..500 {
            engine.commit_word();
            assert!(engine.words().len() - engine.cursor_index() >= LOW_WATER_MARK);
        }
        assert_eq!(engine.cursor_index(), 500);
    }

    #[test]
    fn stats_stay_in_range() {
        let mut engine = engine();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..300 {
            match rng.gen_range(0..6) {
                0 => engine.tick(),
                1 => {
                    engine.handle_key(TypingKey::Boundary);
                }
                2 => {
                    engine.handle_key(TypingKey::Backspace);
                }
                _ => {
                    engine.handle_key(TypingKey::Char(rng.gen_range('a'..='z')));
                }
            }
            let stats = engine.stats();
            assert!(stats.accuracy_percent <= 100);
            assert_eq!(stats.total_chars, stats.correct_chars + stats.incorrect_chars);
        }
    }

    #[test]
    fn wpm_uses_full_limit_before_first_tick() {
        let mut engine = engine();
        // Empty commits earn only the boundary credit: 50 chars over 0.5 min
        for _ in 0..50 {
            engine.commit_word();
        }
        assert_eq!(engine.stats().correct_chars, 50);
        assert_eq!(engine.stats().wpm, 20);
    }

    #[test]
    fn wpm_uses_elapsed_time() {
        let mut engine = engine();
        engine.start();
        for _ in 0..6 {
            engine.tick();
        }
        // Ten empty commits: 10 boundary credits
        for _ in 0..10 {
            engine.commit_word();
        }
        // 2 words over 0.1 minutes
        assert_eq!(engine.stats().wpm, 20);
        assert!(engine.stats().accuracy_percent < 100);
    }

    #[test]
    fn backspace_removes_last_character() {
        let mut engine = engine();
        type_word(&mut engine, "abc");
        let outcome = engine.handle_key(TypingKey::Backspace);
        assert_eq!(engine.current_input(), "ab");
        assert!(!outcome.audible);

        engine.submit_input("");
        engine.handle_key(TypingKey::Backspace);
        assert_eq!(engine.current_input(), "");
    }

    #[test]
    fn arrows_are_swallowed() {
        let mut engine = engine();
        type_word(&mut engine, "ab");
        let outcome = engine.handle_key(TypingKey::Arrow);
        assert_eq!(outcome.disposition, Disposition::Suppress);
        assert_eq!(engine.current_input(), "ab");
        assert_eq!(engine.cursor_index(), 0);
    }

    #[test]
    fn timer_expiry_finishes_and_commits_partial_word() {
        let mut engine = TypingEngine::with_rng(
            Difficulty::Easy,
            TimeLimit::Fifteen,
            StdRng::seed_from_u64(5),
        );
        type_word(&mut engine, "zz");
        for _ in 0..15 {
            engine.tick();
        }

        assert_eq!(engine.status(), EngineStatus::Finished);
        assert_eq!(engine.time_remaining(), 0);
        assert_eq!(engine.cursor_index(), 1);
        assert!(engine.typed_words().contains_key(&0));

        let result = engine.take_result().unwrap();
        assert_eq!(result.words_committed, 1);
        assert_eq!(result.time_limit, TimeLimit::Fifteen);
        assert!(engine.take_result().is_none());
    }

    #[test]
    fn timer_expiry_with_empty_input_commits_nothing() {
        let mut engine = engine();
        engine.start();
        for _ in 0..30 {
            engine.tick();
        }
        assert_eq!(engine.status(), EngineStatus::Finished);
        assert_eq!(engine.cursor_index(), 0);
        assert_eq!(engine.stats().total_chars, 0);
    }

    #[test]
    fn finished_engine_rejects_input() {
        let mut engine = engine();
        engine.start();
        for _ in 0..30 {
            engine.tick();
        }
        assert!(!engine.submit_input("late"));
        assert!(!engine.commit_word());
        assert_eq!(
            engine.handle_key(TypingKey::Char('a')).disposition,
            Disposition::Pass
        );
        assert_eq!(engine.current_input(), "");
    }

    #[test]
    fn pause_freezes_timer_and_input() {
        let mut engine = engine();
        type_word(&mut engine, "a");
        engine.tick();
        assert!(engine.handle_key(TypingKey::Cancel).disposition.is_suppressed());
        assert_eq!(engine.status(), EngineStatus::Paused);

        engine.tick();
        engine.handle_key(TypingKey::Char('b'));
        assert!(!engine.commit_word());
        assert_eq!(engine.time_remaining(), 29);
        assert_eq!(engine.current_input(), "a");

        engine.handle_key(TypingKey::Cancel);
        assert_eq!(engine.status(), EngineStatus::Running);
        engine.tick();
        assert_eq!(engine.time_remaining(), 28);
    }

    #[test]
    fn cancel_is_ignored_when_idle() {
        let mut engine = engine();
        let outcome = engine.handle_key(TypingKey::Cancel);
        assert_eq!(outcome.disposition, Disposition::Pass);
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn reset_discards_pending_ticks() {
        let mut engine = engine();
        let t0 = Instant::now();
        engine.start();
        engine.poll_timer(t0);
        engine.poll_timer(t0 + Duration::from_secs(18));
        assert_eq!(engine.time_remaining(), 12);

        engine.reset();
        assert_eq!(engine.time_remaining(), 30);
        engine.poll_timer(t0 + Duration::from_secs(25));
        assert_eq!(engine.time_remaining(), 30);
        assert_eq!(engine.status(), EngineStatus::Idle);
    }

    #[test]
    fn poll_arms_then_ticks() {
        let mut engine = engine();
        let t0 = Instant::now();
        engine.handle_key(TypingKey::Char('a'));

        engine.poll_timer(t0);
        assert_eq!(engine.time_remaining(), 30);
        engine.poll_timer(t0 + Duration::from_millis(2500));
        assert_eq!(engine.time_remaining(), 28);
    }

    #[test]
    fn late_poll_finishes_once() {
        let mut engine = engine();
        let t0 = Instant::now();
        engine.start();
        engine.poll_timer(t0);
        engine.poll_timer(t0 + Duration::from_secs(120));

        assert_eq!(engine.status(), EngineStatus::Finished);
        assert_eq!(engine.time_remaining(), 0);
        assert!(engine.take_result().is_some());
    }

    #[test]
    fn resume_rearms_from_resume_time() {
        let mut engine = engine();
        let t0 = Instant::now();
        engine.start();
        engine.poll_timer(t0);
        engine.poll_timer(t0 + Duration::from_secs(3));
        engine.pause();
        engine.poll_timer(t0 + Duration::from_secs(10));
        assert_eq!(engine.time_remaining(), 27);

        engine.resume();
        engine.poll_timer(t0 + Duration::from_secs(10));
        engine.poll_timer(t0 + Duration::from_millis(10_900));
        assert_eq!(engine.time_remaining(), 27);
        engine.poll_timer(t0 + Duration::from_secs(11));
        assert_eq!(engine.time_remaining(), 26);
    }

    #[test]
    fn configure_resets_with_new_settings() {
        let mut engine = engine();
        type_word(&mut engine, "abc");
        engine.commit_word();

        engine.configure(Difficulty::Hard, TimeLimit::Sixty);
        assert_eq!(engine.status(), EngineStatus::Idle);
        assert_eq!(engine.difficulty(), Difficulty::Hard);
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.cursor_index(), 0);
        assert!(engine.typed_words().is_empty());
    }

    #[test]
    fn word_states_follow_cursor() {
        let mut engine = engine();
        assert_eq!(engine.word_state(0), WordState::Current);
        assert_eq!(engine.word_state(1), WordState::Pending);
        engine.commit_word();
        assert_eq!(engine.word_state(1), WordState::Current);
    }
}
