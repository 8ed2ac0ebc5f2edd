//! In-memory log of finished speed tests

use super::{Difficulty, TimeLimit};
use crate::utils::BoundedLog;
use chrono::{DateTime, Local};

/// Number of finished sessions kept
pub const RESULT_LOG_CAPACITY: usize = 10;

/// Summary of one finished speed test
#[derive(Debug, Clone, PartialEq)]
pub struct SessionResult {
    pub difficulty: Difficulty,
    pub time_limit: TimeLimit,
    pub wpm: u32,
    pub accuracy_percent: u32,
    pub correct_chars: u32,
    pub incorrect_chars: u32,
    /// Words committed before the session ended
    pub words_committed: usize,
    pub finished_at: DateTime<Local>,
}

/// Newest-first log of recent results. Lives only as long as the process.
#[derive(Debug, Clone)]
pub struct ResultLog {
    entries: BoundedLog<SessionResult>,
}

impl ResultLog {
    pub fn new() -> Self {
        Self {
            entries: BoundedLog::new(RESULT_LOG_CAPACITY),
        }
    }

    pub fn record(&mut self, result: SessionResult) {
        self.entries.push(result);
    }

    pub fn latest(&self) -> Option<&SessionResult> {
        self.entries.latest()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SessionResult> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest WPM among kept results
    pub fn best_wpm(&self) -> Option<u32> {
        self.entries.iter().map(|r| r.wpm).max()
    }
}

impl Default for ResultLog {
    fn default() -> Self {
        Self::new()
    }
}
