//! One-tick-per-second countdown
//!
//! The countdown never schedules anything itself. It holds the deadline of
//! the next tick and the host asks it whether a tick is due. Cancelling drops
//! the deadline, so no tick can be observed after `cancel` returns.

use crate::config::UnknownValue;
use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

const TICK: Duration = Duration::from_secs(1);

/// Selectable test durations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TimeLimit {
    Fifteen,
    #[default]
    Thirty,
    Sixty,
}

impl TimeLimit {
    pub const ALL: [TimeLimit; 3] = [Self::Fifteen, Self::Thirty, Self::Sixty];

    pub fn secs(&self) -> u64 {
        match self {
            Self::Fifteen => 15,
            Self::Thirty => 30,
            Self::Sixty => 60,
        }
    }

    pub fn from_secs(secs: u64) -> Option<Self> {
        Self::ALL.into_iter().find(|limit| limit.secs() == secs)
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Fifteen => Self::Thirty,
            Self::Thirty => Self::Sixty,
            Self::Sixty => Self::Fifteen,
        }
    }
}

impl fmt::Display for TimeLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.secs())
    }
}

impl FromStr for TimeLimit {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix('s').unwrap_or(trimmed);
        digits
            .parse::<u64>()
            .ok()
            .and_then(Self::from_secs)
            .ok_or_else(|| UnknownValue::new("time limit", s))
    }
}

/// Remaining whole seconds plus the deadline of the next tick
#[derive(Debug, Clone)]
pub struct Countdown {
    limit: TimeLimit,
    remaining: u64,
    next_tick: Option<Instant>,
}

impl Countdown {
    pub fn new(limit: TimeLimit) -> Self {
        Self {
            limit,
            remaining: limit.secs(),
            next_tick: None,
        }
    }

    /// Start ticking, first tick one second after `now`
    pub fn arm(&mut self, now: Instant) {
        self.next_tick = Some(now + TICK);
    }

    /// Stop ticking. Remaining time is kept.
    pub fn cancel(&mut self) {
        self.next_tick = None;
    }

    /// Cancel and restore the full limit
    pub fn reset(&mut self) {
        self.cancel();
        self.remaining = self.limit.secs();
    }

    pub fn is_armed(&self) -> bool {
        self.next_tick.is_some()
    }

    /// Consume one due tick, if any, moving the deadline forward by a second
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.next_tick {
            Some(deadline) if deadline <= now => {
                self.next_tick = Some(deadline + TICK);
                true
            }
            _ => false,
        }
    }

    /// Count down one second, returning true when zero is reached
    pub fn decrement(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining == 0
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn limit(&self) -> TimeLimit {
        self.limit
    }

    /// Whole seconds since the countdown started
    pub fn elapsed_secs(&self) -> u64 {
        self.limit.secs() - self.remaining
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_countdown_is_full_and_unarmed() {
        let countdown = Countdown::new(TimeLimit::Fifteen);
        assert_eq!(countdown.remaining(), 15);
        assert!(!countdown.is_armed());
        assert_eq!(countdown.elapsed_secs(), 0);
    }

    #[test]
    fn ticks_become_due_each_second() {
        let mut countdown = Countdown::new(TimeLimit::Thirty);
        let t0 = Instant::now();
        countdown.arm(t0);

        assert!(!countdown.take_due(t0 + Duration::from_millis(999)));
        assert!(countdown.take_due(t0 + Duration::from_secs(1)));
        assert!(!countdown.take_due(t0 + Duration::from_millis(1500)));

        // A late poll drains every missed tick one at a time
        let late = t0 + Duration::from_millis(4200);
        let mut due = 0;
        while countdown.take_due(late) {
            due += 1;
        }
        assert_eq!(due, 3);
    }

    #[test]
    fn cancelled_countdown_never_ticks() {
        let mut countdown = Countdown::new(TimeLimit::Thirty);
        let t0 = Instant::now();
        countdown.arm(t0);
        countdown.cancel();
        assert!(!countdown.take_due(t0 + Duration::from_secs(10)));
    }

    #[test]
    fn reset_restores_limit() {
        let mut countdown = Countdown::new(TimeLimit::Thirty);
        for _ in 0..18 {
            countdown.decrement();
        }
        assert_eq!(countdown.remaining(), 12);

        countdown.arm(Instant::now());
        countdown.reset();
        assert_eq!(countdown.remaining(), 30);
        assert!(!countdown.is_armed());
    }

    #[test]
    fn decrement_reports_zero_and_saturates() {
        let mut countdown = Countdown::new(TimeLimit::Fifteen);
        for _ in 0..14 {
            assert!(!countdown.decrement());
        }
        assert!(countdown.decrement());
        assert!(countdown.decrement());
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn time_limit_parsing() {
        assert_eq!("60".parse::<TimeLimit>().unwrap(), TimeLimit::Sixty);
        assert_eq!("15s".parse::<TimeLimit>().unwrap(), TimeLimit::Fifteen);
        assert!("45".parse::<TimeLimit>().is_err());
        assert!("soon".parse::<TimeLimit>().is_err());
        assert_eq!(TimeLimit::default().secs(), 30);
    }

    #[test]
    fn time_limit_cycles() {
        assert_eq!(TimeLimit::Sixty.next(), TimeLimit::Fifteen);
        assert_eq!(TimeLimit::from_secs(30), Some(TimeLimit::Thirty));
        assert_eq!(TimeLimit::from_secs(31), None);
    }
}
