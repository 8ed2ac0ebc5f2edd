//! Audible key feedback
//!
//! The core only decides when feedback happens. How it sounds is up to the
//! `KeyFeedback` implementation the host installs.

use crate::config::UnknownValue;
use crate::keyboard::KeyCode;
use log::trace;
use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

/// Switch sound selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SoundProfile {
    Mute,
    #[default]
    Clicky,
    Thocky,
    Linear,
}

impl SoundProfile {
    pub const ALL: [SoundProfile; 4] = [Self::Mute, Self::Clicky, Self::Thocky, Self::Linear];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Mute => "mute",
            Self::Clicky => "clicky",
            Self::Thocky => "thocky",
            Self::Linear => "linear",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mute => "Mute",
            Self::Clicky => "Clicky (Blue)",
            Self::Thocky => "Thocky (Brown)",
            Self::Linear => "Linear (Red)",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Self::Mute => Self::Clicky,
            Self::Clicky => Self::Thocky,
            Self::Thocky => Self::Linear,
            Self::Linear => Self::Mute,
        }
    }

    pub fn is_mute(&self) -> bool {
        matches!(self, Self::Mute)
    }
}

impl fmt::Display for SoundProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for SoundProfile {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|profile| profile.id() == wanted)
            .ok_or_else(|| UnknownValue::new("sound profile", s))
    }
}

/// Side-effect hook invoked on key activity.
///
/// `code` is the physical key in the tester and `None` for speed test
/// keystrokes. Never called with `SoundProfile::Mute`.
pub trait KeyFeedback {
    fn play(&mut self, profile: SoundProfile, code: Option<&KeyCode>);
}

/// Feedback that does nothing
#[derive(Debug, Default)]
pub struct SilentFeedback;

impl KeyFeedback for SilentFeedback {
    fn play(&mut self, _profile: SoundProfile, _code: Option<&KeyCode>) {}
}

/// Rings the terminal bell
pub struct BellFeedback<W: Write = io::Stdout> {
    out: W,
}

impl BellFeedback<io::Stdout> {
    pub fn new() -> Self {
        Self { out: io::stdout() }
    }
}

impl Default for BellFeedback<io::Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> BellFeedback<W> {
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> KeyFeedback for BellFeedback<W> {
    fn play(&mut self, profile: SoundProfile, code: Option<&KeyCode>) {
        trace!("bell for {:?} ({profile})", code.map(KeyCode::as_str));
        // Write errors are ignored
        let _ = self.out.write_all(b"\x07").and_then(|_| self.out.flush());
    }
}
