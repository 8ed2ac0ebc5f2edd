//! Typing speed test: text generation, countdown, scoring

pub mod countdown;
pub mod engine;
pub mod results;
pub mod text;

pub use countdown::{Countdown, TimeLimit};
pub use engine::{
    score_word, EngineStats, EngineStatus, KeyOutcome, TypingEngine, TypingKey, WordState,
    INITIAL_WORDS, LOW_WATER_MARK, REFILL_BATCH,
};
pub use results::{ResultLog, SessionResult, RESULT_LOG_CAPACITY};
pub use text::{produce, Difficulty};
