//! KeyDeck - terminal keyboard tester and typing speed test
//!
//! Two modes share one terminal: a key tracker that highlights held and
//! tested keys on a chosen keyboard layout, and a timed typing test that
//! scores words as they are committed.

pub mod config;
pub mod feedback;
pub mod keyboard;
pub mod typing;
pub mod ui;
pub mod utils;

pub use config::Config;
