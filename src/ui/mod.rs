//! Terminal User Interface components

mod app;
mod keyboard_visual;
pub mod theme;
mod widgets;

pub use app::{App, AppState, AppView};
pub use keyboard_visual::KeyboardVisual;
pub use theme::ThemeColors;
pub use widgets::*;
