//! Keyboard event handling and state management

mod event;
pub mod keymap;
pub mod layout;
pub mod release;
mod state;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use event::{Disposition, KeyEvent, KeyEventKind};
pub use keymap::{apply_shift, translate, KeyCode, KeyInfo, KeyLocation};
pub use layout::{layout, KeyDescriptor, Layout, LayoutId};
pub use release::SyntheticRelease;
pub use state::{KeyEventTracker, TrackerState, EVENT_LOG_CAPACITY};
