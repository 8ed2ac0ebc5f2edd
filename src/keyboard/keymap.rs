//! Physical key codes and terminal key translation
//!
//! Terminal key events carry the *produced* character, not the physical key.
//! This module maps them back onto layout-independent physical codes
//! (`KeyA`, `Digit1`, `ShiftLeft`, `ArrowUp`, `Numpad7`, ...) so the tracker
//! and the layout tables agree on a single identifier per key position.

use crossterm::event::{
    KeyCode as CtKeyCode, KeyEvent as CtKeyEvent, KeyEventState, KeyModifiers, MediaKeyCode,
    ModifierKeyCode,
};
use std::fmt;

/// Opaque physical key identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyCode(String);

impl KeyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for KeyCode {
    fn from(code: &str) -> Self {
        Self(code.to_string())
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where on the keyboard a key sits, for keys that exist more than once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyLocation {
    #[default]
    Standard,
    Left,
    Right,
    Numpad,
}

impl KeyLocation {
    /// Numeric location as reported by DOM-style key events
    pub fn as_u8(&self) -> u8 {
        match self {
            Self::Standard => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Numpad => 3,
        }
    }
}

/// Everything known about a key at the moment it was pressed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// What the key produced ("a", "A", " ", "Shift", "ArrowUp")
    pub display_char: String,
    /// Physical position
    pub code: KeyCode,
    /// Legacy numeric key code
    pub numeric_code: u32,
    pub location: KeyLocation,
}

impl KeyInfo {
    pub fn new(display_char: impl Into<String>, code: &str, numeric_code: u32) -> Self {
        Self {
            display_char: display_char.into(),
            code: KeyCode::from(code),
            numeric_code,
            location: KeyLocation::Standard,
        }
    }

    fn located(mut self, location: KeyLocation) -> Self {
        self.location = location;
        self
    }
}

/// Translate a terminal key event into a physical key description.
///
/// Returns `None` for keys without a stable physical position
/// (non-ASCII characters, unsupported media keys).
pub fn translate(event: &CtKeyEvent) -> Option<KeyInfo> {
    let keypad = event.state.contains(KeyEventState::KEYPAD);
    let info = match event.code {
        CtKeyCode::Char(c) if keypad => return char_info(c, true),
        CtKeyCode::Char(c) => return char_info(apply_shift(c, event.modifiers), false),
        CtKeyCode::Backspace => KeyInfo::new("Backspace", "Backspace", 8),
        CtKeyCode::Enter if keypad => {
            KeyInfo::new("Enter", "NumpadEnter", 13).located(KeyLocation::Numpad)
        }
        CtKeyCode::Enter => KeyInfo::new("Enter", "Enter", 13),
        CtKeyCode::Left => KeyInfo::new("ArrowLeft", "ArrowLeft", 37),
        CtKeyCode::Up => KeyInfo::new("ArrowUp", "ArrowUp", 38),
        CtKeyCode::Right => KeyInfo::new("ArrowRight", "ArrowRight", 39),
        CtKeyCode::Down => KeyInfo::new("ArrowDown", "ArrowDown", 40),
        CtKeyCode::Home => KeyInfo::new("Home", "Home", 36),
        CtKeyCode::End => KeyInfo::new("End", "End", 35),
        CtKeyCode::PageUp => KeyInfo::new("PageUp", "PageUp", 33),
        CtKeyCode::PageDown => KeyInfo::new("PageDown", "PageDown", 34),
        CtKeyCode::Tab | CtKeyCode::BackTab => KeyInfo::new("Tab", "Tab", 9),
        CtKeyCode::Delete => KeyInfo::new("Delete", "Delete", 46),
        CtKeyCode::Insert => KeyInfo::new("Insert", "Insert", 45),
        CtKeyCode::F(n @ 1..=24) => {
            let name = format!("F{n}");
            KeyInfo::new(name.clone(), &name, 111 + u32::from(n))
        }
        CtKeyCode::Esc => KeyInfo::new("Escape", "Escape", 27),
        CtKeyCode::CapsLock => KeyInfo::new("CapsLock", "CapsLock", 20),
        CtKeyCode::ScrollLock => KeyInfo::new("ScrollLock", "ScrollLock", 145),
        CtKeyCode::NumLock => {
            KeyInfo::new("NumLock", "NumLock", 144).located(KeyLocation::Numpad)
        }
        CtKeyCode::PrintScreen => KeyInfo::new("PrintScreen", "PrintScreen", 44),
        CtKeyCode::Pause => KeyInfo::new("Pause", "Pause", 19),
        CtKeyCode::Menu => KeyInfo::new("ContextMenu", "ContextMenu", 93),
        CtKeyCode::Media(media) => return media_info(media),
        CtKeyCode::Modifier(modifier) => modifier_info(modifier),
        _ => return None,
    };
    Some(info)
}

/// Character a US layout produces for `c` with Shift held.
///
/// Terminals using the kitty keyboard protocol may report the base key plus
/// `SHIFT` instead of the shifted character.
pub fn shifted(c: char) -> char {
    match c {
        'a'..='z' => c.to_ascii_uppercase(),
        '1' => '!',
        '2' => '@',
        '3' => '#',
        '4' => '$',
        '5' => '%',
        '6' => '^',
        '7' => '&',
        '8' => '*',
        '9' => '(',
        '0' => ')',
        '-' => '_',
        '=' => '+',
        '[' => '{',
        ']' => '}',
        '\\' => '|',
        ';' => ':',
        '\'' => '"',
        ',' => '<',
        '.' => '>',
        '/' => '?',
        '`' => '~',
        _ => c,
    }
}

/// The character a key event types, with a reported Shift applied
pub fn apply_shift(c: char, modifiers: KeyModifiers) -> char {
    if modifiers.contains(KeyModifiers::SHIFT) {
        shifted(c)
    } else {
        c
    }
}

fn modifier_info(modifier: ModifierKeyCode) -> KeyInfo {
    use KeyLocation::{Left, Right};
    use ModifierKeyCode as M;
    match modifier {
        M::LeftShift => KeyInfo::new("Shift", "ShiftLeft", 16).located(Left),
        M::RightShift => KeyInfo::new("Shift", "ShiftRight", 16).located(Right),
        M::LeftControl => KeyInfo::new("Control", "ControlLeft", 17).located(Left),
        M::RightControl => KeyInfo::new("Control", "ControlRight", 17).located(Right),
        M::LeftAlt => KeyInfo::new("Alt", "AltLeft", 18).located(Left),
        M::RightAlt => KeyInfo::new("Alt", "AltRight", 18).located(Right),
        M::LeftSuper | M::LeftMeta | M::LeftHyper => {
            KeyInfo::new("Meta", "MetaLeft", 91).located(Left)
        }
        M::RightSuper | M::RightMeta | M::RightHyper => {
            KeyInfo::new("Meta", "MetaRight", 92).located(Right)
        }
        M::IsoLevel3Shift => KeyInfo::new("AltGraph", "AltRight", 225).located(Right),
        M::IsoLevel5Shift => KeyInfo::new("AltGraph", "AltRight", 225).located(Right),
    }
}

fn media_info(media: MediaKeyCode) -> Option<KeyInfo> {
    let info = match media {
        MediaKeyCode::MuteVolume => KeyInfo::new("AudioVolumeMute", "AudioVolumeMute", 173),
        MediaKeyCode::LowerVolume => KeyInfo::new("AudioVolumeDown", "AudioVolumeDown", 174),
        MediaKeyCode::RaiseVolume => KeyInfo::new("AudioVolumeUp", "AudioVolumeUp", 175),
        MediaKeyCode::PlayPause => KeyInfo::new("MediaPlayPause", "MediaPlayPause", 179),
        _ => return None,
    };
    Some(info)
}

fn char_info(c: char, keypad: bool) -> Option<KeyInfo> {
    let display = c.to_string();
    let numpad = |code: &str, numeric: u32| {
        Some(KeyInfo::new(display.clone(), code, numeric).located(KeyLocation::Numpad))
    };

    if keypad {
        match c {
            '0'..='9' => {
                let digit = c as u32 - '0' as u32;
                return numpad(&format!("Numpad{digit}"), 96 + digit);
            }
            '*' => return numpad("NumpadMultiply", 106),
            '+' => return numpad("NumpadAdd", 107),
            '-' => return numpad("NumpadSubtract", 109),
            '.' => return numpad("NumpadDecimal", 110),
            '/' => return numpad("NumpadDivide", 111),
            _ => {}
        }
    }

    let info = match c {
        ' ' => KeyInfo::new(" ", "Space", 32),
        'a'..='z' | 'A'..='Z' => {
            let upper = c.to_ascii_uppercase();
            KeyInfo::new(display, &format!("Key{upper}"), upper as u32)
        }
        '0'..='9' => digit_key(display, c),
        '!' => digit_key(display, '1'),
        '@' => digit_key(display, '2'),
        '#' => digit_key(display, '3'),
        '$' => digit_key(display, '4'),
        '%' => digit_key(display, '5'),
        '^' => digit_key(display, '6'),
        '&' => digit_key(display, '7'),
        '*' => digit_key(display, '8'),
        '(' => digit_key(display, '9'),
        ')' => digit_key(display, '0'),
        '-' | '_' => KeyInfo::new(display, "Minus", 189),
        '=' | '+' => KeyInfo::new(display, "Equal", 187),
        '[' | '{' => KeyInfo::new(display, "BracketLeft", 219),
        ']' | '}' => KeyInfo::new(display, "BracketRight", 221),
        '\\' | '|' => KeyInfo::new(display, "Backslash", 220),
        ';' | ':' => KeyInfo::new(display, "Semicolon", 186),
        '\'' | '"' => KeyInfo::new(display, "Quote", 222),
        ',' | '<' => KeyInfo::new(display, "Comma", 188),
        '.' | '>' => KeyInfo::new(display, "Period", 190),
        '/' | '?' => KeyInfo::new(display, "Slash", 191),
        '`' | '~' => KeyInfo::new(display, "Backquote", 192),
        _ => return None,
    };
    Some(info)
}

fn digit_key(display: String, digit: char) -> KeyInfo {
    KeyInfo::new(display, &format!("Digit{digit}"), digit as u32)
}
