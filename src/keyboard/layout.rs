//! Keyboard form factors and their physical key tables
//!
//! Each layout is a list of key descriptors positioned on a grid measured in
//! key units (1u = one alphanumeric key). The tracker never looks at these
//! tables; the visual maps tracked `KeyCode`s onto them for highlighting.

use crate::config::UnknownValue;
use std::fmt;
use std::str::FromStr;

/// Supported keyboard form factors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LayoutId {
    Full108,
    Full104,
    Tkl,
    SeventyFive,
    /// 68% compact, the default
    #[default]
    SixtyEight,
    SixtyFive,
    Sixty,
    Forty,
}

impl LayoutId {
    /// All layouts in selector order
    pub const ALL: [LayoutId; 8] = [
        Self::Full108,
        Self::Full104,
        Self::Tkl,
        Self::SeventyFive,
        Self::SixtyEight,
        Self::SixtyFive,
        Self::Sixty,
        Self::Forty,
    ];

    /// Short identifier used in configuration
    pub fn id(&self) -> &'static str {
        match self {
            Self::Full108 => "108",
            Self::Full104 => "104",
            Self::Tkl => "tkl",
            Self::SeventyFive => "75",
            Self::SixtyEight => "68",
            Self::SixtyFive => "65",
            Self::Sixty => "60",
            Self::Forty => "40",
        }
    }

    /// Display name for the selector
    pub fn name(&self) -> &'static str {
        match self {
            Self::Full108 => "Full Size 108",
            Self::Full104 => "Full Size 104",
            Self::Tkl => "Tenkeyless (TKL)",
            Self::SeventyFive => "75% Compact",
            Self::SixtyEight => "68% Compact",
            Self::SixtyFive => "65% Compact",
            Self::Sixty => "60% Compact",
            Self::Forty => "40% Mini",
        }
    }

    /// Next layout in selector order, wrapping around
    pub fn next(&self) -> Self {
        let idx = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for LayoutId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for LayoutId {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|layout| layout.id() == wanted)
            .ok_or_else(|| UnknownValue::new("layout", s))
    }
}

/// A single key in a layout table
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyDescriptor {
    /// Physical code matched against tracked keys
    pub code: &'static str,
    pub label: &'static str,
    /// Position in key units
    pub x: f32,
    pub y: f32,
    /// Size in key units
    pub w: f32,
    pub h: f32,
}

/// A complete form factor
#[derive(Debug, Clone)]
pub struct Layout {
    pub id: LayoutId,
    pub keys: Vec<KeyDescriptor>,
}

impl Layout {
    /// Width in key units
    pub fn width(&self) -> f32 {
        self.keys.iter().map(|k| k.x + k.w).fold(0.0, f32::max)
    }

    /// Height in key units
    pub fn height(&self) -> f32 {
        self.keys.iter().map(|k| k.y + k.h).fold(0.0, f32::max)
    }

    pub fn find(&self, code: &str) -> Option<&KeyDescriptor> {
        self.keys.iter().find(|k| k.code == code)
    }

    pub fn contains(&self, code: &str) -> bool {
        self.find(code).is_some()
    }
}

/// (code, label, width); an empty code is a gap
type Slot = (&'static str, &'static str, f32);

const GAP: &str = "";

const NUMBER_ROW: &[Slot] = &[
    ("Backquote", "`", 1.0),
    ("Digit1", "1", 1.0),
    ("Digit2", "2", 1.0),
    ("Digit3", "3", 1.0),
    ("Digit4", "4", 1.0),
    ("Digit5", "5", 1.0),
    ("Digit6", "6", 1.0),
    ("Digit7", "7", 1.0),
    ("Digit8", "8", 1.0),
    ("Digit9", "9", 1.0),
    ("Digit0", "0", 1.0),
    ("Minus", "-", 1.0),
    ("Equal", "=", 1.0),
    ("Backspace", "Bksp", 2.0),
];

const TOP_LETTERS: &[Slot] = &[
    ("KeyQ", "Q", 1.0),
    ("KeyW", "W", 1.0),
    ("KeyE", "E", 1.0),
    ("KeyR", "R", 1.0),
    ("KeyT", "T", 1.0),
    ("KeyY", "Y", 1.0),
    ("KeyU", "U", 1.0),
    ("KeyI", "I", 1.0),
    ("KeyO", "O", 1.0),
    ("KeyP", "P", 1.0),
];

const HOME_LETTERS: &[Slot] = &[
    ("KeyA", "A", 1.0),
    ("KeyS", "S", 1.0),
    ("KeyD", "D", 1.0),
    ("KeyF", "F", 1.0),
    ("KeyG", "G", 1.0),
    ("KeyH", "H", 1.0),
    ("KeyJ", "J", 1.0),
    ("KeyK", "K", 1.0),
    ("KeyL", "L", 1.0),
];

const BOTTOM_LETTERS: &[Slot] = &[
    ("KeyZ", "Z", 1.0),
    ("KeyX", "X", 1.0),
    ("KeyC", "C", 1.0),
    ("KeyV", "V", 1.0),
    ("KeyB", "B", 1.0),
    ("KeyN", "N", 1.0),
    ("KeyM", "M", 1.0),
];

const FUNCTION_KEYS: &[Slot] = &[
    ("F1", "F1", 1.0),
    ("F2", "F2", 1.0),
    ("F3", "F3", 1.0),
    ("F4", "F4", 1.0),
    ("F5", "F5", 1.0),
    ("F6", "F6", 1.0),
    ("F7", "F7", 1.0),
    ("F8", "F8", 1.0),
    ("F9", "F9", 1.0),
    ("F10", "F10", 1.0),
    ("F11", "F11", 1.0),
    ("F12", "F12", 1.0),
];

/// Accumulates descriptors left to right along a row
struct RowBuilder<'a> {
    keys: &'a mut Vec<KeyDescriptor>,
    x: f32,
    y: f32,
}

impl<'a> RowBuilder<'a> {
    fn new(keys: &'a mut Vec<KeyDescriptor>, x: f32, y: f32) -> Self {
        Self { keys, x, y }
    }

    fn slots(mut self, slots: &[Slot]) -> Self {
        for &(code, label, w) in slots {
            self = self.key(code, label, w);
        }
        self
    }

    fn key(self, code: &'static str, label: &'static str, w: f32) -> Self {
        self.tall(code, label, w, 1.0)
    }

    fn tall(self, code: &'static str, label: &'static str, w: f32, h: f32) -> Self {
        if code != GAP {
            self.keys.push(KeyDescriptor { code, label, x: self.x, y: self.y, w, h });
        }
        Self { x: self.x + w, ..self }
    }

    fn gap(self, w: f32) -> Self {
        self.key(GAP, "", w)
    }
}

/// Build the key table for a form factor
pub fn layout(id: LayoutId) -> Layout {
    let mut keys = Vec::with_capacity(110);
    match id {
        LayoutId::Forty => forty(&mut keys),
        LayoutId::Sixty => {
            alpha_block(&mut keys, 0.0);
            full_bottom_row(&mut keys, 4.0);
        }
        LayoutId::SixtyFive => compact(&mut keys, 0.0, ["Delete", "Home", "PageUp", "PageDown"]),
        LayoutId::SixtyEight => compact(&mut keys, 0.0, ["Home", "PageUp", "PageDown", "End"]),
        LayoutId::SeventyFive => {
            RowBuilder::new(&mut keys, 0.0, 0.0)
                .key("Escape", "Esc", 1.0)
                .slots(FUNCTION_KEYS)
                .key("PrintScreen", "PrtSc", 1.0)
                .key("Insert", "Ins", 1.0)
                .key("Delete", "Del", 1.0);
            compact(&mut keys, 1.0, ["Home", "PageUp", "PageDown", "End"]);
        }
        LayoutId::Tkl => tenkeyless(&mut keys),
        LayoutId::Full104 => {
            tenkeyless(&mut keys);
            numpad(&mut keys);
        }
        LayoutId::Full108 => {
            tenkeyless(&mut keys);
            numpad(&mut keys);
            RowBuilder::new(&mut keys, 18.5, 0.0)
                .key("AudioVolumeMute", "Mute", 1.0)
                .key("AudioVolumeDown", "Vol-", 1.0)
                .key("AudioVolumeUp", "Vol+", 1.0)
                .key("LaunchApp2", "Calc", 1.0);
        }
    }
    Layout { id, keys }
}

/// The four alphanumeric rows shared by every layout from 60% up
fn alpha_block(keys: &mut Vec<KeyDescriptor>, y: f32) {
    RowBuilder::new(keys, 0.0, y).slots(NUMBER_ROW);
    RowBuilder::new(keys, 0.0, y + 1.0)
        .key("Tab", "Tab", 1.5)
        .slots(TOP_LETTERS)
        .key("BracketLeft", "[", 1.0)
        .key("BracketRight", "]", 1.0)
        .key("Backslash", "\\", 1.5);
    RowBuilder::new(keys, 0.0, y + 2.0)
        .key("CapsLock", "Caps", 1.75)
        .slots(HOME_LETTERS)
        .key("Semicolon", ";", 1.0)
        .key("Quote", "'", 1.0)
        .key("Enter", "Enter", 2.25);
    RowBuilder::new(keys, 0.0, y + 3.0)
        .key("ShiftLeft", "Shift", 2.25)
        .slots(BOTTOM_LETTERS)
        .key("Comma", ",", 1.0)
        .key("Period", ".", 1.0)
        .key("Slash", "/", 1.0)
        .key("ShiftRight", "Shift", 2.75);
}

fn full_bottom_row(keys: &mut Vec<KeyDescriptor>, y: f32) {
    RowBuilder::new(keys, 0.0, y)
        .key("ControlLeft", "Ctrl", 1.25)
        .key("MetaLeft", "Win", 1.25)
        .key("AltLeft", "Alt", 1.25)
        .key("Space", "Space", 6.25)
        .key("AltRight", "Alt", 1.25)
        .key("MetaRight", "Win", 1.25)
        .key("ContextMenu", "Menu", 1.25)
        .key("ControlRight", "Ctrl", 1.25);
}

/// 65%/68%/75% body: alpha rows plus a right-hand column and inline arrows
fn compact(keys: &mut Vec<KeyDescriptor>, y: f32, column: [&'static str; 4]) {
    RowBuilder::new(keys, 0.0, y)
        .slots(NUMBER_ROW)
        .key(column[0], label_for(column[0]), 1.0);
    RowBuilder::new(keys, 0.0, y + 1.0)
        .key("Tab", "Tab", 1.5)
        .slots(TOP_LETTERS)
        .key("BracketLeft", "[", 1.0)
        .key("BracketRight", "]", 1.0)
        .key("Backslash", "\\", 1.5)
        .key(column[1], label_for(column[1]), 1.0);
    RowBuilder::new(keys, 0.0, y + 2.0)
        .key("CapsLock", "Caps", 1.75)
        .slots(HOME_LETTERS)
        .key("Semicolon", ";", 1.0)
        .key("Quote", "'", 1.0)
        .key("Enter", "Enter", 2.25)
        .key(column[2], label_for(column[2]), 1.0);
    RowBuilder::new(keys, 0.0, y + 3.0)
        .key("ShiftLeft", "Shift", 2.25)
        .slots(BOTTOM_LETTERS)
        .key("Comma", ",", 1.0)
        .key("Period", ".", 1.0)
        .key("Slash", "/", 1.0)
        .key("ShiftRight", "Shift", 1.75)
        .key("ArrowUp", "↑", 1.0)
        .key(column[3], label_for(column[3]), 1.0);
    RowBuilder::new(keys, 0.0, y + 4.0)
        .key("ControlLeft", "Ctrl", 1.25)
        .key("MetaLeft", "Win", 1.25)
        .key("AltLeft", "Alt", 1.25)
        .key("Space", "Space", 6.25)
        .key("AltRight", "Alt", 1.0)
        .key("ContextMenu", "Fn", 1.0)
        .key("ControlRight", "Ctrl", 1.0)
        .key("ArrowLeft", "←", 1.0)
        .key("ArrowDown", "↓", 1.0)
        .key("ArrowRight", "→", 1.0);
}

fn tenkeyless(keys: &mut Vec<KeyDescriptor>) {
    RowBuilder::new(keys, 0.0, 0.0)
        .key("Escape", "Esc", 1.0)
        .gap(1.0)
        .slots(&FUNCTION_KEYS[0..4])
        .gap(0.5)
        .slots(&FUNCTION_KEYS[4..8])
        .gap(0.5)
        .slots(&FUNCTION_KEYS[8..12])
        .gap(0.25)
        .key("PrintScreen", "PrtSc", 1.0)
        .key("ScrollLock", "ScrLk", 1.0)
        .key("Pause", "Pause", 1.0);

    alpha_block(keys, 1.25);
    full_bottom_row(keys, 5.25);

    RowBuilder::new(keys, 15.25, 1.25)
        .key("Insert", "Ins", 1.0)
        .key("Home", "Home", 1.0)
        .key("PageUp", "PgUp", 1.0);
    RowBuilder::new(keys, 15.25, 2.25)
        .key("Delete", "Del", 1.0)
        .key("End", "End", 1.0)
        .key("PageDown", "PgDn", 1.0);
    RowBuilder::new(keys, 16.25, 4.25).key("ArrowUp", "↑", 1.0);
    RowBuilder::new(keys, 15.25, 5.25)
        .key("ArrowLeft", "←", 1.0)
        .key("ArrowDown", "↓", 1.0)
        .key("ArrowRight", "→", 1.0);
}

fn numpad(keys: &mut Vec<KeyDescriptor>) {
    let x = 18.5;
    RowBuilder::new(keys, x, 1.25)
        .key("NumLock", "Num", 1.0)
        .key("NumpadDivide", "/", 1.0)
        .key("NumpadMultiply", "*", 1.0)
        .key("NumpadSubtract", "-", 1.0);
    RowBuilder::new(keys, x, 2.25)
        .key("Numpad7", "7", 1.0)
        .key("Numpad8", "8", 1.0)
        .key("Numpad9", "9", 1.0)
        .tall("NumpadAdd", "+", 1.0, 2.0);
    RowBuilder::new(keys, x, 3.25)
        .key("Numpad4", "4", 1.0)
        .key("Numpad5", "5", 1.0)
        .key("Numpad6", "6", 1.0);
    RowBuilder::new(keys, x, 4.25)
        .key("Numpad1", "1", 1.0)
        .key("Numpad2", "2", 1.0)
        .key("Numpad3", "3", 1.0)
        .tall("NumpadEnter", "Ent", 1.0, 2.0);
    RowBuilder::new(keys, x, 5.25)
        .key("Numpad0", "0", 2.0)
        .key("NumpadDecimal", ".", 1.0);
}

fn forty(keys: &mut Vec<KeyDescriptor>) {
    RowBuilder::new(keys, 0.0, 0.0)
        .key("Tab", "Tab", 1.0)
        .slots(TOP_LETTERS)
        .key("Backspace", "Bksp", 1.75);
    RowBuilder::new(keys, 0.0, 1.0)
        .key("CapsLock", "Caps", 1.25)
        .slots(HOME_LETTERS)
        .key("Enter", "Enter", 2.5);
    RowBuilder::new(keys, 0.0, 2.0)
        .key("ShiftLeft", "Shift", 1.75)
        .slots(BOTTOM_LETTERS)
        .key("Comma", ",", 1.0)
        .key("Period", ".", 1.0)
        .key("ShiftRight", "Shift", 2.0);
    RowBuilder::new(keys, 0.0, 3.0)
        .key("ControlLeft", "Ctrl", 1.25)
        .key("MetaLeft", "Win", 1.25)
        .key("AltLeft", "Alt", 1.25)
        .key("Space", "Space", 6.25)
        .key("AltRight", "Alt", 1.25)
        .key("ControlRight", "Ctrl", 1.5);
}

fn label_for(code: &'static str) -> &'static str {
    match code {
        "Delete" => "Del",
        "Insert" => "Ins",
        "PageUp" => "PgUp",
        "PageDown" => "PgDn",
        other => other,
    }
}
