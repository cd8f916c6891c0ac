//! Key groups shared by several widgets.

use crossterm::event::KeyCode;

/// Enter as reported by different terminals.
pub const CONFIRM_KEYS: [KeyCode; 3] = [KeyCode::Enter, KeyCode::Char('\n'), KeyCode::Char('\r')];

/// Backspace plus the raw BS/DEL characters.
pub const BACKSPACE_KEYS: [KeyCode; 3] = [
    KeyCode::Backspace,
    KeyCode::Char('\x08'),
    KeyCode::Char('\x7f'),
];

pub fn is_confirm(key: KeyCode) -> bool {
    CONFIRM_KEYS.contains(&key)
}

pub fn is_backspace(key: KeyCode) -> bool {
    BACKSPACE_KEYS.contains(&key)
}

/// Printable ASCII, space through tilde.
pub fn printable() -> impl Iterator<Item = KeyCode> {
    (32u8..=126).map(|byte| KeyCode::Char(byte as char))
}
