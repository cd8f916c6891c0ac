//! Frontend-agnostic input events.
//!
//! The terminal frontend translates crossterm's event stream into this enum
//! so the game loop only handles one event shape.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

#[derive(Debug, Clone, PartialEq)]
pub enum FrontendEvent {
    /// A key press, already reduced to the code the dispatcher matches on
    Key(KeyCode),
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Application quit signal (Ctrl+C)
    Quit,
}

impl FrontendEvent {
    pub fn key(code: KeyCode) -> Self {
        Self::Key(code)
    }

    pub fn resize(width: u16, height: u16) -> Self {
        Self::Resize { width, height }
    }

    pub fn quit() -> Self {
        Self::Quit
    }

    /// Convert a crossterm key event. Releases and repeats are dropped.
    pub fn from_key_event(key: KeyEvent) -> Option<Self> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(Self::Quit);
        }

        // Some terminals report Shift+Tab as Tab with the shift modifier
        if key.code == KeyCode::Tab && key.modifiers.contains(KeyModifiers::SHIFT) {
            return Some(Self::Key(KeyCode::BackTab));
        }

        Some(Self::Key(key.code))
    }
}
