//! Single-line text entry (active).

use super::chrome::{self, INFO_BORDER};
use crate::core::keys::{self, BACKSPACE_KEYS, CONFIRM_KEYS};
use crate::core::{
    ActiveState, ActiveWidget, Deferred, Handle, Placement, Ui, UiError, Widget, WidgetBounds,
};
use crossterm::event::KeyCode;
use std::rc::Rc;
use tracing::debug;

pub type TextBoxHandle = Handle<TextBox>;

/// Receives the buffer when a confirm key is pressed.
pub type CommitHandler = Rc<dyn Fn(&str, &TextBoxHandle)>;

/// What the box accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// Any printable character
    #[default]
    String,
    /// Digits only
    Integer,
    /// Digits and a single decimal point; `,` is read as `.`
    Float,
}

#[derive(Debug, Clone)]
pub struct TextBoxLayout {
    /// Visible columns inside the border
    pub width: u16,
    pub placement: Placement,
    pub clear: bool,
}

impl Default for TextBoxLayout {
    fn default() -> Self {
        Self {
            width: 22,
            placement: Placement::center(),
            clear: true,
        }
    }
}

impl TextBoxLayout {
    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(1);
        self
    }

    pub fn placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn keep_screen(mut self) -> Self {
        self.clear = false;
        self
    }
}

pub struct TextBox {
    state: ActiveState,
    buffer: String,
    max_length: usize,
    kind: ValueKind,
    done: bool,
    width: usize,
    on_commit: Option<CommitHandler>,
    /// Set while the terminal cursor was placed by this box
    owns_cursor: bool,
}

impl TextBox {
    pub fn new(
        layout: TextBoxLayout,
        max_length: usize,
        kind: ValueKind,
        on_commit: Option<CommitHandler>,
    ) -> Self {
        let width = layout.width as usize;
        let bounds = WidgetBounds::new(INFO_BORDER.outer_width(width) as u16, 3, layout.placement);
        Self {
            state: ActiveState::new(bounds, layout.clear),
            buffer: String::new(),
            max_length,
            kind,
            done: false,
            width,
            on_commit,
            owns_cursor: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// True once a confirm key has been pressed.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }

    pub fn as_integer(&self) -> Option<i64> {
        self.buffer.parse().ok()
    }

    pub fn as_float(&self) -> Option<f64> {
        self.buffer.parse().ok()
    }

    /// Append one character if the value kind and length limit allow it.
    pub fn push_char(&mut self, c: char) -> bool {
        let c = match self.kind {
            ValueKind::String => c,
            ValueKind::Integer if c.is_ascii_digit() => c,
            ValueKind::Float if c.is_ascii_digit() => c,
            ValueKind::Float if c == '.' || c == ',' => '.',
            _ => return false,
        };
        if self.buffer.chars().count() >= self.max_length {
            return false;
        }
        if self.kind == ValueKind::Float && c == '.' && self.buffer.contains('.') {
            return false;
        }
        self.buffer.push(c);
        true
    }

    pub fn backspace(&mut self) -> bool {
        self.buffer.pop().is_some()
    }

    fn release_cursor(&mut self, ui: &Ui) {
        if self.owns_cursor {
            ui.set_cursor(None);
            self.owns_cursor = false;
        }
    }

    /// Tail of the buffer that fits the box.
    fn visible_text(&self) -> String {
        let len = self.buffer.chars().count();
        self.buffer.chars().skip(len.saturating_sub(self.width)).collect()
    }
}

impl Widget for TextBox {
    fn bounds(&self) -> WidgetBounds {
        self.state.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        let (origin, first) = self.state.base.begin_active(ui);
        let reveal = first && ui.config().animations;
        let focused = self.state.is_focused();
        let style = if focused { chrome::normal() } else { chrome::dimmed() };

        let blank = INFO_BORDER.row(&" ".repeat(self.width));
        let frame = [
            INFO_BORDER.top_rule(self.width),
            blank,
            INFO_BORDER.bottom_rule(self.width),
        ];
        for (row, line) in frame.iter().enumerate() {
            ui.write(origin.x, origin.y + row as u16, line, style);
            if reveal {
                ui.reveal_step();
            }
        }

        let text = self.visible_text();
        let text_x = origin.x + INFO_BORDER.edge.len() as u16 + 1;
        ui.write(text_x, origin.y + 1, &text, style);

        // An unfocused box leaves the cursor to whoever has focus
        if focused {
            ui.set_cursor(Some((text_x + text.chars().count() as u16, origin.y + 1)));
            self.owns_cursor = true;
        }
        ui.flush();
    }
}

impl ActiveWidget for TextBox {
    fn state(&self) -> &ActiveState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActiveState {
        &mut self.state
    }

    fn keys(&self) -> Vec<KeyCode> {
        keys::printable()
            .chain(CONFIRM_KEYS)
            .chain(BACKSPACE_KEYS)
            .collect()
    }

    fn on_key(&mut self, key: KeyCode, ui: &Ui) -> Option<Deferred<Self>> {
        if keys::is_confirm(key) {
            self.done = true;
            debug!("Text box committed {:?}", self.buffer);
            let handler = self.on_commit.clone()?;
            return Some(Box::new(move |text_box: &TextBoxHandle| {
                let text = text_box.widget().text().to_string();
                handler(&text, text_box);
            }));
        }

        let changed = if keys::is_backspace(key) {
            self.backspace()
        } else if let KeyCode::Char(c) = key {
            self.push_char(c)
        } else {
            false
        };
        if changed {
            ui.tick();
            self.draw(ui);
        }
        None
    }

    fn on_pause_changed(&mut self, ui: &Ui) {
        if self.state.paused {
            self.release_cursor(ui);
        }
    }

    fn on_stop(&mut self, ui: &Ui) {
        self.release_cursor(ui);
    }
}

impl Ui {
    /// Build a text box, attach it and draw it. `on_commit` runs when a
    /// confirm key is pressed; stopping the box is left to the callback.
    pub fn create_text_box<F>(
        self: &Rc<Self>,
        layout: TextBoxLayout,
        max_length: usize,
        kind: ValueKind,
        on_commit: F,
    ) -> Result<TextBoxHandle, UiError>
    where
        F: Fn(&str, &TextBoxHandle) + 'static,
    {
        self.ensure_surface()?;
        let handler: CommitHandler = Rc::new(on_commit);
        Ok(self.attach(TextBox::new(layout, max_length, kind, Some(handler))))
    }
}
