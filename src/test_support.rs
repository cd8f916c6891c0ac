//! Headless fixtures for widget tests.
//!
//! [`TestUi`] builds a [`Ui`] over an in-memory grid with a pacer, audio sink
//! and surface that all append to one shared trace, so tests can assert on
//! the order of flushes, delays and ticks without sleeping.

use crate::core::{
    ActiveState, ActiveWidget, Deferred, Handle, Pacer, Placement, Ui, UiConfig, Widget,
    WidgetBounds,
};
use crate::frontend::surface::row_text;
use crate::frontend::{BufferSurface, Surface};
use crate::sound::AudioFeedback;
use crossterm::event::KeyCode;
use ratatui::buffer::Buffer;
use ratatui::style::{Color, Style};
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::time::Duration;

/// Something the toolkit did, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Trace {
    /// Screen rows at the time of the flush
    Flush(Vec<String>),
    Pause(Duration),
    Tick,
    Track(String),
    StopMusic,
    Clear,
}

type TraceLog = Rc<RefCell<Vec<Trace>>>;

struct RecordingSurface {
    grid: BufferSurface,
    trace: TraceLog,
}

impl Surface for RecordingSurface {
    fn write(&mut self, x: u16, y: u16, text: &str, style: Style) {
        self.grid.write(x, y, text, style);
    }

    fn clear(&mut self) {
        self.grid.clear();
        self.trace.borrow_mut().push(Trace::Clear);
    }

    fn flush(&mut self) -> io::Result<()> {
        self.trace.borrow_mut().push(Trace::Flush(self.grid.rows()));
        self.grid.flush()
    }

    fn size(&self) -> (u16, u16) {
        self.grid.size()
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.grid.resize(width, height);
    }

    fn set_cursor(&mut self, cursor: Option<(u16, u16)>) {
        self.grid.set_cursor(cursor);
    }

    fn cursor(&self) -> Option<(u16, u16)> {
        self.grid.cursor()
    }

    fn buffer(&self) -> &Buffer {
        self.grid.buffer()
    }
}

struct RecordingPacer(TraceLog);

impl Pacer for RecordingPacer {
    fn pause(&self, duration: Duration) {
        self.0.borrow_mut().push(Trace::Pause(duration));
    }
}

struct RecordingAudio(TraceLog);

impl AudioFeedback for RecordingAudio {
    fn play_keystroke_tick(&self) {
        self.0.borrow_mut().push(Trace::Tick);
    }

    fn play_track(&self, name: &str, _looped: bool) {
        self.0.borrow_mut().push(Trace::Track(name.to_string()));
    }

    fn stop_music(&self) {
        self.0.borrow_mut().push(Trace::StopMusic);
    }
}

pub struct TestUi {
    pub ui: Rc<Ui>,
    trace: TraceLog,
}

impl TestUi {
    pub fn new(width: u16, height: u16) -> Self {
        Self::with_config(width, height, UiConfig::default())
    }

    /// No delays and no reveal animation.
    pub fn instant(width: u16, height: u16) -> Self {
        Self::with_config(
            width,
            height,
            UiConfig {
                output_delay: Duration::ZERO,
                animations: false,
                ..UiConfig::default()
            },
        )
    }

    pub fn with_config(width: u16, height: u16, config: UiConfig) -> Self {
        let trace: TraceLog = Rc::new(RefCell::new(Vec::new()));
        let surface = RecordingSurface {
            grid: BufferSurface::new(width, height),
            trace: trace.clone(),
        };
        let ui = Ui::new(
            Box::new(surface),
            Box::new(RecordingAudio(trace.clone())),
            Box::new(RecordingPacer(trace.clone())),
            config,
        );
        Self { ui, trace }
    }

    pub fn trace(&self) -> Vec<Trace> {
        self.trace.borrow().clone()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    pub fn tick_count(&self) -> usize {
        self.count(|entry| matches!(entry, Trace::Tick))
    }

    pub fn flush_count(&self) -> usize {
        self.count(|entry| matches!(entry, Trace::Flush(_)))
    }

    pub fn pause_count(&self) -> usize {
        self.count(|entry| matches!(entry, Trace::Pause(_)))
    }

    fn count(&self, predicate: impl Fn(&Trace) -> bool) -> usize {
        self.trace.borrow().iter().filter(|entry| predicate(entry)).count()
    }

    /// Screen rows as currently drawn (flushed or not).
    pub fn rows(&self) -> Vec<String> {
        let surface = self.ui.surface.borrow();
        let buffer = surface.buffer();
        (0..buffer.area.height).map(|y| row_text(buffer, y)).collect()
    }

    pub fn row(&self, y: u16) -> String {
        row_text(self.ui.surface.borrow().buffer(), y)
    }

    /// Rows with trailing blanks removed, dropping empty rows.
    pub fn visible_lines(&self) -> Vec<String> {
        self.rows()
            .into_iter()
            .map(|row| row.trim_end().to_string())
            .filter(|row| !row.is_empty())
            .collect()
    }

    pub fn fg_at(&self, x: u16, y: u16) -> Option<Color> {
        self.ui.surface.borrow().buffer().cell((x, y)).map(|cell| cell.fg)
    }

    /// Locate the first occurrence of `needle` on screen.
    pub fn find(&self, needle: &str) -> Option<(u16, u16)> {
        self.rows().iter().enumerate().find_map(|(y, row)| {
            row.find(needle).map(|byte| {
                let x = row[..byte].chars().count();
                (x as u16, y as u16)
            })
        })
    }

    pub fn cursor(&self) -> Option<(u16, u16)> {
        self.ui.surface.borrow().cursor()
    }

    pub fn press(&self, keys: &[KeyCode]) {
        for key in keys {
            self.ui.dispatch(*key);
        }
    }

    pub fn type_text(&self, text: &str) {
        for c in text.chars() {
            self.ui.dispatch(KeyCode::Char(c));
        }
    }
}

/// Minimal active widget: counts `p` presses, stops itself on `s`.
pub struct Dummy {
    state: ActiveState,
    pub presses: usize,
    pub draws: usize,
}

impl Widget for Dummy {
    fn bounds(&self) -> WidgetBounds {
        self.state.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        self.state.base.begin_active(ui);
        self.draws += 1;
    }
}

impl ActiveWidget for Dummy {
    fn state(&self) -> &ActiveState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut ActiveState {
        &mut self.state
    }

    fn keys(&self) -> Vec<KeyCode> {
        vec![KeyCode::Char('p'), KeyCode::Char('s')]
    }

    fn on_key(&mut self, key: KeyCode, _ui: &Ui) -> Option<Deferred<Self>> {
        match key {
            KeyCode::Char('p') => {
                self.presses += 1;
                None
            }
            KeyCode::Char('s') => Some(Box::new(|handle: &Handle<Dummy>| handle.stop())),
            _ => None,
        }
    }
}

pub fn dummy(ui: &Rc<Ui>) -> Handle<Dummy> {
    ui.attach(Dummy {
        state: ActiveState::new(WidgetBounds::new(1, 1, Placement::left()), false),
        presses: 0,
        draws: 0,
    })
}
