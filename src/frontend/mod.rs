//! Frontend abstraction layer
//!
//! The toolkit draws onto a [`Surface`] and reads keys from an
//! [`InputSource`]. The terminal frontend implements both on top of
//! crossterm/ratatui; [`BufferSurface`] is the headless grid used for tests.

pub mod events;
pub mod surface;
pub mod tui;

use anyhow::Result;
use ratatui::buffer::Buffer;
use ratatui::style::Style;
use std::time::Duration;

pub use events::FrontendEvent;
pub use surface::BufferSurface;
pub use tui::{CrosstermInput, TerminalSurface};

/// Fixed-size character grid shared by every widget.
pub trait Surface {
    /// Write `text` starting at (x, y). Anything past the right edge or
    /// below the last row is dropped.
    fn write(&mut self, x: u16, y: u16, text: &str, style: Style);

    /// Blank the whole grid.
    fn clear(&mut self);

    /// Push the grid to the display.
    fn flush(&mut self) -> std::io::Result<()>;

    /// (width, height) in cells
    fn size(&self) -> (u16, u16);

    /// Change the grid size. Contents are discarded.
    fn resize(&mut self, width: u16, height: u16);

    /// Show the text cursor at a cell, or hide it.
    fn set_cursor(&mut self, cursor: Option<(u16, u16)>);

    fn cursor(&self) -> Option<(u16, u16)>;

    /// Backing store, used to read back what has been drawn.
    fn buffer(&self) -> &Buffer;
}

/// Source of raw input events for the game loop.
pub trait InputSource {
    /// Wait up to `timeout` for the next event.
    fn poll(&mut self, timeout: Duration) -> Result<Option<FrontendEvent>>;
}
