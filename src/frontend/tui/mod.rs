//! Terminal frontend (crossterm + ratatui)
//!
//! [`TerminalSurface`] keeps a [`BufferSurface`](super::BufferSurface) as
//! its backing store and pushes it to the terminal on every flush.
//! [`CrosstermInput`] turns crossterm events into frontend events.

pub mod input;
pub mod terminal;

pub use input::CrosstermInput;
pub use terminal::TerminalSurface;
