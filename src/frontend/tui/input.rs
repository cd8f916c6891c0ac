use crate::frontend::{FrontendEvent, InputSource};
use anyhow::Result;
use crossterm::event::{self, Event};
use std::time::Duration;

/// Reads key presses and resizes from the terminal.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl CrosstermInput {
    pub fn new() -> Self {
        Self
    }

    fn convert_event(event: Event) -> Option<FrontendEvent> {
        match event {
            Event::Key(key_event) => FrontendEvent::from_key_event(key_event),
            Event::Resize(width, height) => Some(FrontendEvent::resize(width, height)),
            _ => None,
        }
    }
}

impl InputSource for CrosstermInput {
    fn poll(&mut self, timeout: Duration) -> Result<Option<FrontendEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(Self::convert_event(event::read()?))
    }
}
