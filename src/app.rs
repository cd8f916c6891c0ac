//! The cooperative input loop.
//!
//! One thread polls the input source, hands each key to the dispatcher and
//! lets the focused widget redraw itself before the next poll. Paced draws
//! block this loop; keys typed meanwhile wait in the terminal's queue.

use crate::frontend::{FrontendEvent, InputSource};
use crate::game::Game;
use anyhow::Result;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Debouncer for terminal resize events, so dragging a window edge does not
/// redraw every widget for each intermediate size.
struct ResizeDebouncer {
    last_resize_time: Option<Instant>,
    debounce_duration: Duration,
    pending_size: Option<(u16, u16)>,
}

impl ResizeDebouncer {
    fn new(debounce_duration: Duration) -> Self {
        Self {
            last_resize_time: None,
            debounce_duration,
            pending_size: None,
        }
    }

    fn quiet(&self, now: Instant) -> bool {
        self.last_resize_time
            .map_or(true, |last| now.duration_since(last) >= self.debounce_duration)
    }

    /// Some(size) if the resize should be applied now, None if deferred.
    fn check_resize(&mut self, width: u16, height: u16) -> Option<(u16, u16)> {
        let now = Instant::now();
        if self.quiet(now) {
            self.last_resize_time = Some(now);
            self.pending_size = None;
            Some((width, height))
        } else {
            self.pending_size = Some((width, height));
            None
        }
    }

    /// A deferred resize whose quiet period has passed.
    fn check_pending(&mut self) -> Option<(u16, u16)> {
        let now = Instant::now();
        if !self.quiet(now) {
            return None;
        }
        let size = self.pending_size.take()?;
        self.last_resize_time = Some(now);
        Some(size)
    }
}

pub struct App {
    game: Rc<Game>,
    poll_timeout: Duration,
    resize_debouncer: ResizeDebouncer,
}

impl App {
    pub fn new(game: Rc<Game>, poll_timeout: Duration) -> Self {
        Self {
            game,
            poll_timeout,
            resize_debouncer: ResizeDebouncer::new(Duration::from_millis(150)),
        }
    }

    /// Run until the game asks to quit or the input source reports Ctrl-C.
    pub fn run(&mut self, input: &mut dyn InputSource) -> Result<()> {
        info!("Entering input loop");
        while !self.game.should_quit() {
            if let Some(event) = input.poll(self.poll_timeout)? {
                self.handle_event(event);
            }
            if let Some((width, height)) = self.resize_debouncer.check_pending() {
                self.game.ui().resize(width, height);
            }
        }

        let ui = self.game.ui();
        ui.stop_all();
        ui.audio().stop_music();
        info!("Input loop finished");
        Ok(())
    }

    fn handle_event(&mut self, event: FrontendEvent) {
        match event {
            FrontendEvent::Key(code) => {
                let handled = self.game.ui().dispatch(code);
                debug!("Key {:?} -> {} handler(s)", code, handled);
            }
            FrontendEvent::Resize { width, height } => {
                if let Some((width, height)) = self.resize_debouncer.check_resize(width, height) {
                    self.game.ui().resize(width, height);
                }
            }
            FrontendEvent::Quit => self.game.request_quit(),
        }
    }
}
