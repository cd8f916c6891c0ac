//! Fixed frame sequence played in place (passive).

use crate::core::{Placement, Ui, UiError, Widget, WidgetBase, WidgetBounds};
use ratatui::style::Style;
use std::time::Duration;

pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(300);

/// Plays every frame once, top to bottom, each overwriting the last.
///
/// Frames may span several lines. All frames are padded to the size of the
/// largest one so nothing from a previous frame survives.
pub struct Animation {
    base: WidgetBase,
    frames: Vec<Vec<String>>,
    delay: Duration,
    audio: bool,
}

impl Animation {
    pub fn new<S: AsRef<str>>(
        frames: &[S],
        delay: Duration,
        placement: Placement,
    ) -> Result<Self, UiError> {
        if frames.is_empty() {
            return Err(UiError::EmptyWidget("animation"));
        }

        let split: Vec<Vec<&str>> = frames
            .iter()
            .map(|frame| frame.as_ref().split('\n').collect())
            .collect();
        let width = split
            .iter()
            .flatten()
            .map(|line| line.chars().count())
            .max()
            .unwrap_or(0);
        let height = split.iter().map(Vec::len).max().unwrap_or(0);

        let frames = split
            .into_iter()
            .map(|lines| {
                (0..height)
                    .map(|row| format!("{:<width$}", lines.get(row).copied().unwrap_or("")))
                    .collect()
            })
            .collect();

        Ok(Self {
            base: WidgetBase::new(
                WidgetBounds::new(width as u16, height as u16, placement),
                true,
            ),
            frames,
            delay,
            audio: true,
        })
    }

    /// Draw over whatever is on screen instead of clearing first.
    pub fn keep_screen(mut self) -> Self {
        self.base.clear_on_draw = false;
        self
    }

    pub fn silent(mut self) -> Self {
        self.audio = false;
        self
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    fn show(&self, ui: &Ui, x: u16, y: u16, frame: &[String]) {
        for (row, line) in frame.iter().enumerate() {
            ui.write(x, y + row as u16, line, Style::default());
        }
    }
}

impl Widget for Animation {
    fn bounds(&self) -> WidgetBounds {
        self.base.bounds
    }

    /// Blocks until the last frame has been shown.
    fn draw(&mut self, ui: &Ui) {
        let origin = self.base.begin_passive(ui);

        if !ui.config().animations {
            if let Some(last) = self.frames.last() {
                self.show(ui, origin.x, origin.y, last);
            }
            ui.flush();
            return;
        }

        for frame in &self.frames {
            self.show(ui, origin.x, origin.y, frame);
            if self.audio {
                ui.tick();
            }
            ui.flush();
            ui.pause(self.delay);
        }
    }
}

impl Ui {
    pub fn create_animation<S: AsRef<str>>(
        &self,
        frames: &[S],
        delay: Duration,
        placement: Placement,
    ) -> Result<Animation, UiError> {
        self.ensure_surface()?;
        let mut animation = Animation::new(frames, delay, placement)?;
        animation.draw(self);
        Ok(animation)
    }
}
