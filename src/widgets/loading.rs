//! Loading screens (passive): a quick progress bar and the boot log.

use super::chrome::INFO_BORDER;
use crate::core::{Offset, Placement, Ui, UiError, Widget, WidgetBase, WidgetBounds};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::{Color, Style};
use std::time::Duration;

const BAR_WIDTH: usize = 20;
const FAST_STEP: Duration = Duration::from_millis(40);
const FAST_HOLD: Duration = Duration::from_millis(500);
const SPIN_STEP: Duration = Duration::from_millis(100);
const SPINNER: [char; 4] = ['|', '/', '-', '\\'];

/// Progress bar that climbs to 100% in random 1-3% steps, then clears.
pub struct FastLoading {
    base: WidgetBase,
    rng: StdRng,
    step: Duration,
    history: Vec<u8>,
}

impl FastLoading {
    pub fn new(rng: StdRng) -> Self {
        let width = INFO_BORDER.outer_width(BAR_WIDTH - 2) as u16;
        Self {
            base: WidgetBase::new(WidgetBounds::new(width, 3, Placement::center()), true),
            rng,
            step: FAST_STEP,
            history: Vec::new(),
        }
    }

    /// Every percentage shown, in order.
    pub fn history(&self) -> &[u8] {
        &self.history
    }

    fn show(&mut self, ui: &Ui, x: u16, y: u16, percent: u8) {
        let filled = BAR_WIDTH * percent as usize / 100;
        let header = format!("Xx________{:03}%________xX", percent);
        let bar = format!("{}{}", "=".repeat(filled), " ".repeat(BAR_WIDTH - filled));
        ui.write(x, y, &header, Style::default());
        ui.write(x + 2, y + 1, &bar, Style::default().fg(Color::Green));
        ui.flush();
        self.history.push(percent);
    }
}

impl Widget for FastLoading {
    fn bounds(&self) -> WidgetBounds {
        self.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        let origin = self.base.begin_passive(ui);
        let (x, y) = (origin.x, origin.y);
        self.history.clear();

        ui.write(x, y, &INFO_BORDER.top_rule(BAR_WIDTH - 2), Style::default());
        ui.write(x, y + 1, &INFO_BORDER.row(&" ".repeat(BAR_WIDTH - 2)), Style::default());
        ui.write(x, y + 2, &INFO_BORDER.bottom_rule(BAR_WIDTH - 2), Style::default());

        if !ui.config().animations {
            self.show(ui, x, y, 100);
            ui.clear();
            ui.flush();
            return;
        }

        let mut percent = 0u8;
        while percent < 100 {
            self.show(ui, x, y, percent);
            percent = (percent + self.rng.gen_range(1..=3)).min(100);
            ui.pause(self.step);
        }
        self.show(ui, x, y, 100);
        ui.pause(FAST_HOLD);

        ui.clear();
        ui.flush();
    }
}

/// Boot log: one row per subsystem, each spinning a few beats before DONE.
pub struct LoadingAnimation {
    base: WidgetBase,
    rng: StdRng,
    names: Vec<String>,
}

impl LoadingAnimation {
    pub fn new(names: Vec<String>, rng: StdRng) -> Self {
        let width = names
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            + 10;
        let placement = Placement::left()
            .with_x(Offset::set(0))
            .with_y(Offset::set(0));
        Self {
            base: WidgetBase::new(
                WidgetBounds::new(width as u16, names.len() as u16, placement),
                true,
            ),
            rng,
            names,
        }
    }

    pub fn default_names() -> Vec<String> {
        [
            "sound::player",
            "sound::ticks",
            "core::input",
            "core::focus",
            "core::layout",
            "frontend::terminal",
            "config",
            "widgets::table",
            "widgets::menu",
            "widgets::text_box",
            "widgets::animation",
            "widgets::map_view",
            "game::hero",
            "game::races",
            "game::levels",
            "game::settings",
        ]
        .into_iter()
        .map(String::from)
        .collect()
    }
}

impl Widget for LoadingAnimation {
    fn bounds(&self) -> WidgetBounds {
        self.base.bounds
    }

    fn draw(&mut self, ui: &Ui) {
        let origin = self.base.begin_passive(ui);
        let name_width = self
            .names
            .iter()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0);
        let status_x = origin.x + name_width as u16 + 4;
        let animate = ui.config().animations;

        for (row, name) in self.names.iter().enumerate() {
            let y = origin.y + row as u16;
            ui.write(origin.x, y, &format!("| {:<name_width$} ", name), Style::default());
            if !animate {
                ui.write(status_x, y, "DONE |", Style::default().fg(Color::Green));
                continue;
            }

            let spins = self.rng.gen_range(2..=6);
            for beat in 0..spins {
                let symbol = SPINNER[beat % SPINNER.len()].to_string();
                ui.write(status_x, y, &symbol, Style::default().fg(Color::Yellow));
                ui.flush();
                ui.pause(SPIN_STEP);
                ui.write(status_x, y, " ", Style::default());
            }

            ui.write(status_x, y, "DONE |", Style::default().fg(Color::Green));
            ui.flush();
            ui.pause(Duration::from_millis(self.rng.gen_range(20..=90)));
        }
        if !animate {
            ui.flush();
        }
    }
}

impl Ui {
    /// Short progress bar shown on every launch after the first.
    pub fn fast_loading(&self) -> Result<FastLoading, UiError> {
        self.fast_loading_with(StdRng::from_entropy())
    }

    pub fn fast_loading_with(&self, rng: StdRng) -> Result<FastLoading, UiError> {
        self.ensure_surface()?;
        let mut loading = FastLoading::new(rng);
        loading.draw(self);
        Ok(loading)
    }

    /// Boot log shown on first launch.
    pub fn loading_animation(&self) -> Result<LoadingAnimation, UiError> {
        self.loading_animation_with(LoadingAnimation::default_names(), StdRng::from_entropy())
    }

    pub fn loading_animation_with(
        &self,
        names: Vec<String>,
        rng: StdRng,
    ) -> Result<LoadingAnimation, UiError> {
        self.ensure_surface()?;
        if names.is_empty() {
            return Err(UiError::EmptyWidget("loading animation"));
        }
        let mut loading = LoadingAnimation::new(names, rng);
        loading.draw(self);
        Ok(loading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestUi, Trace};

    #[test]
    fn test_fast_loading_climbs_in_small_steps() {
        let t = TestUi::new(40, 10);
        let loading = t.ui.fast_loading_with(StdRng::seed_from_u64(7)).unwrap();

        let history = loading.history();
        assert_eq!(history.first(), Some(&0));
        assert_eq!(history.last(), Some(&100));
        for pair in history.windows(2) {
            let step = pair[1] - pair[0];
            assert!((1..=3).contains(&step), "step {} out of range", step);
        }
    }

    #[test]
    fn test_fast_loading_holds_full_bar_then_clears() {
        let t = TestUi::new(40, 10);
        t.ui.fast_loading_with(StdRng::seed_from_u64(1)).unwrap();

        let trace = t.trace();
        let last_full = trace
            .iter()
            .rev()
            .find_map(|entry| match entry {
                Trace::Flush(rows) if rows.iter().any(|row| row.contains("100%")) => Some(rows),
                _ => None,
            })
            .unwrap();
        assert!(last_full.iter().any(|row| row.contains(&"=".repeat(20))));

        assert_eq!(trace[trace.len() - 3], Trace::Pause(FAST_HOLD));
        assert_eq!(trace[trace.len() - 2], Trace::Clear);
        assert!(t.visible_lines().is_empty());
    }

    #[test]
    fn test_fast_loading_is_deterministic_for_a_seed() {
        let t = TestUi::new(40, 10);
        let a = t.ui.fast_loading_with(StdRng::seed_from_u64(42)).unwrap();
        let b = t.ui.fast_loading_with(StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a.history(), b.history());
    }

    #[test]
    fn test_loading_animation_marks_every_row_done() {
        let t = TestUi::new(40, 6);
        let names = vec!["core::input".to_string(), "sound".to_string()];
        t.ui
            .loading_animation_with(names, StdRng::seed_from_u64(3))
            .unwrap();

        assert_eq!(t.row(0).trim_end(), "| core::input  DONE |");
        assert_eq!(t.row(1).trim_end(), "| sound        DONE |");

        let spins = t
            .trace()
            .iter()
            .filter(|entry| **entry == Trace::Pause(SPIN_STEP))
            .count();
        assert!((4..=12).contains(&spins));
    }

    #[test]
    fn test_loading_screens_skip_delays_without_animations() {
        let t = TestUi::instant(40, 10);
        let loading = t.ui.fast_loading_with(StdRng::seed_from_u64(5)).unwrap();
        assert_eq!(loading.history(), &[100]);
        assert_eq!(t.pause_count(), 0);
        assert!(t.visible_lines().is_empty());

        let names = vec!["config".to_string(), "sound".to_string()];
        t.ui
            .loading_animation_with(names, StdRng::seed_from_u64(5))
            .unwrap();
        assert_eq!(t.pause_count(), 0);
        assert_eq!(t.row(0).trim_end(), "| config  DONE |");
        assert_eq!(t.row(1).trim_end(), "| sound   DONE |");
    }

    #[test]
    fn test_loading_animation_needs_names() {
        let t = TestUi::new(40, 6);
        assert!(t
            .ui
            .loading_animation_with(Vec::new(), StdRng::seed_from_u64(0))
            .is_err());
    }
}
