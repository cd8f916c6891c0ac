//! Widget toolkit core
//!
//! [`Ui`] is the one context object every widget draws through: it owns the
//! surface, the input dispatcher, the focus ring, the audio and delay
//! collaborators, and the read-only UI settings. It is built once per run and
//! shared as `Rc<Ui>`. Everything runs on the input loop's thread.

pub mod error;
pub mod focus;
pub mod input;
pub mod keys;
pub mod layout;
pub mod pacer;
pub mod widget;

pub use error::UiError;
pub use focus::{FocusChange, FocusRing, SharedWidget};
pub use input::{InputDispatcher, InputId};
pub use layout::{Alignment, Offset, Placement, Position, WidgetBounds};
pub use pacer::{Pacer, ThreadPacer};
pub use widget::{ActiveState, ActiveWidget, Deferred, Handle, Widget, WidgetBase, WidgetId};

use crate::frontend::Surface;
use crate::sound::AudioFeedback;
use crossterm::event::KeyCode;
use ratatui::style::{Color, Style};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Settings the toolkit reads but never changes.
#[derive(Debug, Clone, PartialEq)]
pub struct UiConfig {
    /// Delay after each line of a revealed draw
    pub output_delay: Duration,
    pub cheats_enabled: bool,
    /// Line-by-line reveals and frame animations; off draws instantly
    pub animations: bool,
    /// Highlight of the selected menu option
    pub menu_color: Color,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            output_delay: Duration::from_millis(20),
            cheats_enabled: false,
            animations: true,
            menu_color: Color::Cyan,
        }
    }
}

/// Shared toolkit context.
pub struct Ui {
    pub(crate) surface: RefCell<Box<dyn Surface>>,
    pub(crate) input: InputDispatcher,
    focus: RefCell<FocusRing>,
    audio: Box<dyn AudioFeedback>,
    pacer: Box<dyn Pacer>,
    config: UiConfig,
    next_widget_id: Cell<u64>,
}

impl Ui {
    /// Build the context and register the global Tab / Shift-Tab handlers.
    pub fn new(
        surface: Box<dyn Surface>,
        audio: Box<dyn AudioFeedback>,
        pacer: Box<dyn Pacer>,
        config: UiConfig,
    ) -> Rc<Self> {
        Rc::new_cyclic(|weak: &Weak<Ui>| {
            let input = InputDispatcher::new();

            let ui = weak.clone();
            input.register(
                KeyCode::Tab,
                move || {
                    if let Some(ui) = ui.upgrade() {
                        ui.focus_next();
                    }
                },
                true,
            );
            let ui = weak.clone();
            input.register(
                KeyCode::BackTab,
                move || {
                    if let Some(ui) = ui.upgrade() {
                        ui.focus_previous();
                    }
                },
                true,
            );

            Ui {
                surface: RefCell::new(surface),
                input,
                focus: RefCell::new(FocusRing::new()),
                audio,
                pacer,
                config,
                next_widget_id: Cell::new(1),
            }
        })
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    /// Register an application-level key handler (always enabled).
    pub fn on_key<F>(&self, key: KeyCode, handler: F) -> InputId
    where
        F: Fn() + 'static,
    {
        self.input.register(key, handler, true)
    }

    pub fn remove_key(&self, id: InputId) -> bool {
        self.input.remove(id)
    }

    /// Feed one key press to every enabled handler bound to it.
    pub fn dispatch(&self, key: KeyCode) -> usize {
        self.input.dispatch(key)
    }

    pub fn audio(&self) -> &dyn AudioFeedback {
        self.audio.as_ref()
    }

    // --- Surface access ---

    pub fn surface_size(&self) -> (u16, u16) {
        self.surface.borrow().size()
    }

    /// Fail widget construction on a surface with no drawable cells.
    pub fn ensure_surface(&self) -> Result<(), UiError> {
        let (width, height) = self.surface_size();
        if width == 0 || height == 0 {
            return Err(UiError::EmptySurface { width, height });
        }
        Ok(())
    }

    pub fn place(&self, bounds: &WidgetBounds) -> Position {
        layout::compute(bounds, self.surface_size())
    }

    pub fn write(&self, x: u16, y: u16, text: &str, style: Style) {
        self.surface.borrow_mut().write(x, y, text, style);
    }

    pub fn clear(&self) {
        self.surface.borrow_mut().clear();
    }

    /// Push the grid to the display. Failures are logged.
    pub fn flush(&self) {
        if let Err(e) = self.surface.borrow_mut().flush() {
            tracing::error!("Failed to flush surface: {}", e);
        }
    }

    pub fn set_cursor(&self, cursor: Option<(u16, u16)>) {
        self.surface.borrow_mut().set_cursor(cursor);
    }

    // --- Pacing ---

    pub fn tick(&self) {
        self.audio.play_keystroke_tick();
    }

    pub fn pause(&self, duration: Duration) {
        self.pacer.pause(duration);
    }

    pub fn output_delay(&self) -> Duration {
        self.config.output_delay
    }

    /// One beat of a line-by-line reveal: show the line, wait, click.
    pub fn reveal_step(&self) {
        self.flush();
        self.pause(self.config.output_delay);
        self.tick();
    }

    // --- Active widgets ---

    /// Attach an active widget: assign its id, register its keys (disabled
    /// until focused), add it to the focus ring and draw it.
    pub fn attach<W: ActiveWidget>(self: &Rc<Self>, mut widget: W) -> Handle<W> {
        let id = WidgetId(self.next_widget_id.get());
        self.next_widget_id.set(id.0 + 1);
        widget.state_mut().id = id;
        widget.state_mut().paused = true;

        let keys = widget.keys();
        let cell = Rc::new(RefCell::new(widget));
        for key in keys {
            let ui = Rc::downgrade(self);
            let target = Rc::downgrade(&cell);
            let input = self.input.register(
                key,
                move || {
                    if let (Some(ui), Some(target)) = (ui.upgrade(), target.upgrade()) {
                        Ui::route_key(&ui, &target, key);
                    }
                },
                false,
            );
            cell.borrow_mut().state_mut().inputs.push(input);
        }

        let shared: SharedWidget = cell.clone();
        let focused = self.focus.borrow_mut().add(id, shared);
        if focused {
            cell.borrow_mut().set_pause(false, self);
        } else {
            cell.borrow_mut().draw(self);
        }
        tracing::debug!("Attached {} (focused: {})", id, focused);

        Handle::new(Rc::clone(self), cell)
    }

    fn route_key<W: ActiveWidget>(ui: &Rc<Ui>, cell: &Rc<RefCell<W>>, key: KeyCode) {
        let deferred = {
            let Ok(mut widget) = cell.try_borrow_mut() else {
                tracing::warn!("Dropped {:?}: widget is busy", key);
                return;
            };
            if widget.is_paused() || widget.is_stopped() {
                return;
            }
            widget.on_key(key, ui)
        };

        if let Some(action) = deferred {
            action(&Handle::new(Rc::clone(ui), Rc::clone(cell)));
        }
    }

    /// Remove a stopped widget from the focus ring.
    pub(crate) fn release(&self, id: WidgetId) {
        let change = self.focus.borrow_mut().remove(id);
        if let Some(change) = change {
            tracing::debug!("Released {}", id);
            self.apply_focus(change);
        }
    }

    pub fn focus_next(&self) {
        let change = self.focus.borrow_mut().next();
        if !change.is_empty() {
            self.tick();
        }
        self.apply_focus(change);
    }

    pub fn focus_previous(&self) {
        let change = self.focus.borrow_mut().previous();
        if !change.is_empty() {
            self.tick();
        }
        self.apply_focus(change);
    }

    pub fn focus_on(&self, id: WidgetId) {
        let change = self.focus.borrow_mut().focus_on(id);
        match change {
            Some(change) => self.apply_focus(change),
            None => tracing::warn!("Cannot focus {}: not in the focus ring", id),
        }
    }

    fn apply_focus(&self, change: FocusChange) {
        let same = match (&change.pause, &change.resume) {
            (Some(pause), Some(resume)) => Rc::ptr_eq(pause, resume),
            _ => false,
        };
        if let Some(widget) = change.pause.filter(|_| !same) {
            widget.borrow_mut().set_pause(true, self);
        }
        if let Some(widget) = change.resume {
            widget.borrow_mut().set_pause(false, self);
        }
    }

    pub fn focus_index(&self) -> Option<usize> {
        self.focus.borrow().focus_index()
    }

    pub fn focused_id(&self) -> Option<WidgetId> {
        self.focus.borrow().focused_id()
    }

    pub fn ring_len(&self) -> usize {
        self.focus.borrow().len()
    }

    /// Paused flag of a ring member, or None when it is not in the ring.
    pub fn widget_paused(&self, id: WidgetId) -> Option<bool> {
        let widget = self.focus.borrow().get(id)?;
        let paused = widget.borrow().is_paused();
        Some(paused)
    }

    /// Stop every active widget, e.g. before switching scenes.
    pub fn stop_all(&self) {
        let widgets = self.focus.borrow().widgets();
        for widget in widgets {
            let id = {
                let mut widget = widget.borrow_mut();
                widget.stop(self);
                widget.id()
            };
            self.focus.borrow_mut().remove(id);
        }
        self.set_cursor(None);
        tracing::debug!("Stopped all widgets");
    }

    /// Adopt a new surface size and re-render every active widget.
    pub fn resize(&self, width: u16, height: u16) {
        if self.surface_size() == (width, height) {
            return;
        }
        tracing::info!("Surface resized to {}x{}", width, height);
        self.surface.borrow_mut().resize(width, height);
        self.redraw_all();
    }

    /// Re-render every active widget, e.g. after a terminal resize.
    pub fn redraw_all(&self) {
        self.clear();
        let widgets = self.focus.borrow().widgets();
        for widget in widgets {
            let mut widget = widget.borrow_mut();
            widget.state_mut().base.drawn = true;
            widget.draw(self);
        }
        self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{dummy, TestUi, Trace};

    #[test]
    fn test_keys_route_only_to_focused_widget() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);

        t.ui.dispatch(KeyCode::Char('p'));
        assert_eq!(a.widget().presses, 1);
        assert_eq!(b.widget().presses, 0);

        t.ui.focus_next();
        t.ui.dispatch(KeyCode::Char('p'));
        assert_eq!(a.widget().presses, 1);
        assert_eq!(b.widget().presses, 1);
    }

    #[test]
    fn test_pause_toggles_owned_inputs() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let inputs = a.widget().state().inputs.clone();
        assert!(!inputs.is_empty());
        assert!(inputs.iter().all(|id| t.ui.input.is_enabled(*id) == Some(true)));

        a.set_pause(true);
        assert!(inputs.iter().all(|id| t.ui.input.is_enabled(*id) == Some(false)));
        assert_eq!(t.ui.dispatch(KeyCode::Char('p')), 0);
    }

    #[test]
    fn test_stop_unregisters_inputs_and_blocks_draws() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let inputs = a.widget().state().inputs.clone();
        let draws = a.widget().draws;

        a.stop();
        assert!(inputs.iter().all(|id| t.ui.input.is_enabled(*id).is_none()));
        a.set_pause(false);
        a.redraw();
        assert_eq!(a.widget().draws, draws);
        assert!(a.is_paused());
    }

    #[test]
    fn test_widget_ids_are_unique() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        a.stop();
        let b = dummy(&t.ui);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_ensure_surface_rejects_empty_grid() {
        let t = TestUi::new(0, 10);
        assert_eq!(
            t.ui.ensure_surface(),
            Err(UiError::EmptySurface {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn test_reveal_step_order() {
        let t = TestUi::new(10, 2);
        t.clear_trace();
        t.ui.reveal_step();
        let trace = t.trace();
        assert!(matches!(trace[0], Trace::Flush(_)));
        assert_eq!(trace[1], Trace::Pause(Duration::from_millis(20)));
        assert_eq!(trace[2], Trace::Tick);
    }

    #[test]
    fn test_stop_all_empties_ring() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);
        t.ui.stop_all();
        assert_eq!(t.ui.ring_len(), 0);
        assert!(a.is_stopped() && b.is_stopped());
        // Only the global Tab / Shift-Tab handlers remain
        assert_eq!(t.ui.input.len(), 2);
    }

    #[test]
    fn test_handler_may_stop_its_own_widget() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);

        // 's' asks the dummy to stop itself from the deferred action
        t.ui.dispatch(KeyCode::Char('s'));
        assert!(a.is_stopped());
        assert!(!b.is_paused());
        assert_eq!(t.ui.focused_id(), Some(b.id()));
    }

    #[test]
    fn test_application_keys_stay_enabled_until_removed() {
        let t = TestUi::new(40, 12);
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let id = t.ui.on_key(KeyCode::Esc, move || h.set(h.get() + 1));

        let _a = dummy(&t.ui);
        t.ui.dispatch(KeyCode::Esc);
        assert_eq!(hits.get(), 1);

        assert!(t.ui.remove_key(id));
        t.ui.dispatch(KeyCode::Esc);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_resize_redraws_active_widgets() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let draws = a.widget().draws;

        t.ui.resize(40, 12);
        assert_eq!(a.widget().draws, draws);

        t.ui.resize(60, 20);
        assert_eq!(t.ui.surface_size(), (60, 20));
        assert_eq!(a.widget().draws, draws + 1);
    }
}
