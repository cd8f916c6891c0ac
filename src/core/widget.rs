//! Widget lifecycle shared by every drawable.
//!
//! Passive widgets implement [`Widget`] only: they draw once when created and
//! take no input. Active widgets also implement [`ActiveWidget`]; the [`Ui`]
//! wires their keys into the dispatcher and their focus into the ring, and
//! callers keep a [`Handle`] to them.

use super::input::InputId;
use super::layout::{Position, WidgetBounds};
use super::Ui;
use crossterm::event::KeyCode;
use std::cell::{Ref, RefCell};
use std::fmt;
use std::rc::Rc;

/// Identifier of an active widget, unique for the lifetime of a [`Ui`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct WidgetId(pub u64);

impl fmt::Display for WidgetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "widget-{}", self.0)
    }
}

/// Fields every widget carries.
#[derive(Debug, Clone)]
pub struct WidgetBase {
    pub bounds: WidgetBounds,
    /// Blank the surface before drawing
    pub clear_on_draw: bool,
    pub drawn: bool,
}

impl WidgetBase {
    pub fn new(bounds: WidgetBounds, clear_on_draw: bool) -> Self {
        Self {
            bounds,
            clear_on_draw,
            drawn: false,
        }
    }

    /// Prepare for a passive draw: clears every time when configured to.
    pub fn begin_passive(&mut self, ui: &Ui) -> Position {
        if self.clear_on_draw {
            ui.clear();
        }
        self.drawn = true;
        ui.place(&self.bounds)
    }

    /// Prepare for an active draw: clears only the first time so focus
    /// re-renders leave sibling widgets alone. Returns the position and
    /// whether this is the first draw.
    pub fn begin_active(&mut self, ui: &Ui) -> (Position, bool) {
        let first = !self.drawn;
        if first && self.clear_on_draw {
            ui.clear();
        }
        self.drawn = true;
        (ui.place(&self.bounds), first)
    }
}

/// Anything that renders onto the surface.
pub trait Widget {
    fn bounds(&self) -> WidgetBounds;

    fn draw(&mut self, ui: &Ui);
}

/// Focus and input bookkeeping of an active widget.
#[derive(Debug, Clone)]
pub struct ActiveState {
    pub id: WidgetId,
    pub paused: bool,
    pub stopped: bool,
    /// Dispatcher entries owned by this widget, enabled iff `!paused`
    pub inputs: Vec<InputId>,
    pub base: WidgetBase,
}

impl ActiveState {
    /// Widgets start paused; the focus ring decides who gets focus.
    pub fn new(bounds: WidgetBounds, clear_on_draw: bool) -> Self {
        Self {
            id: WidgetId::default(),
            paused: true,
            stopped: false,
            inputs: Vec::new(),
            base: WidgetBase::new(bounds, clear_on_draw),
        }
    }

    pub fn is_focused(&self) -> bool {
        !self.paused && !self.stopped
    }
}

/// Work a key handler hands back to run once the widget borrow is released.
///
/// User callbacks (menu handlers, text box commits) run here so they can
/// stop the widget, create new ones or move focus.
pub type Deferred<W> = Box<dyn FnOnce(&Handle<W>)>;

/// A widget that owns key registrations and can hold focus.
pub trait ActiveWidget: Widget + 'static {
    fn state(&self) -> &ActiveState;

    fn state_mut(&mut self) -> &mut ActiveState;

    /// Keys to register on attach. Called once.
    fn keys(&self) -> Vec<KeyCode>;

    /// Handle a key routed from the dispatcher. Only called while focused.
    fn on_key(&mut self, key: KeyCode, ui: &Ui) -> Option<Deferred<Self>>
    where
        Self: Sized;

    /// Runs after `paused` changed, before the re-render.
    fn on_pause_changed(&mut self, _ui: &Ui) {}

    /// Runs once when the widget is stopped.
    fn on_stop(&mut self, _ui: &Ui) {}

    fn id(&self) -> WidgetId {
        self.state().id
    }

    fn is_paused(&self) -> bool {
        self.state().paused
    }

    fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    /// Pause or resume: toggles owned inputs, then re-renders.
    /// No-op once stopped.
    fn set_pause(&mut self, paused: bool, ui: &Ui) {
        let state = self.state_mut();
        if state.stopped {
            return;
        }
        state.paused = paused;
        for input in &state.inputs {
            ui.input.set_enabled(*input, !paused);
        }
        self.on_pause_changed(ui);
        self.draw(ui);
    }

    /// Unregister every owned input. Terminal and idempotent.
    fn stop(&mut self, ui: &Ui) {
        let state = self.state_mut();
        if state.stopped {
            return;
        }
        state.stopped = true;
        state.paused = true;
        for input in state.inputs.drain(..) {
            ui.input.remove(input);
        }
        self.on_stop(ui);
    }
}

/// Shared handle to an attached widget.
pub struct Handle<W: ActiveWidget> {
    ui: Rc<Ui>,
    widget: Rc<RefCell<W>>,
}

impl<W: ActiveWidget> Clone for Handle<W> {
    fn clone(&self) -> Self {
        Self {
            ui: Rc::clone(&self.ui),
            widget: Rc::clone(&self.widget),
        }
    }
}

impl<W: ActiveWidget> Handle<W> {
    pub(crate) fn new(ui: Rc<Ui>, widget: Rc<RefCell<W>>) -> Self {
        Self { ui, widget }
    }

    pub fn id(&self) -> WidgetId {
        self.widget.borrow().id()
    }

    pub fn ui(&self) -> &Rc<Ui> {
        &self.ui
    }

    /// Read access to the widget state.
    pub fn widget(&self) -> Ref<'_, W> {
        self.widget.borrow()
    }

    /// Stop the widget and drop it from the focus ring.
    pub fn stop(&self) {
        let id = self.id();
        self.widget.borrow_mut().stop(&self.ui);
        self.ui.release(id);
    }

    /// Resuming moves ring focus to this widget; pausing happens in place.
    pub fn set_pause(&self, paused: bool) {
        if paused {
            self.widget.borrow_mut().set_pause(true, &self.ui);
        } else {
            let id = self.id();
            self.ui.focus_on(id);
        }
    }

    pub fn is_paused(&self) -> bool {
        self.widget.borrow().is_paused()
    }

    pub fn is_stopped(&self) -> bool {
        self.widget.borrow().is_stopped()
    }

    /// Re-render unless stopped.
    pub fn redraw(&self) {
        let mut widget = self.widget.borrow_mut();
        if !widget.is_stopped() {
            widget.draw(&self.ui);
        }
    }

    /// Mutate the widget and re-render it.
    pub fn update<R>(&self, f: impl FnOnce(&mut W) -> R) -> R {
        let result = f(&mut self.widget.borrow_mut());
        self.redraw();
        result
    }
}
