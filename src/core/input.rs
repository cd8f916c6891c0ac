//! Key-event registry and synchronous dispatch.
//!
//! Widgets register one entry per key they care about and keep the returned
//! [`InputId`] so they can toggle or remove the entry later. The game loop
//! feeds every polled key into [`InputDispatcher::dispatch`].

use crossterm::event::KeyCode;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::rc::Rc;

/// Identifier of a registered input event (smallest free non-negative integer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputId(pub usize);

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

type Handler = Rc<dyn Fn()>;

struct InputEvent {
    id: InputId,
    key: KeyCode,
    handler: Handler,
    enabled: bool,
}

/// Registry of (key, handler, enabled) entries in registration order.
///
/// All methods take `&self` so handlers can register, remove or toggle
/// entries while a dispatch is in progress.
#[derive(Default)]
pub struct InputDispatcher {
    events: RefCell<Vec<InputEvent>>,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for `key`, returning its id.
    pub fn register<F>(&self, key: KeyCode, handler: F, enabled: bool) -> InputId
    where
        F: Fn() + 'static,
    {
        let mut events = self.events.borrow_mut();
        let id = Self::free_id(&events);
        events.push(InputEvent {
            id,
            key,
            handler: Rc::new(handler),
            enabled,
        });
        id
    }

    /// Remove an event. Returns false if the id was not registered.
    pub fn remove(&self, id: InputId) -> bool {
        let mut events = self.events.borrow_mut();
        let before = events.len();
        events.retain(|event| event.id != id);
        events.len() != before
    }

    /// Enable or disable an event without removing it.
    pub fn set_enabled(&self, id: InputId, enabled: bool) -> bool {
        let mut events = self.events.borrow_mut();
        match events.iter_mut().find(|event| event.id == id) {
            Some(event) => {
                event.enabled = enabled;
                true
            }
            None => false,
        }
    }

    pub fn is_enabled(&self, id: InputId) -> Option<bool> {
        self.events
            .borrow()
            .iter()
            .find(|event| event.id == id)
            .map(|event| event.enabled)
    }

    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Invoke every enabled handler bound to `key`, in registration order.
    ///
    /// Matching events are snapshotted first; each one is re-checked right
    /// before it runs, so entries removed or disabled by an earlier handler
    /// are skipped and entries added during this dispatch wait for the next.
    /// Returns the number of handlers invoked.
    pub fn dispatch(&self, key: KeyCode) -> usize {
        let matching: Vec<(InputId, Handler)> = self
            .events
            .borrow()
            .iter()
            .filter(|event| event.key == key && event.enabled)
            .map(|event| (event.id, Rc::clone(&event.handler)))
            .collect();

        let mut invoked = 0;
        for (id, handler) in matching {
            // Ids are reused, so the entry must still hold the same handler
            let live = self.events.borrow().iter().any(|event| {
                event.id == id
                    && event.key == key
                    && event.enabled
                    && Rc::ptr_eq(&event.handler, &handler)
            });

            // Borrow released before the handler runs
            if live {
                handler();
                invoked += 1;
            }
        }

        if invoked == 0 {
            tracing::trace!("No enabled handler for {:?}", key);
        }
        invoked
    }

    fn free_id(events: &[InputEvent]) -> InputId {
        let used: HashSet<usize> = events.iter().map(|event| event.id.0).collect();
        let mut candidate = 0;
        while used.contains(&candidate) {
            candidate += 1;
        }
        InputId(candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    fn recorder() -> Rc<RefCell<Vec<&'static str>>> {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_ids_reuse_smallest_free_slot() {
        let dispatcher = InputDispatcher::new();
        let a = dispatcher.register(KeyCode::Up, || {}, true);
        let b = dispatcher.register(KeyCode::Down, || {}, true);
        let c = dispatcher.register(KeyCode::Enter, || {}, true);
        assert_eq!((a, b, c), (InputId(0), InputId(1), InputId(2)));

        assert!(dispatcher.remove(b));
        assert!(!dispatcher.remove(b));
        assert_eq!(dispatcher.register(KeyCode::Left, || {}, true), InputId(1));
        assert_eq!(dispatcher.register(KeyCode::Right, || {}, true), InputId(3));
    }

    #[test]
    fn test_dispatch_invokes_enabled_matches_in_registration_order() {
        let dispatcher = InputDispatcher::new();
        let log = recorder();

        let l = log.clone();
        dispatcher.register(KeyCode::Enter, move || l.borrow_mut().push("first"), true);
        let l = log.clone();
        dispatcher.register(KeyCode::Char('x'), move || l.borrow_mut().push("other key"), true);
        let l = log.clone();
        let disabled =
            dispatcher.register(KeyCode::Enter, move || l.borrow_mut().push("disabled"), false);
        let l = log.clone();
        dispatcher.register(KeyCode::Enter, move || l.borrow_mut().push("second"), true);

        assert_eq!(dispatcher.dispatch(KeyCode::Enter), 2);
        assert_eq!(*log.borrow(), vec!["first", "second"]);

        // Disabled events are skipped, not removed
        assert_eq!(dispatcher.is_enabled(disabled), Some(false));
        assert_eq!(dispatcher.len(), 4);

        log.borrow_mut().clear();
        dispatcher.set_enabled(disabled, true);
        dispatcher.dispatch(KeyCode::Enter);
        assert_eq!(*log.borrow(), vec!["first", "disabled", "second"]);
    }

    #[test]
    fn test_dispatch_unknown_key_is_noop() {
        let dispatcher = InputDispatcher::new();
        dispatcher.register(KeyCode::Up, || panic!("must not run"), true);
        assert_eq!(dispatcher.dispatch(KeyCode::Down), 0);
    }

    #[test]
    fn test_handler_removing_later_event_skips_it() {
        let dispatcher = Rc::new(InputDispatcher::new());
        let hits = Rc::new(Cell::new(0));
        let victim = Rc::new(Cell::new(None));

        let d = Rc::downgrade(&dispatcher);
        let v = victim.clone();
        dispatcher.register(
            KeyCode::Enter,
            move || {
                if let (Some(d), Some(id)) = (d.upgrade(), v.get()) {
                    d.remove(id);
                }
            },
            true,
        );
        let h = hits.clone();
        victim.set(Some(dispatcher.register(KeyCode::Enter, move || h.set(h.get() + 1), true)));

        assert_eq!(dispatcher.dispatch(KeyCode::Enter), 1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn test_events_added_during_dispatch_wait_for_next_dispatch() {
        let dispatcher = Rc::new(InputDispatcher::new());
        let hits = Rc::new(Cell::new(0));

        let d = Rc::downgrade(&dispatcher);
        let h = hits.clone();
        dispatcher.register(
            KeyCode::Enter,
            move || {
                if let Some(d) = d.upgrade() {
                    let h = h.clone();
                    d.register(KeyCode::Enter, move || h.set(h.get() + 1), true);
                }
            },
            true,
        );

        assert_eq!(dispatcher.dispatch(KeyCode::Enter), 1);
        assert_eq!(hits.get(), 0);
        assert_eq!(dispatcher.dispatch(KeyCode::Enter), 2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn test_reused_id_registered_during_dispatch_waits_for_next_dispatch() {
        let dispatcher = Rc::new(InputDispatcher::new());
        let replaced = Rc::new(Cell::new(0));
        let fresh = Rc::new(Cell::new(0));
        let fresh_id = Rc::new(Cell::new(None));

        let d = Rc::downgrade(&dispatcher);
        let (f, fid) = (fresh.clone(), fresh_id.clone());
        dispatcher.register(
            KeyCode::Enter,
            move || {
                let Some(d) = d.upgrade() else { return };
                if fid.get().is_some() {
                    return;
                }
                d.remove(InputId(1));
                let f = f.clone();
                fid.set(Some(d.register(KeyCode::Enter, move || f.set(f.get() + 1), true)));
            },
            true,
        );
        let r = replaced.clone();
        dispatcher.register(KeyCode::Enter, move || r.set(r.get() + 1), true);

        assert_eq!(dispatcher.dispatch(KeyCode::Enter), 1);
        assert_eq!(fresh_id.get(), Some(InputId(1)));
        assert_eq!(replaced.get(), 0);
        assert_eq!(fresh.get(), 0);

        assert_eq!(dispatcher.dispatch(KeyCode::Enter), 2);
        assert_eq!(fresh.get(), 1);
    }
}
