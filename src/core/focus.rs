//! Tab-cycled focus over the attached active widgets.
//!
//! The ring only does the bookkeeping. Each operation returns a
//! [`FocusChange`] that the [`Ui`](super::Ui) applies after the ring borrow is
//! released, since pausing a widget re-renders it.

use super::widget::{ActiveWidget, WidgetId};
use std::cell::RefCell;
use std::rc::Rc;

pub type SharedWidget = Rc<RefCell<dyn ActiveWidget>>;

struct Member {
    id: WidgetId,
    widget: SharedWidget,
}

/// Widgets to pause and resume, in that order.
#[derive(Default)]
pub struct FocusChange {
    pub pause: Option<SharedWidget>,
    pub resume: Option<SharedWidget>,
}

impl FocusChange {
    pub fn is_empty(&self) -> bool {
        self.pause.is_none() && self.resume.is_none()
    }
}

/// Ordered active widgets plus the index of the focused one.
///
/// At most one member is unpaused at a time, and when one is it sits at
/// `focus_index`.
#[derive(Default)]
pub struct FocusRing {
    members: Vec<Member>,
    focus_index: usize,
}

impl FocusRing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn focus_index(&self) -> Option<usize> {
        (!self.members.is_empty()).then_some(self.focus_index)
    }

    pub fn focused_id(&self) -> Option<WidgetId> {
        self.members.get(self.focus_index).map(|member| member.id)
    }

    pub fn contains(&self, id: WidgetId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: WidgetId) -> Option<SharedWidget> {
        self.position(id)
            .map(|index| Rc::clone(&self.members[index].widget))
    }

    pub fn widgets(&self) -> Vec<SharedWidget> {
        self.members
            .iter()
            .map(|member| Rc::clone(&member.widget))
            .collect()
    }

    /// Append a widget. Returns true when it is the only member and so
    /// takes focus; otherwise it stays paused.
    pub fn add(&mut self, id: WidgetId, widget: SharedWidget) -> bool {
        self.members.push(Member { id, widget });
        if self.members.len() == 1 {
            self.focus_index = 0;
            return true;
        }
        false
    }

    pub fn next(&mut self) -> FocusChange {
        self.rotate(1)
    }

    pub fn previous(&mut self) -> FocusChange {
        self.rotate(self.members.len().saturating_sub(1))
    }

    fn rotate(&mut self, step: usize) -> FocusChange {
        let len = self.members.len();
        if len == 0 {
            return FocusChange::default();
        }
        let pause = self.current();
        self.focus_index = (self.focus_index + step) % len;
        tracing::debug!("Focus moved to index {}", self.focus_index);
        FocusChange {
            pause,
            resume: self.current(),
        }
    }

    /// Move focus straight to a member.
    pub fn focus_on(&mut self, id: WidgetId) -> Option<FocusChange> {
        let index = self.position(id)?;
        let pause = if index == self.focus_index {
            None
        } else {
            self.current()
        };
        self.focus_index = index;
        Some(FocusChange {
            pause,
            resume: self.current(),
        })
    }

    /// Drop a member, clamping the focus index into the remaining range.
    /// When no remaining widget is unpaused, focus falls back to index 0.
    pub fn remove(&mut self, id: WidgetId) -> Option<FocusChange> {
        let index = self.position(id)?;
        self.members.remove(index);

        if self.members.is_empty() {
            self.focus_index = 0;
            return Some(FocusChange::default());
        }

        if index < self.focus_index {
            self.focus_index -= 1;
        }
        self.focus_index = self.focus_index.min(self.members.len() - 1);

        let any_focused = self.members.iter().any(|member| {
            member
                .widget
                .try_borrow()
                .map_or(true, |widget| !widget.is_paused())
        });
        if any_focused {
            return Some(FocusChange::default());
        }

        self.focus_index = 0;
        Some(FocusChange {
            pause: None,
            resume: self.current(),
        })
    }

    fn current(&self) -> Option<SharedWidget> {
        self.members
            .get(self.focus_index)
            .map(|member| Rc::clone(&member.widget))
    }

    fn position(&self, id: WidgetId) -> Option<usize> {
        self.members.iter().position(|member| member.id == id)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{dummy, TestUi};

    fn unpaused_count(t: &TestUi, ids: &[crate::core::WidgetId]) -> usize {
        ids.iter()
            .filter(|id| t.ui.widget_paused(**id) == Some(false))
            .count()
    }

    #[test]
    fn test_first_widget_takes_focus_later_ones_wait() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);

        assert!(!a.is_paused());
        assert!(b.is_paused());
        assert_eq!(t.ui.focused_id(), Some(a.id()));
    }

    #[test]
    fn test_next_full_cycle_returns_to_start() {
        let t = TestUi::new(40, 12);
        let handles: Vec<_> = (0..4).map(|_| dummy(&t.ui)).collect();
        let ids: Vec<_> = handles.iter().map(|h| h.id()).collect();

        let start = t.ui.focus_index();
        for _ in 0..ids.len() {
            t.ui.focus_next();
            assert_eq!(unpaused_count(&t, &ids), 1);
            let focused = t.ui.focused_id().unwrap();
            assert_eq!(t.ui.widget_paused(focused), Some(false));
        }
        assert_eq!(t.ui.focus_index(), start);
    }

    #[test]
    fn test_previous_wraps_backwards() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let _b = dummy(&t.ui);
        let c = dummy(&t.ui);

        t.ui.focus_previous();
        assert_eq!(t.ui.focused_id(), Some(c.id()));
        assert!(a.is_paused());
        assert!(!c.is_paused());
    }

    #[test]
    fn test_tab_keys_rotate_focus_and_tick() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);
        t.clear_trace();

        t.ui.dispatch(crossterm::event::KeyCode::Tab);
        assert_eq!(t.ui.focused_id(), Some(b.id()));
        assert_eq!(t.tick_count(), 1);

        t.ui.dispatch(crossterm::event::KeyCode::BackTab);
        assert_eq!(t.ui.focused_id(), Some(a.id()));
    }

    #[test]
    fn test_removing_focused_widget_refocuses_one() {
        let t = TestUi::new(40, 12);
        let handles: Vec<_> = (0..3).map(|_| dummy(&t.ui)).collect();
        t.ui.focus_next();
        t.ui.focus_next();
        assert_eq!(t.ui.focused_id(), Some(handles[2].id()));

        handles[2].stop();
        let remaining: Vec<_> = handles[..2].iter().map(|h| h.id()).collect();
        let index = t.ui.focus_index().unwrap();
        assert!(index <= 1);
        assert_eq!(unpaused_count(&t, &remaining), 1);
        assert!(handles[2].is_stopped());
        assert_eq!(t.ui.ring_len(), 2);
    }

    #[test]
    fn test_removing_unfocused_widget_keeps_focus() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);
        let c = dummy(&t.ui);
        t.ui.focus_next();
        t.ui.focus_next();

        a.stop();
        assert_eq!(t.ui.focused_id(), Some(c.id()));
        assert!(!c.is_paused());
        assert!(b.is_paused());

        // Stopping twice is harmless
        a.stop();
        assert_eq!(t.ui.ring_len(), 2);
    }

    #[test]
    fn test_set_pause_false_moves_focus() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        let b = dummy(&t.ui);

        b.set_pause(false);
        assert!(a.is_paused());
        assert!(!b.is_paused());
        assert_eq!(t.ui.focused_id(), Some(b.id()));
    }

    #[test]
    fn test_stopping_last_widget_empties_ring() {
        let t = TestUi::new(40, 12);
        let a = dummy(&t.ui);
        a.stop();
        assert_eq!(t.ui.focus_index(), None);
        t.ui.focus_next();
        assert_eq!(t.ui.ring_len(), 0);
    }
}
