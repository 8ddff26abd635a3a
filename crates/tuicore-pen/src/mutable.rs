//! [`MutablePen`]: a shared, observed [`PenValue`].
//!
//! Windows and render buffers hold an `Rc<MutablePen>` rather than owning a
//! pen outright, so a single style change (say, a theme swap) can reach
//! every subscriber without those subscribers polling. Subscribers are held
//! weakly: a dropped subscriber is simply never notified again, rather than
//! having to remember to unsubscribe on teardown.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::value::{Attr, AttrValue};
use crate::PenValue;

type Callback = dyn FnMut(&PenValue, u64);

struct Observer {
    callback: Weak<RefCell<Callback>>,
    id: u64,
}

struct Inner {
    value: PenValue,
    observers: Vec<Observer>,
    notifying: bool,
    pending_add: Vec<Observer>,
    pending_remove: Vec<u64>,
}

/// Shared, observed pen. Cloning a `MutablePen` clones the handle, not the
/// underlying cell (same pattern as `Rc`).
#[derive(Clone)]
pub struct MutablePen {
    inner: Rc<RefCell<Inner>>,
}

impl MutablePen {
    pub fn new(initial: PenValue) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value: initial,
                observers: Vec::new(),
                notifying: false,
                pending_add: Vec::new(),
                pending_remove: Vec::new(),
            })),
        }
    }

    pub fn snapshot(&self) -> PenValue {
        self.inner.borrow().value
    }

    pub fn getattr(&self, attr: Attr) -> Option<AttrValue> {
        self.inner.borrow().value.getattr(attr)
    }

    pub fn hasattr(&self, attr: Attr) -> bool {
        self.inner.borrow().value.hasattr(attr)
    }

    /// Set (or clear) one attribute, notifying subscribers iff the
    /// resulting value actually differs from the prior one.
    pub fn chattr(&self, attr: Attr, value: Option<AttrValue>) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value;
            inner.value.chattr(attr, value);
            before != inner.value
        };
        if changed {
            self.notify();
        }
    }

    pub fn delattr(&self, attr: Attr) {
        self.chattr(attr, None);
    }

    /// Replace the whole value, notifying iff it actually changed.
    pub fn set(&self, value: PenValue) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value;
            inner.value = value;
            before != value
        };
        if changed {
            self.notify();
        }
    }

    /// Subscribe `callback` (held weakly) under `id`. `id` is the key used
    /// by [`MutablePen::unsubscribe`]; callers pick it, typically the
    /// subscribing window's own identity.
    pub fn subscribe(&self, callback: &Rc<RefCell<Callback>>, id: u64) {
        let entry = Observer {
            callback: Rc::downgrade(callback),
            id,
        };
        let mut inner = self.inner.borrow_mut();
        if inner.notifying {
            inner.pending_add.push(entry);
        } else {
            inner.observers.push(entry);
        }
    }

    pub fn unsubscribe(&self, id: u64) {
        let mut inner = self.inner.borrow_mut();
        if inner.notifying {
            inner.pending_remove.push(id);
        } else {
            inner.observers.retain(|o| o.id != id);
        }
    }

    /// Notify every live subscriber, then drop dead ones and apply any
    /// subscribe/unsubscribe calls made reentrantly from a callback.
    fn notify(&self) {
        let (value, live): (PenValue, Vec<(Rc<RefCell<Callback>>, u64)>) = {
            let mut inner = self.inner.borrow_mut();
            inner.notifying = true;
            let value = inner.value;
            let live = inner
                .observers
                .iter()
                .filter_map(|o| o.callback.upgrade().map(|cb| (cb, o.id)))
                .collect();
            (value, live)
        };

        tracing::trace!(target: "pen", observers = live.len(), "notifying pen observers");
        for (cb, id) in &live {
            (cb.borrow_mut())(&value, *id);
        }

        let mut inner = self.inner.borrow_mut();
        inner.notifying = false;
        inner.observers.retain(|o| o.callback.upgrade().is_some());
        let removed: Vec<u64> = std::mem::take(&mut inner.pending_remove);
        for id in removed {
            inner.observers.retain(|o| o.id != id);
        }
        let added = std::mem::take(&mut inner.pending_add);
        inner.observers.extend(added);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    #[test]
    fn chattr_notifies_subscriber_exactly_once() {
        let pen = MutablePen::new(PenValue::new());
        let calls = Rc::new(RefCell::new(0u32));
        let calls2 = calls.clone();
        let cb: Rc<RefCell<Callback>> = Rc::new(RefCell::new(move |_: &PenValue, _id: u64| {
            *calls2.borrow_mut() += 1;
        }));
        pen.subscribe(&cb, 1);
        pen.chattr(Attr::Bold, Some(AttrValue::Bool(true)));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn setting_same_value_does_not_notify() {
        let pen = MutablePen::new(PenValue::new().with_bold(true));
        let calls = Rc::new(RefCell::new(0u32));
        let calls2 = calls.clone();
        let cb: Rc<RefCell<Callback>> = Rc::new(RefCell::new(move |_: &PenValue, _id: u64| {
            *calls2.borrow_mut() += 1;
        }));
        pen.subscribe(&cb, 1);
        pen.chattr(Attr::Bold, Some(AttrValue::Bool(true)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn delattr_of_absent_attribute_does_not_notify() {
        let pen = MutablePen::new(PenValue::new());
        let calls = Rc::new(RefCell::new(0u32));
        let calls2 = calls.clone();
        let cb: Rc<RefCell<Callback>> = Rc::new(RefCell::new(move |_: &PenValue, _id: u64| {
            *calls2.borrow_mut() += 1;
        }));
        pen.subscribe(&cb, 1);
        pen.delattr(Attr::Strike);
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn dropped_subscriber_is_never_called() {
        let pen = MutablePen::new(PenValue::new());
        let calls = Rc::new(RefCell::new(0u32));
        let calls2 = calls.clone();
        let cb: Rc<RefCell<Callback>> = Rc::new(RefCell::new(move |_: &PenValue, _id: u64| {
            *calls2.borrow_mut() += 1;
        }));
        pen.subscribe(&cb, 1);
        drop(cb);
        pen.chattr(Attr::Italic, Some(AttrValue::Bool(true)));
        assert_eq!(*calls.borrow(), 0);
        assert_eq!(pen.inner.borrow().observers.len(), 0);
    }

    #[test]
    fn unsubscribe_stops_future_notifications() {
        let pen = MutablePen::new(PenValue::new());
        let calls = Rc::new(RefCell::new(0u32));
        let calls2 = calls.clone();
        let cb: Rc<RefCell<Callback>> = Rc::new(RefCell::new(move |_: &PenValue, _id: u64| {
            *calls2.borrow_mut() += 1;
        }));
        pen.subscribe(&cb, 42);
        pen.unsubscribe(42);
        pen.chattr(Attr::Reverse, Some(AttrValue::Bool(true)));
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn reentrant_unsubscribe_during_notify_applies_after() {
        let pen = MutablePen::new(PenValue::new());
        let pen2 = pen.clone();
        let calls = Rc::new(RefCell::new(0u32));
        let calls2 = calls.clone();
        let cb: Rc<RefCell<Callback>> = Rc::new(RefCell::new(move |_: &PenValue, _id: u64| {
            *calls2.borrow_mut() += 1;
            pen2.unsubscribe(7);
        }));
        pen.subscribe(&cb, 7);
        pen.chattr(Attr::Bold, Some(AttrValue::Bool(true)));
        assert_eq!(*calls.borrow(), 1);
        pen.chattr(Attr::Bold, Some(AttrValue::Bool(false)));
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn snapshot_reflects_current_value() {
        let pen = MutablePen::new(PenValue::new().with_fg(Color::Index(2)));
        assert_eq!(pen.snapshot().fg, Some(2));
    }
}
