//! Synchronous change notification
//!
//! A [`Signal`] holds weak references to its slots; the strong side lives in
//! the [`Subscription`] guard handed back by [`Signal::connect`]. Dropping the
//! guard detaches the slot, so a subscriber's lifetime bounds its callback.
//! Emission happens immediately on the calling thread.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type SlotRc<T> = Rc<dyn Fn(&T)>;
type SlotWeak<T> = Weak<dyn Fn(&T)>;

/// A list of callbacks invoked in connection order on [`emit`](Signal::emit).
pub struct Signal<T> {
    slots: RefCell<Vec<SlotWeak<T>>>,
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("slot_count", &self.slots.borrow().len())
            .finish()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            slots: RefCell::new(Vec::new()),
        }
    }

    /// Connect a callback. It stays connected until the returned guard is dropped.
    #[must_use = "dropping the Subscription disconnects the callback"]
    pub fn connect(&self, slot: impl Fn(&T) + 'static) -> Subscription
    where
        T: 'static,
    {
        let strong: SlotRc<T> = Rc::new(slot);
        self.slots.borrow_mut().push(Rc::downgrade(&strong));
        Subscription {
            _slot: Box::new(strong),
        }
    }

    /// Invoke every live slot with `value`.
    ///
    /// Slots may connect, disconnect or emit re-entrantly; the live set is
    /// snapshotted before the first call.
    pub fn emit(&self, value: &T) {
        let live: Vec<SlotRc<T>> = {
            let mut slots = self.slots.borrow_mut();
            slots.retain(|w| w.strong_count() > 0);
            slots.iter().filter_map(Weak::upgrade).collect()
        };
        for slot in live {
            slot(value);
        }
    }

    /// Number of connected slots that are still alive
    pub fn connection_count(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .filter(|w| w.strong_count() > 0)
            .count()
    }
}

/// Guard that keeps a [`Signal`] slot connected.
pub struct Subscription {
    _slot: Box<dyn std::any::Any>,
}

impl Subscription {
    /// Explicitly disconnect (same as dropping)
    pub fn disconnect(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}
