use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! { pub struct ListenerKey; }

type Listener<T> = Rc<dyn Fn(&T)>;

/// Synchronous notification source.
///
/// Listeners may subscribe, unsubscribe or dispatch again from inside a
/// callback: `dispatch` works on a snapshot taken before the first call.
pub struct Signal<T> {
    listeners: RefCell<SlotMap<ListenerKey, Listener<T>>>,
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self {
            listeners: RefCell::new(SlotMap::with_key()),
        }
    }

    pub fn subscribe<F>(&self, listener: F) -> ListenerKey
    where
        F: Fn(&T) + 'static,
    {
        self.listeners.borrow_mut().insert(Rc::new(listener))
    }

    /// Returns `false` when the key was already removed.
    pub fn unsubscribe(&self, key: ListenerKey) -> bool {
        self.listeners.borrow_mut().remove(key).is_some()
    }

    pub fn is_subscribed(&self, key: ListenerKey) -> bool {
        self.listeners.borrow().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.listeners.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.borrow().is_empty()
    }

    pub fn dispatch(&self, value: &T) {
        let snapshot: Vec<(ListenerKey, Listener<T>)> = self
            .listeners
            .borrow()
            .iter()
            .map(|(key, listener)| (key, Rc::clone(listener)))
            .collect();

        for (key, listener) in snapshot {
            // Listeners removed by an earlier callback in this round are skipped.
            if self.is_subscribed(key) {
                listener(value);
            }
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/core/signal.rs"]
mod tests;
