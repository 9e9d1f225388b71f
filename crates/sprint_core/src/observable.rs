//! Observable values
//!
//! A value cell with explicit change listeners. Setting a value that differs
//! from the current one invokes every registered listener synchronously with
//! the old and new values. Setting an equal value is a no-op. Rapid flips are
//! never coalesced.
//!
//! Listeners run in slot order, which is registration order until a listener
//! is removed and its slot reused.

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle returned when a listener is registered
    pub struct ListenerId;
}

/// A change listener receiving `(old, new)`
pub type Listener<T> = Box<dyn FnMut(T, T)>;

/// A value with change notification
pub struct Observable<T: Copy + PartialEq> {
    value: T,
    listeners: SlotMap<ListenerId, Listener<T>>,
}

impl<T: Copy + PartialEq> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            listeners: SlotMap::with_key(),
        }
    }

    pub fn get(&self) -> T {
        self.value
    }

    /// Set the value, notifying listeners if it changed.
    ///
    /// Returns true if the value changed.
    pub fn set(&mut self, value: T) -> bool {
        if self.value == value {
            return false;
        }

        let old = std::mem::replace(&mut self.value, value);
        tracing::trace!(listeners = self.listeners.len(), "observable changed");

        for (_, listener) in self.listeners.iter_mut() {
            listener(old, value);
        }
        true
    }

    /// Register a change listener
    pub fn add_listener<F: FnMut(T, T) + 'static>(&mut self, listener: F) -> ListenerId {
        self.listeners.insert(Box::new(listener))
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id).is_some()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl<T: Copy + PartialEq + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Copy + PartialEq + std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
