/// An owned boolean flag with change notification.
use crate::subscription::{Listeners, Subscription};

/// Boolean state with `toggle`, `set_true` and `set_false`.
///
/// Setting the value it already holds is a no-op: nothing is notified.
pub struct Toggle {
    value: bool,
    listeners: Listeners<bool>,
}

impl std::fmt::Debug for Toggle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Toggle").field("value", &self.value).finish()
    }
}

impl Default for Toggle {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Toggle {
    pub fn new(initial: bool) -> Self {
        Self {
            value: initial,
            listeners: Listeners::new(),
        }
    }

    /// Current value.
    pub fn get(&self) -> bool {
        self.value
    }

    /// Flips the value.
    pub fn toggle(&mut self) {
        self.set(!self.value);
    }

    pub fn set_true(&mut self) {
        self.set(true);
    }

    pub fn set_false(&mut self) {
        self.set(false);
    }

    /// Sets the value. Returns whether it changed.
    pub fn set(&mut self, value: bool) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        self.listeners.notify(&self.value);
        true
    }

    /// Registers a callback invoked with the new value after each change.
    pub fn subscribe(&mut self, callback: impl Fn(&bool) + Send + Sync + 'static) -> Subscription {
        self.listeners.subscribe(callback)
    }
}
