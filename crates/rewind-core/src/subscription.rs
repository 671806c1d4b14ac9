/// Change notification for owned reactive state.
///
/// A [`Listeners<T>`] list lives inside the state owner and holds callbacks
/// weakly. [`Listeners::subscribe`] hands the caller a [`Subscription`] that
/// keeps its callback alive; disposing (or dropping) it detaches the
/// callback before the next notification.
use std::any::Any;
use std::sync::{Arc, Weak};

type CallbackArc<T> = Arc<dyn Fn(&T) + Send + Sync>;
type CallbackWeak<T> = Weak<dyn Fn(&T) + Send + Sync>;

/// Registration-ordered list of change callbacks.
pub struct Listeners<T> {
    callbacks: Vec<CallbackWeak<T>>,
}

impl<T> Default for Listeners<T> {
    fn default() -> Self {
        Self {
            callbacks: Vec::new(),
        }
    }
}

impl<T: 'static> std::fmt::Debug for Listeners<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("live", &self.len())
            .finish()
    }
}

impl<T: 'static> Listeners<T> {
    /// Creates an empty listener list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback`. It stays registered for as long as the
    /// returned [`Subscription`] is alive.
    pub fn subscribe(&mut self, callback: impl Fn(&T) + Send + Sync + 'static) -> Subscription {
        let strong: CallbackArc<T> = Arc::new(callback);
        self.callbacks.push(Arc::downgrade(&strong));
        Subscription {
            _guard: Box::new(strong),
        }
    }

    /// Calls every live callback with `value`, in registration order,
    /// and prunes the disposed ones.
    pub fn notify(&mut self, value: &T) {
        self.callbacks.retain(|w| w.strong_count() > 0);
        let live: Vec<CallbackArc<T>> = self.callbacks.iter().filter_map(Weak::upgrade).collect();
        for callback in &live {
            callback(value);
        }
    }

    /// Number of callbacks whose subscription is still alive.
    pub fn len(&self) -> usize {
        self.callbacks.iter().filter(|w| w.strong_count() > 0).count()
    }

    /// Whether no live callback is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for one registered callback.
///
/// Call [`Subscription::dispose`] on teardown. Dropping the handle has the
/// same effect, so a forgotten handle cannot leak a live callback.
#[must_use = "dropping a Subscription detaches its callback immediately"]
pub struct Subscription {
    /// Type-erased strong reference keeping the callback alive.
    _guard: Box<dyn Any + Send + Sync>,
}

impl Subscription {
    /// Detaches the callback. Consumes the handle, so it runs exactly once.
    pub fn dispose(self) {
        drop(self);
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}
