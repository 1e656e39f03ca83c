//! A minimal observer-list signal, grounded on the `updated` notification
//! described in spec §4.A. Kept intentionally small — this crate does not
//! need a general pub/sub framework, just "notify whoever is watching this
//! buffer's metadata that it changed".

use parking_lot::Mutex;

/// A broadcast point for a single event type `T` (typically `()` or a
/// handle). Subscribers are plain closures; there is no unsubscribe because
/// nothing in this crate currently needs one (connections live as long as
/// the manager).
pub struct Signal<T: Clone> {
    subscribers: Mutex<Vec<Box<dyn Fn(T) + Send + Sync>>>,
}

impl<T: Clone> Signal<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }

    pub fn connect(&self, f: impl Fn(T) + Send + Sync + 'static) {
        self.subscribers.lock().push(Box::new(f));
    }

    pub fn emit(&self, value: T) {
        for sub in self.subscribers.lock().iter() {
            sub(value.clone());
        }
    }
}

impl<T: Clone> Default for Signal<T> {
    fn default() -> Self {
        Self::new()
    }
}
