//! Single-value, single-writer promise with multi-observer futures.
//!
//! [`Promise::set`] resolves the value exactly once; later calls are silent
//! no-ops (first write wins). Every [`Future`] handle, cloned before or after
//! resolution, observes the same value from [`Future::wait`]. There is no
//! cancellation: a future either resolves eventually or the waiter applies its
//! own timeout via [`Future::wait_for`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

struct Shared<T> {
    slot: Mutex<Option<T>>,
    ready: Condvar,
}

/// Write side of the pair; owned by whoever is responsible for resolution.
pub struct Promise<T> {
    shared: Arc<Shared<T>>,
}

/// Read side of the pair; cheap to clone, any number of observers may wait.
pub struct Future<T> {
    shared: Arc<Shared<T>>,
}

impl<T> Promise<T> {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(None),
                ready: Condvar::new(),
            }),
        }
    }

    /// Resolve the promise. The first call wins; subsequent calls do nothing.
    pub fn set(&self, value: T) {
        let mut slot = self.shared.slot.lock();
        if slot.is_some() {
            return;
        }
        *slot = Some(value);
        self.shared.ready.notify_all();
    }

    /// A read handle observing this promise's eventual value.
    pub fn future(&self) -> Future<T> {
        Future {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for Promise<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Future<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Clone> Future<T> {
    /// Block until the promise is resolved, then return the value.
    pub fn wait(&self) -> T {
        let mut slot = self.shared.slot.lock();
        loop {
            if let Some(value) = slot.as_ref() {
                return value.clone();
            }
            self.shared.ready.wait(&mut slot);
        }
    }

    /// Block for at most `timeout`; `None` if the promise stayed unresolved.
    pub fn wait_for(&self, timeout: Duration) -> Option<T> {
        let deadline = Instant::now() + timeout;
        let mut slot = self.shared.slot.lock();
        loop {
            if let Some(value) = slot.as_ref() {
                return Some(value.clone());
            }
            if self.shared.ready.wait_until(&mut slot, deadline).timed_out() {
                return slot.as_ref().cloned();
            }
        }
    }

    /// Non-blocking peek at the resolved value, if any.
    pub fn try_get(&self) -> Option<T> {
        self.shared.slot.lock().clone()
    }
}
