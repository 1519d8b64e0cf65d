// libril/src/bus/registrant.rs

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use log::error;

use crate::utils::lock;

/// Shared notification callback.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

/// Identity of one registration, returned by `add` and used to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegistrationId(u64);

/// Ordered list of handlers notified together.
///
/// `notify` works on a snapshot taken under the lock and calls handlers
/// with the lock released, so a handler may add or remove registrations
/// (including its own). A panicking handler is logged and does not stop
/// delivery to the rest.
pub struct RegistrantList<T> {
    entries: Mutex<Vec<(RegistrationId, Handler<T>)>>,
    next_id: AtomicU64,
}

impl<T> Default for RegistrantList<T> {
    fn default() -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl<T> RegistrantList<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, handler: Handler<T>) -> RegistrationId {
        let id = RegistrationId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.entries).push((id, handler));
        id
    }

    pub fn remove(&self, id: RegistrationId) -> bool {
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|(rid, _)| *rid != id);
        entries.len() != before
    }

    /// Deliver `value` to every handler in registration order. Returns the
    /// number of handlers that returned normally.
    pub fn notify(&self, value: &T) -> usize {
        let snapshot: Vec<Handler<T>> = lock(&self.entries)
            .iter()
            .map(|(_, h)| h.clone())
            .collect();
        let mut delivered = 0;
        for handler in snapshot {
            match catch_unwind(AssertUnwindSafe(|| handler(value))) {
                Ok(()) => delivered += 1,
                Err(_) => error!("notification handler panicked; continuing with the rest"),
            }
        }
        delivered
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        lock(&self.entries).clear();
    }
}
