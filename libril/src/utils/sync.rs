//! Mutex helper shared by the engine, bus and card state.

use std::sync::{Mutex, MutexGuard};

/// Lock a mutex, recovering the data if a panicking holder poisoned it.
///
/// Handlers run under `catch_unwind`, so poisoning only happens on a bug in
/// this crate; the protected data is still structurally valid.
pub fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            log::warn!("recovering poisoned lock");
            poisoned.into_inner()
        }
    }
}
