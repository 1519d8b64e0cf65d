//! Small helpers shared across the crate: hex rendering for frame dumps
//! and poison-tolerant locking.

pub mod hex;
pub mod sync;

pub use hex::*;
pub use sync::lock;
