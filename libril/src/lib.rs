// libril/src/lib.rs

//! libril
//!
//! Pure Rust engine for the radio interface layer protocol spoken by
//! modem daemons, plus the SIM card state machine built on top of it.
#![warn(missing_docs)]

pub mod adapter;
pub mod bus;
pub mod constants;
pub mod engine;
pub mod error;
pub mod icc;
pub mod prelude;
pub mod protocol;
pub mod test_support;
pub mod transport;
pub mod types;
pub mod utils;

// Re-export common types at crate root so `crate::Error`, `crate::Result`,
// and the wire enums in `types` are available for consumers and for
// convenient `prelude` re-exports.
pub use crate::error::*;
pub use crate::types::*;

pub use prelude::*;
