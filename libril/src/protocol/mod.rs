// libril/src/protocol/mod.rs

pub mod codec;
pub mod commands;
pub mod frame;
pub mod parcel;
pub mod responses;

pub use codec::RawFrame;
pub use commands::*;
pub use frame::Frame;
pub use parcel::{ParcelReader, ParcelWriter};
pub use responses::*;
