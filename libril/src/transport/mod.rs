// libril/src/transport/mod.rs

pub mod mock;
#[cfg(all(unix, feature = "socket"))]
pub mod socket;
pub mod traits;

pub use mock::{MockPeer, MockTransport};
#[cfg(all(unix, feature = "socket"))]
pub use socket::UnixSocketTransport;
pub use traits::{FrameSink, FrameSource, Transport};
