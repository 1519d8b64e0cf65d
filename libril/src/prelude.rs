// libril/src/prelude.rs

pub use crate::adapter::{create_adapter_for, VendorAdapter};
pub use crate::bus::{Event, EventBus, Subscription};
pub use crate::engine::{ConnectionState, Engine, EngineBuilder, EngineConfig, PendingResponse};
pub use crate::icc::{
    AppState, AppType, Application, CardLifecycleState, CardMode, CardRegistration, CardState,
    CardStatus, IccCard, IccCardBuilder, PinState, SubscriptionSource,
};
pub use crate::protocol::{Command, DecodedValue};
pub use crate::transport::{FrameSink, FrameSource, MockPeer, MockTransport, Transport};
pub use crate::{
    CommandError, Error, EventKind, RadioState, RequestKind, ResponseShape, Result, Vendor,
};

// Re-export small utilities for convenience
pub use crate::utils::bytes_to_hex_spaced;
