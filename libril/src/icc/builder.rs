// libril/src/icc/builder.rs

use std::sync::Arc;

use crate::engine::Engine;
use crate::icc::collaborators::{FileHandler, Noop, PropertyStore, StateBroadcaster};
use crate::icc::state::CardMode;
use crate::icc::IccCard;

/// Helper to construct an IccCard. Collaborators default to no-ops.
pub struct IccCardBuilder {
    engine: Engine,
    mode: CardMode,
    file_handler: Arc<dyn FileHandler>,
    broadcaster: Arc<dyn StateBroadcaster>,
    properties: Arc<dyn PropertyStore>,
}

impl IccCardBuilder {
    pub fn new(engine: Engine) -> Self {
        Self {
            engine,
            mode: CardMode::default(),
            file_handler: Arc::new(Noop),
            broadcaster: Arc::new(Noop),
            properties: Arc::new(Noop),
        }
    }

    pub fn mode(mut self, mode: CardMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_file_handler(mut self, file_handler: Arc<dyn FileHandler>) -> Self {
        self.file_handler = file_handler;
        self
    }

    pub fn with_broadcaster(mut self, broadcaster: Arc<dyn StateBroadcaster>) -> Self {
        self.broadcaster = broadcaster;
        self
    }

    pub fn with_property_store(mut self, properties: Arc<dyn PropertyStore>) -> Self {
        self.properties = properties;
        self
    }

    /// Subscribe to the engine and, if the radio is already on, poll the
    /// card status.
    pub fn build(self) -> IccCard {
        IccCard::attach(
            self.engine,
            self.mode,
            self.file_handler,
            self.broadcaster,
            self.properties,
        )
    }
}
