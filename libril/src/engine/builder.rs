// libril/src/engine/builder.rs

use crate::adapter::{create_adapter_for, VendorAdapter};
use crate::constants::{MAX_FRAME_LEN, READER_THREAD_NAME};
use crate::engine::Engine;
use crate::transport::Transport;
use crate::types::Vendor;
use crate::{Error, Result};

/// Settings fixed for the lifetime of an engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub vendor: Vendor,
    /// Outbound bodies longer than this are refused before writing.
    pub max_frame_len: usize,
    pub reader_thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            vendor: Vendor::Generic,
            max_frame_len: MAX_FRAME_LEN,
            reader_thread_name: READER_THREAD_NAME.to_string(),
        }
    }
}

/// Helper to construct an Engine with optional configuration.
pub struct EngineBuilder {
    transport: Option<Box<dyn Transport>>,
    adapter: Option<Box<dyn VendorAdapter>>,
    config: EngineConfig,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self {
            transport: None,
            adapter: None,
            config: EngineConfig::default(),
        }
    }

    /// Provide the transport (socket, MockTransport, ...).
    pub fn with_transport(mut self, transport: Box<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Select the vendor; determines the adapter unless one is given.
    pub fn vendor(mut self, vendor: Vendor) -> Self {
        self.config.vendor = vendor;
        self
    }

    /// Use a custom adapter instead of the vendor's default.
    pub fn with_adapter(mut self, adapter: Box<dyn VendorAdapter>) -> Self {
        self.adapter = Some(adapter);
        self
    }

    pub fn max_frame_len(mut self, max_frame_len: usize) -> Self {
        self.config.max_frame_len = max_frame_len;
        self
    }

    pub fn reader_thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.reader_thread_name = name.into();
        self
    }

    /// Consume the builder and return a disconnected Engine.
    /// Requires a transport; otherwise returns TransportMissing.
    pub fn build(self) -> Result<Engine> {
        let transport = self.transport.ok_or(Error::TransportMissing)?;
        let adapter = self
            .adapter
            .unwrap_or_else(|| create_adapter_for(self.config.vendor));
        Ok(Engine::from_parts(transport, adapter, self.config))
    }
}
