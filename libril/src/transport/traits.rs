// libril/src/transport/traits.rs

use crate::Result;

/// Read half of a connection. Owned by the single reader thread.
pub trait FrameSource: Send {
    /// Block until one complete frame body is available. A closed channel
    /// reports `Error::Disconnected`.
    fn read_frame(&mut self) -> Result<Vec<u8>>;
}

/// Write half of a connection. Shared by callers under the engine's write
/// lock.
pub trait FrameSink: Send {
    /// Write one frame body; the transport adds whatever framing it needs.
    fn write_frame(&mut self, body: &[u8]) -> Result<()>;

    /// Tear the connection down. Must unblock a reader parked in
    /// `read_frame`. Default implementation does nothing.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Transport trait abstracts the byte channel away from the engine.
pub trait Transport: Send {
    /// Open a connection and hand back its two halves.
    fn connect(&mut self) -> Result<(Box<dyn FrameSource>, Box<dyn FrameSink>)>;

    /// Short label used in log lines.
    fn describe(&self) -> String {
        "transport".to_string()
    }
}
