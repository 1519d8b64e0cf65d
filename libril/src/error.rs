// libril/src/error.rs

use thiserror::Error;

use crate::protocol::responses::DecodedValue;
use crate::types::{CommandError, RequestKind};

/// Common error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    /// The connection went away while the request was pending.
    #[error("channel closed: disconnected")]
    Disconnected,

    #[error("engine is not connected")]
    NotConnected,

    #[error("invalid engine state: {0}")]
    InvalidState(String),

    #[error("invalid packet length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("frame format error: {0}")]
    FrameFormat(String),

    /// Malformed payload. `raw` holds the undecoded body for diagnostics.
    #[error("decode error: {reason} ({} raw bytes)", raw.len())]
    Decode { reason: String, raw: Vec<u8> },

    #[error("unsupported request: {0}")]
    UnsupportedRequest(RequestKind),

    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("state invariant violated: {0}")]
    StateInvariant(String),

    /// The modem answered with a non-zero error code.
    #[error("command failed: {error}")]
    Command {
        error: CommandError,
        payload: Option<DecodedValue>,
    },

    #[error("operation timed out")]
    Timeout,

    #[error("operation cancelled")]
    Cancelled,

    #[error("no transport configured")]
    TransportMissing,
}

impl Error {
    /// Wrap a low-level cursor failure together with the body it came from.
    pub fn decode(reason: impl Into<String>, raw: &[u8]) -> Self {
        Error::Decode {
            reason: reason.into(),
            raw: raw.to_vec(),
        }
    }

    /// True for the errors that mean the connection itself is gone.
    pub fn is_connection_loss(&self) -> bool {
        matches!(self, Error::Disconnected | Error::Transport(_))
    }

    /// The modem error code, if this is a command failure.
    pub fn command_error(&self) -> Option<CommandError> {
        match self {
            Error::Command { error, .. } => Some(*error),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Error::Timeout,
            _ => Error::Transport(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
