#![cfg(feature = "socket")]

//! Helpers for tests that talk to a real modem daemon socket.
//!
//! The socket path comes from `LIBRIL_SOCKET`. When it is unset or the
//! socket cannot be reached the helpers return `Ok(None)` so the tests
//! pass on machines without a modem.

use std::path::PathBuf;

use libril::transport::UnixSocketTransport;
use libril::{Engine, Error, Result, Vendor};

pub fn socket_path() -> Option<PathBuf> {
    std::env::var_os("LIBRIL_SOCKET").map(PathBuf::from)
}

/// Vendor from `LIBRIL_RIL_CLASS`, generic otherwise.
pub fn vendor() -> Vendor {
    std::env::var("LIBRIL_RIL_CLASS")
        .map(|class| Vendor::from_ril_class(&class))
        .unwrap_or_default()
}

/// Connected engine for the configured daemon.
///
/// - Ok(Some(engine)) : connected
/// - Ok(None) : no socket configured or nothing listening
/// - Err(e) : any other failure
pub fn open_engine() -> Result<Option<Engine>> {
    let Some(path) = socket_path() else {
        return Ok(None);
    };
    let engine = Engine::builder()
        .with_transport(Box::new(UnixSocketTransport::new(&path)))
        .vendor(vendor())
        .build()?;
    match engine.connect() {
        Ok(()) => Ok(Some(engine)),
        Err(Error::Transport(msg)) => {
            eprintln!("no modem daemon at {}: {}", path.display(), msg);
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
