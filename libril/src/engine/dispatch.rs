// libril/src/engine/dispatch.rs

use std::sync::Weak;

use log::{debug, info, trace, warn};

use crate::adapter;
use crate::bus::Event;
use crate::engine::Shared;
use crate::protocol::codec::{self, RawFrame};
use crate::protocol::parcel::ParcelReader;
use crate::transport::FrameSource;
use crate::types::{CommandError, EventKind};
use crate::utils::trace_frame;
use crate::Error;

/// Reader thread body. Holds only a weak reference so dropping the last
/// engine handle lets the thread wind down.
pub(crate) fn run_reader(shared: Weak<Shared>, mut source: Box<dyn FrameSource>, generation: u64) {
    loop {
        let frame = source.read_frame();
        let Some(shared) = shared.upgrade() else {
            debug!("engine dropped, reader exiting");
            return;
        };
        match frame {
            Ok(body) => shared.dispatch_frame(&body),
            Err(e) => {
                match e {
                    Error::Disconnected => info!("transport closed"),
                    other => warn!("transport read failed: {}", other),
                }
                shared.connection_lost(generation);
                return;
            }
        }
    }
}

impl Shared {
    pub(crate) fn dispatch_frame(&self, body: &[u8]) {
        trace_frame("<<", body);
        match codec::decode_inbound(body) {
            Ok(RawFrame::Solicited {
                serial,
                error,
                body: cursor,
            }) => self.dispatch_solicited(serial, error, cursor),
            Ok(RawFrame::Unsolicited { body: cursor }) => self.dispatch_unsolicited(cursor),
            Err(e) => warn!("dropping malformed frame: {}", e),
        }
    }

    fn dispatch_solicited(&self, serial: u32, error: i32, mut cursor: ParcelReader<'_>) {
        let Some(request) = self.pending.take(serial) else {
            let violation = Error::ProtocolViolation(format!("response for unknown serial {}", serial));
            warn!("{}", violation);
            return;
        };
        let kind = request.kind;
        let raw = cursor.body();

        let result = if error == 0 {
            adapter::decode_solicited(self.adapter.as_ref(), kind, &mut cursor).map_err(|e| match e {
                Error::UnsupportedRequest(k) => Error::UnsupportedRequest(k),
                other => Error::decode(other.to_string(), raw),
            })
        } else {
            // payload on an error response is best effort
            let payload = if cursor.is_exhausted() {
                None
            } else {
                adapter::decode_solicited(self.adapter.as_ref(), kind, &mut cursor).ok()
            };
            Err(Error::Command {
                error: CommandError::from_code(error),
                payload,
            })
        };

        match &result {
            Ok(value) => {
                debug!("[{:04}]< {}", serial, kind);
                trace!("[{:04}]< {:?}", serial, value);
            }
            Err(e) => debug!("[{:04}]< {} {}", serial, kind, e),
        }
        request.waiter.complete(result);
    }

    fn dispatch_unsolicited(&self, mut cursor: ParcelReader<'_>) {
        match adapter::decode_unsolicited(self.adapter.as_ref(), &mut cursor) {
            Ok((kind, Some(value))) => {
                if kind == EventKind::RadioStateChanged {
                    if let Some(radio) = value.as_radio_state() {
                        let previous = self.set_radio_state(radio);
                        if previous != radio {
                            info!("radio state {} -> {}", previous, radio);
                        }
                    }
                }
                debug!("[UNSL]< {}", kind);
                self.bus.publish(&Event::new(kind, value));
            }
            Ok((kind, None)) => debug!("[UNSL]< ignoring unknown tag {}", kind.code()),
            Err(e) => warn!("dropping undecodable unsolicited frame: {}", e),
        }
    }
}
