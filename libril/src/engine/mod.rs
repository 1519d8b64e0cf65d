// libril/src/engine/mod.rs

//! Request/response engine over a framed transport.
//!
//! One reader thread per connection decodes every inbound frame and
//! dispatches it: solicited responses complete their pending request,
//! unsolicited events go to the [`EventBus`]. Requests may be sent from
//! any thread, including from bus handlers and completion callbacks.

pub mod builder;
mod dispatch;
pub mod pending;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use derive_more::Display;
use log::{debug, error, info, warn};

pub use builder::{EngineBuilder, EngineConfig};
pub use pending::{PendingRequest, PendingResponse, PendingTable, Waiter};

use crate::adapter::VendorAdapter;
use crate::bus::{Event, EventBus, Subscription};
use crate::protocol::codec;
use crate::protocol::commands::Command;
use crate::protocol::parcel::ParcelWriter;
use crate::protocol::responses::DecodedValue;
use crate::transport::{FrameSink, Transport};
use crate::types::{EventKind, RadioState};
use crate::utils::{lock, trace_frame};
use crate::{Error, Result};

/// Connection lifecycle. Only `Connected` permits sending.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    #[default]
    #[display(fmt = "DISCONNECTED")]
    Disconnected,
    #[display(fmt = "CONNECTING")]
    Connecting,
    #[display(fmt = "CONNECTED")]
    Connected,
}

pub(crate) struct Shared {
    config: EngineConfig,
    transport: Mutex<Box<dyn Transport>>,
    adapter: Box<dyn VendorAdapter>,
    pending: PendingTable,
    bus: EventBus,
    state: Mutex<ConnectionState>,
    /// Write half; its lock also serializes serial assignment.
    writer: Mutex<Option<Box<dyn FrameSink>>>,
    reader: Mutex<Option<JoinHandle<()>>>,
    radio_state: Mutex<RadioState>,
    /// Bumped on every connect so a stale reader cannot tear down a
    /// newer connection.
    generation: AtomicU64,
}

/// Cloneable handle to a protocol engine.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state())
            .field("adapter", &self.adapter_name())
            .field("pending", &self.pending_len())
            .finish()
    }
}

impl Engine {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    pub(crate) fn from_parts(
        transport: Box<dyn Transport>,
        adapter: Box<dyn VendorAdapter>,
        config: EngineConfig,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                transport: Mutex::new(transport),
                adapter,
                pending: PendingTable::new(),
                bus: EventBus::new(),
                state: Mutex::new(ConnectionState::Disconnected),
                writer: Mutex::new(None),
                reader: Mutex::new(None),
                radio_state: Mutex::new(RadioState::Unavailable),
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Open the transport and start the reader thread.
    pub fn connect(&self) -> Result<()> {
        {
            let mut state = lock(&self.shared.state);
            if *state != ConnectionState::Disconnected {
                return Err(Error::InvalidState(format!("cannot connect while {}", *state)));
            }
            *state = ConnectionState::Connecting;
        }

        // a previous reader may still be finishing its teardown
        self.join_reader();

        let connected = lock(&self.shared.transport).connect();
        let (source, sink) = match connected {
            Ok(halves) => halves,
            Err(e) => {
                *lock(&self.shared.state) = ConnectionState::Disconnected;
                return Err(e);
            }
        };
        let describe = lock(&self.shared.transport).describe();

        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.pending.reopen();
        *lock(&self.shared.writer) = Some(sink);
        *lock(&self.shared.state) = ConnectionState::Connected;

        let weak = Arc::downgrade(&self.shared);
        let spawned = thread::Builder::new()
            .name(self.shared.config.reader_thread_name.clone())
            .spawn(move || dispatch::run_reader(weak, source, generation));
        match spawned {
            Ok(handle) => {
                *lock(&self.shared.reader) = Some(handle);
                info!("connected to {} ({} adapter)", describe, self.adapter_name());
                Ok(())
            }
            Err(e) => {
                self.shared.close_writer();
                self.shared.pending.cancel_all();
                *lock(&self.shared.state) = ConnectionState::Disconnected;
                Err(Error::Transport(format!("failed to spawn reader: {}", e)))
            }
        }
    }

    /// Close the connection. Pending requests complete with
    /// `Disconnected`. Safe to call from a handler on the reader thread;
    /// the reader is then left to finish on its own.
    pub fn disconnect(&self) -> Result<()> {
        {
            let mut state = lock(&self.shared.state);
            if *state == ConnectionState::Disconnected && lock(&self.shared.reader).is_none() {
                return Ok(());
            }
            *state = ConnectionState::Disconnected;
        }
        self.shared.close_writer();
        self.join_reader();
        Ok(())
    }

    fn join_reader(&self) {
        let handle = lock(&self.shared.reader).take();
        if let Some(handle) = handle {
            if handle.thread().id() == thread::current().id() {
                return;
            }
            if handle.join().is_err() {
                error!("reader thread panicked");
            }
        }
    }

    pub fn state(&self) -> ConnectionState {
        *lock(&self.shared.state)
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Send a command; the returned handle yields the decoded response.
    ///
    /// A failed transport write still returns a handle, already completed
    /// with `Error::Transport`.
    pub fn send(&self, command: Command) -> Result<PendingResponse> {
        let (waiter, rx) = pending::completion_pair();
        let kind = command.kind();
        let serial = self.submit_and_write(&command, waiter)?;
        Ok(PendingResponse::new(serial, kind, rx))
    }

    /// Send a command and run `callback` with the result. The callback
    /// usually runs on the reader thread and must not block on another
    /// response.
    pub fn send_with<F>(&self, command: Command, callback: F) -> Result<u32>
    where
        F: FnOnce(Result<DecodedValue>) + Send + 'static,
    {
        self.submit_and_write(&command, Waiter::Callback(Box::new(callback)))
    }

    fn submit_and_write(&self, command: &Command, waiter: Waiter) -> Result<u32> {
        let kind = command.kind();
        let mut writer = lock(&self.shared.writer);
        if *lock(&self.shared.state) != ConnectionState::Connected {
            return Err(Error::NotConnected);
        }
        let sink = writer.as_mut().ok_or(Error::NotConnected)?;

        let serial = self.shared.pending.submit(kind, waiter)?;

        let mut fields = ParcelWriter::new();
        command.encode_fields(&mut fields);
        self.shared.adapter.encode_extra(kind, &mut fields);
        let body = codec::encode_request(kind, serial, fields.as_bytes());

        let written = if body.len() > self.shared.config.max_frame_len {
            Err(Error::InvalidLength {
                expected: self.shared.config.max_frame_len,
                actual: body.len(),
            })
        } else {
            if !command.carries_secret() {
                trace_frame(">>", &body);
            }
            sink.write_frame(&body)
        };

        let e = match written {
            Ok(()) => {
                debug!("[{:04}]> {}", serial, kind);
                return Ok(serial);
            }
            Err(e) => e,
        };
        // out of the table before the sink closes, so the reader's
        // cancel_all cannot claim it
        let request = self.shared.pending.take(serial);
        let failure = match e {
            e @ Error::InvalidLength { .. } => {
                warn!("[{:04}]> {} refused: {}", serial, kind, e);
                e
            }
            e => {
                error!("[{:04}]> {} write failed: {}", serial, kind, e);
                if let Some(mut sink) = writer.take() {
                    if let Err(close_err) = sink.close() {
                        warn!("closing write half failed: {}", close_err);
                    }
                }
                *lock(&self.shared.state) = ConnectionState::Disconnected;
                match e {
                    Error::Transport(msg) => Error::Transport(msg),
                    other => Error::Transport(other.to_string()),
                }
            }
        };
        drop(writer);

        if let Some(request) = request {
            request.waiter.complete(Err(failure));
        }
        Ok(serial)
    }

    /// Subscribe to decoded unsolicited events of one kind.
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.shared.bus.subscribe(kind, handler)
    }

    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        self.shared.bus.unsubscribe(subscription)
    }

    pub fn bus(&self) -> &EventBus {
        &self.shared.bus
    }

    /// Last radio state reported by the modem; Unavailable until the
    /// first report and after a transport loss.
    pub fn radio_state(&self) -> RadioState {
        *lock(&self.shared.radio_state)
    }

    pub fn pending_len(&self) -> usize {
        self.shared.pending.len()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.shared.config
    }

    pub fn adapter_name(&self) -> &'static str {
        self.shared.adapter.name()
    }

    /// True when called from this engine's reader thread.
    pub fn on_reader_thread(&self) -> bool {
        lock(&self.shared.reader)
            .as_ref()
            .map(|h| h.thread().id() == thread::current().id())
            .unwrap_or(false)
    }
}

impl Shared {
    fn close_writer(&self) {
        if let Some(mut sink) = lock(&self.writer).take() {
            if let Err(e) = sink.close() {
                warn!("closing write half failed: {}", e);
            }
        }
    }

    fn set_radio_state(&self, radio: RadioState) -> RadioState {
        std::mem::replace(&mut *lock(&self.radio_state), radio)
    }

    /// Reader-side teardown after the transport went away.
    fn connection_lost(&self, generation: u64) {
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("stale reader exiting");
            return;
        }
        *lock(&self.state) = ConnectionState::Disconnected;
        self.close_writer();

        let cancelled = self.pending.cancel_all();
        if cancelled > 0 {
            warn!("connection lost, cancelled {} pending requests", cancelled);
        }

        self.set_radio_state(RadioState::Unavailable);
        self.bus.publish(&Event::new(
            EventKind::RadioStateChanged,
            DecodedValue::RadioState(RadioState::Unavailable),
        ));
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        // wakes a reader blocked on the transport so it can exit
        if let Ok(writer) = self.writer.get_mut() {
            if let Some(mut sink) = writer.take() {
                let _ = sink.close();
            }
        }
    }
}
