// libril/src/engine/pending.rs

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use log::{error, warn};

use crate::protocol::responses::DecodedValue;
use crate::types::RequestKind;
use crate::utils::lock;
use crate::{Error, Result};

/// Completion callback, run on the thread that completes the request.
pub type Callback = Box<dyn FnOnce(Result<DecodedValue>) + Send>;

/// Where a request's result goes. Consumed by value on completion, so a
/// request can only ever be completed once.
pub enum Waiter {
    Channel(Sender<Result<DecodedValue>>),
    Callback(Callback),
}

impl Waiter {
    pub fn complete(self, result: Result<DecodedValue>) {
        match self {
            // capacity 1 and a single send: never blocks; a dropped
            // receiver just means the caller stopped caring
            Waiter::Channel(tx) => {
                let _ = tx.try_send(result);
            }
            Waiter::Callback(cb) => {
                if catch_unwind(AssertUnwindSafe(|| cb(result))).is_err() {
                    error!("completion callback panicked");
                }
            }
        }
    }
}

impl std::fmt::Debug for Waiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Waiter::Channel(_) => f.write_str("Waiter::Channel"),
            Waiter::Callback(_) => f.write_str("Waiter::Callback"),
        }
    }
}

/// A request between submission and completion.
#[derive(Debug)]
pub struct PendingRequest {
    pub serial: u32,
    pub kind: RequestKind,
    pub created_at: Instant,
    pub waiter: Waiter,
}

struct TableInner {
    requests: HashMap<u32, PendingRequest>,
    next_serial: u32,
    closed: bool,
}

/// Serial-keyed table of outstanding requests.
///
/// Waiters are always completed after the table lock is released.
pub struct PendingTable {
    inner: Mutex<TableInner>,
}

impl Default for PendingTable {
    fn default() -> Self {
        Self {
            inner: Mutex::new(TableInner {
                requests: HashMap::new(),
                next_serial: 1,
                closed: false,
            }),
        }
    }
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a given serial; lets tests exercise wraparound.
    pub fn with_first_serial(first: u32) -> Self {
        let table = Self::default();
        lock(&table.inner).next_serial = first;
        table
    }

    /// Allocate a serial and insert the request. Serials wrap around and
    /// skip any value still pending. Fails once the table is shut down.
    pub fn submit(&self, kind: RequestKind, waiter: Waiter) -> Result<u32> {
        let mut inner = lock(&self.inner);
        if inner.closed {
            return Err(Error::Disconnected);
        }
        if inner.requests.len() >= u32::MAX as usize {
            return Err(Error::StateInvariant("serial space exhausted".into()));
        }
        let serial = loop {
            let candidate = inner.next_serial;
            inner.next_serial = inner.next_serial.wrapping_add(1);
            if !inner.requests.contains_key(&candidate) {
                break candidate;
            }
        };
        inner.requests.insert(
            serial,
            PendingRequest {
                serial,
                kind,
                created_at: Instant::now(),
                waiter,
            },
        );
        Ok(serial)
    }

    /// Remove a request without completing it.
    pub fn take(&self, serial: u32) -> Option<PendingRequest> {
        lock(&self.inner).requests.remove(&serial)
    }

    /// Remove and complete. Unknown serials (already completed, cancelled,
    /// or never issued) are logged and ignored.
    pub fn complete(&self, serial: u32, result: Result<DecodedValue>) -> bool {
        match self.take(serial) {
            Some(req) => {
                req.waiter.complete(result);
                true
            }
            None => {
                warn!("[{:04}] completion for unknown serial ignored", serial);
                false
            }
        }
    }

    /// Shut the table and complete every pending request with
    /// `Disconnected`. Submissions are refused until `reopen`.
    pub fn cancel_all(&self) -> usize {
        let drained: Vec<PendingRequest> = {
            let mut inner = lock(&self.inner);
            inner.closed = true;
            inner.requests.drain().map(|(_, req)| req).collect()
        };
        let count = drained.len();
        let mut drained = drained;
        drained.sort_by_key(|r| r.created_at);
        for req in drained {
            req.waiter.complete(Err(Error::Disconnected));
        }
        count
    }

    pub fn reopen(&self) {
        lock(&self.inner).closed = false;
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.inner).closed
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, serial: u32) -> bool {
        lock(&self.inner).requests.contains_key(&serial)
    }

    pub fn kind_of(&self, serial: u32) -> Option<RequestKind> {
        lock(&self.inner).requests.get(&serial).map(|r| r.kind)
    }
}

/// Caller's handle on one in-flight request.
#[derive(Debug)]
pub struct PendingResponse {
    serial: u32,
    kind: RequestKind,
    rx: Receiver<Result<DecodedValue>>,
}

/// A channel waiter plus the receiving end it feeds.
pub fn completion_pair() -> (Waiter, Receiver<Result<DecodedValue>>) {
    let (tx, rx) = bounded(1);
    (Waiter::Channel(tx), rx)
}

impl PendingResponse {
    pub fn new(serial: u32, kind: RequestKind, rx: Receiver<Result<DecodedValue>>) -> Self {
        Self { serial, kind, rx }
    }

    pub fn serial(&self) -> u32 {
        self.serial
    }

    pub fn kind(&self) -> RequestKind {
        self.kind
    }

    /// Block until the request completes.
    pub fn wait(self) -> Result<DecodedValue> {
        self.rx.recv().unwrap_or(Err(Error::Cancelled))
    }

    /// Block for at most `timeout`. The request stays pending in the
    /// engine on timeout; only this handle gives up.
    pub fn wait_timeout(self, timeout: Duration) -> Result<DecodedValue> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => Err(Error::Timeout),
            Err(RecvTimeoutError::Disconnected) => Err(Error::Cancelled),
        }
    }

    /// Non-blocking poll; `None` while still pending.
    pub fn try_wait(&self) -> Option<Result<DecodedValue>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(Error::Cancelled)),
        }
    }

    /// Await completion from async code without blocking the runtime.
    #[cfg(feature = "async")]
    pub async fn wait_async(self) -> Result<DecodedValue> {
        tokio::task::spawn_blocking(move || self.wait())
            .await
            .map_err(|_| Error::Cancelled)?
    }
}
