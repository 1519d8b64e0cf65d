// libril/src/transport/mock.rs

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};

use crate::protocol::codec;
use crate::transport::traits::{FrameSink, FrameSource, Transport};
use crate::types::{EventKind, RequestKind};
use crate::utils::lock;
use crate::{Error, Result};

enum Inbound {
    Frame(Vec<u8>),
    HangUp,
}

#[derive(Debug, Default)]
struct MockState {
    /// Every body the engine wrote, in order.
    sent: Vec<Vec<u8>>,
    /// Testing hook: number of writes that should fail with Transport
    write_failures: usize,
    connects: usize,
    closed: bool,
}

/// In-memory transport for tests. The engine side sees an ordinary
/// `Transport`; the test drives the modem side through the paired
/// `MockPeer`.
pub struct MockTransport {
    inbound_tx: Sender<Inbound>,
    inbound_rx: Receiver<Inbound>,
    outbound_tx: Sender<Vec<u8>>,
    state: Arc<Mutex<MockState>>,
}

/// Modem side of a `MockTransport`.
#[derive(Clone)]
pub struct MockPeer {
    inbound_tx: Sender<Inbound>,
    outbound_rx: Receiver<Vec<u8>>,
    state: Arc<Mutex<MockState>>,
}

/// One request as seen by the peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeenRequest {
    pub kind: RequestKind,
    pub serial: u32,
    pub fields: Vec<u8>,
}

impl MockTransport {
    pub fn new() -> (Self, MockPeer) {
        let (inbound_tx, inbound_rx) = unbounded();
        let (outbound_tx, outbound_rx) = unbounded();
        let state = Arc::new(Mutex::new(MockState::default()));
        let peer = MockPeer {
            inbound_tx: inbound_tx.clone(),
            outbound_rx,
            state: state.clone(),
        };
        (
            Self {
                inbound_tx,
                inbound_rx,
                outbound_tx,
                state,
            },
            peer,
        )
    }
}

struct MockSource {
    rx: Receiver<Inbound>,
}

struct MockSink {
    outbound_tx: Sender<Vec<u8>>,
    inbound_tx: Sender<Inbound>,
    state: Arc<Mutex<MockState>>,
}

impl Transport for MockTransport {
    fn connect(&mut self) -> Result<(Box<dyn FrameSource>, Box<dyn FrameSink>)> {
        {
            let mut st = lock(&self.state);
            st.connects += 1;
            st.closed = false;
        }
        // Drop hang-ups left over from the previous connection, keep frames.
        let stale: Vec<Inbound> = self.inbound_rx.try_iter().collect();
        for msg in stale {
            if let Inbound::Frame(body) = msg {
                let _ = self.inbound_tx.send(Inbound::Frame(body));
            }
        }
        let source = MockSource {
            rx: self.inbound_rx.clone(),
        };
        let sink = MockSink {
            outbound_tx: self.outbound_tx.clone(),
            inbound_tx: self.inbound_tx.clone(),
            state: self.state.clone(),
        };
        Ok((Box::new(source), Box::new(sink)))
    }

    fn describe(&self) -> String {
        "mock".to_string()
    }
}

impl FrameSource for MockSource {
    fn read_frame(&mut self) -> Result<Vec<u8>> {
        match self.rx.recv() {
            Ok(Inbound::Frame(body)) => Ok(body),
            Ok(Inbound::HangUp) | Err(_) => Err(Error::Disconnected),
        }
    }
}

impl FrameSink for MockSink {
    fn write_frame(&mut self, body: &[u8]) -> Result<()> {
        let mut st = lock(&self.state);
        if st.closed {
            return Err(Error::Transport("mock channel closed".into()));
        }
        // Simulate write failures when configured by tests.
        if st.write_failures > 0 {
            st.write_failures -= 1;
            return Err(Error::Transport("simulated write failure".into()));
        }
        st.sent.push(body.to_vec());
        drop(st);
        // peer may be gone; the write itself still counts
        let _ = self.outbound_tx.send(body.to_vec());
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        let mut st = lock(&self.state);
        if !st.closed {
            st.closed = true;
            let _ = self.inbound_tx.send(Inbound::HangUp);
        }
        Ok(())
    }
}

impl MockPeer {
    /// Queue a raw inbound body for the engine's reader.
    pub fn push_frame(&self, body: Vec<u8>) {
        let _ = self.inbound_tx.send(Inbound::Frame(body));
    }

    /// Queue a solicited response.
    pub fn respond(&self, serial: u32, error: i32, fields: &[u8]) {
        self.push_frame(codec::encode_response(serial, error, fields));
    }

    /// Queue an unsolicited event.
    pub fn push_unsolicited(&self, kind: EventKind, fields: &[u8]) {
        self.push_frame(codec::encode_unsolicited(kind, fields));
    }

    /// Simulate the modem closing the channel.
    pub fn hang_up(&self) {
        let _ = self.inbound_tx.send(Inbound::HangUp);
    }

    /// Make the next `n` writes fail.
    pub fn fail_next_writes(&self, n: usize) {
        lock(&self.state).write_failures = n;
    }

    /// Wait for the next request the engine wrote.
    pub fn next_request(&self, timeout: Duration) -> Option<SeenRequest> {
        match self.outbound_rx.recv_timeout(timeout) {
            Ok(body) => {
                let (kind, serial, mut rest) = codec::decode_request_header(&body).ok()?;
                Some(SeenRequest {
                    kind,
                    serial,
                    fields: rest.read_remaining().to_vec(),
                })
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Wait for a request of a specific kind, skipping others.
    pub fn expect_request(&self, kind: RequestKind, timeout: Duration) -> Option<SeenRequest> {
        let deadline = std::time::Instant::now() + timeout;
        loop {
            let left = deadline.saturating_duration_since(std::time::Instant::now());
            let req = self.next_request(left)?;
            if req.kind == kind {
                return Some(req);
            }
        }
    }

    pub fn sent(&self) -> Vec<Vec<u8>> {
        lock(&self.state).sent.clone()
    }

    pub fn connect_count(&self) -> usize {
        lock(&self.state).connects
    }

    pub fn is_closed(&self) -> bool {
        lock(&self.state).closed
    }
}
