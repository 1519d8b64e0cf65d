//! Test support helpers intended for use by unit and integration tests.
//!
//! These helpers centralize MockTransport/engine setup and the modem-side
//! payloads tests keep building, so tests across the crate and the tests/
//! directory can reuse the same logic.
#![allow(dead_code)]

use std::sync::Mutex;
use std::time::Duration;

use crate::engine::Engine;
use crate::icc::collaborators::{FileHandler, PropertyStore, StateBroadcaster};
use crate::icc::status::CardStatus;
use crate::protocol::parcel::{ParcelReader, ParcelWriter};
use crate::protocol::responses::{encode_card_status, CardStatusLayout};
use crate::transport::mock::{MockPeer, MockTransport};
use crate::types::{EventKind, RequestKind, Vendor};
use crate::utils::lock;
use crate::Result;

/// Build and connect an engine backed by a MockTransport for `vendor`.
#[doc(hidden)]
pub fn connected_mock_engine(vendor: Vendor) -> Result<(Engine, MockPeer)> {
    let (mock, peer) = MockTransport::new();
    let engine = Engine::builder()
        .with_transport(Box::new(mock))
        .vendor(vendor)
        .build()?;
    engine.connect()?;
    Ok((engine, peer))
}

/// GET_SIM_STATUS response fields for `status`.
#[doc(hidden)]
pub fn card_status_fields(status: &CardStatus, layout: CardStatusLayout) -> Vec<u8> {
    let mut w = ParcelWriter::new();
    encode_card_status(status, layout, &mut w);
    w.into_bytes()
}

/// Radio state event payload.
#[doc(hidden)]
pub fn radio_state_fields(code: i32) -> Vec<u8> {
    let mut w = ParcelWriter::new();
    w.write_i32(code);
    w.into_bytes()
}

/// Push a RADIO_STATE_CHANGED event carrying `code`.
#[doc(hidden)]
pub fn push_radio_state(peer: &MockPeer, code: i32) {
    peer.push_unsolicited(EventKind::RadioStateChanged, &radio_state_fields(code));
}

/// Wait for the next GET_SIM_STATUS and answer it with `status`.
/// Returns the serial answered.
#[doc(hidden)]
pub fn answer_card_status(peer: &MockPeer, status: &CardStatus, timeout: Duration) -> Option<u32> {
    let req = peer.expect_request(RequestKind::GetSimStatus, timeout)?;
    peer.respond(
        req.serial,
        0,
        &card_status_fields(status, CardStatusLayout::BASE),
    );
    Some(req.serial)
}

/// Answer the next `count` facility lock queries: "SC" with `pin_lock`,
/// "FD" with `fdn`. Returns the facilities seen, in order.
#[doc(hidden)]
pub fn answer_facility_queries(
    peer: &MockPeer,
    count: usize,
    pin_lock: bool,
    fdn: bool,
    timeout: Duration,
) -> Vec<String> {
    let mut seen = Vec::new();
    for _ in 0..count {
        let Some(req) = peer.expect_request(RequestKind::QueryFacilityLock, timeout) else {
            break;
        };
        let facility = ParcelReader::new(&req.fields)
            .read_string_array()
            .ok()
            .and_then(|fields| fields.into_iter().next().flatten())
            .unwrap_or_default();
        let enabled = if facility == "FD" { fdn } else { pin_lock };
        let mut w = ParcelWriter::new();
        w.write_int_array(&[enabled as i32]);
        peer.respond(req.serial, 0, w.as_bytes());
        seen.push(facility);
    }
    seen
}

/// One call made by the card state machine into its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorCall {
    SelectApplication(String),
    LoadRecords,
    Broadcast(String, Option<String>),
    CardSwapped(bool),
    SetProperty(String, String),
}

/// Collaborator that records every call, for asserting on side effects.
#[derive(Debug, Default)]
pub struct RecordingCollaborator {
    calls: Mutex<Vec<CollaboratorCall>>,
}

impl RecordingCollaborator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<CollaboratorCall> {
        lock(&self.calls).clone()
    }

    /// Broadcasts only, as (state, reason) pairs.
    pub fn broadcasts(&self) -> Vec<(String, Option<String>)> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                CollaboratorCall::Broadcast(state, reason) => Some((state.clone(), reason.clone())),
                _ => None,
            })
            .collect()
    }

    /// Last value written for `key`.
    pub fn property(&self, key: &str) -> Option<String> {
        lock(&self.calls).iter().rev().find_map(|c| match c {
            CollaboratorCall::SetProperty(k, v) if k == key => Some(v.clone()),
            _ => None,
        })
    }

    pub fn clear(&self) {
        lock(&self.calls).clear();
    }

    fn record(&self, call: CollaboratorCall) {
        lock(&self.calls).push(call);
    }
}

impl FileHandler for RecordingCollaborator {
    fn select_application(&self, aid: &str) {
        self.record(CollaboratorCall::SelectApplication(aid.to_string()));
    }

    fn load_records(&self) {
        self.record(CollaboratorCall::LoadRecords);
    }
}

impl StateBroadcaster for RecordingCollaborator {
    fn broadcast(&self, state: &str, reason: Option<&str>) {
        self.record(CollaboratorCall::Broadcast(
            state.to_string(),
            reason.map(str::to_string),
        ));
    }

    fn card_swapped(&self, added: bool) {
        self.record(CollaboratorCall::CardSwapped(added));
    }
}

impl PropertyStore for RecordingCollaborator {
    fn set_property(&self, key: &str, value: &str) {
        self.record(CollaboratorCall::SetProperty(key.to_string(), value.to_string()));
    }
}
