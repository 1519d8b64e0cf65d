#[path = "../common/mod.rs"]
mod common;

use crossbeam_channel::unbounded;
use libril::icc::RetryCounts;
use libril::protocol::responses::CardStatusLayout;
use libril::protocol::{ParcelReader, ParcelWriter};
use libril::test_support::{card_status_fields, connected_mock_engine, push_radio_state};
use libril::{Command, DecodedValue, EventKind, RadioState, RequestKind, Vendor};

use common::{fixtures, WAIT};

#[test]
fn qualcomm_card_status_carries_retry_counts() -> anyhow::Result<()> {
    common::init_logging();
    let (engine, peer) = connected_mock_engine(Vendor::Qualcomm)?;
    assert_eq!(engine.adapter_name(), "qualcomm");

    let mut status = fixtures::pin_locked_card();
    status.applications[0].retries = Some(RetryCounts {
        pin1: 1,
        puk1: 10,
        pin2: 3,
        puk2: 10,
    });

    let handle = engine.send(Command::GetSimStatus)?;
    let req = peer.expect_request(RequestKind::GetSimStatus, WAIT).unwrap();
    peer.respond(
        req.serial,
        0,
        &card_status_fields(&status, CardStatusLayout::WITH_RETRY_COUNTS),
    );

    let value = handle.wait_timeout(WAIT)?;
    let decoded = value.as_card_status().unwrap();
    assert_eq!(decoded.applications[0].retries.map(|r| r.pin1), Some(1));
    engine.disconnect()?;
    Ok(())
}

#[test]
fn qualcomm_vendor_radio_codes_mean_on() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Qualcomm)?;
    let (tx, rx) = unbounded();
    engine.subscribe(EventKind::RadioStateChanged, move |ev| {
        let _ = tx.send(ev.value.as_radio_state());
    });

    for code in [11, 13, 0] {
        push_radio_state(&peer, code);
    }
    assert_eq!(rx.recv_timeout(WAIT)?, Some(RadioState::On));
    assert_eq!(rx.recv_timeout(WAIT)?, Some(RadioState::On));
    assert_eq!(rx.recv_timeout(WAIT)?, Some(RadioState::Off));
    assert_eq!(engine.radio_state(), RadioState::Off);
    engine.disconnect()?;
    Ok(())
}

#[test]
fn generic_adapter_drops_vendor_radio_codes() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let (tx, rx) = unbounded();
    engine.subscribe(EventKind::RadioStateChanged, move |ev| {
        let _ = tx.send(ev.value.as_radio_state());
    });

    // 13 is not a base radio state; the frame is dropped, the link stays up
    push_radio_state(&peer, 13);
    push_radio_state(&peer, 10);
    assert_eq!(rx.recv_timeout(WAIT)?, Some(RadioState::On));
    assert!(engine.is_connected());
    engine.disconnect()?;
    Ok(())
}

#[test]
fn samsung_private_events_reach_subscribers() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Samsung)?;
    let (tx, rx) = unbounded();
    engine.subscribe(EventKind::Vendor(11008), move |ev| {
        let _ = tx.send(ev.value.clone());
    });

    peer.push_unsolicited(EventKind::Vendor(11008), &[]);
    assert_eq!(rx.recv_timeout(WAIT)?, DecodedValue::Void);
    engine.disconnect()?;
    Ok(())
}

#[test]
fn sony_manual_selection_appends_rat() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Sony)?;
    let _handle = engine.send(Command::SetNetworkSelectionManual {
        operator_numeric: "44010".into(),
    })?;
    let req = peer
        .expect_request(RequestKind::SetNetworkSelectionManual, WAIT)
        .unwrap();

    let mut r = ParcelReader::new(&req.fields);
    assert_eq!(r.read_string()?.as_deref(), Some("44010"));
    assert_eq!(r.read_i32()?, -1);
    assert!(r.is_exhausted());
    engine.disconnect()?;
    Ok(())
}

#[test]
fn generic_manual_selection_has_no_rat() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let _handle = engine.send(Command::SetNetworkSelectionManual {
        operator_numeric: "44010".into(),
    })?;
    let req = peer
        .expect_request(RequestKind::SetNetworkSelectionManual, WAIT)
        .unwrap();

    let mut expected = ParcelWriter::new();
    expected.write_string("44010");
    assert_eq!(req.fields, expected.into_bytes());
    engine.disconnect()?;
    Ok(())
}
