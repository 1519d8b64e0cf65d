#[path = "../common/mod.rs"]
mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crossbeam_channel::unbounded;
use libril::protocol::responses::CardStatusLayout;
use libril::test_support::{card_status_fields, connected_mock_engine, push_radio_state};
use libril::{Command, EventKind, RadioState, RequestKind, Vendor};

use common::{fixtures, WAIT};

#[test]
fn handler_can_send_from_the_reader_thread() -> anyhow::Result<()> {
    common::init_logging();
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let (tx, rx) = unbounded();

    let sender = engine.clone();
    engine.subscribe(EventKind::SimStatusChanged, move |_| {
        let tx = tx.clone();
        let on_reader = sender.on_reader_thread();
        let sent = sender.send_with(Command::GetSimStatus, move |result| {
            let _ = tx.send((on_reader, result.ok().and_then(|v| v.as_card_status().cloned())));
        });
        assert!(sent.is_ok());
    });

    peer.push_unsolicited(EventKind::SimStatusChanged, &[]);
    let req = peer.expect_request(RequestKind::GetSimStatus, WAIT).unwrap();
    peer.respond(
        req.serial,
        0,
        &card_status_fields(&fixtures::ready_usim_card(), CardStatusLayout::BASE),
    );

    let (on_reader, status) = rx.recv_timeout(WAIT)?;
    assert!(on_reader);
    assert_eq!(status.as_deref(), Some(&fixtures::ready_usim_card()));
    engine.disconnect()?;
    Ok(())
}

#[test]
fn events_arrive_in_wire_order() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let (tx, rx) = unbounded();
    engine.subscribe(EventKind::RadioStateChanged, move |ev| {
        let _ = tx.send(ev.value.as_radio_state());
    });

    for code in [0, 10, 1, 2] {
        push_radio_state(&peer, code);
    }
    let seen: Vec<_> = (0..4).map(|_| rx.recv_timeout(WAIT).ok().flatten()).collect();
    assert_eq!(
        seen,
        vec![
            Some(RadioState::Off),
            Some(RadioState::On),
            Some(RadioState::Unavailable),
            Some(RadioState::On),
        ]
    );
    engine.disconnect()?;
    Ok(())
}

#[test]
fn unsubscribed_handler_is_not_called() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let hits = Arc::new(AtomicUsize::new(0));
    let (tx, rx) = unbounded();

    let counter = hits.clone();
    let sub = engine.subscribe(EventKind::CallStateChanged, move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    engine.subscribe(EventKind::CallStateChanged, move |_| {
        let _ = tx.send(());
    });

    peer.push_unsolicited(EventKind::CallStateChanged, &[]);
    rx.recv_timeout(WAIT)?;
    assert!(engine.unsubscribe(&sub));
    assert!(!engine.unsubscribe(&sub));

    peer.push_unsolicited(EventKind::CallStateChanged, &[]);
    rx.recv_timeout(WAIT)?;
    assert_eq!(hits.load(Ordering::SeqCst), 1);
    engine.disconnect()?;
    Ok(())
}

#[test]
fn panicking_handler_does_not_stop_the_reader() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let (tx, rx) = unbounded();
    engine.subscribe(EventKind::Nitz, |_| panic!("handler bug"));
    engine.subscribe(EventKind::Nitz, move |ev| {
        let _ = tx.send(ev.value.as_str().map(str::to_string));
    });

    let mut w = libril::protocol::ParcelWriter::new();
    w.write_string("24/10/19,12:00:00+08,00");
    peer.push_unsolicited(EventKind::Nitz, w.as_bytes());
    assert_eq!(rx.recv_timeout(WAIT)?.as_deref(), Some("24/10/19,12:00:00+08,00"));
    assert!(engine.is_connected());
    engine.disconnect()?;
    Ok(())
}

#[test]
fn unknown_tag_between_request_and_response_is_skipped() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let hits = Arc::new(AtomicUsize::new(0));
    let h = hits.clone();
    engine.subscribe(EventKind::Vendor(54321), move |_| {
        h.fetch_add(1, Ordering::SeqCst);
    });

    let handle = engine.send(Command::GetImei)?;
    let req = peer.expect_request(RequestKind::GetImei, WAIT).unwrap();
    peer.push_unsolicited(EventKind::Vendor(54321), &[0x2a, 0, 0, 0]);
    peer.respond(req.serial, 0, &fixtures::imei_fields("356938035643809"));

    let imei = handle.wait_timeout(WAIT)?;
    assert_eq!(imei.as_str(), Some("356938035643809"));
    // no decoder knows the tag, so nothing was published
    assert_eq!(hits.load(Ordering::SeqCst), 0);
    assert!(engine.is_connected());
    assert_eq!(engine.pending_len(), 0);
    engine.disconnect()?;
    Ok(())
}
