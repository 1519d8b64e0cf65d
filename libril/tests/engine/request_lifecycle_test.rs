#[path = "../common/mod.rs"]
mod common;

use std::collections::HashSet;
use std::thread;

use crossbeam_channel::unbounded;
use libril::protocol::ParcelWriter;
use libril::test_support::connected_mock_engine;
use libril::{Command, CommandError, DecodedValue, Error, RequestKind, Vendor};

use common::{fixtures, WAIT};

#[test]
fn responses_out_of_order_reach_their_own_callers() -> anyhow::Result<()> {
    common::init_logging();
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;

    let imei = engine.send(Command::GetImei)?;
    let baseband = engine.send(Command::BasebandVersion)?;
    let first = peer.next_request(WAIT).unwrap();
    let second = peer.next_request(WAIT).unwrap();
    assert_eq!(first.kind, RequestKind::GetImei);
    assert_eq!(second.kind, RequestKind::BasebandVersion);

    let mut w = ParcelWriter::new();
    w.write_string("MPSS.TA.2.3");
    peer.respond(second.serial, 0, w.as_bytes());
    peer.respond(first.serial, 0, &fixtures::imei_fields("356938035643809"));

    assert_eq!(baseband.wait_timeout(WAIT)?.as_str(), Some("MPSS.TA.2.3"));
    assert_eq!(imei.wait_timeout(WAIT)?.as_str(), Some("356938035643809"));
    assert_eq!(engine.pending_len(), 0);
    engine.disconnect()?;
    Ok(())
}

#[test]
fn concurrent_senders_get_distinct_serials() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            thread::spawn(move || {
                (0..8)
                    .map(|_| engine.send(Command::SignalStrength).map(|h| h.serial()))
                    .collect::<Result<Vec<u32>, Error>>()
            })
        })
        .collect();

    let mut serials = HashSet::new();
    for worker in workers {
        for serial in worker.join().unwrap()? {
            assert!(serials.insert(serial), "serial {} issued twice", serial);
        }
    }
    assert_eq!(serials.len(), 64);
    assert_eq!(engine.pending_len(), 64);

    // every body reached the peer whole and in a serial it was promised
    for _ in 0..64 {
        let req = peer.next_request(WAIT).unwrap();
        assert_eq!(req.kind, RequestKind::SignalStrength);
        assert!(serials.contains(&req.serial));
    }
    engine.disconnect()?;
    Ok(())
}

#[test]
fn modem_error_code_is_reported() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let handle = engine.send(Command::GetImsi { aid: None })?;
    let req = peer.expect_request(RequestKind::GetImsi, WAIT).unwrap();
    peer.respond(req.serial, CommandError::RadioNotAvailable.code(), &[]);

    match handle.wait_timeout(WAIT) {
        Err(err) => {
            assert_eq!(err.command_error(), Some(CommandError::RadioNotAvailable));
            assert!(!err.is_connection_loss());
        }
        other => panic!("expected command error, got: {:?}", other),
    }
    assert!(engine.is_connected());
    engine.disconnect()?;
    Ok(())
}

#[test]
fn handle_timeout_leaves_request_pending() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let handle = engine.send(Command::Operator)?;
    let serial = handle.serial();
    assert!(handle.try_wait().is_none());
    assert!(matches!(
        handle.wait_timeout(std::time::Duration::from_millis(20)),
        Err(Error::Timeout)
    ));
    assert_eq!(engine.pending_len(), 1);

    // the late answer is consumed without a waiting caller
    peer.expect_request(RequestKind::Operator, WAIT).unwrap();
    let mut w = ParcelWriter::new();
    w.write_string_array(&["T-Mobile", "TMO", "310260"]);
    peer.respond(serial, 0, w.as_bytes());
    let fence = engine.send(Command::GetImei)?;
    let req = peer.expect_request(RequestKind::GetImei, WAIT).unwrap();
    peer.respond(req.serial, 0, &fixtures::imei_fields("0"));
    fence.wait_timeout(WAIT)?;
    assert_eq!(engine.pending_len(), 0);
    engine.disconnect()?;
    Ok(())
}

#[test]
fn callback_completion_runs_once() -> anyhow::Result<()> {
    let (engine, peer) = connected_mock_engine(Vendor::Generic)?;
    let (tx, rx) = unbounded();
    let serial = engine.send_with(Command::QueryFacilityLock {
        facility: "SC".into(),
        password: String::new(),
        service_class: 7,
        aid: None,
    }, move |result| {
        let _ = tx.send(result.map_err(|e| e.to_string()));
    })?;

    let req = peer.expect_request(RequestKind::QueryFacilityLock, WAIT).unwrap();
    assert_eq!(req.serial, serial);
    let mut w = ParcelWriter::new();
    w.write_int_array(&[1]);
    peer.respond(serial, 0, w.as_bytes());
    // a duplicate answer for the same serial is dropped
    peer.respond(serial, 0, w.as_bytes());

    assert_eq!(rx.recv_timeout(WAIT)?, Ok(DecodedValue::Ints(vec![1])));
    engine.disconnect()?;
    assert!(rx.try_recv().is_err());
    Ok(())
}
