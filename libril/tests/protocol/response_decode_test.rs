#[path = "../common/mod.rs"]
mod common;

use libril::icc::{AppState, AppType, CardState, PinState};
use libril::protocol::responses::icc_io::encode_icc_io;
use libril::protocol::responses::{
    decode_card_status, decode_solicited_base, decode_unsolicited_base, encode_card_status,
    CardStatusLayout, DecodedValue, IccIoResult,
};
use libril::protocol::{codec, ParcelReader, ParcelWriter, RawFrame};
use libril::{Error, EventKind, RadioState, RequestKind};

use common::fixtures;

#[test]
fn dual_mode_card_status_decodes_both_applications() {
    let status = fixtures::dual_mode_card(AppState::Ready, AppState::PinRequired);
    let mut w = ParcelWriter::new();
    encode_card_status(&status, CardStatusLayout::BASE, &mut w);

    let mut r = ParcelReader::new(w.as_bytes());
    let decoded = decode_card_status(&mut r, CardStatusLayout::BASE).unwrap();
    assert!(r.is_exhausted());
    assert_eq!(decoded.card_state, CardState::Present);
    assert_eq!(decoded.gsm_umts_index, 0);
    assert_eq!(decoded.cdma_index, 1);
    assert_eq!(decoded.applications.len(), 2);
    assert_eq!(decoded.applications[0].aid, fixtures::USIM_AID);
    assert_eq!(decoded.applications[1].app_type, AppType::Csim);
    assert_eq!(decoded.applications[1].app_state, AppState::PinRequired);
}

#[test]
fn application_count_is_capped() {
    let mut w = ParcelWriter::new();
    // present, universal pin unknown, gsm 0, cdma -1, ims -1, ten apps
    w.write_i32(1).write_i32(0).write_i32(0).write_i32(-1).write_i32(-1).write_i32(10);
    for _ in 0..10 {
        w.write_i32(2)
            .write_i32(5)
            .write_i32(0)
            .write_string(fixtures::USIM_AID)
            .write_string("")
            .write_i32(0)
            .write_i32(2)
            .write_i32(0);
    }
    let mut r = ParcelReader::new(w.as_bytes());
    let status = decode_card_status(&mut r, CardStatusLayout::BASE).unwrap();
    assert_eq!(status.applications.len(), 8);
    assert_eq!(status.applications[7].pin1, PinState::EnabledVerified);
}

#[test]
fn unknown_card_state_is_a_frame_error() {
    let mut w = ParcelWriter::new();
    w.write_i32(7);
    let mut r = ParcelReader::new(w.as_bytes());
    match decode_card_status(&mut r, CardStatusLayout::BASE) {
        Err(Error::FrameFormat(msg)) => assert!(msg.contains("card state")),
        other => panic!("expected FrameFormat, got: {:?}", other),
    }
}

#[test]
fn sim_io_result_with_null_payload() {
    let result = IccIoResult {
        sw1: 0x6a,
        sw2: 0x82,
        payload: None,
    };
    let mut w = ParcelWriter::new();
    encode_icc_io(&result, &mut w);
    let value = decode_solicited_base(RequestKind::SimIo, &mut ParcelReader::new(w.as_bytes())).unwrap();
    match value {
        DecodedValue::IccIo(io) => {
            assert!(!io.is_success());
            assert_eq!(io.payload, None);
        }
        other => panic!("expected IccIo, got: {:?}", other),
    }
}

#[test]
fn imei_decodes_as_string() {
    let fields = fixtures::imei_fields("356938035643809");
    let value = decode_solicited_base(RequestKind::GetImei, &mut ParcelReader::new(&fields)).unwrap();
    assert_eq!(value.as_str(), Some("356938035643809"));
}

#[test]
fn radio_state_event_through_codec() {
    let mut w = ParcelWriter::new();
    w.write_i32(2);
    let body = codec::encode_unsolicited(EventKind::RadioStateChanged, w.as_bytes());
    let mut cursor = match codec::decode_inbound(&body).unwrap() {
        RawFrame::Unsolicited { body } => body,
        other => panic!("expected unsolicited frame, got: {:?}", other),
    };
    let kind = EventKind::from_code(cursor.read_i32().unwrap());
    assert_eq!(kind, EventKind::RadioStateChanged);
    let value = decode_unsolicited_base(kind, &mut cursor).unwrap();
    assert_eq!(value, Some(DecodedValue::RadioState(RadioState::On)));
}

#[test]
fn solicited_error_frame_keeps_serial_and_code() {
    let body = codec::encode_response(12, 3, &[]);
    match codec::decode_inbound(&body).unwrap() {
        RawFrame::Solicited { serial, error, body } => {
            assert_eq!(serial, 12);
            assert_eq!(error, 3);
            assert!(body.is_exhausted());
        }
        other => panic!("expected solicited frame, got: {:?}", other),
    }
}

#[test]
fn unknown_response_type_is_rejected() {
    let mut w = ParcelWriter::new();
    w.write_i32(5).write_i32(0);
    assert!(codec::decode_inbound(w.as_bytes()).is_err());
}
