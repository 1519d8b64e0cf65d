#[path = "../common/mod.rs"]
mod common;

use std::io::Cursor;

use libril::constants::MAX_FRAME_LEN;
use libril::protocol::codec;
use libril::protocol::Frame;
use libril::{Error, RequestKind};

#[test]
fn get_sim_status_request_matches_golden_frame() {
    let body = codec::encode_request(RequestKind::GetSimStatus, 1, &[]);
    let frame = Frame::encode(&body).unwrap();
    assert_eq!(hex::encode(&frame), common::fixtures::GET_SIM_STATUS_SERIAL_1_HEX);
}

#[test]
fn stream_of_frames_reads_back_in_order() {
    let mut stream = Vec::new();
    for serial in 1..=3u32 {
        let body = codec::encode_request(RequestKind::GetImei, serial, &[]);
        Frame::write_to(&mut stream, &body).unwrap();
    }
    let mut reader = Cursor::new(stream);
    for serial in 1..=3u32 {
        let body = Frame::read_from(&mut reader, MAX_FRAME_LEN).unwrap();
        let (kind, got, _) = codec::decode_request_header(&body).unwrap();
        assert_eq!(kind, RequestKind::GetImei);
        assert_eq!(got, serial);
    }
    assert!(matches!(
        Frame::read_from(&mut reader, MAX_FRAME_LEN),
        Err(Error::Disconnected)
    ));
}

#[test]
fn oversized_length_prefix_is_rejected() {
    let mut record = ((MAX_FRAME_LEN + 1) as u32).to_be_bytes().to_vec();
    record.extend_from_slice(&[0u8; 16]);
    match Frame::read_from(&mut Cursor::new(record), MAX_FRAME_LEN) {
        Err(Error::FrameFormat(_)) => {}
        other => panic!("expected frame format error, got: {:?}", other),
    }
}

#[test]
fn truncated_body_is_not_a_clean_disconnect() {
    let mut record = 8u32.to_be_bytes().to_vec();
    record.extend_from_slice(&[1, 0, 0]);
    let result = Frame::read_from(&mut Cursor::new(record), MAX_FRAME_LEN);
    assert!(result.is_err());
    assert!(!matches!(result, Err(Error::Disconnected)));
}
