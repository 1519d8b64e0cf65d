#[path = "../common/mod.rs"]
mod common;

use libril::constants::{CB_FACILITY_BA_SIM, SERVICE_CLASS_LOCK};
use libril::protocol::{codec, Command, Frame, ParcelReader};
use libril::RequestKind;

#[test]
fn enter_sim_pin_matches_golden_frame() {
    let cmd = Command::EnterSimPin {
        pin: "1234".into(),
        aid: None,
    };
    let body = codec::encode_request(cmd.kind(), 7, &cmd.encode());
    let frame = Frame::encode(&body).unwrap();
    assert_eq!(hex::encode(&frame), common::fixtures::ENTER_SIM_PIN_SERIAL_7_HEX);
    assert!(cmd.carries_secret());
}

#[test]
fn query_facility_lock_fields() {
    let cmd = Command::QueryFacilityLock {
        facility: CB_FACILITY_BA_SIM.into(),
        password: String::new(),
        service_class: SERVICE_CLASS_LOCK,
        aid: Some(common::fixtures::USIM_AID.into()),
    };
    assert_eq!(cmd.kind(), RequestKind::QueryFacilityLock);
    let fields = cmd.encode();
    let strings = ParcelReader::new(&fields).read_string_array().unwrap();
    assert_eq!(
        strings,
        vec![
            Some("SC".to_string()),
            Some(String::new()),
            Some("7".to_string()),
            Some(common::fixtures::USIM_AID.to_string()),
        ]
    );
    assert!(!cmd.carries_secret());
}

#[test]
fn set_facility_lock_encodes_enable_flag_as_string() {
    let cmd = Command::SetFacilityLock {
        facility: "FD".into(),
        enable: true,
        password: "5678".into(),
        service_class: 15,
        aid: None,
    };
    let fields = cmd.encode();
    let strings = ParcelReader::new(&fields).read_string_array().unwrap();
    assert_eq!(strings[0].as_deref(), Some("FD"));
    assert_eq!(strings[1].as_deref(), Some("1"));
    assert_eq!(strings[3].as_deref(), Some("15"));
    assert_eq!(strings[4], None);
    assert!(cmd.carries_secret());
}

#[test]
fn radio_power_is_a_one_element_int_array() {
    let fields = Command::RadioPower { on: true }.encode();
    assert_eq!(ParcelReader::new(&fields).read_int_array().unwrap(), vec![1]);
}

#[test]
fn raw_command_passes_fields_through() {
    let cmd = Command::Raw {
        kind: RequestKind::Other(4321),
        fields: vec![9, 0, 0, 0],
    };
    let body = codec::encode_request(cmd.kind(), 3, &cmd.encode());
    let (kind, serial, mut rest) = codec::decode_request_header(&body).unwrap();
    assert_eq!(kind, RequestKind::Other(4321));
    assert_eq!(serial, 3);
    assert_eq!(rest.read_i32().unwrap(), 9);
}
