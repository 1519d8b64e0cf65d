// libril/src/protocol/commands/sim.rs

use crate::protocol::parcel::ParcelWriter;

/// PIN/PUK style requests: a string array of the secrets followed by the
/// application id.
/// Layout: count(i32) + secrets(string*) + aid(string)
pub fn encode_secret_entry(w: &mut ParcelWriter, secrets: &[&str], aid: Option<&str>) {
    w.write_i32(secrets.len() as i32 + 1);
    for s in secrets {
        w.write_string(s);
    }
    w.write_opt_string(aid);
}

/// Layout: count=1 + depersonalization code
pub fn encode_network_depersonalization(w: &mut ParcelWriter, code: &str) {
    w.write_string_array(&[code][..]);
}

/// Layout: count=4 + facility + password + service class + aid
pub fn encode_query_facility_lock(
    w: &mut ParcelWriter,
    facility: &str,
    password: &str,
    service_class: i32,
    aid: Option<&str>,
) {
    w.write_i32(4)
        .write_string(facility)
        .write_string(password)
        .write_string(&service_class.to_string())
        .write_opt_string(aid);
}

/// Layout: count=5 + facility + "1"/"0" + password + service class + aid
pub fn encode_set_facility_lock(
    w: &mut ParcelWriter,
    facility: &str,
    enable: bool,
    password: &str,
    service_class: i32,
    aid: Option<&str>,
) {
    w.write_i32(5)
        .write_string(facility)
        .write_string(if enable { "1" } else { "0" })
        .write_string(password)
        .write_string(&service_class.to_string())
        .write_opt_string(aid);
}

/// Elementary-file access on the card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IccIoRequest {
    pub command: i32,
    pub file_id: i32,
    pub path: String,
    pub p1: i32,
    pub p2: i32,
    pub p3: i32,
    pub data: Option<String>,
    pub pin2: Option<String>,
    pub aid: Option<String>,
}

/// Layout: command, fileid, path, p1, p2, p3, data, pin2, aid
pub fn encode_icc_io(w: &mut ParcelWriter, req: &IccIoRequest) {
    w.write_i32(req.command)
        .write_i32(req.file_id)
        .write_string(&req.path)
        .write_i32(req.p1)
        .write_i32(req.p2)
        .write_i32(req.p3)
        .write_opt_string(req.data.as_deref())
        .write_opt_string(req.pin2.as_deref())
        .write_opt_string(req.aid.as_deref());
}
