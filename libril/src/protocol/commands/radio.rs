// libril/src/protocol/commands/radio.rs

use crate::protocol::parcel::ParcelWriter;

/// Single boolean int in a one-element int array (RADIO_POWER, SCREEN_STATE).
pub fn encode_flag(w: &mut ParcelWriter, on: bool) {
    w.write_int_array(&[on as i32]);
}

/// Operator numeric (MCC+MNC) as a bare string.
pub fn encode_network_selection_manual(w: &mut ParcelWriter, operator_numeric: &str) {
    w.write_string(operator_numeric);
}

/// GET_IMSI carries the application id as a one-element string array.
pub fn encode_imsi_request(w: &mut ParcelWriter, aid: Option<&str>) {
    w.write_i32(1).write_opt_string(aid);
}
