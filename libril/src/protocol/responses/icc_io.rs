// libril/src/protocol/responses/icc_io.rs

use crate::protocol::parcel::{ParcelReader, ParcelWriter};
use crate::Result;

/// SIM_IO result: status words plus the hex-encoded response data.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IccIoResult {
    pub sw1: i32,
    pub sw2: i32,
    pub payload: Option<String>,
}

impl IccIoResult {
    /// 0x90 0x00 and the 0x91/0x9e/0x9f "more data" family are success.
    pub fn is_success(&self) -> bool {
        matches!(self.sw1, 0x90 | 0x91 | 0x9e | 0x9f)
    }
}

/// Layout: sw1, sw2, response string
pub fn decode_icc_io(r: &mut ParcelReader<'_>) -> Result<IccIoResult> {
    let sw1 = r.read_i32()?;
    let sw2 = r.read_i32()?;
    let payload = r.read_string()?;
    Ok(IccIoResult { sw1, sw2, payload })
}

pub fn encode_icc_io(result: &IccIoResult, w: &mut ParcelWriter) {
    w.write_i32(result.sw1)
        .write_i32(result.sw2)
        .write_opt_string(result.payload.as_deref());
}
