// libril/src/protocol/codec.rs

use crate::constants::{RESPONSE_SOLICITED, RESPONSE_UNSOLICITED};
use crate::types::{EventKind, RequestKind};
use crate::{Error, Result};

use super::parcel::{ParcelReader, ParcelWriter};

/// Inbound parcel after its header has been consumed.
#[derive(Debug)]
pub enum RawFrame<'a> {
    /// Reply to an earlier request; the cursor sits on the first field.
    Solicited {
        serial: u32,
        error: i32,
        body: ParcelReader<'a>,
    },
    /// Push event; the cursor sits on the leading tag.
    Unsolicited { body: ParcelReader<'a> },
}

/// Outbound request body: kind, serial, then the already-encoded fields.
pub fn encode_request(kind: RequestKind, serial: u32, fields: &[u8]) -> Vec<u8> {
    let mut w = ParcelWriter::new();
    w.write_i32(kind.code()).write_i32(serial as i32).write_raw(fields);
    w.into_bytes()
}

/// Solicited response body as the modem would send it.
pub fn encode_response(serial: u32, error: i32, fields: &[u8]) -> Vec<u8> {
    let mut w = ParcelWriter::new();
    w.write_i32(RESPONSE_SOLICITED)
        .write_i32(serial as i32)
        .write_i32(error)
        .write_raw(fields);
    w.into_bytes()
}

/// Unsolicited event body as the modem would send it.
pub fn encode_unsolicited(kind: EventKind, fields: &[u8]) -> Vec<u8> {
    let mut w = ParcelWriter::new();
    w.write_i32(RESPONSE_UNSOLICITED)
        .write_i32(kind.code())
        .write_raw(fields);
    w.into_bytes()
}

/// Split an inbound body into its header and a field cursor.
pub fn decode_inbound(body: &[u8]) -> Result<RawFrame<'_>> {
    let mut r = ParcelReader::new(body);
    let response_type = r.read_i32()?;
    match response_type {
        RESPONSE_SOLICITED => {
            let serial = r.read_i32()? as u32;
            let error = r.read_i32()?;
            Ok(RawFrame::Solicited {
                serial,
                error,
                body: r,
            })
        }
        RESPONSE_UNSOLICITED => {
            if r.remaining() < 4 {
                return Err(Error::InvalidLength {
                    expected: 8,
                    actual: body.len(),
                });
            }
            Ok(RawFrame::Unsolicited { body: r })
        }
        other => Err(Error::FrameFormat(format!(
            "unknown response type {}",
            other
        ))),
    }
}

/// Read the request kind and serial back out of an outbound body.
pub fn decode_request_header(body: &[u8]) -> Result<(RequestKind, u32, ParcelReader<'_>)> {
    let mut r = ParcelReader::new(body);
    let kind = RequestKind::from_code(r.read_i32()?);
    let serial = r.read_i32()? as u32;
    Ok((kind, serial, r))
}
