// libril/src/protocol/responses/mod.rs

pub mod card_status;
pub mod icc_io;

use std::sync::Arc;

pub use card_status::{decode_card_status, encode_card_status, CardStatusLayout};
pub use icc_io::{decode_icc_io, IccIoResult};

use crate::icc::status::CardStatus;
use crate::protocol::parcel::ParcelReader;
use crate::types::{EventKind, RadioState, RequestKind, ResponseShape};
use crate::{Error, Result};

/// A decoded response or event payload. Which variant comes back is
/// decided by the request kind (or event tag), never by the bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedValue {
    Void,
    Ints(Vec<i32>),
    String(Option<String>),
    Strings(Vec<Option<String>>),
    Raw(Vec<u8>),
    CardStatus(Arc<CardStatus>),
    RadioState(RadioState),
    IccIo(IccIoResult),
}

impl DecodedValue {
    pub fn as_ints(&self) -> Option<&[i32]> {
        match self {
            Self::Ints(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_card_status(&self) -> Option<&Arc<CardStatus>> {
        match self {
            Self::CardStatus(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_radio_state(&self) -> Option<RadioState> {
        match self {
            Self::RadioState(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => s.as_deref(),
            _ => None,
        }
    }
}

/// Radio state int as carried by UNSOL_RESPONSE_RADIO_STATE_CHANGED.
pub fn decode_radio_state(r: &mut ParcelReader<'_>) -> Result<RadioState> {
    let code = r.read_i32()?;
    RadioState::from_code(code)
        .ok_or_else(|| Error::FrameFormat(format!("unknown radio state {}", code)))
}

/// Decode fields according to a declared shape.
pub fn decode_shape(shape: ResponseShape, r: &mut ParcelReader<'_>) -> Result<DecodedValue> {
    Ok(match shape {
        ResponseShape::Void => DecodedValue::Void,
        ResponseShape::Ints => DecodedValue::Ints(r.read_int_array()?),
        ResponseShape::String => DecodedValue::String(r.read_string()?),
        ResponseShape::Strings => DecodedValue::Strings(r.read_string_array()?),
        ResponseShape::Raw => DecodedValue::Raw(r.read_byte_array()?.unwrap_or_default()),
        ResponseShape::CardStatus => DecodedValue::CardStatus(Arc::new(decode_card_status(
            r,
            CardStatusLayout::BASE,
        )?)),
        ResponseShape::RadioState => DecodedValue::RadioState(decode_radio_state(r)?),
        ResponseShape::IccIo => DecodedValue::IccIo(decode_icc_io(r)?),
    })
}

/// Base decoder for a solicited response of the given kind.
pub fn decode_solicited_base(kind: RequestKind, r: &mut ParcelReader<'_>) -> Result<DecodedValue> {
    let shape = kind
        .response_shape()
        .ok_or(Error::UnsupportedRequest(kind))?;
    decode_shape(shape, r)
}

/// Base decoder for an unsolicited payload; the tag is already consumed.
/// `Ok(None)` means the tag is not one the base table knows.
pub fn decode_unsolicited_base(
    kind: EventKind,
    r: &mut ParcelReader<'_>,
) -> Result<Option<DecodedValue>> {
    match kind.payload_shape() {
        Some(shape) => decode_shape(shape, r).map(Some),
        None => Ok(None),
    }
}
