// libril/src/adapter/mod.rs

use crate::Result;
use crate::protocol::parcel::{ParcelReader, ParcelWriter};
use crate::protocol::responses::{self, DecodedValue};
use crate::types::{EventKind, RequestKind, Vendor};

/// Per-vendor decoding overrides. Every method defaults to "defer to the
/// base decoder" (`Ok(None)` / no extra fields), so an adapter only spells
/// out what its modem does differently.
///
/// Adapters may keep their own cached fields but never see the pending
/// request table.
pub trait VendorAdapter: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Decode a solicited payload for `kind`. Returning `Ok(None)` hands
    /// the frame to the base decoder with the cursor rewound.
    fn decode_solicited(
        &self,
        _kind: RequestKind,
        _cursor: &mut ParcelReader<'_>,
    ) -> Result<Option<DecodedValue>> {
        Ok(None)
    }

    /// Decode an unsolicited payload; the tag has already been consumed.
    fn decode_unsolicited(
        &self,
        _kind: EventKind,
        _cursor: &mut ParcelReader<'_>,
    ) -> Result<Option<DecodedValue>> {
        Ok(None)
    }

    /// Append vendor-specific trailing fields to an outbound request.
    fn encode_extra(&self, _kind: RequestKind, _writer: &mut ParcelWriter) {}
}

mod noop;
pub use noop::NoopAdapter;

#[cfg(feature = "qualcomm")]
pub mod qualcomm;
#[cfg(feature = "qualcomm")]
pub use qualcomm::QualcommAdapter;

#[cfg(feature = "samsung")]
pub mod samsung;
#[cfg(feature = "samsung")]
pub use samsung::SamsungAdapter;

#[cfg(feature = "sony")]
pub mod sony;
#[cfg(feature = "sony")]
pub use sony::SonyAdapter;

/// Factory to create the adapter for a vendor. Vendors whose feature is
/// disabled receive the no-op adapter.
pub fn create_adapter_for(vendor: Vendor) -> Box<dyn VendorAdapter> {
    match vendor {
        #[cfg(feature = "qualcomm")]
        Vendor::Qualcomm => Box::new(QualcommAdapter::new()),
        #[cfg(feature = "samsung")]
        Vendor::Samsung => Box::new(SamsungAdapter::new()),
        #[cfg(feature = "sony")]
        Vendor::Sony => Box::new(SonyAdapter::new()),
        _ => Box::new(NoopAdapter::new()),
    }
}

/// Layered solicited decode: adapter first, then the base decoder from the
/// same starting position.
pub fn decode_solicited(
    adapter: &dyn VendorAdapter,
    kind: RequestKind,
    cursor: &mut ParcelReader<'_>,
) -> Result<DecodedValue> {
    let mark = cursor.position();
    if let Some(value) = adapter.decode_solicited(kind, cursor)? {
        return Ok(value);
    }
    cursor.rewind_to(mark);
    responses::decode_solicited_base(kind, cursor)
}

/// Layered unsolicited decode. The cursor must sit on the tag; on deferral
/// it is rewound to the tag and the base table reads it again.
/// Returns the event kind and, if anything recognised the tag, its value.
pub fn decode_unsolicited(
    adapter: &dyn VendorAdapter,
    cursor: &mut ParcelReader<'_>,
) -> Result<(EventKind, Option<DecodedValue>)> {
    let mark = cursor.position();
    let kind = EventKind::from_code(cursor.read_i32()?);
    if let Some(value) = adapter.decode_unsolicited(kind, cursor)? {
        return Ok((kind, Some(value)));
    }
    cursor.rewind_to(mark);
    let kind = EventKind::from_code(cursor.read_i32()?);
    let value = responses::decode_unsolicited_base(kind, cursor)?;
    Ok((kind, value))
}
