// libril/src/adapter/samsung.rs

use crate::Result;
use crate::adapter::VendorAdapter;
use crate::protocol::parcel::ParcelReader;
use crate::protocol::responses::DecodedValue;
use crate::types::EventKind;

/// Samsung vendor unsolicited tags with no payload the stack cares about
/// (device ready, AM, data suspend/resume, stk call control, ...).
const VOID_UNSOL_TAGS: &[i32] = &[11002, 11007, 11008, 11011, 11012, 11016];

/// Samsung firmware: forwards its private events as `Vendor(tag)` instead
/// of letting them be dropped as unknown.
#[derive(Debug, Default)]
pub struct SamsungAdapter;

impl SamsungAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl VendorAdapter for SamsungAdapter {
    fn name(&self) -> &'static str {
        "samsung"
    }

    fn decode_unsolicited(
        &self,
        kind: EventKind,
        _cursor: &mut ParcelReader<'_>,
    ) -> Result<Option<DecodedValue>> {
        match kind {
            EventKind::Vendor(tag) if VOID_UNSOL_TAGS.contains(&tag) => {
                Ok(Some(DecodedValue::Void))
            }
            _ => Ok(None),
        }
    }
}
