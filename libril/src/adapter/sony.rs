// libril/src/adapter/sony.rs

use crate::adapter::VendorAdapter;
use crate::protocol::parcel::ParcelWriter;
use crate::types::RequestKind;

/// Sony firmware expects a radio access technology after the operator
/// numeric in manual network selection; -1 lets the modem pick.
#[derive(Debug, Default)]
pub struct SonyAdapter;

const RAT_UNSPECIFIED: i32 = -1;

impl SonyAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl VendorAdapter for SonyAdapter {
    fn name(&self) -> &'static str {
        "sony"
    }

    fn encode_extra(&self, kind: RequestKind, writer: &mut ParcelWriter) {
        if kind == RequestKind::SetNetworkSelectionManual {
            writer.write_i32(RAT_UNSPECIFIED);
        }
    }
}
