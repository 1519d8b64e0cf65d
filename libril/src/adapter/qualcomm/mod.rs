// libril/src/adapter/qualcomm/mod.rs

mod config;

use std::sync::{Arc, Mutex};

use log::debug;

use crate::Result;
use crate::adapter::VendorAdapter;
use crate::icc::status::CardStatus;
use crate::protocol::parcel::ParcelReader;
use crate::protocol::responses::{decode_card_status, CardStatusLayout, DecodedValue};
use crate::types::{EventKind, RadioState, RequestKind};
use crate::utils::lock;

/// Qualcomm shared-RIL firmware: card status with retry counters, extra
/// radio-on codes and a handful of payload-less vendor events.
#[derive(Debug, Default)]
pub struct QualcommAdapter {
    /// AID of the subscription application from the last card status.
    last_aid: Mutex<Option<String>>,
}

impl QualcommAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_aid(&self) -> Option<String> {
        lock(&self.last_aid).clone()
    }

    fn remember_aid(&self, status: &CardStatus) {
        let app = status
            .application(status.gsm_umts_index)
            .or_else(|| status.application(status.cdma_index));
        let aid = app.map(|a| a.aid.clone()).filter(|aid| !aid.is_empty());
        if let Some(aid) = &aid {
            debug!("qualcomm: subscription aid {}", aid);
        }
        *lock(&self.last_aid) = aid;
    }
}

impl VendorAdapter for QualcommAdapter {
    fn name(&self) -> &'static str {
        "qualcomm"
    }

    fn decode_solicited(
        &self,
        kind: RequestKind,
        cursor: &mut ParcelReader<'_>,
    ) -> Result<Option<DecodedValue>> {
        match kind {
            RequestKind::GetSimStatus => {
                let status = decode_card_status(cursor, CardStatusLayout::WITH_RETRY_COUNTS)?;
                self.remember_aid(&status);
                Ok(Some(DecodedValue::CardStatus(Arc::new(status))))
            }
            _ => Ok(None),
        }
    }

    fn decode_unsolicited(
        &self,
        kind: EventKind,
        cursor: &mut ParcelReader<'_>,
    ) -> Result<Option<DecodedValue>> {
        match kind {
            EventKind::RadioStateChanged => {
                let code = cursor.read_i32()?;
                if config::EXTRA_RADIO_ON_STATES.contains(&code) {
                    Ok(Some(DecodedValue::RadioState(RadioState::On)))
                } else {
                    Ok(None)
                }
            }
            EventKind::Vendor(tag) if config::VOID_UNSOL_TAGS.contains(&tag) => {
                Ok(Some(DecodedValue::Void))
            }
            _ => Ok(None),
        }
    }
}
