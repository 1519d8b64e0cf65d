// libril/src/protocol/responses/card_status.rs

use crate::constants::CARD_MAX_APPS;
use crate::icc::status::{
    AppState, AppType, Application, CardState, CardStatus, PersoSubstate, PinState, RetryCounts,
};
use crate::protocol::parcel::{ParcelReader, ParcelWriter};
use crate::{Error, Result};

/// Vendor variations of the GET_SIM_STATUS layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardStatusLayout {
    /// Four trailing ints per application: pin1, puk1, pin2, puk2 retries.
    pub retry_counts: bool,
}

impl CardStatusLayout {
    pub const BASE: Self = Self {
        retry_counts: false,
    };
    pub const WITH_RETRY_COUNTS: Self = Self { retry_counts: true };
}

/// Decode GET_SIM_STATUS
/// Layout: card_state, universal_pin, gsm_idx, cdma_idx, ims_idx, num_apps,
///         then per app: type, state, perso, aid, label, pin1_replaced, pin1, pin2
///         [+ 4 retry counts]
pub fn decode_card_status(r: &mut ParcelReader<'_>, layout: CardStatusLayout) -> Result<CardStatus> {
    let card_code = r.read_i32()?;
    let card_state = CardState::from_code(card_code)
        .ok_or_else(|| Error::FrameFormat(format!("unknown card state {}", card_code)))?;
    let universal_pin_state = PinState::from_code(r.read_i32()?);
    let gsm_umts_index = r.read_i32()?;
    let cdma_index = r.read_i32()?;
    let ims_index = r.read_i32()?;

    let num_apps = r.read_i32()?;
    if num_apps < 0 {
        return Err(Error::FrameFormat(format!(
            "negative application count {}",
            num_apps
        )));
    }
    let num_apps = (num_apps as usize).min(CARD_MAX_APPS);

    let mut applications = Vec::with_capacity(num_apps);
    for _ in 0..num_apps {
        applications.push(decode_application(r, layout)?);
    }

    Ok(CardStatus {
        card_state,
        universal_pin_state,
        gsm_umts_index,
        cdma_index,
        ims_index,
        applications,
    })
}

fn decode_application(r: &mut ParcelReader<'_>, layout: CardStatusLayout) -> Result<Application> {
    let app_type = AppType::from_code(r.read_i32()?);
    let app_state = AppState::from_code(r.read_i32()?);
    let perso_substate = PersoSubstate::new(r.read_i32()?);
    let aid = r.read_string()?.unwrap_or_default();
    let label = r.read_string()?.unwrap_or_default();
    let pin1_replaced = r.read_i32()? != 0;
    let pin1 = PinState::from_code(r.read_i32()?);
    let pin2 = PinState::from_code(r.read_i32()?);
    let retries = if layout.retry_counts {
        Some(RetryCounts {
            pin1: r.read_i32()?,
            puk1: r.read_i32()?,
            pin2: r.read_i32()?,
            puk2: r.read_i32()?,
        })
    } else {
        None
    };

    Ok(Application {
        app_type,
        app_state,
        perso_substate,
        aid,
        label,
        pin1_replaced,
        pin1,
        pin2,
        retries,
    })
}

/// Write a card status the way the modem sends it. Used by mock peers.
pub fn encode_card_status(status: &CardStatus, layout: CardStatusLayout, w: &mut ParcelWriter) {
    w.write_i32(status.card_state.code())
        .write_i32(status.universal_pin_state.code())
        .write_i32(status.gsm_umts_index)
        .write_i32(status.cdma_index)
        .write_i32(status.ims_index)
        .write_i32(status.applications.len() as i32);
    for app in &status.applications {
        w.write_i32(app.app_type.code())
            .write_i32(app.app_state.code())
            .write_i32(app.perso_substate.code())
            .write_string(&app.aid)
            .write_string(&app.label)
            .write_i32(app.pin1_replaced as i32)
            .write_i32(app.pin1.code())
            .write_i32(app.pin2.code());
        if layout.retry_counts {
            let retries = app.retries.unwrap_or_default();
            w.write_i32(retries.pin1)
                .write_i32(retries.puk1)
                .write_i32(retries.pin2)
                .write_i32(retries.puk2);
        }
    }
}
