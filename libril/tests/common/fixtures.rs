// fixtures.rs: commonly used card snapshots and frames

use libril::icc::{AppState, AppType, Application, CardStatus, PinState};
use libril::protocol::{Frame, ParcelWriter};

pub const USIM_AID: &str = "a0000000871002";
pub const CSIM_AID: &str = "a0000003431002";

pub fn usim(state: AppState) -> Application {
    Application::new(AppType::Usim, state)
        .with_aid(USIM_AID)
        .with_pin1(PinState::EnabledNotVerified)
}

pub fn csim(state: AppState) -> Application {
    Application::new(AppType::Csim, state).with_aid(CSIM_AID)
}

pub fn ready_usim_card() -> CardStatus {
    CardStatus::present(vec![usim(AppState::Ready).with_pin1(PinState::EnabledVerified)], 0, -1)
}

pub fn pin_locked_card() -> CardStatus {
    CardStatus::present(vec![usim(AppState::PinRequired)], 0, -1)
}

pub fn puk_locked_card() -> CardStatus {
    CardStatus::present(
        vec![usim(AppState::PukRequired).with_pin1(PinState::EnabledBlocked)],
        0,
        -1,
    )
}

pub fn perso_locked_card() -> CardStatus {
    CardStatus::present(vec![usim(AppState::SubscriptionPersoRequired)], 0, -1)
}

pub fn perm_blocked_card() -> CardStatus {
    CardStatus::present(
        vec![usim(AppState::PukRequired).with_pin1(PinState::EnabledPermBlocked)],
        0,
        -1,
    )
}

/// USIM at index 0 and CSIM at index 1.
pub fn dual_mode_card(gsm: AppState, cdma: AppState) -> CardStatus {
    CardStatus::present(vec![usim(gsm), csim(cdma)], 0, 1)
}

/// GET_IMEI answer fields.
pub fn imei_fields(imei: &str) -> Vec<u8> {
    let mut w = ParcelWriter::new();
    w.write_string(imei);
    w.into_bytes()
}

/// GET_SIM_STATUS request for serial 1, framed.
pub const GET_SIM_STATUS_SERIAL_1_HEX: &str = "000000080100000001000000";

/// ENTER_SIM_PIN "1234" without AID, serial 7, framed.
pub const ENTER_SIM_PIN_SERIAL_7_HEX: &str = concat!(
    "00000020",
    "02000000",
    "07000000",
    "02000000",
    "04000000",
    "3100320033003400",
    "00000000",
    "ffffffff",
);

pub fn framed(body: &[u8]) -> Vec<u8> {
    Frame::encode(body).unwrap()
}
