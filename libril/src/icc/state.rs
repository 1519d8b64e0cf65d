// libril/src/icc/state.rs

//! Pure state derivation and transition planning for the SIM card.
//!
//! Nothing here touches the engine or any collaborator: the same inputs
//! always give the same state and the same plan.

use derive_more::Display;
use log::{debug, warn};

use crate::constants::{
    INTENT_VALUE_ABSENT_ON_PERM_DISABLED, INTENT_VALUE_ICC_ABSENT, INTENT_VALUE_ICC_LOCKED,
    INTENT_VALUE_ICC_READY, INTENT_VALUE_LOCKED_NETWORK, INTENT_VALUE_LOCKED_ON_PIN,
    INTENT_VALUE_LOCKED_ON_PUK,
};
use crate::icc::status::{AppState, Application, CardStatus};
use crate::types::RadioState;

/// Card lifecycle as seen by the rest of the phone.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardLifecycleState {
    #[default]
    #[display(fmt = "UNKNOWN")]
    Unknown,
    #[display(fmt = "ABSENT")]
    Absent,
    #[display(fmt = "PIN_REQUIRED")]
    PinRequired,
    #[display(fmt = "PUK_REQUIRED")]
    PukRequired,
    #[display(fmt = "NETWORK_LOCKED")]
    NetworkLocked,
    #[display(fmt = "READY")]
    Ready,
    #[display(fmt = "NOT_READY")]
    NotReady,
    #[display(fmt = "PERM_DISABLED")]
    PermanentlyDisabled,
}

impl CardLifecycleState {
    pub fn is_pin_locked(&self) -> bool {
        matches!(self, Self::PinRequired | Self::PukRequired)
    }

    /// States that can only be reached with a physical card inserted.
    pub fn implies_card(&self) -> bool {
        matches!(
            self,
            Self::PinRequired
                | Self::PukRequired
                | Self::NetworkLocked
                | Self::Ready
                | Self::PermanentlyDisabled
        )
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhoneType {
    #[default]
    #[display(fmt = "GSM")]
    Gsm,
    #[display(fmt = "CDMA")]
    Cdma,
}

/// Where a CDMA subscription comes from.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SubscriptionSource {
    #[default]
    #[display(fmt = "RUIM")]
    Ruim,
    /// Non-volatile memory; no card needed.
    #[display(fmt = "NV")]
    Nv,
}

/// Tie-break when the GSM and CDMA applications of an LTE-on-CDMA card
/// disagree and neither side is absent, ready or not ready.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConsolidationPolicy {
    PreferGsm,
    #[default]
    PreferCdma,
}

/// Device configuration the derivation depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardMode {
    pub phone_type: PhoneType,
    pub subscription_source: SubscriptionSource,
    pub lte_on_cdma: bool,
    pub consolidation: ConsolidationPolicy,
}

impl CardMode {
    pub fn gsm() -> Self {
        Self::default()
    }

    pub fn cdma(subscription_source: SubscriptionSource) -> Self {
        Self {
            phone_type: PhoneType::Cdma,
            subscription_source,
            ..Self::default()
        }
    }

    /// CDMA phone whose card carries both a USIM and a CSIM.
    pub fn lte_on_cdma() -> Self {
        Self {
            phone_type: PhoneType::Cdma,
            lte_on_cdma: true,
            ..Self::default()
        }
    }

    pub fn is_3gpp(&self) -> bool {
        self.phone_type == PhoneType::Gsm
    }

    /// The subscription lives on the card (as opposed to NV memory).
    pub fn subscription_from_card(&self) -> bool {
        self.is_3gpp() || self.subscription_source == SubscriptionSource::Ruim
    }

    /// Index of the application holding the subscription.
    pub fn subscription_index(&self, status: &CardStatus) -> i32 {
        if self.is_3gpp() {
            status.gsm_umts_index
        } else {
            status.cdma_index
        }
    }
}

/// Application holding the subscription, if the index points at one.
pub fn subscription_application<'a>(status: &'a CardStatus, mode: &CardMode) -> Option<&'a Application> {
    status.application(mode.subscription_index(status))
}

/// State contributed by the application at `index`.
pub fn derive_app_state(status: &CardStatus, index: i32) -> CardLifecycleState {
    let Some(app) = status.application(index) else {
        if index < 0 {
            debug!("no application at index {}", index);
        } else {
            warn!(
                "application index {} out of range ({} applications)",
                index,
                status.applications.len()
            );
        }
        return CardLifecycleState::Absent;
    };

    if app.pin1.is_perm_blocked() || app.app_state == AppState::PermanentlyDisabled {
        return CardLifecycleState::PermanentlyDisabled;
    }
    match app.app_state {
        AppState::PinRequired => CardLifecycleState::PinRequired,
        AppState::PukRequired => CardLifecycleState::PukRequired,
        AppState::SubscriptionPersoRequired => CardLifecycleState::NetworkLocked,
        AppState::Ready => CardLifecycleState::Ready,
        _ => CardLifecycleState::NotReady,
    }
}

/// Merge the GSM and CDMA application states of an LTE-on-CDMA card.
pub fn consolidate(
    gsm: CardLifecycleState,
    cdma: CardLifecycleState,
    policy: ConsolidationPolicy,
) -> CardLifecycleState {
    use CardLifecycleState::*;
    match (gsm, cdma) {
        (Absent, other) | (other, Absent) => other,
        (Ready, Ready) => Ready,
        (Ready, NotReady) | (NotReady, Ready) => NotReady,
        (NotReady, other) | (other, NotReady) => other,
        _ => match policy {
            ConsolidationPolicy::PreferGsm => gsm,
            ConsolidationPolicy::PreferCdma => cdma,
        },
    }
}

/// Card lifecycle state for a snapshot.
pub fn derive_state(
    status: Option<&CardStatus>,
    radio: RadioState,
    mode: CardMode,
) -> CardLifecycleState {
    if !mode.is_3gpp() && mode.subscription_source == SubscriptionSource::Nv {
        return CardLifecycleState::Ready;
    }
    let Some(status) = status.filter(|s| s.has_card()) else {
        return CardLifecycleState::Absent;
    };
    if !radio.is_on() {
        return CardLifecycleState::NotReady;
    }
    if mode.lte_on_cdma {
        let gsm = derive_app_state(status, status.gsm_umts_index);
        let cdma = derive_app_state(status, status.cdma_index);
        return consolidate(gsm, cdma, mode.consolidation);
    }
    derive_app_state(status, mode.subscription_index(status))
}

/// State of the RUIM/CSIM application alone, tracked for ruim-ready
/// notifications regardless of phone type.
pub fn derive_ruim_state(status: Option<&CardStatus>, radio: RadioState) -> CardLifecycleState {
    let Some(status) = status.filter(|s| s.has_card()) else {
        return CardLifecycleState::Absent;
    };
    if !radio.is_on() {
        return CardLifecycleState::NotReady;
    }
    derive_app_state(status, status.cdma_index)
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockReason {
    #[display(fmt = "PIN")]
    Pin,
    #[display(fmt = "PUK")]
    Puk,
}

/// One externally visible consequence of a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Notification {
    Ready,
    Locked(LockReason),
    Absent,
    NetworkLocked,
    PermanentlyDisabled,
    CardRemoved,
    CardAdded,
    RuimReady,
}

impl Notification {
    /// State and reason strings pushed to the broadcaster, if any.
    pub fn broadcast(&self) -> Option<(&'static str, Option<&'static str>)> {
        match self {
            Self::Ready => Some((INTENT_VALUE_ICC_READY, None)),
            Self::Locked(LockReason::Pin) => {
                Some((INTENT_VALUE_ICC_LOCKED, Some(INTENT_VALUE_LOCKED_ON_PIN)))
            }
            Self::Locked(LockReason::Puk) => {
                Some((INTENT_VALUE_ICC_LOCKED, Some(INTENT_VALUE_LOCKED_ON_PUK)))
            }
            Self::Absent => Some((INTENT_VALUE_ICC_ABSENT, None)),
            Self::NetworkLocked => Some((INTENT_VALUE_ICC_LOCKED, Some(INTENT_VALUE_LOCKED_NETWORK))),
            Self::PermanentlyDisabled => Some((
                INTENT_VALUE_ICC_ABSENT,
                Some(INTENT_VALUE_ABSENT_ON_PERM_DISABLED),
            )),
            Self::CardRemoved | Self::CardAdded | Self::RuimReady => None,
        }
    }
}

/// Everything a transition asks for, in execution order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TransitionPlan {
    pub notifications: Vec<Notification>,
    /// Point the file handler at the subscription application's AID.
    pub select_aid: bool,
    pub load_records: bool,
    pub query_pin_lock: bool,
    pub query_fdn: bool,
}

impl TransitionPlan {
    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
            && !self.select_aid
            && !self.load_records
            && !self.query_pin_lock
            && !self.query_fdn
    }
}

/// Work out the consequences of moving from `old` to `new`.
pub fn plan_transition(
    old: CardLifecycleState,
    new: CardLifecycleState,
    old_ruim: CardLifecycleState,
    new_ruim: CardLifecycleState,
    mode: CardMode,
) -> TransitionPlan {
    use CardLifecycleState as S;
    let entered = |state: S| old != state && new == state;
    let mut plan = TransitionPlan::default();

    let became_ready = entered(S::Ready);
    if became_ready {
        plan.notifications.push(Notification::Ready);
    }

    if entered(S::PinRequired) {
        plan.notifications.push(Notification::Locked(LockReason::Pin));
    } else if entered(S::PukRequired) {
        plan.notifications.push(Notification::Locked(LockReason::Puk));
    } else if entered(S::Absent) {
        plan.notifications.push(Notification::Absent);
    } else if entered(S::NetworkLocked) {
        plan.notifications.push(Notification::NetworkLocked);
    } else if entered(S::PermanentlyDisabled) {
        plan.notifications.push(Notification::PermanentlyDisabled);
    }

    if old.implies_card() && new == S::Absent {
        plan.notifications.push(Notification::CardRemoved);
    } else if old == S::Absent && new.implies_card() {
        plan.notifications.push(Notification::CardAdded);
    }

    if old_ruim != S::Ready && new_ruim == S::Ready {
        plan.notifications.push(Notification::RuimReady);
    }

    let from_card = mode.subscription_from_card();
    if became_ready && from_card {
        plan.select_aid = !mode.lte_on_cdma;
        plan.load_records = true;
        plan.query_pin_lock = true;
        plan.query_fdn = true;
    }
    if new.is_pin_locked() && old != new {
        plan.query_pin_lock = true;
    }
    plan
}
