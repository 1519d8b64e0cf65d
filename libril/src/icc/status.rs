// libril/src/icc/status.rs

//! Card status snapshot as reported by GET_SIM_STATUS.

use derive_more::Display;

use crate::constants::CARD_MAX_APPS;

/// Physical card presence.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CardState {
    #[display(fmt = "ABSENT")]
    Absent,
    #[display(fmt = "PRESENT")]
    Present,
    #[display(fmt = "ERROR")]
    Error,
}

impl CardState {
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Absent),
            1 => Some(Self::Present),
            2 => Some(Self::Error),
            _ => None,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Absent => 0,
            Self::Present => 1,
            Self::Error => 2,
        }
    }

    pub fn is_card_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}

/// PIN verification state.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PinState {
    #[default]
    #[display(fmt = "UNKNOWN")]
    Unknown,
    #[display(fmt = "ENABLED_NOT_VERIFIED")]
    EnabledNotVerified,
    #[display(fmt = "ENABLED_VERIFIED")]
    EnabledVerified,
    #[display(fmt = "DISABLED")]
    Disabled,
    #[display(fmt = "ENABLED_BLOCKED")]
    EnabledBlocked,
    #[display(fmt = "ENABLED_PERM_BLOCKED")]
    EnabledPermBlocked,
}

impl PinState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::EnabledNotVerified,
            2 => Self::EnabledVerified,
            3 => Self::Disabled,
            4 => Self::EnabledBlocked,
            5 => Self::EnabledPermBlocked,
            other => {
                log::warn!("unknown pin state {}, treating as UNKNOWN", other);
                Self::Unknown
            }
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::EnabledNotVerified => 1,
            Self::EnabledVerified => 2,
            Self::Disabled => 3,
            Self::EnabledBlocked => 4,
            Self::EnabledPermBlocked => 5,
        }
    }

    pub fn is_perm_blocked(&self) -> bool {
        matches!(self, Self::EnabledPermBlocked)
    }
}

/// Application family on the card.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppType {
    #[default]
    #[display(fmt = "UNKNOWN")]
    Unknown,
    #[display(fmt = "SIM")]
    Sim,
    #[display(fmt = "USIM")]
    Usim,
    #[display(fmt = "RUIM")]
    Ruim,
    #[display(fmt = "CSIM")]
    Csim,
    #[display(fmt = "ISIM")]
    Isim,
}

impl AppType {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Sim,
            2 => Self::Usim,
            3 => Self::Ruim,
            4 => Self::Csim,
            5 => Self::Isim,
            other => {
                log::warn!("unknown application type {}, treating as UNKNOWN", other);
                Self::Unknown
            }
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown => 0,
            Self::Sim => 1,
            Self::Usim => 2,
            Self::Ruim => 3,
            Self::Csim => 4,
            Self::Isim => 5,
        }
    }

    /// RUIM and CSIM carry the CDMA subscription.
    pub fn is_3gpp2(&self) -> bool {
        matches!(self, Self::Ruim | Self::Csim)
    }
}

/// Application state. The last two are never sent by the modem; they are
/// kept so a snapshot can express what derivation would otherwise infer.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppState {
    #[default]
    #[display(fmt = "UNKNOWN")]
    Unknown,
    #[display(fmt = "DETECTED")]
    Detected,
    #[display(fmt = "PIN")]
    PinRequired,
    #[display(fmt = "PUK")]
    PukRequired,
    #[display(fmt = "SUBSCRIPTION_PERSO")]
    SubscriptionPersoRequired,
    #[display(fmt = "READY")]
    Ready,
    #[display(fmt = "NOT_READY")]
    NotReady,
    #[display(fmt = "PERM_DISABLED")]
    PermanentlyDisabled,
}

impl AppState {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Unknown,
            1 => Self::Detected,
            2 => Self::PinRequired,
            3 => Self::PukRequired,
            4 => Self::SubscriptionPersoRequired,
            5 => Self::Ready,
            other => {
                log::warn!("unknown application state {}, treating as UNKNOWN", other);
                Self::Unknown
            }
        }
    }

    /// Wire code; the two derived-only states encode as UNKNOWN.
    pub fn code(&self) -> i32 {
        match self {
            Self::Unknown | Self::NotReady | Self::PermanentlyDisabled => 0,
            Self::Detected => 1,
            Self::PinRequired => 2,
            Self::PukRequired => 3,
            Self::SubscriptionPersoRequired => 4,
            Self::Ready => 5,
        }
    }
}

/// Personalization sub-state, passed through opaquely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PersoSubstate(i32);

impl PersoSubstate {
    pub const UNKNOWN: Self = Self(0);
    pub const IN_PROGRESS: Self = Self(1);
    pub const READY: Self = Self(2);

    pub const fn new(code: i32) -> Self {
        Self(code)
    }

    pub fn code(&self) -> i32 {
        self.0
    }
}

/// Remaining PIN/PUK attempts, when the modem reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetryCounts {
    pub pin1: i32,
    pub puk1: i32,
    pub pin2: i32,
    pub puk2: i32,
}

/// One application record of a card status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Application {
    pub app_type: AppType,
    pub app_state: AppState,
    pub perso_substate: PersoSubstate,
    pub aid: String,
    pub label: String,
    pub pin1_replaced: bool,
    pub pin1: PinState,
    pub pin2: PinState,
    pub retries: Option<RetryCounts>,
}

impl Application {
    pub fn new(app_type: AppType, app_state: AppState) -> Self {
        Self {
            app_type,
            app_state,
            ..Default::default()
        }
    }

    pub fn with_aid(mut self, aid: impl Into<String>) -> Self {
        self.aid = aid.into();
        self
    }

    pub fn with_pin1(mut self, pin1: PinState) -> Self {
        self.pin1 = pin1;
        self
    }
}

/// Immutable card snapshot. Replaced wholesale by the next one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardStatus {
    pub card_state: CardState,
    pub universal_pin_state: PinState,
    pub gsm_umts_index: i32,
    pub cdma_index: i32,
    pub ims_index: i32,
    pub applications: Vec<Application>,
}

impl CardStatus {
    /// Snapshot of an empty slot.
    pub fn absent() -> Self {
        Self {
            card_state: CardState::Absent,
            universal_pin_state: PinState::Unknown,
            gsm_umts_index: -1,
            cdma_index: -1,
            ims_index: -1,
            applications: Vec::new(),
        }
    }

    /// Present card with the given applications. Extra applications past
    /// `CARD_MAX_APPS` are dropped.
    pub fn present(mut applications: Vec<Application>, gsm_umts_index: i32, cdma_index: i32) -> Self {
        applications.truncate(CARD_MAX_APPS);
        Self {
            card_state: CardState::Present,
            universal_pin_state: PinState::Unknown,
            gsm_umts_index,
            cdma_index,
            ims_index: -1,
            applications,
        }
    }

    pub fn has_card(&self) -> bool {
        self.card_state.is_card_present()
    }

    /// Application at a subscription index. Negative, out-of-bounds or
    /// past-the-list indices yield `None`.
    pub fn application(&self, index: i32) -> Option<&Application> {
        if index < 0 || index as usize >= CARD_MAX_APPS {
            return None;
        }
        self.applications.get(index as usize)
    }

    pub fn has_application_type(&self, app_type: AppType) -> bool {
        self.applications.iter().any(|a| a.app_type == app_type)
    }
}
