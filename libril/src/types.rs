// libril/src/types.rs

use derive_more::Display;

/// Field layout a request kind (or event) is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseShape {
    Void,
    Ints,
    String,
    Strings,
    Raw,
    CardStatus,
    RadioState,
    IccIo,
}

/// Outbound request kinds, numbered the way the modem daemon numbers them.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RequestKind {
    #[display(fmt = "GET_SIM_STATUS")]
    GetSimStatus,
    #[display(fmt = "ENTER_SIM_PIN")]
    EnterSimPin,
    #[display(fmt = "ENTER_SIM_PUK")]
    EnterSimPuk,
    #[display(fmt = "ENTER_SIM_PIN2")]
    EnterSimPin2,
    #[display(fmt = "ENTER_SIM_PUK2")]
    EnterSimPuk2,
    #[display(fmt = "CHANGE_SIM_PIN")]
    ChangeSimPin,
    #[display(fmt = "CHANGE_SIM_PIN2")]
    ChangeSimPin2,
    #[display(fmt = "ENTER_NETWORK_DEPERSONALIZATION")]
    EnterNetworkDepersonalization,
    #[display(fmt = "GET_IMSI")]
    GetImsi,
    #[display(fmt = "SIGNAL_STRENGTH")]
    SignalStrength,
    #[display(fmt = "VOICE_REGISTRATION_STATE")]
    VoiceRegistrationState,
    #[display(fmt = "DATA_REGISTRATION_STATE")]
    DataRegistrationState,
    #[display(fmt = "OPERATOR")]
    Operator,
    #[display(fmt = "RADIO_POWER")]
    RadioPower,
    #[display(fmt = "SIM_IO")]
    SimIo,
    #[display(fmt = "GET_IMEI")]
    GetImei,
    #[display(fmt = "GET_IMEISV")]
    GetImeisv,
    #[display(fmt = "QUERY_FACILITY_LOCK")]
    QueryFacilityLock,
    #[display(fmt = "SET_FACILITY_LOCK")]
    SetFacilityLock,
    #[display(fmt = "SET_NETWORK_SELECTION_MANUAL")]
    SetNetworkSelectionManual,
    #[display(fmt = "BASEBAND_VERSION")]
    BasebandVersion,
    #[display(fmt = "OEM_HOOK_RAW")]
    OemHookRaw,
    #[display(fmt = "OEM_HOOK_STRINGS")]
    OemHookStrings,
    #[display(fmt = "SCREEN_STATE")]
    ScreenState,
    #[display(fmt = "REPORT_STK_SERVICE_IS_RUNNING")]
    ReportStkServiceIsRunning,
    /// A request number this crate has no base decoder for.
    #[display(fmt = "<unknown request {}>", _0)]
    Other(i32),
}

impl RequestKind {
    pub fn code(&self) -> i32 {
        match self {
            Self::GetSimStatus => 1,
            Self::EnterSimPin => 2,
            Self::EnterSimPuk => 3,
            Self::EnterSimPin2 => 4,
            Self::EnterSimPuk2 => 5,
            Self::ChangeSimPin => 6,
            Self::ChangeSimPin2 => 7,
            Self::EnterNetworkDepersonalization => 8,
            Self::GetImsi => 11,
            Self::SignalStrength => 19,
            Self::VoiceRegistrationState => 20,
            Self::DataRegistrationState => 21,
            Self::Operator => 22,
            Self::RadioPower => 23,
            Self::SimIo => 28,
            Self::GetImei => 38,
            Self::GetImeisv => 39,
            Self::QueryFacilityLock => 42,
            Self::SetFacilityLock => 43,
            Self::SetNetworkSelectionManual => 47,
            Self::BasebandVersion => 51,
            Self::OemHookRaw => 59,
            Self::OemHookStrings => 60,
            Self::ScreenState => 61,
            Self::ReportStkServiceIsRunning => 103,
            Self::Other(code) => *code,
        }
    }

    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::GetSimStatus,
            2 => Self::EnterSimPin,
            3 => Self::EnterSimPuk,
            4 => Self::EnterSimPin2,
            5 => Self::EnterSimPuk2,
            6 => Self::ChangeSimPin,
            7 => Self::ChangeSimPin2,
            8 => Self::EnterNetworkDepersonalization,
            11 => Self::GetImsi,
            19 => Self::SignalStrength,
            20 => Self::VoiceRegistrationState,
            21 => Self::DataRegistrationState,
            22 => Self::Operator,
            23 => Self::RadioPower,
            28 => Self::SimIo,
            38 => Self::GetImei,
            39 => Self::GetImeisv,
            42 => Self::QueryFacilityLock,
            43 => Self::SetFacilityLock,
            47 => Self::SetNetworkSelectionManual,
            51 => Self::BasebandVersion,
            59 => Self::OemHookRaw,
            60 => Self::OemHookStrings,
            61 => Self::ScreenState,
            103 => Self::ReportStkServiceIsRunning,
            other => Self::Other(other),
        }
    }

    /// Declared response layout. `None` means only an adapter can decode it.
    pub fn response_shape(&self) -> Option<ResponseShape> {
        use ResponseShape as S;
        let shape = match self {
            Self::GetSimStatus => S::CardStatus,
            // PIN entry answers with the remaining attempt count
            Self::EnterSimPin
            | Self::EnterSimPuk
            | Self::EnterSimPin2
            | Self::EnterSimPuk2
            | Self::ChangeSimPin
            | Self::ChangeSimPin2
            | Self::EnterNetworkDepersonalization => S::Ints,
            Self::GetImsi | Self::GetImei | Self::GetImeisv | Self::BasebandVersion => S::String,
            Self::SignalStrength | Self::QueryFacilityLock | Self::SetFacilityLock => S::Ints,
            Self::VoiceRegistrationState
            | Self::DataRegistrationState
            | Self::Operator
            | Self::OemHookStrings => S::Strings,
            Self::SimIo => S::IccIo,
            Self::OemHookRaw => S::Raw,
            Self::RadioPower
            | Self::SetNetworkSelectionManual
            | Self::ScreenState
            | Self::ReportStkServiceIsRunning => S::Void,
            Self::Other(_) => return None,
        };
        Some(shape)
    }
}

/// Unsolicited event kinds.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    #[display(fmt = "UNSOL_RESPONSE_RADIO_STATE_CHANGED")]
    RadioStateChanged,
    #[display(fmt = "UNSOL_RESPONSE_CALL_STATE_CHANGED")]
    CallStateChanged,
    #[display(fmt = "UNSOL_RESPONSE_VOICE_NETWORK_STATE_CHANGED")]
    VoiceNetworkStateChanged,
    #[display(fmt = "UNSOL_RESPONSE_NEW_SMS")]
    NewSms,
    #[display(fmt = "UNSOL_NITZ_TIME_RECEIVED")]
    Nitz,
    #[display(fmt = "UNSOL_SIGNAL_STRENGTH")]
    SignalStrength,
    #[display(fmt = "UNSOL_SIM_REFRESH")]
    SimRefresh,
    #[display(fmt = "UNSOL_RESPONSE_SIM_STATUS_CHANGED")]
    SimStatusChanged,
    #[display(fmt = "UNSOL_OEM_HOOK_RAW")]
    OemHookRaw,
    #[display(fmt = "UNSOL_RIL_CONNECTED")]
    RilConnected,
    /// A tag outside the base table; only adapters give it a payload.
    #[display(fmt = "UNSOL_VENDOR({})", _0)]
    Vendor(i32),
}

impl EventKind {
    pub fn code(&self) -> i32 {
        match self {
            Self::RadioStateChanged => 1000,
            Self::CallStateChanged => 1001,
            Self::VoiceNetworkStateChanged => 1002,
            Self::NewSms => 1003,
            Self::Nitz => 1008,
            Self::SignalStrength => 1009,
            Self::SimRefresh => 1017,
            Self::SimStatusChanged => 1019,
            Self::OemHookRaw => 1028,
            Self::RilConnected => 1034,
            Self::Vendor(tag) => *tag,
        }
    }

    pub fn from_code(tag: i32) -> Self {
        match tag {
            1000 => Self::RadioStateChanged,
            1001 => Self::CallStateChanged,
            1002 => Self::VoiceNetworkStateChanged,
            1003 => Self::NewSms,
            1008 => Self::Nitz,
            1009 => Self::SignalStrength,
            1017 => Self::SimRefresh,
            1019 => Self::SimStatusChanged,
            1028 => Self::OemHookRaw,
            1034 => Self::RilConnected,
            other => Self::Vendor(other),
        }
    }

    pub fn payload_shape(&self) -> Option<ResponseShape> {
        use ResponseShape as S;
        let shape = match self {
            Self::RadioStateChanged => S::RadioState,
            Self::CallStateChanged | Self::VoiceNetworkStateChanged | Self::SimStatusChanged => {
                S::Void
            }
            Self::NewSms | Self::Nitz => S::String,
            Self::SignalStrength | Self::SimRefresh | Self::RilConnected => S::Ints,
            Self::OemHookRaw => S::Raw,
            Self::Vendor(_) => return None,
        };
        Some(shape)
    }
}

/// Radio power state as reported by the modem.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RadioState {
    #[display(fmt = "RADIO_OFF")]
    Off,
    #[display(fmt = "RADIO_UNAVAILABLE")]
    Unavailable,
    #[display(fmt = "RADIO_ON")]
    On,
}

impl RadioState {
    /// 2..=10 are the legacy SIM/RUIM/NV "ready" sub-states plus RADIO_ON.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Off),
            1 => Some(Self::Unavailable),
            2..=10 => Some(Self::On),
            _ => None,
        }
    }

    pub fn is_on(&self) -> bool {
        matches!(self, Self::On)
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }
}

impl Default for RadioState {
    fn default() -> Self {
        RadioState::Unavailable
    }
}

/// Error codes carried in solicited responses.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CommandError {
    #[display(fmt = "SUCCESS")]
    Success,
    #[display(fmt = "RADIO_NOT_AVAILABLE")]
    RadioNotAvailable,
    #[display(fmt = "GENERIC_FAILURE")]
    GenericFailure,
    #[display(fmt = "PASSWORD_INCORRECT")]
    PasswordIncorrect,
    #[display(fmt = "SIM_PIN2")]
    SimPin2,
    #[display(fmt = "SIM_PUK2")]
    SimPuk2,
    #[display(fmt = "REQUEST_NOT_SUPPORTED")]
    RequestNotSupported,
    #[display(fmt = "CANCELLED")]
    Cancelled,
    #[display(fmt = "ERROR({})", _0)]
    Other(i32),
}

impl CommandError {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::RadioNotAvailable,
            2 => Self::GenericFailure,
            3 => Self::PasswordIncorrect,
            4 => Self::SimPin2,
            5 => Self::SimPuk2,
            6 => Self::RequestNotSupported,
            7 => Self::Cancelled,
            other => Self::Other(other),
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::RadioNotAvailable => 1,
            Self::GenericFailure => 2,
            Self::PasswordIncorrect => 3,
            Self::SimPin2 => 4,
            Self::SimPuk2 => 5,
            Self::RequestNotSupported => 6,
            Self::Cancelled => 7,
            Self::Other(code) => *code,
        }
    }
}

/// Baseband vendor; selects the decoding adapter.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Vendor {
    #[display(fmt = "generic")]
    Generic,
    #[display(fmt = "qualcomm")]
    Qualcomm,
    #[display(fmt = "samsung")]
    Samsung,
    #[display(fmt = "sony")]
    Sony,
}

impl Vendor {
    /// Map a daemon class name (as found in device properties) to a vendor.
    pub fn from_ril_class(name: &str) -> Self {
        match name.trim() {
            "QualcommSharedRIL" | "QualcommMSIM" | "QualcommSharedRILMSIM" => Self::Qualcomm,
            "SamsungRIL" | "SamsungExynos4RIL" | "SamsungQualcommRIL" => Self::Samsung,
            "SonyQualcommRIL" | "SonyRIL" => Self::Sony,
            _ => Self::Generic,
        }
    }
}

impl Default for Vendor {
    fn default() -> Self {
        Vendor::Generic
    }
}
