// libril/src/protocol/commands/mod.rs

pub mod radio;
pub mod sim;

pub use sim::IccIoRequest;

use crate::protocol::parcel::ParcelWriter;
use crate::types::RequestKind;

/// High-level Command enum. New requests should be added here and their
/// field encoder placed in `protocol::commands::<area>.rs`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    GetSimStatus,
    EnterSimPin {
        pin: String,
        aid: Option<String>,
    },
    EnterSimPuk {
        puk: String,
        new_pin: String,
        aid: Option<String>,
    },
    EnterSimPin2 {
        pin2: String,
        aid: Option<String>,
    },
    EnterSimPuk2 {
        puk2: String,
        new_pin2: String,
        aid: Option<String>,
    },
    ChangeSimPin {
        old_pin: String,
        new_pin: String,
        aid: Option<String>,
    },
    ChangeSimPin2 {
        old_pin2: String,
        new_pin2: String,
        aid: Option<String>,
    },
    EnterNetworkDepersonalization {
        code: String,
    },
    GetImsi {
        aid: Option<String>,
    },
    SignalStrength,
    VoiceRegistrationState,
    DataRegistrationState,
    Operator,
    RadioPower {
        on: bool,
    },
    SimIo(IccIoRequest),
    GetImei,
    GetImeisv,
    QueryFacilityLock {
        facility: String,
        password: String,
        service_class: i32,
        aid: Option<String>,
    },
    SetFacilityLock {
        facility: String,
        enable: bool,
        password: String,
        service_class: i32,
        aid: Option<String>,
    },
    SetNetworkSelectionManual {
        operator_numeric: String,
    },
    BasebandVersion,
    OemHookRaw(Vec<u8>),
    OemHookStrings(Vec<String>),
    ScreenState {
        on: bool,
    },
    ReportStkServiceIsRunning,
    /// Escape hatch: a request number plus pre-encoded fields.
    Raw {
        kind: RequestKind,
        fields: Vec<u8>,
    },
}

impl Command {
    pub fn kind(&self) -> RequestKind {
        match self {
            Self::GetSimStatus => RequestKind::GetSimStatus,
            Self::EnterSimPin { .. } => RequestKind::EnterSimPin,
            Self::EnterSimPuk { .. } => RequestKind::EnterSimPuk,
            Self::EnterSimPin2 { .. } => RequestKind::EnterSimPin2,
            Self::EnterSimPuk2 { .. } => RequestKind::EnterSimPuk2,
            Self::ChangeSimPin { .. } => RequestKind::ChangeSimPin,
            Self::ChangeSimPin2 { .. } => RequestKind::ChangeSimPin2,
            Self::EnterNetworkDepersonalization { .. } => {
                RequestKind::EnterNetworkDepersonalization
            }
            Self::GetImsi { .. } => RequestKind::GetImsi,
            Self::SignalStrength => RequestKind::SignalStrength,
            Self::VoiceRegistrationState => RequestKind::VoiceRegistrationState,
            Self::DataRegistrationState => RequestKind::DataRegistrationState,
            Self::Operator => RequestKind::Operator,
            Self::RadioPower { .. } => RequestKind::RadioPower,
            Self::SimIo(_) => RequestKind::SimIo,
            Self::GetImei => RequestKind::GetImei,
            Self::GetImeisv => RequestKind::GetImeisv,
            Self::QueryFacilityLock { .. } => RequestKind::QueryFacilityLock,
            Self::SetFacilityLock { .. } => RequestKind::SetFacilityLock,
            Self::SetNetworkSelectionManual { .. } => RequestKind::SetNetworkSelectionManual,
            Self::BasebandVersion => RequestKind::BasebandVersion,
            Self::OemHookRaw(_) => RequestKind::OemHookRaw,
            Self::OemHookStrings(_) => RequestKind::OemHookStrings,
            Self::ScreenState { .. } => RequestKind::ScreenState,
            Self::ReportStkServiceIsRunning => RequestKind::ReportStkServiceIsRunning,
            Self::Raw { kind, .. } => *kind,
        }
    }

    /// Append this command's fields (everything after kind and serial).
    pub fn encode_fields(&self, w: &mut ParcelWriter) {
        match self {
            Self::GetSimStatus
            | Self::SignalStrength
            | Self::VoiceRegistrationState
            | Self::DataRegistrationState
            | Self::Operator
            | Self::GetImei
            | Self::GetImeisv
            | Self::BasebandVersion
            | Self::ReportStkServiceIsRunning => {}
            Self::EnterSimPin { pin, aid } => sim::encode_secret_entry(w, &[pin.as_str()], aid.as_deref()),
            Self::EnterSimPuk { puk, new_pin, aid } => {
                sim::encode_secret_entry(w, &[puk.as_str(), new_pin.as_str()], aid.as_deref())
            }
            Self::EnterSimPin2 { pin2, aid } => {
                sim::encode_secret_entry(w, &[pin2.as_str()], aid.as_deref())
            }
            Self::EnterSimPuk2 {
                puk2,
                new_pin2,
                aid,
            } => sim::encode_secret_entry(w, &[puk2.as_str(), new_pin2.as_str()], aid.as_deref()),
            Self::ChangeSimPin {
                old_pin,
                new_pin,
                aid,
            } => sim::encode_secret_entry(w, &[old_pin.as_str(), new_pin.as_str()], aid.as_deref()),
            Self::ChangeSimPin2 {
                old_pin2,
                new_pin2,
                aid,
            } => sim::encode_secret_entry(w, &[old_pin2.as_str(), new_pin2.as_str()], aid.as_deref()),
            Self::EnterNetworkDepersonalization { code } => {
                sim::encode_network_depersonalization(w, code)
            }
            Self::GetImsi { aid } => radio::encode_imsi_request(w, aid.as_deref()),
            Self::RadioPower { on } | Self::ScreenState { on } => radio::encode_flag(w, *on),
            Self::SimIo(req) => sim::encode_icc_io(w, req),
            Self::QueryFacilityLock {
                facility,
                password,
                service_class,
                aid,
            } => sim::encode_query_facility_lock(
                w,
                facility,
                password,
                *service_class,
                aid.as_deref(),
            ),
            Self::SetFacilityLock {
                facility,
                enable,
                password,
                service_class,
                aid,
            } => sim::encode_set_facility_lock(
                w,
                facility,
                *enable,
                password,
                *service_class,
                aid.as_deref(),
            ),
            Self::SetNetworkSelectionManual { operator_numeric } => {
                radio::encode_network_selection_manual(w, operator_numeric)
            }
            Self::OemHookRaw(data) => {
                w.write_byte_array(data);
            }
            Self::OemHookStrings(strings) => {
                w.write_string_array(strings.as_slice());
            }
            Self::Raw { fields, .. } => {
                w.write_raw(fields);
            }
        }
    }

    /// Fields as a standalone buffer.
    pub fn encode(&self) -> Vec<u8> {
        let mut w = ParcelWriter::new();
        self.encode_fields(&mut w);
        w.into_bytes()
    }

    /// True for requests whose fields carry PINs or passwords; their
    /// bodies are never dumped to the log.
    pub fn carries_secret(&self) -> bool {
        matches!(
            self,
            Self::EnterSimPin { .. }
                | Self::EnterSimPuk { .. }
                | Self::EnterSimPin2 { .. }
                | Self::EnterSimPuk2 { .. }
                | Self::ChangeSimPin { .. }
                | Self::ChangeSimPin2 { .. }
                | Self::EnterNetworkDepersonalization { .. }
                | Self::SetFacilityLock { .. }
        )
    }
}
