// libril/src/constants.rs
//! Common protocol constants used across the crate

/// Upper bound for a single frame body. Matches the daemon's command buffer.
pub const MAX_FRAME_LEN: usize = 8 * 1024;

/// Size of the big-endian length prefix in front of every record
pub const FRAME_HEADER_LEN: usize = 4;

/// Leading response type of an inbound parcel
pub const RESPONSE_SOLICITED: i32 = 0;
pub const RESPONSE_UNSOLICITED: i32 = 1;

/// Applications beyond this count in a card status are dropped
pub const CARD_MAX_APPS: usize = 8;

/// Sentinel for a null string / array length on the wire
pub const NULL_LENGTH: i32 = -1;

/// Property key the SIM state name is written to
pub const PROPERTY_SIM_STATE: &str = "gsm.sim.state";

/// Broadcast state strings
pub const INTENT_VALUE_ICC_NOT_READY: &str = "NOT_READY";
pub const INTENT_VALUE_ICC_ABSENT: &str = "ABSENT";
pub const INTENT_VALUE_ICC_LOCKED: &str = "LOCKED";
pub const INTENT_VALUE_ICC_READY: &str = "READY";

/// Broadcast lock / absence reasons
pub const INTENT_VALUE_LOCKED_ON_PIN: &str = "PIN";
pub const INTENT_VALUE_LOCKED_ON_PUK: &str = "PUK";
pub const INTENT_VALUE_LOCKED_NETWORK: &str = "NETWORK";
pub const INTENT_VALUE_ABSENT_ON_PERM_DISABLED: &str = "PERM_DISABLED";

/// Facility codes for QUERY/SET_FACILITY_LOCK
pub const CB_FACILITY_BA_SIM: &str = "SC";
pub const CB_FACILITY_BA_FD: &str = "FD";

/// Service class bitmasks
pub const SERVICE_CLASS_VOICE: i32 = 1 << 0;
pub const SERVICE_CLASS_DATA: i32 = 1 << 1;
pub const SERVICE_CLASS_FAX: i32 = 1 << 2;
pub const SERVICE_CLASS_SMS: i32 = 1 << 3;

/// Class used for facility queries and the SIM PIN lock
pub const SERVICE_CLASS_LOCK: i32 = SERVICE_CLASS_VOICE | SERVICE_CLASS_DATA | SERVICE_CLASS_FAX;

/// Class used when toggling FDN
pub const SERVICE_CLASS_FDN: i32 =
    SERVICE_CLASS_VOICE | SERVICE_CLASS_DATA | SERVICE_CLASS_FAX | SERVICE_CLASS_SMS;

/// Name given to the inbound reader thread
pub const READER_THREAD_NAME: &str = "ril-reader";
