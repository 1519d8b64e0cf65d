//! Qualcomm-specific configuration

/// Radio state codes this firmware reports for "on" beyond the base range
pub const EXTRA_RADIO_ON_STATES: &[i32] = &[11, 13];

/// Vendor unsolicited tags that carry no payload
pub const VOID_UNSOL_TAGS: std::ops::RangeInclusive<i32> = 1035..=1038;
