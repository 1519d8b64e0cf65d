//! Hex rendering for frame diagnostics.
//!
//! Frames can be up to 8 KiB; dumps are truncated so a single trace line
//! stays readable.

use std::fmt::Write;

/// Bytes shown before a dump is cut short.
pub const DUMP_LIMIT: usize = 64;

/// Lowercase hex with a space between bytes.
///
/// Example: `&[0xde, 0xad]` -> `"de ad"`
pub fn bytes_to_hex_spaced(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 3);
    for (i, b) in bytes.iter().enumerate() {
        if i != 0 {
            s.push(' ');
        }
        // write! never fails writing to a String
        let _ = write!(&mut s, "{:02x}", b);
    }
    s
}

/// Spaced hex of at most `DUMP_LIMIT` bytes, with a suffix noting how many
/// bytes were left out.
pub fn dump_frame(bytes: &[u8]) -> String {
    if bytes.len() <= DUMP_LIMIT {
        return bytes_to_hex_spaced(bytes);
    }
    let mut s = bytes_to_hex_spaced(&bytes[..DUMP_LIMIT]);
    let _ = write!(&mut s, " .. (+{} bytes)", bytes.len() - DUMP_LIMIT);
    s
}

/// Trace-level dump of a frame body, compiled in with `diagnostics` only.
#[cfg(feature = "diagnostics")]
pub fn trace_frame(direction: &str, bytes: &[u8]) {
    log::trace!("{} [{}] {}", direction, bytes.len(), dump_frame(bytes));
}

#[cfg(not(feature = "diagnostics"))]
#[inline(always)]
pub fn trace_frame(_direction: &str, _bytes: &[u8]) {}
