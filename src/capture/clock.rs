// src/capture/clock.rs
//! Compound timestamp derivation from the device hardware clock.

use crate::error::{Error, Result};
use chrono::DateTime;

/// Modulus applied to the raw microsecond clock to form the sub-second
/// component of a compound timestamp.
///
/// Note this is 10^7, not 10^6: the remainder is NOT a true
/// microsecond-of-second value. The capture format has always been written
/// this way and downstream tooling orders on the raw remainder, so it is
/// carried as-is.
pub const SUBSEC_MODULUS: u64 = 10_000_000;

/// Derive the compound timestamp string for a hardware timestamp given in
/// microseconds since the Unix epoch.
///
/// Format: whole-second UTC as `YYYY-MM-DD HH:MM:SS`, a space, then the raw
/// clock value modulo [`SUBSEC_MODULUS`].
pub fn compound_timestamp(timestamp_us: u64) -> Result<String> {
    let secs = (timestamp_us / 1_000_000) as i64;
    let wall = DateTime::from_timestamp(secs, 0).ok_or(Error::Timestamp(timestamp_us))?;
    let remainder = timestamp_us % SUBSEC_MODULUS;
    Ok(format!("{} {}", wall.format("%Y-%m-%d %H:%M:%S"), remainder))
}
