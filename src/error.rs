// src/error.rs
//! Unified error type for capture and analysis operations.
//!
//! Every fallible operation in the crate returns [`Result`]. Device-registry
//! misuse and missing analysis preconditions fail fast and are never retried.

use crate::hal::types::{Arm, DeviceId};

/// Crate-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A non-connect event arrived for a device that was never registered.
    ///
    /// The hardware collaborator guarantees connect-first delivery, so this
    /// is a programming-contract violation rather than a recoverable state.
    #[error("device {0} has no registered state; connect must be delivered first")]
    UnknownDevice(DeviceId),

    /// Window resolution was asked of a table with no rows.
    #[error("session table has no rows")]
    EmptyTable,

    /// Arm correction found no row carrying the given reference label.
    #[error("no row reports arm '{0}'; cannot derive the device-to-arm mapping")]
    MissingArmReference(Arm),

    /// A hand selector outside left/right/both reached a query or plot
    /// operation.
    #[error("unknown hand selector '{0}'; use left, right, or both")]
    UnknownHand(String),

    /// A persisted record line could not be parsed.
    #[error("malformed record at line {line}: {reason}")]
    Parse {
        /// 1-based line number in the input stream, header included.
        line: usize,
        /// Human-readable description of the field that failed.
        reason: String,
    },

    /// A hardware timestamp could not be mapped onto the wall clock.
    #[error("unrepresentable device timestamp: {0} us since epoch")]
    Timestamp(u64),

    /// An out-of-range hour/minute/second was given to window resolution.
    #[error("invalid time of day {hour:02}:{minute:02}:{second:02}")]
    InvalidTimeOfDay {
        /// Requested hour.
        hour: u32,
        /// Requested minute.
        minute: u32,
        /// Requested second.
        second: u32,
    },

    /// Capture configuration failed to load or validate.
    #[error("configuration error: {0}")]
    Config(String),

    /// Underlying stream or file I/O failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
