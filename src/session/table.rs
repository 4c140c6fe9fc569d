// src/session/table.rs
//! Typed tabular form of a persisted capture.

use crate::hal::types::{Arm, DeviceId, EmgFrame, Pose, Quaternion, Vector3, WarmupState};
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;
use std::str::FromStr;

/// Parsed compound timestamp of one record.
///
/// The wall component has second resolution; `remainder` is the raw device
/// clock modulo 10^7 as written by the capture path. It is kept as an opaque
/// ordered component rather than converted to a duration, because it is not
/// a true microsecond-of-second value. Ordering is lexicographic on
/// (wall, remainder), which matches the order records were emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RecordTimestamp {
    /// Whole-second wall-clock time.
    pub wall: NaiveDateTime,
    /// Sub-second-like remainder, `< 10_000_000`.
    pub remainder: u32,
}

impl RecordTimestamp {
    /// Timestamp at an exact wall-clock second.
    pub fn at_second(wall: NaiveDateTime) -> Self {
        Self { wall, remainder: 0 }
    }

    /// Calendar date of the wall component.
    pub fn date(&self) -> NaiveDate {
        self.wall.date()
    }
}

impl fmt::Display for RecordTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.wall.format("%Y-%m-%d %H:%M:%S"), self.remainder)
    }
}

impl FromStr for RecordTimestamp {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wall_part, remainder_part) = s
            .rsplit_once(' ')
            .ok_or_else(|| format!("timestamp '{}' has no sub-second component", s))?;
        let wall = NaiveDateTime::parse_from_str(wall_part.trim(), "%Y-%m-%d %H:%M:%S")
            .map_err(|e| format!("bad wall clock in '{}': {}", s, e))?;
        let remainder: u32 = remainder_part
            .trim()
            .parse()
            .map_err(|_| format!("bad sub-second component in '{}'", s))?;
        Ok(Self { wall, remainder })
    }
}

/// One flattened device-state row as persisted by the record codec.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    /// Originating device.
    pub device_id: DeviceId,
    /// Warm-up flag at emission time.
    pub warm: WarmupState,
    /// Sync flag at emission time.
    pub sync: Option<bool>,
    /// Arm label; possibly wrong per-row until arm correction runs.
    pub arm: Arm,
    /// Parsed compound timestamp.
    pub timestamp: RecordTimestamp,
    /// Orientation quaternion.
    pub orientation: Quaternion,
    /// Accelerometer axes.
    pub acceleration: Vector3,
    /// Gyroscope axes.
    pub gyroscope: Vector3,
    /// Pose label.
    pub pose: Pose,
    /// EMG channel values.
    pub emg: EmgFrame,
    /// Lock flag.
    pub locked: bool,
    /// Signal strength.
    pub rssi: i32,
    /// Derived roll, radians.
    pub roll: f64,
    /// Derived pitch, radians.
    pub pitch: f64,
    /// Derived yaw, radians.
    pub yaw: f64,
}

/// Ordered sequence of session records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionTable {
    /// Rows in emission order.
    pub rows: Vec<SessionRecord>,
}

impl SessionTable {
    /// Table over the given rows.
    pub fn new(rows: Vec<SessionRecord>) -> Self {
        Self { rows }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First row, if any.
    pub fn first(&self) -> Option<&SessionRecord> {
        self.rows.first()
    }

    /// Iterator over rows in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SessionRecord> {
        self.rows.iter()
    }
}
