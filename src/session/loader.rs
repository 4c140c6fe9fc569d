// src/session/loader.rs
//! Parses persisted captures back into typed tables and repairs the arm
//! column.

use crate::error::{Error, Result};
use crate::hal::types::{
    Arm, DeviceId, EmgFrame, Pose, Quaternion, Vector3, WarmupState, EMG_CHANNEL_COUNT,
};
use crate::session::table::{RecordTimestamp, SessionRecord, SessionTable};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::str::FromStr;

/// Expected number of comma-separated fields per record line.
const FIELD_COUNT: usize = 29;

/// Load a persisted capture file into a typed table and apply arm
/// correction.
pub fn load<P: AsRef<Path>>(path: P) -> Result<SessionTable> {
    let file = File::open(path)?;
    let mut table = from_reader(file)?;
    fix_arm_labels(&mut table)?;
    Ok(table)
}

/// Parse the record codec's format from any reader. The header line is
/// required; arm correction is NOT applied here.
pub fn from_reader<R: Read>(reader: R) -> Result<SessionTable> {
    let reader = BufReader::new(reader);
    let mut rows = Vec::new();
    let mut lines = reader.lines().enumerate();

    let (_, header) = lines.next().ok_or(Error::Parse {
        line: 1,
        reason: "empty input, expected a header line".to_string(),
    })?;
    let header = header?;
    if !header.trim_start().starts_with("Device ID") {
        return Err(Error::Parse {
            line: 1,
            reason: format!("unrecognized header '{}'", header.trim()),
        });
    }

    for (index, line) in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        rows.push(parse_record(&line, index + 1)?);
    }
    Ok(SessionTable::new(rows))
}

/// Device-to-arm assignment derived from the first-seen reference rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmMapping {
    /// Device whose rows first reported `left`.
    pub left: DeviceId,
    /// Device whose rows first reported `right`.
    pub right: DeviceId,
}

/// Repair the arm column in place.
///
/// Persisted arm labels can be wrong per-row, but the real assignment is
/// constant per device for the whole session. The first row reporting `left`
/// and the first reporting `right` fix the reference devices; every row is
/// then relabelled from its device id alone. Rows from devices matching
/// neither reference keep their persisted label.
///
/// Fails with [`Error::MissingArmReference`] when either label never occurs,
/// rather than inventing a partial mapping.
pub fn fix_arm_labels(table: &mut SessionTable) -> Result<ArmMapping> {
    let left = reference_device(table, Arm::Left)?;
    let right = reference_device(table, Arm::Right)?;
    let mapping = ArmMapping { left, right };

    for row in &mut table.rows {
        if row.device_id == mapping.left {
            row.arm = Arm::Left;
        } else if row.device_id == mapping.right {
            row.arm = Arm::Right;
        }
    }
    Ok(mapping)
}

fn reference_device(table: &SessionTable, arm: Arm) -> Result<DeviceId> {
    table
        .iter()
        .find(|row| row.arm == arm)
        .map(|row| row.device_id)
        .ok_or(Error::MissingArmReference(arm))
}

fn parse_record(line: &str, line_number: usize) -> Result<SessionRecord> {
    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != FIELD_COUNT {
        return Err(Error::Parse {
            line: line_number,
            reason: format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
        });
    }

    let mut emg: EmgFrame = [0; EMG_CHANNEL_COUNT];
    for (slot, field) in emg.iter_mut().zip(&fields[16..24]) {
        *slot = parse_field(field, "EMG channel", line_number)?;
    }

    Ok(SessionRecord {
        device_id: DeviceId(parse_field(fields[0], "device id", line_number)?),
        warm: parse_label::<WarmupState>(fields[1], line_number)?,
        sync: parse_sync(fields[2], line_number)?,
        arm: parse_label::<Arm>(fields[3], line_number)?,
        timestamp: parse_label::<RecordTimestamp>(fields[4], line_number)?,
        orientation: Quaternion {
            w: parse_field(fields[5], "orientation w", line_number)?,
            x: parse_field(fields[6], "orientation x", line_number)?,
            y: parse_field(fields[7], "orientation y", line_number)?,
            z: parse_field(fields[8], "orientation z", line_number)?,
        },
        acceleration: Vector3 {
            x: parse_field(fields[9], "acceleration x", line_number)?,
            y: parse_field(fields[10], "acceleration y", line_number)?,
            z: parse_field(fields[11], "acceleration z", line_number)?,
        },
        gyroscope: Vector3 {
            x: parse_field(fields[12], "gyroscope x", line_number)?,
            y: parse_field(fields[13], "gyroscope y", line_number)?,
            z: parse_field(fields[14], "gyroscope z", line_number)?,
        },
        pose: parse_label::<Pose>(fields[15], line_number)?,
        emg,
        locked: parse_bool(fields[24], line_number)?,
        rssi: parse_field(fields[25], "rssi", line_number)?,
        roll: parse_field(fields[26], "roll", line_number)?,
        pitch: parse_field(fields[27], "pitch", line_number)?,
        yaw: parse_field(fields[28], "yaw", line_number)?,
    })
}

fn parse_field<T: FromStr>(field: &str, what: &str, line_number: usize) -> Result<T> {
    field.parse().map_err(|_| Error::Parse {
        line: line_number,
        reason: format!("bad {} value '{}'", what, field),
    })
}

fn parse_label<T>(field: &str, line_number: usize) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    field.parse().map_err(|e| Error::Parse {
        line: line_number,
        reason: format!("{}", e),
    })
}

// Legacy capture files wrote True/False/None; accept both casings.
fn parse_bool(field: &str, line_number: usize) -> Result<bool> {
    match field.to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        other => Err(Error::Parse {
            line: line_number,
            reason: format!("bad boolean value '{}'", other),
        }),
    }
}

fn parse_sync(field: &str, line_number: usize) -> Result<Option<bool>> {
    if field.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    parse_bool(field, line_number).map(Some)
}
