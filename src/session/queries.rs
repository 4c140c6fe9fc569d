// src/session/queries.rs
//! Pure filtering operations over a loaded session table.

use crate::error::{Error, Result};
use crate::hal::types::Arm;
use crate::session::table::{RecordTimestamp, SessionTable};
use chrono::NaiveTime;

/// Split a table into (left, right) sub-tables on the corrected arm column.
///
/// Row order is preserved in both halves and the halves are mutually
/// exclusive; rows still labelled unknown land in neither.
pub fn partition_by_arm(table: &SessionTable) -> (SessionTable, SessionTable) {
    let mut left = Vec::new();
    let mut right = Vec::new();
    for row in table.iter() {
        match row.arm {
            Arm::Left => left.push(row.clone()),
            Arm::Right => right.push(row.clone()),
            Arm::Unknown => {}
        }
    }
    (SessionTable::new(left), SessionTable::new(right))
}

/// Build a full timestamp from the table's recording date and a time of day.
///
/// The calendar date comes from the table's first row, so a window can be
/// named by wall-clock time alone. Fails on an empty table or an
/// out-of-range time of day.
pub fn resolve_window(
    table: &SessionTable,
    hour: u32,
    minute: u32,
    second: u32,
) -> Result<RecordTimestamp> {
    let first = table.first().ok_or(Error::EmptyTable)?;
    let time = NaiveTime::from_hms_opt(hour, minute, second)
        .ok_or(Error::InvalidTimeOfDay { hour, minute, second })?;
    Ok(RecordTimestamp::at_second(first.timestamp.date().and_time(time)))
}

/// Rows strictly inside the open interval (start, stop), in original order.
///
/// Both endpoints are exclusive so back-to-back windows never double-count a
/// boundary row.
pub fn slice_window(
    table: &SessionTable,
    start: RecordTimestamp,
    stop: RecordTimestamp,
) -> SessionTable {
    SessionTable::new(
        table
            .iter()
            .filter(|row| start < row.timestamp && row.timestamp < stop)
            .cloned()
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::types::{DeviceId, Pose, Quaternion, Vector3, WarmupState};
    use crate::session::table::SessionRecord;

    fn record(device: u64, arm: Arm, timestamp: &str) -> SessionRecord {
        SessionRecord {
            device_id: DeviceId(device),
            warm: WarmupState::Warm,
            sync: Some(true),
            arm,
            timestamp: timestamp.parse().unwrap(),
            orientation: Quaternion::default(),
            acceleration: Vector3::default(),
            gyroscope: Vector3::default(),
            pose: Pose::Rest,
            emg: [0; 8],
            locked: false,
            rssi: 0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
        }
    }

    fn four_row_table() -> SessionTable {
        SessionTable::new(vec![
            record(1, Arm::Left, "2019-05-03 09:33:39 0"),
            record(1, Arm::Left, "2019-05-03 09:33:40 0"),
            record(2, Arm::Right, "2019-05-03 09:34:00 0"),
            record(2, Arm::Right, "2019-05-03 09:35:50 0"),
        ])
    }

    #[test]
    fn test_slice_window_excludes_both_boundaries() {
        let table = four_row_table();
        let start = resolve_window(&table, 9, 33, 40).unwrap();
        let stop = resolve_window(&table, 9, 35, 50).unwrap();
        let sliced = slice_window(&table, start, stop);

        assert_eq!(sliced.len(), 1);
        assert_eq!(sliced.rows[0].timestamp.to_string(), "2019-05-03 09:34:00 0");
    }

    #[test]
    fn test_slice_window_includes_adjacent_interior_rows() {
        let table = SessionTable::new(vec![
            record(1, Arm::Left, "2019-05-03 09:33:40 1"),
            record(1, Arm::Left, "2019-05-03 09:35:49 9999999"),
        ]);
        let start = resolve_window(&table, 9, 33, 40).unwrap();
        let stop = resolve_window(&table, 9, 35, 50).unwrap();

        // One remainder tick inside either boundary is enough.
        assert_eq!(slice_window(&table, start, stop).len(), 2);
    }

    #[test]
    fn test_partition_by_arm_is_disjoint_and_complete() {
        let table = four_row_table();
        let (left, right) = partition_by_arm(&table);

        assert_eq!(left.len() + right.len(), table.len());
        assert!(left.iter().all(|r| r.arm == Arm::Left));
        assert!(right.iter().all(|r| r.arm == Arm::Right));

        // Reassembled in original order, the halves equal the input.
        let mut merged: Vec<_> = left.rows.iter().chain(right.rows.iter()).cloned().collect();
        merged.sort_by_key(|r| r.timestamp);
        assert_eq!(merged, table.rows);
    }

    #[test]
    fn test_partition_drops_unknown_rows() {
        let table = SessionTable::new(vec![record(3, Arm::Unknown, "2019-05-03 09:00:00 0")]);
        let (left, right) = partition_by_arm(&table);
        assert!(left.is_empty());
        assert!(right.is_empty());
    }

    #[test]
    fn test_resolve_window_takes_date_from_first_row() {
        let table = four_row_table();
        let ts = resolve_window(&table, 14, 5, 6).unwrap();
        assert_eq!(ts.to_string(), "2019-05-03 14:05:06 0");
    }

    #[test]
    fn test_resolve_window_on_empty_table() {
        let err = resolve_window(&SessionTable::default(), 9, 0, 0).unwrap_err();
        assert!(matches!(err, Error::EmptyTable));
    }

    #[test]
    fn test_resolve_window_rejects_bad_time_of_day() {
        let err = resolve_window(&four_row_table(), 25, 0, 0).unwrap_err();
        assert!(matches!(err, Error::InvalidTimeOfDay { hour: 25, .. }));
    }
}
