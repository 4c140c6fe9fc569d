// src/capture/codec.rs
//! Fixed-column CSV record codec.
//!
//! EMG and IMU streams share this schema. Values are comma-free by
//! construction (numbers, enum labels, booleans), so no quoting or escaping
//! is performed; that asymmetry is part of the format contract.

use crate::capture::state::DeviceState;

/// Column names, in the exact order [`encode`] writes values.
pub const COLUMNS: [&str; 29] = [
    "Device ID",
    "Warm?",
    "Sync",
    "Arm",
    "Timestamp",
    "Orientation_W",
    "Orientation_X",
    "Orientation_Y",
    "Orientation_Z",
    "Acc_X",
    "Acc_Y",
    "Acc_Z",
    "Gyro_X",
    "Gyro_Y",
    "Gyro_Z",
    "Pose",
    "EMG_1",
    "EMG_2",
    "EMG_3",
    "EMG_4",
    "EMG_5",
    "EMG_6",
    "EMG_7",
    "EMG_8",
    "Locked",
    "RSSI",
    "Roll",
    "Pitch",
    "Yaw",
];

/// Header line matching [`encode`], newline-terminated. Written exactly once
/// per output stream, before any record.
pub fn header() -> String {
    let mut line = COLUMNS.join(", ");
    line.push('\n');
    line
}

/// Serialize one device's current state as a single record line,
/// newline-terminated.
///
/// A state that has never seen a timestamped event encodes its timestamp as
/// `none`; the dispatcher only emits after EMG or orientation events, so
/// well-formed captures never contain it.
pub fn encode(state: &DeviceState) -> String {
    let motion = &state.motion;
    let sync = match state.sync {
        None => "none",
        Some(true) => "true",
        Some(false) => "false",
    };
    let timestamp = motion.timestamp.as_deref().unwrap_or("none");
    let emg = motion
        .emg
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!(
        "{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{},{}\n",
        state.device_id,
        state.warm,
        sync,
        state.arm,
        timestamp,
        motion.orientation.w,
        motion.orientation.x,
        motion.orientation.y,
        motion.orientation.z,
        motion.acceleration.x,
        motion.acceleration.y,
        motion.acceleration.z,
        motion.gyroscope.x,
        motion.gyroscope.y,
        motion.gyroscope.z,
        motion.pose,
        emg,
        motion.locked,
        motion.rssi,
        motion.roll,
        motion.pitch,
        motion.yaw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hal::types::{Arm, DeviceId, Pose, Quaternion, Vector3, WarmupState};

    fn sample_state() -> DeviceState {
        let mut state = DeviceState::new(DeviceId(101));
        state.warm = WarmupState::Warm;
        state.sync = Some(true);
        state.arm = Arm::Left;
        state.motion.timestamp = Some("2019-05-03 13:33:39 9123456".to_string());
        state.motion.orientation = Quaternion { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };
        state.motion.acceleration = Vector3 { x: 0.5, y: -0.25, z: 1.0 };
        state.motion.emg = [1, -2, 3, -4, 5, -6, 7, -8];
        state.motion.pose = Pose::Fist;
        state.motion.rssi = -55;
        state
    }

    #[test]
    fn test_header_matches_column_count() {
        let header = header();
        assert!(header.ends_with('\n'));
        assert_eq!(header.trim_end().split(',').count(), COLUMNS.len());
    }

    #[test]
    fn test_record_field_count_matches_header() {
        let line = encode(&sample_state());
        assert!(line.ends_with('\n'));
        assert_eq!(line.trim_end().split(',').count(), COLUMNS.len());
    }

    #[test]
    fn test_encode_known_state() {
        let line = encode(&sample_state());
        assert_eq!(
            line,
            "101,warm,true,left,2019-05-03 13:33:39 9123456,\
             1,0,0,0,0.5,-0.25,1,0,0,0,fist,1,-2,3,-4,5,-6,7,-8,false,-55,0,0,0\n"
        );
    }

    #[test]
    fn test_fresh_state_encodes_none_fields() {
        let line = encode(&DeviceState::new(DeviceId(1)));
        let fields: Vec<&str> = line.trim_end().split(',').collect();
        assert_eq!(fields[1], "unknown");
        assert_eq!(fields[2], "none");
        assert_eq!(fields[3], "unknown");
        assert_eq!(fields[4], "none");
    }
}
