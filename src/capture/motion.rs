// src/capture/motion.rs
//! Latest-known motion snapshot for one device.

use crate::hal::types::{EmgFrame, Pose, Quaternion, Vector3, EMG_CHANNEL_COUNT};
use serde::Serialize;

/// Snapshot of one device's most recent orientation, inertial, EMG, pose and
/// lock readings.
///
/// Every field is independently overwritten by its own event handler; a
/// partial update (a gyroscope-only event, say) never clears unrelated
/// fields. Values therefore carry forward into whatever the next emitted
/// record captures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MotionSample {
    /// Orientation quaternion.
    pub orientation: Quaternion,
    /// Accelerometer reading in g.
    pub acceleration: Vector3,
    /// Gyroscope reading in deg/s.
    pub gyroscope: Vector3,
    /// Raw EMG frame.
    pub emg: EmgFrame,
    /// Firmware pose classification.
    pub pose: Pose,
    /// Whether the device is locked.
    pub locked: bool,
    /// Last reported signal strength.
    pub rssi: i32,
    /// Roll derived from the orientation quaternion, radians.
    pub roll: f64,
    /// Pitch derived from the orientation quaternion, radians.
    pub pitch: f64,
    /// Yaw derived from the orientation quaternion, radians.
    pub yaw: f64,
    /// Compound wall-clock timestamp of the last timestamped event, `None`
    /// before the first one.
    pub timestamp: Option<String>,
}

impl Default for MotionSample {
    fn default() -> Self {
        Self {
            orientation: Quaternion::default(),
            acceleration: Vector3::default(),
            gyroscope: Vector3::default(),
            emg: [0; EMG_CHANNEL_COUNT],
            pose: Pose::Rest,
            locked: false,
            rssi: 0,
            roll: 0.0,
            pitch: 0.0,
            yaw: 0.0,
            timestamp: None,
        }
    }
}

impl MotionSample {
    /// Overwrite the quaternion and its derived roll/pitch/yaw scalars.
    pub fn set_orientation(&mut self, orientation: Quaternion) {
        self.orientation = orientation;
        self.roll = orientation.roll();
        self.pitch = orientation.pitch();
        self.yaw = orientation.yaw();
    }
}
