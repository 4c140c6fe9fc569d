// src/hal/types.rs
//! Core types shared by the live capture path and the offline session path.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of EMG channels on the armband.
pub const EMG_CHANNEL_COUNT: usize = 8;

/// Make/model string recorded for every device of this generation.
pub const DEVICE_MAKE_MODEL: &str = "Thalmic Labs Myo 1";

/// Opaque identifier distinguishing one physical armband within a session.
///
/// Stable for the lifetime of a connection; the registry key for all
/// per-device state.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hand pose classified by the device firmware.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pose {
    /// Relaxed hand, the default state.
    Rest,
    /// Closed fist.
    Fist,
    /// Wrist flexed toward the body.
    WaveIn,
    /// Wrist flexed away from the body.
    WaveOut,
    /// All fingers spread.
    FingersSpread,
    /// Double tap of thumb and middle finger.
    DoubleTap,
    /// Firmware could not classify the pose.
    Unknown,
}

impl Pose {
    /// Label as persisted in CSV records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pose::Rest => "rest",
            Pose::Fist => "fist",
            Pose::WaveIn => "wave_in",
            Pose::WaveOut => "wave_out",
            Pose::FingersSpread => "fingers_spread",
            Pose::DoubleTap => "double_tap",
            Pose::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Pose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pose {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "rest" => Ok(Pose::Rest),
            "fist" => Ok(Pose::Fist),
            "wave_in" => Ok(Pose::WaveIn),
            "wave_out" => Ok(Pose::WaveOut),
            "fingers_spread" => Ok(Pose::FingersSpread),
            "double_tap" => Ok(Pose::DoubleTap),
            "unknown" => Ok(Pose::Unknown),
            other => Err(format!("unrecognized pose label '{}'", other)),
        }
    }
}

/// Which arm the device is synced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arm {
    /// Not synced, or sync lost.
    Unknown,
    /// Left arm.
    Left,
    /// Right arm.
    Right,
}

impl Arm {
    /// Label as persisted in CSV records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Arm::Unknown => "unknown",
            Arm::Left => "left",
            Arm::Right => "right",
        }
    }
}

impl fmt::Display for Arm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Arm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(Arm::Unknown),
            "left" => Ok(Arm::Left),
            "right" => Ok(Arm::Right),
            other => Err(format!("unrecognized arm label '{}'", other)),
        }
    }
}

/// Warm-up state of the EMG sensors after sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarmupState {
    /// No warm-up information yet.
    Unknown,
    /// Sensors still warming up.
    Cold,
    /// Warm-up complete.
    Warm,
}

impl WarmupState {
    /// Label as persisted in CSV records.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarmupState::Unknown => "unknown",
            WarmupState::Cold => "cold",
            WarmupState::Warm => "warm",
        }
    }
}

impl fmt::Display for WarmupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WarmupState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unknown" => Ok(WarmupState::Unknown),
            "cold" => Ok(WarmupState::Cold),
            "warm" => Ok(WarmupState::Warm),
            other => Err(format!("unrecognized warmup label '{}'", other)),
        }
    }
}

/// Direction the device's positive x axis points along the forearm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum XDirection {
    /// Orientation not determined.
    Unknown,
    /// Positive x toward the wrist.
    TowardWrist,
    /// Positive x toward the elbow.
    TowardElbow,
}

/// Unit quaternion orientation as reported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Quaternion {
    /// Scalar component.
    pub w: f64,
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Quaternion {
    /// Roll about the forearm axis, in radians.
    pub fn roll(&self) -> f64 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y))
    }

    /// Pitch, in radians, clamped against numeric drift outside [-1, 1].
    pub fn pitch(&self) -> f64 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        (2.0 * (w * y - z * x)).clamp(-1.0, 1.0).asin()
    }

    /// Yaw, in radians.
    pub fn yaw(&self) -> f64 {
        let (w, x, y, z) = (self.w, self.x, self.y, self.z);
        (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z))
    }
}

/// Three-axis vector used for acceleration and gyroscope readings.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    /// X axis.
    pub x: f64,
    /// Y axis.
    pub y: f64,
    /// Z axis.
    pub z: f64,
}

/// One frame of raw EMG readings, one value per channel.
pub type EmgFrame = [i32; EMG_CHANNEL_COUNT];

/// Payload of an arm-sync event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmSync {
    /// Arm the device synced to.
    pub arm: Arm,
    /// Orientation of the device on the forearm.
    pub x_direction: XDirection,
    /// Warm-up state at sync time.
    pub warmup_state: WarmupState,
}

/// Device firmware version reported at connect time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareVersion {
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
    /// Patch version.
    pub patch: u16,
}

/// Typed hardware event as delivered by the vendor SDK.
///
/// The collaborator contract: for each device, exactly one `Connect` is
/// delivered before any other event, events arrive serially, and an optional
/// `Disconnect` terminates the stream.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    /// Device connected; carries the firmware version.
    Connect(FirmwareVersion),
    /// Device disconnected.
    Disconnect,
    /// Signal strength response, absent when the radio gave no reading.
    Rssi(Option<i32>),
    /// Pose classification, absent when the firmware withheld one.
    Pose(Option<Pose>),
    /// One EMG frame.
    Emg(EmgFrame),
    /// Orientation quaternion.
    Orientation(Quaternion),
    /// Accelerometer reading in g.
    Acceleration(Vector3),
    /// Gyroscope reading in deg/s.
    Gyroscope(Vector3),
    /// Device locked.
    Lock,
    /// Device unlocked.
    Unlock,
    /// Device synced to an arm.
    ArmSync(ArmSync),
    /// Device lost its arm sync.
    ArmUnsync,
    /// Battery level response, percent.
    BatteryLevel(u8),
    /// Sensor warm-up finished.
    WarmupCompleted,
}

/// Event envelope: device, hardware clock, payload.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    /// Source device.
    pub device: DeviceId,
    /// Hardware timestamp, microseconds since the Unix epoch.
    pub timestamp_us: u64,
    /// Typed payload.
    pub kind: EventKind,
}
