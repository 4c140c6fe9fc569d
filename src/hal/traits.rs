// src/hal/traits.rs
//! Command seam toward the vendor SDK.

use crate::hal::types::DeviceId;

/// Vibration patterns supported by the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vibration {
    /// Short pulse, used as a connection sanity check.
    Short,
    /// Medium pulse.
    Medium,
    /// Long pulse.
    Long,
}

/// Fire-and-forget commands issued to the hardware collaborator.
///
/// Commands are not awaited and carry no result: responses, where the
/// hardware produces any, come back as ordinary events (rssi, battery).
pub trait DeviceCommands {
    /// Trigger a vibration on the device.
    fn vibrate(&mut self, device: DeviceId, pattern: Vibration);

    /// Enable or disable EMG streaming.
    fn set_emg_streaming(&mut self, device: DeviceId, enabled: bool);

    /// Request a signal-strength reading.
    fn request_rssi(&mut self, device: DeviceId);

    /// Request a battery-level reading.
    fn request_battery_level(&mut self, device: DeviceId);
}

/// Command sink that discards everything, for captures replayed without
/// hardware attached.
#[derive(Debug, Default)]
pub struct NullCommands;

impl DeviceCommands for NullCommands {
    fn vibrate(&mut self, _device: DeviceId, _pattern: Vibration) {}

    fn set_emg_streaming(&mut self, _device: DeviceId, _enabled: bool) {}

    fn request_rssi(&mut self, _device: DeviceId) {}

    fn request_battery_level(&mut self, _device: DeviceId) {}
}
