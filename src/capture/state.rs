// src/capture/state.rs
//! Per-device capture state.

use crate::capture::motion::MotionSample;
use crate::hal::types::{Arm, DeviceId, WarmupState, DEVICE_MAKE_MODEL};
use serde::Serialize;

/// Everything known about one connected armband.
///
/// Created on the first connect event for an unseen device identifier and
/// kept for the whole capture session; the session end discards all state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviceState {
    /// Registry key for this device.
    pub device_id: DeviceId,
    /// Make/model descriptor.
    pub device_model: &'static str,
    /// Sensor warm-up state, updated on arm-sync and warmup-completed.
    pub warm: WarmupState,
    /// Arm assignment; reset to unknown on arm-unsync.
    pub arm: Arm,
    /// `Some(true)` after sync, `Some(false)` after unsync, `None` before
    /// any sync event.
    pub sync: Option<bool>,
    /// Owned motion snapshot.
    pub motion: MotionSample,
}

impl DeviceState {
    /// Fresh state for a newly connected device.
    pub fn new(device_id: DeviceId) -> Self {
        Self {
            device_id,
            device_model: DEVICE_MAKE_MODEL,
            warm: WarmupState::Unknown,
            arm: Arm::Unknown,
            sync: None,
            motion: MotionSample::default(),
        }
    }

    /// JSON snapshot of the full state, for debugging dumps.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
