// src/capture/dispatcher.rs
//! Event dispatcher: routes typed hardware events to per-device state and
//! emits CSV records.

use crate::capture::clock::compound_timestamp;
use crate::capture::codec;
use crate::capture::sink::OutputStreams;
use crate::capture::state::DeviceState;
use crate::error::{Error, Result};
use crate::hal::traits::{DeviceCommands, Vibration};
use crate::hal::types::{
    Arm, ArmSync, DeviceEvent, DeviceId, EmgFrame, EventKind, FirmwareVersion, Pose, Quaternion,
    Vector3, WarmupState,
};
use std::collections::HashMap;

/// Routes incoming hardware events to the matching [`DeviceState`] and
/// serializes records on EMG and orientation events.
///
/// Dispatch is serial: each event, including its emission, completes before
/// the next is processed. The dispatcher is the registry's only writer.
pub struct Dispatcher<C: DeviceCommands> {
    states: HashMap<DeviceId, DeviceState>,
    streams: OutputStreams,
    commands: C,
    samples: u64,
    shut_down: bool,
}

impl<C: DeviceCommands> Dispatcher<C> {
    /// Build a dispatcher over freshly acquired output streams and a command
    /// sink toward the hardware.
    pub fn new(streams: OutputStreams, commands: C) -> Self {
        Self {
            states: HashMap::new(),
            streams,
            commands,
            samples: 0,
            shut_down: false,
        }
    }

    /// Number of EMG samples emitted so far.
    pub fn sample_count(&self) -> u64 {
        self.samples
    }

    /// Number of devices seen so far.
    pub fn device_count(&self) -> usize {
        self.states.len()
    }

    /// Current state of a device, if it has connected.
    pub fn device_state(&self, device: DeviceId) -> Option<&DeviceState> {
        self.states.get(&device)
    }

    /// Route one event envelope to its handler.
    pub fn dispatch(&mut self, event: DeviceEvent) -> Result<()> {
        let DeviceEvent { device, timestamp_us, kind } = event;
        match kind {
            EventKind::Connect(firmware) => self.on_connect(device, timestamp_us, firmware),
            EventKind::Disconnect => self.on_disconnect(device, timestamp_us),
            EventKind::Rssi(rssi) => self.on_rssi(device, timestamp_us, rssi),
            EventKind::Pose(pose) => self.on_pose(device, timestamp_us, pose),
            EventKind::Emg(emg) => self.on_emg(device, timestamp_us, emg),
            EventKind::Orientation(q) => self.on_orientation(device, timestamp_us, q),
            EventKind::Acceleration(v) => self.on_acceleration(device, timestamp_us, v),
            EventKind::Gyroscope(v) => self.on_gyroscope(device, timestamp_us, v),
            EventKind::Lock => self.on_lock(device, timestamp_us),
            EventKind::Unlock => self.on_unlock(device, timestamp_us),
            EventKind::ArmSync(sync) => self.on_arm_sync(device, timestamp_us, sync),
            EventKind::ArmUnsync => self.on_arm_unsync(device, timestamp_us),
            EventKind::BatteryLevel(level) => self.on_battery_level(device, timestamp_us, level),
            EventKind::WarmupCompleted => self.on_warmup_completed(device, timestamp_us),
        }
    }

    /// Register an unseen device and issue its initialization commands.
    ///
    /// The commands are fire-and-forget: the vibration is a connection
    /// sanity check, and the RSSI/battery responses come back as events.
    /// Reconnects of a known device are a no-op.
    pub fn on_connect(
        &mut self,
        device: DeviceId,
        _timestamp_us: u64,
        firmware: FirmwareVersion,
    ) -> Result<()> {
        self.commands.vibrate(device, Vibration::Short);
        self.commands.set_emg_streaming(device, true);
        self.commands.request_rssi(device);
        self.commands.request_battery_level(device);
        if !self.states.contains_key(&device) {
            let firmware =
                format!("{}.{}.{}", firmware.major, firmware.minor, firmware.patch);
            tracing::info!(%device, firmware, "device connected");
            self.states.insert(device, DeviceState::new(device));
        }
        Ok(())
    }

    /// Observability only: report the aggregate sample count.
    pub fn on_disconnect(&mut self, device: DeviceId, _timestamp_us: u64) -> Result<()> {
        tracing::debug!(%device, samples = self.samples, "device disconnected");
        Ok(())
    }

    /// Overwrite signal strength when the radio produced a reading.
    pub fn on_rssi(&mut self, device: DeviceId, _timestamp_us: u64, rssi: Option<i32>) -> Result<()> {
        let state = self.state_mut(device)?;
        if let Some(rssi) = rssi {
            state.motion.rssi = rssi;
        }
        Ok(())
    }

    /// Overwrite the pose when the firmware classified one.
    pub fn on_pose(&mut self, device: DeviceId, _timestamp_us: u64, pose: Option<Pose>) -> Result<()> {
        let state = self.state_mut(device)?;
        if let Some(pose) = pose {
            state.motion.pose = pose;
        }
        Ok(())
    }

    /// Store the EMG frame, stamp the motion snapshot, and emit an EMG
    /// record immediately.
    pub fn on_emg(&mut self, device: DeviceId, timestamp_us: u64, emg: EmgFrame) -> Result<()> {
        let timestamp = compound_timestamp(timestamp_us)?;
        let state = self.state_mut(device)?;
        state.motion.emg = emg;
        state.motion.timestamp = Some(timestamp);
        let line = codec::encode(state);
        self.streams.write_emg(&line)?;
        self.samples += 1;
        Ok(())
    }

    /// Overwrite the quaternion and its derived roll/pitch/yaw, stamp the
    /// snapshot, and emit an IMU record immediately.
    ///
    /// Acceleration and gyroscope values carried forward from earlier events
    /// ride along in the emitted record.
    pub fn on_orientation(
        &mut self,
        device: DeviceId,
        timestamp_us: u64,
        orientation: Quaternion,
    ) -> Result<()> {
        let timestamp = compound_timestamp(timestamp_us)?;
        let state = self.state_mut(device)?;
        state.motion.set_orientation(orientation);
        state.motion.timestamp = Some(timestamp);
        let line = codec::encode(state);
        self.streams.write_imu(&line)
    }

    /// Overwrite the accelerometer axes and stamp the snapshot; no emission.
    pub fn on_acceleration(
        &mut self,
        device: DeviceId,
        timestamp_us: u64,
        acceleration: Vector3,
    ) -> Result<()> {
        let timestamp = compound_timestamp(timestamp_us)?;
        let state = self.state_mut(device)?;
        state.motion.acceleration = acceleration;
        state.motion.timestamp = Some(timestamp);
        Ok(())
    }

    /// Overwrite the gyroscope axes; no timestamp update, no emission.
    pub fn on_gyroscope(
        &mut self,
        device: DeviceId,
        _timestamp_us: u64,
        gyroscope: Vector3,
    ) -> Result<()> {
        self.state_mut(device)?.motion.gyroscope = gyroscope;
        Ok(())
    }

    /// Mark the device locked.
    pub fn on_lock(&mut self, device: DeviceId, _timestamp_us: u64) -> Result<()> {
        self.state_mut(device)?.motion.locked = true;
        Ok(())
    }

    /// Mark the device unlocked.
    pub fn on_unlock(&mut self, device: DeviceId, _timestamp_us: u64) -> Result<()> {
        self.state_mut(device)?.motion.locked = false;
        Ok(())
    }

    /// Record sync, warm-up state and arm assignment from the sync payload.
    pub fn on_arm_sync(&mut self, device: DeviceId, _timestamp_us: u64, sync: ArmSync) -> Result<()> {
        let state = self.state_mut(device)?;
        state.sync = Some(true);
        state.warm = sync.warmup_state;
        state.arm = sync.arm;
        Ok(())
    }

    /// Drop the arm assignment and mark the device unsynced.
    pub fn on_arm_unsync(&mut self, device: DeviceId, _timestamp_us: u64) -> Result<()> {
        let state = self.state_mut(device)?;
        state.sync = Some(false);
        state.arm = Arm::Unknown;
        Ok(())
    }

    /// Observability only.
    pub fn on_battery_level(&mut self, device: DeviceId, _timestamp_us: u64, level: u8) -> Result<()> {
        let state = self.state_mut(device)?;
        tracing::debug!(device = %state.device_id, level, "battery level received");
        Ok(())
    }

    /// Mark sensor warm-up complete.
    pub fn on_warmup_completed(&mut self, device: DeviceId, _timestamp_us: u64) -> Result<()> {
        self.state_mut(device)?.warm = WarmupState::Warm;
        Ok(())
    }

    /// Orderly shutdown: flush and close every output stream exactly once
    /// and report the aggregate sample count. Safe to call twice.
    pub fn shutdown(&mut self) -> Result<u64> {
        if !self.shut_down {
            self.shut_down = true;
            tracing::info!(samples = self.samples, devices = self.states.len(), "capture session shut down");
        }
        self.streams.close_all()?;
        Ok(self.samples)
    }

    fn state_mut(&mut self, device: DeviceId) -> Result<&mut DeviceState> {
        self.states.get_mut(&device).ok_or(Error::UnknownDevice(device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::sink::OutputStreams;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }

        fn data_lines(&self) -> Vec<String> {
            self.contents()
                .lines()
                .skip(1) // header
                .map(str::to_string)
                .collect()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Command sink that records what the dispatcher asked the hardware for.
    #[derive(Default)]
    struct RecordingCommands {
        log: Vec<String>,
    }

    impl DeviceCommands for RecordingCommands {
        fn vibrate(&mut self, device: DeviceId, pattern: Vibration) {
            self.log.push(format!("vibrate:{}:{:?}", device, pattern));
        }

        fn set_emg_streaming(&mut self, device: DeviceId, enabled: bool) {
            self.log.push(format!("emg_streaming:{}:{}", device, enabled));
        }

        fn request_rssi(&mut self, device: DeviceId) {
            self.log.push(format!("rssi:{}", device));
        }

        fn request_battery_level(&mut self, device: DeviceId) {
            self.log.push(format!("battery:{}", device));
        }
    }

    const FIRMWARE: FirmwareVersion = FirmwareVersion { major: 1, minor: 5, patch: 1970 };
    const T0: u64 = 1_556_890_419_000_000;

    fn build() -> (Dispatcher<RecordingCommands>, SharedBuf, SharedBuf) {
        let emg = SharedBuf::default();
        let imu = SharedBuf::default();
        let streams =
            OutputStreams::new(Box::new(emg.clone()), Box::new(imu.clone()), false).unwrap();
        (Dispatcher::new(streams, RecordingCommands::default()), emg, imu)
    }

    #[test]
    fn test_connect_registers_and_initializes() {
        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();

        assert_eq!(dispatcher.device_count(), 1);
        assert_eq!(
            dispatcher.commands.log,
            vec![
                "vibrate:1:Short",
                "emg_streaming:1:true",
                "rssi:1",
                "battery:1",
            ]
        );
    }

    #[test]
    fn test_reconnect_keeps_existing_state() {
        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_lock(DeviceId(1), T0).unwrap();
        dispatcher.on_connect(DeviceId(1), T0 + 1, FIRMWARE).unwrap();

        assert_eq!(dispatcher.device_count(), 1);
        assert!(dispatcher.device_state(DeviceId(1)).unwrap().motion.locked);
    }

    #[test]
    fn test_event_before_connect_fails_fast() {
        let (mut dispatcher, _, _) = build();
        let err = dispatcher.on_emg(DeviceId(9), T0, [0; 8]).unwrap_err();
        assert!(matches!(err, Error::UnknownDevice(DeviceId(9))));
    }

    #[test]
    fn test_emg_event_emits_record_and_counts_sample() {
        let (mut dispatcher, emg, imu) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_emg(DeviceId(1), T0, [10, 20, 30, 40, 50, 60, 70, 80]).unwrap();

        assert_eq!(dispatcher.sample_count(), 1);
        let lines = emg.data_lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("2019-05-03 13:33:39"));
        assert!(lines[0].contains("10,20,30,40,50,60,70,80"));
        assert!(imu.data_lines().is_empty());
    }

    #[test]
    fn test_orientation_event_emits_imu_record() {
        let (mut dispatcher, emg, imu) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher
            .on_orientation(DeviceId(1), T0, Quaternion { w: 1.0, x: 0.0, y: 0.0, z: 0.0 })
            .unwrap();

        assert_eq!(imu.data_lines().len(), 1);
        assert!(emg.data_lines().is_empty());
        assert_eq!(dispatcher.sample_count(), 0);
    }

    #[test]
    fn test_acceleration_and_gyroscope_do_not_emit() {
        let (mut dispatcher, emg, imu) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_acceleration(DeviceId(1), T0, Vector3 { x: 0.1, y: 0.2, z: 0.3 }).unwrap();
        dispatcher.on_gyroscope(DeviceId(1), T0, Vector3 { x: 1.0, y: 2.0, z: 3.0 }).unwrap();

        assert!(emg.data_lines().is_empty());
        assert!(imu.data_lines().is_empty());

        // Both readings carry forward into the next IMU emission.
        dispatcher
            .on_orientation(DeviceId(1), T0 + 10, Quaternion { w: 1.0, x: 0.0, y: 0.0, z: 0.0 })
            .unwrap();
        let line = &imu.data_lines()[0];
        assert!(line.contains("0.1,0.2,0.3"));
        assert!(line.contains("1,2,3"));
    }

    #[test]
    fn test_gyroscope_does_not_touch_timestamp() {
        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_gyroscope(DeviceId(1), T0, Vector3 { x: 1.0, y: 2.0, z: 3.0 }).unwrap();
        assert!(dispatcher.device_state(DeviceId(1)).unwrap().motion.timestamp.is_none());
    }

    #[test]
    fn test_arm_sync_and_unsync() {
        use crate::hal::types::XDirection;

        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher
            .on_arm_sync(
                DeviceId(1),
                T0,
                ArmSync {
                    arm: Arm::Right,
                    x_direction: XDirection::TowardWrist,
                    warmup_state: WarmupState::Cold,
                },
            )
            .unwrap();
        {
            let state = dispatcher.device_state(DeviceId(1)).unwrap();
            assert_eq!(state.sync, Some(true));
            assert_eq!(state.arm, Arm::Right);
            assert_eq!(state.warm, WarmupState::Cold);
        }

        dispatcher.on_arm_unsync(DeviceId(1), T0 + 1).unwrap();
        let state = dispatcher.device_state(DeviceId(1)).unwrap();
        assert_eq!(state.sync, Some(false));
        assert_eq!(state.arm, Arm::Unknown);
        // Warm-up survives unsync.
        assert_eq!(state.warm, WarmupState::Cold);
    }

    #[test]
    fn test_pose_and_rssi_ignore_absent_payloads() {
        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_pose(DeviceId(1), T0, Some(Pose::WaveOut)).unwrap();
        dispatcher.on_rssi(DeviceId(1), T0, Some(-48)).unwrap();

        dispatcher.on_pose(DeviceId(1), T0 + 1, None).unwrap();
        dispatcher.on_rssi(DeviceId(1), T0 + 1, None).unwrap();

        let state = dispatcher.device_state(DeviceId(1)).unwrap();
        assert_eq!(state.motion.pose, Pose::WaveOut);
        assert_eq!(state.motion.rssi, -48);
    }

    #[test]
    fn test_warmup_completed_sets_warm() {
        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_warmup_completed(DeviceId(1), T0).unwrap();
        assert_eq!(dispatcher.device_state(DeviceId(1)).unwrap().warm, WarmupState::Warm);
    }

    #[test]
    fn test_dispatch_routes_envelope() {
        let (mut dispatcher, emg, _) = build();
        dispatcher
            .dispatch(DeviceEvent {
                device: DeviceId(3),
                timestamp_us: T0,
                kind: EventKind::Connect(FIRMWARE),
            })
            .unwrap();
        dispatcher
            .dispatch(DeviceEvent {
                device: DeviceId(3),
                timestamp_us: T0 + 5,
                kind: EventKind::Emg([1; 8]),
            })
            .unwrap();
        assert_eq!(emg.data_lines().len(), 1);
    }

    #[test]
    fn test_shutdown_is_idempotent_and_reports_samples() {
        let (mut dispatcher, _, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_emg(DeviceId(1), T0, [0; 8]).unwrap();

        assert_eq!(dispatcher.shutdown().unwrap(), 1);
        assert_eq!(dispatcher.shutdown().unwrap(), 1);
    }

    #[test]
    fn test_two_devices_interleaved_stay_independent() {
        let (mut dispatcher, emg, _) = build();
        dispatcher.on_connect(DeviceId(1), T0, FIRMWARE).unwrap();
        dispatcher.on_connect(DeviceId(2), T0, FIRMWARE).unwrap();
        dispatcher.on_emg(DeviceId(1), T0 + 1, [1; 8]).unwrap();
        dispatcher.on_emg(DeviceId(2), T0 + 2, [2; 8]).unwrap();

        let lines = emg.data_lines();
        assert!(lines[0].starts_with("1,"));
        assert!(lines[1].starts_with("2,"));
        assert!(lines[0].contains("1,1,1,1,1,1,1,1"));
        assert!(lines[1].contains("2,2,2,2,2,2,2,2"));
    }
}
