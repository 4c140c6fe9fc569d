//! armband-core: EMG/IMU armband capture and offline session analysis
//!
//! This library covers both halves of an armband recording workflow:
//!
//! - Live capture: typed hardware events mutate per-device state and are
//!   serialized immediately as fixed-column CSV records
//! - Offline analysis: persisted captures load into typed tables for arm
//!   partitioning, time-window slicing and channel shaping
//!
//! The vendor SDK and the plotting backend stay external collaborators: the
//! first behind the event/command types in [`hal`], the second behind
//! [`session::Renderer`]. The CSV record schema is the only contract the two
//! halves share.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use armband_core::capture::{Dispatcher, OutputStreams};
//! use armband_core::hal::{DeviceEvent, DeviceId, EventKind, FirmwareVersion, NullCommands};
//! use std::fs::File;
//!
//! fn main() -> armband_core::Result<()> {
//!     let streams = OutputStreams::new(
//!         Box::new(File::create("emg.csv")?),
//!         Box::new(File::create("imu.csv")?),
//!         false,
//!     )?;
//!     let mut dispatcher = Dispatcher::new(streams, NullCommands);
//!
//!     // Events come from the hardware collaborator, connect-first.
//!     dispatcher.dispatch(DeviceEvent {
//!         device: DeviceId(1),
//!         timestamp_us: 1_556_890_419_000_000,
//!         kind: EventKind::Connect(FirmwareVersion { major: 1, minor: 5, patch: 1970 }),
//!     })?;
//!
//!     let samples = dispatcher.shutdown()?;
//!     println!("captured {} samples", samples);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod capture;
pub mod config;
pub mod error;
pub mod hal;
pub mod logger;
pub mod session;

// Re-export commonly used types for convenience
pub use capture::{Dispatcher, DeviceState, MotionSample, OutputStreams};
pub use config::CaptureConfig;
pub use error::{Error, Result};
pub use hal::{Arm, DeviceId, Pose, WarmupState};
pub use session::{RecordTimestamp, SessionRecord, SessionTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
