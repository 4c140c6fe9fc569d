// src/session/mod.rs
//! Offline analysis path: loading persisted captures and querying them.
//!
//! The only contract shared with the live path is the CSV record schema; a
//! capture written by [`crate::capture`] loads here into a typed
//! [`table::SessionTable`] for arm partitioning and time-window slicing.

pub mod channels;
pub mod loader;
pub mod queries;
pub mod table;

pub use channels::{emg_series, imu_series, ChannelSeries, Hand, Renderer};
pub use loader::{fix_arm_labels, load, ArmMapping};
pub use queries::{partition_by_arm, resolve_window, slice_window};
pub use table::{RecordTimestamp, SessionRecord, SessionTable};
