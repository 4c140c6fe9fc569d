// src/config.rs
//! Capture-session configuration.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where emitted records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreTarget {
    /// Append to the configured EMG/IMU files.
    File,
    /// Echo EMG records to standard output.
    Stdout,
}

/// Configuration for one capture session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Free-text description of the recording session.
    pub description: String,
    /// Output targets; both may be active at once.
    pub store: Vec<StoreTarget>,
    /// EMG record file, appended to when `File` is an active target.
    pub emg_path: PathBuf,
    /// IMU record file, appended to when `File` is an active target.
    pub imu_path: PathBuf,
    /// How long to run the collection, in seconds.
    pub duration_secs: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            description: String::new(),
            store: vec![StoreTarget::File, StoreTarget::Stdout],
            emg_path: PathBuf::from("emg_test.csv"),
            imu_path: PathBuf::from("imu_test.csv"),
            duration_secs: 10_000_000,
        }
    }
}

impl CaptureConfig {
    /// Load and validate a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(&path)?;
        let config: CaptureConfig = toml::from_str(&text)
            .map_err(|e| Error::Config(format!("{}: {}", path.as_ref().display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that cannot open their streams.
    pub fn validate(&self) -> Result<()> {
        if self.store.is_empty() {
            return Err(Error::Config("no store target configured".to_string()));
        }
        if self.store.contains(&StoreTarget::File) {
            if self.emg_path.as_os_str().is_empty() {
                return Err(Error::Config("emg_path must not be empty".to_string()));
            }
            if self.imu_path.as_os_str().is_empty() {
                return Err(Error::Config("imu_path must not be empty".to_string()));
            }
        }
        if self.duration_secs == 0 {
            return Err(Error::Config("duration_secs must be positive".to_string()));
        }
        Ok(())
    }

    /// Whether EMG records should be echoed to stdout.
    pub fn echo_stdout(&self) -> bool {
        self.store.contains(&StoreTarget::Stdout)
    }
}
