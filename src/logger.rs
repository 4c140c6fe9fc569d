// src/logger.rs
//! Generic line-based event logger.
//!
//! Records free-text annotations (procedure steps, observations) alongside a
//! capture, one timestamped line per event. Independent of the device paths;
//! the only shared convention is second-resolution wall-clock prefixes.

use crate::error::Result;
use chrono::Local;
use std::io::Write;

/// Appends timestamped event lines to an owned writer.
///
/// Lines look like `2019-05-03 09:33:39:123456: probe inserted`; an empty
/// event records the bare timestamp.
pub struct EventLogger<W: Write> {
    writer: Option<W>,
}

impl<W: Write> EventLogger<W> {
    /// Wrap an output writer.
    pub fn new(writer: W) -> Self {
        Self { writer: Some(writer) }
    }

    /// Write one event line stamped with the local wall clock.
    pub fn log(&mut self, event: &str) -> Result<()> {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S:%6f").to_string();
        self.log_at(&timestamp, event)
    }

    // Split out so tests can pin the timestamp.
    fn log_at(&mut self, timestamp: &str, event: &str) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_all(timestamp.as_bytes())?;
            if !event.is_empty() {
                writer.write_all(b": ")?;
                writer.write_all(event.as_bytes())?;
            }
            writer.write_all(b"\n")?;
        }
        Ok(())
    }

    /// Flush and release the writer. Safe to call twice.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl<W: Write> Drop for EventLogger<W> {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
