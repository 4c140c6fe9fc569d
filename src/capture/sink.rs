// src/capture/sink.rs
//! Scope-owned output streams for the capture session.
//!
//! The EMG and IMU streams are acquired at session start, carry exactly one
//! header line each, and are flushed and closed on every exit path. Closing
//! is idempotent so an interrupt racing an orderly shutdown cannot
//! double-fault.

use crate::capture::codec;
use crate::error::Result;
use std::io::Write;

/// One newline-terminated record stream.
pub struct RecordWriter {
    inner: Option<Box<dyn Write + Send>>,
}

impl std::fmt::Debug for RecordWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordWriter")
            .field("open", &self.inner.is_some())
            .finish()
    }
}

impl RecordWriter {
    /// Wrap a writer and immediately emit the codec header.
    pub fn with_header(mut writer: Box<dyn Write + Send>) -> Result<Self> {
        writer.write_all(codec::header().as_bytes())?;
        Ok(Self { inner: Some(writer) })
    }

    /// Write one already-terminated record line. Writing to a closed stream
    /// is a silent no-op; it only happens during shutdown races.
    pub fn write_record(&mut self, line: &str) -> Result<()> {
        if let Some(writer) = self.inner.as_mut() {
            writer.write_all(line.as_bytes())?;
        }
        Ok(())
    }

    /// Flush and release the underlying writer. Safe to call twice.
    pub fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.inner.take() {
            writer.flush()?;
        }
        Ok(())
    }

    /// Whether the stream is still open.
    pub fn is_open(&self) -> bool {
        self.inner.is_some()
    }
}

/// The pair of record streams a capture session writes, plus an optional
/// stdout echo of EMG records.
#[derive(Debug)]
pub struct OutputStreams {
    emg: RecordWriter,
    imu: RecordWriter,
    echo_stdout: bool,
}

impl OutputStreams {
    /// Build the session streams, writing one header line to each.
    pub fn new(
        emg: Box<dyn Write + Send>,
        imu: Box<dyn Write + Send>,
        echo_stdout: bool,
    ) -> Result<Self> {
        Ok(Self {
            emg: RecordWriter::with_header(emg)?,
            imu: RecordWriter::with_header(imu)?,
            echo_stdout,
        })
    }

    /// Emit one EMG record, echoing to stdout when configured.
    pub fn write_emg(&mut self, line: &str) -> Result<()> {
        self.emg.write_record(line)?;
        if self.echo_stdout {
            print!("{}", line);
        }
        Ok(())
    }

    /// Emit one IMU record.
    pub fn write_imu(&mut self, line: &str) -> Result<()> {
        self.imu.write_record(line)
    }

    /// Flush and close both streams. Idempotent; the second stream is still
    /// closed even if the first close fails.
    pub fn close_all(&mut self) -> Result<()> {
        let emg_result = self.emg.close();
        let imu_result = self.imu.close();
        emg_result?;
        imu_result
    }
}

impl Drop for OutputStreams {
    fn drop(&mut self) {
        if self.emg.is_open() || self.imu.is_open() {
            tracing::warn!("output streams dropped without explicit shutdown, closing now");
            let _ = self.close_all();
        }
    }
}
