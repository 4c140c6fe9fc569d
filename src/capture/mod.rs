// src/capture/mod.rs
//! Live capture path: per-device state accumulation and immediate CSV
//! emission.
//!
//! Hardware events flow through the [`dispatcher::Dispatcher`], mutate the
//! matching [`state::DeviceState`], and on EMG/orientation events are
//! serialized by the [`codec`] and written straight to the owned output
//! streams. There is no batching between event receipt and record emission.

pub mod clock;
pub mod codec;
pub mod dispatcher;
pub mod motion;
pub mod sink;
pub mod state;

pub use dispatcher::Dispatcher;
pub use motion::MotionSample;
pub use sink::OutputStreams;
pub use state::DeviceState;
