// src/hal/mod.rs
//! Hardware abstraction layer for the armband device.
//!
//! The vendor SDK is an external collaborator: it delivers typed events
//! (connect-first, serially per device) and accepts fire-and-forget commands.
//! This layer defines the typed surface of that seam without binding to any
//! concrete SDK.

pub mod traits;
pub mod types;

pub use traits::*;
pub use types::*;
