// src/session/channels.rs
//! Channel-series shaping for the plotting collaborator.
//!
//! The plotting backend is a pure renderer: it receives already-shaped
//! per-channel series and draws them without further numeric transformation.
//! This module selects the fixed channel sets (8 EMG channels; acceleration
//! axes plus roll/pitch/yaw) and handles the hand selector.

use crate::error::{Error, Result};
use crate::hal::types::{Arm, EMG_CHANNEL_COUNT};
use crate::session::queries::partition_by_arm;
use crate::session::table::{RecordTimestamp, SessionTable};
use std::fmt;
use std::str::FromStr;

/// Which arm's rows to shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    /// Left arm only.
    Left,
    /// Right arm only.
    Right,
    /// Both arms, left series first.
    Both,
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hand::Left => f.write_str("left"),
            Hand::Right => f.write_str("right"),
            Hand::Both => f.write_str("both"),
        }
    }
}

impl FromStr for Hand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Ok(Hand::Left),
            "right" => Ok(Hand::Right),
            "both" => Ok(Hand::Both),
            other => Err(Error::UnknownHand(other.to_string())),
        }
    }
}

/// One labelled channel ready for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelSeries {
    /// Display label, e.g. `Left EMG_3`.
    pub label: String,
    /// (timestamp, value) points in row order.
    pub points: Vec<(RecordTimestamp, f64)>,
}

/// Consumer of shaped channel series; the plotting backend implements this.
pub trait Renderer {
    /// Render one titled set of series.
    fn render(&mut self, title: &str, series: &[ChannelSeries]) -> Result<()>;
}

/// Shape the 8 EMG channels for the selected hand.
///
/// An unknown selector aborts before any series is built; with `Both` the
/// left-arm series precede the right-arm ones.
pub fn emg_series(table: &SessionTable, hand: Hand) -> Result<Vec<ChannelSeries>> {
    shape(table, hand, emg_channels)
}

/// Shape the IMU channels (acceleration axes and roll/pitch/yaw) for the
/// selected hand.
pub fn imu_series(table: &SessionTable, hand: Hand) -> Result<Vec<ChannelSeries>> {
    shape(table, hand, imu_channels)
}

fn shape(
    table: &SessionTable,
    hand: Hand,
    channels: fn(&SessionTable, Arm) -> Vec<ChannelSeries>,
) -> Result<Vec<ChannelSeries>> {
    let (left, right) = partition_by_arm(table);
    Ok(match hand {
        Hand::Left => channels(&left, Arm::Left),
        Hand::Right => channels(&right, Arm::Right),
        Hand::Both => {
            let mut series = channels(&left, Arm::Left);
            series.extend(channels(&right, Arm::Right));
            series
        }
    })
}

fn arm_prefix(arm: Arm) -> &'static str {
    match arm {
        Arm::Left => "Left",
        Arm::Right => "Right",
        Arm::Unknown => "Unknown",
    }
}

fn emg_channels(table: &SessionTable, arm: Arm) -> Vec<ChannelSeries> {
    (0..EMG_CHANNEL_COUNT)
        .map(|channel| ChannelSeries {
            label: format!("{} EMG_{}", arm_prefix(arm), channel + 1),
            points: table
                .iter()
                .map(|row| (row.timestamp, f64::from(row.emg[channel])))
                .collect(),
        })
        .collect()
}

fn imu_channels(table: &SessionTable, arm: Arm) -> Vec<ChannelSeries> {
    let prefix = arm_prefix(arm);
    let channels: [(&str, fn(&crate::session::table::SessionRecord) -> f64); 6] = [
        ("Acc_X", |r| r.acceleration.x),
        ("Acc_Y", |r| r.acceleration.y),
        ("Acc_Z", |r| r.acceleration.z),
        ("Roll", |r| r.roll),
        ("Pitch", |r| r.pitch),
        ("Yaw", |r| r.yaw),
    ];
    channels
        .iter()
        .map(|(name, extract)| ChannelSeries {
            label: format!("{} {}", prefix, name),
            points: table.iter().map(|row| (row.timestamp, extract(row))).collect(),
        })
        .collect()
}
