// src/types.rs
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::chart::VisualizerError;

// 数据通道
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Channel {
    Frame,
    Ax,
    Ay,
    Az,
    Gx,
    Gy,
    Gz,
}

impl Channel {
    pub const ACCEL: [Channel; 3] = [Channel::Ax, Channel::Ay, Channel::Az];
    pub const GYRO: [Channel; 3] = [Channel::Gx, Channel::Gy, Channel::Gz];

    pub fn name(self) -> &'static str {
        match self {
            Channel::Frame => "frame",
            Channel::Ax => "Ax",
            Channel::Ay => "Ay",
            Channel::Az => "Az",
            Channel::Gx => "Gx",
            Channel::Gy => "Gy",
            Channel::Gz => "Gz",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// 上下两个绘图区
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum PlotGroup {
    Accelerometer,
    Gyroscope,
}

impl PlotGroup {
    pub fn channels(self) -> [Channel; 3] {
        match self {
            PlotGroup::Accelerometer => Channel::ACCEL,
            PlotGroup::Gyroscope => Channel::GYRO,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            PlotGroup::Accelerometer => "Accelerometer Data (m/s²)",
            PlotGroup::Gyroscope => "Gyroscope Data (rad/s)",
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            PlotGroup::Accelerometer => "Acceleration",
            PlotGroup::Gyroscope => "Angular Velocity",
        }
    }
}

impl fmt::Display for PlotGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlotGroup::Accelerometer => f.write_str("accelerometer"),
            PlotGroup::Gyroscope => f.write_str("gyroscope"),
        }
    }
}

// 可视化器生命周期
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Lifecycle {
    Configured,
    Running,
    Stopped,
}

/// Accumulated IMU history as handed over by a data source.
///
/// Serialises to the channel mapping `{"frame": [...], "Ax": [...], ...}`.
/// Every channel is expected to hold as many samples as `frame`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SampleWindow {
    pub frame: Vec<u64>,
    #[serde(rename = "Ax")]
    pub ax: Vec<f64>,
    #[serde(rename = "Ay")]
    pub ay: Vec<f64>,
    #[serde(rename = "Az")]
    pub az: Vec<f64>,
    #[serde(rename = "Gx")]
    pub gx: Vec<f64>,
    #[serde(rename = "Gy")]
    pub gy: Vec<f64>,
    #[serde(rename = "Gz")]
    pub gz: Vec<f64>,
}

impl SampleWindow {
    pub fn len(&self) -> usize {
        self.frame.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.is_empty()
    }

    pub fn push(&mut self, frame: u64, accel: [f64; 3], gyro: [f64; 3]) {
        self.frame.push(frame);
        self.ax.push(accel[0]);
        self.ay.push(accel[1]);
        self.az.push(accel[2]);
        self.gx.push(gyro[0]);
        self.gy.push(gyro[1]);
        self.gz.push(gyro[2]);
    }

    /// Values of one sensor channel. `Channel::Frame` has no float values
    /// and yields an empty slice.
    pub fn values(&self, channel: Channel) -> &[f64] {
        match channel {
            Channel::Frame => &[],
            Channel::Ax => &self.ax,
            Channel::Ay => &self.ay,
            Channel::Az => &self.az,
            Channel::Gx => &self.gx,
            Channel::Gy => &self.gy,
            Channel::Gz => &self.gz,
        }
    }

    pub fn validate(&self) -> Result<(), VisualizerError> {
        let expected = self.frame.len();
        for channel in Channel::ACCEL.into_iter().chain(Channel::GYRO) {
            let actual = self.values(channel).len();
            if actual != expected {
                return Err(VisualizerError::ChannelLength {
                    channel,
                    expected,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Drops the oldest samples so that at most `limit` remain.
    pub fn retain_latest(&mut self, limit: usize) {
        let excess = self.frame.len().saturating_sub(limit);
        if excess == 0 {
            return;
        }
        self.frame.drain(..excess);
        for series in [
            &mut self.ax,
            &mut self.ay,
            &mut self.az,
            &mut self.gx,
            &mut self.gy,
            &mut self.gz,
        ] {
            let cut = excess.min(series.len());
            series.drain(..cut);
        }
    }
}
