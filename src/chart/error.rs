use thiserror::Error;

use crate::types::{Channel, PlotGroup};

#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error("channel {channel} has {actual} samples, expected {expected} to match frame")]
    ChannelLength {
        channel: Channel,
        expected: usize,
        actual: usize,
    },
    #[error("{group} extent is not finite: [{min}, {max}]")]
    NonFiniteExtent { group: PlotGroup, min: f64, max: f64 },
    #[error("data accessor failed: {0}")]
    Accessor(String),
    #[error("visualizer already stopped; construct a new one to run again")]
    AlreadyStopped,
    #[error("failed to open chart surface: {0}")]
    Surface(String),
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Config(#[from] serde_json::Error),
}
