//! Live two-panel chart of accelerometer and gyroscope channels pulled
//! from an external data source on a fixed redraw timer.
pub mod chart;
pub mod config;
mod gui;
pub mod simulator;
pub mod timer;
pub mod types;
pub mod visualizer;

pub use chart::{DataAccessor, VisualizerError};
pub use config::VisualizerConfig;
pub use types::{Channel, Lifecycle, PlotGroup, SampleWindow};
pub use visualizer::{StopHandle, TickOutcome, Visualizer};
