// src/config.rs
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::chart::VisualizerError;

pub const DEFAULT_WINDOW_SIZE: usize = 1000;
pub const DEFAULT_UPDATE_INTERVAL_MS: u64 = 10;

/// Visualizer settings.
///
/// Fields use `#[serde(default)]` so a config file only needs the keys it
/// wants to change.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    /// Most recent points kept on screen per series.
    pub window_size: usize,
    /// Milliseconds between redraws.
    pub update_interval_ms: u64,
    pub title: String,
    pub width: f32,
    pub height: f32,
}

impl VisualizerConfig {
    pub fn new(window_size: usize, update_interval_ms: u64) -> Self {
        Self {
            window_size,
            update_interval_ms,
            ..Self::default()
        }
        .normalized()
    }

    pub fn from_json_str(text: &str) -> Result<Self, VisualizerError> {
        let config: Self = serde_json::from_str(text)?;
        Ok(config.normalized())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, VisualizerError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    // 窗口和刷新间隔必须为正
    fn normalized(mut self) -> Self {
        self.window_size = self.window_size.max(1);
        self.update_interval_ms = self.update_interval_ms.max(1);
        self
    }
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            window_size: DEFAULT_WINDOW_SIZE,
            update_interval_ms: DEFAULT_UPDATE_INTERVAL_MS,
            title: "Real-time IMU Data".to_owned(),
            // 12 x 8 inch figure at 100 dpi
            width: 1200.0,
            height: 800.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = VisualizerConfig::default();
        assert_eq!(config.window_size, 1000);
        assert_eq!(config.update_interval(), Duration::from_millis(10));
        assert_eq!(config.title, "Real-time IMU Data");
    }

    #[test]
    fn zero_values_are_clamped() {
        let config = VisualizerConfig::new(0, 0);
        assert_eq!(config.window_size, 1);
        assert_eq!(config.update_interval_ms, 1);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = VisualizerConfig::from_json_str(r#"{ "window_size": 250 }"#).unwrap();
        assert_eq!(config.window_size, 250);
        assert_eq!(config.update_interval_ms, DEFAULT_UPDATE_INTERVAL_MS);
        assert_eq!(config.width, 1200.0);
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let err = VisualizerConfig::from_json_str("{ window_size: }").unwrap_err();
        assert!(matches!(err, VisualizerError::Config(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = VisualizerConfig::load("/nonexistent/imu-scope.json").unwrap_err();
        assert!(matches!(err, VisualizerError::Io(_)));
    }
}
