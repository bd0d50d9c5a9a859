use crate::chart::VisualizerError;
use crate::types::{PlotGroup, SampleWindow};

/// Trailing slice of a sample window, ready to be copied into the series.
#[derive(Clone, Copy, Debug)]
pub struct DisplaySlice<'a> {
    /// Number of frames the source holds, before windowing.
    pub data_length: usize,
    pub window_size: usize,
    pub accel: [&'a [f64]; 3],
    pub gyro: [&'a [f64]; 3],
}

impl<'a> DisplaySlice<'a> {
    /// Number of points that end up on screen.
    pub fn len(&self) -> usize {
        self.accel[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True when the source holds more frames than fit in the window.
    pub fn is_truncated(&self) -> bool {
        self.data_length > self.window_size
    }

    pub fn group(&self, group: PlotGroup) -> [&'a [f64]; 3] {
        match group {
            PlotGroup::Accelerometer => self.accel,
            PlotGroup::Gyroscope => self.gyro,
        }
    }
}

/// Keeps only the most recent `window_size` frames of every channel.
#[derive(Clone, Copy, Debug)]
pub struct WindowPolicy {
    window_size: usize,
}

impl WindowPolicy {
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size: window_size.max(1),
        }
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns `Ok(None)` for a window without frames.
    pub fn select<'a>(
        &self,
        window: &'a SampleWindow,
    ) -> Result<Option<DisplaySlice<'a>>, VisualizerError> {
        if window.is_empty() {
            return Ok(None);
        }
        window.validate()?;
        let data_length = window.len();
        let start = data_length.saturating_sub(self.window_size);
        Ok(Some(DisplaySlice {
            data_length,
            window_size: self.window_size,
            accel: [&window.ax[start..], &window.ay[start..], &window.az[start..]],
            gyro: [&window.gx[start..], &window.gy[start..], &window.gz[start..]],
        }))
    }
}
