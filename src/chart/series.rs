use crate::chart::scale::{horizontal_extent, padded_extent, AxisExtent};
use crate::chart::{DisplaySlice, VisualizerError};
use crate::types::{Channel, PlotGroup};

/// Persistent plotted line for one channel. Its point buffer is refilled
/// in place on every update.
#[derive(Clone, Debug)]
pub struct Series {
    pub channel: Channel,
    points: Vec<[f64; 2]>,
}

impl Series {
    pub fn new(channel: Channel, capacity: usize) -> Self {
        Self {
            channel,
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    pub fn values(&self) -> impl Iterator<Item = &f64> + '_ {
        self.points.iter().map(|p| &p[1])
    }

    /// Replaces the plotted data, pairing each value with its index.
    pub fn replace(&mut self, values: &[f64]) {
        self.points.clear();
        self.points
            .extend(values.iter().enumerate().map(|(i, v)| [i as f64, *v]));
    }
}

/// One plot area: three series sharing a pair of axis extents.
#[derive(Clone, Debug)]
pub struct PlotPanel {
    pub group: PlotGroup,
    pub series: [Series; 3],
    pub x_extent: AxisExtent,
    pub y_extent: AxisExtent,
}

impl PlotPanel {
    pub fn new(group: PlotGroup, capacity: usize) -> Self {
        let [a, b, c] = group.channels();
        Self {
            group,
            series: [
                Series::new(a, capacity),
                Series::new(b, capacity),
                Series::new(c, capacity),
            ],
            x_extent: AxisExtent::default(),
            y_extent: AxisExtent::default(),
        }
    }

    fn replace(&mut self, values: [&[f64]; 3]) {
        for (series, values) in self.series.iter_mut().zip(values) {
            series.replace(values);
        }
    }

    /// Rescales the vertical axis to the panel's current series.
    /// A flat data set leaves the extent as it was.
    fn autoscale(&mut self) -> Result<(), VisualizerError> {
        let values = self.series.iter().flat_map(|s| s.values());
        if let Some(extent) = padded_extent(self.group, values)? {
            self.y_extent = extent;
        }
        Ok(())
    }
}

/// Two stacked panels: accelerometer on top, gyroscope below.
#[derive(Clone, Debug)]
pub struct Chart {
    pub accel: PlotPanel,
    pub gyro: PlotPanel,
}

impl Chart {
    pub fn new(window_size: usize) -> Self {
        Self {
            accel: PlotPanel::new(PlotGroup::Accelerometer, window_size),
            gyro: PlotPanel::new(PlotGroup::Gyroscope, window_size),
        }
    }

    pub fn panels(&self) -> [&PlotPanel; 2] {
        [&self.accel, &self.gyro]
    }

    pub fn series(&self, channel: Channel) -> Option<&Series> {
        self.accel
            .series
            .iter()
            .chain(self.gyro.series.iter())
            .find(|s| s.channel == channel)
    }

    /// Copies a display slice into the series, then rescales both panels.
    /// On error the series keep the data written before the failure.
    pub fn apply(&mut self, slice: &DisplaySlice<'_>) -> Result<(), VisualizerError> {
        for panel in [&mut self.accel, &mut self.gyro] {
            panel.replace(slice.group(panel.group));
        }
        self.accel.autoscale()?;
        self.gyro.autoscale()?;
        let x_extent = horizontal_extent(slice.data_length, slice.window_size);
        self.accel.x_extent = x_extent;
        self.gyro.x_extent = x_extent;
        Ok(())
    }
}
