use crate::chart::VisualizerError;
use crate::types::PlotGroup;

/// Fraction of the data range added above and below the vertical extent.
pub const HEADROOM: f64 = 0.1;
/// Smallest horizontal span shown while the window is still filling up.
pub const MIN_VISIBLE_SPAN: usize = 50;

/// Closed interval shown along one plot axis.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AxisExtent {
    pub min: f64,
    pub max: f64,
}

impl AxisExtent {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

impl Default for AxisExtent {
    fn default() -> Self {
        AxisExtent { min: 0.0, max: 1.0 }
    }
}

/// Vertical extent covering `values` plus headroom on both sides.
///
/// Returns `Ok(None)` when the values span no range (no values, a single
/// value, or all equal), in which case the caller keeps its previous extent.
/// NaN samples are skipped by the min/max fold.
pub fn padded_extent<'a, I>(group: PlotGroup, values: I) -> Result<Option<AxisExtent>, VisualizerError>
where
    I: IntoIterator<Item = &'a f64>,
{
    let (min, max) = values
        .into_iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;
    if range.is_nan() || range <= 0.0 {
        return Ok(None);
    }
    let lower = min - HEADROOM * range;
    let upper = max + HEADROOM * range;
    if !lower.is_finite() || !upper.is_finite() {
        return Err(VisualizerError::NonFiniteExtent {
            group,
            min: lower,
            max: upper,
        });
    }
    Ok(Some(AxisExtent::new(lower, upper)))
}

/// Horizontal extent for `data_length` frames shown in a window of `window_size`.
pub fn horizontal_extent(data_length: usize, window_size: usize) -> AxisExtent {
    let upper = if data_length > window_size {
        window_size
    } else {
        data_length.max(MIN_VISIBLE_SPAN)
    };
    AxisExtent::new(0.0, upper as f64)
}
