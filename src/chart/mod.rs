// src/chart/mod.rs
// 图表模型：与界面无关的窗口、缩放与曲线状态
pub mod error;
pub mod scale;
pub mod series;
pub mod source;
pub mod window;
// 公开导出，方便外部调用
pub use error::VisualizerError;
pub use scale::{horizontal_extent, padded_extent, AxisExtent};
pub use series::{Chart, PlotPanel, Series};
pub use source::{DataAccessor, ManualSource};
pub use window::{DisplaySlice, WindowPolicy};
