//! Chart facade: configuration, line-graph views and the composed chart widget.

mod chart;
mod config;
mod view;

pub use chart::RangeChart;
pub use config::{RangeChartConfig, RangeChartStyle};
pub use view::{ChartView, ViewMode};
