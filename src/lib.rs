//! range-chart-rs: headless engine for zoomable time-series line charts.
//!
//! A dual-handle range selector drives the visible window of a main line
//! graph through one shared state store per chart. The window animates
//! between targets, and gridlines and date labels are double buffered so a
//! range change never clears the labels on screen before their replacement
//! is ready. Rendering goes through backend-agnostic frames.

pub mod animation;
pub mod api;
pub mod axis;
pub mod core;
pub mod error;
pub mod interaction;
pub mod render;
pub mod store;
pub mod telemetry;

pub use api::{RangeChart, RangeChartConfig};
pub use error::{ChartError, ChartResult};
