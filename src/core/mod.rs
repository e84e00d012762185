pub mod normalize;
pub mod types;
pub mod viewport;

pub use normalize::{ColumnKind, RawCell, RawDataItem, line_segments, prepare_data_set};
pub use types::{
    ActiveSeriesSet, ContainerSize, DataSet, LineSegment, RangeSelection, SeriesId, Viewport,
};
pub use viewport::{IndexBounds, SeriesPath, ViewportEngine, index_bounds, project_series_paths};
