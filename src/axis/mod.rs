//! Axis gridlines and date labels with double-buffered label sets.

mod dates;
mod formatter;
mod gridlines;
mod label_set;
mod rotator;

pub use dates::select_label_indices;
pub use formatter::{AxisLabelFormatter, DecimalLabelFormatter, UtcDateLabelFormatter};
pub use gridlines::{DEFAULT_GRIDLINE_TOLERANCE, nice_gridline_total, nice_gridline_values};
pub use label_set::{LabelSet, LabelSetRing, LabelSlot};
pub use rotator::{AxisRotator, AxisRotatorConfig};
