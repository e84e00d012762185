//! Conversion of column-tagged input items into parallel arrays.
//!
//! The input format is the one produced by chart data exporters:
//!
//! ```json
//! {
//!   "columns": [["x", 1, 2, 3], ["y0", 4, 5, 6]],
//!   "types": {"x": "x", "y0": "line"},
//!   "names": {"y0": "#0"},
//!   "colors": {"y0": "#3DC23F"}
//! }
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DataSet, LineSegment, SeriesId};
use crate::error::{ChartError, ChartResult};

/// Role of one input column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    X,
    Line,
}

/// One cell of an input column: the leading id or a numeric sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCell {
    Number(f64),
    Label(String),
}

/// Column-tagged chart item as delivered by the loader.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawDataItem {
    pub columns: Vec<Vec<RawCell>>,
    pub types: IndexMap<String, ColumnKind>,
    #[serde(default)]
    pub names: IndexMap<String, String>,
    #[serde(default)]
    pub colors: IndexMap<String, String>,
}

impl RawDataItem {
    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse data item: {err}")))
    }

    pub fn from_json_value(value: serde_json::Value) -> ChartResult<Self> {
        serde_json::from_value(value)
            .map_err(|err| ChartError::InvalidData(format!("failed to parse data item: {err}")))
    }

    fn column(&self, id: &str) -> Option<&[RawCell]> {
        self.columns
            .iter()
            .find(|column| matches!(column.first(), Some(RawCell::Label(label)) if label == id))
            .map(Vec::as_slice)
    }
}

/// Flattens a raw item into a [`DataSet`].
///
/// Series keep the order in which `types` lists them. Names and colors are
/// copied for every series id; missing entries fall back to the id and an
/// empty color.
pub fn prepare_data_set(item: &RawDataItem) -> ChartResult<DataSet> {
    let x_id = item
        .types
        .iter()
        .find(|(_, kind)| **kind == ColumnKind::X)
        .map(|(id, _)| id.as_str())
        .ok_or_else(|| ChartError::InvalidData("data item has no x column".to_owned()))?;

    let x_column = item
        .column(x_id)
        .ok_or_else(|| ChartError::InvalidData(format!("x column `{x_id}` is missing")))?;
    let mut data = DataSet::new(samples(x_id, x_column)?);

    for (id, _) in item
        .types
        .iter()
        .filter(|(_, kind)| **kind == ColumnKind::Line)
    {
        let column = item
            .column(id)
            .ok_or_else(|| ChartError::InvalidData(format!("line column `{id}` is missing")))?;
        let series_id = SeriesId::new(id.as_str());
        data.series
            .insert(series_id.clone(), samples(id, column)?);
        data.names.insert(
            series_id.clone(),
            item.names.get(id).cloned().unwrap_or_else(|| id.clone()),
        );
        data.colors
            .insert(series_id, item.colors.get(id).cloned().unwrap_or_default());
    }

    debug!(
        samples = data.len(),
        series = data.series.len(),
        "prepared chart data set"
    );
    Ok(data)
}

fn samples(id: &str, column: &[RawCell]) -> ChartResult<Vec<f64>> {
    column
        .iter()
        .skip(1)
        .map(|cell| match cell {
            RawCell::Number(value) => Ok(*value),
            RawCell::Label(label) => Err(ChartError::InvalidData(format!(
                "column `{id}` contains non-numeric sample `{label}`"
            ))),
        })
        .collect()
}

/// Splits every series into segments between adjacent samples.
///
/// Segment coordinates are raw data values (`x` from the abscissa column).
#[must_use]
pub fn line_segments(data: &DataSet) -> IndexMap<SeriesId, Vec<LineSegment>> {
    data.series
        .iter()
        .map(|(id, values)| {
            let segments = data
                .x_values
                .windows(2)
                .zip(values.windows(2))
                .map(|(xs, ys)| LineSegment {
                    x1: xs[0],
                    x2: xs[1],
                    y1: ys[0],
                    y2: ys[1],
                })
                .collect();
            (id.clone(), segments)
        })
        .collect()
}
