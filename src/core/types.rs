use std::borrow::Borrow;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Opaque key identifying one series inside a chart instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeriesId(String);

impl SeriesId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SeriesId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SeriesId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SeriesId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Parallel-array chart data: one abscissa column and one ordinate column per series.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataSet {
    pub x_values: Vec<f64>,
    pub series: IndexMap<SeriesId, Vec<f64>>,
    pub colors: IndexMap<SeriesId, String>,
    pub names: IndexMap<SeriesId, String>,
}

impl DataSet {
    #[must_use]
    pub fn new(x_values: Vec<f64>) -> Self {
        Self {
            x_values,
            ..Self::default()
        }
    }

    /// Adds one series with its display metadata.
    #[must_use]
    pub fn with_series(
        mut self,
        id: impl Into<SeriesId>,
        name: impl Into<String>,
        color: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        let id = id.into();
        self.names.insert(id.clone(), name.into());
        self.colors.insert(id.clone(), color.into());
        self.series.insert(id, values);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.x_values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.x_values.is_empty()
    }

    pub fn series_ids(&self) -> impl Iterator<Item = &SeriesId> {
        self.series.keys()
    }

    #[must_use]
    pub fn values(&self, id: &str) -> Option<&[f64]> {
        self.series.get(id).map(Vec::as_slice)
    }

    /// Largest ordinate across every series and every index.
    ///
    /// Returns `0.0` for an empty data set.
    #[must_use]
    pub fn global_max_value(&self) -> f64 {
        self.series
            .values()
            .flat_map(|values| values.iter().copied())
            .filter(|value| value.is_finite())
            .fold(0.0, f64::max)
    }

    /// Largest ordinate of the given series inside the inclusive index window.
    ///
    /// `None` for `active` means every series. Unknown ids are ignored.
    #[must_use]
    pub fn max_value_in(
        &self,
        active: Option<&ActiveSeriesSet>,
        min_index: usize,
        max_index: usize,
    ) -> f64 {
        let window = |values: &Vec<f64>| -> f64 {
            if values.is_empty() || min_index >= values.len() {
                return 0.0;
            }
            let end = max_index.min(values.len() - 1);
            values[min_index..=end]
                .iter()
                .copied()
                .filter(|value| value.is_finite())
                .fold(0.0, f64::max)
        };

        match active {
            Some(active) => active
                .iter()
                .filter_map(|id| self.series.get(id.as_str()))
                .map(window)
                .fold(0.0, f64::max),
            None => self.series.values().map(window).fold(0.0, f64::max),
        }
    }

    /// Checks the column length and ordering invariants.
    pub fn validate(&self) -> ChartResult<()> {
        for (id, values) in &self.series {
            if values.len() != self.x_values.len() {
                return Err(ChartError::InvalidData(format!(
                    "series `{id}` has {} samples, expected {}",
                    values.len(),
                    self.x_values.len()
                )));
            }
        }

        if self.x_values.iter().any(|value| !value.is_finite()) {
            return Err(ChartError::InvalidData(
                "x values must be finite".to_owned(),
            ));
        }
        if self.x_values.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ChartError::InvalidData(
                "x values must be non-decreasing".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Visible window expressed as percentages of the full x-axis span.
///
/// Serialized with the `minValue`/`maxValue` keys used by range-change events.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSelection {
    #[serde(rename = "minValue")]
    pub min_percent: f64,
    #[serde(rename = "maxValue")]
    pub max_percent: f64,
}

impl RangeSelection {
    pub const FULL: Self = Self {
        min_percent: 0.0,
        max_percent: 100.0,
    };

    #[must_use]
    pub const fn new(min_percent: f64, max_percent: f64) -> Self {
        Self {
            min_percent,
            max_percent,
        }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.min_percent.is_finite()
            && self.max_percent.is_finite()
            && (0.0..=100.0).contains(&self.min_percent)
            && (0.0..=100.0).contains(&self.max_percent)
            && self.min_percent < self.max_percent
    }

    /// Returns a copy with both bounds clamped into `[0, 100]` and ordered.
    #[must_use]
    pub fn clamped(self) -> Self {
        let clamp = |value: f64| {
            if value.is_finite() {
                value.clamp(0.0, 100.0)
            } else {
                0.0
            }
        };
        let min = clamp(self.min_percent);
        let max = clamp(self.max_percent);
        Self {
            min_percent: min.min(max),
            max_percent: min.max(max),
        }
    }
}

impl Default for RangeSelection {
    fn default() -> Self {
        Self::new(10.0, 90.0)
    }
}

/// Ordered set of visible series.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActiveSeriesSet(IndexSet<SeriesId>);

impl ActiveSeriesSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every series of the data set, in data order.
    #[must_use]
    pub fn all_of(data: &DataSet) -> Self {
        data.series_ids().cloned().collect()
    }

    pub fn insert(&mut self, id: impl Into<SeriesId>) -> bool {
        self.0.insert(id.into())
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.0.shift_remove(id)
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SeriesId> {
        self.0.iter()
    }
}

impl<I: Into<SeriesId>> FromIterator<I> for ActiveSeriesSet {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Pixel size of the drawing area a chart view renders into.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
}

impl ContainerSize {
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    pub fn validate(self) -> ChartResult<Self> {
        if !self.is_valid() {
            return Err(ChartError::InvalidContainer {
                width: self.width,
                height: self.height,
            });
        }
        Ok(self)
    }
}

/// Rectangular window framing the visible part of the chart in container pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub origin_x: f64,
    pub origin_y: f64,
    pub width: f64,
    pub height: f64,
    /// Largest active ordinate inside the selected range.
    pub max_visible_value: f64,
}

impl Viewport {
    pub const EMPTY: Self = Self {
        origin_x: 0.0,
        origin_y: 0.0,
        width: 0.0,
        height: 0.0,
        max_visible_value: 0.0,
    };

    #[must_use]
    pub const fn new(origin_x: f64, origin_y: f64, width: f64, height: f64) -> Self {
        Self {
            origin_x,
            origin_y,
            width,
            height,
            max_visible_value: 0.0,
        }
    }

    #[must_use]
    pub const fn with_max_visible_value(mut self, value: f64) -> Self {
        self.max_visible_value = value;
        self
    }

    /// `true` when the window has a drawable, finite area.
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// Compares the four geometry fields only.
    #[must_use]
    pub fn same_window(self, other: Self) -> bool {
        self.origin_x == other.origin_x
            && self.origin_y == other.origin_y
            && self.width == other.width
            && self.height == other.height
    }

    /// Linear interpolation of the geometry fields; `max_visible_value` follows `to`.
    #[must_use]
    pub fn lerp(from: Self, to: Self, progress: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * progress;
        Self {
            origin_x: mix(from.origin_x, to.origin_x),
            origin_y: mix(from.origin_y, to.origin_y),
            width: mix(from.width, to.width),
            height: mix(from.height, to.height),
            max_visible_value: to.max_visible_value,
        }
    }

    /// Maps a container-space point onto a `container`-sized surface showing this window.
    ///
    /// Axes are stretched independently. Returns `None` for a non-drawable window.
    #[must_use]
    pub fn project(self, x: f64, y: f64, container: ContainerSize) -> Option<(f64, f64)> {
        if !self.is_drawable() {
            return None;
        }
        Some((
            (x - self.origin_x) / self.width * container.width,
            (y - self.origin_y) / self.height * container.height,
        ))
    }
}

/// Line segment between two adjacent samples of one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}
