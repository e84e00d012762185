use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core::{ActiveSeriesSet, ContainerSize, DataSet, RangeSelection, SeriesId, Viewport};

/// Inclusive sample index window selected by a [`RangeSelection`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexBounds {
    pub min_index: usize,
    pub max_index: usize,
}

/// Converts range percentages into sample indices for `len` samples.
///
/// `min` rounds up and `max` rounds down so both bounds lie inside the
/// selection; `max_index` is raised to `min_index` when the selection is
/// narrower than one step. Returns `None` for fewer than two samples.
#[must_use]
pub fn index_bounds(len: usize, range: RangeSelection) -> Option<IndexBounds> {
    if len < 2 {
        return None;
    }

    let range = range.clamped();
    let last = (len - 1) as f64;
    let min_index = (last * range.min_percent / 100.0).ceil() as usize;
    let max_index = (last * range.max_percent / 100.0).floor() as usize;
    let min_index = min_index.min(len - 1);
    let max_index = max_index.clamp(min_index, len - 1);

    Some(IndexBounds {
        min_index,
        max_index,
    })
}

/// Maps data/range/active-series state to the view window of one container.
///
/// The horizontal step and the vertical scale are fixed at construction from
/// the full data set, so panning only changes the visible crop and never the
/// shape of the lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportEngine {
    container: ContainerSize,
    len: usize,
    step_x: f64,
    scale_y: f64,
}

impl ViewportEngine {
    #[must_use]
    pub fn new(data: &DataSet, container: ContainerSize) -> Self {
        let len = data.len();
        let usable = container.is_valid();
        let step_x = if usable && len > 1 {
            container.width / (len - 1) as f64
        } else {
            0.0
        };
        let global_max = data.global_max_value();
        let scale_y = if usable && global_max > 0.0 {
            container.height / global_max
        } else {
            0.0
        };

        Self {
            container,
            len,
            step_x,
            scale_y,
        }
    }

    #[must_use]
    pub fn container(&self) -> ContainerSize {
        self.container
    }

    #[must_use]
    pub fn step_x(&self) -> f64 {
        self.step_x
    }

    #[must_use]
    pub fn scale_y(&self) -> f64 {
        self.scale_y
    }

    /// `false` when the data or the container cannot produce any geometry.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.step_x == 0.0
    }

    /// Computes the view window framing the selected part of the active series.
    ///
    /// `active = None` means every series. The result is a pure function of
    /// the inputs and never contains NaN or infinities.
    #[must_use]
    pub fn compute(
        &self,
        data: &DataSet,
        active: Option<&ActiveSeriesSet>,
        range: RangeSelection,
    ) -> Viewport {
        if self.is_degenerate() {
            return Viewport::EMPTY;
        }
        let Some(bounds) = index_bounds(self.len, range) else {
            return Viewport::EMPTY;
        };

        let max_visible_value = data.max_value_in(active, bounds.min_index, bounds.max_index);
        let origin_x = bounds.min_index as f64 * self.step_x;
        let width = (bounds.max_index - bounds.min_index) as f64 * self.step_x;
        let height = max_visible_value * self.scale_y;

        let viewport = Viewport {
            origin_x,
            origin_y: self.container.height - height,
            width,
            height,
            max_visible_value,
        };
        trace!(
            min_index = bounds.min_index,
            max_index = bounds.max_index,
            width = viewport.width,
            height = viewport.height,
            "computed viewport"
        );
        viewport
    }

    /// Container-space x coordinate of sample `index`.
    #[must_use]
    pub fn x_at(&self, index: usize) -> f64 {
        index as f64 * self.step_x
    }

    /// Container-space y coordinate of an ordinate value.
    #[must_use]
    pub fn y_of(&self, value: f64) -> f64 {
        self.container.height - value * self.scale_y
    }
}

/// One series projected into container pixel space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPath {
    pub id: SeriesId,
    pub color: String,
    pub points: Vec<(f64, f64)>,
}

/// Projects every series of `data` into container space once.
///
/// The paths never change afterwards; the view window alone decides which
/// part is shown.
#[must_use]
pub fn project_series_paths(data: &DataSet, engine: &ViewportEngine) -> Vec<SeriesPath> {
    if engine.is_degenerate() {
        return Vec::new();
    }

    let project = |(id, values): (&SeriesId, &Vec<f64>)| SeriesPath {
        id: id.clone(),
        color: data.colors.get(id).cloned().unwrap_or_default(),
        points: values
            .iter()
            .enumerate()
            .map(|(index, value)| (engine.x_at(index), engine.y_of(*value)))
            .collect(),
    };

    #[cfg(feature = "parallel-projection")]
    {
        use rayon::prelude::*;

        let entries: Vec<(&SeriesId, &Vec<f64>)> = data.series.iter().collect();
        entries.into_par_iter().map(project).collect()
    }

    #[cfg(not(feature = "parallel-projection"))]
    {
        data.series.iter().map(project).collect()
    }
}
