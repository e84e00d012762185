use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{DataSet, IndexBounds, ViewportEngine};
use crate::error::{ChartError, ChartResult};

use super::{
    AxisLabelFormatter, DEFAULT_GRIDLINE_TOLERANCE, DecimalLabelFormatter, LabelSetRing,
    UtcDateLabelFormatter, nice_gridline_values, select_label_indices,
};

/// Sizes of the label rings and the gridline search tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRotatorConfig {
    pub gridline_count: usize,
    pub gridline_sets: usize,
    pub gridline_tolerance: f64,
    pub date_label_count: usize,
    pub date_label_sets: usize,
}

impl Default for AxisRotatorConfig {
    fn default() -> Self {
        Self {
            gridline_count: 5,
            gridline_sets: 2,
            gridline_tolerance: DEFAULT_GRIDLINE_TOLERANCE,
            date_label_count: 6,
            date_label_sets: 2,
        }
    }
}

impl AxisRotatorConfig {
    pub fn validate(self) -> ChartResult<Self> {
        if self.gridline_count == 0 {
            return Err(ChartError::InvalidConfig(
                "gridline count must be > 0".to_owned(),
            ));
        }
        if !self.gridline_tolerance.is_finite() || self.gridline_tolerance <= 1.0 {
            return Err(ChartError::InvalidConfig(
                "gridline tolerance must be finite and > 1".to_owned(),
            ));
        }
        if self.date_label_count < 2 {
            return Err(ChartError::InvalidConfig(
                "date label count must be >= 2".to_owned(),
            ));
        }
        if self.gridline_sets < 2 || self.date_label_sets < 2 {
            return Err(ChartError::InvalidConfig(
                "label rings need at least two sets".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Keeps gridlines and date labels in sync with the visible window.
///
/// Gridlines are recomputed only when the maximum visible value changes and
/// date labels only when the visible index window changes. Each
/// recompute rotates its ring so the previous set is never cleared before
/// the new one is ready.
pub struct AxisRotator {
    config: AxisRotatorConfig,
    gridlines: LabelSetRing,
    dates: LabelSetRing,
    gridline_key: Option<OrderedFloat<f64>>,
    date_key: Option<IndexBounds>,
    value_formatter: Box<dyn AxisLabelFormatter>,
    date_formatter: Box<dyn AxisLabelFormatter>,
}

impl AxisRotator {
    pub fn new(config: AxisRotatorConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        Ok(Self {
            config,
            gridlines: LabelSetRing::new(config.gridline_sets, config.gridline_count),
            dates: LabelSetRing::new(config.date_label_sets, config.date_label_count),
            gridline_key: None,
            date_key: None,
            value_formatter: Box::new(DecimalLabelFormatter::default()),
            date_formatter: Box::new(UtcDateLabelFormatter::default()),
        })
    }

    #[must_use]
    pub fn with_value_formatter(mut self, formatter: Box<dyn AxisLabelFormatter>) -> Self {
        self.value_formatter = formatter;
        self.invalidate();
        self
    }

    #[must_use]
    pub fn with_date_formatter(mut self, formatter: Box<dyn AxisLabelFormatter>) -> Self {
        self.date_formatter = formatter;
        self.invalidate();
        self
    }

    #[must_use]
    pub fn config(&self) -> AxisRotatorConfig {
        self.config
    }

    #[must_use]
    pub fn gridlines(&self) -> &LabelSetRing {
        &self.gridlines
    }

    #[must_use]
    pub fn dates(&self) -> &LabelSetRing {
        &self.dates
    }

    /// Forgets the memoized inputs so the next updates rotate unconditionally.
    pub fn invalidate(&mut self) {
        self.gridline_key = None;
        self.date_key = None;
    }

    /// Rotates the gridline ring for a new maximum visible value.
    ///
    /// Returns `false` when the value is unchanged and nothing was rewritten.
    pub fn update_gridlines(&mut self, max_visible_value: f64, engine: &ViewportEngine) -> bool {
        let key = OrderedFloat(max_visible_value);
        if self.gridline_key == Some(key) {
            return false;
        }
        self.gridline_key = Some(key);

        let values = nice_gridline_values(
            max_visible_value,
            self.config.gridline_count,
            self.config.gridline_tolerance,
        );
        let visible = self.gridlines.rotate(
            values.iter().map(|value| (engine.y_of(*value), *value)),
            self.value_formatter.as_ref(),
        );
        debug!(max_visible_value, visible, "gridlines rotated");
        true
    }

    /// Rotates the date label ring for the visible index window.
    ///
    /// `None` bounds hide the labels. Returns `false` when the window is
    /// unchanged.
    pub fn update_dates(
        &mut self,
        data: &DataSet,
        bounds: Option<IndexBounds>,
        engine: &ViewportEngine,
    ) -> bool {
        let Some(bounds) = bounds else {
            if self.date_key.take().is_some() {
                self.dates.hide();
            }
            return false;
        };
        if bounds.min_index > bounds.max_index || bounds.max_index >= data.x_values.len() {
            return false;
        }
        if self.date_key == Some(bounds) {
            return false;
        }
        self.date_key = Some(bounds);

        let visible_len = bounds.max_index - bounds.min_index + 1;
        let indices = select_label_indices(visible_len, self.config.date_label_count);
        let x_values = &data.x_values;
        let visible = self.dates.rotate(
            indices.into_iter().map(|offset| {
                let index = bounds.min_index + offset;
                (engine.x_at(index), x_values[index])
            }),
            self.date_formatter.as_ref(),
        );
        debug!(
            min_index = bounds.min_index,
            max_index = bounds.max_index,
            visible,
            "date labels rotated"
        );
        true
    }
}

impl std::fmt::Debug for AxisRotator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AxisRotator")
            .field("config", &self.config)
            .field("gridlines", &self.gridlines)
            .field("dates", &self.dates)
            .field("gridline_key", &self.gridline_key)
            .field("date_key", &self.date_key)
            .finish_non_exhaustive()
    }
}
