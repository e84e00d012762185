use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::axis::{AxisRotatorConfig, DEFAULT_GRIDLINE_TOLERANCE};
use crate::core::{ContainerSize, RangeSelection};
use crate::error::{ChartError, ChartResult};
use crate::interaction::RangeSelectorConfig;
use crate::render::Color;

/// Colors and stroke sizes used when composing a chart frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeChartStyle {
    pub series_stroke_width: f64,
    /// Used for series whose color string cannot be parsed.
    pub fallback_series_color: Color,
    pub gridline_color: Color,
    pub baseline_color: Color,
    pub label_color: Color,
    pub label_font_size_px: f64,
    pub selector_shade_color: Color,
    pub selector_handle_color: Color,
    pub selector_window_border_color: Color,
}

impl Default for RangeChartStyle {
    fn default() -> Self {
        Self {
            series_stroke_width: 2.0,
            fallback_series_color: Color::rgb(0.24, 0.76, 0.25),
            gridline_color: Color::rgba(0.0, 0.0, 0.0, 0.1),
            baseline_color: Color::rgba(0.0, 0.0, 0.0, 0.25),
            label_color: Color::rgb(0.59, 0.64, 0.68),
            label_font_size_px: 11.0,
            selector_shade_color: Color::rgba(0.96, 0.98, 0.98, 0.8),
            selector_handle_color: Color::rgba(0.87, 0.92, 0.94, 1.0),
            selector_window_border_color: Color::rgba(0.87, 0.92, 0.94, 1.0),
        }
    }
}

/// Public bootstrap configuration of a [`super::RangeChart`].
///
/// Every option except the two container sizes has a default, so host
/// applications can load partial JSON documents.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeChartConfig {
    pub main_container: ContainerSize,
    pub overview_container: ContainerSize,
    /// Vertical space between the main graph and the overview; date labels live there.
    #[serde(default = "default_overview_gap_px")]
    pub overview_gap_px: f64,
    #[serde(default = "default_min_value", rename = "minValue")]
    pub min_value: f64,
    #[serde(default = "default_max_value", rename = "maxValue")]
    pub max_value: f64,
    #[serde(default = "default_throttle_pause_ms")]
    pub throttle_pause_ms: u64,
    #[serde(default = "default_min_interval_px")]
    pub min_interval_px: f64,
    #[serde(default = "default_handle_width_px")]
    pub handle_width_px: f64,
    #[serde(default = "default_gridline_count")]
    pub gridline_count: usize,
    #[serde(default = "default_set_count")]
    pub gridline_sets: usize,
    #[serde(default = "default_gridline_tolerance")]
    pub gridline_tolerance: f64,
    #[serde(default = "default_date_label_count")]
    pub date_label_count: usize,
    #[serde(default = "default_set_count")]
    pub date_label_sets: usize,
    #[serde(default = "default_transition_duration_ms")]
    pub transition_duration_ms: u64,
    /// `false` freezes the main graph on the full range; only visibility changes move it.
    #[serde(default = "default_range_driven")]
    pub range_driven: bool,
    #[serde(default)]
    pub style: RangeChartStyle,
}

impl RangeChartConfig {
    #[must_use]
    pub fn new(main_container: ContainerSize, overview_container: ContainerSize) -> Self {
        Self {
            main_container,
            overview_container,
            overview_gap_px: default_overview_gap_px(),
            min_value: default_min_value(),
            max_value: default_max_value(),
            throttle_pause_ms: default_throttle_pause_ms(),
            min_interval_px: default_min_interval_px(),
            handle_width_px: default_handle_width_px(),
            gridline_count: default_gridline_count(),
            gridline_sets: default_set_count(),
            gridline_tolerance: default_gridline_tolerance(),
            date_label_count: default_date_label_count(),
            date_label_sets: default_set_count(),
            transition_duration_ms: default_transition_duration_ms(),
            range_driven: default_range_driven(),
            style: RangeChartStyle::default(),
        }
    }

    /// Sets the initial range percentages.
    #[must_use]
    pub fn with_range(mut self, min_value: f64, max_value: f64) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    #[must_use]
    pub fn with_overview_gap_px(mut self, overview_gap_px: f64) -> Self {
        self.overview_gap_px = overview_gap_px;
        self
    }

    #[must_use]
    pub fn with_throttle_pause_ms(mut self, throttle_pause_ms: u64) -> Self {
        self.throttle_pause_ms = throttle_pause_ms;
        self
    }

    #[must_use]
    pub fn with_min_interval_px(mut self, min_interval_px: f64) -> Self {
        self.min_interval_px = min_interval_px;
        self
    }

    #[must_use]
    pub fn with_handle_width_px(mut self, handle_width_px: f64) -> Self {
        self.handle_width_px = handle_width_px;
        self
    }

    /// Sets the gridline count per set and the number of rotated sets.
    #[must_use]
    pub fn with_gridlines(mut self, count: usize, sets: usize) -> Self {
        self.gridline_count = count;
        self.gridline_sets = sets;
        self
    }

    #[must_use]
    pub fn with_gridline_tolerance(mut self, tolerance: f64) -> Self {
        self.gridline_tolerance = tolerance;
        self
    }

    /// Sets the date label count per set and the number of rotated sets.
    #[must_use]
    pub fn with_date_labels(mut self, count: usize, sets: usize) -> Self {
        self.date_label_count = count;
        self.date_label_sets = sets;
        self
    }

    #[must_use]
    pub fn with_transition_duration_ms(mut self, transition_duration_ms: u64) -> Self {
        self.transition_duration_ms = transition_duration_ms;
        self
    }

    #[must_use]
    pub fn with_range_driven(mut self, range_driven: bool) -> Self {
        self.range_driven = range_driven;
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: RangeChartStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn initial_range(&self) -> RangeSelection {
        RangeSelection::new(self.min_value, self.max_value)
    }

    #[must_use]
    pub fn throttle_pause(&self) -> Duration {
        Duration::from_millis(self.throttle_pause_ms)
    }

    #[must_use]
    pub fn transition_duration(&self) -> Duration {
        Duration::from_millis(self.transition_duration_ms)
    }

    #[must_use]
    pub fn axis_config(&self) -> AxisRotatorConfig {
        AxisRotatorConfig {
            gridline_count: self.gridline_count,
            gridline_sets: self.gridline_sets,
            gridline_tolerance: self.gridline_tolerance,
            date_label_count: self.date_label_count,
            date_label_sets: self.date_label_sets,
        }
    }

    /// Selector spanning the overview container.
    #[must_use]
    pub fn selector_config(&self) -> RangeSelectorConfig {
        RangeSelectorConfig::new(self.overview_container.width)
            .with_handle_width(self.handle_width_px)
            .with_min_interval_px(self.min_interval_px)
            .with_throttle_pause(self.throttle_pause())
    }

    /// Vertical offset of the overview inside the composed frame.
    #[must_use]
    pub fn overview_top(&self) -> f64 {
        self.main_container.height + self.overview_gap_px
    }

    /// Size of the frame holding the main graph, the gap and the overview.
    #[must_use]
    pub fn frame_size(&self) -> ContainerSize {
        ContainerSize::new(
            self.main_container.width.max(self.overview_container.width),
            self.overview_top() + self.overview_container.height,
        )
    }

    pub fn validate(self) -> ChartResult<Self> {
        self.main_container.validate()?;
        self.overview_container.validate()?;
        if !self.overview_gap_px.is_finite() || self.overview_gap_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "overview gap must be finite and >= 0".to_owned(),
            ));
        }
        if !self.initial_range().is_valid() {
            return Err(ChartError::InvalidConfig(format!(
                "initial range {}..{} must satisfy 0 <= min < max <= 100",
                self.min_value, self.max_value
            )));
        }
        if self.transition_duration_ms == 0 {
            return Err(ChartError::InvalidConfig(
                "transition duration must be > 0".to_owned(),
            ));
        }
        if !self.style.series_stroke_width.is_finite() || self.style.series_stroke_width <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "series stroke width must be finite and > 0".to_owned(),
            ));
        }
        if !self.style.label_font_size_px.is_finite() || self.style.label_font_size_px <= 0.0 {
            return Err(ChartError::InvalidConfig(
                "label font size must be finite and > 0".to_owned(),
            ));
        }
        for color in [
            self.style.fallback_series_color,
            self.style.gridline_color,
            self.style.baseline_color,
            self.style.label_color,
            self.style.selector_shade_color,
            self.style.selector_handle_color,
            self.style.selector_window_border_color,
        ] {
            color
                .validate()
                .map_err(|err| ChartError::InvalidConfig(format!("style: {err}")))?;
        }
        self.axis_config().validate()?;
        self.selector_config().validate()?;
        Ok(self)
    }

    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse range chart config: {e}"))
        })?;
        config.validate()
    }

    pub fn to_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize range chart config: {e}"))
        })
    }
}

fn default_overview_gap_px() -> f64 {
    24.0
}

fn default_min_value() -> f64 {
    5.0
}

fn default_max_value() -> f64 {
    95.0
}

fn default_throttle_pause_ms() -> u64 {
    250
}

fn default_min_interval_px() -> f64 {
    20.0
}

fn default_handle_width_px() -> f64 {
    10.0
}

fn default_gridline_count() -> usize {
    5
}

fn default_set_count() -> usize {
    2
}

fn default_gridline_tolerance() -> f64 {
    DEFAULT_GRIDLINE_TOLERANCE
}

fn default_date_label_count() -> usize {
    6
}

fn default_transition_duration_ms() -> u64 {
    250
}

fn default_range_driven() -> bool {
    true
}
