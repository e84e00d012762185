use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::animation::{FrameOutcome, TransitionController};
use crate::axis::{AxisRotator, AxisRotatorConfig};
use crate::core::{
    ActiveSeriesSet, ContainerSize, DataSet, RangeSelection, SeriesPath, Viewport, ViewportEngine,
    index_bounds, project_series_paths,
};
use crate::error::ChartResult;
use crate::render::{Color, LinePrimitive, RenderFrame, TextHAlign, TextPrimitive};
use crate::store::ChartState;

use super::RangeChartStyle;

/// How a view reacts to range changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    /// Follows the selected range and keeps gridlines and date labels.
    RangeDriven,
    /// Always frames the full range; only visibility changes move it.
    Static,
}

/// One line graph bound to a container.
///
/// Series are projected once at construction; store states only move the
/// view window, animated by a [`TransitionController`].
#[derive(Debug)]
pub struct ChartView {
    mode: ViewMode,
    engine: ViewportEngine,
    paths: Vec<SeriesPath>,
    transition: TransitionController,
    rotator: Option<AxisRotator>,
    active: Option<ActiveSeriesSet>,
    replay_pending: bool,
}

impl ChartView {
    /// Builds a view already showing `initial`.
    ///
    /// `axis` is only used in range-driven mode. The first state received
    /// afterwards is assumed to be the store replay of `initial` and is skipped.
    pub fn new(
        data: &DataSet,
        container: ContainerSize,
        mode: ViewMode,
        initial: &ChartState,
        duration: Duration,
        axis: Option<AxisRotatorConfig>,
    ) -> ChartResult<Self> {
        let container = container.validate()?;
        let engine = ViewportEngine::new(data, container);
        if engine.is_degenerate() {
            warn!(
                samples = data.len(),
                "chart view has no drawable geometry for this data set"
            );
        }

        let range = view_range(mode, initial.range);
        let viewport = engine.compute(data, initial.active_series.as_ref(), range);
        let rotator = match (mode, axis) {
            (ViewMode::RangeDriven, Some(config)) => {
                let mut rotator = AxisRotator::new(config)?;
                rotator.update_gridlines(viewport.max_visible_value, &engine);
                rotator.update_dates(data, index_bounds(data.len(), range), &engine);
                Some(rotator)
            }
            _ => None,
        };

        Ok(Self {
            mode,
            paths: project_series_paths(data, &engine),
            engine,
            transition: TransitionController::new(viewport, duration),
            rotator,
            active: initial.active_series.clone(),
            replay_pending: true,
        })
    }

    #[must_use]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    #[must_use]
    pub fn engine(&self) -> &ViewportEngine {
        &self.engine
    }

    #[must_use]
    pub fn paths(&self) -> &[SeriesPath] {
        &self.paths
    }

    #[must_use]
    pub fn rotator(&self) -> Option<&AxisRotator> {
        self.rotator.as_ref()
    }

    #[must_use]
    pub fn active_series(&self) -> Option<&ActiveSeriesSet> {
        self.active.as_ref()
    }

    #[must_use]
    pub fn is_series_visible(&self, id: &str) -> bool {
        self.active.as_ref().is_none_or(|active| active.contains(id))
    }

    /// Rendered viewport as of the last frame.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.transition.current()
    }

    #[must_use]
    pub fn target(&self) -> Viewport {
        self.transition.target()
    }

    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.transition.needs_frame()
    }

    /// Reacts to one published store state.
    ///
    /// Returns `true` when a transition towards a new window was started.
    pub fn apply_state(&mut self, data: &DataSet, state: &ChartState, now: Duration) -> bool {
        if self.replay_pending {
            self.replay_pending = false;
            trace!(mode = ?self.mode, "skipping replayed chart state");
            return false;
        }

        let active_changed = self.active != state.active_series;
        if active_changed {
            self.active = state.active_series.clone();
            debug!(
                mode = ?self.mode,
                active = self.active.as_ref().map(ActiveSeriesSet::len),
                "chart view series visibility changed"
            );
        }
        if self.mode == ViewMode::Static && !active_changed {
            return false;
        }

        let range = view_range(self.mode, state.range);
        let target = self.engine.compute(data, self.active.as_ref(), range);
        if let Some(rotator) = &mut self.rotator {
            rotator.update_gridlines(target.max_visible_value, &self.engine);
            rotator.update_dates(data, index_bounds(data.len(), range), &self.engine);
        }

        if self.active.as_ref().is_some_and(ActiveSeriesSet::is_empty) {
            trace!(mode = ?self.mode, "no active series, transition skipped");
            return false;
        }
        self.transition.retarget(target, now)
    }

    pub fn tick(&mut self, now: Duration) -> FrameOutcome {
        self.transition.tick(now)
    }

    /// Appends this view's primitives to `frame`, shifted down by `top`.
    pub fn append_to_frame(&self, frame: &mut RenderFrame, top: f64, style: &RangeChartStyle) {
        let viewport = self.viewport();
        let container = self.engine.container();
        if !viewport.is_drawable() {
            trace!(mode = ?self.mode, "viewport not drawable, view skipped");
            return;
        }

        for path in &self.paths {
            if !self.is_series_visible(path.id.as_str()) {
                continue;
            }
            let color = Color::from_hex(&path.color).unwrap_or(style.fallback_series_color);
            for pair in path.points.windows(2) {
                let (Some((x1, y1)), Some((x2, y2))) = (
                    viewport.project(pair[0].0, pair[0].1, container),
                    viewport.project(pair[1].0, pair[1].1, container),
                ) else {
                    continue;
                };
                if x2 < 0.0 || x1 > container.width {
                    continue;
                }
                frame.lines.push(LinePrimitive::new(
                    x1,
                    y1 + top,
                    x2,
                    y2 + top,
                    style.series_stroke_width,
                    color,
                ));
            }
        }

        if self.mode == ViewMode::RangeDriven {
            self.append_axes(frame, viewport, top, style);
        }
    }

    fn append_axes(
        &self,
        frame: &mut RenderFrame,
        viewport: Viewport,
        top: f64,
        style: &RangeChartStyle,
    ) {
        let container = self.engine.container();
        let font = style.label_font_size_px;

        let baseline_y = top + container.height - 1.0;
        frame.lines.push(LinePrimitive::new(
            0.0,
            baseline_y,
            container.width,
            baseline_y,
            1.0,
            style.baseline_color,
        ));
        frame.texts.push(TextPrimitive::new(
            "0",
            0.0,
            baseline_y - font - 2.0,
            font,
            style.label_color,
            TextHAlign::Left,
        ));

        let Some(rotator) = &self.rotator else {
            return;
        };

        if let Some(gridlines) = rotator.gridlines().active_set() {
            for slot in gridlines.visible_slots() {
                let Some((_, y)) = viewport.project(0.0, slot.position, container) else {
                    continue;
                };
                if !(0.0..=container.height).contains(&y) {
                    continue;
                }
                let y = y + top;
                frame.lines.push(LinePrimitive::new(
                    0.0,
                    y,
                    container.width,
                    y,
                    1.0,
                    style.gridline_color,
                ));
                if !slot.text.is_empty() {
                    frame.texts.push(TextPrimitive::new(
                        slot.text.clone(),
                        0.0,
                        y - font - 2.0,
                        font,
                        style.label_color,
                        TextHAlign::Left,
                    ));
                }
            }
        }

        if let Some(dates) = rotator.dates().active_set() {
            let y = top + container.height + 4.0;
            for slot in dates.visible_slots() {
                let Some((x, _)) = viewport.project(slot.position, 0.0, container) else {
                    continue;
                };
                if slot.text.is_empty() || !(0.0..=container.width).contains(&x) {
                    continue;
                }
                frame.texts.push(TextPrimitive::new(
                    slot.text.clone(),
                    x,
                    y,
                    font,
                    style.label_color,
                    TextHAlign::Center,
                ));
            }
        }
    }
}

fn view_range(mode: ViewMode, range: RangeSelection) -> RangeSelection {
    match mode {
        ViewMode::RangeDriven => range,
        ViewMode::Static => RangeSelection::FULL,
    }
}
