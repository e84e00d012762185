use std::time::Duration;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::animation::FrameOutcome;
use crate::core::{ActiveSeriesSet, DataSet, RangeSelection, RawDataItem, SeriesId, prepare_data_set};
use crate::error::{ChartError, ChartResult};
use crate::interaction::{MouseInput, PointerEvent, RangeSelector, TouchInput};
use crate::render::{RectPrimitive, RenderFrame, Renderer};
use crate::store::{ChartState, ChartStatePatch, ChartStore, StateObserver, StateSubscription};

use super::{ChartView, RangeChartConfig, ViewMode};

/// One chart widget: main graph, overview graph and the range selector on top
/// of the overview, all sharing a single [`ChartStore`].
///
/// The host forwards pointer input and calls [`RangeChart::on_frame`] on
/// every display refresh while [`RangeChart::needs_frame`] is `true`.
pub struct RangeChart<R: Renderer> {
    renderer: R,
    config: RangeChartConfig,
    data: DataSet,
    store: ChartStore,
    subscription: StateSubscription,
    selector: RangeSelector,
    main: ChartView,
    overview: ChartView,
    series_activity: IndexMap<SeriesId, bool>,
    dirty: bool,
}

impl<R: Renderer> RangeChart<R> {
    pub fn new(renderer: R, data: DataSet, config: RangeChartConfig) -> ChartResult<Self> {
        let config = config.validate()?;
        data.validate()?;

        let mut store = ChartStore::new(ChartState::new(config.initial_range()));
        let subscription = store.subscribe();
        let initial = store.state().clone();
        let selector = RangeSelector::new(config.selector_config(), initial.range)?
            .with_sink(store.patch_source());

        let main_mode = if config.range_driven {
            ViewMode::RangeDriven
        } else {
            ViewMode::Static
        };
        let main = ChartView::new(
            &data,
            config.main_container,
            main_mode,
            &initial,
            config.transition_duration(),
            Some(config.axis_config()),
        )?;
        let overview = ChartView::new(
            &data,
            config.overview_container,
            ViewMode::Static,
            &initial,
            config.transition_duration(),
            None,
        )?;

        let series_activity = data.series_ids().map(|id| (id.clone(), true)).collect();
        debug!(
            samples = data.len(),
            series = data.series.len(),
            min_value = initial.range.min_percent,
            max_value = initial.range.max_percent,
            "range chart created"
        );

        Ok(Self {
            renderer,
            config,
            data,
            store,
            subscription,
            selector,
            main,
            overview,
            series_activity,
            dirty: true,
        })
    }

    /// Normalizes a raw column item and builds the chart from it.
    pub fn from_raw(renderer: R, item: &RawDataItem, config: RangeChartConfig) -> ChartResult<Self> {
        let data = prepare_data_set(item)?;
        Self::new(renderer, data, config)
    }

    #[must_use]
    pub fn config(&self) -> &RangeChartConfig {
        &self.config
    }

    #[must_use]
    pub fn data(&self) -> &DataSet {
        &self.data
    }

    #[must_use]
    pub fn state(&self) -> &ChartState {
        self.store.state()
    }

    #[must_use]
    pub fn store(&self) -> &ChartStore {
        &self.store
    }

    #[must_use]
    pub fn selector(&self) -> &RangeSelector {
        &self.selector
    }

    #[must_use]
    pub fn main_view(&self) -> &ChartView {
        &self.main
    }

    #[must_use]
    pub fn overview_view(&self) -> &ChartView {
        &self.overview
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Registers a host observer of range and visibility changes.
    pub fn register_observer(&mut self, observer: Box<dyn StateObserver>) -> ChartResult<()> {
        self.store.register_observer(observer)
    }

    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        self.store.unregister_observer(observer_id)
    }

    /// Feeds one pointer event, in overview track coordinates, to the selector.
    ///
    /// Returns the range released to the store, if any. Handle moves held
    /// back by the throttle still mark the chart for redraw.
    pub fn pointer_event(&mut self, event: PointerEvent, now: Duration) -> Option<RangeSelection> {
        let before = self.selector.geometry();
        let released = self.selector.handle(event, now);
        if self.selector.geometry() != before {
            self.dirty = true;
        }
        self.sync(now);
        released
    }

    pub fn mouse_event(&mut self, input: MouseInput, now: Duration) -> Option<RangeSelection> {
        self.pointer_event(input.into(), now)
    }

    pub fn touch_event(&mut self, input: &TouchInput, now: Duration) -> Option<RangeSelection> {
        let event = input.to_pointer_event()?;
        self.pointer_event(event, now)
    }

    /// Programmatic range reset. The selector follows without emitting.
    pub fn set_range(&mut self, range: RangeSelection, now: Duration) -> ChartResult<()> {
        if !range.is_valid() {
            return Err(ChartError::InvalidData(format!(
                "range {}..{} must satisfy 0 <= min < max <= 100",
                range.min_percent, range.max_percent
            )));
        }
        self.selector.set_range(range);
        self.store.dispatch(ChartStatePatch::range(self.selector.value()));
        self.sync(now);
        Ok(())
    }

    /// Toggles one series and publishes the resulting ordered active set.
    pub fn set_series_active(&mut self, id: &str, active: bool, now: Duration) -> ChartResult<()> {
        let Some(entry) = self.series_activity.get_mut(id) else {
            return Err(ChartError::InvalidData(format!("unknown series `{id}`")));
        };
        *entry = active;

        let active_set: ActiveSeriesSet = self
            .series_activity
            .iter()
            .filter(|(_, active)| **active)
            .map(|(id, _)| id.clone())
            .collect();
        debug!(series = %id, active, visible = active_set.len(), "series activity changed");
        self.store
            .dispatch(ChartStatePatch::active_series(active_set));
        self.sync(now);
        Ok(())
    }

    #[must_use]
    pub fn is_series_active(&self, id: &str) -> bool {
        self.series_activity.get(id).copied().unwrap_or(false)
    }

    /// `true` while an animation, a throttled range or a redraw is pending.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.dirty
            || self.main.needs_frame()
            || self.overview.needs_frame()
            || self.selector.has_pending_emission()
    }

    /// Per-frame callback: releases throttled ranges, advances the transitions
    /// and renders when anything changed.
    ///
    /// Returns `true` when a frame was rendered.
    pub fn on_frame(&mut self, now: Duration) -> ChartResult<bool> {
        self.selector.poll(now);
        self.sync(now);

        let main = self.main.tick(now);
        let overview = self.overview.tick(now);
        let moved = matches!(main, FrameOutcome::Redraw(_))
            || matches!(overview, FrameOutcome::Redraw(_));
        trace!(?main, ?overview, dirty = self.dirty, "range chart frame");

        if moved || self.dirty {
            self.render()?;
            return Ok(true);
        }
        Ok(false)
    }

    /// Composes the main graph, the overview and the selector into one frame.
    #[must_use]
    pub fn build_frame(&self) -> RenderFrame {
        let style = &self.config.style;
        let mut frame = RenderFrame::new(self.config.frame_size());
        self.main.append_to_frame(&mut frame, 0.0, style);

        let top = self.config.overview_top();
        self.overview.append_to_frame(&mut frame, top, style);

        let height = self.config.overview_container.height;
        let geometry = self.selector.geometry();
        let right_edge = geometry.max_handle_x + geometry.handle_width;
        frame.rects.extend([
            RectPrimitive::new(0.0, top, geometry.min_handle_x, height, style.selector_shade_color),
            RectPrimitive::new(
                right_edge,
                top,
                (geometry.track_width - right_edge).max(0.0),
                height,
                style.selector_shade_color,
            ),
            RectPrimitive::new(
                geometry.window_x,
                top,
                geometry.window_width,
                height,
                style.selector_window_border_color.with_alpha(0.0),
            )
            .with_border(1.0, style.selector_window_border_color),
            RectPrimitive::new(
                geometry.min_handle_x,
                top,
                geometry.handle_width,
                height,
                style.selector_handle_color,
            ),
            RectPrimitive::new(
                geometry.max_handle_x,
                top,
                geometry.handle_width,
                height,
                style.selector_handle_color,
            ),
        ]);
        frame
    }

    pub fn render(&mut self) -> ChartResult<()> {
        let frame = self.build_frame();
        self.renderer.render(&frame)?;
        self.dirty = false;
        Ok(())
    }

    fn sync(&mut self, now: Duration) {
        self.store.poll_sources();
        for state in self.subscription.drain() {
            self.main.apply_state(&self.data, &state, now);
            self.overview.apply_state(&self.data, &state, now);
            self.dirty = true;
        }
    }
}

impl<R: Renderer + std::fmt::Debug> std::fmt::Debug for RangeChart<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeChart")
            .field("renderer", &self.renderer)
            .field("state", self.store.state())
            .field("selector", &self.selector)
            .field("main", &self.main)
            .field("overview", &self.overview)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}
