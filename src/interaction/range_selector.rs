use std::time::Duration;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::RangeSelection;
use crate::error::{ChartError, ChartResult};
use crate::store::{ChartStatePatch, PatchSender};

use super::{PointerEvent, PointerId, PointerPhase, Throttle};

/// Gesture state of the selector. Only one drag is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragState {
    Idle,
    DraggingMinHandle,
    DraggingMaxHandle,
    DraggingWindow,
}

/// Element of the selector a pointer-down landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DragTarget {
    MinHandle,
    MaxHandle,
    Window,
}

impl DragTarget {
    const fn drag_state(self) -> DragState {
        match self {
            Self::MinHandle => DragState::DraggingMinHandle,
            Self::MaxHandle => DragState::DraggingMaxHandle,
            Self::Window => DragState::DraggingWindow,
        }
    }
}

/// Track layout and emission tuning of a range selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeSelectorConfig {
    /// Left edge of the track in pointer coordinates.
    pub track_left: f64,
    pub track_width: f64,
    pub handle_width: f64,
    /// Minimum distance between the two handle positions.
    pub min_interval_px: f64,
    pub throttle_pause: Duration,
}

impl RangeSelectorConfig {
    #[must_use]
    pub fn new(track_width: f64) -> Self {
        Self {
            track_left: 0.0,
            track_width,
            handle_width: 0.0,
            min_interval_px: 20.0,
            throttle_pause: Duration::from_millis(250),
        }
    }

    #[must_use]
    pub fn with_track_left(mut self, track_left: f64) -> Self {
        self.track_left = track_left;
        self
    }

    #[must_use]
    pub fn with_handle_width(mut self, handle_width: f64) -> Self {
        self.handle_width = handle_width;
        self
    }

    #[must_use]
    pub fn with_min_interval_px(mut self, min_interval_px: f64) -> Self {
        self.min_interval_px = min_interval_px;
        self
    }

    #[must_use]
    pub fn with_throttle_pause(mut self, throttle_pause: Duration) -> Self {
        self.throttle_pause = throttle_pause;
        self
    }

    /// Width the handle positions can span.
    #[must_use]
    pub fn available_width(self) -> f64 {
        self.track_width - self.handle_width
    }

    pub fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("track_left", self.track_left),
            ("track_width", self.track_width),
            ("handle_width", self.handle_width),
            ("min_interval_px", self.min_interval_px),
        ] {
            if !value.is_finite() {
                return Err(ChartError::InvalidConfig(format!(
                    "range selector `{name}` must be finite"
                )));
            }
        }
        if self.handle_width < 0.0 || self.min_interval_px < 0.0 {
            return Err(ChartError::InvalidConfig(
                "range selector handle width and min interval must be >= 0".to_owned(),
            ));
        }
        if self.available_width() <= self.min_interval_px {
            return Err(ChartError::InvalidConfig(format!(
                "range selector track ({}px minus {}px handle) must be wider than the {}px minimum interval",
                self.track_width, self.handle_width, self.min_interval_px
            )));
        }
        Ok(self)
    }
}

/// Track-relative geometry of the selector for drawing and hit testing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectorGeometry {
    pub min_handle_x: f64,
    pub max_handle_x: f64,
    pub handle_width: f64,
    pub window_x: f64,
    pub window_width: f64,
    pub track_width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragOrigin {
    pointer_x: f64,
    min_position: f64,
    max_position: f64,
}

/// Dual-handle range selector turning pointer gestures into range percentages.
///
/// Both handle positions are absolute offsets from the track's left edge:
/// `min_value = min_position / available * 100` and
/// `max_value = max_position / available * 100`. After every gesture
/// `max_position - min_position >= min_interval_px`.
#[derive(Debug)]
pub struct RangeSelector {
    config: RangeSelectorConfig,
    min_position: f64,
    max_position: f64,
    state: DragState,
    active_pointer: Option<PointerId>,
    drag_origin: Option<DragOrigin>,
    last_value: RangeSelection,
    last_emitted: RangeSelection,
    throttle: Throttle<RangeSelection>,
    sink: Option<PatchSender>,
}

impl RangeSelector {
    pub fn new(config: RangeSelectorConfig, initial: RangeSelection) -> ChartResult<Self> {
        let config = config.validate()?;
        let (min_position, max_position) = positions_for(config, initial);
        let mut selector = Self {
            config,
            min_position,
            max_position,
            state: DragState::Idle,
            active_pointer: None,
            drag_origin: None,
            last_value: initial,
            last_emitted: initial,
            throttle: Throttle::new(config.throttle_pause),
            sink: None,
        };
        selector.last_value = selector.value();
        selector.last_emitted = selector.last_value;
        Ok(selector)
    }

    /// Forwards every emitted range to a store patch source.
    #[must_use]
    pub fn with_sink(mut self, sink: PatchSender) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn set_sink(&mut self, sink: Option<PatchSender>) {
        self.sink = sink;
    }

    #[must_use]
    pub fn config(&self) -> RangeSelectorConfig {
        self.config
    }

    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    #[must_use]
    pub fn active_pointer(&self) -> Option<PointerId> {
        self.active_pointer
    }

    #[must_use]
    pub fn min_position(&self) -> f64 {
        self.min_position
    }

    #[must_use]
    pub fn max_position(&self) -> f64 {
        self.max_position
    }

    #[must_use]
    pub fn available_width(&self) -> f64 {
        self.config.available_width()
    }

    /// Range for the current handle positions, rounded to two decimals.
    #[must_use]
    pub fn value(&self) -> RangeSelection {
        let available = self.available_width();
        RangeSelection::new(
            round_percent(self.min_position / available * 100.0),
            round_percent(self.max_position / available * 100.0),
        )
    }

    /// Last range handed to the store.
    #[must_use]
    pub fn last_emitted(&self) -> RangeSelection {
        self.last_emitted
    }

    #[must_use]
    pub fn has_pending_emission(&self) -> bool {
        self.throttle.has_pending()
    }

    #[must_use]
    pub fn geometry(&self) -> SelectorGeometry {
        let handle_width = self.config.handle_width;
        let window_x = self.min_position + handle_width;
        SelectorGeometry {
            min_handle_x: self.min_position,
            max_handle_x: self.max_position,
            handle_width,
            window_x,
            window_width: (self.max_position - window_x).max(0.0),
            track_width: self.config.track_width,
        }
    }

    /// Element under the pointer coordinate `x`, handles first.
    #[must_use]
    pub fn hit_test(&self, x: f64) -> Option<DragTarget> {
        let local = x - self.config.track_left;
        let handle = self.config.handle_width;
        if local >= self.min_position && local <= self.min_position + handle {
            return Some(DragTarget::MinHandle);
        }
        if local >= self.max_position && local <= self.max_position + handle {
            return Some(DragTarget::MaxHandle);
        }
        if local > self.min_position + handle && local < self.max_position {
            return Some(DragTarget::Window);
        }
        None
    }

    /// Dispatches a unified pointer event. Returns a range released for emission.
    pub fn handle(&mut self, event: PointerEvent, now: Duration) -> Option<RangeSelection> {
        match event.phase {
            PointerPhase::Down => {
                self.pointer_down(event);
                None
            }
            PointerPhase::Move => self.pointer_move(event, now),
            PointerPhase::Up => {
                self.pointer_up(event);
                None
            }
        }
    }

    /// Starts a drag on whatever element lies under the pointer.
    ///
    /// Returns `false` when the pointer missed the selector.
    pub fn pointer_down(&mut self, event: PointerEvent) -> bool {
        match self.hit_test(event.x) {
            Some(target) => {
                self.pointer_down_on(target, event);
                true
            }
            None => false,
        }
    }

    /// Starts a drag on an element resolved by the host.
    pub fn pointer_down_on(&mut self, target: DragTarget, event: PointerEvent) {
        self.state = target.drag_state();
        self.active_pointer = Some(event.id);
        self.drag_origin = Some(DragOrigin {
            pointer_x: event.x,
            min_position: self.min_position,
            max_position: self.max_position,
        });
        debug!(state = ?self.state, pointer = ?event.id, "range selector drag started");
    }

    /// Moves the dragged element; a move while idle is ignored.
    pub fn pointer_move(&mut self, event: PointerEvent, now: Duration) -> Option<RangeSelection> {
        let local = event.x - self.config.track_left;
        let available = self.available_width();
        let gap = self.config.min_interval_px;

        match self.state {
            DragState::Idle => return None,
            DragState::DraggingMinHandle => {
                self.min_position = local.max(0.0).min(lower_with_gap(self.max_position, gap));
            }
            DragState::DraggingMaxHandle => {
                self.max_position = local
                    .min(available)
                    .max(upper_with_gap(self.min_position, gap));
            }
            DragState::DraggingWindow => {
                let origin = self.drag_origin?;
                let delta = event.x - origin.pointer_x;
                let span = origin.max_position - origin.min_position;
                if origin.min_position + delta < 0.0 {
                    self.min_position = 0.0;
                    self.max_position = span;
                } else if origin.max_position + delta > available {
                    self.max_position = available;
                    self.min_position = available - span;
                } else {
                    self.min_position = origin.min_position + delta;
                    self.max_position = origin.max_position + delta;
                }
                if self.max_position - self.min_position < gap {
                    self.min_position = lower_with_gap(self.max_position, gap);
                }
            }
        }
        trace!(
            min_position = self.min_position,
            max_position = self.max_position,
            "range selector moved"
        );

        let value = self.value();
        if value == self.last_value {
            return None;
        }
        self.last_value = value;
        let released = self.throttle.push(value, now)?;
        self.emit(released)
    }

    /// Ends the current drag. Pending throttled values are still released by [`Self::poll`].
    pub fn pointer_up(&mut self, _event: PointerEvent) {
        if self.state != DragState::Idle {
            debug!(state = ?self.state, "range selector drag ended");
        }
        self.state = DragState::Idle;
        self.active_pointer = None;
        self.drag_origin = None;
    }

    /// Releases the trailing throttled range once its window has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<RangeSelection> {
        let released = self.throttle.poll(now)?;
        self.emit(released)
    }

    /// Releases any pending range immediately.
    pub fn flush(&mut self) -> Option<RangeSelection> {
        let released = self.throttle.flush()?;
        self.emit(released)
    }

    /// Applies a programmatic range without emitting it.
    pub fn set_range(&mut self, range: RangeSelection) {
        let (min_position, max_position) = positions_for(self.config, range);
        self.min_position = min_position;
        self.max_position = max_position;
        self.last_value = self.value();
        self.last_emitted = self.last_value;
        self.throttle.flush();
    }

    /// Changes the track width while keeping the selected percentages.
    pub fn resize(&mut self, track_width: f64) -> ChartResult<()> {
        let config = RangeSelectorConfig {
            track_width,
            ..self.config
        }
        .validate()?;
        let range = self.value();
        self.config = config;
        let (min_position, max_position) = positions_for(config, range);
        self.min_position = min_position;
        self.max_position = max_position;
        Ok(())
    }

    fn emit(&mut self, value: RangeSelection) -> Option<RangeSelection> {
        if value == self.last_emitted {
            return None;
        }
        self.last_emitted = value;
        let disconnected = self
            .sink
            .as_ref()
            .is_some_and(|sink| !sink.send(ChartStatePatch::range(value)));
        if disconnected {
            debug!("range selector sink disconnected");
            self.sink = None;
        }
        Some(value)
    }
}

/// Handle positions for a range, pushed apart to respect the minimum interval.
fn positions_for(config: RangeSelectorConfig, range: RangeSelection) -> (f64, f64) {
    let available = config.available_width();
    let gap = config.min_interval_px;
    let range = range.clamped();
    let mut min_position = available * range.min_percent / 100.0;
    let mut max_position = available * range.max_percent / 100.0;
    if max_position - min_position < gap {
        max_position = (min_position + gap).min(available);
        min_position = lower_with_gap(max_position, gap);
    }
    (min_position, max_position)
}

/// Largest non-negative offset at least `gap` below `upper`.
fn lower_with_gap(upper: f64, gap: f64) -> f64 {
    let mut lower = (upper - gap).max(0.0);
    while lower > 0.0 && upper - lower < gap {
        lower = f64::from_bits(lower.to_bits() - 1);
    }
    lower
}

/// Smallest offset at least `gap` above a non-negative `lower`.
fn upper_with_gap(lower: f64, gap: f64) -> f64 {
    let mut upper = lower + gap;
    while upper - lower < gap {
        upper = f64::from_bits(upper.to_bits() + 1);
    }
    upper
}

/// Rounds a percentage to two decimals, halves away from zero.
#[must_use]
pub fn round_percent(value: f64) -> f64 {
    Decimal::from_f64(value)
        .map(|decimal| decimal.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|decimal| decimal.to_f64())
        .unwrap_or(value)
}
