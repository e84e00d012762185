use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::Viewport;

/// In-flight interpolation between two viewports.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportTransition {
    pub from: Viewport,
    pub to: Viewport,
    pub started_at: Duration,
}

/// Result of advancing the controller by one display frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FrameOutcome {
    /// The rendered window changed and must be redrawn.
    Redraw(Viewport),
    /// The window did not move since the last frame.
    Unchanged,
    /// No transition is running.
    Idle,
}

/// Interpolates the rendered viewport towards the latest target.
///
/// The host calls [`TransitionController::tick`] once per display refresh
/// with a monotonic timestamp while [`TransitionController::needs_frame`] is
/// `true`. Retargeting mid-flight restarts the timer from the last
/// interpolated viewport, never from the original start.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionController {
    duration: Duration,
    current: Viewport,
    transition: Option<ViewportTransition>,
}

impl TransitionController {
    #[must_use]
    pub fn new(initial: Viewport, duration: Duration) -> Self {
        Self {
            duration,
            current: initial,
            transition: None,
        }
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn set_duration(&mut self, duration: Duration) {
        self.duration = duration;
    }

    /// Viewport as of the last frame.
    #[must_use]
    pub fn current(&self) -> Viewport {
        self.current
    }

    /// Viewport the controller is heading to.
    #[must_use]
    pub fn target(&self) -> Viewport {
        self.transition
            .map_or(self.current, |transition| transition.to)
    }

    #[must_use]
    pub fn transition(&self) -> Option<ViewportTransition> {
        self.transition
    }

    #[must_use]
    pub fn needs_frame(&self) -> bool {
        self.transition.is_some()
    }

    /// Starts (or restarts) a transition from the current viewport to `target`.
    ///
    /// Returns `false` when `target` is already where the controller rests
    /// or is heading to.
    pub fn retarget(&mut self, target: Viewport, now: Duration) -> bool {
        if target.same_window(self.target()) {
            if let Some(transition) = &mut self.transition {
                transition.to.max_visible_value = target.max_visible_value;
            } else {
                self.current.max_visible_value = target.max_visible_value;
            }
            return false;
        }

        if self.transition.is_some() {
            debug!(
                from_x = self.current.origin_x,
                to_x = target.origin_x,
                "retargeting viewport transition mid-flight"
            );
        }
        self.transition = Some(ViewportTransition {
            from: self.current,
            to: target,
            started_at: now,
        });
        true
    }

    /// Jumps to `viewport` immediately, cancelling any transition.
    pub fn snap_to(&mut self, viewport: Viewport) {
        self.current = viewport;
        self.transition = None;
    }

    /// Advances the interpolation to `now`.
    ///
    /// Once the duration has elapsed the exact target is applied and the
    /// transition ends.
    pub fn tick(&mut self, now: Duration) -> FrameOutcome {
        let Some(transition) = self.transition else {
            return FrameOutcome::Idle;
        };

        let elapsed = now.saturating_sub(transition.started_at);
        let next = if elapsed >= self.duration {
            self.transition = None;
            transition.to
        } else {
            let progress = elapsed.as_secs_f64() / self.duration.as_secs_f64();
            Viewport::lerp(transition.from, transition.to, progress)
        };

        let moved = !next.same_window(self.current);
        self.current = next;
        trace!(
            elapsed_ms = elapsed.as_millis() as u64,
            settled = self.transition.is_none(),
            moved,
            "viewport transition frame"
        );

        if moved {
            FrameOutcome::Redraw(next)
        } else {
            FrameOutcome::Unchanged
        }
    }
}
