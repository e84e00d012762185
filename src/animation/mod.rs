//! Animated viewport transitions driven by the host's frame clock.

mod transition;

pub use transition::{FrameOutcome, TransitionController, ViewportTransition};
