//! Range selector gestures: device adapter, rate limiting and the drag state machine.

mod pointer;
mod range_selector;
mod throttle;

pub use pointer::{
    MouseEventKind, MouseInput, PointerEvent, PointerId, PointerPhase, TouchEventKind, TouchInput,
    TouchPoint,
};
pub use range_selector::{
    DragState, DragTarget, RangeSelector, RangeSelectorConfig, SelectorGeometry, round_percent,
};
pub use throttle::Throttle;
