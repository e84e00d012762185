use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Identity of the device pointer that produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerId {
    Mouse,
    Touch(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// Device-independent pointer event consumed by the range selector.
///
/// Only the horizontal coordinate matters to the selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub x: f64,
    pub id: PointerId,
    pub phase: PointerPhase,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(x: f64, id: PointerId, phase: PointerPhase) -> Self {
        Self { x, id, phase }
    }

    #[must_use]
    pub const fn mouse(x: f64, phase: PointerPhase) -> Self {
        Self::new(x, PointerId::Mouse, phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MouseEventKind {
    Down,
    Move,
    Up,
}

/// Raw mouse event as delivered by the host toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseInput {
    pub client_x: f64,
    pub kind: MouseEventKind,
}

impl From<MouseInput> for PointerEvent {
    fn from(input: MouseInput) -> Self {
        let phase = match input.kind {
            MouseEventKind::Down => PointerPhase::Down,
            MouseEventKind::Move => PointerPhase::Move,
            MouseEventKind::Up => PointerPhase::Up,
        };
        Self::mouse(input.client_x, phase)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchEventKind {
    Start,
    Move,
    End,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub identifier: u64,
    pub client_x: f64,
}

/// Raw touch event: the kind plus the touches that changed in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TouchInput {
    pub kind: TouchEventKind,
    pub changed_touches: SmallVec<[TouchPoint; 2]>,
}

impl TouchInput {
    #[must_use]
    pub fn single(kind: TouchEventKind, identifier: u64, client_x: f64) -> Self {
        let mut changed_touches = SmallVec::new();
        changed_touches.push(TouchPoint {
            identifier,
            client_x,
        });
        Self {
            kind,
            changed_touches,
        }
    }

    /// Converts the first changed touch into a pointer event.
    ///
    /// Cancellation ends the gesture like a lift. Returns `None` when the
    /// event carries no touch point.
    #[must_use]
    pub fn to_pointer_event(&self) -> Option<PointerEvent> {
        let touch = self.changed_touches.first()?;
        let phase = match self.kind {
            TouchEventKind::Start => PointerPhase::Down,
            TouchEventKind::Move => PointerPhase::Move,
            TouchEventKind::End | TouchEventKind::Cancel => PointerPhase::Up,
        };
        Some(PointerEvent::new(
            touch.client_x,
            PointerId::Touch(touch.identifier),
            phase,
        ))
    }
}
