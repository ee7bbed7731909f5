//! Drag-to-scrub controller.
//!
//! Turns a single pointer's down/move/up stream into unit progress steps.
//! Speed does not matter: every move past the slop threshold is worth exactly
//! one step in the direction of travel.

/// Pointer events in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up { x: f32, y: f32 },
    Cancel,
}

/// Mutation entry point the controller drives.
pub trait ProgressControl {
    fn progress(&self) -> i32;
    fn set_progress(&mut self, progress: i32);
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragPhase {
    /// No pointer down.
    Idle,
    /// Pointer down, still inside the slop distance of `anchor_x`.
    Pending { anchor_x: f32 },
    /// Scrubbing; `anchor_x` is the previous move position.
    Dragging { anchor_x: f32 },
}

#[derive(Debug, Clone)]
pub struct DragController {
    phase: DragPhase,
    slop: f32,
}

impl DragController {
    pub fn new(slop: f32) -> Self {
        Self {
            phase: DragPhase::Idle,
            slop: slop.max(0.0),
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != DragPhase::Idle
    }

    /// Feed one pointer event. Returns the step applied to `target`, if any.
    pub fn handle(&mut self, event: PointerEvent, target: &mut impl ProgressControl) -> Option<i32> {
        match (self.phase, event) {
            (_, PointerEvent::Down { x, y }) => {
                tracing::trace!(x, y, "Pointer down");
                self.phase = DragPhase::Pending { anchor_x: x };
                None
            }
            (DragPhase::Pending { anchor_x }, PointerEvent::Move { x, .. }) => {
                let displacement = x - anchor_x;
                if displacement.abs() < self.slop {
                    return None;
                }
                tracing::debug!(displacement, "Drag started");
                self.phase = DragPhase::Dragging { anchor_x: x };
                Self::step(displacement, target)
            }
            (DragPhase::Dragging { anchor_x }, PointerEvent::Move { x, .. }) => {
                self.phase = DragPhase::Dragging { anchor_x: x };
                Self::step(x - anchor_x, target)
            }
            (DragPhase::Idle, PointerEvent::Move { .. }) => None,
            (phase, PointerEvent::Up { .. } | PointerEvent::Cancel) => {
                if matches!(phase, DragPhase::Dragging { .. }) {
                    tracing::debug!(progress = target.progress(), "Drag finished");
                }
                self.phase = DragPhase::Idle;
                None
            }
        }
    }

    fn step(displacement: f32, target: &mut impl ProgressControl) -> Option<i32> {
        let step = if displacement > 0.0 {
            1
        } else if displacement < 0.0 {
            -1
        } else {
            return None;
        };
        target.set_progress(target.progress().saturating_add(step));
        Some(step)
    }
}
