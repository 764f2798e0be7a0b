//! Single-pointer horizontal drag tracking.
//!
//! The tracker turns a raw pointer stream into offset deltas while a drag is
//! live, and into a [`Release`] (velocity + decay projection) when it ends.
//! It never touches the offset itself; the caller applies the deltas.

use std::time::Duration;

use super::motion::DecaySpec;
use super::velocity::VelocityTracker;

/// Identifies one pointer contact.  Only the first contact is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointerId(pub u64);

/// Lifecycle of one drag cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePhase {
    Idle,
    Dragging { pointer: PointerId, last_x: f32 },
    /// Released; the resolution animation is still running.
    Released,
}

/// What the tracker knows at the moment the pointer lifts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// Horizontal velocity in units/s.
    pub velocity: f32,
    /// Where the offset would come to rest under friction alone.
    pub projected_offset: f32,
}

#[derive(Debug)]
pub struct GestureTracker {
    phase: GesturePhase,
    velocity: VelocityTracker,
    decay: DecaySpec,
}

impl GestureTracker {
    pub fn new(decay: DecaySpec) -> Self {
        Self {
            phase: GesturePhase::Idle,
            velocity: VelocityTracker::new(),
            decay,
        }
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, GesturePhase::Dragging { .. })
    }

    /// Start a drag.  Returns `false` if another pointer already owns the drag.
    pub fn pointer_down(&mut self, pointer: PointerId, x: f32, timestamp: Duration) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.velocity.reset();
        self.velocity.add_position(timestamp, x);
        self.phase = GesturePhase::Dragging { pointer, last_x: x };
        true
    }

    /// Feed a move.  Returns the horizontal delta to apply, or `None` if
    /// `pointer` is not the one being tracked.
    pub fn pointer_move(&mut self, pointer: PointerId, x: f32, timestamp: Duration) -> Option<f32> {
        let GesturePhase::Dragging { pointer: active, last_x } = self.phase else {
            return None;
        };
        if active != pointer {
            return None;
        }
        self.velocity.add_position(timestamp, x);
        self.phase = GesturePhase::Dragging { pointer, last_x: x };
        Some(x - last_x)
    }

    /// End the drag (pointer up or cancel) with the offset as it stands now.
    pub fn release(&mut self, pointer: PointerId, offset: f32) -> Option<Release> {
        match self.phase {
            GesturePhase::Dragging { pointer: active, .. } if active == pointer => {}
            _ => return None,
        }
        let velocity = self.velocity.velocity();
        self.velocity.reset();
        self.phase = GesturePhase::Released;
        Some(Release {
            velocity,
            projected_offset: self.decay.target_value(offset, velocity),
        })
    }

    /// The resolution animation finished (or was superseded); back to idle.
    pub fn settle(&mut self) {
        if self.phase == GesturePhase::Released {
            self.phase = GesturePhase::Idle;
        }
    }

    /// Drop any drag in progress without producing a release.
    pub fn reset(&mut self) {
        self.velocity.reset();
        self.phase = GesturePhase::Idle;
    }
}
