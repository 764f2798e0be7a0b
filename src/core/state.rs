//! Mutable state of one card stack.
//!
//! The ratio is cached and recomputed by every mutator of the offset or the
//! viewport width, so readers never see a stale value.  At most one of
//! {drag, animation} drives the offset; [`CardStackState::stop_animation`]
//! is how a drag takes over.

use std::time::Duration;

use super::direction::{calculate_ratio, SwipeDirection};
use super::motion::Animation;
use super::saved::SavedState;

/// What happens when the running animation finishes on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Nothing; the offset just comes to rest.
    Settle,
    /// Consume the front card in `direction`, then snap back to zero.
    Commit(SwipeDirection),
}

#[derive(Debug, Clone, Copy)]
struct Running {
    animation: Animation,
    completion: Completion,
}

#[derive(Debug, Clone)]
pub struct CardStackState {
    selected_index: usize,
    offset: f32,
    viewport_width: u32,
    /// Measured card width plus rotation padding.
    card_extent: f32,
    ratio: f32,
    swipe_threshold: f32,
    running: Option<Running>,
}

impl CardStackState {
    pub fn new(initial_selected_index: usize, swipe_threshold: f32) -> Self {
        Self {
            selected_index: initial_selected_index,
            offset: 0.0,
            viewport_width: 1,
            card_extent: 0.0,
            ratio: 0.0,
            swipe_threshold,
            running: None,
        }
    }

    /// Rebuild from persisted state.  Everything transient starts idle.
    pub fn restore(saved: SavedState, swipe_threshold: f32) -> Self {
        Self::new(saved.selected_index, swipe_threshold)
    }

    pub fn save(&self) -> SavedState {
        SavedState {
            selected_index: self.selected_index,
        }
    }

    // ── readers ────────────────────────────────────────────────

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    /// Largest `|offset|` allowed: a card this far out has left the viewport.
    pub fn bound(&self) -> f32 {
        self.card_extent.max(self.viewport_width as f32)
    }

    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    pub fn swiping_direction(&self) -> SwipeDirection {
        SwipeDirection::from_offset(self.offset)
    }

    pub fn is_animation_running(&self) -> bool {
        self.running.is_some()
    }

    // ── measurement ────────────────────────────────────────────

    /// Viewport width from layout; 0 is floored to 1.
    pub fn on_size_changed(&mut self, width: u32) {
        self.viewport_width = width.max(1);
        self.set_offset(self.offset);
    }

    /// Measured card width plus the padding its tilt needs.
    pub fn set_card_extent(&mut self, extent: f32) {
        self.card_extent = extent.max(0.0);
        self.set_offset(self.offset);
    }

    // ── offset ─────────────────────────────────────────────────

    /// Place the offset directly, clamped to `[-bound, bound]`.
    pub fn snap_offset(&mut self, offset: f32) {
        self.set_offset(offset);
    }

    /// Shift the offset by a drag delta.
    pub fn drag_by(&mut self, delta: f32) {
        self.set_offset(self.offset + delta);
    }

    fn set_offset(&mut self, offset: f32) {
        let bound = self.bound();
        self.offset = offset.clamp(-bound, bound);
        self.update_ratio();
    }

    fn update_ratio(&mut self) {
        self.ratio = calculate_ratio(self.offset, self.viewport_width, self.swipe_threshold);
    }

    // ── animation ──────────────────────────────────────────────

    /// Hand the offset to `animation`, halting whatever drove it before.
    pub fn start_animation(&mut self, animation: Animation, completion: Completion) {
        self.stop_animation();
        self.set_offset(animation.value());
        self.running = Some(Running {
            animation,
            completion,
        });
    }

    /// Halt the running animation where it is.  Its completion never fires.
    /// Returns `true` if something was running.
    pub fn stop_animation(&mut self) -> bool {
        self.running.take().is_some()
    }

    /// Advance the running animation by one frame.  Returns its completion
    /// once it finishes.
    pub fn tick(&mut self, dt: Duration) -> Option<Completion> {
        let running = self.running.as_mut()?;
        let finished = running.animation.advance(dt);
        let value = running.animation.value();
        let completion = running.completion;
        self.set_offset(value);
        if finished {
            self.running = None;
            Some(completion)
        } else {
            None
        }
    }

    // ── front cursor ───────────────────────────────────────────

    /// Jump the front cursor without animating.
    pub fn snap_to(&mut self, index: usize) {
        self.selected_index = index;
    }

    pub(crate) fn select_next(&mut self) {
        self.selected_index = self.selected_index.saturating_add(1);
    }

    /// Step back one card.  Returns `false` at index 0.
    pub(crate) fn select_previous(&mut self) -> bool {
        if self.selected_index == 0 {
            return false;
        }
        self.selected_index -= 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::motion::AnimationSpec;

    #[test]
    fn ratio_tracks_offset_and_width() {
        let mut s = CardStackState::new(0, 0.5);
        s.on_size_changed(200);
        s.snap_offset(50.0);
        assert_eq!(s.ratio(), 0.5);
        s.on_size_changed(100);
        assert_eq!(s.ratio(), 1.0);
        s.drag_by(-100.0);
        assert_eq!(s.ratio(), -1.0);
    }

    #[test]
    fn zero_width_is_floored() {
        let mut s = CardStackState::new(0, 1.0);
        s.on_size_changed(0);
        assert_eq!(s.viewport_width(), 1);
        assert_eq!(s.bound(), 1.0);
    }

    #[test]
    fn offset_is_confined_to_bound() {
        let mut s = CardStackState::new(0, 0.5);
        s.on_size_changed(80);
        s.set_card_extent(95.0);
        assert_eq!(s.bound(), 95.0);
        s.drag_by(500.0);
        assert_eq!(s.offset(), 95.0);
        s.set_card_extent(10.0);
        assert_eq!(s.bound(), 80.0);
        assert_eq!(s.offset(), 80.0);
    }

    #[test]
    fn stopped_animation_never_completes() {
        let mut s = CardStackState::new(0, 0.5);
        s.on_size_changed(100);
        let anim = Animation::to_target(AnimationSpec::default(), 40.0, 0.0, 0.0, s.bound());
        s.start_animation(anim, Completion::Commit(SwipeDirection::Right));
        assert!(s.is_animation_running());
        assert_eq!(s.tick(Duration::from_millis(16)), None);
        let halted_at = s.offset();
        assert!(s.stop_animation());
        assert_eq!(s.tick(Duration::from_millis(16)), None);
        assert_eq!(s.offset(), halted_at);
    }

    #[test]
    fn save_keeps_only_the_index() {
        let mut s = CardStackState::new(4, 0.5);
        s.on_size_changed(100);
        s.snap_offset(30.0);
        let restored = CardStackState::restore(s.save(), 0.5);
        assert_eq!(restored.selected_index(), 4);
        assert_eq!(restored.offset(), 0.0);
        assert!(!restored.is_animation_running());
    }

    #[test]
    fn cursor_never_goes_below_zero() {
        let mut s = CardStackState::new(1, 0.5);
        assert!(s.select_previous());
        assert!(!s.select_previous());
        assert_eq!(s.selected_index(), 0);
    }
}
