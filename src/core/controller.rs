//! The card stack controller: gesture in, transforms and swipes out.
//!
//! [`CardStack`] wires the gesture tracker, the resolution policy and the
//! stack state together.  The host feeds it pointer events, layout sizes and
//! frame ticks (all on one thread, in arrival order) and asks it for
//! per-card transforms when drawing.  Item access goes through an
//! [`ItemProvider`] passed into each call rather than held, so the caller
//! keeps ownership of its items.  The stack owns the front cursor and maps
//! it onto content indices, wrapping when the config is endless.

use std::time::Duration;

use tracing::debug;

use super::config::{ConfigError, SwipeConfig};
use super::direction::SwipeDirection;
use super::gesture::{GesturePhase, GestureTracker, PointerId};
use super::motion::Animation;
use super::policy::{self, ReleaseContext, Resolution};
use super::provider::{front_index, visible_cards, ItemProvider, VisibleCard};
use super::saved::SavedState;
use super::state::{CardStackState, Completion};
use super::transform::{card_transform, rotation_padding, CardTransform};

/// A committed swipe: the logical index that left and which way it went.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swiped {
    pub index: usize,
    pub direction: SwipeDirection,
}

#[derive(Debug)]
pub struct CardStack {
    config: SwipeConfig,
    state: CardStackState,
    gesture: GestureTracker,
    /// Last measured card height, for re-centring scaled cards.
    card_height: f32,
}

impl CardStack {
    pub fn new(config: SwipeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: CardStackState::new(config.initial_selected_index, config.swipe_threshold),
            gesture: GestureTracker::new(config.decay),
            card_height: 0.0,
            config,
        })
    }

    /// Build a stack whose front cursor comes from persisted state.
    pub fn restore(config: SwipeConfig, saved: SavedState) -> Result<Self, ConfigError> {
        let mut stack = Self::new(config)?;
        stack.state = CardStackState::restore(saved, config.swipe_threshold);
        debug!("restored card stack at index {}", saved.selected_index);
        Ok(stack)
    }

    pub fn save(&self) -> SavedState {
        self.state.save()
    }

    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    pub fn state(&self) -> &CardStackState {
        &self.state
    }

    pub fn gesture_phase(&self) -> GesturePhase {
        self.gesture.phase()
    }

    // ── layout ─────────────────────────────────────────────────

    pub fn on_size_changed(&mut self, width: u32) {
        self.state.on_size_changed(width);
    }

    /// The front card's laid-out size.  Sets the offset bound and the
    /// height used to re-centre the cards behind it.
    pub fn on_card_measured(&mut self, width: f32, height: f32) {
        let g = &self.config.geometry;
        let padding = rotation_padding(width, height, g.rotate_degree, g.translate_unit);
        self.card_height = height;
        self.state.set_card_extent(width + padding);
    }

    // ── per-frame output ───────────────────────────────────────

    /// Content index of the front card, `None` once the deck has run out.
    pub fn front_index<P: ItemProvider>(&self, provider: &P) -> Option<usize> {
        front_index(self.state.selected_index(), provider.count(), self.config.endless)
    }

    /// Cards to draw, back-to-front.
    pub fn visible_cards<P: ItemProvider>(&self, provider: &P) -> Vec<VisibleCard> {
        visible_cards(
            self.state.selected_index(),
            provider.count(),
            self.config.geometry.visible_item_count,
            self.config.endless,
        )
    }

    /// Transform for the card at stack `position` (0 = front).
    pub fn transform(&self, position: usize) -> CardTransform {
        card_transform(
            position,
            self.state.offset(),
            self.state.ratio(),
            &self.config.geometry,
            self.card_height,
        )
    }

    // ── pointer input ──────────────────────────────────────────

    /// Start a drag on the front card.  Halts any running animation.
    /// Ignored when there is no front card or a drag is already live.
    pub fn pointer_down<P: ItemProvider>(
        &mut self,
        provider: &P,
        pointer: PointerId,
        x: f32,
        timestamp: Duration,
    ) -> bool {
        if self.front_index(provider).is_none() {
            return false;
        }
        if !self.gesture.pointer_down(pointer, x, timestamp) {
            return false;
        }
        if self.state.stop_animation() {
            debug!("drag took over running animation at offset {:.2}", self.state.offset());
        }
        true
    }

    pub fn pointer_move<P: ItemProvider>(
        &mut self,
        provider: &mut P,
        pointer: PointerId,
        x: f32,
        timestamp: Duration,
    ) {
        let Some(delta) = self.gesture.pointer_move(pointer, x, timestamp) else {
            return;
        };
        if delta != 0.0 {
            self.state.drag_by(delta);
            self.notify_swiping(provider);
        }
    }

    /// Pointer lifted at `x`.  Resolves the drag and starts its animation.
    pub fn pointer_up<P: ItemProvider>(
        &mut self,
        provider: &mut P,
        pointer: PointerId,
        x: f32,
        timestamp: Duration,
    ) -> Option<Resolution> {
        self.pointer_move(provider, pointer, x, timestamp);
        self.finish_drag(pointer)
    }

    /// Pointer lost without a final position.  Resolves like a release.
    pub fn pointer_cancel(&mut self, pointer: PointerId) -> Option<Resolution> {
        self.finish_drag(pointer)
    }

    fn finish_drag(&mut self, pointer: PointerId) -> Option<Resolution> {
        let offset = self.state.offset();
        let release = self.gesture.release(pointer, offset)?;
        let ctx = ReleaseContext {
            offset,
            velocity: release.velocity,
            projected_offset: release.projected_offset,
            bound: self.state.bound(),
            ratio: self.state.ratio().abs(),
            min_ratio_bound: self.config.min_ratio_bound,
        };
        let resolution = policy::resolve(&ctx);
        debug!(
            "release: offset={:.2} velocity={:.1} projected={:.2} bound={:.2} ratio={:.2} -> {:?}",
            ctx.offset, ctx.velocity, ctx.projected_offset, ctx.bound, ctx.ratio, resolution
        );

        let (animation, completion) = match resolution {
            Resolution::CommitByDecay { direction } => (
                Animation::decay(self.config.decay, offset, ctx.velocity, ctx.bound),
                Completion::Commit(direction),
            ),
            Resolution::CommitToBound { target, direction } => (
                Animation::to_target(self.config.animation, offset, target, ctx.velocity, ctx.bound),
                Completion::Commit(direction),
            ),
            Resolution::Cancel => (
                Animation::to_target(self.config.animation, offset, 0.0, ctx.velocity, ctx.bound),
                Completion::Settle,
            ),
        };
        self.state.start_animation(animation, completion);
        Some(resolution)
    }

    // ── frames ─────────────────────────────────────────────────

    /// Advance the running animation by `dt`.  Returns the swipe it
    /// committed, if it finished with one.
    pub fn tick<P: ItemProvider>(&mut self, provider: &mut P, dt: Duration) -> Option<Swiped> {
        if !self.state.is_animation_running() {
            return None;
        }
        let completion = self.state.tick(dt);
        self.notify_swiping(provider);
        match completion? {
            Completion::Settle => {
                self.gesture.settle();
                None
            }
            Completion::Commit(direction) => {
                self.gesture.settle();
                self.commit(provider, direction)
            }
        }
    }

    fn commit<P: ItemProvider>(&mut self, provider: &mut P, direction: SwipeDirection) -> Option<Swiped> {
        let index = self.state.selected_index();
        let advanced = match self.front_index(&*provider) {
            Some(content) => provider.advance_front(content, direction),
            None => false,
        };
        if advanced {
            self.state.select_next();
            debug!("swiped card {index} {}", direction.label());
        } else {
            debug!("no front card to consume at {index}");
        }
        self.state.snap_offset(0.0);
        self.notify_swiping(provider);
        advanced.then_some(Swiped { index, direction })
    }

    fn notify_swiping<P: ItemProvider>(&self, provider: &mut P) {
        provider.on_swiping(
            self.state.offset(),
            self.state.ratio(),
            self.state.swiping_direction(),
        );
    }

    // ── programmatic control ───────────────────────────────────

    /// Swipe the front card out toward `direction`.  Returns `false` when
    /// there is no front card.
    pub fn animate_swipe<P: ItemProvider>(
        &mut self,
        provider: &P,
        direction: SwipeDirection,
        initial_velocity: f32,
    ) -> bool {
        if self.front_index(provider).is_none() {
            return false;
        }
        self.gesture.reset();
        let bound = self.state.bound();
        let animation = Animation::to_target(
            self.config.animation,
            self.state.offset(),
            direction.sign() * bound,
            initial_velocity,
            bound,
        );
        self.state.start_animation(animation, Completion::Commit(direction));
        true
    }

    /// Bring the previous card back in from the `direction` edge.  Steps
    /// the front cursor back without touching the provider.  A no-op
    /// returning `false` at index 0.
    pub fn animate_back_swipe<P: ItemProvider>(
        &mut self,
        provider: &mut P,
        direction: SwipeDirection,
        initial_velocity: f32,
    ) -> bool {
        if !self.state.select_previous() {
            return false;
        }
        self.gesture.reset();
        self.state.stop_animation();
        let bound = self.state.bound();
        let start = direction.sign() * bound;
        self.state.snap_offset(start);
        self.notify_swiping(provider);
        let animation =
            Animation::to_target(self.config.animation, start, 0.0, initial_velocity, bound);
        self.state.start_animation(animation, Completion::Settle);
        debug!("undo to card {}", self.state.selected_index());
        true
    }

    /// Jump to `index` without animating.  Drops any drag or animation.
    pub fn snap_to(&mut self, index: usize) {
        self.gesture.reset();
        self.state.stop_animation();
        self.state.snap_offset(0.0);
        self.state.snap_to(index);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::provider::SwipeItemProvider;
    use std::cell::RefCell;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);
    const P: PointerId = PointerId(7);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn stack(config: SwipeConfig) -> CardStack {
        let mut stack = CardStack::new(config).expect("valid config");
        stack.on_size_changed(100);
        stack.on_card_measured(60.0, 20.0);
        stack
    }

    type Log = Rc<RefCell<Vec<(u32, SwipeDirection)>>>;

    fn provider(len: u32) -> (SwipeItemProvider<Vec<u32>>, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let provider = SwipeItemProvider::new((0..len).collect())
            .on_swiped(move |item, dir| sink.borrow_mut().push((*item, dir)));
        (provider, log)
    }

    fn settle<I: ItemProvider>(stack: &mut CardStack, provider: &mut I) -> Vec<Swiped> {
        let mut swiped = Vec::new();
        for _ in 0..2_000 {
            if !stack.state().is_animation_running() {
                break;
            }
            swiped.extend(stack.tick(provider, FRAME));
        }
        assert!(!stack.state().is_animation_running(), "animation never settled");
        swiped
    }

    #[test]
    fn invalid_config_is_rejected() {
        assert!(CardStack::new(SwipeConfig::default().swipe_threshold(0.0)).is_err());
        assert!(CardStack::new(SwipeConfig::default().visible_item_count(0)).is_err());
    }

    #[test]
    fn bound_covers_viewport_and_tilted_card() {
        let mut s = stack(SwipeConfig::default());
        assert_eq!(s.state().bound(), 100.0);
        s.on_card_measured(120.0, 40.0);
        assert!(s.state().bound() > 120.0);
    }

    #[test]
    fn fling_past_bound_commits_once() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, log) = provider(5);

        assert!(s.pointer_down(&items, P, 50.0, ms(0)));
        for i in 1..=5u64 {
            s.pointer_move(&mut items, P, 50.0 + 5.0 * i as f32, ms(10 * i));
        }
        assert_eq!(s.state().offset(), 25.0);
        let resolution = s.pointer_up(&mut items, P, 75.0, ms(60));
        assert_eq!(
            resolution,
            Some(Resolution::CommitByDecay {
                direction: SwipeDirection::Right
            })
        );
        assert_eq!(s.gesture_phase(), GesturePhase::Released);

        let swiped = settle(&mut s, &mut items);
        assert_eq!(
            swiped,
            vec![Swiped {
                index: 0,
                direction: SwipeDirection::Right
            }]
        );
        assert_eq!(*log.borrow(), vec![(0, SwipeDirection::Right)]);
        assert_eq!(s.state().selected_index(), 1);
        assert_eq!(s.state().offset(), 0.0);
        assert_eq!(s.gesture_phase(), GesturePhase::Idle);
    }

    #[test]
    fn short_slow_drag_springs_back() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, log) = provider(5);

        s.pointer_down(&items, P, 50.0, ms(0));
        s.pointer_move(&mut items, P, 55.0, ms(16));
        let resolution = s.pointer_up(&mut items, P, 55.0, ms(300));
        assert_eq!(resolution, Some(Resolution::Cancel));

        assert!(settle(&mut s, &mut items).is_empty());
        assert!(log.borrow().is_empty());
        assert_eq!(s.state().offset(), 0.0);
        assert_eq!(s.state().selected_index(), 0);
    }

    #[test]
    fn pointer_cancel_resolves_like_a_release() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, log) = provider(5);

        // Slow and short: springs back, nothing consumed.
        assert!(s.pointer_down(&items, P, 50.0, ms(0)));
        s.pointer_move(&mut items, P, 52.0, ms(100));
        assert_eq!(s.pointer_cancel(P), Some(Resolution::Cancel));
        assert!(settle(&mut s, &mut items).is_empty());
        assert!(log.borrow().is_empty());
        assert_eq!(s.state().offset(), 0.0);
        assert_eq!(s.state().selected_index(), 0);
        assert_eq!(s.gesture_phase(), GesturePhase::Idle);

        // Fast: the fling alone carries the card out.
        assert!(s.pointer_down(&items, P, 0.0, ms(200)));
        s.pointer_move(&mut items, P, 10.0, ms(216));
        assert_eq!(
            s.pointer_cancel(P),
            Some(Resolution::CommitByDecay {
                direction: SwipeDirection::Right
            })
        );
        let swiped = settle(&mut s, &mut items);
        assert_eq!(
            swiped,
            vec![Swiped {
                index: 0,
                direction: SwipeDirection::Right
            }]
        );
        assert_eq!(*log.borrow(), vec![(0, SwipeDirection::Right)]);
        assert_eq!(s.state().offset(), 0.0);
        assert_eq!(s.state().selected_index(), 1);
        assert_eq!(s.gesture_phase(), GesturePhase::Idle);
    }

    #[test]
    fn cancel_from_another_pointer_is_ignored() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, _) = provider(5);

        assert!(s.pointer_down(&items, P, 0.0, ms(0)));
        s.pointer_move(&mut items, P, 10.0, ms(16));
        assert_eq!(s.pointer_cancel(PointerId(99)), None);
        assert!(!s.state().is_animation_running());
        assert_eq!(s.state().offset(), 10.0);
        assert!(matches!(
            s.gesture_phase(),
            GesturePhase::Dragging { pointer, .. } if pointer == P
        ));
    }

    #[test]
    fn dragging_past_full_ratio_forces_commit() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, log) = provider(5);

        s.pointer_down(&items, P, 80.0, ms(0));
        s.pointer_move(&mut items, P, 20.0, ms(16));
        let resolution = s.pointer_up(&mut items, P, 20.0, ms(400));
        assert_eq!(
            resolution,
            Some(Resolution::CommitToBound {
                target: -100.0,
                direction: SwipeDirection::Left
            })
        );
        settle(&mut s, &mut items);
        assert_eq!(*log.borrow(), vec![(0, SwipeDirection::Left)]);
        assert_eq!(s.state().selected_index(), 1);
        assert_eq!(s.state().offset(), 0.0);
    }

    #[test]
    fn new_drag_halts_resolution_animation() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, log) = provider(5);

        s.pointer_down(&items, P, 0.0, ms(0));
        for i in 1..=5u64 {
            s.pointer_move(&mut items, P, 5.0 * i as f32, ms(10 * i));
        }
        s.pointer_up(&mut items, P, 25.0, ms(60));
        s.tick(&mut items, FRAME);
        s.tick(&mut items, FRAME);
        let mid_flight = s.state().offset();
        assert!(mid_flight > 25.0 && mid_flight < 100.0);

        assert!(s.pointer_down(&items, PointerId(8), 10.0, ms(100)));
        assert!(!s.state().is_animation_running());
        for _ in 0..10 {
            assert_eq!(s.tick(&mut items, FRAME), None);
        }
        assert_eq!(s.state().offset(), mid_flight);

        s.pointer_move(&mut items, PointerId(8), 7.0, ms(120));
        assert_eq!(s.state().offset(), mid_flight - 3.0);
        assert!(log.borrow().is_empty());
        assert_eq!(s.state().selected_index(), 0);
    }

    #[test]
    fn swiping_callback_fires_on_every_offset_change() {
        let mut s = stack(SwipeConfig::default());
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let mut items = SwipeItemProvider::new(vec![1u8, 2, 3])
            .on_swiping(move |offset, ratio, dir| sink.borrow_mut().push((offset, ratio, dir)));

        s.pointer_down(&items, P, 10.0, ms(0));
        s.pointer_move(&mut items, P, 4.0, ms(16));
        s.pointer_move(&mut items, P, 4.0, ms(32));
        s.pointer_move(&mut items, P, 14.0, ms(48));
        let calls = calls.borrow();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], (-6.0, -0.12, SwipeDirection::Left));
        assert_eq!(calls[1].0, 4.0);
        assert_eq!(calls[1].2, SwipeDirection::Right);
    }

    #[test]
    fn undo_at_zero_is_a_no_op() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, _) = provider(3);
        assert!(!s.animate_back_swipe(&mut items, SwipeDirection::Left, 0.0));
        assert_eq!(s.state().selected_index(), 0);
        assert_eq!(s.state().offset(), 0.0);
        assert!(!s.state().is_animation_running());
    }

    #[test]
    fn commits_then_undos_restore_the_cursor() {
        let mut s = stack(SwipeConfig::default().initial_selected_index(1));
        let (mut items, log) = provider(8);

        for _ in 0..4 {
            assert!(s.animate_swipe(&items, SwipeDirection::Right, 0.0));
            assert_eq!(settle(&mut s, &mut items).len(), 1);
        }
        assert_eq!(s.state().selected_index(), 5);

        for step in 0..4 {
            assert!(s.animate_back_swipe(&mut items, SwipeDirection::Left, 0.0));
            assert_eq!(s.state().selected_index(), 4 - step);
            assert_eq!(s.state().offset(), -100.0);
            assert!(settle(&mut s, &mut items).is_empty());
            assert_eq!(s.state().offset(), 0.0);
        }
        assert_eq!(s.state().selected_index(), 1);
        assert_eq!(log.borrow().len(), 4);
    }

    #[test]
    fn endless_deck_cycles() {
        let mut s = stack(SwipeConfig::default().endless(true));
        let (mut items, log) = provider(5);

        for selected in 0..15usize {
            assert_eq!(s.state().selected_index(), selected);
            assert_eq!(s.front_index(&items), Some(selected % 5));
            let front = s.visible_cards(&items).last().copied().expect("front card");
            assert_eq!(front.position, 0);
            assert_eq!(items.content_at(front.index), Some(&((selected % 5) as u32)));
            assert!(s.animate_swipe(&items, SwipeDirection::Left, 0.0));
            settle(&mut s, &mut items);
        }
        let consumed: Vec<u32> = log.borrow().iter().map(|(item, _)| *item).collect();
        assert_eq!(consumed, (0..15).map(|i| i % 5).collect::<Vec<u32>>());
    }

    #[test]
    fn endless_config_keeps_a_short_deck_going() {
        let mut s = stack(SwipeConfig::default().endless(true));
        let (mut items, log) = provider(3);

        for _ in 0..3 {
            assert!(s.animate_swipe(&items, SwipeDirection::Right, 0.0));
            settle(&mut s, &mut items);
        }
        assert_eq!(s.state().selected_index(), 3);
        assert_eq!(s.front_index(&items), Some(0));
        let indices: Vec<usize> = s.visible_cards(&items).iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 2, 1, 0]);

        assert!(s.pointer_down(&items, P, 80.0, ms(0)));
        s.pointer_move(&mut items, P, 20.0, ms(16));
        let resolution = s.pointer_up(&mut items, P, 20.0, ms(400));
        assert!(matches!(resolution, Some(Resolution::CommitToBound { .. })));
        let swiped = settle(&mut s, &mut items);
        assert_eq!(
            swiped,
            vec![Swiped {
                index: 3,
                direction: SwipeDirection::Left
            }]
        );
        let consumed: Vec<u32> = log.borrow().iter().map(|(item, _)| *item).collect();
        assert_eq!(consumed, vec![0, 1, 2, 0]);
        assert_eq!(s.front_index(&items), Some(1));
    }

    #[test]
    fn exhausted_deck_refuses_gestures() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, _) = provider(2);
        for _ in 0..2 {
            s.animate_swipe(&items, SwipeDirection::Right, 0.0);
            settle(&mut s, &mut items);
        }
        assert_eq!(s.state().selected_index(), 2);
        assert_eq!(s.front_index(&items), None);
        assert!(s.visible_cards(&items).is_empty());
        assert!(!s.pointer_down(&items, P, 0.0, ms(0)));
        assert!(!s.animate_swipe(&items, SwipeDirection::Right, 0.0));
    }

    struct Refusing;

    impl ItemProvider for Refusing {
        type Item = ();

        fn count(&self) -> usize {
            1
        }

        fn content_at(&self, _index: usize) -> Option<&()> {
            Some(&())
        }

        fn advance_front(&mut self, _index: usize, _direction: SwipeDirection) -> bool {
            false
        }
    }

    #[test]
    fn provider_underflow_still_settles_offset() {
        let mut s = stack(SwipeConfig::default());
        let mut provider = Refusing;
        assert!(s.animate_swipe(&provider, SwipeDirection::Left, 0.0));
        assert!(settle(&mut s, &mut provider).is_empty());
        assert_eq!(s.state().offset(), 0.0);
        assert_eq!(s.state().selected_index(), 0);
    }

    #[test]
    fn restore_brings_back_only_the_index() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, _) = provider(5);
        s.animate_swipe(&items, SwipeDirection::Right, 0.0);
        settle(&mut s, &mut items);
        s.pointer_down(&items, P, 0.0, ms(0));
        s.pointer_move(&mut items, P, 12.0, ms(16));

        let restored = CardStack::restore(SwipeConfig::default(), s.save()).expect("valid config");
        assert_eq!(restored.state().selected_index(), 1);
        assert_eq!(restored.state().offset(), 0.0);
        assert_eq!(restored.gesture_phase(), GesturePhase::Idle);
    }

    #[test]
    fn front_transform_follows_the_drag() {
        let mut s = stack(SwipeConfig::default());
        let (mut items, _) = provider(5);
        s.pointer_down(&items, P, 50.0, ms(0));
        s.pointer_move(&mut items, P, 25.0, ms(16));
        let front = s.transform(0);
        assert_eq!(front.translation_x, -25.0);
        assert!((front.rotation + 7.0).abs() < 1e-4);
        let behind = s.transform(1);
        assert!((behind.scale_x - 0.95).abs() < 1e-4);
    }
}
