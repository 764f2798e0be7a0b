//! Bridge between the swipe state machine and the caller's items.
//!
//! [`ItemSource`] is the plain indexed collection the caller owns.
//! [`SwipeItemProvider`] wraps one and adds what swiping needs: consuming
//! the front item and the swipe callbacks.  Providers only ever see content
//! indices in `0..count`; the front cursor and the endless wrap live in the
//! card stack, so consuming an item never mutates the source and an undo
//! can step back over it.

use super::direction::SwipeDirection;

/// An indexed, read-only collection of items.
pub trait ItemSource {
    type Item;

    fn len(&self) -> usize;

    fn get(&self, index: usize) -> Option<&Self::Item>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> ItemSource for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, index: usize) -> Option<&T> {
        <[T]>::get(self, index)
    }
}

/// What the card stack needs from the item side.
pub trait ItemProvider {
    type Item;

    /// Number of items.
    fn count(&self) -> usize;

    /// Content for a content index in `0..count`.
    fn content_at(&self, index: usize) -> Option<&Self::Item>;

    /// Consume the item at content index `index`, reporting it with
    /// `direction`.  Returns `false` (and does nothing) when there is no
    /// such item.
    fn advance_front(&mut self, index: usize, direction: SwipeDirection) -> bool;

    /// Called on every offset change, drag tick or animation frame.
    fn on_swiping(&mut self, _offset: f32, _ratio: f32, _direction: SwipeDirection) {}
}

type OnSwiped<T> = Box<dyn FnMut(&T, SwipeDirection)>;
type OnSwiping = Box<dyn FnMut(f32, f32, SwipeDirection)>;

/// Index-cursor provider over any [`ItemSource`].
pub struct SwipeItemProvider<S: ItemSource> {
    source: S,
    on_swiped: Option<OnSwiped<S::Item>>,
    on_swiping: Option<OnSwiping>,
}

impl<S: ItemSource> SwipeItemProvider<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            on_swiped: None,
            on_swiping: None,
        }
    }

    /// Fired once per committed swipe with the consumed item.
    pub fn on_swiped(mut self, f: impl FnMut(&S::Item, SwipeDirection) + 'static) -> Self {
        self.on_swiped = Some(Box::new(f));
        self
    }

    /// Fired with `(offset, ratio, direction)` on every offset change.
    pub fn on_swiping(mut self, f: impl FnMut(f32, f32, SwipeDirection) + 'static) -> Self {
        self.on_swiping = Some(Box::new(f));
        self
    }
}

impl<S: ItemSource> ItemProvider for SwipeItemProvider<S> {
    type Item = S::Item;

    fn count(&self) -> usize {
        self.source.len()
    }

    fn content_at(&self, index: usize) -> Option<&S::Item> {
        self.source.get(index)
    }

    fn advance_front(&mut self, index: usize, direction: SwipeDirection) -> bool {
        let Some(item) = self.source.get(index) else {
            return false;
        };
        if let Some(on_swiped) = self.on_swiped.as_mut() {
            on_swiped(item, direction);
        }
        true
    }

    fn on_swiping(&mut self, offset: f32, ratio: f32, direction: SwipeDirection) {
        if let Some(on_swiping) = self.on_swiping.as_mut() {
            on_swiping(offset, ratio, direction);
        }
    }
}

/// One card to draw: its stack position and content index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleCard {
    /// 0 = front.
    pub position: usize,
    pub index: usize,
}

/// Content index of the card at logical cursor `front`, if there is one.
/// Endless decks wrap modulo `count`; others run out at `count`.
pub fn front_index(front: usize, count: usize, endless: bool) -> Option<usize> {
    if count == 0 {
        None
    } else if endless {
        Some(front % count)
    } else {
        (front < count).then_some(front)
    }
}

/// Cards to draw for a front cursor, back-to-front so the front paints last.
///
/// Non-endless decks show at most `visible_item_count` cards behind the
/// front, fewer near the end, none once exhausted.  Endless decks always
/// show the full stack, wrapping indices modulo `count`.
pub fn visible_cards(
    front: usize,
    count: usize,
    visible_item_count: usize,
    endless: bool,
) -> Vec<VisibleCard> {
    if count == 0 {
        return Vec::new();
    }
    let behind = if endless {
        visible_item_count
    } else if front >= count {
        return Vec::new();
    } else {
        visible_item_count.min(count - 1 - front)
    };

    (0..=behind)
        .rev()
        .map(|position| VisibleCard {
            position,
            index: if endless {
                (front + position) % count
            } else {
                front + position
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn cursor_advance_reports_item_and_direction() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut provider = SwipeItemProvider::new(vec!["a", "b", "c"])
            .on_swiped(move |item, dir| sink.borrow_mut().push((*item, dir)));

        assert!(provider.advance_front(0, SwipeDirection::Left));
        assert!(provider.advance_front(2, SwipeDirection::Right));
        assert!(!provider.advance_front(3, SwipeDirection::Right));
        assert_eq!(
            *seen.borrow(),
            vec![("a", SwipeDirection::Left), ("c", SwipeDirection::Right)]
        );
        // Source is untouched.
        assert_eq!(provider.count(), 3);
    }

    #[test]
    fn front_index_wraps_only_when_endless() {
        for front in 0..16usize {
            assert_eq!(front_index(front, 5, true), Some(front % 5));
        }
        assert_eq!(front_index(4, 5, false), Some(4));
        assert_eq!(front_index(5, 5, false), None);
        assert_eq!(front_index(0, 0, true), None);
    }

    #[test]
    fn empty_source_has_no_content() {
        let mut provider = SwipeItemProvider::new(Vec::<u8>::new());
        assert_eq!(provider.count(), 0);
        assert!(provider.content_at(0).is_none());
        assert!(!provider.advance_front(0, SwipeDirection::Left));
    }

    #[test]
    fn visible_cards_near_the_end() {
        let positions = |front| -> Vec<(usize, usize)> {
            visible_cards(front, 5, 3, false)
                .into_iter()
                .map(|c| (c.position, c.index))
                .collect()
        };
        assert_eq!(positions(0), vec![(3, 3), (2, 2), (1, 1), (0, 0)]);
        assert_eq!(positions(3), vec![(1, 4), (0, 3)]);
        assert_eq!(positions(4), vec![(0, 4)]);
        assert!(positions(5).is_empty());
    }

    #[test]
    fn visible_cards_endless_wrap() {
        let cards = visible_cards(4, 5, 3, true);
        let indices: Vec<usize> = cards.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![2, 1, 0, 4]);
        assert_eq!(cards.last().map(|c| c.position), Some(0));
    }
}
