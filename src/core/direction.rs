//! Swipe direction and the signed drag-progress ratio.

/// Largest magnitude the progress ratio can reach.
pub const MAX_RATIO: f32 = 1.0;

/// Which way the front card leans (while dragging) or left (after a commit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwipeDirection {
    Left,
    Right,
}

impl SwipeDirection {
    /// Classify a signed offset.  Exactly zero counts as [`SwipeDirection::Right`].
    pub fn from_offset(offset: f32) -> Self {
        if offset < 0.0 {
            SwipeDirection::Left
        } else {
            SwipeDirection::Right
        }
    }

    /// `-1.0` for left, `1.0` for right.
    pub fn sign(self) -> f32 {
        match self {
            SwipeDirection::Left => -1.0,
            SwipeDirection::Right => 1.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SwipeDirection::Left => "LEFT",
            SwipeDirection::Right => "RIGHT",
        }
    }
}

/// Progress of a drag toward a full swipe, clamped to `[-1, 1]`.
///
/// A full swipe is `width * swipe_threshold` units of travel.  `width` is
/// floored at 1 so an unmeasured viewport never divides by zero.
pub fn calculate_ratio(offset: f32, width: u32, swipe_threshold: f32) -> f32 {
    let width = width.max(1) as f32;
    (offset / (width * swipe_threshold)).clamp(-MAX_RATIO, MAX_RATIO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_offsets_are_left_everything_else_right() {
        assert_eq!(SwipeDirection::from_offset(-0.001), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_offset(-500.0), SwipeDirection::Left);
        assert_eq!(SwipeDirection::from_offset(0.0), SwipeDirection::Right);
        assert_eq!(SwipeDirection::from_offset(42.0), SwipeDirection::Right);
    }

    #[test]
    fn ratio_examples() {
        assert_eq!(calculate_ratio(50.0, 200, 0.5), 0.5);
        assert_eq!(calculate_ratio(300.0, 200, 0.5), 1.0);
        assert_eq!(calculate_ratio(-50.0, 200, 0.5), -0.5);
        assert_eq!(calculate_ratio(-10_000.0, 200, 0.5), -1.0);
    }

    #[test]
    fn ratio_is_bounded_and_odd() {
        for &width in &[1u32, 7, 80, 1920] {
            for &threshold in &[0.05f32, 0.3, 0.5, 1.0] {
                let mut x = -3000.0f32;
                while x <= 3000.0 {
                    let r = calculate_ratio(x, width, threshold);
                    assert!((-1.0..=1.0).contains(&r), "ratio {r} out of range");
                    assert_eq!(calculate_ratio(-x, width, threshold), -r);
                    x += 37.5;
                }
            }
        }
    }

    #[test]
    fn zero_width_is_treated_as_one() {
        assert_eq!(calculate_ratio(0.25, 0, 1.0), 0.25);
        assert_eq!(calculate_ratio(5.0, 0, 1.0), 1.0);
    }
}
