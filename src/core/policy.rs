//! Commit-or-cancel decision, run once per pointer release.

use super::direction::SwipeDirection;

/// Everything the decision needs, captured at release time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleaseContext {
    pub offset: f32,
    pub velocity: f32,
    pub projected_offset: f32,
    pub bound: f32,
    /// `|ratio|` at release.
    pub ratio: f32,
    pub min_ratio_bound: f32,
}

/// How a released drag resolves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The fling alone carries the card past the bound; coast out on decay.
    CommitByDecay { direction: SwipeDirection },
    /// Dragged far enough to force the swipe; spring out to `target`.
    CommitToBound { target: f32, direction: SwipeDirection },
    /// Spring back to centre.
    Cancel,
}

pub fn resolve(ctx: &ReleaseContext) -> Resolution {
    if ctx.projected_offset.abs() >= ctx.bound {
        return Resolution::CommitByDecay {
            direction: SwipeDirection::from_offset(ctx.projected_offset),
        };
    }
    if ctx.ratio.abs() >= ctx.min_ratio_bound {
        let target = if ctx.offset > 0.0 { ctx.bound } else { -ctx.bound };
        return Resolution::CommitToBound {
            target,
            direction: SwipeDirection::from_offset(target),
        };
    }
    Resolution::Cancel
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(offset: f32, projected_offset: f32, ratio: f32) -> ReleaseContext {
        ReleaseContext {
            offset,
            velocity: 0.0,
            projected_offset,
            bound: 100.0,
            ratio,
            min_ratio_bound: 1.0,
        }
    }

    #[test]
    fn fling_past_bound_commits_on_decay() {
        assert_eq!(
            resolve(&ctx(10.0, -120.0, 0.2)),
            Resolution::CommitByDecay {
                direction: SwipeDirection::Left
            }
        );
        assert!(matches!(
            resolve(&ctx(0.0, 100.0, 0.0)),
            Resolution::CommitByDecay { .. }
        ));
    }

    #[test]
    fn full_ratio_forces_commit_toward_offset_sign() {
        assert_eq!(
            resolve(&ctx(60.0, 70.0, 1.0)),
            Resolution::CommitToBound {
                target: 100.0,
                direction: SwipeDirection::Right
            }
        );
        assert_eq!(
            resolve(&ctx(-60.0, -70.0, 1.0)),
            Resolution::CommitToBound {
                target: -100.0,
                direction: SwipeDirection::Left
            }
        );
    }

    #[test]
    fn short_drag_cancels() {
        assert_eq!(resolve(&ctx(20.0, 40.0, 0.4)), Resolution::Cancel);
    }
}
