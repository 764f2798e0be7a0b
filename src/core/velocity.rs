//! Pointer velocity estimation over a short sliding window.

use std::collections::VecDeque;
use std::time::Duration;

/// Samples older than this (relative to the newest one) are dropped.
const HISTORY_LIMIT: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
struct Sample {
    position: f32,
    timestamp: Duration,
}

/// Estimates release velocity from recent `(timestamp, position)` samples.
///
/// Velocity is the net displacement across the window divided by its
/// duration.  A pointer held still before release ages its samples out, so
/// a slow release reads as zero velocity rather than the last fast move.
#[derive(Debug, Default)]
pub struct VelocityTracker {
    history: VecDeque<Sample>,
}

impl VelocityTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the pointer position at `timestamp`.
    pub fn add_position(&mut self, timestamp: Duration, position: f32) {
        if let Some(last) = self.history.back() {
            if timestamp < last.timestamp {
                tracing::trace!(
                    "ignoring sample at {timestamp:?} earlier than {:?}",
                    last.timestamp
                );
                return;
            }
        }

        self.history.push_back(Sample { position, timestamp });
        self.trim_history();
    }

    /// Units per second.  Zero with fewer than two samples or no elapsed time.
    pub fn velocity(&self) -> f32 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return 0.0;
        };

        let elapsed = (last.timestamp - first.timestamp).as_secs_f32();
        if elapsed <= 0.0 {
            return 0.0;
        }
        (last.position - first.position) / elapsed
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }

    fn trim_history(&mut self) {
        let Some(&Sample { timestamp, .. }) = self.history.back() else {
            return;
        };

        while let Some(first) = self.history.front() {
            if timestamp <= first.timestamp + HISTORY_LIMIT {
                break;
            }
            self.history.pop_front();
        }
    }
}
