//! Construction parameters for a card stack, validated up front.

use thiserror::Error;

use super::direction::MAX_RATIO;
use super::motion::{AnimationSpec, DecaySpec};
use super::transform::{ScaleFactor, StackGeometry};

/// Rejected construction parameters.  Not recoverable at runtime; the
/// caller has to fix its configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("swipe_threshold must be > 0 and <= 1, got {0}")]
    SwipeThreshold(f32),
    #[error("visible_item_count must be >= 1, got {0}")]
    VisibleItemCount(usize),
    #[error("min_ratio_bound must be a finite value >= 0, got {0}")]
    MinRatioBound(f32),
    #[error("scale factor must be finite and >= 0, got ({0}, {1})")]
    ScaleFactor(f32, f32),
    #[error("translate_unit must be finite and >= 0, got {0}")]
    TranslateUnit(f32),
    #[error("rotate_degree must be finite, got {0}")]
    RotateDegree(f32),
    #[error("spring stiffness and damping ratio must be > 0")]
    Spring,
    #[error("tween duration must be non-zero")]
    Tween,
    #[error("decay friction must be > 0, got {0}")]
    Friction(f32),
}

/// Tuning knobs for one card stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeConfig {
    /// Fraction of the viewport width that counts as a full swipe.
    pub swipe_threshold: f32,
    /// `|ratio|` at release that forces a commit.
    pub min_ratio_bound: f32,
    pub geometry: StackGeometry,
    /// Profile for spring-out commits, cancels, and undo.
    pub animation: AnimationSpec,
    /// Friction for fling projection and decay commits.
    pub decay: DecaySpec,
    /// Wrap content indexing modulo the item count.
    pub endless: bool,
    pub initial_selected_index: usize,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            swipe_threshold: 0.5,
            min_ratio_bound: MAX_RATIO,
            geometry: StackGeometry::default(),
            animation: AnimationSpec::default(),
            decay: DecaySpec::default(),
            endless: false,
            initial_selected_index: 0,
        }
    }
}

impl SwipeConfig {
    pub fn swipe_threshold(mut self, threshold: f32) -> Self {
        self.swipe_threshold = threshold;
        self
    }

    pub fn min_ratio_bound(mut self, bound: f32) -> Self {
        self.min_ratio_bound = bound;
        self
    }

    pub fn visible_item_count(mut self, count: usize) -> Self {
        self.geometry.visible_item_count = count;
        self
    }

    pub fn scale_factor(mut self, scale_x: f32, scale_y: f32) -> Self {
        self.geometry.scale_factor = ScaleFactor { scale_x, scale_y };
        self
    }

    pub fn translate_unit(mut self, unit: f32) -> Self {
        self.geometry.translate_unit = unit;
        self
    }

    pub fn rotate_degree(mut self, degree: f32) -> Self {
        self.geometry.rotate_degree = degree;
        self
    }

    pub fn animation(mut self, spec: AnimationSpec) -> Self {
        self.animation = spec;
        self
    }

    pub fn decay(mut self, spec: DecaySpec) -> Self {
        self.decay = spec;
        self
    }

    pub fn endless(mut self, endless: bool) -> Self {
        self.endless = endless;
        self
    }

    pub fn initial_selected_index(mut self, index: usize) -> Self {
        self.initial_selected_index = index;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = self.swipe_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ConfigError::SwipeThreshold(t));
        }
        let g = &self.geometry;
        if g.visible_item_count < 1 {
            return Err(ConfigError::VisibleItemCount(g.visible_item_count));
        }
        if !self.min_ratio_bound.is_finite() || self.min_ratio_bound < 0.0 {
            return Err(ConfigError::MinRatioBound(self.min_ratio_bound));
        }
        let ScaleFactor { scale_x, scale_y } = g.scale_factor;
        if !(scale_x.is_finite() && scale_y.is_finite() && scale_x >= 0.0 && scale_y >= 0.0) {
            return Err(ConfigError::ScaleFactor(scale_x, scale_y));
        }
        if !g.translate_unit.is_finite() || g.translate_unit < 0.0 {
            return Err(ConfigError::TranslateUnit(g.translate_unit));
        }
        if !g.rotate_degree.is_finite() {
            return Err(ConfigError::RotateDegree(g.rotate_degree));
        }
        match self.animation {
            AnimationSpec::Spring(s) if !(s.stiffness > 0.0 && s.damping_ratio > 0.0) => {
                return Err(ConfigError::Spring);
            }
            AnimationSpec::Tween(t) if t.duration.is_zero() => return Err(ConfigError::Tween),
            _ => {}
        }
        if !(self.decay.friction > 0.0) {
            return Err(ConfigError::Friction(self.decay.friction));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::motion::{SpringSpec, TweenSpec};
    use std::time::Duration;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(SwipeConfig::default().validate(), Ok(()));
    }

    #[test]
    fn threshold_must_be_in_unit_interval() {
        for bad in [0.0f32, -0.2, 1.01, f32::NAN] {
            assert!(matches!(
                SwipeConfig::default().swipe_threshold(bad).validate(),
                Err(ConfigError::SwipeThreshold(_))
            ));
        }
        assert!(SwipeConfig::default().swipe_threshold(1.0).validate().is_ok());
    }

    #[test]
    fn at_least_one_visible_card() {
        assert_eq!(
            SwipeConfig::default().visible_item_count(0).validate(),
            Err(ConfigError::VisibleItemCount(0))
        );
    }

    #[test]
    fn animation_profiles_are_checked() {
        let flat = SwipeConfig::default().animation(AnimationSpec::Spring(SpringSpec {
            damping_ratio: 1.0,
            stiffness: 0.0,
        }));
        assert_eq!(flat.validate(), Err(ConfigError::Spring));

        let instant = SwipeConfig::default().animation(AnimationSpec::Tween(TweenSpec {
            duration: Duration::ZERO,
        }));
        assert_eq!(instant.validate(), Err(ConfigError::Tween));
    }
}
