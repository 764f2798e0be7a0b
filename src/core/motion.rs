//! One-dimensional animation physics: decay, spring, and tween.
//!
//! All profiles are stepped by wall-clock frame time rather than a fixed
//! tick count, so a dropped frame moves further instead of slower.  Springs
//! and decay use their closed-form solutions, which keeps a long frame from
//! destabilising the integration.

use std::time::Duration;

/// Displacement below which a spring counts as arrived.
const REST_DISPLACEMENT: f32 = 0.01;
/// Speed (units/s) below which a spring counts as stopped.
const REST_VELOCITY: f32 = 0.5;

// ───────────────────────────────────────── decay ─────────────

/// Exponential velocity decay: `v(t) = v0 · e^(−friction·t)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecaySpec {
    /// Decay rate per second.  Higher = shorter fling.
    pub friction: f32,
    /// The fling ends once speed drops below this (units/s).
    pub velocity_threshold: f32,
}

impl Default for DecaySpec {
    fn default() -> Self {
        Self {
            friction: 4.2,
            velocity_threshold: 0.5,
        }
    }
}

impl DecaySpec {
    /// Where a value released at `initial_velocity` comes to rest.
    pub fn target_value(&self, initial_value: f32, initial_velocity: f32) -> f32 {
        initial_value + initial_velocity / self.friction
    }

    fn step(&self, value: f32, velocity: f32, dt: f32) -> (f32, f32) {
        let decay = (-self.friction * dt).exp();
        let next = value + velocity / self.friction * (1.0 - decay);
        (next, velocity * decay)
    }
}

// ───────────────────────────────────────── spring ────────────

/// Damped harmonic spring with unit mass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringSpec {
    /// 1.0 = critically damped, < 1.0 bounces, > 1.0 creeps.
    pub damping_ratio: f32,
    pub stiffness: f32,
}

impl SpringSpec {
    pub const DAMPING_RATIO_NO_BOUNCY: f32 = 1.0;
    pub const DAMPING_RATIO_MEDIUM_BOUNCY: f32 = 0.5;
    pub const STIFFNESS_MEDIUM: f32 = 1500.0;
    pub const STIFFNESS_LOW: f32 = 200.0;

    /// Advance `(displacement, velocity)` relative to the rest position by `dt` seconds.
    fn step(&self, displacement: f32, velocity: f32, dt: f32) -> (f32, f32) {
        let omega = self.stiffness.sqrt();
        let zeta = self.damping_ratio;
        let (y0, v0) = (displacement as f64, velocity as f64);
        let (omega, zeta, t) = (omega as f64, zeta as f64, dt as f64);

        let (y, v) = if (zeta - 1.0).abs() < 1e-6 {
            let c1 = y0;
            let c2 = v0 + omega * y0;
            let e = (-omega * t).exp();
            let y = (c1 + c2 * t) * e;
            let v = (c2 - omega * (c1 + c2 * t)) * e;
            (y, v)
        } else if zeta > 1.0 {
            let root = omega * (zeta * zeta - 1.0).sqrt();
            let r1 = -zeta * omega + root;
            let r2 = -zeta * omega - root;
            let c2 = (r1 * y0 - v0) / (r1 - r2);
            let c1 = y0 - c2;
            let (e1, e2) = ((r1 * t).exp(), (r2 * t).exp());
            (c1 * e1 + c2 * e2, c1 * r1 * e1 + c2 * r2 * e2)
        } else {
            let wd = omega * (1.0 - zeta * zeta).sqrt();
            let c1 = y0;
            let c2 = (v0 + zeta * omega * y0) / wd;
            let e = (-zeta * omega * t).exp();
            let (sin, cos) = (wd * t).sin_cos();
            let y = e * (c1 * cos + c2 * sin);
            let v = e * ((c2 * wd - zeta * omega * c1) * cos - (c1 * wd + zeta * omega * c2) * sin);
            (y, v)
        };
        (y as f32, v as f32)
    }
}

impl Default for SpringSpec {
    fn default() -> Self {
        Self {
            damping_ratio: Self::DAMPING_RATIO_NO_BOUNCY,
            stiffness: Self::STIFFNESS_MEDIUM,
        }
    }
}

// ───────────────────────────────────────── tween ─────────────

/// Fixed-duration ease-out interpolation.  Ignores initial velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TweenSpec {
    pub duration: Duration,
}

impl TweenSpec {
    fn ease(t: f32) -> f32 {
        let inv = 1.0 - t.clamp(0.0, 1.0);
        1.0 - inv * inv * inv
    }
}

impl Default for TweenSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
        }
    }
}

/// The profile used when a value is driven toward a fixed target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationSpec {
    Spring(SpringSpec),
    Tween(TweenSpec),
}

impl Default for AnimationSpec {
    fn default() -> Self {
        AnimationSpec::Spring(SpringSpec::default())
    }
}

// ───────────────────────────────────────── animation ─────────

#[derive(Debug, Clone, Copy)]
enum Motion {
    Spring { spec: SpringSpec, target: f32 },
    Tween { spec: TweenSpec, from: f32, target: f32, elapsed: Duration },
    Decay { spec: DecaySpec },
}

/// A running animation of a single value, confined to `[-bound, bound]`.
///
/// Reaching the bound ends the animation at the bound, whatever the profile.
#[derive(Debug, Clone, Copy)]
pub struct Animation {
    motion: Motion,
    value: f32,
    velocity: f32,
    bound: f32,
}

impl Animation {
    /// Animate from `from` toward `target` using `spec`.
    pub fn to_target(
        spec: AnimationSpec,
        from: f32,
        target: f32,
        initial_velocity: f32,
        bound: f32,
    ) -> Self {
        let motion = match spec {
            AnimationSpec::Spring(spec) => Motion::Spring { spec, target },
            AnimationSpec::Tween(spec) => Motion::Tween {
                spec,
                from,
                target,
                elapsed: Duration::ZERO,
            },
        };
        Self {
            motion,
            value: from,
            velocity: initial_velocity,
            bound: bound.abs(),
        }
    }

    /// Let `from` coast with `initial_velocity` until friction or the bound stops it.
    pub fn decay(spec: DecaySpec, from: f32, initial_velocity: f32, bound: f32) -> Self {
        Self {
            motion: Motion::Decay { spec },
            value: from,
            velocity: initial_velocity,
            bound: bound.abs(),
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance by one frame.  Returns `true` once the animation has finished;
    /// the final value is then exactly the target (or the bound it hit).
    pub fn advance(&mut self, dt: Duration) -> bool {
        let secs = dt.as_secs_f32();
        let mut finished = match &mut self.motion {
            Motion::Spring { spec, target } => {
                let (y, v) = spec.step(self.value - *target, self.velocity, secs);
                self.value = *target + y;
                self.velocity = v;
                if y.abs() < REST_DISPLACEMENT && v.abs() < REST_VELOCITY {
                    self.value = *target;
                    self.velocity = 0.0;
                    true
                } else {
                    false
                }
            }
            Motion::Tween {
                spec,
                from,
                target,
                elapsed,
            } => {
                let prev = self.value;
                *elapsed += dt;
                let total = spec.duration.as_secs_f32().max(f32::EPSILON);
                let t = elapsed.as_secs_f32() / total;
                self.value = *from + (*target - *from) * TweenSpec::ease(t);
                self.velocity = if secs > 0.0 { (self.value - prev) / secs } else { 0.0 };
                if t >= 1.0 {
                    self.value = *target;
                    self.velocity = 0.0;
                    true
                } else {
                    false
                }
            }
            Motion::Decay { spec } => {
                let (x, v) = spec.step(self.value, self.velocity, secs);
                self.value = x;
                self.velocity = v;
                if v.abs() < spec.velocity_threshold {
                    self.velocity = 0.0;
                    true
                } else {
                    false
                }
            }
        };

        if self.value.abs() >= self.bound {
            self.value = self.bound.copysign(self.value);
            self.velocity = 0.0;
            finished = true;
        }
        finished
    }
}
