use std::f64::consts::TAU;

use crate::{
    ease::Ease,
    error::{ResonanceError, ResonanceResult},
    rng::Rng64,
};

/// How a tween continues after finishing a leg. Both modes repeat forever;
/// the owning scene dropping the tween is the only way it stops.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Repeat {
    /// Snap back to the start value and play forward again.
    Loop,
    /// Play the next leg in the opposite direction.
    Yoyo,
}

/// A time-driven scalar interpolation between two values, looping forever.
///
/// An optional repeat delay inserts a randomized gap between legs; during the
/// gap the value holds at the level the previous leg ended on.
#[derive(Clone, Debug)]
pub struct Tween {
    from: f64,
    to: f64,
    duration_s: f64,
    ease: Ease,
    repeat: Repeat,
    delay_range_s: Option<(f64, f64)>,

    elapsed_s: f64,
    gap_s: f64,
    forward: bool,
    value: f64,
}

impl Tween {
    pub fn new(from: f64, to: f64, duration_s: f64, ease: Ease, repeat: Repeat) -> Self {
        Self {
            from,
            to,
            duration_s,
            ease,
            repeat,
            delay_range_s: None,
            elapsed_s: 0.0,
            gap_s: 0.0,
            forward: true,
            value: from,
        }
    }

    /// Re-roll a gap uniformly in `[lo_s, hi_s]` after every completed leg.
    pub fn with_repeat_delay(mut self, lo_s: f64, hi_s: f64) -> Self {
        self.delay_range_s = Some((lo_s, hi_s));
        self
    }

    pub fn validate(&self) -> ResonanceResult<()> {
        if !self.duration_s.is_finite() || self.duration_s <= 0.0 {
            return Err(ResonanceError::animation(
                "Tween duration must be finite and > 0",
            ));
        }
        if let Some((lo, hi)) = self.delay_range_s {
            if !(lo.is_finite() && hi.is_finite()) || lo < 0.0 || hi < lo {
                return Err(ResonanceError::animation(
                    "Tween repeat delay range must satisfy 0 <= lo <= hi",
                ));
            }
        }
        Ok(())
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Advance by `dt_s` seconds and return the interpolated value.
    ///
    /// A non-positive duration would never make progress; such tweens are
    /// rejected by `validate` and left untouched here.
    pub fn advance(&mut self, dt_s: f64, rng: &mut Rng64) -> f64 {
        if !self.duration_s.is_finite() || self.duration_s <= 0.0 {
            return self.value;
        }

        let mut remaining = dt_s.max(0.0);

        while remaining > 0.0 {
            if self.gap_s > 0.0 {
                let consumed = self.gap_s.min(remaining);
                self.gap_s -= consumed;
                remaining -= consumed;
                continue;
            }

            let leg_left = self.duration_s - self.elapsed_s;
            if remaining < leg_left {
                self.elapsed_s += remaining;
                remaining = 0.0;
            } else {
                remaining -= leg_left;
                self.elapsed_s = 0.0;
                if self.repeat == Repeat::Yoyo {
                    self.forward = !self.forward;
                }
                if let Some((lo, hi)) = self.delay_range_s {
                    self.gap_s = rng.range(lo, hi);
                }
            }
        }

        let t = (self.elapsed_s / self.duration_s).clamp(0.0, 1.0);
        let te = self.ease.apply(t);
        let (a, b) = if self.forward {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        };
        self.value = a + (b - a) * te;
        self.value
    }
}

/// The shared animation state the renderer reads once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneParams {
    /// Sphere rotation angle in [0, 2π).
    pub rotation: f64,
    /// Atmosphere hue drift in [0, 1].
    pub atmosphere_shift: f64,
    /// Corruption strength in [0, 1]; most glitch branches gate on > 0.5.
    pub glitch_intensity: f64,
    /// Fast flicker scalar in [0, 1].
    pub glitch_frequency: f64,
}

/// Drives the four concurrent tweens behind [`SceneParams`].
///
/// All four advance on the caller's clock; nothing here schedules itself, so
/// dropping the animator is a complete teardown.
#[derive(Clone, Debug)]
pub struct ParamAnimator {
    rotation: Tween,
    atmosphere: Tween,
    glitch_pulse: Tween,
    glitch_flicker: Tween,
}

impl ParamAnimator {
    /// The landing scene's timings: a 20 s full rotation, a 6 s hue breath,
    /// a 0.1 s glitch pulse separated by 1-4 s gaps, and a 0.05 s flicker.
    pub fn standard() -> Self {
        Self {
            rotation: Tween::new(0.0, TAU, 20.0, Ease::Linear, Repeat::Loop),
            atmosphere: Tween::new(0.0, 1.0, 6.0, Ease::InOutSine, Repeat::Yoyo),
            glitch_pulse: Tween::new(0.0, 1.0, 0.1, Ease::InOutCubic, Repeat::Yoyo)
                .with_repeat_delay(1.0, 4.0),
            glitch_flicker: Tween::new(0.0, 1.0, 0.05, Ease::Linear, Repeat::Yoyo),
        }
    }

    pub fn validate(&self) -> ResonanceResult<()> {
        self.rotation.validate()?;
        self.atmosphere.validate()?;
        self.glitch_pulse.validate()?;
        self.glitch_flicker.validate()
    }

    pub fn advance(&mut self, dt_s: f64, rng: &mut Rng64) -> SceneParams {
        SceneParams {
            rotation: self.rotation.advance(dt_s, rng).rem_euclid(TAU),
            atmosphere_shift: self.atmosphere.advance(dt_s, rng),
            glitch_intensity: self.glitch_pulse.advance(dt_s, rng),
            glitch_frequency: self.glitch_flicker.advance(dt_s, rng),
        }
    }
}
