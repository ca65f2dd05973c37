use crate::error::{ResonanceError, ResonanceResult};

pub use kurbo::{Affine, Point, Vec2};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    pub num: u32,
    pub den: u32, // must be > 0
}

impl Fps {
    pub fn new(num: u32, den: u32) -> ResonanceResult<Self> {
        if num == 0 {
            return Err(ResonanceError::validation("Fps num must be > 0"));
        }
        if den == 0 {
            return Err(ResonanceError::validation("Fps den must be > 0"));
        }
        Ok(Self { num, den })
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixel_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_degenerate(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

/// Straight (non-premultiplied) RGBA8, matching canvas-2d color semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn transparent() -> Self {
        Self::rgba(0, 0, 0, 0)
    }

    /// White/black with the given opacity, the two workhorses of the grain
    /// and glyph passes.
    pub fn white(alpha: f64) -> Self {
        Self::rgba(255, 255, 255, alpha_to_u8(alpha))
    }

    pub fn black(alpha: f64) -> Self {
        Self::rgba(0, 0, 0, alpha_to_u8(alpha))
    }

    /// HSL with alpha. Hue in degrees (wraps), saturation and lightness as
    /// percentages in [0, 100], alpha in [0, 1].
    pub fn hsla(h_deg: f64, s_pct: f64, l_pct: f64, alpha: f64) -> Self {
        let h = (h_deg.rem_euclid(360.0)) / 60.0;
        let s = (s_pct / 100.0).clamp(0.0, 1.0);
        let l = (l_pct / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r1, g1, b1) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self {
            r: channel_to_u8(r1 + m),
            g: channel_to_u8(g1 + m),
            b: channel_to_u8(b1 + m),
            a: alpha_to_u8(alpha),
        }
    }

    pub fn lerp(a: Self, b: Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        let t = t.clamp(0.0, 1.0);
        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

fn channel_to_u8(v: f64) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn alpha_to_u8(a: f64) -> u8 {
    if a.is_finite() {
        (a * 255.0).round().clamp(0.0, 255.0) as u8
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fps_rejects_zero() {
        assert!(Fps::new(0, 1).is_err());
        assert!(Fps::new(60, 0).is_err());
        assert!((Fps::new(60, 1).unwrap().frame_duration_secs() - 1.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn hsla_primaries() {
        assert_eq!(Rgba8::hsla(0.0, 100.0, 50.0, 1.0), Rgba8::rgb(255, 0, 0));
        assert_eq!(Rgba8::hsla(120.0, 100.0, 50.0, 1.0), Rgba8::rgb(0, 255, 0));
        assert_eq!(Rgba8::hsla(240.0, 100.0, 50.0, 1.0), Rgba8::rgb(0, 0, 255));
    }

    #[test]
    fn hsla_wraps_hue() {
        assert_eq!(
            Rgba8::hsla(360.0 + 120.0, 100.0, 50.0, 1.0),
            Rgba8::hsla(120.0, 100.0, 50.0, 1.0)
        );
        assert_eq!(
            Rgba8::hsla(-240.0, 100.0, 50.0, 1.0),
            Rgba8::hsla(120.0, 100.0, 50.0, 1.0)
        );
    }

    #[test]
    fn hsla_lightness_extremes() {
        assert_eq!(Rgba8::hsla(200.0, 80.0, 100.0, 1.0), Rgba8::WHITE);
        assert_eq!(Rgba8::hsla(200.0, 80.0, 0.0, 1.0), Rgba8::BLACK);
    }

    #[test]
    fn lerp_endpoints() {
        let a = Rgba8::rgba(10, 20, 30, 40);
        let b = Rgba8::rgba(200, 210, 220, 230);
        assert_eq!(Rgba8::lerp(a, b, 0.0), a);
        assert_eq!(Rgba8::lerp(a, b, 1.0), b);
    }
}
