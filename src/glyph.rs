use crate::{
    core::Rgba8,
    rng::Rng64,
    surface::{BlendMode, Surface},
};

/// Number of brightness levels in the shading ramp.
pub const RAMP_LEN: usize = 10;

/// An 8x8 monochrome bitmap glyph. `rows[y]` holds one row, MSB leftmost.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Glyph {
    pub ch: char,
    rows: [u8; 8],
}

impl Glyph {
    const fn new(ch: char, rows: [u8; 8]) -> Self {
        Self { ch, rows }
    }

    pub fn is_set(&self, col: usize, row: usize) -> bool {
        if col >= 8 || row >= 8 {
            return false;
        }
        self.rows[row] & (0x80 >> col) != 0
    }
}

/// The classic density ramp " .:-=+*#%@", darkest to brightest.
static RAMP: [Glyph; RAMP_LEN] = [
    Glyph::new(' ', [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]),
    Glyph::new('.', [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00]),
    Glyph::new(':', [0x00, 0x18, 0x18, 0x00, 0x00, 0x18, 0x18, 0x00]),
    Glyph::new('-', [0x00, 0x00, 0x00, 0x7E, 0x00, 0x00, 0x00, 0x00]),
    Glyph::new('=', [0x00, 0x00, 0x7E, 0x00, 0x7E, 0x00, 0x00, 0x00]),
    Glyph::new('+', [0x00, 0x18, 0x18, 0x7E, 0x18, 0x18, 0x00, 0x00]),
    Glyph::new('*', [0x00, 0x66, 0x3C, 0xFF, 0x3C, 0x66, 0x00, 0x00]),
    Glyph::new('#', [0x6C, 0x6C, 0xFE, 0x6C, 0xFE, 0x6C, 0x6C, 0x00]),
    Glyph::new('%', [0x62, 0x66, 0x0C, 0x18, 0x30, 0x66, 0x46, 0x00]),
    Glyph::new('@', [0x3C, 0x66, 0x6E, 0x6A, 0x6E, 0x60, 0x3C, 0x00]),
];

/// Block-drawing glyphs substituted near the orb while the glitch is hot.
static CORRUPTION: [Glyph; 8] = [
    Glyph::new('█', [0xFF; 8]),
    Glyph::new('▓', [0xDD, 0x77, 0xDD, 0x77, 0xDD, 0x77, 0xDD, 0x77]),
    Glyph::new('▒', [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55]),
    Glyph::new('░', [0x88, 0x00, 0x22, 0x00, 0x88, 0x00, 0x22, 0x00]),
    Glyph::new('▄', [0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFF]),
    Glyph::new('▀', [0xFF, 0xFF, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00]),
    Glyph::new('■', [0x00, 0x7E, 0x7E, 0x7E, 0x7E, 0x7E, 0x7E, 0x00]),
    Glyph::new('□', [0x00, 0x7E, 0x42, 0x42, 0x42, 0x42, 0x7E, 0x00]),
];

/// Map a brightness in [0, 1] to a ramp index. Total over all inputs: the
/// result is always in [0, 9].
pub fn ramp_index(brightness: f64) -> usize {
    let b = if brightness.is_finite() {
        brightness.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((b * (RAMP_LEN - 1) as f64).floor() as usize).min(RAMP_LEN - 1)
}

pub fn ramp_glyph(index: usize) -> &'static Glyph {
    &RAMP[index.min(RAMP_LEN - 1)]
}

pub fn corruption_glyph(rng: &mut Rng64) -> &'static Glyph {
    let i = (rng.next_f64() * CORRUPTION.len() as f64) as usize;
    &CORRUPTION[i.min(CORRUPTION.len() - 1)]
}

impl Surface {
    /// Blit a glyph centered on `(cx, cy)`.
    pub fn draw_glyph(&mut self, cx: f64, cy: f64, glyph: &Glyph, color: Rgba8) {
        let left = (cx - 4.0).round() as i64;
        let top = (cy - 4.0).round() as i64;
        for row in 0..8usize {
            for col in 0..8usize {
                if glyph.is_set(col, row) {
                    self.blend_pixel(
                        left + col as i64,
                        top + row as i64,
                        color,
                        BlendMode::SourceOver,
                        1.0,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Canvas;

    #[test]
    fn ramp_index_is_always_in_bounds() {
        for b in [
            -1.0,
            0.0,
            0.1,
            0.5,
            0.999,
            1.0,
            2.0,
            f64::NAN,
            f64::INFINITY,
            f64::NEG_INFINITY,
        ] {
            let i = ramp_index(b);
            assert!(i < RAMP_LEN, "brightness {b} gave index {i}");
        }
        assert_eq!(ramp_index(0.0), 0);
        assert_eq!(ramp_index(1.0), 9);
    }

    #[test]
    fn ramp_density_increases() {
        let coverage = |g: &Glyph| -> u32 {
            (0..8)
                .flat_map(|r| (0..8).map(move |c| (c, r)))
                .filter(|&(c, r)| g.is_set(c, r))
                .count() as u32
        };
        // Not strictly monotonic glyph by glyph, but the ends must differ
        // sharply and nothing outdarkens the full block.
        assert_eq!(coverage(ramp_glyph(0)), 0);
        assert!(coverage(ramp_glyph(9)) > coverage(ramp_glyph(1)) * 4);
    }

    #[test]
    fn corruption_pick_is_uniformly_in_bounds() {
        let mut rng = Rng64::new(5);
        for _ in 0..100 {
            let g = corruption_glyph(&mut rng);
            assert!(CORRUPTION.iter().any(|c| c.ch == g.ch));
        }
    }

    #[test]
    fn draw_glyph_marks_pixels() {
        let mut s = Surface::new(Canvas::new(16, 16));
        s.draw_glyph(8.0, 8.0, ramp_glyph(9), Rgba8::WHITE);
        let lit = (0..16)
            .flat_map(|y| (0..16).map(move |x| (x, y)))
            .filter(|&(x, y)| s.pixel(x, y).unwrap().a > 0)
            .count();
        assert!(lit > 10);
    }

    #[test]
    fn draw_glyph_clips_at_edges() {
        let mut s = Surface::new(Canvas::new(4, 4));
        s.draw_glyph(-10.0, -10.0, ramp_glyph(9), Rgba8::WHITE);
        s.draw_glyph(100.0, 100.0, ramp_glyph(9), Rgba8::WHITE);
    }
}
