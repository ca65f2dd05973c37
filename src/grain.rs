use kurbo::Point;

use crate::{
    core::Rgba8,
    rng::Rng64,
    surface::{BlendMode, Surface},
    tween::SceneParams,
};

/// The grain surface sits above the scene at this opacity, overlay-blended.
pub const GRAIN_OVERLAY_OPACITY: f32 = 0.6;

/// Paint one frame of film grain plus dust speckles into `surface`.
/// Stateless: the previous frame is discarded, everything is re-rolled.
pub fn render_grain(surface: &mut Surface, params: &SceneParams, time_s: f64, rng: &mut Rng64) {
    surface.clear();

    let w = f64::from(surface.width());
    let h = f64::from(surface.height());
    if w == 0.0 || h == 0.0 {
        return;
    }

    // Per-pixel luminance noise, envelope wobbling around 0.22.
    let intensity = 0.22 + (time_s * 10.0).sin() * 0.03;
    for px in surface.data_mut().chunks_exact_mut(4) {
        let g = (rng.next_f64() - 0.5) * intensity * 255.0;
        let v = (128.0 + g).round().clamp(0.0, 255.0) as u8;
        let a = (g.abs() * 3.0).round().clamp(0.0, 255.0) as u8;
        px.copy_from_slice(&[v, v, v, a]);
    }

    // Extra white speckle while the glitch is hot.
    if params.glitch_intensity > 0.5 {
        for _ in 0..200 {
            let p = Point::new(rng.next_f64() * w, rng.next_f64() * h);
            let size = rng.next_f64() * 3.0 + 0.5;
            let opacity = rng.next_f64() * 0.5 * params.glitch_intensity;
            surface.fill_circle(p, size, Rgba8::white(opacity), BlendMode::Screen);
        }
    }

    // Baseline dust: bright motes...
    for _ in 0..100 {
        let p = Point::new(rng.next_f64() * w, rng.next_f64() * h);
        let size = rng.next_f64() * 2.0 + 0.5;
        let opacity = rng.next_f64() * 0.3;
        surface.fill_circle(p, size, Rgba8::white(opacity), BlendMode::Screen);
    }

    // ...and dark specks.
    for _ in 0..50 {
        let p = Point::new(rng.next_f64() * w, rng.next_f64() * h);
        let size = rng.next_f64() * 1.5 + 0.5;
        let opacity = rng.next_f64() * 0.5 + 0.5;
        surface.fill_circle(p, size, Rgba8::black(opacity), BlendMode::Multiply);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Canvas;

    fn params(glitch_intensity: f64) -> SceneParams {
        SceneParams {
            glitch_intensity,
            ..SceneParams::default()
        }
    }

    #[test]
    fn grain_is_mostly_translucent_noise() {
        let mut s = Surface::new(Canvas::new(64, 64));
        render_grain(&mut s, &params(0.0), 0.0, &mut Rng64::new(21));

        let mut translucent = 0usize;
        for y in 0..64 {
            for x in 0..64 {
                let px = s.pixel(x, y).unwrap();
                // Base noise alpha caps out near |0.125 * 255| * 3.
                if px.a < 128 {
                    translucent += 1;
                }
            }
        }
        assert!(translucent > 64 * 64 / 2);
    }

    #[test]
    fn glitch_adds_speckle() {
        let mut calm = Surface::new(Canvas::new(64, 64));
        let mut hot = Surface::new(Canvas::new(64, 64));
        render_grain(&mut calm, &params(0.0), 1.0, &mut Rng64::new(8));
        render_grain(&mut hot, &params(1.0), 1.0, &mut Rng64::new(8));

        let brightness = |s: &Surface| -> u64 {
            s.data()
                .chunks_exact(4)
                .map(|px| u64::from(px[0]) * u64::from(px[3]))
                .sum()
        };
        assert!(brightness(&hot) > brightness(&calm));
    }

    #[test]
    fn same_seed_same_grain() {
        let mut a = Surface::new(Canvas::new(32, 32));
        let mut b = Surface::new(Canvas::new(32, 32));
        render_grain(&mut a, &params(0.3), 2.5, &mut Rng64::new(77));
        render_grain(&mut b, &params(0.3), 2.5, &mut Rng64::new(77));
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn degenerate_canvas_is_fine() {
        let mut s = Surface::new(Canvas::new(0, 5));
        render_grain(&mut s, &params(1.0), 0.0, &mut Rng64::new(1));
    }
}
