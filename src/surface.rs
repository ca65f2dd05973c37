use std::f64::consts::TAU;

use crate::{
    core::{Canvas, Point, Rgba8},
    error::{ResonanceError, ResonanceResult},
};

/// A finished frame handed to encoders/writers. Straight RGBA8, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

/// The composite operations the scene uses. `SourceOver` is plain alpha
/// compositing; the rest apply the separable blend formula to the color
/// channels before compositing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BlendMode {
    SourceOver,
    Screen,
    Multiply,
    Difference,
    Overlay,
}

fn blend_channel(mode: BlendMode, s: f32, d: f32) -> f32 {
    match mode {
        BlendMode::SourceOver => s,
        BlendMode::Screen => s + d - s * d,
        BlendMode::Multiply => s * d,
        BlendMode::Difference => (d - s).abs(),
        BlendMode::Overlay => {
            if d <= 0.5 {
                2.0 * s * d
            } else {
                1.0 - 2.0 * (1.0 - s) * (1.0 - d)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Rgba8,
}

impl GradientStop {
    pub fn new(offset: f64, color: Rgba8) -> Self {
        Self { offset, color }
    }
}

/// A radial gradient with independent x/y radii (the glitch distortion
/// scales the orb anisotropically). Stops must be sorted by offset.
#[derive(Clone, Debug, PartialEq)]
pub struct RadialGradient {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub stops: Vec<GradientStop>,
}

impl RadialGradient {
    pub fn circle(center: Point, radius: f64, stops: Vec<GradientStop>) -> Self {
        Self {
            center,
            radius_x: radius,
            radius_y: radius,
            stops,
        }
    }

    /// Color at normalized distance `t` in [0, 1] from the center.
    pub fn sample(&self, t: f64) -> Rgba8 {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 1.0 };

        let Some(first) = self.stops.first() else {
            return Rgba8::transparent();
        };
        if t <= first.offset {
            return first.color;
        }

        for pair in self.stops.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t <= b.offset {
                let span = b.offset - a.offset;
                if span <= 0.0 {
                    return b.color;
                }
                return Rgba8::lerp(a.color, b.color, (t - a.offset) / span);
            }
        }

        self.stops[self.stops.len() - 1].color
    }
}

/// An owned RGBA8 raster the size of the viewport. All drawing ops are total:
/// out-of-bounds work is clipped and a zero-area surface accepts every call
/// as a no-op.
#[derive(Clone, Debug)]
pub struct Surface {
    canvas: Canvas,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0; canvas.pixel_count() * 4],
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn width(&self) -> u32 {
        self.canvas.width
    }

    pub fn height(&self) -> u32 {
        self.canvas.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn to_frame(&self) -> FrameRgba {
        FrameRgba {
            width: self.canvas.width,
            height: self.canvas.height,
            data: self.data.clone(),
        }
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Overwrite every pixel with `color` (no blending).
    pub fn fill(&mut self, color: Rgba8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        Some(Rgba8::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Blend one pixel. `coverage` scales the source alpha (anti-aliased
    /// edges, global opacities).
    pub fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba8, mode: BlendMode, coverage: f32) {
        if x < 0 || y < 0 || x >= i64::from(self.canvas.width) || y >= i64::from(self.canvas.height)
        {
            return;
        }

        let sa = f32::from(color.a) / 255.0 * coverage.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }

        let i = (y as usize * self.canvas.width as usize + x as usize) * 4;
        let da = f32::from(self.data[i + 3]) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return;
        }

        for c in 0..3 {
            let s = f32::from(color.channel(c)) / 255.0;
            let d = f32::from(self.data[i + c]) / 255.0;
            // The blend result only applies where the backdrop has
            // coverage; uncovered backdrop passes the source through.
            let mixed = (1.0 - da) * s + da * blend_channel(mode, s, d);
            let out = (sa * mixed + d * da * (1.0 - sa)) / out_a;
            self.data[i + c] = (out * 255.0).round().clamp(0.0, 255.0) as u8;
        }
        self.data[i + 3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    pub fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgba8, mode: BlendMode) {
        if !(w > 0.0 && h > 0.0) {
            return;
        }
        let x0 = x.floor() as i64;
        let y0 = y.floor() as i64;
        let x1 = (x + w).ceil() as i64;
        let y1 = (y + h).ceil() as i64;
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, color, mode, 1.0);
            }
        }
    }

    pub fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8, mode: BlendMode) {
        self.fill_ellipse(center, radius, radius, color, mode);
    }

    pub fn fill_ellipse(
        &mut self,
        center: Point,
        rx: f64,
        ry: f64,
        color: Rgba8,
        mode: BlendMode,
    ) {
        if !(rx > 0.0 && ry > 0.0) {
            return;
        }
        let x0 = (center.x - rx).floor() as i64;
        let x1 = (center.x + rx).ceil() as i64;
        let y0 = (center.y - ry).floor() as i64;
        let y1 = (center.y + ry).ceil() as i64;
        let edge = rx.min(ry);

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = (px as f64 + 0.5 - center.x) / rx;
                let dy = (py as f64 + 0.5 - center.y) / ry;
                let nd = (dx * dx + dy * dy).sqrt();
                // Signed pixel distance from the edge, positive inside.
                let coverage = ((1.0 - nd) * edge + 0.5).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend_pixel(px, py, color, mode, coverage as f32);
                }
            }
        }
    }

    pub fn stroke_ring(&mut self, center: Point, radius: f64, width: f64, color: Rgba8) {
        self.stroke_arc(center, radius, 0.0, TAU, width, color);
    }

    /// Stroke the arc from `a0` sweeping counterclockwise to `a1` (radians).
    pub fn stroke_arc(
        &mut self,
        center: Point,
        radius: f64,
        a0: f64,
        a1: f64,
        width: f64,
        color: Rgba8,
    ) {
        if !(radius > 0.0 && width > 0.0) {
            return;
        }
        let sweep = (a1 - a0).clamp(0.0, TAU);
        let reach = radius + width / 2.0 + 1.0;
        let x0 = (center.x - reach).floor() as i64;
        let x1 = (center.x + reach).ceil() as i64;
        let y0 = (center.y - reach).floor() as i64;
        let y1 = (center.y + reach).ceil() as i64;

        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f64 + 0.5 - center.x;
                let dy = py as f64 + 0.5 - center.y;
                let dist = (dx * dx + dy * dy).sqrt();
                let coverage = (width / 2.0 + 0.5 - (dist - radius).abs()).clamp(0.0, 1.0);
                if coverage <= 0.0 {
                    continue;
                }
                if sweep < TAU {
                    let angle = dy.atan2(dx);
                    if (angle - a0).rem_euclid(TAU) > sweep {
                        continue;
                    }
                }
                self.blend_pixel(px, py, color, BlendMode::SourceOver, coverage as f32);
            }
        }
    }

    /// 1 px horizontal line from `x0` to `x1` inclusive.
    pub fn hline(&mut self, x0: f64, x1: f64, y: f64, color: Rgba8) {
        let (lo, hi) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let py = y.round() as i64;
        for px in (lo.round() as i64)..=(hi.round() as i64) {
            self.blend_pixel(px, py, color, BlendMode::SourceOver, 1.0);
        }
    }

    /// Paint `gradient` across the whole surface.
    pub fn fill_radial(&mut self, gradient: &RadialGradient, mode: BlendMode) {
        if gradient.radius_x <= 0.0 || gradient.radius_y <= 0.0 {
            return;
        }
        for py in 0..self.canvas.height {
            for px in 0..self.canvas.width {
                let dx = (f64::from(px) + 0.5 - gradient.center.x) / gradient.radius_x;
                let dy = (f64::from(py) + 0.5 - gradient.center.y) / gradient.radius_y;
                let t = (dx * dx + dy * dy).sqrt();
                let color = gradient.sample(t);
                self.blend_pixel(i64::from(px), i64::from(py), color, mode, 1.0);
            }
        }
    }

    /// Composite `src` over the whole surface with the given mode and global
    /// opacity. Surfaces must match in size.
    pub fn composite_from(
        &mut self,
        src: &Surface,
        mode: BlendMode,
        opacity: f32,
    ) -> ResonanceResult<()> {
        if src.canvas != self.canvas {
            return Err(ResonanceError::validation(
                "composite_from expects equal-size surfaces",
            ));
        }
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity <= 0.0 {
            return Ok(());
        }
        for py in 0..self.canvas.height {
            for px in 0..self.canvas.width {
                let i = (py as usize * self.canvas.width as usize + px as usize) * 4;
                let color = Rgba8::rgba(
                    src.data[i],
                    src.data[i + 1],
                    src.data[i + 2],
                    src.data[i + 3],
                );
                if color.a == 0 {
                    continue;
                }
                self.blend_pixel(i64::from(px), i64::from(py), color, mode, opacity);
            }
        }
        Ok(())
    }
}

impl Rgba8 {
    fn channel(self, i: usize) -> u8 {
        match i {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }
}
