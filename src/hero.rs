use crate::{
    core::Canvas,
    error::ResonanceResult,
    grain::{GRAIN_OVERLAY_OPACITY, render_grain},
    rng::Rng64,
    scene::render_scene,
    scroll::{FragmentPlacement, Overlay, OverlayFragment, ScrollProgress},
    surface::{BlendMode, FrameRgba, Surface},
    tween::{ParamAnimator, SceneParams},
};

#[derive(Clone, Copy, Debug)]
pub struct HeroSceneOpts {
    pub canvas: Canvas,
    /// Seed for the visual random stream; `None` seeds from entropy. The
    /// output is cosmetic, so reproducibility only matters to tests.
    pub seed: Option<u64>,
}

impl HeroSceneOpts {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas, seed: None }
    }
}

/// The animated hero: owns the tween set, the random stream, the scroll
/// state and the two render surfaces (scene below, grain above).
///
/// Everything runs on the caller's clock via [`HeroScene::advance`]; there
/// are no timers or callbacks to cancel, so dropping the scene is a complete
/// teardown.
pub struct HeroScene {
    animator: ParamAnimator,
    params: SceneParams,
    time_s: f64,
    rng: Rng64,
    scroll: ScrollProgress,
    overlay: Overlay,
    scene_surface: Surface,
    grain_surface: Surface,
}

impl HeroScene {
    pub fn new(opts: HeroSceneOpts) -> ResonanceResult<Self> {
        let animator = ParamAnimator::standard();
        animator.validate()?;

        let rng = match opts.seed {
            Some(seed) => Rng64::new(seed),
            None => Rng64::from_entropy(),
        };

        Ok(Self {
            animator,
            params: SceneParams::default(),
            time_s: 0.0,
            rng,
            scroll: ScrollProgress::default(),
            overlay: Overlay::landing(),
            scene_surface: Surface::new(opts.canvas),
            grain_surface: Surface::new(opts.canvas),
        })
    }

    pub fn canvas(&self) -> Canvas {
        self.scene_surface.canvas()
    }

    pub fn time(&self) -> f64 {
        self.time_s
    }

    /// Current animation parameter snapshot (read-only to callers, mutated
    /// only through `advance`).
    pub fn params(&self) -> SceneParams {
        self.params
    }

    /// Advance the animation clock by `dt_s` seconds.
    pub fn advance(&mut self, dt_s: f64) {
        let dt = dt_s.max(0.0);
        self.time_s += dt;
        self.params = self.animator.advance(dt, &mut self.rng);
    }

    pub fn set_scroll_offset(&mut self, offset_px: f64, extent_px: f64) {
        self.scroll = ScrollProgress::from_offset(offset_px, extent_px);
    }

    pub fn scroll_progress(&self) -> ScrollProgress {
        self.scroll
    }

    /// Overlay fragments with their placements at the current scroll
    /// position.
    pub fn overlay_placements(&self) -> Vec<(&OverlayFragment, FragmentPlacement)> {
        self.overlay.placements(self.scroll)
    }

    /// Render the current state into a finished frame: scene pass, grain
    /// pass, then the grain composited on top overlay-blended at 60%.
    #[tracing::instrument(skip(self), fields(t = self.time_s))]
    pub fn render_frame(&mut self) -> ResonanceResult<FrameRgba> {
        render_scene(&mut self.scene_surface, &self.params, &mut self.rng);
        render_grain(
            &mut self.grain_surface,
            &self.params,
            self.time_s,
            &mut self.rng,
        );
        self.scene_surface.composite_from(
            &self.grain_surface,
            BlendMode::Overlay,
            GRAIN_OVERLAY_OPACITY,
        )?;
        Ok(self.scene_surface.to_frame())
    }
}
