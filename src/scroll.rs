use kurbo::Vec2;

/// Normalized progress through the hero section's scroll extent.
///
/// Always in [0, 1]: construction clamps over-scroll in both directions, and
/// a zero or negative extent pins progress to 0.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct ScrollProgress(f64);

impl ScrollProgress {
    pub fn new(value: f64) -> Self {
        if value.is_finite() {
            Self(value.clamp(0.0, 1.0))
        } else {
            Self(0.0)
        }
    }

    pub fn from_offset(offset_px: f64, extent_px: f64) -> Self {
        if extent_px > 0.0 {
            Self::new(offset_px / extent_px)
        } else {
            Self(0.0)
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Where a fragment sits at a given scroll position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FragmentPlacement {
    pub translate: Vec2,
    /// Effective opacity in [0, 1].
    pub opacity: f64,
}

/// A text fragment overlaid on the hero, drifting and fading as the user
/// scrolls. Purely declarative: the placement is a linear function of
/// progress and nothing here draws.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OverlayFragment {
    pub text: String,
    /// Pixels of translation per unit of scroll progress.
    pub translate_per_unit: Vec2,
    /// How fast the fragment fades: opacity reaches zero at `1 / fade_rate`
    /// progress.
    pub fade_rate: f64,
    pub base_opacity: f64,
}

impl OverlayFragment {
    pub fn new(
        text: impl Into<String>,
        translate_per_unit: Vec2,
        fade_rate: f64,
        base_opacity: f64,
    ) -> Self {
        Self {
            text: text.into(),
            translate_per_unit,
            fade_rate,
            base_opacity,
        }
    }

    pub fn placement(&self, progress: ScrollProgress) -> FragmentPlacement {
        let p = progress.value();
        FragmentPlacement {
            translate: self.translate_per_unit * p,
            opacity: (self.base_opacity * (1.0 - p * self.fade_rate).max(0.0)).clamp(0.0, 1.0),
        }
    }
}

/// The fragment set overlaid on the landing hero.
#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub fragments: Vec<OverlayFragment>,
}

impl Overlay {
    pub fn landing() -> Self {
        let quote = |text: &str, dir: f64| {
            OverlayFragment::new(text, Vec2::new(200.0 * dir, 0.0), 2.0, 0.8)
        };
        Self {
            fragments: vec![
                quote("In emptiness we find true happiness", 1.0),
                quote("Happiness ends, no matter what you do", 1.0),
                quote("AI models does n0t show any Emotions", 1.0),
                quote("In the dark is where light takes form", -1.0),
                OverlayFragment::new("RESONANCE", Vec2::new(0.0, 100.0), 1.5, 1.0),
                OverlayFragment::new("Ask Resonance", Vec2::new(0.0, 100.0), 1.5, 1.0),
                OverlayFragment::new("AI Engineered by @Bhargav", Vec2::new(0.0, 50.0), 1.5, 0.7),
            ],
        }
    }

    pub fn placements(&self, progress: ScrollProgress) -> Vec<(&OverlayFragment, FragmentPlacement)> {
        self.fragments
            .iter()
            .map(|f| (f, f.placement(progress)))
            .collect()
    }
}
