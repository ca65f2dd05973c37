//! Procedural hero-scene renderer for the Resonance landing experience.
//!
//! The crate has two halves:
//!
//! - A tween-driven animated scene (`tween`, `scene`, `grain`, `scroll`,
//!   `hero`) rendered into CPU raster surfaces: an atmospheric gradient, a
//!   glitched orb, a fake rotating glyph sphere and a film-grain pass
//!   composited on top.
//! - A minimal chat client (`chat`): one JSON request/response per message
//!   against a configurable endpoint.
//!
//! Typical use: build a [`HeroScene`], call [`HeroScene::advance`] on your
//! clock, call [`HeroScene::render_frame`] per display refresh.
#![forbid(unsafe_code)]

pub mod chat;
pub mod core;
pub mod ease;
pub mod error;
pub mod glyph;
pub mod grain;
pub mod hero;
pub mod rng;
pub mod scene;
pub mod scroll;
pub mod surface;
pub mod tween;

pub use chat::{ChatSession, ChatTransport, HttpTransport, Message, Persona, Sender};
pub use crate::core::{Canvas, Fps, FrameIndex, Rgba8};
pub use ease::Ease;
pub use error::{ResonanceError, ResonanceResult};
pub use hero::{HeroScene, HeroSceneOpts};
pub use rng::Rng64;
pub use scroll::{Overlay, OverlayFragment, ScrollProgress};
pub use surface::{BlendMode, FrameRgba, Surface};
pub use tween::{ParamAnimator, Repeat, SceneParams, Tween};
