//! Ambient background field
//!
//! A handful of faint dots scattered over the viewport, each drifting out to
//! its own offset and back forever. Unlike the explosion, the field is never
//! discarded; it lives as long as the page view.

use crate::config::AmbientConfig;
use crate::rng::RandomSource;
use serde::Serialize;
use xescrow_animation::{Easing, KeyframeTrack};
use xescrow_core::{Color, Size, Vec2};

/// Fill shared by every ambient particle (#8B3DFF at 20%)
pub fn ambient_color() -> Color {
    Color::from_hex(0x8B3DFF).with_alpha(0.2)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmbientParticle {
    pub index: u32,
    /// Percent of viewport height
    pub top_pct: f32,
    /// Percent of viewport width
    pub left_pct: f32,
    /// Pixel box; width and height are drawn independently
    pub size: Size,
    /// Peak displacement of the drift loop
    pub drift: Vec2,
    /// Length of one `0 -> drift -> 0` cycle
    pub period_ms: f32,
}

impl AmbientParticle {
    fn track(&self) -> KeyframeTrack<Vec2> {
        KeyframeTrack::evenly([Vec2::ZERO, self.drift, Vec2::ZERO], Easing::EaseInOut)
    }

    /// Drift offset `ms` after the field was mounted
    pub fn offset_at(&self, ms: f32) -> Vec2 {
        if self.period_ms <= 0.0 {
            return Vec2::ZERO;
        }
        let phase = ms.max(0.0).rem_euclid(self.period_ms) / self.period_ms;
        self.track().sample(phase).unwrap_or(Vec2::ZERO)
    }
}

/// Ambient particle as rendered at one instant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AmbientFrame {
    pub index: u32,
    pub top_pct: f32,
    pub left_pct: f32,
    pub size: Size,
    pub offset: Vec2,
}

/// The set of ambient particles for one page view
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AmbientField {
    particles: Vec<AmbientParticle>,
}

impl AmbientField {
    /// A field with nothing in it (server renders)
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[AmbientParticle] {
        &self.particles
    }

    pub fn sample(&self, ms: f32) -> Vec<AmbientFrame> {
        self.particles
            .iter()
            .map(|p| AmbientFrame {
                index: p.index,
                top_pct: p.top_pct,
                left_pct: p.left_pct,
                size: p.size,
                offset: p.offset_at(ms),
            })
            .collect()
    }
}

#[derive(Clone, Debug, Default)]
pub struct AmbientFieldGenerator {
    config: AmbientConfig,
}

impl AmbientFieldGenerator {
    pub fn new(config: AmbientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AmbientConfig {
        &self.config
    }

    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> AmbientField {
        let c = &self.config;
        let particles: Vec<AmbientParticle> = (0..c.count)
            .map(|i| AmbientParticle {
                index: i as u32,
                top_pct: rng.sample(&c.top_pct),
                left_pct: rng.sample(&c.left_pct),
                size: Size::new(rng.sample(&c.size), rng.sample(&c.size)),
                drift: Vec2::new(rng.sample(&c.drift), rng.sample(&c.drift)),
                period_ms: rng.sample(&c.period_ms),
            })
            .collect();

        tracing::debug!(count = particles.len(), "generated ambient field");
        AmbientField { particles }
    }
}
