//! Explosion particles
//!
//! A finite batch of decorative particles that burst out of the logo while the
//! intro plays. Each particle starts at the center with zero scale and flies to
//! its own offset while fading out.
//!
//! Colors are assigned round-robin by index rather than at random, so the
//! three brand tints always appear in near-equal numbers.

use crate::config::ExplosionConfig;
use crate::rng::RandomSource;
use serde::Serialize;
use std::sync::Arc;
use xescrow_animation::Easing;
use xescrow_core::{Color, Gradient, Size, Vec2};

/// One of the three brand tints
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticleStyle {
    /// #8B3DFF
    Violet,
    /// #6F5AFF
    Indigo,
    /// #5FC8FF
    Sky,
}

impl ParticleStyle {
    pub const ALL: [ParticleStyle; 3] = [
        ParticleStyle::Violet,
        ParticleStyle::Indigo,
        ParticleStyle::Sky,
    ];

    /// Style for the particle at `index`
    pub fn for_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn color(self) -> Color {
        match self {
            ParticleStyle::Violet => Color::from_hex(0x8B3DFF),
            ParticleStyle::Indigo => Color::from_hex(0x6F5AFF),
            ParticleStyle::Sky => Color::from_hex(0x5FC8FF),
        }
    }

    /// Radial fill, solid at the center and transparent at the rim
    pub fn gradient(self) -> Gradient {
        Gradient::radial_fade(self.color())
    }
}

/// A generated explosion particle (immutable once created)
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Particle {
    /// Index within its batch
    pub id: u32,
    pub size: Size,
    pub style: ParticleStyle,
    /// Displacement from the center at the end of the flight
    pub target_offset: Vec2,
    /// Scale at the end of the flight
    pub scale: f32,
    pub launch_delay_ms: f32,
}

/// Pose of a particle at one instant
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ParticleFrame {
    pub id: u32,
    pub size: Size,
    pub style: ParticleStyle,
    /// Radial fill of the style, for hosts that paint it directly
    pub fill: Gradient,
    pub offset: Vec2,
    pub scale: f32,
    pub opacity: f32,
}

impl Particle {
    /// Pose `elapsed_ms` after the intro started
    ///
    /// Holds the start pose until the launch delay passes, then eases out
    /// toward the target over `flight_ms`.
    pub fn sample(&self, elapsed_ms: f32, flight_ms: f32) -> ParticleFrame {
        let t = if flight_ms > 0.0 {
            ((elapsed_ms - self.launch_delay_ms) / flight_ms).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let e = Easing::EaseOut.apply(t);

        ParticleFrame {
            id: self.id,
            size: self.size,
            style: self.style,
            fill: self.style.gradient(),
            offset: self.target_offset.scale(e),
            scale: self.scale * e,
            opacity: 1.0 - e,
        }
    }
}

/// An ordered, shareable batch from one generator run
#[derive(Clone, Debug)]
pub struct ParticleBatch {
    particles: Arc<[Particle]>,
}

impl ParticleBatch {
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Particle> {
        self.particles.iter()
    }

    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// Poses of every particle at `elapsed_ms`
    pub fn sample(&self, elapsed_ms: f32, flight_ms: f32) -> Vec<ParticleFrame> {
        self.particles
            .iter()
            .map(|p| p.sample(elapsed_ms, flight_ms))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParticleBatch {
    type Item = &'a Particle;
    type IntoIter = std::slice::Iter<'a, Particle>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Produces explosion batches
///
/// Holds no random state of its own; every call draws from the source it is
/// given, so repeated calls are independent batches.
#[derive(Clone, Debug, Default)]
pub struct ExplosionGenerator {
    config: ExplosionConfig,
}

impl ExplosionGenerator {
    pub fn new(config: ExplosionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }

    /// Generate a fresh batch of exactly `config.count` particles
    pub fn generate<R: RandomSource + ?Sized>(&self, rng: &mut R) -> ParticleBatch {
        let c = &self.config;
        let particles: Arc<[Particle]> = (0..c.count)
            .map(|i| Particle {
                id: i as u32,
                size: Size::new(rng.sample(&c.width), rng.sample(&c.height)),
                style: ParticleStyle::for_index(i),
                target_offset: Vec2::new(rng.sample(&c.offset_x), rng.sample(&c.offset_y)),
                scale: rng.sample(&c.scale),
                launch_delay_ms: rng.sample(&c.launch_delay_ms),
            })
            .collect();

        tracing::debug!(count = particles.len(), "generated explosion batch");
        ParticleBatch { particles }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_exact_count() {
        let generator = ExplosionGenerator::default();
        let mut rng = seeded(3);
        assert_eq!(generator.generate(&mut rng).len(), 80);
    }

    #[test]
    fn test_values_within_bounds() {
        let generator = ExplosionGenerator::default();
        let c = generator.config().clone();
        let mut rng = seeded(11);

        for seed_round in 0..20 {
            let batch = generator.generate(&mut rng);
            for p in &batch {
                assert!(c.width.contains(p.size.width), "round {seed_round}: {p:?}");
                assert!(c.height.contains(p.size.height));
                assert!(c.offset_x.contains(p.target_offset.x));
                assert!(c.offset_y.contains(p.target_offset.y));
                assert!(c.scale.contains(p.scale));
                assert!(p.scale > 0.0);
                assert!(c.launch_delay_ms.contains(p.launch_delay_ms));
            }
        }
    }

    #[test]
    fn test_round_robin_colors() {
        let batch = ExplosionGenerator::default().generate(&mut seeded(5));
        for (i, p) in batch.iter().enumerate() {
            assert_eq!(p.id as usize, i);
            assert_eq!(p.style, ParticleStyle::ALL[i % 3]);
        }
        let violet = batch
            .iter()
            .filter(|p| p.style == ParticleStyle::Violet)
            .count();
        assert_eq!(violet, 27);
    }

    #[test]
    fn test_width_and_height_independent() {
        let batch = ExplosionGenerator::default().generate(&mut seeded(9));
        assert!(batch.iter().any(|p| p.size.width != p.size.height));
    }

    #[test]
    fn test_calls_are_independent() {
        let generator = ExplosionGenerator::default();
        let mut rng = seeded(21);
        let a = generator.generate(&mut rng);
        let b = generator.generate(&mut rng);
        assert_eq!(a.len(), b.len());
        assert_ne!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_seed_reproducible() {
        let generator = ExplosionGenerator::default();
        let a = generator.generate(&mut seeded(99));
        let b = generator.generate(&mut seeded(99));
        assert_eq!(a.as_slice(), b.as_slice());
    }

    #[test]
    fn test_particle_flight() {
        let p = Particle {
            id: 0,
            size: Size::new(20.0, 20.0),
            style: ParticleStyle::Violet,
            target_offset: Vec2::new(-400.0, 200.0),
            scale: 2.0,
            launch_delay_ms: 500.0,
        };

        let start = p.sample(100.0, 3000.0);
        assert_eq!(start.offset, Vec2::ZERO);
        assert_eq!(start.scale, 0.0);
        assert_eq!(start.opacity, 1.0);
        assert_eq!(start.fill, ParticleStyle::Violet.gradient());
        assert!(start.fill.to_css().starts_with("radial-gradient(circle, rgba(139, 61, 255, 1)"));

        let mid = p.sample(2000.0, 3000.0);
        assert!(mid.offset.x < 0.0 && mid.offset.x > -400.0);
        assert!(mid.opacity > 0.0 && mid.opacity < 1.0);

        let end = p.sample(3500.0, 3000.0);
        assert_eq!(end.offset, Vec2::new(-400.0, 200.0));
        assert_eq!(end.scale, 2.0);
        assert_eq!(end.opacity, 0.0);
    }

    #[test]
    fn test_style_gradients() {
        assert_eq!(ParticleStyle::Sky.color(), Color::from_hex(0x5FC8FF));
        assert_eq!(ParticleStyle::for_index(4), ParticleStyle::Indigo);
        assert_eq!(
            ParticleStyle::Violet.gradient().stops()[1].color.a,
            0.0
        );
    }
}
