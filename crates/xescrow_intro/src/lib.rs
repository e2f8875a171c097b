//! Xescrow Intro
//!
//! The landing page intro: an explosion of particles under a glowing title,
//! then a one-way reveal of the page content.
//!
//! # Features
//!
//! - **Particle generator**: randomized explosion batch, round-robin brand colors
//! - **Ambient field**: slow drifting background dots for the life of the view
//! - **Intro sequencer**: `Intro -> Revealed` on a scoped one-shot timer
//! - **Reveal gate**: content opacity and interactivity from the phase
//! - **Landing page**: composes the above into serializable frame snapshots
//!
//! Everything runs off an [`AnimationScheduler`] the host drives, so a test can
//! step the clock and observe exact timings.
//!
//! # Example
//!
//! ```rust
//! use xescrow_animation::AnimationScheduler;
//! use xescrow_intro::{rng, IntroConfig, IntroPhase, LandingPage, RenderingEnvironment, StaticAssets};
//!
//! let scheduler = AnimationScheduler::new();
//! let page = LandingPage::mount(
//!     RenderingEnvironment::Client,
//!     &IntroConfig::default(),
//!     &scheduler.handle(),
//!     &StaticAssets::default(),
//!     &mut rng::seeded(42),
//! )?;
//!
//! assert_eq!(page.frame().particles.len(), 80);
//! scheduler.advance(3000);
//! assert_eq!(page.phase(), IntroPhase::Revealed);
//! # Ok::<(), xescrow_intro::IntroError>(())
//! ```
//!
//! [`AnimationScheduler`]: xescrow_animation::AnimationScheduler

pub mod ambient;
pub mod choreography;
pub mod config;
pub mod environment;
pub mod error;
pub mod gate;
pub mod logging;
pub mod menu;
pub mod page;
pub mod particles;
pub mod rng;
pub mod sequencer;

pub use ambient::{AmbientField, AmbientFieldGenerator, AmbientFrame, AmbientParticle};
pub use choreography::{ChoreographyFrame, IntroChoreography};
pub use config::{AmbientConfig, Bounds, ExplosionConfig, IntroConfig, RevealConfig, TimingConfig};
pub use environment::RenderingEnvironment;
pub use error::{IntroError, Result};
pub use gate::{GateState, RevealGate};
pub use menu::{Menu, Section};
pub use page::{AssetSource, FrameSnapshot, IdentityProvider, LandingPage, StaticAssets};
pub use particles::{ExplosionGenerator, Particle, ParticleBatch, ParticleFrame, ParticleStyle};
pub use rng::RandomSource;
pub use sequencer::{IntroPhase, IntroSequencer};
