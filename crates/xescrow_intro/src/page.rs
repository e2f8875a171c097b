//! Landing page composition
//!
//! Wires the intro sequencer, reveal gate, ambient field and menu for one page
//! view and flattens them into a [`FrameSnapshot`] the host can render.
//!
//! Sign-in and asset lookup stay outside the crate behind
//! [`IdentityProvider`] and [`AssetSource`].

use crate::ambient::{AmbientField, AmbientFieldGenerator, AmbientFrame};
use crate::choreography::ChoreographyFrame;
use crate::config::IntroConfig;
use crate::environment::RenderingEnvironment;
use crate::error::Result;
use crate::gate::{GateState, RevealGate};
use crate::menu::{Menu, Section};
use crate::particles::ParticleFrame;
use crate::rng::RandomSource;
use crate::sequencer::{IntroPhase, IntroSequencer};
use serde::Serialize;
use std::sync::{Arc, Mutex};
use xescrow_animation::SchedulerHandle;
use xescrow_core::{ReactiveGraph, SharedReactiveGraph};

/// Starts the sign-in flow when the call to action is pressed
pub trait IdentityProvider {
    fn login(&self);
}

/// Resolves static asset references
pub trait AssetSource {
    /// Path or URL of the brand icon
    fn brand_icon(&self) -> &str;
}

/// Assets served from the site root
#[derive(Clone, Debug)]
pub struct StaticAssets {
    pub brand_icon: String,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self {
            brand_icon: "/ico.png".to_string(),
        }
    }
}

impl AssetSource for StaticAssets {
    fn brand_icon(&self) -> &str {
        &self.brand_icon
    }
}

/// Everything the host needs to draw one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Milliseconds since mount
    pub time_ms: u64,
    pub phase: IntroPhase,
    pub gate: GateState,
    pub particles: Vec<ParticleFrame>,
    pub ambient: Vec<AmbientFrame>,
    pub menu_open: bool,
    /// Choreography values while the overlay is up
    pub intro: Option<ChoreographyFrame>,
    pub brand_icon: String,
}

pub struct LandingPage {
    sequencer: IntroSequencer,
    gate: RevealGate,
    ambient: AmbientField,
    menu: Menu,
    brand_icon: String,
}

impl LandingPage {
    /// Mount one page view
    ///
    /// The ambient field is only generated on the client; a server render gets
    /// an empty field and a static intro. Fails if `config` does not validate.
    pub fn mount<R: RandomSource + ?Sized>(
        env: RenderingEnvironment,
        config: &IntroConfig,
        handle: &SchedulerHandle,
        assets: &dyn AssetSource,
        rng: &mut R,
    ) -> Result<Self> {
        let graph: SharedReactiveGraph = Arc::new(Mutex::new(ReactiveGraph::new()));
        let sequencer = IntroSequencer::mount(env, config, handle, &graph, rng)?;

        let ambient = if env.allows_generation() {
            AmbientFieldGenerator::new(config.ambient.clone()).generate(rng)
        } else {
            AmbientField::empty()
        };

        tracing::debug!(?env, ambient = ambient.len(), "landing page mounted");
        Ok(Self {
            menu: Menu::new(&graph),
            sequencer,
            gate: RevealGate::new(&config.reveal, &config.timing),
            ambient,
            brand_icon: assets.brand_icon().to_string(),
        })
    }

    pub fn phase(&self) -> IntroPhase {
        self.sequencer.phase()
    }

    pub fn sequencer(&self) -> &IntroSequencer {
        &self.sequencer
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn ambient(&self) -> &AmbientField {
        &self.ambient
    }

    pub fn gate(&self) -> GateState {
        self.gate.evaluate(
            self.sequencer.phase(),
            self.sequencer.since_reveal_ms().unwrap_or(0),
        )
    }

    /// Call to action; forwards to sign-in once the content is interactive
    ///
    /// Returns whether the press was accepted.
    pub fn on_cta(&self, identity: &dyn IdentityProvider) -> bool {
        if !self.gate().interactive {
            tracing::debug!("call to action ignored during intro");
            return false;
        }
        identity.login();
        true
    }

    /// Follow a menu link
    pub fn navigate(&self, section: Section) -> &'static str {
        self.menu.select(section)
    }

    /// Check and clear the re-render flags of every state on the page
    pub fn take_dirty(&self) -> bool {
        let intro = self.sequencer.take_dirty();
        let menu = self.menu.take_dirty();
        intro || menu
    }

    pub fn frame(&self) -> FrameSnapshot {
        let time_ms = self.sequencer.elapsed_ms();
        let snapshot = FrameSnapshot {
            time_ms,
            phase: self.sequencer.phase(),
            gate: self.gate(),
            particles: self.sequencer.particle_frames(),
            ambient: self.ambient.sample(time_ms as f32),
            menu_open: self.menu.is_open(),
            intro: self.sequencer.choreography_frame(),
            brand_icon: self.brand_icon.clone(),
        };
        tracing::trace!(
            time_ms,
            phase = ?snapshot.phase,
            particles = snapshot.particles.len(),
            "frame"
        );
        snapshot
    }

    /// Release the intro timer, animations and ambient field
    pub fn unmount(&mut self) {
        self.sequencer.unmount();
        self.ambient = AmbientField::empty();
        self.menu.close();
        tracing::debug!("landing page unmounted");
    }
}
