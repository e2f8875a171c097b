//! Intro sequencer
//!
//! A two-state machine, `Intro -> Revealed`, driven by a single one-shot timer:
//!
//! ```text
//! mount (client) ── generate batch ── arm timer(intro_ms) ──▶ Intro
//!                                                               │ timer fires
//!                                                               ▼
//!                                        drop batch, record time ──▶ Revealed
//!                                                               │ overlay_exit_ms
//!                                                               ▼
//!                                                   drop choreography
//! ```
//!
//! The choreography keeps playing while the overlay fades out and is released
//! with it. `Revealed` is terminal for the page view. The intro cannot be skipped or
//! replayed; a new playthrough needs a new mount.
//!
//! On a server render nothing random is produced and no timer is armed, so the
//! sequencer sits in `Intro` with no particles.

use crate::choreography::{ChoreographyFrame, IntroChoreography};
use crate::config::IntroConfig;
use crate::environment::RenderingEnvironment;
use crate::error::Result;
use crate::particles::{ExplosionGenerator, ParticleBatch, ParticleFrame};
use crate::rng::RandomSource;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use xescrow_animation::{SchedulerHandle, Timer};
use xescrow_core::{SharedReactiveGraph, State, Subscription};

/// Phase of the intro
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IntroPhase {
    /// Overlay up, particles exploding
    #[default]
    Intro,
    /// Overlay gone, page content shown
    Revealed,
}

/// State mutated by the timer callbacks
#[derive(Default)]
struct Shared {
    particles: Option<ParticleBatch>,
    revealed_at_ms: Option<u64>,
    choreography: Option<IntroChoreography>,
    /// Releases the choreography once the overlay is gone
    exit_timer: Option<Timer>,
}

impl Shared {
    /// Take everything the view still holds so it can be dropped unlocked
    fn release(&mut self) -> (Option<IntroChoreography>, Option<Timer>) {
        self.particles = None;
        (self.choreography.take(), self.exit_timer.take())
    }
}

fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct IntroSequencer {
    handle: SchedulerHandle,
    phase: State<IntroPhase>,
    shared: Arc<Mutex<Shared>>,
    timer: Option<Timer>,
    started_at_ms: u64,
    flight_ms: f32,
    mounted: bool,
}

impl IntroSequencer {
    /// Start the intro for one page view
    ///
    /// On the client this generates the particle batch once, starts the
    /// choreography and arms the reveal timer. Fails if `config` does not
    /// validate.
    pub fn mount<R: RandomSource + ?Sized>(
        env: RenderingEnvironment,
        config: &IntroConfig,
        handle: &SchedulerHandle,
        graph: &SharedReactiveGraph,
        rng: &mut R,
    ) -> Result<Self> {
        config.validate()?;

        let phase = State::create(graph, IntroPhase::Intro);
        let shared = Arc::new(Mutex::new(Shared::default()));
        let started_at_ms = handle.now_ms().unwrap_or(0);

        let mut sequencer = Self {
            handle: handle.clone(),
            phase,
            shared,
            timer: None,
            started_at_ms,
            flight_ms: config.explosion.flight_ms as f32,
            mounted: env.is_client(),
        };

        if !env.allows_generation() {
            tracing::debug!("server render, intro left static");
            return Ok(sequencer);
        }

        let batch = ExplosionGenerator::new(config.explosion.clone()).generate(rng);
        {
            let mut state = lock(&sequencer.shared);
            state.particles = Some(batch);
            state.choreography = Some(IntroChoreography::start(handle));
        }

        let phase = sequencer.phase.clone();
        let shared = Arc::clone(&sequencer.shared);
        let clock = handle.clone();
        let deadline_ms = started_at_ms.saturating_add(config.timing.intro_ms);
        let exit_ms = u64::from(config.timing.overlay_exit_ms);
        sequencer.timer = Some(Timer::after(
            handle,
            "intro",
            config.timing.intro_ms,
            move || {
                {
                    let mut state = lock(&shared);
                    if state.revealed_at_ms.is_some() {
                        return;
                    }
                    state.particles = None;
                    state.revealed_at_ms = Some(deadline_ms);
                }
                phase.set_rebuild(IntroPhase::Revealed);
                tracing::info!(at_ms = deadline_ms, "intro revealed");

                let now = clock.now_ms().unwrap_or(deadline_ms);
                let delay_ms = deadline_ms.saturating_add(exit_ms).saturating_sub(now);
                if delay_ms == 0 {
                    let released = lock(&shared).choreography.take();
                    drop(released);
                    return;
                }
                let exit = Timer::after(
                    &clock,
                    "overlay-exit",
                    delay_ms,
                    release_choreography(Arc::downgrade(&shared)),
                );
                lock(&shared).exit_timer = Some(exit);
            },
        ));

        tracing::info!(intro_ms = config.timing.intro_ms, "intro started");
        Ok(sequencer)
    }

    pub fn phase(&self) -> IntroPhase {
        self.phase.get()
    }

    /// True until the reveal; mirrors the overlay being up
    pub fn is_exploding(&self) -> bool {
        self.phase() == IntroPhase::Intro
    }

    /// Whether the view is live on a client
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The explosion batch, present only while the intro plays on a client
    pub fn particles(&self) -> Option<ParticleBatch> {
        if !self.mounted {
            return None;
        }
        lock(&self.shared).particles.clone()
    }

    /// Particle poses at the current clock
    pub fn particle_frames(&self) -> Vec<ParticleFrame> {
        let elapsed = self.elapsed_ms() as f32;
        self.particles()
            .map(|batch| batch.sample(elapsed, self.flight_ms))
            .unwrap_or_default()
    }

    /// Milliseconds since mount
    pub fn elapsed_ms(&self) -> u64 {
        self.handle
            .now_ms()
            .map(|now| now.saturating_sub(self.started_at_ms))
            .unwrap_or(0)
    }

    /// Clock value at which the reveal happened
    pub fn revealed_at_ms(&self) -> Option<u64> {
        lock(&self.shared).revealed_at_ms
    }

    /// Milliseconds since the reveal, `None` while the intro plays
    pub fn since_reveal_ms(&self) -> Option<u64> {
        let at = self.revealed_at_ms()?;
        let now = self.handle.now_ms()?;
        Some(now.saturating_sub(at))
    }

    /// Time left before the reveal fires
    pub fn remaining_ms(&self) -> Option<u64> {
        self.timer.as_ref().and_then(Timer::remaining_ms)
    }

    /// Observe phase changes
    pub fn subscribe<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(IntroPhase) + Send + 'static,
    {
        self.phase.subscribe(move |phase| callback(*phase))
    }

    /// Check and clear the re-render flag set by the reveal
    pub fn take_dirty(&self) -> bool {
        self.phase.take_dirty()
    }

    /// Choreography values, while the intro overlay is up or fading out
    pub fn choreography_frame(&self) -> Option<ChoreographyFrame> {
        lock(&self.shared)
            .choreography
            .as_ref()
            .map(IntroChoreography::sample)
    }

    /// Tear the intro down: disarm the timer and release every animation
    ///
    /// Safe to call more than once. The phase is left where it was.
    pub fn unmount(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            if timer.cancel() {
                tracing::debug!("intro timer disarmed before reveal");
            }
        }
        let released = lock(&self.shared).release();
        drop(released);
        self.mounted = false;
    }
}

/// Timer callback dropping the choreography after the overlay exit
fn release_choreography(shared: Weak<Mutex<Shared>>) -> impl FnOnce() + Send + 'static {
    move || {
        let Some(shared) = shared.upgrade() else {
            return;
        };
        let released = lock(&shared).release();
        if released.0.is_some() {
            tracing::debug!("intro choreography released");
        }
        drop(released);
    }
}
