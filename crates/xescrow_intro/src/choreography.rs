//! Intro choreography
//!
//! The cosmetic motion that plays under the intro overlay: the logo pops in,
//! the title pulses with a colored glow and the tagline rises in after a short
//! delay. None of it affects the intro phase; it is registered with the
//! scheduler when the intro starts and dropped once the overlay has exited.

use serde::Serialize;
use xescrow_animation::{AnimatedKeyframe, Easing, KeyframeTrack, Playback, SchedulerHandle};
use xescrow_core::{Color, Shadow};

const LOGO_MS: u32 = 2000;
const TITLE_GLOW_MS: u32 = 2500;
const TAGLINE_DELAY_MS: u32 = 800;
const TAGLINE_MS: u32 = 800;
const TAGLINE_GLOW_MS: u32 = 2000;

/// Sampled choreography values for one frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ChoreographyFrame {
    pub logo_scale: f32,
    pub logo_opacity: f32,
    pub title_glow: Shadow,
    pub tagline_scale: f32,
    pub tagline_opacity: f32,
    pub tagline_glow: Shadow,
}

pub struct IntroChoreography {
    logo_scale: AnimatedKeyframe<f32>,
    logo_opacity: AnimatedKeyframe<f32>,
    title_glow: AnimatedKeyframe<Shadow>,
    tagline_scale: AnimatedKeyframe<f32>,
    tagline_opacity: AnimatedKeyframe<f32>,
    tagline_glow: AnimatedKeyframe<Shadow>,
}

fn logo_scale_track() -> KeyframeTrack<f32> {
    KeyframeTrack::new()
        .at(0.0, 0.2, Easing::Linear)
        .at(0.4, 1.0, Easing::EaseInOut)
        .at(0.8, 1.1, Easing::EaseInOut)
        .at(1.0, 1.0, Easing::EaseInOut)
}

fn logo_opacity_track() -> KeyframeTrack<f32> {
    KeyframeTrack::new()
        .at(0.0, 0.0, Easing::Linear)
        .at(0.4, 1.0, Easing::EaseInOut)
        .at(0.8, 1.0, Easing::EaseInOut)
        .at(1.0, 1.0, Easing::EaseInOut)
}

fn title_glow_track() -> KeyframeTrack<Shadow> {
    let violet = |a| Color::rgba8(139, 61, 255, a);
    let indigo = |a| Color::rgba8(111, 90, 255, a);
    let sky = |a| Color::rgba8(95, 200, 255, a);
    KeyframeTrack::evenly(
        [
            Shadow::new(20.0, violet(0.5)),
            Shadow::new(60.0, indigo(0.8)),
            Shadow::new(120.0, sky(1.0)),
            Shadow::new(200.0, sky(1.0)),
            Shadow::new(120.0, indigo(0.8)),
            Shadow::new(60.0, violet(0.5)),
        ],
        Easing::EaseInOut,
    )
}

fn tagline_glow_track() -> KeyframeTrack<Shadow> {
    let faint = Shadow::new(5.0, Color::WHITE.with_alpha(0.2));
    KeyframeTrack::evenly(
        [
            faint,
            Shadow::new(15.0, Color::rgba8(111, 90, 255, 0.5)),
            faint,
        ],
        Easing::EaseInOut,
    )
}

impl IntroChoreography {
    /// Register and start every animation on `handle`
    pub fn start(handle: &SchedulerHandle) -> Self {
        let choreography = Self {
            logo_scale: AnimatedKeyframe::start(handle, logo_scale_track(), Playback::new(LOGO_MS)),
            logo_opacity: AnimatedKeyframe::start(
                handle,
                logo_opacity_track(),
                Playback::new(LOGO_MS),
            ),
            title_glow: AnimatedKeyframe::start(
                handle,
                title_glow_track(),
                Playback::new(TITLE_GLOW_MS).ping_pong(),
            ),
            tagline_scale: AnimatedKeyframe::start(
                handle,
                KeyframeTrack::between(0.5, 1.0, Easing::EaseOut),
                Playback::new(TAGLINE_MS).delay(TAGLINE_DELAY_MS),
            ),
            tagline_opacity: AnimatedKeyframe::start(
                handle,
                KeyframeTrack::between(0.0, 1.0, Easing::EaseOut),
                Playback::new(TAGLINE_MS).delay(TAGLINE_DELAY_MS),
            ),
            tagline_glow: AnimatedKeyframe::start(
                handle,
                tagline_glow_track(),
                Playback::new(TAGLINE_GLOW_MS).ping_pong(),
            ),
        };
        tracing::trace!("intro choreography started");
        choreography
    }

    pub fn sample(&self) -> ChoreographyFrame {
        ChoreographyFrame {
            logo_scale: self.logo_scale.get(),
            logo_opacity: self.logo_opacity.get(),
            title_glow: self.title_glow.get(),
            tagline_scale: self.tagline_scale.get(),
            tagline_opacity: self.tagline_opacity.get(),
            tagline_glow: self.tagline_glow.get(),
        }
    }
}
