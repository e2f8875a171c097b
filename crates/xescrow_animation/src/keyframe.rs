//! Keyframe animations
//!
//! An animation is split in two halves:
//! - [`KeyframeTrack`] holds the values and per-segment easing, sampled by progress
//! - [`Playback`] holds the timing: duration, delay, repeat and direction
//!
//! The scheduler only ticks playbacks; tracks are sampled on read.

use crate::easing::Easing;
use crate::values::Interpolate;

/// A single keyframe
///
/// `easing` shapes the segment that ends at this keyframe.
#[derive(Clone, Debug, PartialEq)]
pub struct Keyframe<T> {
    /// Position on the track (0.0 to 1.0)
    pub time: f32,
    pub value: T,
    pub easing: Easing,
}

/// An ordered set of keyframes
#[derive(Clone, Debug, PartialEq)]
pub struct KeyframeTrack<T> {
    keyframes: Vec<Keyframe<T>>,
}

impl<T: Interpolate> KeyframeTrack<T> {
    pub fn new() -> Self {
        Self {
            keyframes: Vec::new(),
        }
    }

    /// Two-point track from `from` to `to`
    pub fn between(from: T, to: T, easing: Easing) -> Self {
        Self::new().at(0.0, from, Easing::Linear).at(1.0, to, easing)
    }

    /// Evenly spaced keyframes through `values`, all with the same easing
    pub fn evenly(values: impl IntoIterator<Item = T>, easing: Easing) -> Self {
        let values: Vec<T> = values.into_iter().collect();
        let last = values.len().saturating_sub(1).max(1) as f32;
        values
            .into_iter()
            .enumerate()
            .fold(Self::new(), |track, (i, v)| {
                track.at(i as f32 / last, v, easing)
            })
    }

    /// Add a keyframe at `time`, keeping the track sorted
    pub fn at(mut self, time: f32, value: T, easing: Easing) -> Self {
        let time = time.clamp(0.0, 1.0);
        let index = self.keyframes.partition_point(|k| k.time <= time);
        self.keyframes.insert(
            index,
            Keyframe {
                time,
                value,
                easing,
            },
        );
        self
    }

    /// Sample the track at `progress` (0.0 to 1.0)
    pub fn sample(&self, progress: f32) -> Option<T> {
        let first = self.keyframes.first()?;
        let last = self.keyframes.last()?;
        let p = progress.clamp(0.0, 1.0);

        if p <= first.time {
            return Some(first.value.clone());
        }
        if p >= last.time {
            return Some(last.value.clone());
        }

        let next = self.keyframes.partition_point(|k| k.time <= p);
        let from = &self.keyframes[next - 1];
        let to = &self.keyframes[next];
        let span = to.time - from.time;
        let local = if span > 0.0 { (p - from.time) / span } else { 1.0 };
        Some(from.value.lerp(&to.value, to.easing.apply(local)))
    }
}

impl<T: Interpolate> Default for KeyframeTrack<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// How many times a playback runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Repeat {
    /// Run `n` iterations (`Times(1)` plays once)
    Times(u32),
    Infinite,
}

/// Playback state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PlayState {
    Idle,
    Playing,
    Finished,
}

/// Timing of a keyframe animation
#[derive(Clone, Debug, PartialEq)]
pub struct Playback {
    duration_ms: f32,
    delay_ms: f32,
    repeat: Repeat,
    /// Reverse direction on every other iteration
    alternate: bool,
    elapsed_ms: f32,
    state: PlayState,
}

impl Playback {
    pub fn new(duration_ms: u32) -> Self {
        Self {
            duration_ms: duration_ms.max(1) as f32,
            delay_ms: 0.0,
            repeat: Repeat::Times(1),
            alternate: false,
            elapsed_ms: 0.0,
            state: PlayState::Idle,
        }
    }

    /// Set delay before the first iteration starts
    pub fn delay(mut self, delay_ms: u32) -> Self {
        self.delay_ms = delay_ms as f32;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Loop forever, reversing direction each iteration
    pub fn ping_pong(mut self) -> Self {
        self.repeat = Repeat::Infinite;
        self.alternate = true;
        self
    }

    pub fn start(&mut self) {
        self.elapsed_ms = 0.0;
        self.state = PlayState::Playing;
    }

    /// Advance by `dt_ms`
    pub fn tick(&mut self, dt_ms: f32) {
        if self.state != PlayState::Playing {
            return;
        }
        self.elapsed_ms += dt_ms.max(0.0);

        if let Repeat::Times(n) = self.repeat {
            let total = self.delay_ms + self.duration_ms * n as f32;
            if self.elapsed_ms >= total {
                self.elapsed_ms = total;
                self.state = PlayState::Finished;
            }
        }
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    pub fn is_finished(&self) -> bool {
        self.state == PlayState::Finished
    }

    /// Zero-based iteration currently playing
    pub fn iteration(&self) -> u32 {
        let local = (self.elapsed_ms - self.delay_ms).max(0.0);
        let iteration = (local / self.duration_ms).floor() as u32;
        match self.repeat {
            Repeat::Times(n) => iteration.min(n.saturating_sub(1)),
            Repeat::Infinite => iteration,
        }
    }

    /// Directional progress within the current iteration (0.0 to 1.0)
    ///
    /// On reversed iterations this runs from 1.0 back to 0.0. A finished
    /// playback holds its final position.
    pub fn progress(&self) -> f32 {
        if self.state == PlayState::Idle {
            return 0.0;
        }
        let local = (self.elapsed_ms - self.delay_ms).max(0.0);
        let iteration = self.iteration();

        let within = if self.state == PlayState::Finished {
            1.0
        } else {
            ((local - iteration as f32 * self.duration_ms) / self.duration_ms).clamp(0.0, 1.0)
        };

        if self.alternate && iteration % 2 == 1 {
            1.0 - within
        } else {
            within
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logo_scale() -> KeyframeTrack<f32> {
        KeyframeTrack::new()
            .at(0.0, 0.2, Easing::Linear)
            .at(0.4, 1.0, Easing::Linear)
            .at(0.8, 1.1, Easing::Linear)
            .at(1.0, 1.0, Easing::Linear)
    }

    #[test]
    fn test_track_hits_keyframes() {
        let track = logo_scale();
        assert_eq!(track.sample(0.0), Some(0.2));
        assert_eq!(track.sample(0.4), Some(1.0));
        assert_eq!(track.sample(0.8), Some(1.1));
        assert_eq!(track.sample(1.0), Some(1.0));
    }

    #[test]
    fn test_track_interpolates_segment() {
        let track = logo_scale();
        let v = track.sample(0.2).unwrap();
        assert!((v - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_track_sorted_on_insert() {
        let track = KeyframeTrack::new()
            .at(1.0, 3.0f32, Easing::Linear)
            .at(0.0, 1.0, Easing::Linear)
            .at(0.5, 2.0, Easing::Linear);
        let times: Vec<f32> = track.keyframes.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_empty_track_samples_none() {
        let track: KeyframeTrack<f32> = KeyframeTrack::new();
        assert_eq!(track.sample(0.5), None);
    }

    #[test]
    fn test_playback_once_finishes() {
        let mut playback = Playback::new(1000);
        playback.start();
        playback.tick(500.0);
        assert!(playback.is_playing());
        assert!((playback.progress() - 0.5).abs() < 1e-5);

        playback.tick(700.0);
        assert!(playback.is_finished());
        assert_eq!(playback.progress(), 1.0);
    }

    #[test]
    fn test_playback_delay() {
        let mut playback = Playback::new(800).delay(800);
        playback.start();
        playback.tick(400.0);
        assert_eq!(playback.progress(), 0.0);

        playback.tick(800.0);
        assert!(playback.is_playing());
        assert!((playback.progress() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_ping_pong_reverses() {
        let mut playback = Playback::new(1000).ping_pong();
        playback.start();

        playback.tick(250.0);
        assert!((playback.progress() - 0.25).abs() < 1e-5);

        playback.tick(1000.0);
        assert_eq!(playback.iteration(), 1);
        assert!((playback.progress() - 0.75).abs() < 1e-5);

        playback.tick(1000.0);
        assert_eq!(playback.iteration(), 2);
        assert!((playback.progress() - 0.25).abs() < 1e-5);
        assert!(playback.is_playing());
    }

    #[test]
    fn test_finite_alternate_ends_at_start() {
        let mut playback = Playback::new(100).ping_pong().repeat(Repeat::Times(2));
        playback.start();
        playback.tick(1000.0);
        assert!(playback.is_finished());
        assert_eq!(playback.progress(), 0.0);
    }

    #[test]
    fn test_idle_playback_ignores_ticks() {
        let track = logo_scale();
        let mut playback = Playback::new(2000);
        playback.tick(1000.0);
        assert_eq!(track.sample(playback.progress()), Some(0.2));

        playback.start();
        playback.tick(2000.0);
        assert_eq!(track.sample(playback.progress()), Some(1.0));
        assert!(!playback.is_playing());
    }
}
