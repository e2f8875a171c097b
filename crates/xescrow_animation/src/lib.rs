//! Xescrow Animation System
//!
//! Keyframe animations, easing curves and timer orchestration for the landing
//! intro.
//!
//! # Features
//!
//! - **Easing**: CSS-compatible cubic-bezier curves
//! - **Keyframe Animations**: timed tracks over any interpolable value
//! - **Repeat and Reverse**: finite or infinite loops, optionally alternating
//! - **Scheduler**: host-driven clock shared by every animation of a view
//! - **Scoped Timers**: one-shot timers that disarm when their handle drops

pub mod easing;
pub mod keyframe;
pub mod scheduler;
pub mod values;

pub use easing::Easing;
pub use keyframe::{Keyframe, KeyframeTrack, Playback, Repeat};
pub use scheduler::{
    AnimatedKeyframe, AnimationScheduler, KeyframeId, SchedulerHandle, Timer, TimerId,
};
pub use values::Interpolate;
