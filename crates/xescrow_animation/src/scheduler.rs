//! Animation scheduler
//!
//! Owns the clock of one view and everything keyed off it:
//! - keyframe playbacks, registered through [`AnimatedKeyframe`]
//! - one-shot timers, registered through [`Timer`]
//!
//! The clock only moves when the host drives it, either with a fixed step
//! ([`AnimationScheduler::advance`]) or from the wall clock
//! ([`AnimationScheduler::tick`]). Everything runs on the host's thread; timer
//! callbacks fire after the scheduler lock is released, in deadline order.
//!
//! Wrappers hold a weak [`SchedulerHandle`] and unregister themselves on drop,
//! so a torn-down view never leaves a pending callback behind.

use crate::keyframe::{KeyframeTrack, Playback};
use crate::values::Interpolate;
use slotmap::{new_key_type, SlotMap};
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Instant;

new_key_type! {
    /// Handle to a registered keyframe playback
    pub struct KeyframeId;
    /// Handle to an armed one-shot timer
    pub struct TimerId;
}

/// Callback run when a timer expires
pub type TimerCallback = Box<dyn FnOnce() + Send>;

struct TimerEntry {
    deadline_ms: u64,
    /// Arm order, breaks ties between equal deadlines
    seq: u64,
    label: &'static str,
    callback: TimerCallback,
}

struct SchedulerInner {
    playbacks: SlotMap<KeyframeId, Playback>,
    timers: SlotMap<TimerId, TimerEntry>,
    now_ms: u64,
    next_seq: u64,
    last_frame: Instant,
    /// Sub-millisecond remainder carried between wall-clock ticks
    carry_us: u64,
}

fn lock(inner: &Mutex<SchedulerInner>) -> MutexGuard<'_, SchedulerInner> {
    inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// The scheduler for one page view
///
/// Cloning shares the same clock and registrations.
#[derive(Clone)]
pub struct AnimationScheduler {
    inner: Arc<Mutex<SchedulerInner>>,
}

impl AnimationScheduler {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(SchedulerInner {
                playbacks: SlotMap::with_key(),
                timers: SlotMap::with_key(),
                now_ms: 0,
                next_seq: 0,
                last_frame: Instant::now(),
                carry_us: 0,
            })),
        }
    }

    /// Get a weak handle for passing to components
    pub fn handle(&self) -> SchedulerHandle {
        SchedulerHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Current clock value in milliseconds since creation
    pub fn now_ms(&self) -> u64 {
        lock(&self.inner).now_ms
    }

    /// Advance the clock by `dt_ms`, ticking playbacks and firing due timers
    ///
    /// Returns true if anything is still active (needs another frame).
    pub fn advance(&self, dt_ms: u64) -> bool {
        let due = {
            let mut inner = lock(&self.inner);
            inner.now_ms += dt_ms;
            inner.last_frame = Instant::now();

            for (_, playback) in inner.playbacks.iter_mut() {
                playback.tick(dt_ms as f32);
            }

            let now = inner.now_ms;
            let mut due: Vec<(u64, u64, TimerId)> = inner
                .timers
                .iter()
                .filter(|(_, t)| t.deadline_ms <= now)
                .map(|(id, t)| (t.deadline_ms, t.seq, id))
                .collect();
            due.sort_unstable();

            due.into_iter()
                .filter_map(|(_, _, id)| inner.timers.remove(id))
                .collect::<Vec<_>>()
        };

        for timer in due {
            tracing::debug!(
                timer = timer.label,
                deadline_ms = timer.deadline_ms,
                "timer fired"
            );
            (timer.callback)();
        }

        self.has_active()
    }

    /// Advance by the wall-clock time since the previous frame
    pub fn tick(&self) -> bool {
        let dt_ms = {
            let mut inner = lock(&self.inner);
            let now = Instant::now();
            let total_us = (now - inner.last_frame).as_micros() as u64 + inner.carry_us;
            inner.last_frame = now;
            inner.carry_us = total_us % 1000;
            total_us / 1000
        };
        self.advance(dt_ms)
    }

    /// Whether any playback is running or timer is armed
    pub fn has_active(&self) -> bool {
        let inner = lock(&self.inner);
        !inner.timers.is_empty() || inner.playbacks.iter().any(|(_, p)| p.is_playing())
    }

    pub fn keyframe_count(&self) -> usize {
        lock(&self.inner).playbacks.len()
    }

    /// Number of armed timers
    pub fn timer_count(&self) -> usize {
        lock(&self.inner).timers.len()
    }
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// A weak handle to the animation scheduler
///
/// Doesn't keep the scheduler alive; every operation is a no-op once it is
/// gone.
#[derive(Clone)]
pub struct SchedulerHandle {
    inner: Weak<Mutex<SchedulerInner>>,
}

impl SchedulerHandle {
    fn with_inner<R>(&self, f: impl FnOnce(&mut SchedulerInner) -> R) -> Option<R> {
        let inner = self.inner.upgrade()?;
        let mut guard = lock(&inner);
        Some(f(&mut guard))
    }

    pub fn is_alive(&self) -> bool {
        self.inner.strong_count() > 0
    }

    pub fn now_ms(&self) -> Option<u64> {
        self.with_inner(|inner| inner.now_ms)
    }

    // =========================================================================
    // Keyframe Operations
    // =========================================================================

    pub fn register_playback(&self, playback: Playback) -> Option<KeyframeId> {
        self.with_inner(|inner| inner.playbacks.insert(playback))
    }

    pub fn start_playback(&self, id: KeyframeId) {
        self.with_inner(|inner| {
            if let Some(playback) = inner.playbacks.get_mut(id) {
                playback.start();
            }
        });
    }

    pub fn playback_progress(&self, id: KeyframeId) -> Option<f32> {
        self.with_inner(|inner| inner.playbacks.get(id).map(|p| p.progress()))
            .flatten()
    }

    pub fn is_playback_playing(&self, id: KeyframeId) -> bool {
        self.with_inner(|inner| inner.playbacks.get(id).map(|p| p.is_playing()))
            .flatten()
            .unwrap_or(false)
    }

    pub fn remove_playback(&self, id: KeyframeId) {
        self.with_inner(|inner| inner.playbacks.remove(id));
    }

    // =========================================================================
    // Timer Operations
    // =========================================================================

    /// Arm a one-shot timer `delay_ms` from now
    pub fn schedule_timer(
        &self,
        label: &'static str,
        delay_ms: u64,
        callback: TimerCallback,
    ) -> Option<TimerId> {
        self.with_inner(|inner| {
            let seq = inner.next_seq;
            inner.next_seq += 1;
            let deadline_ms = inner.now_ms.saturating_add(delay_ms);
            tracing::debug!(timer = label, deadline_ms, "timer armed");
            inner.timers.insert(TimerEntry {
                deadline_ms,
                seq,
                label,
                callback,
            })
        })
    }

    /// Disarm a timer; returns true if it was still pending
    pub fn cancel_timer(&self, id: TimerId) -> bool {
        self.with_inner(|inner| inner.timers.remove(id))
            .flatten()
            .map(|timer| {
                tracing::debug!(timer = timer.label, "timer cancelled");
            })
            .is_some()
    }

    pub fn is_timer_pending(&self, id: TimerId) -> bool {
        self.with_inner(|inner| inner.timers.contains_key(id))
            .unwrap_or(false)
    }

    /// Milliseconds until the timer fires, if it is still pending
    pub fn timer_remaining_ms(&self, id: TimerId) -> Option<u64> {
        self.with_inner(|inner| {
            inner
                .timers
                .get(id)
                .map(|t| t.deadline_ms.saturating_sub(inner.now_ms))
        })
        .flatten()
    }
}

// ============================================================================
// Scoped Timer
// ============================================================================

/// A one-shot timer that is disarmed when dropped
///
/// # Example
///
/// ```
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
/// use xescrow_animation::{AnimationScheduler, Timer};
///
/// let scheduler = AnimationScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
///
/// let flag = fired.clone();
/// let timer = Timer::after(&scheduler.handle(), "demo", 100, move || {
///     flag.store(true, Ordering::SeqCst);
/// });
/// drop(timer);
///
/// scheduler.advance(200);
/// assert!(!fired.load(Ordering::SeqCst));
/// ```
pub struct Timer {
    handle: SchedulerHandle,
    id: Option<TimerId>,
}

impl Timer {
    /// Arm `callback` to run once, `delay_ms` from the scheduler's now
    ///
    /// With a dead scheduler the timer is inert and never fires.
    pub fn after<F>(handle: &SchedulerHandle, label: &'static str, delay_ms: u64, callback: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        let id = handle.schedule_timer(label, delay_ms, Box::new(callback));
        Self {
            handle: handle.clone(),
            id,
        }
    }

    /// Whether the callback is still waiting to fire
    pub fn is_pending(&self) -> bool {
        self.id.is_some_and(|id| self.handle.is_timer_pending(id))
    }

    pub fn remaining_ms(&self) -> Option<u64> {
        self.id.and_then(|id| self.handle.timer_remaining_ms(id))
    }

    /// Disarm now; returns true if the callback had not fired yet
    pub fn cancel(&mut self) -> bool {
        match self.id.take() {
            Some(id) => self.handle.cancel_timer(id),
            None => false,
        }
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ============================================================================
// Animated Keyframe
// ============================================================================

/// A keyframe animation registered with the scheduler
///
/// The scheduler ticks the timing; the track is sampled when read.
/// Unregisters on drop.
///
/// # Example
///
/// ```
/// use xescrow_animation::{AnimatedKeyframe, AnimationScheduler, Easing, KeyframeTrack, Playback};
///
/// let scheduler = AnimationScheduler::new();
/// let opacity = AnimatedKeyframe::start(
///     &scheduler.handle(),
///     KeyframeTrack::between(0.0f32, 1.0, Easing::Linear),
///     Playback::new(800),
/// );
///
/// scheduler.advance(400);
/// assert!((opacity.get() - 0.5).abs() < 1e-5);
/// ```
pub struct AnimatedKeyframe<T: Interpolate> {
    handle: SchedulerHandle,
    id: Option<KeyframeId>,
    track: KeyframeTrack<T>,
}

impl<T: Interpolate + Default> AnimatedKeyframe<T> {
    /// Register without starting
    pub fn new(handle: &SchedulerHandle, track: KeyframeTrack<T>, playback: Playback) -> Self {
        let id = handle.register_playback(playback);
        Self {
            handle: handle.clone(),
            id,
            track,
        }
    }

    /// Register and start immediately
    pub fn start(handle: &SchedulerHandle, track: KeyframeTrack<T>, playback: Playback) -> Self {
        let anim = Self::new(handle, track, playback);
        anim.restart();
        anim
    }

    /// Restart from the beginning
    pub fn restart(&self) {
        if let Some(id) = self.id {
            self.handle.start_playback(id);
        }
    }

    /// Directional progress of the current iteration
    pub fn progress(&self) -> f32 {
        self.id
            .and_then(|id| self.handle.playback_progress(id))
            .unwrap_or(0.0)
    }

    /// Current value of the track
    pub fn get(&self) -> T {
        self.track.sample(self.progress()).unwrap_or_default()
    }

    pub fn is_playing(&self) -> bool {
        self.id
            .is_some_and(|id| self.handle.is_playback_playing(id))
    }
}

impl<T: Interpolate> Drop for AnimatedKeyframe<T> {
    fn drop(&mut self) {
        if let Some(id) = self.id.take() {
            self.handle.remove_playback(id);
        }
    }
}
