//! Reveal gate
//!
//! Decides how the main content and the intro overlay are shown, as a pure
//! function of the intro phase and the time since reveal. Holds no state, so a
//! frame can be recomputed from any point on the clock.

use crate::config::{RevealConfig, TimingConfig};
use crate::sequencer::IntroPhase;
use serde::Serialize;
use xescrow_animation::Easing;

/// What the host should render this frame
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GateState {
    /// Main content opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Whether the main content accepts input
    pub interactive: bool,
    pub overlay_opacity: f32,
    /// Whether the intro overlay is still in the tree
    pub overlay_present: bool,
}

impl GateState {
    /// Intro overlay fully up, content hidden
    pub const INTRO: GateState = GateState {
        opacity: 0.0,
        interactive: false,
        overlay_opacity: 1.0,
        overlay_present: true,
    };
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealGate {
    fade_delay_ms: u32,
    fade_ms: u32,
    overlay_exit_ms: u32,
}

impl Default for RevealGate {
    fn default() -> Self {
        Self::new(&RevealConfig::default(), &TimingConfig::default())
    }
}

impl RevealGate {
    pub fn new(reveal: &RevealConfig, timing: &TimingConfig) -> Self {
        Self {
            fade_delay_ms: reveal.fade_delay_ms,
            fade_ms: reveal.fade_ms,
            overlay_exit_ms: timing.overlay_exit_ms,
        }
    }

    /// Gate state for `phase`, `since_reveal_ms` after the reveal
    ///
    /// `since_reveal_ms` is ignored while the intro plays.
    pub fn evaluate(&self, phase: IntroPhase, since_reveal_ms: u64) -> GateState {
        if phase == IntroPhase::Intro {
            return GateState::INTRO;
        }

        let t = since_reveal_ms as f32;
        let fade = ramp(t - self.fade_delay_ms as f32, self.fade_ms);
        let exit = ramp(t, self.overlay_exit_ms);

        GateState {
            opacity: Easing::EaseOut.apply(fade),
            interactive: true,
            overlay_opacity: 1.0 - exit,
            overlay_present: exit < 1.0,
        }
    }
}

/// Linear 0..1 progress over `span_ms`; a zero span completes immediately
fn ramp(t: f32, span_ms: u32) -> f32 {
    if span_ms == 0 {
        return if t >= 0.0 { 1.0 } else { 0.0 };
    }
    (t / span_ms as f32).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hidden_during_intro() {
        let gate = RevealGate::default();
        for t in [0, 500, 10_000] {
            assert_eq!(gate.evaluate(IntroPhase::Intro, t), GateState::INTRO);
        }
    }

    #[test]
    fn test_interactive_immediately_on_reveal() {
        let gate = RevealGate::default();
        let state = gate.evaluate(IntroPhase::Revealed, 0);
        assert!(state.interactive);
        assert_eq!(state.opacity, 0.0);
        assert_eq!(state.overlay_opacity, 1.0);
        assert!(state.overlay_present);
    }

    #[test]
    fn test_fade_after_delay() {
        let gate = RevealGate::default();
        assert_eq!(gate.evaluate(IntroPhase::Revealed, 999).opacity, 0.0);

        let mid = gate.evaluate(IntroPhase::Revealed, 1500).opacity;
        assert!(mid > 0.0 && mid < 1.0);

        assert_eq!(gate.evaluate(IntroPhase::Revealed, 2000).opacity, 1.0);
        assert_eq!(gate.evaluate(IntroPhase::Revealed, 60_000).opacity, 1.0);
    }

    #[test]
    fn test_opacity_never_decreases() {
        let gate = RevealGate::default();
        let mut last = 0.0;
        for t in (0..4000).step_by(7) {
            let state = gate.evaluate(IntroPhase::Revealed, t);
            assert!(state.opacity >= last, "opacity dropped at {t}ms");
            assert!(state.interactive);
            last = state.opacity;
        }
    }

    #[test]
    fn test_overlay_exit() {
        let gate = RevealGate::default();
        let half = gate.evaluate(IntroPhase::Revealed, 400);
        assert!((half.overlay_opacity - 0.5).abs() < 1e-5);
        assert!(half.overlay_present);

        let gone = gate.evaluate(IntroPhase::Revealed, 800);
        assert_eq!(gone.overlay_opacity, 0.0);
        assert!(!gone.overlay_present);
    }

    #[test]
    fn test_zero_durations() {
        let gate = RevealGate::new(
            &RevealConfig {
                fade_delay_ms: 0,
                fade_ms: 0,
            },
            &TimingConfig {
                intro_ms: 3000,
                overlay_exit_ms: 0,
            },
        );
        let state = gate.evaluate(IntroPhase::Revealed, 0);
        assert_eq!(state.opacity, 1.0);
        assert!(!state.overlay_present);
    }
}
