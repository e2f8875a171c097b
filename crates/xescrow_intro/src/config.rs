//! Intro configuration
//!
//! Every field has a default matching the shipped landing page, so an empty
//! file (or no file) yields the stock intro. Loaded from TOML:
//!
//! ```toml
//! [explosion]
//! count = 80
//! scale = { min = 0.5, max = 2.5 }
//!
//! [timing]
//! intro_ms = 3000
//! ```
//!
//! Configuration is validated once on load; generators assume valid ranges.

use crate::error::{IntroError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Half-open sampling interval `[min, max)`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: f32,
    pub max: f32,
}

impl Bounds {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies inside the interval (max inclusive for degenerate spans)
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && (value < self.max || (self.min == self.max && value == self.max))
    }

    fn check(&self, field: &'static str) -> Result<()> {
        if !self.min.is_finite() || !self.max.is_finite() {
            return Err(IntroError::invalid(field, "bounds must be finite"));
        }
        if !(self.max - self.min).is_finite() {
            return Err(IntroError::invalid(field, "span overflows"));
        }
        if self.min > self.max {
            return Err(IntroError::invalid(
                field,
                format!("min {} exceeds max {}", self.min, self.max),
            ));
        }
        Ok(())
    }

    fn check_positive(&self, field: &'static str) -> Result<()> {
        self.check(field)?;
        if self.min <= 0.0 {
            return Err(IntroError::invalid(field, "values must be positive"));
        }
        Ok(())
    }

    fn check_within(&self, field: &'static str, lo: f32, hi: f32) -> Result<()> {
        self.check(field)?;
        if self.min < lo || self.max > hi {
            return Err(IntroError::invalid(
                field,
                format!("bounds must lie within {lo}..={hi}"),
            ));
        }
        Ok(())
    }
}

/// Explosion particle batch
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    pub count: usize,
    pub width: Bounds,
    pub height: Bounds,
    /// Horizontal flight distance from center, pixels
    pub offset_x: Bounds,
    /// Vertical flight distance from center, pixels
    pub offset_y: Bounds,
    pub scale: Bounds,
    /// Per-particle stagger before takeoff
    pub launch_delay_ms: Bounds,
    /// Flight time from center to target
    pub flight_ms: u32,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            count: 80,
            width: Bounds::new(10.0, 40.0),
            height: Bounds::new(10.0, 40.0),
            offset_x: Bounds::new(-500.0, 500.0),
            offset_y: Bounds::new(-500.0, 500.0),
            scale: Bounds::new(0.5, 2.5),
            launch_delay_ms: Bounds::new(0.0, 700.0),
            flight_ms: 3000,
        }
    }
}

/// Ambient background field
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AmbientConfig {
    pub count: usize,
    /// Vertical position, percent of viewport
    pub top_pct: Bounds,
    /// Horizontal position, percent of viewport
    pub left_pct: Bounds,
    pub size: Bounds,
    /// Drift amplitude on each axis, pixels
    pub drift: Bounds,
    /// Length of one out-and-back drift cycle
    pub period_ms: Bounds,
}

impl Default for AmbientConfig {
    fn default() -> Self {
        Self {
            count: 15,
            top_pct: Bounds::new(0.0, 100.0),
            left_pct: Bounds::new(0.0, 100.0),
            size: Bounds::new(5.0, 15.0),
            drift: Bounds::new(-20.0, 20.0),
            period_ms: Bounds::new(10_000.0, 20_000.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the intro stays up before the page is revealed
    pub intro_ms: u64,
    /// Fade-out of the intro overlay after reveal
    pub overlay_exit_ms: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            intro_ms: 3000,
            overlay_exit_ms: 800,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Wait after reveal before main content starts fading in
    pub fade_delay_ms: u32,
    pub fade_ms: u32,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            fade_delay_ms: 1000,
            fade_ms: 1000,
        }
    }
}

/// Complete intro configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntroConfig {
    pub explosion: ExplosionConfig,
    pub ambient: AmbientConfig,
    pub timing: TimingConfig,
    pub reveal: RevealConfig,
}

impl IntroConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: IntroConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| IntroError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.display(), "loaded intro config");
        Ok(config)
    }

    /// Reject anything the generators or sequencer cannot honor
    pub fn validate(&self) -> Result<()> {
        let e = &self.explosion;
        if e.count == 0 {
            return Err(IntroError::invalid("explosion.count", "must be at least 1"));
        }
        e.width.check_positive("explosion.width")?;
        e.height.check_positive("explosion.height")?;
        e.offset_x.check("explosion.offset_x")?;
        e.offset_y.check("explosion.offset_y")?;
        e.scale.check_positive("explosion.scale")?;
        e.launch_delay_ms
            .check_within("explosion.launch_delay_ms", 0.0, f32::MAX)?;
        if e.flight_ms == 0 {
            return Err(IntroError::invalid("explosion.flight_ms", "must be non-zero"));
        }

        let a = &self.ambient;
        if a.count == 0 {
            return Err(IntroError::invalid("ambient.count", "must be at least 1"));
        }
        a.top_pct.check_within("ambient.top_pct", 0.0, 100.0)?;
        a.left_pct.check_within("ambient.left_pct", 0.0, 100.0)?;
        a.size.check_positive("ambient.size")?;
        a.drift.check("ambient.drift")?;
        a.period_ms.check_positive("ambient.period_ms")?;

        if self.timing.intro_ms == 0 {
            return Err(IntroError::invalid("timing.intro_ms", "must be non-zero"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_valid() {
        let config = IntroConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.explosion.count, 80);
        assert_eq!(config.ambient.count, 15);
        assert_eq!(config.timing.intro_ms, 3000);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = IntroConfig::from_toml_str("").unwrap();
        assert_eq!(config, IntroConfig::default());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config = IntroConfig::from_toml_str(
            r#"
            [explosion]
            count = 12
            scale = { min = 1.0, max = 1.5 }

            [timing]
            intro_ms = 1500
            "#,
        )
        .unwrap();
        assert_eq!(config.explosion.count, 12);
        assert_eq!(config.explosion.scale, Bounds::new(1.0, 1.5));
        assert_eq!(config.explosion.width, Bounds::new(10.0, 40.0));
        assert_eq!(config.timing.intro_ms, 1500);
        assert_eq!(config.timing.overlay_exit_ms, 800);
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let err = IntroConfig::from_toml_str(
            r#"
            [explosion]
            width = { min = 40.0, max = 10.0 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IntroError::Invalid {
                field: "explosion.width",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_zero_count_and_duration() {
        let mut config = IntroConfig::default();
        config.ambient.count = 0;
        assert!(config.validate().is_err());

        let mut config = IntroConfig::default();
        config.timing.intro_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overflowing_span() {
        let err = IntroConfig::from_toml_str(
            r#"
            [explosion]
            offset_x = { min = -3.0e38, max = 3.0e38 }
            "#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IntroError::Invalid {
                field: "explosion.offset_x",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let mut config = IntroConfig::default();
        config.explosion.scale = Bounds::new(0.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_offscreen_ambient() {
        let mut config = IntroConfig::default();
        config.ambient.left_pct = Bounds::new(-10.0, 100.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = IntroConfig::from_toml_str("[explosion]\ncount = \"many\"").unwrap_err();
        assert!(matches!(err, IntroError::Parse(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = IntroConfig::load("/definitely/not/here/intro.toml").unwrap_err();
        assert!(matches!(err, IntroError::Io { .. }));
    }

    #[test]
    fn test_bounds_contains() {
        let b = Bounds::new(10.0, 40.0);
        assert!(b.contains(10.0));
        assert!(b.contains(39.9));
        assert!(!b.contains(40.0));
        assert!(Bounds::new(1.0, 1.0).contains(1.0));
    }
}
