//! Visual primitives for the landing canvas
//!
//! Geometry, color and brush types shared by the intro, the ambient field and
//! the page composition. Everything here is plain data: `Copy` where cheap,
//! serializable so frame snapshots can be handed to a host renderer.

use serde::Serialize;

// ─────────────────────────────────────────────────────────────────────────────
// Core Geometry Types
// ─────────────────────────────────────────────────────────────────────────────

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// 2D vector (pixel displacement)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Scale the vector by `t`
    pub fn scale(&self, t: f32) -> Self {
        Self::new(self.x * t, self.y * t)
    }

    /// Linear interpolation between two vectors
    pub fn lerp(a: &Vec2, b: &Vec2, t: f32) -> Vec2 {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Color and Visual Types
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color, channels in 0.0..=1.0
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build from 8-bit channels and a float alpha
    pub fn rgba8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::rgba(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    pub fn from_hex(hex: u32) -> Self {
        let r = ((hex >> 16) & 0xFF) as f32 / 255.0;
        let g = ((hex >> 8) & 0xFF) as f32 / 255.0;
        let b = (hex & 0xFF) as f32 / 255.0;
        Self::rgb(r, g, b)
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.a = alpha;
        self
    }

    /// Linear interpolation between two colors
    pub fn lerp(a: &Color, b: &Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        Color {
            r: a.r + (b.r - a.r) * t,
            g: a.g + (b.g - a.g) * t,
            b: a.b + (b.b - a.b) * t,
            a: a.a + (b.a - a.a) * t,
        }
    }

    /// CSS `rgba()` form, suitable for a web host
    pub fn to_css(&self) -> String {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "rgba({}, {}, {}, {})",
            channel(self.r),
            channel(self.g),
            channel(self.b),
            self.a.clamp(0.0, 1.0)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// Glow shadow behind text (no offset, blur radius only)
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Shadow {
    pub blur: f32,
    pub color: Color,
}

impl Shadow {
    pub const NONE: Shadow = Shadow {
        blur: 0.0,
        color: Color::TRANSPARENT,
    };

    pub const fn new(blur: f32, color: Color) -> Self {
        Self { blur, color }
    }

    pub fn lerp(a: &Shadow, b: &Shadow, t: f32) -> Shadow {
        Shadow {
            blur: a.blur + (b.blur - a.blur) * t,
            color: Color::lerp(&a.color, &b.color, t),
        }
    }

    /// CSS `text-shadow` form
    pub fn to_css(&self) -> String {
        format!("0 0 {}px {}", self.blur.round(), self.color.to_css())
    }
}

impl Default for Shadow {
    fn default() -> Self {
        Self::NONE
    }
}

/// Gradient stop
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub offset: f32,
    /// Color at this stop
    pub color: Color,
}

impl GradientStop {
    pub fn new(offset: f32, color: Color) -> Self {
        Self {
            offset: offset.clamp(0.0, 1.0),
            color,
        }
    }
}

/// Radial gradient brush
///
/// A circle centered in the element box; stops run center to edge.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Radial gradient from `color` at the center to transparent at the edge
    pub fn radial_fade(color: Color) -> Self {
        Self {
            stops: vec![
                GradientStop::new(0.0, color),
                GradientStop::new(1.0, color.with_alpha(0.0)),
            ],
        }
    }

    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// CSS `background` form
    pub fn to_css(&self) -> String {
        let stops = self
            .stops
            .iter()
            .map(|s| format!("{} {}%", s.color.to_css(), (s.offset * 100.0).round()))
            .collect::<Vec<_>>()
            .join(", ");
        format!("radial-gradient(circle, {stops})")
    }
}
