//! Paint values handed to page surfaces.
//!
//! Surfaces never carry paint state between calls. Every draw call receives a
//! [`PaintConfig`] describing font, fill, stroke and shadow in rendered pixels.

use bitfont_core::math::Vec2;

use crate::style::{FontSlant, FontWeight};

/// An RGBA color with `f32` components in the `0.0..=1.0` range.
///
/// ```
/// use bitfont::Color;
///
/// let orange = Color::from_hex(0xFF8800);
/// assert_eq!(orange.to_rgba8(), [255, 136, 0, 255]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    /// Create a color from RGB components with full opacity.
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create a color from RGBA components.
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a color from 8-bit RGBA values.
    pub fn from_rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }

    /// Create an opaque color from a `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::from_rgba_u8(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
            255,
        )
    }

    /// Same color with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Convert to straight (non-premultiplied) 8-bit RGBA.
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// How stroke segments are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    Miter,
    #[default]
    Round,
    Bevel,
}

/// Outline stroke around each glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub join: LineJoin,
    pub miter_limit: f32,
}

impl StrokeStyle {
    pub fn new(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            join: LineJoin::default(),
            miter_limit: 10.0,
        }
    }

    pub fn join(mut self, join: LineJoin) -> Self {
        self.join = join;
        self
    }
}

/// Drop shadow painted underneath each glyph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub color: Color,
    /// Direction of the shadow in radians (0 points right, `PI / 2` points down).
    pub angle: f32,
    pub distance: f32,
}

impl DropShadow {
    pub fn new(color: Color, angle: f32, distance: f32) -> Self {
        Self {
            color,
            angle,
            distance,
        }
    }

    /// Offset of the shadow from the glyph.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.angle.cos(), self.angle.sin()) * self.distance
    }
}

/// Shadow parameters resolved to rendered pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadowPaint {
    pub color: Color,
    pub offset: Vec2,
}

/// Immutable paint configuration passed to every surface draw call.
///
/// All lengths are in rendered (page) pixels. `resolution` is the device
/// scale surfaces apply when turning page pixels into surface pixels. Draw
/// coordinates are always on the alphabetic baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintConfig {
    pub family: String,
    pub weight: FontWeight,
    pub slant: FontSlant,
    pub font_size: f32,
    pub resolution: f32,
    pub fill: Option<Color>,
    pub stroke: Option<StrokeStyle>,
    pub shadow: Option<ShadowPaint>,
}

impl PaintConfig {
    /// CSS-like font string, e.g. `italic bold 40px "Inter"`.
    pub fn font_string(&self) -> String {
        crate::style::font_string(&self.family, self.weight, self.slant, self.font_size)
    }

    /// Stroke width in rendered pixels, 0 when no stroke is configured.
    pub fn stroke_width(&self) -> f32 {
        self.stroke.map(|s| s.width).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0x336699);
        assert_eq!(c.to_rgba8(), [0x33, 0x66, 0x99, 0xFF]);
    }

    #[test]
    fn test_color_to_rgba8_clamps() {
        let c = Color::rgba(2.0, -1.0, 0.5, 1.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn test_drop_shadow_offset() {
        let shadow = DropShadow::new(Color::BLACK, std::f32::consts::FRAC_PI_2, 4.0);
        let offset = shadow.offset();
        assert!(offset.x.abs() < 1e-5);
        assert!((offset.y - 4.0).abs() < 1e-5);
    }
}
