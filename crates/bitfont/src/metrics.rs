//! Glyph metric lookups.

use crate::style::FontStyle;

/// Baseline-relevant properties of a font at a given size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FontProperties {
    /// Distance from the top of the line box to the baseline.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box (positive).
    pub descent: f32,
    /// `ascent + descent`.
    pub font_size: f32,
}

impl FontProperties {
    pub fn new(ascent: f32, descent: f32) -> Self {
        Self {
            ascent,
            descent,
            font_size: ascent + descent,
        }
    }
}

/// Measurement of a single glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMetrics {
    pub text: char,
    /// Advance width, including any stroke and shadow the style paints.
    pub width: f32,
    /// Ink height, including any stroke and shadow the style paints.
    pub height: f32,
    /// Line height used when drawing the glyph. The packer overrides it with
    /// `height` so every glyph is drawn against its own box.
    pub line_height: f32,
    pub font_properties: FontProperties,
}

/// Provides glyph metrics in the font-size domain of the style it is given.
///
/// The packer always passes the measurement style, so every value comes back
/// in measurement space.
pub trait GlyphMetricsProvider: Send + Sync {
    /// Advance width of `text` (one or more characters, kerned as a run).
    ///
    /// Decoration is the style's stroke width plus drop-shadow distance. It is
    /// added exactly once per run, whatever the run's length, and a run of one
    /// character must measure the same as [`GlyphMetrics::width`]. Kerning
    /// measures pairs with an undecorated style and takes single-character
    /// widths as `width - stroke - shadow`, so a provider whose glyph widths
    /// leave decoration out reports it as kerning on every pair.
    fn measure_advance_width(&self, text: &str, style: &FontStyle) -> f32;

    /// Full metrics of a single character.
    fn measure_glyph(&self, ch: char, style: &FontStyle) -> GlyphMetrics;

    /// Font-wide ascent/descent.
    fn measure_font(&self, style: &FontStyle) -> FontProperties;
}
