//! Metrics and platform glyph masks from `cosmic-text`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cosmic_text::{Attrs, Buffer, Family, Metrics, Shaping, SwashCache, SwashContent, fontdb};

use crate::metrics::{FontProperties, GlyphMetrics, GlyphMetricsProvider};
use crate::paint::PaintConfig;
use crate::style::{FontSlant, FontStyle, FontWeight};
use crate::surface::{GlyphMask, GlyphMaskSource};

/// Shared `cosmic-text` font system.
#[derive(Clone)]
pub struct FontSystem {
    inner: Arc<Mutex<cosmic_text::FontSystem>>,
}

impl FontSystem {
    /// Font system over the fonts installed on this machine.
    pub fn with_system_fonts() -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        Self::from_database(db)
    }

    fn from_database(db: fontdb::Database) -> Self {
        let font_system = cosmic_text::FontSystem::new_with_locale_and_db(
            sys_locale::get_locale().unwrap_or_else(|| String::from("en-US")),
            db,
        );
        Self {
            inner: Arc::new(Mutex::new(font_system)),
        }
    }

    pub fn has_fonts(&self) -> bool {
        !self.lock().db().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, cosmic_text::FontSystem> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FontSystem {
    fn default() -> Self {
        Self::with_system_fonts()
    }
}

fn family(name: &str) -> Family<'_> {
    match name {
        "sans-serif" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

fn attrs(family_name: &str, weight: FontWeight, slant: FontSlant) -> Attrs<'_> {
    Attrs::new()
        .family(family(family_name))
        .weight(weight.to_cosmic())
        .style(slant.to_cosmic())
}

/// Run measurement: advance width plus baseline position within the line.
struct RunMeasure {
    width: f32,
    ascent: f32,
    descent: f32,
}

fn shape(
    font_system: &mut cosmic_text::FontSystem,
    text: &str,
    size: f32,
    attrs: Attrs<'_>,
) -> Buffer {
    let mut buffer = Buffer::new(font_system, Metrics::new(size, size * 1.2));
    buffer.set_size(font_system, None, None);
    buffer.set_text(font_system, text, attrs, Shaping::Advanced);
    buffer.shape_until_scroll(font_system, false);
    buffer
}

/// Glyph metrics measured by shaping with `cosmic-text`.
///
/// Widths and heights include the stroke width and drop-shadow distance of
/// the style.
#[derive(Clone, Default)]
pub struct CosmicMetrics {
    font_system: FontSystem,
}

impl CosmicMetrics {
    pub fn new(font_system: FontSystem) -> Self {
        Self { font_system }
    }

    fn measure(&self, text: &str, style: &FontStyle) -> RunMeasure {
        let mut font_system = self.font_system.lock();
        let buffer = shape(
            &mut font_system,
            text,
            style.font_size,
            attrs(&style.family, style.weight, style.slant),
        );

        let mut measure = RunMeasure {
            width: 0.0,
            ascent: 0.0,
            descent: 0.0,
        };
        for run in buffer.layout_runs() {
            let width: f32 = run.glyphs.iter().map(|glyph| glyph.w).sum();
            measure.width = measure.width.max(width);
            measure.ascent = measure.ascent.max(run.line_y - run.line_top);
            measure.descent = measure
                .descent
                .max(run.line_top + run.line_height - run.line_y);
        }
        measure
    }

    fn decoration(style: &FontStyle) -> f32 {
        style.stroke_width() + style.drop_shadow_distance()
    }
}

impl GlyphMetricsProvider for CosmicMetrics {
    fn measure_advance_width(&self, text: &str, style: &FontStyle) -> f32 {
        self.measure(text, style).width + Self::decoration(style)
    }

    fn measure_glyph(&self, ch: char, style: &FontStyle) -> GlyphMetrics {
        let mut buf = [0u8; 4];
        let measure = self.measure(ch.encode_utf8(&mut buf), style);
        let font_properties = FontProperties::new(measure.ascent, measure.descent);
        let height = font_properties.font_size + Self::decoration(style);

        GlyphMetrics {
            text: ch,
            width: measure.width + Self::decoration(style),
            height,
            line_height: height,
            font_properties,
        }
    }

    fn measure_font(&self, style: &FontStyle) -> FontProperties {
        // Representative glyphs for the tallest ascender and deepest descender.
        let measure = self.measure("|ÉqÅ", style);
        FontProperties::new(measure.ascent, measure.descent)
    }
}

/// Platform text engine for CPU surfaces, backed by the swash rasterizer.
pub struct CosmicGlyphMasks {
    font_system: FontSystem,
    cache: parking_lot::Mutex<SwashCache>,
}

impl CosmicGlyphMasks {
    pub fn new(font_system: FontSystem) -> Self {
        Self {
            font_system,
            cache: parking_lot::Mutex::new(SwashCache::new()),
        }
    }
}

impl GlyphMaskSource for CosmicGlyphMasks {
    fn glyph_mask(&self, ch: char, paint: &PaintConfig) -> Option<GlyphMask> {
        let mut font_system = self.font_system.lock();
        let mut cache = self.cache.lock();

        let mut buf = [0u8; 4];
        let buffer = shape(
            &mut font_system,
            ch.encode_utf8(&mut buf),
            paint.font_size * paint.resolution,
            attrs(&paint.family, paint.weight, paint.slant),
        );

        let run = buffer.layout_runs().next()?;
        let glyph = run.glyphs.first()?;
        let physical = glyph.physical((0.0, 0.0), 1.0);
        let image = cache.get_image(&mut font_system, physical.cache_key).as_ref()?;

        let width = image.placement.width;
        let height = image.placement.height;
        if width == 0 || height == 0 {
            return None;
        }

        let alpha = match image.content {
            SwashContent::Mask => image.data.clone(),
            SwashContent::Color => image.data.chunks_exact(4).map(|px| px[3]).collect(),
            SwashContent::SubpixelMask => image
                .data
                .chunks_exact(3)
                .map(|px| ((px[0] as u16 + px[1] as u16 + px[2] as u16) / 3) as u8)
                .collect(),
        };

        Some(GlyphMask {
            left: image.placement.left,
            top: image.placement.top,
            width,
            height,
            alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_families() {
        assert_eq!(family("sans-serif"), Family::SansSerif);
        assert_eq!(family("monospace"), Family::Monospace);
        assert_eq!(family("Inter"), Family::Name("Inter"));
    }

    #[test]
    fn test_empty_font_system() {
        let font_system = FontSystem::from_database(fontdb::Database::new());
        assert!(!font_system.has_fonts());
    }

    #[test]
    fn test_system_font_metrics() {
        let font_system = FontSystem::with_system_fonts();
        if !font_system.has_fonts() {
            return;
        }
        let metrics = CosmicMetrics::new(font_system);
        let style = FontStyle::sans_serif().size(100.0);

        let single = metrics.measure_advance_width("W", &style);
        assert!(single > 0.0);
        assert!(metrics.measure_advance_width("WW", &style) > single);

        let properties = metrics.measure_font(&style);
        assert!(properties.ascent > 0.0);
        assert_eq!(properties.font_size, properties.ascent + properties.descent);
    }
}
