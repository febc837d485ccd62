//! TrueType/OpenType outlines and metrics via `ttf-parser`.

use std::path::Path;
use std::sync::Arc;

use bitfont_core::alloc::HashMap;
use ttf_parser::{Face, GlyphId};

use crate::error::{FontError, FontResult};
use crate::metrics::{FontProperties, GlyphMetrics, GlyphMetricsProvider};
use crate::outline::{OutlineFont, PathCommand, PathOptions};
use crate::style::FontStyle;

/// Owned font file data.
///
/// Keeps the bytes and a few global metrics; a `ttf_parser::Face` is parsed
/// on demand for every query.
#[derive(Clone)]
pub struct TtfFace {
    data: Arc<[u8]>,
    index: u32,
    family: String,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
}

impl TtfFace {
    /// Parse face `index` of a font file held in memory.
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, index: u32) -> FontResult<Self> {
        let data = data.into();
        let face = Face::parse(&data, index).map_err(|e| FontError::InvalidFontData(e.to_string()))?;
        let family = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::FAMILY && name.is_unicode())
            .find_map(|name| name.to_string())
            .unwrap_or_default();
        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();

        Ok(Self {
            data,
            index,
            family,
            units_per_em,
            ascender,
            descender,
        })
    }

    /// Load the first face of a font file.
    pub fn from_file(path: impl AsRef<Path>) -> FontResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FontError::FontFileNotFound(path.to_path_buf()));
        }
        let data = std::fs::read(path)?;
        tracing::debug!("Loaded font file {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(data, 0)
    }

    /// Override the family name read from the `name` table.
    pub fn with_family(mut self, family: impl Into<String>) -> Self {
        self.family = family.into();
        self
    }

    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn face(&self) -> FontResult<Face<'_>> {
        Face::parse(&self.data, self.index).map_err(|e| FontError::InvalidFontData(e.to_string()))
    }

    fn scale(&self, size: f32) -> f32 {
        size / self.units_per_em.max(1) as f32
    }

    /// Advance width of `text` at `size` pixels, including `kern` table pairs.
    pub fn advance_width(&self, text: &str, size: f32) -> FontResult<f32> {
        let face = self.face()?;
        let mut units = 0i32;
        let mut previous: Option<GlyphId> = None;

        for ch in text.chars() {
            let glyph = face.glyph_index(ch).unwrap_or(GlyphId(0));
            if let Some(previous) = previous {
                units += kerning(&face, previous, glyph) as i32;
            }
            units += face.glyph_hor_advance(glyph).unwrap_or(0) as i32;
            previous = Some(glyph);
        }

        Ok(units as f32 * self.scale(size))
    }

    /// Ascent and descent (both positive) at `size` pixels.
    pub fn properties(&self, size: f32) -> FontProperties {
        let scale = self.scale(size);
        FontProperties::new(self.ascender as f32 * scale, -(self.descender as f32) * scale)
    }

    /// Outline of `ch` placed with its baseline origin at `(x, y)`, y down.
    pub fn outline(&self, ch: char, x: f32, y: f32, size: f32) -> FontResult<Vec<PathCommand>> {
        let face = self.face()?;
        let glyph = face.glyph_index(ch).ok_or(FontError::GlyphNotFound(ch))?;
        let mut collector = PathCollector::new(x, y, self.scale(size));
        // Glyphs without contours (spaces, controls) produce no commands.
        let _ = face.outline_glyph(glyph, &mut collector);
        Ok(collector.commands)
    }
}

impl std::fmt::Debug for TtfFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtfFace")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("bytes", &self.data.len())
            .field("units_per_em", &self.units_per_em)
            .finish()
    }
}

fn kerning(face: &Face<'_>, left: GlyphId, right: GlyphId) -> i16 {
    face.tables()
        .kern
        .and_then(|kern| {
            kern.subtables
                .into_iter()
                .filter(|st| st.horizontal && !st.variable)
                .find_map(|st| st.glyphs_kerning(left, right))
        })
        .unwrap_or(0)
}

/// Turns `ttf-parser` outline callbacks (font units, y up) into surface-space
/// path commands.
struct PathCollector {
    origin_x: f32,
    origin_y: f32,
    scale: f32,
    commands: Vec<PathCommand>,
}

impl PathCollector {
    fn new(origin_x: f32, origin_y: f32, scale: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            scale,
            commands: Vec::new(),
        }
    }

    fn map(&self, x: f32, y: f32) -> (f32, f32) {
        (self.origin_x + x * self.scale, self.origin_y - y * self.scale)
    }
}

impl ttf_parser::OutlineBuilder for PathCollector {
    fn move_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f32, y: f32) {
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::LineTo { x, y });
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::QuadraticTo { x1, y1, x, y });
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        let (x1, y1) = self.map(x1, y1);
        let (x2, y2) = self.map(x2, y2);
        let (x, y) = self.map(x, y);
        self.commands.push(PathCommand::CubicTo {
            x1,
            y1,
            x2,
            y2,
            x,
            y,
        });
    }

    fn close(&mut self) {
        self.commands.push(PathCommand::Close);
    }
}

/// Outline source backed by a font file.
///
/// `ttf-parser` does not hint, so [`PathOptions::hinting`] is ignored.
#[derive(Debug, Clone)]
pub struct TtfOutlineFont {
    face: TtfFace,
}

impl TtfOutlineFont {
    pub fn new(face: TtfFace) -> Self {
        Self { face }
    }
}

impl OutlineFont for TtfOutlineFont {
    fn family(&self) -> &str {
        self.face.family()
    }

    fn get_path(
        &self,
        ch: char,
        x: f32,
        y: f32,
        size: f32,
        _options: PathOptions,
    ) -> FontResult<Vec<PathCommand>> {
        self.face
            .outline(ch, x, y, size)
            .map_err(|e| match e {
                FontError::GlyphNotFound(_) => e,
                other => FontError::PathGeneration(other.to_string()),
            })
    }
}

/// Glyph metrics from font files.
///
/// Faces are looked up by family name (case-insensitive), falling back to a
/// default face. Widths and heights include the stroke width and drop-shadow
/// distance of the style, the way a canvas text measurer reports them.
#[derive(Debug, Clone, Default)]
pub struct TtfMetrics {
    faces: HashMap<String, TtfFace>,
    fallback: Option<TtfFace>,
}

impl TtfMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a face under its own family name. The first face registered
    /// also becomes the fallback.
    pub fn register(&mut self, face: TtfFace) {
        let family = face.family().to_string();
        self.register_as(&family, face);
    }

    pub fn register_as(&mut self, family: &str, face: TtfFace) {
        if self.fallback.is_none() {
            self.fallback = Some(face.clone());
        }
        self.faces.insert(family.to_lowercase(), face);
    }

    pub fn with_fallback(mut self, face: TtfFace) -> Self {
        self.fallback = Some(face);
        self
    }

    pub fn face(&self, family: &str) -> Option<&TtfFace> {
        self.faces
            .get(&family.to_lowercase())
            .or(self.fallback.as_ref())
    }

    fn decoration(style: &FontStyle) -> f32 {
        style.stroke_width() + style.drop_shadow_distance()
    }
}

impl GlyphMetricsProvider for TtfMetrics {
    fn measure_advance_width(&self, text: &str, style: &FontStyle) -> f32 {
        let Some(face) = self.face(&style.family) else {
            tracing::debug!("No font face for family '{}'", style.family);
            return 0.0;
        };
        match face.advance_width(text, style.font_size) {
            Ok(width) => width + Self::decoration(style),
            Err(err) => {
                tracing::warn!("Failed to measure {:?}: {}", text, err);
                0.0
            }
        }
    }

    fn measure_glyph(&self, ch: char, style: &FontStyle) -> GlyphMetrics {
        let mut buf = [0u8; 4];
        let width = self.measure_advance_width(ch.encode_utf8(&mut buf), style);
        let font_properties = self.measure_font(style);
        let height = font_properties.font_size + Self::decoration(style);

        GlyphMetrics {
            text: ch,
            width,
            height,
            line_height: height,
            font_properties,
        }
    }

    fn measure_font(&self, style: &FontStyle) -> FontProperties {
        self.face(&style.family)
            .map(|face| face.properties(style.font_size))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use ttf_parser::OutlineBuilder;

    use super::*;

    #[test]
    fn test_invalid_font_data() {
        let err = TtfFace::from_bytes(vec![0u8; 16], 0).unwrap_err();
        assert!(matches!(err, FontError::InvalidFontData(_)));
    }

    #[test]
    fn test_missing_font_file() {
        let err = TtfFace::from_file("/nonexistent/font.ttf").unwrap_err();
        assert!(matches!(err, FontError::FontFileNotFound(_)));
    }

    #[test]
    fn test_collector_flips_and_scales() {
        let mut collector = PathCollector::new(10.0, 100.0, 0.5);
        collector.move_to(0.0, 0.0);
        collector.line_to(20.0, 40.0);
        collector.quad_to(4.0, 8.0, 6.0, 10.0);
        collector.close();

        assert_eq!(
            collector.commands,
            vec![
                PathCommand::MoveTo { x: 10.0, y: 100.0 },
                PathCommand::LineTo { x: 20.0, y: 80.0 },
                PathCommand::QuadraticTo {
                    x1: 12.0,
                    y1: 96.0,
                    x: 13.0,
                    y: 95.0
                },
                PathCommand::Close,
            ]
        );
    }

    #[test]
    fn test_metrics_without_faces() {
        let metrics = TtfMetrics::new();
        let style = FontStyle::new("Inter").size(100.0);
        assert_eq!(metrics.measure_advance_width("A", &style), 0.0);
        assert_eq!(metrics.measure_font(&style), FontProperties::default());
        assert!(metrics.face("Inter").is_none());
    }

    #[test]
    fn test_system_font_if_available() {
        let candidates = [
            "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
            "/usr/share/fonts/TTF/DejaVuSans.ttf",
            "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        ];
        let Some(face) = candidates
            .iter()
            .find_map(|path| TtfFace::from_file(path).ok())
        else {
            return;
        };

        let mut metrics = TtfMetrics::new();
        metrics.register_as("Test", face.clone());
        let style = FontStyle::new("test").size(100.0);

        let a = metrics.measure_advance_width("A", &style);
        assert!(a > 0.0);
        assert!(metrics.measure_font(&style).ascent > 0.0);

        let outline = TtfOutlineFont::new(face);
        let path = outline
            .get_path('A', 0.0, 80.0, 100.0, PathOptions::default())
            .unwrap();
        assert!(matches!(path.first(), Some(PathCommand::MoveTo { .. })));
        assert!(outline.get_path(' ', 0.0, 80.0, 100.0, PathOptions::default()).unwrap().is_empty());
    }
}
