//! Glyph rasterizer adapter.
//!
//! Draws one glyph into a page surface. When the font has an outline source
//! the glyph is drawn as a vector path (stroke first, then fill); otherwise,
//! or whenever outline drawing fails, the platform text engine draws it. A
//! failure only affects the glyph being drawn.

use std::fmt;
use std::sync::Arc;

use crate::error::FontError;
use crate::metrics::GlyphMetrics;
use crate::outline::{OutlineFont, PathOptions};
use crate::paint::PaintConfig;
use crate::surface::PageSurface;

/// Which drawing strategy the rasterizer starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RasterizerState {
    OutlinePathAvailable,
    PlatformTextFallback,
}

/// Why a glyph was drawn with platform text.
#[derive(Debug, Clone, PartialEq)]
pub enum FallbackReason {
    /// The font has no outline source.
    NoOutlineSource,
    /// The outline source could not produce a path for the glyph.
    PathGeneration(FontError),
    /// The surface rejected the path.
    DrawFailed(FontError),
    /// The outline source returned no commands.
    EmptyOutline,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoOutlineSource => write!(f, "no outline source"),
            FallbackReason::PathGeneration(err) => write!(f, "path generation failed: {}", err),
            FallbackReason::DrawFailed(err) => write!(f, "path drawing failed: {}", err),
            FallbackReason::EmptyOutline => write!(f, "empty outline"),
        }
    }
}

/// Result of drawing a single glyph.
#[derive(Debug, Clone, PartialEq)]
pub enum RasterOutcome {
    OutlineDrawn,
    PlatformFallback(FallbackReason),
}

impl RasterOutcome {
    pub fn is_fallback(&self) -> bool {
        matches!(self, RasterOutcome::PlatformFallback(_))
    }
}

/// Receives the outcome of every glyph rasterization.
pub trait RasterObserver: Send + Sync {
    fn on_glyph(&self, ch: char, outcome: &RasterOutcome);
}

/// Observer that reports outcomes through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingRasterObserver;

impl RasterObserver for TracingRasterObserver {
    fn on_glyph(&self, ch: char, outcome: &RasterOutcome) {
        match outcome {
            RasterOutcome::OutlineDrawn => tracing::trace!("Drew outline for {:?}", ch),
            RasterOutcome::PlatformFallback(FallbackReason::NoOutlineSource) => {
                tracing::trace!("Drew {:?} with platform text", ch)
            }
            RasterOutcome::PlatformFallback(reason) => {
                tracing::debug!("Outline for {:?} unavailable ({}), using platform text", ch, reason)
            }
        }
    }
}

/// Draws glyphs into page surfaces.
pub struct GlyphRasterizer {
    outline: Option<Arc<dyn OutlineFont>>,
    observer: Arc<dyn RasterObserver>,
    options: PathOptions,
}

impl GlyphRasterizer {
    pub fn new(
        outline: Option<Arc<dyn OutlineFont>>,
        observer: Arc<dyn RasterObserver>,
        hinting: bool,
    ) -> Self {
        Self {
            outline,
            observer,
            options: PathOptions {
                kerning: false,
                hinting,
            },
        }
    }

    pub fn state(&self) -> RasterizerState {
        if self.outline.is_some() {
            RasterizerState::OutlinePathAvailable
        } else {
            RasterizerState::PlatformTextFallback
        }
    }

    /// Draw `metrics.text` with its padded ink origin at `(x, y)` page pixels.
    ///
    /// `metrics` are measurement-space values with `line_height` set to the
    /// glyph's ink height.
    pub fn rasterize(
        &self,
        x: f32,
        y: f32,
        metrics: &GlyphMetrics,
        font_scale: f32,
        surface: &mut dyn PageSurface,
        paint: &PaintConfig,
    ) -> RasterOutcome {
        let ch = metrics.text;
        let stroke = paint.stroke_width();
        let tx = x + stroke / 2.0;
        let ty = y - stroke / 2.0
            + (metrics.line_height - metrics.font_properties.descent) * font_scale;

        let outcome = match self.draw_outline(ch, tx, ty, surface, paint) {
            Ok(()) => RasterOutcome::OutlineDrawn,
            Err(reason) => {
                if paint.stroke.is_some() {
                    surface.stroke_text(ch, tx, ty, paint);
                }
                if paint.fill.is_some() {
                    surface.fill_text(ch, tx, ty, paint);
                }
                RasterOutcome::PlatformFallback(reason)
            }
        };

        self.observer.on_glyph(ch, &outcome);
        outcome
    }

    fn draw_outline(
        &self,
        ch: char,
        x: f32,
        y: f32,
        surface: &mut dyn PageSurface,
        paint: &PaintConfig,
    ) -> Result<(), FallbackReason> {
        let outline = self.outline.as_ref().ok_or(FallbackReason::NoOutlineSource)?;
        let path = outline
            .get_path(ch, x, y, paint.font_size, self.options)
            .map_err(FallbackReason::PathGeneration)?;
        if path.is_empty() {
            return Err(FallbackReason::EmptyOutline);
        }

        if paint.stroke.is_some() {
            surface
                .stroke_path(&path, paint)
                .map_err(FallbackReason::DrawFailed)?;
        }
        if paint.fill.is_some() {
            surface
                .fill_path(&path, paint)
                .map_err(FallbackReason::DrawFailed)?;
        }
        Ok(())
    }
}

impl fmt::Debug for GlyphRasterizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlyphRasterizer")
            .field("state", &self.state())
            .field("outline", &self.outline.as_ref().map(|o| o.family().to_string()))
            .field("options", &self.options)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;

    use super::*;
    use crate::error::FontResult;
    use crate::metrics::FontProperties;
    use crate::outline::PathCommand;
    use crate::paint::{Color, StrokeStyle};
    use crate::style::FontStyle;

    #[derive(Default)]
    struct Log(Vec<String>);

    impl PageSurface for Log {
        fn pixel_width(&self) -> u32 {
            64
        }
        fn pixel_height(&self) -> u32 {
            64
        }
        fn resolution(&self) -> f32 {
            1.0
        }
        fn clear(&mut self) {}
        fn stroke_path(&mut self, _: &[PathCommand], _: &PaintConfig) -> FontResult<()> {
            self.0.push("stroke_path".into());
            Ok(())
        }
        fn fill_path(&mut self, path: &[PathCommand], _: &PaintConfig) -> FontResult<()> {
            if path.len() > 3 {
                return Err(FontError::InvalidPath("too complex".into()));
            }
            self.0.push("fill_path".into());
            Ok(())
        }
        fn stroke_text(&mut self, ch: char, x: f32, y: f32, _: &PaintConfig) {
            self.0.push(format!("stroke_text {ch} {x} {y}"));
        }
        fn fill_text(&mut self, ch: char, x: f32, y: f32, _: &PaintConfig) {
            self.0.push(format!("fill_text {ch} {x} {y}"));
        }
        fn pixels(&self) -> &[u8] {
            &[]
        }
    }

    struct Triangle;

    impl OutlineFont for Triangle {
        fn family(&self) -> &str {
            "Triangle"
        }

        fn get_path(
            &self,
            ch: char,
            x: f32,
            y: f32,
            _size: f32,
            _options: PathOptions,
        ) -> FontResult<Vec<PathCommand>> {
            match ch {
                'x' => Err(FontError::GlyphNotFound(ch)),
                'e' => Ok(Vec::new()),
                'w' => Ok(vec![PathCommand::MoveTo { x, y }; 5]),
                _ => Ok(vec![
                    PathCommand::MoveTo { x, y },
                    PathCommand::LineTo { x: x + 1.0, y },
                    PathCommand::Close,
                ]),
            }
        }
    }

    #[derive(Default)]
    struct Outcomes(Mutex<Vec<(char, RasterOutcome)>>);

    impl RasterObserver for Outcomes {
        fn on_glyph(&self, ch: char, outcome: &RasterOutcome) {
            self.0.lock().push((ch, outcome.clone()));
        }
    }

    fn metrics(ch: char) -> GlyphMetrics {
        GlyphMetrics {
            text: ch,
            width: 50.0,
            height: 80.0,
            line_height: 80.0,
            font_properties: FontProperties::new(60.0, 20.0),
        }
    }

    fn paint() -> PaintConfig {
        FontStyle::default()
            .stroke(StrokeStyle::new(Color::WHITE, 4.0))
            .paint_config(1.0, 0.5, false)
    }

    #[test]
    fn test_outline_stroke_then_fill() {
        let observer = Arc::new(Outcomes::default());
        let rasterizer = GlyphRasterizer::new(Some(Arc::new(Triangle)), observer.clone(), false);
        assert_eq!(rasterizer.state(), RasterizerState::OutlinePathAvailable);

        let mut surface = Log::default();
        let outcome = rasterizer.rasterize(0.0, 0.0, &metrics('a'), 0.5, &mut surface, &paint());
        assert_eq!(outcome, RasterOutcome::OutlineDrawn);
        assert_eq!(surface.0, vec!["stroke_path", "fill_path"]);
        assert_eq!(observer.0.lock().len(), 1);
    }

    #[test]
    fn test_no_outline_uses_platform_text() {
        let rasterizer = GlyphRasterizer::new(None, Arc::new(TracingRasterObserver), false);
        assert_eq!(rasterizer.state(), RasterizerState::PlatformTextFallback);

        let mut surface = Log::default();
        let outcome = rasterizer.rasterize(10.0, 20.0, &metrics('a'), 0.5, &mut surface, &paint());
        assert_eq!(
            outcome,
            RasterOutcome::PlatformFallback(FallbackReason::NoOutlineSource)
        );
        // stroke 2px: tx = 10 + 1, ty = 20 - 1 + (80 - 20) * 0.5
        assert_eq!(surface.0, vec!["stroke_text a 11 49", "fill_text a 11 49"]);
    }

    #[test]
    fn test_failures_fall_back_per_glyph() {
        let rasterizer =
            GlyphRasterizer::new(Some(Arc::new(Triangle)), Arc::new(TracingRasterObserver), false);
        let mut surface = Log::default();

        let outcome = rasterizer.rasterize(0.0, 0.0, &metrics('x'), 1.0, &mut surface, &paint());
        assert!(matches!(
            outcome,
            RasterOutcome::PlatformFallback(FallbackReason::PathGeneration(FontError::GlyphNotFound('x')))
        ));

        let outcome = rasterizer.rasterize(0.0, 0.0, &metrics('e'), 1.0, &mut surface, &paint());
        assert_eq!(outcome, RasterOutcome::PlatformFallback(FallbackReason::EmptyOutline));

        let outcome = rasterizer.rasterize(0.0, 0.0, &metrics('w'), 1.0, &mut surface, &paint());
        assert!(matches!(
            outcome,
            RasterOutcome::PlatformFallback(FallbackReason::DrawFailed(_))
        ));

        let outcome = rasterizer.rasterize(0.0, 0.0, &metrics('a'), 1.0, &mut surface, &paint());
        assert_eq!(outcome, RasterOutcome::OutlineDrawn);
    }
}
