//! The dynamic font: glyph packer and public atlas interface.

use std::sync::Arc;

use bitfont_core::alloc::{HashMap, HashSet};
use bitfont_core::geometry::Rect;
use bitfont_core::profiling::{profile_function, profile_scope};

use crate::config::DynamicFontConfig;
use crate::error::{FontError, FontResult};
use crate::glyph::{GlyphRecord, TextureRegion, is_whitespace};
use crate::kerning::KerningCalculator;
use crate::metrics::{FontProperties, GlyphMetricsProvider};
use crate::outline::{OutlineFont, OutlineLibrary};
use crate::page::{FontPage, PackingCursor, PageAllocator};
use crate::raster::{GlyphRasterizer, RasterObserver, RasterizerState, TracingRasterObserver};
use crate::style::FontStyle;
use crate::surface::SurfacePool;
use crate::texture::TextureProvider;

/// A bitmap font whose glyphs are rasterized into atlas pages on demand.
///
/// Glyphs are measured at the configured measurement font size and packed at
/// the style's rendered size, `font_scale = font_size / measurement_font_size`.
/// Pages and glyph records are append-only for the lifetime of the font.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use bitfont::{DynamicFont, FontStyle};
/// # use bitfont::{FontProperties, FontResult, GlyphMetrics, GlyphMetricsProvider};
/// # use bitfont::{CpuTextureProvider, PageSurface, PaintConfig, PathCommand, SurfacePool};
/// # struct Mono;
/// # impl GlyphMetricsProvider for Mono {
/// #     fn measure_advance_width(&self, text: &str, _: &FontStyle) -> f32 { text.chars().count() as f32 * 50.0 }
/// #     fn measure_glyph(&self, ch: char, _: &FontStyle) -> GlyphMetrics {
/// #         GlyphMetrics { text: ch, width: 50.0, height: 80.0, line_height: 80.0, font_properties: FontProperties::new(80.0, 20.0) }
/// #     }
/// #     fn measure_font(&self, _: &FontStyle) -> FontProperties { FontProperties::new(80.0, 20.0) }
/// # }
/// # struct Blank(u32);
/// # impl PageSurface for Blank {
/// #     fn pixel_width(&self) -> u32 { self.0 }
/// #     fn pixel_height(&self) -> u32 { self.0 }
/// #     fn resolution(&self) -> f32 { 1.0 }
/// #     fn clear(&mut self) {}
/// #     fn stroke_path(&mut self, _: &[PathCommand], _: &PaintConfig) -> FontResult<()> { Ok(()) }
/// #     fn fill_path(&mut self, _: &[PathCommand], _: &PaintConfig) -> FontResult<()> { Ok(()) }
/// #     fn stroke_text(&mut self, _: char, _: f32, _: f32, _: &PaintConfig) {}
/// #     fn fill_text(&mut self, _: char, _: f32, _: f32, _: &PaintConfig) {}
/// #     fn pixels(&self) -> &[u8] { &[] }
/// # }
/// # struct Pool;
/// # impl SurfacePool for Pool {
/// #     fn acquire(&self, w: u32, _: u32, _: f32) -> FontResult<Box<dyn PageSurface>> { Ok(Box::new(Blank(w))) }
/// #     fn release(&self, _: Box<dyn PageSurface>) {}
/// # }
/// let mut font = DynamicFont::builder(FontStyle::new("Inter").size(40.0))
///     .metrics(Arc::new(Mono))
///     .surface_pool(Arc::new(Pool))
///     .textures(Arc::new(CpuTextureProvider))
///     .build()?;
///
/// font.ensure_characters("Hello")?;
/// assert_eq!(font.chars().len(), 4);
/// assert_eq!(font.glyph('H').unwrap().x_advance, 50.0);
/// # Ok::<(), bitfont::FontError>(())
/// ```
pub struct DynamicFont {
    style: FontStyle,
    measure_style: FontStyle,
    kerning_style: FontStyle,
    config: DynamicFontConfig,
    metrics: Arc<dyn GlyphMetricsProvider>,
    rasterizer: GlyphRasterizer,
    allocator: PageAllocator,
    kerning: KerningCalculator,
    chars: HashMap<char, GlyphRecord>,
    current_chars: Vec<char>,
    membership: HashSet<char>,
    font_metrics: FontProperties,
    line_height: f32,
    font_scale: f32,
}

impl DynamicFont {
    pub fn builder(style: FontStyle) -> DynamicFontBuilder {
        DynamicFontBuilder::new(style)
    }

    /// Make sure every character of `text` has a glyph record, packing and
    /// rasterizing the ones that are missing.
    ///
    /// Characters already present are skipped, so repeated calls are cheap.
    /// Only page allocation failures are returned; a glyph whose outline cannot
    /// be drawn falls back to platform text.
    pub fn ensure_characters(&mut self, text: &str) -> FontResult<()> {
        profile_function!();

        let mut batch: HashSet<char> = HashSet::default();
        let new_chars: Vec<char> = text
            .chars()
            .filter(|ch| !self.membership.contains(ch) && batch.insert(*ch))
            .collect();
        if new_chars.is_empty() {
            return Ok(());
        }

        self.current_chars.extend_from_slice(&new_chars);
        self.membership.extend(new_chars.iter().copied());

        self.pack(&new_chars)?;

        if !self.config.skip_kerning {
            profile_scope!("kerning");
            self.kerning.compute(
                &new_chars,
                &self.current_chars,
                &mut self.chars,
                self.metrics.as_ref(),
                &self.kerning_style,
            );
        }
        Ok(())
    }

    fn pack(&mut self, new_chars: &[char]) -> FontResult<()> {
        let font_scale = self.font_scale;
        let padding = self.config.padding * font_scale;
        let italic_factor = if self.style.is_italic() { 2.0 } else { 1.0 };
        let stroke_width = self.style.stroke_width();
        let shadow_distance = self.style.drop_shadow_distance();

        let mut page_index = match self.allocator.active_index() {
            Some(index) => index,
            None => self.allocator.next_page()?,
        };
        let (mut usable_width, mut usable_height, mut cursor) = self.page_layout(page_index)?;

        for &ch in new_chars {
            let mut buf = [0u8; 4];
            let unscaled_width = self
                .metrics
                .measure_advance_width(ch.encode_utf8(&mut buf), &self.measure_style);
            let mut glyph = self.metrics.measure_glyph(ch, &self.measure_style);
            glyph.line_height = glyph.height;

            let texture_glyph_width = (unscaled_width * font_scale * italic_factor).ceil();
            let height = glyph.height * font_scale;
            let padded_width = texture_glyph_width + padding * 2.0;
            let padded_height = height + padding * 2.0;

            let visible = !is_whitespace(ch);
            if visible {
                cursor.max_shelf_height = padded_height.max(cursor.max_shelf_height).ceil();
            }

            if cursor.current_x + padded_width > usable_width {
                cursor.current_y += cursor.max_shelf_height;
                cursor.max_shelf_height = if visible { padded_height } else { 0.0 };
                cursor.current_x = 0.0;

                if cursor.current_y + cursor.max_shelf_height > usable_height {
                    page_index = self.advance_page(page_index, cursor)?;
                    (usable_width, usable_height, _) = self.page_layout(page_index)?;
                    cursor.current_y = 0.0;
                }
            } else if visible
                && cursor.current_y > 0.0
                && cursor.current_y + padded_height > usable_height
            {
                // Taller glyph on a shelf that no longer fits the page.
                page_index = self.advance_page(page_index, cursor)?;
                (usable_width, usable_height, _) = self.page_layout(page_index)?;
                cursor = PackingCursor {
                    current_x: 0.0,
                    current_y: 0.0,
                    max_shelf_height: padded_height.ceil(),
                };
            }

            if padded_width > usable_width {
                tracing::warn!(
                    "Glyph {:?} is {}px wide with padding, wider than the {}px page",
                    ch,
                    padded_width,
                    usable_width
                );
            }

            let x_advance = unscaled_width - shadow_distance - stroke_width;
            let mut record = GlyphRecord::new(ch, self.config.padding, x_advance);

            if visible {
                if let Some(page) = self.allocator.page_mut(page_index) {
                    let paint = page.paint().clone();
                    if let Some(surface) = page.surface_mut() {
                        self.rasterizer.rasterize(
                            cursor.current_x + padding,
                            cursor.current_y + padding,
                            &glyph,
                            font_scale,
                            surface,
                            &paint,
                        );
                    }
                }

                let frame = Rect::new(cursor.current_x, cursor.current_y, padded_width, padded_height);
                record.texture = Some(TextureRegion {
                    page: page_index,
                    frame,
                    uv: frame.normalized(usable_width, usable_height),
                });
                tracing::trace!("Packed {:?} on page {} at {:?}", ch, page_index, frame);

                cursor.current_x += padded_width.ceil();
            }

            self.kerning.seed(ch, x_advance);
            self.chars.insert(ch, record);
        }

        if let Some(page) = self.allocator.page_mut(page_index) {
            page.set_cursor(cursor);
            page.finalize();
        }
        Ok(())
    }

    /// Store the cursor on the filled page, upload it and open the next one.
    fn advance_page(&mut self, index: usize, cursor: PackingCursor) -> FontResult<usize> {
        if let Some(page) = self.allocator.page_mut(index) {
            page.set_cursor(cursor);
            page.finalize();
        }
        self.allocator.next_page()
    }

    fn page_layout(&self, index: usize) -> FontResult<(f32, f32, PackingCursor)> {
        let page = self.allocator.page(index).ok_or_else(|| {
            FontError::SurfaceCreationFailed(format!("font page {} is missing", index))
        })?;
        Ok((page.usable_width(), page.usable_height(), page.cursor()))
    }

    /// Glyph records by character.
    pub fn chars(&self) -> &HashMap<char, GlyphRecord> {
        &self.chars
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphRecord> {
        self.chars.get(&ch)
    }

    /// Characters added so far, in insertion order.
    pub fn current_chars(&self) -> &[char] {
        &self.current_chars
    }

    pub fn contains(&self, ch: char) -> bool {
        self.membership.contains(&ch)
    }

    pub fn pages(&self) -> &[FontPage] {
        self.allocator.pages()
    }

    /// Line height in measurement units.
    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    /// Ascent and descent at the measurement font size.
    pub fn font_metrics(&self) -> FontProperties {
        self.font_metrics
    }

    pub fn font_scale(&self) -> f32 {
        self.font_scale
    }

    pub fn style(&self) -> &FontStyle {
        &self.style
    }

    pub fn config(&self) -> &DynamicFontConfig {
        &self.config
    }

    /// Packing cursor of the active page.
    pub fn cursor(&self) -> PackingCursor {
        self.allocator
            .active_index()
            .and_then(|index| self.allocator.page(index))
            .map(|page| page.cursor())
            .unwrap_or_default()
    }

    pub fn rasterizer_state(&self) -> RasterizerState {
        self.rasterizer.state()
    }

    /// Release every page and forget all glyphs.
    ///
    /// Called automatically on drop.
    pub fn destroy(&mut self) {
        if !self.allocator.is_empty() {
            tracing::debug!(
                "Destroying font '{}' ({} pages, {} glyphs)",
                self.style.font_string(),
                self.allocator.len(),
                self.chars.len()
            );
        }
        self.allocator.destroy();
        self.chars.clear();
        self.current_chars.clear();
        self.membership.clear();
    }
}

impl Drop for DynamicFont {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl std::fmt::Debug for DynamicFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicFont")
            .field("style", &self.style)
            .field("config", &self.config)
            .field("font_scale", &self.font_scale)
            .field("glyphs", &self.chars.len())
            .field("pages", &self.allocator.len())
            .field("rasterizer", &self.rasterizer)
            .finish_non_exhaustive()
    }
}

/// Builder for [`DynamicFont`].
///
/// The metrics provider, surface pool and texture provider are required. The
/// outline source is optional and resolved once here.
pub struct DynamicFontBuilder {
    style: FontStyle,
    config: DynamicFontConfig,
    metrics: Option<Arc<dyn GlyphMetricsProvider>>,
    pool: Option<Arc<dyn SurfacePool>>,
    textures: Option<Arc<dyn TextureProvider>>,
    outline: Option<Arc<dyn OutlineFont>>,
    observer: Arc<dyn RasterObserver>,
}

impl DynamicFontBuilder {
    pub fn new(style: FontStyle) -> Self {
        Self {
            style,
            config: DynamicFontConfig::default(),
            metrics: None,
            pool: None,
            textures: None,
            outline: None,
            observer: Arc::new(TracingRasterObserver),
        }
    }

    pub fn config(mut self, config: DynamicFontConfig) -> Self {
        self.config = config;
        self
    }

    pub fn metrics(mut self, metrics: Arc<dyn GlyphMetricsProvider>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn surface_pool(mut self, pool: Arc<dyn SurfacePool>) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn textures(mut self, textures: Arc<dyn TextureProvider>) -> Self {
        self.textures = Some(textures);
        self
    }

    /// Use an outline source directly.
    pub fn outline(mut self, outline: Arc<dyn OutlineFont>) -> Self {
        self.outline = Some(outline);
        self
    }

    /// Resolve the outline source for the style's family from `library`.
    pub fn outline_library(mut self, library: &OutlineLibrary) -> Self {
        self.outline = library.resolve(&self.style.family);
        self
    }

    pub fn observer(mut self, observer: Arc<dyn RasterObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn build(self) -> FontResult<DynamicFont> {
        self.config.validate()?;
        if !(self.style.font_size > 0.0) {
            return Err(FontError::InvalidConfig(format!(
                "font size must be positive, got {}",
                self.style.font_size
            )));
        }

        let metrics = self
            .metrics
            .ok_or_else(|| FontError::InvalidConfig("a metrics provider is required".to_string()))?;
        let pool = self
            .pool
            .ok_or_else(|| FontError::InvalidConfig("a surface pool is required".to_string()))?;
        let textures = self
            .textures
            .ok_or_else(|| FontError::InvalidConfig("a texture provider is required".to_string()))?;

        let font_scale = self.style.font_size / self.config.measurement_font_size;
        let measure_style = self.style.with_font_size(self.config.measurement_font_size);
        let font_metrics = metrics.measure_font(&measure_style);
        let line_height = match self.style.line_height {
            Some(line_height) => line_height,
            None if font_metrics.font_size > 0.0 => font_metrics.font_size,
            None => self.config.measurement_font_size,
        };

        let rasterizer = GlyphRasterizer::new(self.outline, self.observer, self.config.hinting);
        let allocator = PageAllocator::new(
            pool,
            textures,
            self.style.clone(),
            self.config.texture_size,
            self.config.resolution,
            font_scale,
            self.config.apply_fill_as_tint,
        );

        tracing::debug!(
            "Created dynamic font '{}' (scale {}, {:?})",
            self.style.font_string(),
            font_scale,
            rasterizer.state()
        );

        Ok(DynamicFont {
            kerning_style: measure_style.undecorated(),
            style: self.style,
            measure_style,
            config: self.config,
            metrics,
            rasterizer,
            allocator,
            kerning: KerningCalculator::new(),
            chars: HashMap::default(),
            current_chars: Vec::new(),
            membership: HashSet::default(),
            font_metrics,
            line_height,
            font_scale,
        })
    }
}
