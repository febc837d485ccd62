//! CPU page surfaces backed by `tiny-skia`.

use std::sync::Arc;

use parking_lot::Mutex;
use tiny_skia::{FillRule, IntSize, Paint, Path, PathBuilder, Pixmap, Stroke, Transform};

use crate::error::{FontError, FontResult};
use crate::outline::PathCommand;
use crate::paint::{Color, LineJoin, PaintConfig};
use crate::surface::{GlyphMask, GlyphMaskSource, PageSurface, SurfacePool};

/// RGBA8 (premultiplied) page surface.
///
/// Paths are drawn with anti-aliasing through `tiny-skia`. Platform text is
/// drawn by blending masks from an optional [`GlyphMaskSource`]; without one,
/// `fill_text` and `stroke_text` leave the surface untouched.
pub struct PixmapSurface {
    pixmap: Pixmap,
    resolution: f32,
    masks: Option<Arc<dyn GlyphMaskSource>>,
}

impl PixmapSurface {
    /// Create a surface of `width` x `height` page pixels at `resolution`.
    pub fn new(width: u32, height: u32, resolution: f32) -> FontResult<Self> {
        let pixel_width = device_size(width, resolution);
        let pixel_height = device_size(height, resolution);
        let pixmap = Pixmap::new(pixel_width, pixel_height).ok_or_else(|| {
            FontError::SurfaceCreationFailed(format!(
                "cannot allocate a {}x{} pixmap",
                pixel_width, pixel_height
            ))
        })?;
        Ok(Self {
            pixmap,
            resolution,
            masks: None,
        })
    }

    pub fn with_masks(mut self, masks: Arc<dyn GlyphMaskSource>) -> Self {
        self.masks = Some(masks);
        self
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    fn transform(&self) -> Transform {
        Transform::from_scale(self.resolution, self.resolution)
    }

    fn blend_mask(&mut self, mask: &GlyphMask, x: f32, y: f32, color: Color) {
        let origin_x = (x * self.resolution).round() as i32 + mask.left;
        let origin_y = (y * self.resolution).round() as i32 - mask.top;
        let [r, g, b, a] = color.to_rgba8();
        let width = self.pixmap.width() as i32;
        let height = self.pixmap.height() as i32;
        let data = self.pixmap.data_mut();

        for row in 0..mask.height as i32 {
            let py = origin_y + row;
            if py < 0 || py >= height {
                continue;
            }
            for col in 0..mask.width as i32 {
                let px = origin_x + col;
                if px < 0 || px >= width {
                    continue;
                }
                let coverage = mask.alpha[(row * mask.width as i32 + col) as usize] as u32;
                if coverage == 0 {
                    continue;
                }
                let src_a = a as u32 * coverage / 255;
                let index = ((py * width + px) * 4) as usize;
                let dst = &mut data[index..index + 4];
                let inv = 255 - src_a;
                dst[0] = (r as u32 * src_a / 255 + dst[0] as u32 * inv / 255) as u8;
                dst[1] = (g as u32 * src_a / 255 + dst[1] as u32 * inv / 255) as u8;
                dst[2] = (b as u32 * src_a / 255 + dst[2] as u32 * inv / 255) as u8;
                dst[3] = (src_a + dst[3] as u32 * inv / 255) as u8;
            }
        }
    }

    fn draw_text(&mut self, ch: char, x: f32, y: f32, paint: &PaintConfig, stroke: bool) {
        let Some(masks) = self.masks.clone() else {
            return;
        };
        let Some(mask) = masks.glyph_mask(ch, paint) else {
            tracing::trace!("No platform mask for {:?}", ch);
            return;
        };

        if stroke {
            let Some(style) = paint.stroke else {
                return;
            };
            // Approximate the stroke by stamping the mask around the glyph.
            let r = style.width / 2.0;
            let d = r * std::f32::consts::FRAC_1_SQRT_2;
            for (dx, dy) in [
                (r, 0.0),
                (-r, 0.0),
                (0.0, r),
                (0.0, -r),
                (d, d),
                (d, -d),
                (-d, d),
                (-d, -d),
            ] {
                self.blend_mask(&mask, x + dx, y + dy, style.color);
            }
            return;
        }

        if let Some(shadow) = paint.shadow {
            self.blend_mask(&mask, x + shadow.offset.x, y + shadow.offset.y, shadow.color);
        }
        if let Some(fill) = paint.fill {
            self.blend_mask(&mask, x, y, fill);
        }
    }
}

impl PageSurface for PixmapSurface {
    fn pixel_width(&self) -> u32 {
        self.pixmap.width()
    }

    fn pixel_height(&self) -> u32 {
        self.pixmap.height()
    }

    fn resolution(&self) -> f32 {
        self.resolution
    }

    fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    fn stroke_path(&mut self, commands: &[PathCommand], paint: &PaintConfig) -> FontResult<()> {
        let Some(style) = paint.stroke else {
            return Ok(());
        };
        let path = build_path(commands)?;
        let stroke = Stroke {
            width: style.width,
            miter_limit: style.miter_limit,
            line_join: match style.join {
                LineJoin::Miter => tiny_skia::LineJoin::Miter,
                LineJoin::Round => tiny_skia::LineJoin::Round,
                LineJoin::Bevel => tiny_skia::LineJoin::Bevel,
            },
            ..Stroke::default()
        };
        let transform = self.transform();
        self.pixmap
            .stroke_path(&path, &solid(style.color), &stroke, transform, None);
        Ok(())
    }

    fn fill_path(&mut self, commands: &[PathCommand], paint: &PaintConfig) -> FontResult<()> {
        let path = build_path(commands)?;
        let transform = self.transform();

        if let Some(shadow) = paint.shadow {
            let offset = transform.pre_translate(shadow.offset.x, shadow.offset.y);
            self.pixmap
                .fill_path(&path, &solid(shadow.color), FillRule::Winding, offset, None);
        }
        if let Some(fill) = paint.fill {
            self.pixmap
                .fill_path(&path, &solid(fill), FillRule::Winding, transform, None);
        }
        Ok(())
    }

    fn stroke_text(&mut self, ch: char, x: f32, y: f32, paint: &PaintConfig) {
        self.draw_text(ch, x, y, paint, true);
    }

    fn fill_text(&mut self, ch: char, x: f32, y: f32, paint: &PaintConfig) {
        self.draw_text(ch, x, y, paint, false);
    }

    fn pixels(&self) -> &[u8] {
        self.pixmap.data()
    }
}

fn device_size(size: u32, resolution: f32) -> u32 {
    ((size as f32 * resolution).round() as u32).max(1)
}

fn solid(color: Color) -> Paint<'static> {
    let [r, g, b, a] = color.to_rgba8();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

fn build_path(commands: &[PathCommand]) -> FontResult<Path> {
    let mut builder = PathBuilder::new();
    for command in commands {
        match *command {
            PathCommand::MoveTo { x, y } => builder.move_to(x, y),
            PathCommand::LineTo { x, y } => builder.line_to(x, y),
            PathCommand::QuadraticTo { x1, y1, x, y } => builder.quad_to(x1, y1, x, y),
            PathCommand::CubicTo {
                x1,
                y1,
                x2,
                y2,
                x,
                y,
            } => builder.cubic_to(x1, y1, x2, y2, x, y),
            PathCommand::Close => builder.close(),
        }
    }
    builder.finish().ok_or_else(|| {
        FontError::InvalidPath(format!("{} commands do not form a drawable path", commands.len()))
    })
}

/// Encode the pixels of any page surface as PNG.
///
/// Pixels are expected to be premultiplied RGBA8, as produced by [`PixmapSurface`].
pub fn encode_png(surface: &dyn PageSurface) -> FontResult<Vec<u8>> {
    let size = IntSize::from_wh(surface.pixel_width(), surface.pixel_height()).ok_or_else(|| {
        FontError::InvalidConfig("cannot encode an empty surface".to_string())
    })?;
    let pixmap = Pixmap::from_vec(surface.pixels().to_vec(), size).ok_or_else(|| {
        FontError::InvalidConfig("surface pixels do not match its size".to_string())
    })?;
    pixmap
        .encode_png()
        .map_err(|e| FontError::IoError(e.to_string()))
}

#[derive(Default)]
struct PoolState {
    free: Vec<Box<dyn PageSurface>>,
    live: usize,
}

/// Pool of [`PixmapSurface`]s.
///
/// Released surfaces are reused for requests of the same size and resolution.
/// With a live-surface limit, acquiring past it fails with
/// [`FontError::SurfacePoolExhausted`].
#[derive(Default)]
pub struct PixmapPool {
    state: Mutex<PoolState>,
    masks: Option<Arc<dyn GlyphMaskSource>>,
    max_live: Option<usize>,
}

impl PixmapPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform text engine handed to every surface.
    pub fn with_masks(mut self, masks: Arc<dyn GlyphMaskSource>) -> Self {
        self.masks = Some(masks);
        self
    }

    pub fn with_max_live(mut self, max_live: usize) -> Self {
        self.max_live = Some(max_live);
        self
    }

    /// Surfaces currently handed out.
    pub fn live_count(&self) -> usize {
        self.state.lock().live
    }

    /// Released surfaces waiting for reuse.
    pub fn free_count(&self) -> usize {
        self.state.lock().free.len()
    }
}

impl SurfacePool for PixmapPool {
    fn acquire(
        &self,
        width: u32,
        height: u32,
        resolution: f32,
    ) -> FontResult<Box<dyn PageSurface>> {
        let mut state = self.state.lock();
        if let Some(max_live) = self.max_live
            && state.live >= max_live
        {
            return Err(FontError::SurfacePoolExhausted {
                requested_width: width,
                requested_height: height,
                live_surfaces: state.live,
            });
        }

        let pixel_width = device_size(width, resolution);
        let pixel_height = device_size(height, resolution);
        let reusable = state.free.iter().position(|s| {
            s.pixel_width() == pixel_width
                && s.pixel_height() == pixel_height
                && s.resolution() == resolution
        });

        let surface = match reusable {
            Some(index) => {
                let mut surface = state.free.swap_remove(index);
                surface.clear();
                surface
            }
            None => {
                let mut surface = PixmapSurface::new(width, height, resolution)?;
                if let Some(masks) = &self.masks {
                    surface = surface.with_masks(masks.clone());
                }
                tracing::trace!("Created {}x{} pixmap surface", pixel_width, pixel_height);
                Box::new(surface) as Box<dyn PageSurface>
            }
        };

        state.live += 1;
        Ok(surface)
    }

    fn release(&self, surface: Box<dyn PageSurface>) {
        let mut state = self.state.lock();
        state.live = state.live.saturating_sub(1);
        state.free.push(surface);
    }
}

impl std::fmt::Debug for PixmapPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("PixmapPool")
            .field("live", &state.live)
            .field("free", &state.free.len())
            .field("max_live", &self.max_live)
            .finish()
    }
}
