//! Raster surfaces backing font pages.
//!
//! A [`PageSurface`] is a write-only sink: it receives draw calls together with
//! the [`PaintConfig`] to use and keeps no paint state of its own. Draw
//! coordinates are page pixels; the surface applies its own resolution.

use crate::error::FontResult;
use crate::outline::PathCommand;
use crate::paint::PaintConfig;

/// A drawable raster surface for one font page.
pub trait PageSurface: Send + Sync {
    /// Width in device pixels.
    fn pixel_width(&self) -> u32;

    /// Height in device pixels.
    fn pixel_height(&self) -> u32;

    /// Device pixels per page pixel.
    fn resolution(&self) -> f32;

    /// Reset every pixel to transparent.
    fn clear(&mut self);

    /// Stroke an outline with `paint.stroke`. Does nothing without a stroke.
    fn stroke_path(&mut self, commands: &[PathCommand], paint: &PaintConfig) -> FontResult<()>;

    /// Fill an outline with `paint.fill`, painting `paint.shadow` underneath.
    fn fill_path(&mut self, commands: &[PathCommand], paint: &PaintConfig) -> FontResult<()>;

    /// Stroke `ch` with the platform text engine, baseline origin at `(x, y)`.
    fn stroke_text(&mut self, ch: char, x: f32, y: f32, paint: &PaintConfig);

    /// Fill `ch` with the platform text engine, baseline origin at `(x, y)`.
    fn fill_text(&mut self, ch: char, x: f32, y: f32, paint: &PaintConfig);

    /// RGBA8 pixels, row-major, `pixel_width * 4` bytes per row.
    fn pixels(&self) -> &[u8];

    /// Width in page pixels.
    fn width(&self) -> f32 {
        self.pixel_width() as f32 / self.resolution()
    }

    /// Height in page pixels.
    fn height(&self) -> f32 {
        self.pixel_height() as f32 / self.resolution()
    }
}

/// Shared pool page surfaces are acquired from and returned to.
pub trait SurfacePool: Send + Sync {
    /// Acquire a surface of `width` x `height` page pixels at `resolution`.
    ///
    /// Failing to provide a surface is fatal to the caller.
    fn acquire(&self, width: u32, height: u32, resolution: f32)
    -> FontResult<Box<dyn PageSurface>>;

    /// Return a surface to the pool.
    fn release(&self, surface: Box<dyn PageSurface>);
}

/// Coverage mask of one glyph produced by a platform text engine.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphMask {
    /// Offset of the mask's left edge from the pen position, in device pixels.
    pub left: i32,
    /// Offset of the mask's top edge above the baseline, in device pixels.
    pub top: i32,
    pub width: u32,
    pub height: u32,
    /// One coverage byte per pixel.
    pub alpha: Vec<u8>,
}

/// Platform text engine used by CPU surfaces for `fill_text`/`stroke_text`.
pub trait GlyphMaskSource: Send + Sync {
    /// Rasterize `ch` at `paint.font_size * paint.resolution` device pixels.
    fn glyph_mask(&self, ch: char, paint: &PaintConfig) -> Option<GlyphMask>;
}
