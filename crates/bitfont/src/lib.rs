//! Bitfont - Dynamic glyph atlases for GPU bitmap text
//!
//! This crate rasterizes glyphs on demand into fixed-size texture pages and
//! records where each one landed, so text can be drawn as textured quads:
//! - Shelf packing with transparent overflow into new pages
//! - Separate measurement and rendered font sizes
//! - Pairwise kerning from measured run widths
//! - Outline drawing with per-glyph platform text fallback
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use bitfont::{
//!     CosmicGlyphMasks, CosmicMetrics, CpuTextureProvider, DynamicFont, DynamicFontConfig,
//!     FontStyle, FontSystem, PixmapPool,
//! };
//!
//! let font_system = FontSystem::with_system_fonts();
//! let pool = PixmapPool::new().with_masks(Arc::new(CosmicGlyphMasks::new(font_system.clone())));
//!
//! let mut font = DynamicFont::builder(FontStyle::sans_serif().size(32.0))
//!     .config(DynamicFontConfig::medium().with_resolution(2.0))
//!     .metrics(Arc::new(CosmicMetrics::new(font_system)))
//!     .surface_pool(Arc::new(pool))
//!     .textures(Arc::new(CpuTextureProvider))
//!     .build()?;
//!
//! font.ensure_characters("Hello, World!")?;
//! let h = font.glyph('H').unwrap();
//! println!("'H' advances {} and lives at {:?}", h.x_advance, h.texture);
//! # Ok::<(), bitfont::FontError>(())
//! ```
//!
//! ## Features
//!
//! - `tiny-skia` (default): CPU page surfaces ([`PixmapSurface`], [`PixmapPool`])
//! - `ttf` (default): outlines and metrics from font files ([`TtfFace`])
//! - `cosmic` (default): shaping-based metrics and platform glyph masks
//! - `gpu`: page textures uploaded with `wgpu`

pub mod config;
pub mod error;
pub mod font;
pub mod glyph;
pub mod kerning;
pub mod metrics;
pub mod outline;
pub mod page;
pub mod paint;
pub mod raster;
pub mod shared;
pub mod style;
pub mod surface;
pub mod texture;

#[cfg(feature = "cosmic")]
pub mod cosmic;
#[cfg(feature = "gpu")]
pub mod gpu;
#[cfg(feature = "tiny-skia")]
pub mod pixmap;
#[cfg(feature = "ttf")]
pub mod ttf;

pub use config::DynamicFontConfig;
pub use error::{FontError, FontResult};
pub use font::{DynamicFont, DynamicFontBuilder};
pub use glyph::{GlyphRecord, TextureRegion, is_whitespace};
pub use kerning::KerningCalculator;
pub use metrics::{FontProperties, GlyphMetrics, GlyphMetricsProvider};
pub use outline::{OutlineFont, OutlineLibrary, PathCommand, PathOptions};
pub use page::{FontPage, PackingCursor, PageAllocator};
pub use paint::{Color, DropShadow, LineJoin, PaintConfig, ShadowPaint, StrokeStyle};
pub use raster::{
    FallbackReason, GlyphRasterizer, RasterObserver, RasterOutcome, RasterizerState,
    TracingRasterObserver,
};
pub use shared::SharedDynamicFont;
pub use style::{FontSlant, FontStyle, FontWeight};
pub use surface::{GlyphMask, GlyphMaskSource, PageSurface, SurfacePool};
pub use texture::{CpuTexture, CpuTextureProvider, PageTexture, TextureProvider};

#[cfg(feature = "cosmic")]
pub use cosmic::{CosmicGlyphMasks, CosmicMetrics, FontSystem};
#[cfg(feature = "gpu")]
pub use gpu::{WgpuPageTexture, WgpuTextureProvider};
#[cfg(feature = "tiny-skia")]
pub use pixmap::{PixmapPool, PixmapSurface, encode_png};
#[cfg(feature = "ttf")]
pub use ttf::{TtfFace, TtfMetrics, TtfOutlineFont};

pub use bitfont_core::geometry::Rect;
