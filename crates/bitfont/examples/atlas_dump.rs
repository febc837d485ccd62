//! Atlas Dump Example
//!
//! Packs a string into a dynamic font backed by a font file and writes every
//! atlas page to a PNG:
//! - `TtfFace` loading and `TtfMetrics` measurement
//! - Outline rasterization through `TtfOutlineFont`
//! - tiny-skia page surfaces from a `PixmapPool`
//!
//! Set `BITFONT_PUFFIN=1` to serve puffin profiling data on port 8585.
//!
//! ## Usage
//! ```bash
//! cargo run -p bitfont --example atlas_dump -- path/to/font.ttf "Hello, atlas!" [size]
//! ```

use std::f32::consts::FRAC_PI_4;
use std::sync::Arc;

use bitfont::{
    Color, CpuTextureProvider, DropShadow, DynamicFont, DynamicFontConfig, FontStyle, PageSurface,
    PixmapPool, StrokeStyle, TtfFace, TtfMetrics, TtfOutlineFont, encode_png,
};
use bitfont_core::{logging, profiling};

fn main() {
    logging::init();
    if std::env::var_os("BITFONT_PUFFIN").is_some() {
        profiling::init_profiling("127.0.0.1:8585");
    }

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: atlas_dump <font.ttf> [text] [size]");
        std::process::exit(2);
    };
    let text = args
        .next()
        .unwrap_or_else(|| "The quick brown fox jumps over the lazy dog 0123456789".to_string());
    let size: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(48.0);

    let face = TtfFace::from_file(&path).expect("Failed to load font file");
    let family = face.family().to_string();
    tracing::info!("Loaded '{}' from {}", family, path);

    let mut metrics = TtfMetrics::new();
    metrics.register(face.clone());

    let style = FontStyle::new(family)
        .size(size)
        .fill(Color::WHITE)
        .stroke(StrokeStyle::new(Color::from_hex(0x202040), 4.0))
        .drop_shadow(DropShadow::new(Color::BLACK.with_alpha(0.6), FRAC_PI_4, 6.0));

    let mut font = DynamicFont::builder(style)
        .config(DynamicFontConfig::small())
        .metrics(Arc::new(metrics))
        .surface_pool(Arc::new(PixmapPool::new()))
        .textures(Arc::new(CpuTextureProvider))
        .outline(Arc::new(TtfOutlineFont::new(face)))
        .build()
        .expect("Failed to create dynamic font");

    font.ensure_characters(&text).expect("Failed to pack characters");

    profiling::new_frame();

    tracing::info!(
        "Packed {} glyphs into {} page(s) at scale {}",
        font.chars().len(),
        font.pages().len(),
        font.font_scale()
    );

    for page in font.pages() {
        let Some(surface) = page.surface() else {
            continue;
        };
        let png = encode_png(surface).expect("Failed to encode page");
        let file = format!("atlas_page_{}.png", page.index());
        std::fs::write(&file, png).expect("Failed to write page");
        tracing::info!("Wrote {} ({}x{})", file, surface.pixel_width(), surface.pixel_height());
    }
}
