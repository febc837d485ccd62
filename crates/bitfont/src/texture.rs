//! GPU-sampleable wrappers around page surfaces.

use crate::error::FontResult;
use crate::surface::PageSurface;

/// A sampleable texture created from a page surface.
///
/// `resolution` is the texture's own pixel density: device resolution times
/// the font scale, so its logical size is expressed in measurement units.
pub trait PageTexture: Send + Sync {
    /// Upload the current surface contents.
    fn update(&mut self, surface: &dyn PageSurface);

    /// Release the underlying resource. Further updates are ignored.
    fn destroy(&mut self);

    fn resolution(&self) -> f32;

    fn pixel_width(&self) -> u32;

    fn pixel_height(&self) -> u32;

    /// Logical width (`pixel_width / resolution`).
    fn width(&self) -> f32 {
        self.pixel_width() as f32 / self.resolution()
    }

    /// Logical height (`pixel_height / resolution`).
    fn height(&self) -> f32 {
        self.pixel_height() as f32 / self.resolution()
    }
}

/// Creates page textures.
pub trait TextureProvider: Send + Sync {
    fn create_texture(
        &self,
        surface: &dyn PageSurface,
        resolution: f32,
    ) -> FontResult<Box<dyn PageTexture>>;
}

/// Texture that keeps a CPU copy of the last upload.
///
/// Useful for headless atlas generation and for exporting pages as images.
#[derive(Debug, Clone)]
pub struct CpuTexture {
    pixels: Vec<u8>,
    pixel_width: u32,
    pixel_height: u32,
    resolution: f32,
    generation: u64,
    destroyed: bool,
}

impl CpuTexture {
    pub fn new(pixel_width: u32, pixel_height: u32, resolution: f32) -> Self {
        Self {
            pixels: Vec::new(),
            pixel_width,
            pixel_height,
            resolution,
            generation: 0,
            destroyed: false,
        }
    }

    /// Pixels of the last upload (empty before the first one).
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of uploads so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

impl PageTexture for CpuTexture {
    fn update(&mut self, surface: &dyn PageSurface) {
        if self.destroyed {
            return;
        }
        self.pixels.clear();
        self.pixels.extend_from_slice(surface.pixels());
        self.generation += 1;
    }

    fn destroy(&mut self) {
        self.pixels = Vec::new();
        self.destroyed = true;
    }

    fn resolution(&self) -> f32 {
        self.resolution
    }

    fn pixel_width(&self) -> u32 {
        self.pixel_width
    }

    fn pixel_height(&self) -> u32 {
        self.pixel_height
    }
}

/// Provider for [`CpuTexture`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuTextureProvider;

impl TextureProvider for CpuTextureProvider {
    fn create_texture(
        &self,
        surface: &dyn PageSurface,
        resolution: f32,
    ) -> FontResult<Box<dyn PageTexture>> {
        Ok(Box::new(CpuTexture::new(
            surface.pixel_width(),
            surface.pixel_height(),
            resolution,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outline::PathCommand;
    use crate::paint::PaintConfig;

    struct Solid(Vec<u8>);

    impl PageSurface for Solid {
        fn pixel_width(&self) -> u32 {
            2
        }
        fn pixel_height(&self) -> u32 {
            2
        }
        fn resolution(&self) -> f32 {
            1.0
        }
        fn clear(&mut self) {}
        fn stroke_path(&mut self, _: &[PathCommand], _: &PaintConfig) -> FontResult<()> {
            Ok(())
        }
        fn fill_path(&mut self, _: &[PathCommand], _: &PaintConfig) -> FontResult<()> {
            Ok(())
        }
        fn stroke_text(&mut self, _: char, _: f32, _: f32, _: &PaintConfig) {}
        fn fill_text(&mut self, _: char, _: f32, _: f32, _: &PaintConfig) {}
        fn pixels(&self) -> &[u8] {
            &self.0
        }
    }

    #[test]
    fn test_cpu_texture_update_and_destroy() {
        let surface = Solid(vec![7; 16]);
        let mut texture = CpuTextureProvider.create_texture(&surface, 0.5).unwrap();
        assert_eq!(texture.width(), 4.0);
        assert_eq!(texture.height(), 4.0);

        texture.update(&surface);
        texture.destroy();
        texture.update(&surface);
    }

    #[test]
    fn test_cpu_texture_generation() {
        let surface = Solid(vec![255; 16]);
        let mut texture = CpuTexture::new(2, 2, 1.0);
        assert!(texture.pixels().is_empty());

        texture.update(&surface);
        texture.update(&surface);
        assert_eq!(texture.generation(), 2);
        assert_eq!(texture.pixels(), &[255; 16][..]);

        texture.destroy();
        texture.update(&surface);
        assert_eq!(texture.generation(), 2);
        assert!(texture.is_destroyed());
    }
}
