//! Font pages and the allocator that owns them.

use std::sync::Arc;

use bitfont_core::profiling::profile_function;

use crate::error::FontResult;
use crate::paint::PaintConfig;
use crate::style::FontStyle;
use crate::surface::{PageSurface, SurfacePool};
use crate::texture::{PageTexture, TextureProvider};

/// Shelf-packing state of a page, in page pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PackingCursor {
    pub current_x: f32,
    pub current_y: f32,
    /// Height of the tallest padded glyph on the current shelf.
    pub max_shelf_height: f32,
}

/// One fixed-size atlas page: a raster surface and the texture sampled from it.
pub struct FontPage {
    index: usize,
    surface: Option<Box<dyn PageSurface>>,
    texture: Box<dyn PageTexture>,
    paint: Arc<PaintConfig>,
    cursor: PackingCursor,
}

impl FontPage {
    pub fn index(&self) -> usize {
        self.index
    }

    /// The page surface, `None` once the font has been destroyed.
    pub fn surface(&self) -> Option<&dyn PageSurface> {
        self.surface.as_deref()
    }

    pub(crate) fn surface_mut(&mut self) -> Option<&mut (dyn PageSurface + 'static)> {
        self.surface.as_deref_mut()
    }

    pub fn texture(&self) -> &dyn PageTexture {
        self.texture.as_ref()
    }

    /// Paint configuration every glyph on this page is drawn with.
    pub fn paint(&self) -> &Arc<PaintConfig> {
        &self.paint
    }

    pub fn cursor(&self) -> PackingCursor {
        self.cursor
    }

    pub(crate) fn set_cursor(&mut self, cursor: PackingCursor) {
        self.cursor = cursor;
    }

    /// Usable width in page pixels (surface pixels over device resolution).
    pub fn usable_width(&self) -> f32 {
        self.surface.as_ref().map(|s| s.width()).unwrap_or(0.0)
    }

    /// Usable height in page pixels.
    pub fn usable_height(&self) -> f32 {
        self.surface.as_ref().map(|s| s.height()).unwrap_or(0.0)
    }

    /// Upload the surface contents to the texture.
    pub(crate) fn finalize(&mut self) {
        if let Some(surface) = self.surface.as_deref() {
            self.texture.update(surface);
        }
    }
}

impl std::fmt::Debug for FontPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontPage")
            .field("index", &self.index)
            .field("usable_width", &self.usable_width())
            .field("usable_height", &self.usable_height())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

/// Owns the page list of one font and creates pages on demand.
///
/// Pages are append-only. They are torn down together in [`destroy`](Self::destroy),
/// which returns every surface to the pool and releases every texture.
pub struct PageAllocator {
    pages: Vec<FontPage>,
    pool: Arc<dyn SurfacePool>,
    textures: Arc<dyn TextureProvider>,
    style: FontStyle,
    texture_size: u32,
    resolution: f32,
    font_scale: f32,
    fill_as_tint: bool,
}

impl PageAllocator {
    pub(crate) fn new(
        pool: Arc<dyn SurfacePool>,
        textures: Arc<dyn TextureProvider>,
        style: FontStyle,
        texture_size: u32,
        resolution: f32,
        font_scale: f32,
        fill_as_tint: bool,
    ) -> Self {
        Self {
            pages: Vec::new(),
            pool,
            textures,
            style,
            texture_size,
            resolution,
            font_scale,
            fill_as_tint,
        }
    }

    /// Allocate a page, append it and return its index.
    ///
    /// Pool exhaustion and texture creation failures are returned as is; a
    /// surface whose texture could not be created goes back to the pool.
    pub fn next_page(&mut self) -> FontResult<usize> {
        profile_function!();

        let mut surface =
            self.pool
                .acquire(self.texture_size, self.texture_size, self.resolution)?;
        surface.clear();

        let paint = Arc::new(
            self.style
                .paint_config(self.resolution, self.font_scale, self.fill_as_tint),
        );

        let texture = match self
            .textures
            .create_texture(surface.as_ref(), self.resolution * self.font_scale)
        {
            Ok(texture) => texture,
            Err(err) => {
                self.pool.release(surface);
                return Err(err);
            }
        };

        let index = self.pages.len();
        tracing::debug!(
            "Allocated font page {} ({}x{} @ {}x, font '{}')",
            index,
            self.texture_size,
            self.texture_size,
            self.resolution,
            paint.font_string()
        );

        self.pages.push(FontPage {
            index,
            surface: Some(surface),
            texture,
            paint,
            cursor: PackingCursor::default(),
        });
        Ok(index)
    }

    /// Index of the most recently allocated page.
    pub fn active_index(&self) -> Option<usize> {
        self.pages.len().checked_sub(1)
    }

    pub fn pages(&self) -> &[FontPage] {
        &self.pages
    }

    pub fn page(&self, index: usize) -> Option<&FontPage> {
        self.pages.get(index)
    }

    pub(crate) fn page_mut(&mut self, index: usize) -> Option<&mut FontPage> {
        self.pages.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Release every page.
    pub fn destroy(&mut self) {
        for mut page in self.pages.drain(..) {
            page.texture.destroy();
            if let Some(surface) = page.surface.take() {
                self.pool.release(surface);
            }
        }
    }
}

impl std::fmt::Debug for PageAllocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageAllocator")
            .field("pages", &self.pages)
            .field("texture_size", &self.texture_size)
            .field("resolution", &self.resolution)
            .field("font_scale", &self.font_scale)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::error::FontError;
    use crate::outline::PathCommand;
    use crate::texture::CpuTextureProvider;

    struct Blank {
        size: u32,
        resolution: f32,
        pixels: Vec<u8>,
    }

    impl PageSurface for Blank {
        fn pixel_width(&self) -> u32 {
            self.size
        }
        fn pixel_height(&self) -> u32 {
            self.size
        }
        fn resolution(&self) -> f32 {
            self.resolution
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
            &self.pixels
        }
    }

    #[derive(Default)]
    struct CountingPool {
        limit: Option<usize>,
        acquired: AtomicUsize,
        released: AtomicUsize,
    }

    impl SurfacePool for CountingPool {
        fn acquire(
            &self,
            width: u32,
            height: u32,
            resolution: f32,
        ) -> FontResult<Box<dyn PageSurface>> {
            let live = self.acquired.load(Ordering::SeqCst) - self.released.load(Ordering::SeqCst);
            if self.limit.is_some_and(|limit| live >= limit) {
                return Err(FontError::SurfacePoolExhausted {
                    requested_width: width,
                    requested_height: height,
                    live_surfaces: live,
                });
            }
            self.acquired.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(Blank {
                size: (width as f32 * resolution) as u32,
                resolution,
                pixels: Vec::new(),
            }))
        }

        fn release(&self, _surface: Box<dyn PageSurface>) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FailingTextures;

    impl TextureProvider for FailingTextures {
        fn create_texture(
            &self,
            _surface: &dyn PageSurface,
            _resolution: f32,
        ) -> FontResult<Box<dyn PageTexture>> {
            Err(FontError::GpuResourceError("out of memory".to_string()))
        }
    }

    fn allocator(pool: Arc<CountingPool>, textures: Arc<dyn TextureProvider>) -> PageAllocator {
        PageAllocator::new(pool, textures, FontStyle::default(), 128, 2.0, 0.5, false)
    }

    #[test]
    fn test_next_page_appends() {
        let pool = Arc::new(CountingPool::default());
        let mut pages = allocator(pool.clone(), Arc::new(CpuTextureProvider));

        assert_eq!(pages.active_index(), None);
        assert_eq!(pages.next_page().unwrap(), 0);
        assert_eq!(pages.next_page().unwrap(), 1);
        assert_eq!(pages.active_index(), Some(1));
        assert_eq!(pool.acquired.load(Ordering::SeqCst), 2);

        let page = pages.page(1).unwrap();
        assert_eq!(page.usable_width(), 128.0);
        assert_eq!(page.usable_height(), 128.0);
        assert_eq!(page.cursor(), PackingCursor::default());
    }

    #[test]
    fn test_texture_resolution_includes_font_scale() {
        let pool = Arc::new(CountingPool::default());
        let mut pages = allocator(pool, Arc::new(CpuTextureProvider));
        pages.next_page().unwrap();

        let texture = pages.page(0).unwrap().texture();
        assert_eq!(texture.resolution(), 1.0);
        assert_eq!(texture.pixel_width(), 256);
        assert_eq!(texture.width(), 256.0);
    }

    #[test]
    fn test_pool_exhaustion_propagates() {
        let pool = Arc::new(CountingPool {
            limit: Some(1),
            ..Default::default()
        });
        let mut pages = allocator(pool, Arc::new(CpuTextureProvider));

        pages.next_page().unwrap();
        let err = pages.next_page().unwrap_err();
        assert!(matches!(err, FontError::SurfacePoolExhausted { live_surfaces: 1, .. }));
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn test_texture_failure_releases_surface() {
        let pool = Arc::new(CountingPool::default());
        let mut pages = allocator(pool.clone(), Arc::new(FailingTextures));

        assert!(pages.next_page().is_err());
        assert!(pages.is_empty());
        assert_eq!(pool.released.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_destroy_releases_all_pages() {
        let pool = Arc::new(CountingPool::default());
        let mut pages = allocator(pool.clone(), Arc::new(CpuTextureProvider));
        pages.next_page().unwrap();
        pages.next_page().unwrap();
        pages.next_page().unwrap();

        pages.destroy();
        assert!(pages.is_empty());
        assert_eq!(pool.released.load(Ordering::SeqCst), 3);
    }
}
