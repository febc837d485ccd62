//! Mock texture provider.

use std::sync::Arc;

use bitfont::{FontError, FontResult, PageSurface, PageTexture, TextureProvider};
use parking_lot::Mutex;

/// Records a texture operation.
#[derive(Debug, Clone, PartialEq)]
pub enum TextureCall {
    Create { texture: usize, resolution: f32 },
    Update { texture: usize },
    Destroy { texture: usize },
}

type TextureLog = Arc<Mutex<Vec<TextureCall>>>;

/// Texture that only records what happens to it.
pub struct MockTexture {
    id: usize,
    pixel_width: u32,
    pixel_height: u32,
    resolution: f32,
    log: TextureLog,
}

impl PageTexture for MockTexture {
    fn update(&mut self, _surface: &dyn PageSurface) {
        self.log.lock().push(TextureCall::Update { texture: self.id });
    }

    fn destroy(&mut self) {
        self.log.lock().push(TextureCall::Destroy { texture: self.id });
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

/// Provider of [`MockTexture`]s sharing one call log.
#[derive(Default)]
pub struct MockTextureProvider {
    log: TextureLog,
    next_id: Mutex<usize>,
    fail: bool,
}

impl MockTextureProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every texture creation fail.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<TextureCall> {
        self.log.lock().clone()
    }

    pub fn count_creates(&self) -> usize {
        self.count(|call| matches!(call, TextureCall::Create { .. }))
    }

    pub fn count_updates(&self) -> usize {
        self.count(|call| matches!(call, TextureCall::Update { .. }))
    }

    /// Uploads of one texture.
    pub fn count_updates_of(&self, texture: usize) -> usize {
        self.count(|call| *call == TextureCall::Update { texture })
    }

    pub fn count_destroys(&self) -> usize {
        self.count(|call| matches!(call, TextureCall::Destroy { .. }))
    }

    fn count(&self, predicate: impl Fn(&TextureCall) -> bool) -> usize {
        self.log.lock().iter().filter(|call| predicate(call)).count()
    }
}

impl TextureProvider for MockTextureProvider {
    fn create_texture(
        &self,
        surface: &dyn PageSurface,
        resolution: f32,
    ) -> FontResult<Box<dyn PageTexture>> {
        if self.fail {
            return Err(FontError::GpuResourceError("mock texture creation failed".to_string()));
        }

        let id = {
            let mut next_id = self.next_id.lock();
            let id = *next_id;
            *next_id += 1;
            id
        };
        self.log.lock().push(TextureCall::Create {
            texture: id,
            resolution,
        });

        Ok(Box::new(MockTexture {
            id,
            pixel_width: surface.pixel_width(),
            pixel_height: surface.pixel_height(),
            resolution,
            log: self.log.clone(),
        }))
    }
}
