//! Page textures uploaded to the GPU with `wgpu`.

use std::sync::Arc;

use crate::error::{FontError, FontResult};
use crate::surface::PageSurface;
use crate::texture::{PageTexture, TextureProvider};

/// Page pixels are premultiplied RGBA8.
pub const PAGE_TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Texture provider creating one `wgpu::Texture` per font page.
#[derive(Clone)]
pub struct WgpuTextureProvider {
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
}

impl WgpuTextureProvider {
    pub fn new(device: Arc<wgpu::Device>, queue: Arc<wgpu::Queue>) -> Self {
        Self { device, queue }
    }
}

impl TextureProvider for WgpuTextureProvider {
    fn create_texture(
        &self,
        surface: &dyn PageSurface,
        resolution: f32,
    ) -> FontResult<Box<dyn PageTexture>> {
        let width = surface.pixel_width();
        let height = surface.pixel_height();
        let limit = self.device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            return Err(FontError::GpuResourceError(format!(
                "font page {}x{} exceeds the {} texture limit",
                width, height, limit
            )));
        }

        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Font Page"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: PAGE_TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Ok(Box::new(WgpuPageTexture {
            queue: self.queue.clone(),
            texture,
            view,
            width,
            height,
            resolution,
            destroyed: false,
        }))
    }
}

/// A font page resident on the GPU.
pub struct WgpuPageTexture {
    queue: Arc<wgpu::Queue>,
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
    resolution: f32,
    destroyed: bool,
}

impl WgpuPageTexture {
    pub fn texture(&self) -> &wgpu::Texture {
        &self.texture
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }
}

impl PageTexture for WgpuPageTexture {
    fn update(&mut self, surface: &dyn PageSurface) {
        if self.destroyed {
            return;
        }
        let pixels = surface.pixels();
        let expected = (self.width * self.height * 4) as usize;
        if pixels.len() != expected {
            tracing::warn!(
                "Skipping font page upload: {} bytes for a {}x{} texture",
                pixels.len(),
                self.width,
                self.height
            );
            return;
        }

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(self.width * 4),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.texture.destroy();
            self.destroyed = true;
        }
    }

    fn resolution(&self) -> f32 {
        self.resolution
    }

    fn pixel_width(&self) -> u32 {
        self.width
    }

    fn pixel_height(&self) -> u32 {
        self.height
    }
}
