//! Dynamic font configuration.

use crate::error::{FontError, FontResult};

/// Configuration for a [`DynamicFont`](crate::DynamicFont).
///
/// Controls the page size, glyph padding and the two font-size domains the
/// packer works in.
///
/// # Memory Usage
///
/// Pages are RGBA8, so each page costs `(texture_size * resolution)^2 * 4` bytes.
///
/// | Config | Page Size | Memory/Page (1x) |
/// |--------|-----------|------------------|
/// | small() | 256x256 | 256 KB |
/// | medium() | 512x512 | 1 MB |
/// | large() | 1024x1024 | 4 MB |
///
/// # Example
///
/// ```
/// use bitfont::DynamicFontConfig;
///
/// let config = DynamicFontConfig::large()
///     .with_resolution(2.0)
///     .with_padding(2.0);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct DynamicFontConfig {
    /// Page width and height in logical pixels.
    /// Default: 512
    pub texture_size: u32,
    /// Nominal padding around every glyph, in measurement units.
    /// Default: 4.0
    pub padding: f32,
    /// Font size every glyph metric is measured at.
    /// Default: 100.0
    pub measurement_font_size: f32,
    /// Device pixel ratio of page surfaces.
    /// Default: 1.0
    pub resolution: f32,
    /// Skip pairwise kerning computation.
    pub skip_kerning: bool,
    /// Rasterize with a white fill so the consumer can tint glyphs at draw time.
    pub apply_fill_as_tint: bool,
    /// Request hinted outlines from the outline source.
    pub hinting: bool,
}

impl Default for DynamicFontConfig {
    fn default() -> Self {
        Self {
            texture_size: 512,
            padding: 4.0,
            measurement_font_size: 100.0,
            resolution: 1.0,
            skip_kerning: false,
            apply_fill_as_tint: false,
            hinting: false,
        }
    }
}

impl DynamicFontConfig {
    /// Create default configuration (512x512 pages).
    pub fn new() -> Self {
        Self::default()
    }

    /// Small pages for short labels and memory-constrained targets.
    pub fn small() -> Self {
        Self {
            texture_size: 256,
            ..Default::default()
        }
    }

    /// Medium pages (the default).
    pub fn medium() -> Self {
        Self {
            texture_size: 512,
            ..Default::default()
        }
    }

    /// Large pages for glyph-heavy scripts or large display sizes.
    pub fn large() -> Self {
        Self {
            texture_size: 1024,
            ..Default::default()
        }
    }

    pub fn with_texture_size(mut self, size: u32) -> Self {
        self.texture_size = size;
        self
    }

    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_measurement_font_size(mut self, size: f32) -> Self {
        self.measurement_font_size = size;
        self
    }

    pub fn with_resolution(mut self, resolution: f32) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_skip_kerning(mut self, skip: bool) -> Self {
        self.skip_kerning = skip;
        self
    }

    pub fn with_fill_as_tint(mut self, enabled: bool) -> Self {
        self.apply_fill_as_tint = enabled;
        self
    }

    pub fn with_hinting(mut self, hinting: bool) -> Self {
        self.hinting = hinting;
        self
    }

    /// Check the configuration for values the packer cannot work with.
    pub fn validate(&self) -> FontResult<()> {
        if self.texture_size == 0 {
            return Err(FontError::InvalidConfig(
                "texture_size must be non-zero".to_string(),
            ));
        }
        if !(self.resolution > 0.0) {
            return Err(FontError::InvalidConfig(format!(
                "resolution must be positive, got {}",
                self.resolution
            )));
        }
        if !(self.measurement_font_size > 0.0) {
            return Err(FontError::InvalidConfig(format!(
                "measurement_font_size must be positive, got {}",
                self.measurement_font_size
            )));
        }
        if !(self.padding >= 0.0) {
            return Err(FontError::InvalidConfig(format!(
                "padding must not be negative, got {}",
                self.padding
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_presets() {
        assert_eq!(DynamicFontConfig::small().texture_size, 256);
        assert_eq!(DynamicFontConfig::medium().texture_size, 512);
        assert_eq!(DynamicFontConfig::large().texture_size, 1024);
        assert_eq!(DynamicFontConfig::default().measurement_font_size, 100.0);
        assert_eq!(DynamicFontConfig::default().padding, 4.0);
    }

    #[test]
    fn test_config_validate() {
        assert!(DynamicFontConfig::default().validate().is_ok());
        assert!(DynamicFontConfig::default().with_texture_size(0).validate().is_err());
        assert!(DynamicFontConfig::default().with_resolution(0.0).validate().is_err());
        assert!(
            DynamicFontConfig::default()
                .with_measurement_font_size(f32::NAN)
                .validate()
                .is_err()
        );
        assert!(DynamicFontConfig::default().with_padding(-1.0).validate().is_err());
    }
}
