//! Per-character placement records.

use bitfont_core::alloc::HashMap;
use bitfont_core::geometry::Rect;

/// Region of a page a visible glyph was packed into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextureRegion {
    /// Index into the font's page list.
    pub page: usize,
    /// Padded glyph box in page pixels.
    pub frame: Rect<f32>,
    /// `frame` normalized to `0..1` over the page.
    pub uv: Rect<f32>,
}

/// Layout and placement data for one character.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphRecord {
    /// Unicode code point.
    pub id: u32,
    /// Negative nominal padding: ink is inset from the quad origin.
    pub x_offset: f32,
    pub y_offset: f32,
    /// Cursor advance in measurement units, net of stroke and shadow.
    pub x_advance: f32,
    /// Advance adjustment applied when this glyph is followed by the key.
    pub kerning: HashMap<char, f32>,
    /// `None` for zero-ink characters.
    pub texture: Option<TextureRegion>,
}

impl GlyphRecord {
    pub(crate) fn new(ch: char, padding: f32, x_advance: f32) -> Self {
        Self {
            id: ch as u32,
            x_offset: -padding,
            y_offset: -padding,
            x_advance,
            kerning: HashMap::default(),
            texture: None,
        }
    }

    /// Kerning adjustment before `next`, 0 when none is recorded.
    pub fn kerning_with(&self, next: char) -> f32 {
        self.kerning.get(&next).copied().unwrap_or(0.0)
    }

    pub fn is_visible(&self) -> bool {
        self.texture.is_some()
    }
}

/// Characters that carry no ink and are never packed.
pub fn is_whitespace(ch: char) -> bool {
    matches!(ch, ' ' | '\t' | '\n' | '\r')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_set() {
        for ch in [' ', '\t', '\n', '\r'] {
            assert!(is_whitespace(ch));
        }
        assert!(!is_whitespace('a'));
        assert!(!is_whitespace('\u{00A0}'));
    }

    #[test]
    fn test_record_defaults() {
        let record = GlyphRecord::new('é', 4.0, 55.0);
        assert_eq!(record.id, 0xE9);
        assert_eq!(record.x_offset, -4.0);
        assert_eq!(record.y_offset, -4.0);
        assert_eq!(record.kerning_with('a'), 0.0);
        assert!(!record.is_visible());
    }
}
