//! Thread-safe handle to a dynamic font.

use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::FontResult;
use crate::font::DynamicFont;
use crate::glyph::GlyphRecord;

/// A [`DynamicFont`] shared between threads.
///
/// Each [`ensure_characters`](Self::ensure_characters) call holds the lock for
/// its whole duration, so packing state is never observed half-updated.
#[derive(Clone, Debug)]
pub struct SharedDynamicFont {
    inner: Arc<Mutex<DynamicFont>>,
}

impl SharedDynamicFont {
    pub fn new(font: DynamicFont) -> Self {
        Self {
            inner: Arc::new(Mutex::new(font)),
        }
    }

    pub fn ensure_characters(&self, text: &str) -> FontResult<()> {
        self.inner.lock().ensure_characters(text)
    }

    /// Copy of the record for `ch`.
    pub fn glyph(&self, ch: char) -> Option<GlyphRecord> {
        self.inner.lock().glyph(ch).cloned()
    }

    pub fn page_count(&self) -> usize {
        self.inner.lock().pages().len()
    }

    /// Lock the font for direct access.
    pub fn lock(&self) -> MutexGuard<'_, DynamicFont> {
        self.inner.lock()
    }
}

impl From<DynamicFont> for SharedDynamicFont {
    fn from(font: DynamicFont) -> Self {
        Self::new(font)
    }
}
