//! Structured glyph outlines.
//!
//! An [`OutlineFont`] turns a character into [`PathCommand`]s already placed
//! in surface space (y down, origin on the baseline at `(x, y)`).
//! [`OutlineLibrary`] maps family names to outline fonts so the assembly layer
//! can resolve one once, when a font is built.

use std::sync::Arc;

use bitfont_core::alloc::HashMap;

use crate::error::FontResult;

/// A single outline drawing command in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo {
        x: f32,
        y: f32,
    },
    LineTo {
        x: f32,
        y: f32,
    },
    CubicTo {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x: f32,
        y: f32,
    },
    QuadraticTo {
        x1: f32,
        y1: f32,
        x: f32,
        y: f32,
    },
    Close,
}

/// Options forwarded to outline generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PathOptions {
    pub kerning: bool,
    pub hinting: bool,
}

/// Source of vector outlines for one font family.
pub trait OutlineFont: Send + Sync {
    /// Family name this outline font was registered for.
    fn family(&self) -> &str;

    /// Outline of `ch` at `size` pixels with its baseline origin at `(x, y)`.
    fn get_path(
        &self,
        ch: char,
        x: f32,
        y: f32,
        size: f32,
        options: PathOptions,
    ) -> FontResult<Vec<PathCommand>>;
}

/// Family-keyed registry of outline fonts.
///
/// Lookup is case-insensitive: names are normalized to lowercase.
#[derive(Default, Clone)]
pub struct OutlineLibrary {
    fonts: HashMap<String, Arc<dyn OutlineFont>>,
}

impl OutlineLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an outline font under its own family name, replacing any
    /// previous entry.
    pub fn register(&mut self, font: Arc<dyn OutlineFont>) {
        let name = font.family().to_lowercase();
        self.fonts.insert(name, font);
    }

    /// Register an outline font under an alias.
    pub fn register_as(&mut self, family: &str, font: Arc<dyn OutlineFont>) {
        self.fonts.insert(family.to_lowercase(), font);
    }

    pub fn resolve(&self, family: &str) -> Option<Arc<dyn OutlineFont>> {
        self.fonts.get(&family.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl std::fmt::Debug for OutlineLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut families: Vec<&String> = self.fonts.keys().collect();
        families.sort();
        f.debug_struct("OutlineLibrary")
            .field("families", &families)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FontError;

    struct Square(&'static str);

    impl OutlineFont for Square {
        fn family(&self) -> &str {
            self.0
        }

        fn get_path(
            &self,
            ch: char,
            x: f32,
            y: f32,
            size: f32,
            _options: PathOptions,
        ) -> FontResult<Vec<PathCommand>> {
            if ch == '?' {
                return Err(FontError::GlyphNotFound(ch));
            }
            Ok(vec![
                PathCommand::MoveTo { x, y },
                PathCommand::LineTo { x: x + size, y },
                PathCommand::LineTo {
                    x: x + size,
                    y: y - size,
                },
                PathCommand::Close,
            ])
        }
    }

    #[test]
    fn test_resolve_case_insensitive() {
        let mut library = OutlineLibrary::new();
        library.register(Arc::new(Square("Inter")));

        assert!(library.resolve("inter").is_some());
        assert!(library.resolve("INTER").is_some());
        assert!(library.resolve("Roboto").is_none());
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_register_alias_overrides() {
        let mut library = OutlineLibrary::new();
        library.register(Arc::new(Square("Inter")));
        library.register_as("inter", Arc::new(Square("Inter Display")));

        let font = library.resolve("Inter").unwrap();
        assert_eq!(font.family(), "Inter Display");
        assert_eq!(library.len(), 1);
    }

    #[test]
    fn test_outline_path_in_surface_space() {
        let font = Square("Inter");
        let path = font
            .get_path('A', 10.0, 50.0, 20.0, PathOptions::default())
            .unwrap();
        assert_eq!(path[0], PathCommand::MoveTo { x: 10.0, y: 50.0 });
        assert_eq!(path.last(), Some(&PathCommand::Close));
        assert!(font.get_path('?', 0.0, 0.0, 1.0, PathOptions::default()).is_err());
    }
}
