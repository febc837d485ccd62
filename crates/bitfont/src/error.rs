/// Errors that can occur while building or filling a dynamic font.
#[derive(Debug, Clone, PartialEq)]
pub enum FontError {
    /// The surface pool refused to hand out another page surface.
    SurfacePoolExhausted {
        requested_width: u32,
        requested_height: u32,
        live_surfaces: usize,
    },

    /// A page surface could not be allocated.
    SurfaceCreationFailed(String),

    /// The outline font has no glyph for the character.
    GlyphNotFound(char),

    /// Outline path generation failed.
    PathGeneration(String),

    /// A path command sequence could not be turned into a drawable path.
    InvalidPath(String),

    /// Invalid font data.
    InvalidFontData(String),

    /// Font file not found.
    FontFileNotFound(std::path::PathBuf),

    /// Rejected font configuration.
    InvalidConfig(String),

    /// GPU resource creation failed.
    GpuResourceError(String),

    /// Generic IO error.
    IoError(String),
}

impl std::fmt::Display for FontError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FontError::SurfacePoolExhausted {
                requested_width,
                requested_height,
                live_surfaces,
            } => write!(
                f,
                "Surface pool exhausted: requested {}x{} with {} surfaces live",
                requested_width, requested_height, live_surfaces
            ),
            FontError::SurfaceCreationFailed(msg) => {
                write!(f, "Failed to create page surface: {}", msg)
            }
            FontError::GlyphNotFound(ch) => {
                write!(f, "No glyph for {:?} (U+{:04X})", ch, *ch as u32)
            }
            FontError::PathGeneration(msg) => write!(f, "Outline path generation failed: {}", msg),
            FontError::InvalidPath(msg) => write!(f, "Invalid outline path: {}", msg),
            FontError::InvalidFontData(msg) => write!(f, "Invalid font data: {}", msg),
            FontError::FontFileNotFound(path) => {
                write!(f, "Font file not found: {}", path.display())
            }
            FontError::InvalidConfig(msg) => write!(f, "Invalid font configuration: {}", msg),
            FontError::GpuResourceError(msg) => write!(f, "GPU resource error: {}", msg),
            FontError::IoError(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for FontError {}

impl From<std::io::Error> for FontError {
    fn from(err: std::io::Error) -> Self {
        FontError::IoError(err.to_string())
    }
}

/// Result type for font operations.
pub type FontResult<T> = Result<T, FontError>;
