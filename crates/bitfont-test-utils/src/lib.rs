//! Test utilities for bitfont.
//!
//! Recording mock implementations of every collaborator a
//! [`DynamicFont`](bitfont::DynamicFont) talks to. Each mock takes `&self`,
//! records its calls behind a `parking_lot::Mutex` and exposes `count_*`
//! helpers for assertions.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use bitfont::{DynamicFont, FontStyle};
//! use bitfont_test_utils::{MockMetrics, MockSurfacePool, MockTextureProvider};
//!
//! let metrics = Arc::new(MockMetrics::new(50.0, 70.0));
//! let pool = Arc::new(MockSurfacePool::new());
//!
//! let mut font = DynamicFont::builder(FontStyle::default().size(50.0))
//!     .metrics(metrics.clone())
//!     .surface_pool(pool.clone())
//!     .textures(Arc::new(MockTextureProvider::new()))
//!     .build()
//!     .unwrap();
//!
//! font.ensure_characters("ab").unwrap();
//! assert_eq!(metrics.count_glyph_measurements('a'), 1);
//! assert_eq!(pool.count_acquired(), 1);
//! assert_eq!(pool.count_text_draws(), 2);
//! ```

mod mock_metrics;
mod mock_outline;
mod mock_surface;
mod mock_texture;

pub use mock_metrics::{MetricsCall, MockMetrics};
pub use mock_outline::{MockOutlineFont, RecordingObserver};
pub use mock_surface::{DrawCall, MockSurface, MockSurfacePool};
pub use mock_texture::{MockTexture, MockTextureProvider, TextureCall};
