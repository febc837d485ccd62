//! Math types re-exported from [`glam`].
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::Vec2;
