//! bitfont core
//!
//! Utilities shared by the bitfont crates: hashed collections, geometry,
//! math re-exports, logging bootstrap and profiling.

pub mod alloc;
pub mod geometry;
pub mod logging;
pub mod math;
pub mod profiling;
