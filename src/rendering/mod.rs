//! Rendering subsystem for the playlist view.
//!
//! This module contains all rendering logic:
//! - Offscreen pixel surfaces (fill, blit, scaling, background cache)
//! - Font engines (cosmic-text rasterizer, deterministic block font)
//! - The row render pass (bands, highlight, icons, labels)

pub mod font;
pub mod surface;
pub mod tree_renderer;
