//! State management modules for the playlist view.
//!
//! This module contains state-only logic (no rendering concerns):
//! - Viewport state (first-visible pointer, scroll fraction sync)
//! - Selection state (anchor, multi-select sweeps)

mod selection;
mod viewport;

pub use selection::{MoveDir, SelectionState};
pub use viewport::{EnsureVisible, ScrollOrigin, ViewportState};
