//! Widget layer of the playlist view.
//!
//! This module contains the widget orchestration and input routing:
//! - `playlist_view` owns the tree, state, skin, icons and offscreen image
//! - `input` classifies pre-decoded events and dispatches them

pub mod input;
pub mod playlist_view;

pub use input::{InputEvent, Interaction, Key, Modifiers, MouseKind};
pub use playlist_view::PlaylistView;
