//! Input handling for the playlist view.

pub mod tree_input_handler;

pub use tree_input_handler::{InputEvent, Interaction, Key, Modifiers, MouseKind};
