pub mod cache;
pub mod domain;
pub mod parser;
pub mod rendering;
pub mod state;
pub mod theme;
pub mod traits;
pub mod tree;
pub mod ui;
pub mod writer;

// Export the tree model
pub use tree::{NodeId, PlayNode, PlayTree, TreeEvent};

// Export the widget and its event types
pub use ui::{InputEvent, Interaction, Key, Modifiers, MouseKind, PlaylistView};

// Export traversal and state vocabulary
pub use domain::visibility::{TraversalMode, VisibleRow};
pub use state::{EnsureVisible, MoveDir, ScrollOrigin, SelectionState, ViewportState};

// Export rendering collaborators
pub use rendering::font::{BlockFont, CosmicFontEngine};
pub use rendering::surface::Bitmap;
pub use rendering::tree_renderer::IconSet;
pub use traits::{FontEngine, WidgetSize};

// Export skin support
pub use theme::{Skin, SkinColors, SkinManager, adjust_brightness, hex_to_color32};

// Export playlist persistence
pub use parser::{PlaylistDocument, PlaylistEntry, parse_playlist, read_playlist};
pub use writer::{playlist_to_string, write_playlist};
