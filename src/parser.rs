//! Playlist document reader.
//!
//! Playlists are stored as a small JSON document: a version string and a
//! nested list of entries. The reader builds a [`PlayTree`] preserving item
//! order and expansion state.

use crate::tree::{NodeId, PlayTree};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Current document format version.
pub const PLAYLIST_VERSION: &str = "1.0";

/// One entry of the playlist document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub label: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub expanded: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PlaylistEntry>,
}

/// The playlist document root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistDocument {
    pub version: String,
    #[serde(default)]
    pub items: Vec<PlaylistEntry>,
}

/// Parses a playlist document from JSON text.
pub fn parse_playlist(text: &str) -> Result<PlayTree> {
    let doc: PlaylistDocument =
        serde_json::from_str(text).context("Failed to parse playlist document")?;
    let mut tree = PlayTree::new();
    for entry in &doc.items {
        insert_entry(&mut tree, None, entry);
    }
    Ok(tree)
}

/// Reads and parses a playlist file.
pub fn read_playlist(path: impl AsRef<Path>) -> Result<PlayTree> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read playlist: {}", path.display()))?;
    parse_playlist(&text)
}

fn insert_entry(tree: &mut PlayTree, parent: Option<NodeId>, entry: &PlaylistEntry) {
    let id = tree.add_node(parent, entry.label.clone());
    if entry.expanded {
        tree.set_expanded(id, true);
    }
    for child in &entry.children {
        insert_entry(tree, Some(id), child);
    }
}
