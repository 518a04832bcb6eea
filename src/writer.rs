//! Playlist document writer.
//!
//! The inverse of `parser`: serializes a [`PlayTree`] back into the JSON
//! document format, skipping tombstoned nodes.

use crate::parser::{PLAYLIST_VERSION, PlaylistDocument, PlaylistEntry};
use crate::tree::{NodeId, PlayTree};
use anyhow::{Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Converts a tree into the document model. Tombstones are dropped, so a
/// saved playlist never resurrects deleted items.
pub fn to_document(tree: &PlayTree) -> PlaylistDocument {
    PlaylistDocument {
        version: PLAYLIST_VERSION.to_string(),
        items: tree
            .root_children()
            .iter()
            .filter_map(|&id| entry_for(tree, id))
            .collect(),
    }
}

fn entry_for(tree: &PlayTree, id: NodeId) -> Option<PlaylistEntry> {
    let node = tree.get(id)?;
    if node.deleted {
        return None;
    }
    Some(PlaylistEntry {
        label: node.label.clone(),
        expanded: node.expanded,
        children: node
            .children
            .iter()
            .filter_map(|&c| entry_for(tree, c))
            .collect(),
    })
}

/// Serializes a tree to pretty-printed JSON text.
pub fn playlist_to_string(tree: &PlayTree) -> Result<String> {
    serde_json::to_string_pretty(&to_document(tree)).context("Failed to serialize playlist")
}

/// Writes a tree to a playlist file.
pub fn write_playlist(path: impl AsRef<Path>, tree: &PlayTree) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to create playlist: {}", path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &to_document(tree))
        .with_context(|| format!("Failed to write playlist: {}", path.display()))?;
    Ok(())
}
