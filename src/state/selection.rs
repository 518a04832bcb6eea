//! Selection state management.
//!
//! This module encapsulates multi-selection over the visible sequence:
//! - The anchor (`last selected`) that range operations pivot around
//! - Single-selection moves for Up/Down
//! - Shift / ctrl-shift range sweeps in visible order
//! - The delete-selection re-anchoring algorithm
//!
//! Selection flags live on the nodes; this state only holds the anchor and
//! re-validates it against the tree on every use, so it can never dangle.

use crate::domain::tree_operations::row_index_of;
use crate::domain::visibility::VisibleRow;
use crate::tree::{NodeId, PlayTree};

/// Direction of a single-selection move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDir {
    Up,
    Down,
}

/// Anchor holder for range and keyboard selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelectionState {
    anchor: Option<NodeId>,
}

impl SelectionState {
    /// Creates a state with no anchor.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Anchor =====

    /// The current anchor, if it still names a live node.
    pub fn anchor(&self, tree: &PlayTree) -> Option<NodeId> {
        self.anchor.filter(|&id| tree.is_live(id))
    }

    /// Re-anchors on the given node.
    pub fn set_anchor(&mut self, id: NodeId) {
        self.anchor = Some(id);
    }

    /// Drops the anchor.
    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    // ===== Sweeps =====

    /// Plain-click semantics: deselect every visible item, select `id`,
    /// re-anchor on it.
    pub fn select_only(&mut self, tree: &mut PlayTree, rows: &[VisibleRow], id: NodeId) {
        for row in rows {
            tree.set_selected(row.id, false);
        }
        tree.set_selected(id, true);
        self.anchor = Some(id);
    }

    /// Ctrl-click semantics: invert the item's flag, re-anchor regardless
    /// of the resulting state.
    pub fn toggle(&mut self, tree: &mut PlayTree, id: NodeId) {
        tree.toggle_selected(id);
        self.anchor = Some(id);
    }

    /// Shift / ctrl-shift click semantics: select exactly the closed
    /// visible-order interval between the anchor and `clicked`.
    ///
    /// With `additive` (ctrl-shift) items outside the range keep their
    /// previous flag (the result ORs onto the old selection); without it
    /// they are deselected. The anchor is left unchanged.
    pub fn select_range(
        &mut self,
        tree: &mut PlayTree,
        rows: &[VisibleRow],
        clicked: NodeId,
        additive: bool,
    ) {
        let Some(clicked_idx) = row_index_of(rows, clicked) else {
            return;
        };
        let anchor_idx = self
            .anchor(tree)
            .and_then(|a| row_index_of(rows, a))
            .unwrap_or(clicked_idx);
        let (lo, hi) = if anchor_idx <= clicked_idx {
            (anchor_idx, clicked_idx)
        } else {
            (clicked_idx, anchor_idx)
        };

        for (idx, row) in rows.iter().enumerate() {
            if idx >= lo && idx <= hi {
                tree.set_selected(row.id, true);
            } else if !additive {
                tree.set_selected(row.id, false);
            }
        }
    }

    /// Up/Down semantics: move the single-selection anchor one row,
    /// pinning at the sequence boundary instead of wrapping.
    ///
    /// With no usable anchor the first row is selected, so keyboard users
    /// always obtain a cursor.
    ///
    /// # Returns
    /// The new anchor (the item to scroll into view), or `None` on an
    /// empty sequence.
    pub fn move_anchor(
        &mut self,
        tree: &mut PlayTree,
        rows: &[VisibleRow],
        dir: MoveDir,
    ) -> Option<NodeId> {
        if rows.is_empty() {
            return None;
        }
        let target_idx = match self.anchor(tree).and_then(|a| row_index_of(rows, a)) {
            None => 0,
            Some(idx) => match dir {
                MoveDir::Up => idx.saturating_sub(1),
                MoveDir::Down => (idx + 1).min(rows.len() - 1),
            },
        };
        let target = rows[target_idx].id;
        for row in rows {
            tree.set_selected(row.id, row.id == target);
        }
        self.anchor = Some(target);
        Some(target)
    }

    /// Delete-key semantics.
    ///
    /// Remembers the nearest non-selected predecessor of the anchor,
    /// tombstones the selected subtrees, then re-anchors on the last
    /// remaining selected visible node; if none remain, the remembered
    /// predecessor is re-selected and becomes the anchor.
    ///
    /// `rows` is the visible sequence from before the deletion.
    ///
    /// # Returns
    /// Ids of the tombstoned subtree roots.
    pub fn delete_selected(&mut self, tree: &mut PlayTree, rows: &[VisibleRow]) -> Vec<NodeId> {
        // Nearest non-selected item before the anchor, defaulting to the
        // sequence start.
        let anchor = self.anchor(tree);
        let mut fallback = rows.first().map(|r| r.id);
        for row in rows {
            if Some(row.id) == anchor {
                break;
            }
            let selected = tree.get(row.id).is_some_and(|n| n.selected);
            if !selected {
                fallback = Some(row.id);
            }
        }

        let deleted = tree.delete_selected();

        self.anchor = None;
        for row in rows {
            if tree.is_live(row.id) && tree.get(row.id).is_some_and(|n| n.selected) {
                self.anchor = Some(row.id);
            }
        }

        if self.anchor.is_none() {
            let survivor = fallback
                .filter(|&id| tree.is_live(id))
                .or_else(|| rows.iter().find(|r| tree.is_live(r.id)).map(|r| r.id));
            if let Some(id) = survivor {
                tree.set_selected(id, true);
                self.anchor = Some(id);
            }
        }

        deleted
    }
}
