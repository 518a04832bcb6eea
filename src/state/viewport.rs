//! Viewport state management.
//!
//! This module encapsulates the scroll synchronization at the core of the
//! widget: a first-visible pointer into the visible sequence and a
//! normalized scroll fraction that must stay mutually consistent while the
//! tree mutates underneath them.
//!
//! Responsibilities:
//! - Mapping fraction -> window (explicit scroll position changes)
//! - Mapping window -> fraction (`ensure_visible`, expand/collapse fix-up)
//! - Reconciling the first-visible pointer after structural changes
//! - Guarding against feedback between the two mappings

use crate::domain::tree_operations::row_index_of;
use crate::domain::viewport_operations::{
    clamp_fraction, first_index_for_fraction, fraction_for_index,
};
use crate::domain::visibility::VisibleRow;
use crate::tree::{NodeId, PlayTree};

/// Who is writing the scroll fraction.
///
/// A `Viewport`-origin write records the fraction without re-deriving the
/// window from it; the window was the source of the value. This replaces a
/// mutable re-entrancy flag with a scoped, testable tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollOrigin {
    /// The surrounding application (scrollbar, wheel, restored session).
    External,
    /// This widget, republishing a fraction derived from its own window.
    Viewport,
}

/// Outcome of an `ensure_visible` request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnsureVisible {
    /// The target was already inside the window; nothing changed.
    AlreadyVisible,
    /// The window must move; apply this fraction through the
    /// fraction->window path.
    Scrolled(f64),
}

/// State tying the first-visible pointer to the scroll fraction.
#[derive(Debug, Clone)]
pub struct ViewportState {
    /// Topmost rendered row; `None` is the end sentinel (empty sequence).
    first_pos: Option<NodeId>,
    /// Normalized scroll position, 1.0 = top.
    fraction: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewportState {
    /// Creates a viewport pinned to the top of the sequence.
    pub fn new() -> Self {
        Self {
            first_pos: None,
            fraction: 1.0,
        }
    }

    // ===== Queries =====

    /// The first visible item, or `None` when the sequence is empty.
    pub fn first_pos(&self) -> Option<NodeId> {
        self.first_pos
    }

    /// The stored scroll fraction (1.0 = top).
    pub fn fraction(&self) -> f64 {
        self.fraction
    }

    /// 0-based index of the first visible row, defaulting to 0 when the
    /// pointer is unset or no longer part of the sequence.
    pub fn first_index(&self, rows: &[VisibleRow]) -> usize {
        self.first_pos
            .and_then(|id| row_index_of(rows, id))
            .unwrap_or(0)
    }

    /// Resolves the item `offset` rows below the top of the window, or
    /// `None` when the walk runs past the end of the sequence.
    pub fn item_at_row(&self, rows: &[VisibleRow], offset: usize) -> Option<NodeId> {
        if rows.is_empty() {
            return None;
        }
        rows.get(self.first_index(rows) + offset).map(|r| r.id)
    }

    /// True iff the item's rank lies inside the rendered window.
    pub fn is_item_visible(
        &self,
        rows: &[VisibleRow],
        max_items: Option<usize>,
        id: NodeId,
    ) -> bool {
        let Some(max_items) = max_items else {
            return false;
        };
        let Some(idx) = row_index_of(rows, id) else {
            return false;
        };
        let first = self.first_index(rows);
        idx >= first && idx < first + max_items
    }

    // ===== Fraction -> window =====

    /// Applies a scroll-fraction write.
    ///
    /// `External` writes re-derive the first-visible pointer from the
    /// fraction; `Viewport` writes only record the value (the window was
    /// the source). Without assigned geometry (`max_items == None`) the
    /// window is left alone.
    ///
    /// # Returns
    /// `true` when the first-visible pointer moved (repaint needed).
    pub fn set_fraction(
        &mut self,
        rows: &[VisibleRow],
        max_items: Option<usize>,
        fraction: f64,
        origin: ScrollOrigin,
    ) -> bool {
        self.fraction = clamp_fraction(fraction);
        if origin == ScrollOrigin::Viewport {
            return false;
        }
        let Some(max_items) = max_items else {
            return false;
        };

        let target = if rows.is_empty() {
            None
        } else {
            let idx = first_index_for_fraction(self.fraction, rows.len(), max_items);
            rows.get(idx).map(|r| r.id)
        };
        if self.first_pos != target {
            self.first_pos = target;
            true
        } else {
            false
        }
    }

    /// Recomputes the window from the stored fraction, e.g. after a resize
    /// changed how many rows fit. Callers repaint unconditionally.
    pub fn reapply_fraction(&mut self, rows: &[VisibleRow], max_items: Option<usize>) {
        let fraction = self.fraction;
        self.set_fraction(rows, max_items, fraction, ScrollOrigin::External);
    }

    // ===== Window -> fraction =====

    /// Decides whether `focus` needs scrolling into view.
    ///
    /// Callers are responsible for having expanded the target's ancestors
    /// (and re-flattened) first; a focus outside the sequence is a no-op.
    pub fn ensure_visible(
        &self,
        rows: &[VisibleRow],
        max_items: Option<usize>,
        focus: NodeId,
    ) -> EnsureVisible {
        let Some(max_items) = max_items else {
            return EnsureVisible::AlreadyVisible;
        };
        let Some(focus_idx) = row_index_of(rows, focus) else {
            return EnsureVisible::AlreadyVisible;
        };
        let first_idx = self.first_index(rows);
        if focus_idx < first_idx || focus_idx > first_idx + max_items.saturating_sub(1) {
            EnsureVisible::Scrolled(fraction_for_index(focus_idx, rows.len()))
        } else {
            EnsureVisible::AlreadyVisible
        }
    }

    /// Window -> fraction fix-up after this widget changed the sequence
    /// shape itself (expand/collapse, compaction).
    ///
    /// Relocates a first-visible pointer that fell out of the sequence to
    /// its nearest ancestor still present (falling back to the sequence
    /// start), then records the fraction the new window corresponds to
    /// without re-deriving the window from it.
    ///
    /// # Returns
    /// The republished fraction, for forwarding to the position owner.
    pub fn refraction_after_structure(&mut self, tree: &PlayTree, rows: &[VisibleRow]) -> f64 {
        if let Some(fp) = self.first_pos {
            if row_index_of(rows, fp).is_none() {
                let mut cur = tree.parent(fp);
                let mut relocated = None;
                while let Some(p) = cur {
                    if row_index_of(rows, p).is_some() {
                        relocated = Some(p);
                        break;
                    }
                    cur = tree.parent(p);
                }
                self.first_pos = relocated.or_else(|| rows.first().map(|r| r.id));
            }
        } else {
            self.first_pos = rows.first().map(|r| r.id);
        }

        self.fraction = fraction_for_index(self.first_index(rows), rows.len());
        self.fraction
    }

    // ===== Structural reconciliation =====

    /// Resets the window to the sequence start (global change).
    pub fn reconcile_after_reset(&mut self, rows: &[VisibleRow]) {
        self.first_pos = rows.first().map(|r| r.id);
    }

    /// Repairs a first-visible pointer that now names a tombstone.
    ///
    /// `stale_rows` is the sequence as it was before the deletion (it still
    /// contains the tombstoned ids); the pointer walks backward through it
    /// until a live node is found, falling back to the first live row.
    ///
    /// # Returns
    /// `true` when the pointer moved.
    pub fn reconcile_after_delete(&mut self, stale_rows: &[VisibleRow], tree: &PlayTree) -> bool {
        let Some(fp) = self.first_pos else {
            return false;
        };
        if tree.is_live(fp) {
            return false;
        }

        let start = row_index_of(stale_rows, fp);
        let mut replacement = None;
        if let Some(start) = start {
            for row in stale_rows[..start].iter().rev() {
                if tree.is_live(row.id) {
                    replacement = Some(row.id);
                    break;
                }
            }
        }
        if replacement.is_none() {
            replacement = stale_rows.iter().find(|r| tree.is_live(r.id)).map(|r| r.id);
        }
        self.first_pos = replacement;
        true
    }

    /// Adopts the sequence start when the pointer is unset (first append
    /// into an empty widget, or everything was deleted).
    pub fn adopt_start_if_unset(&mut self, rows: &[VisibleRow]) -> bool {
        if self.first_pos.is_none() {
            self.first_pos = rows.first().map(|r| r.id);
            return self.first_pos.is_some();
        }
        false
    }

    /// Directly repositions the window top. Used by the append quirk in
    /// flat mode; general movement goes through the fraction.
    pub fn set_first_pos(&mut self, first: Option<NodeId>) {
        self.first_pos = first;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::visibility::{TraversalMode, flatten};

    fn ten_leaves() -> (PlayTree, Vec<VisibleRow>) {
        let mut tree = PlayTree::new();
        for i in 0..10 {
            tree.add_node(None, format!("t{i}"));
        }
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        (tree, rows)
    }

    #[test]
    fn external_fraction_moves_the_window() {
        let (_, rows) = ten_leaves();
        let mut vp = ViewportState::new();

        assert!(vp.set_fraction(&rows, Some(4), 1.0, ScrollOrigin::External));
        assert_eq!(vp.first_pos(), Some(rows[0].id));

        assert!(vp.set_fraction(&rows, Some(4), 0.0, ScrollOrigin::External));
        // excess = 6 -> rank 7 -> index 6.
        assert_eq!(vp.first_pos(), Some(rows[6].id));
    }

    #[test]
    fn viewport_origin_records_without_moving() {
        let (_, rows) = ten_leaves();
        let mut vp = ViewportState::new();
        vp.set_fraction(&rows, Some(4), 1.0, ScrollOrigin::External);

        assert!(!vp.set_fraction(&rows, Some(4), 0.0, ScrollOrigin::Viewport));
        assert_eq!(vp.first_pos(), Some(rows[0].id));
        assert_eq!(vp.fraction(), 0.0);
    }

    #[test]
    fn no_geometry_is_a_no_op_for_the_window() {
        let (_, rows) = ten_leaves();
        let mut vp = ViewportState::new();
        assert!(!vp.set_fraction(&rows, None, 0.0, ScrollOrigin::External));
        assert_eq!(vp.first_pos(), None);
    }

    #[test]
    fn ensure_visible_reports_scrolled_only_outside_window() {
        let (_, rows) = ten_leaves();
        let mut vp = ViewportState::new();
        vp.set_fraction(&rows, Some(4), 1.0, ScrollOrigin::External);

        assert_eq!(
            vp.ensure_visible(&rows, Some(4), rows[2].id),
            EnsureVisible::AlreadyVisible
        );
        match vp.ensure_visible(&rows, Some(4), rows[7].id) {
            EnsureVisible::Scrolled(f) => {
                assert!((f - (1.0 - 7.0 / 9.0)).abs() < 1e-12);
            }
            other => panic!("expected scroll, got {other:?}"),
        }
    }

    #[test]
    fn item_at_row_walks_from_the_window_top() {
        let (_, rows) = ten_leaves();
        let mut vp = ViewportState::new();
        vp.set_fraction(&rows, Some(4), 0.0, ScrollOrigin::External);

        assert_eq!(vp.item_at_row(&rows, 0), Some(rows[6].id));
        assert_eq!(vp.item_at_row(&rows, 3), Some(rows[9].id));
        assert_eq!(vp.item_at_row(&rows, 4), None);
    }

    #[test]
    fn delete_reconciliation_walks_backward_to_live() {
        let (mut tree, rows) = ten_leaves();
        let mut vp = ViewportState::new();
        vp.set_fraction(&rows, Some(4), 0.0, ScrollOrigin::External);
        let fp = vp.first_pos().unwrap();

        // Tombstone the window top and the row above it.
        tree.set_selected(fp, true);
        tree.set_selected(rows[5].id, true);
        tree.delete_selected();

        assert!(vp.reconcile_after_delete(&rows, &tree));
        assert_eq!(vp.first_pos(), Some(rows[4].id));
    }

    #[test]
    fn delete_reconciliation_falls_back_to_first_live() {
        let (mut tree, rows) = ten_leaves();
        let mut vp = ViewportState::new();
        vp.set_fraction(&rows, Some(4), 1.0, ScrollOrigin::External);

        tree.set_selected(rows[0].id, true);
        tree.delete_selected();

        assert!(vp.reconcile_after_delete(&rows, &tree));
        assert_eq!(vp.first_pos(), Some(rows[1].id));
    }

    #[test]
    fn refraction_relocates_to_nearest_present_ancestor() {
        let mut tree = PlayTree::new();
        let album = tree.add_node(None, "album");
        let track = tree.add_node(Some(album), "track");
        for i in 0..4 {
            tree.add_node(None, format!("s{i}"));
        }
        tree.set_expanded(album, true);
        let rows = flatten(&tree, TraversalMode::Hierarchical);

        let mut vp = ViewportState::new();
        vp.set_first_pos(Some(track));

        // Collapse hides the track; the pointer climbs to the album.
        tree.set_expanded(album, false);
        let rows_after = flatten(&tree, TraversalMode::Hierarchical);
        let fraction = vp.refraction_after_structure(&tree, &rows_after);

        assert_eq!(vp.first_pos(), Some(album));
        assert_eq!(fraction, 1.0);
        let _ = rows;
    }
}
