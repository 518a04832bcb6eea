//! Rank and neighbor queries over the visible sequence.
//!
//! This module contains pure functions answering positional questions about
//! the flattened visible sequence:
//! - Rank of an item (1-based position)
//! - Forward/backward neighbors
//! - Stepping by a row offset
//!
//! All functions operate on a pre-flattened row slice so callers pay for
//! one traversal per structural generation (see `cache::TreeCache`).

use crate::domain::visibility::VisibleRow;
use crate::tree::NodeId;

/// 0-based index of `id` in the visible sequence, or `None` if the node is
/// not part of it (hidden, tombstoned or unknown).
pub fn row_index_of(rows: &[VisibleRow], id: NodeId) -> Option<usize> {
    rows.iter().position(|r| r.id == id)
}

/// 1-based rank of `id` in the visible sequence.
pub fn rank_of(rows: &[VisibleRow], id: NodeId) -> Option<usize> {
    row_index_of(rows, id).map(|i| i + 1)
}

/// Next item in the visible sequence, or `None` at the boundary.
pub fn next_visible(rows: &[VisibleRow], id: NodeId) -> Option<NodeId> {
    let idx = row_index_of(rows, id)?;
    rows.get(idx + 1).map(|r| r.id)
}

/// Previous item in the visible sequence, or `None` at the boundary.
pub fn prev_visible(rows: &[VisibleRow], id: NodeId) -> Option<NodeId> {
    let idx = row_index_of(rows, id)?;
    idx.checked_sub(1).and_then(|i| rows.get(i)).map(|r| r.id)
}

/// Steps `offset` rows forward from `from` (0 returns `from` itself).
/// Walking past the end degrades to `None`, the end sentinel.
pub fn step_forward(rows: &[VisibleRow], from: NodeId, offset: usize) -> Option<NodeId> {
    let idx = row_index_of(rows, from)?;
    rows.get(idx + offset).map(|r| r.id)
}

/// Steps up to `offset` rows backward from `from`, clamping at the
/// sequence start.
pub fn step_backward_clamped(rows: &[VisibleRow], from: NodeId, offset: usize) -> Option<NodeId> {
    let idx = row_index_of(rows, from)?;
    rows.get(idx.saturating_sub(offset)).map(|r| r.id)
}

/// Steps up to `offset` rows forward from `from`, clamping at the last row.
pub fn step_forward_clamped(rows: &[VisibleRow], from: NodeId, offset: usize) -> Option<NodeId> {
    let idx = row_index_of(rows, from)?;
    let target = (idx + offset).min(rows.len().saturating_sub(1));
    rows.get(target).map(|r| r.id)
}
