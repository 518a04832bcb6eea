//! Visibility policy pattern for playlist tree traversal.
//!
//! This module provides a unified interface for controlling which nodes are
//! part of the widget's *visible sequence*: the depth-first ordering used
//! for rank computation, scroll math, selection sweeps and rendering.
//!
//! The policy pattern separates traversal mechanics (implemented once) from
//! visibility rules (implemented per mode), so the flat/hierarchical split
//! is decided once per widget instance instead of at every call site.

use crate::tree::{NodeId, PlayTree};

/// Widget-wide traversal mode, resolved at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TraversalMode {
    /// Depth-first pre-order over non-deleted nodes, children of collapsed
    /// nodes skipped.
    #[default]
    Hierarchical,
    /// Only non-deleted leaves, in left-to-right order; expansion state is
    /// ignored.
    Flat,
}

/// One entry of the flattened visible sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRow {
    /// The node occupying this row.
    pub id: NodeId,
    /// Depth in the hierarchy (top-level items are 1). Flat mode pins this
    /// to 1 so indentation is suppressed.
    pub depth: usize,
    /// Whether the node has no children at all.
    pub is_leaf: bool,
}

/// Policy deciding which nodes the visible sequence contains.
///
/// Implementors define:
/// - Whether a node is yielded as a row
/// - Whether traversal descends into a node's children
///
/// Tombstoned nodes are never yielded and never descended into, under every
/// policy; that invariant lives in the traversal itself.
pub trait VisibilityPolicy {
    /// Should this live node appear in the visible sequence?
    fn include(&self, tree: &PlayTree, id: NodeId) -> bool;

    /// Should traversal visit this live node's children?
    fn descend(&self, tree: &PlayTree, id: NodeId) -> bool;

    /// Row depth to report for a node at tree depth `depth`.
    fn row_depth(&self, depth: usize) -> usize {
        depth
    }
}

/// Hierarchical visibility: every live node shows, children only under
/// expanded nodes.
pub struct HierarchicalPolicy;

impl VisibilityPolicy for HierarchicalPolicy {
    fn include(&self, _tree: &PlayTree, _id: NodeId) -> bool {
        true
    }

    fn descend(&self, tree: &PlayTree, id: NodeId) -> bool {
        tree.get(id).is_some_and(|n| n.expanded)
    }
}

/// Flat visibility: only leaves show, and every live subtree is entered
/// regardless of expansion state.
pub struct FlatPolicy;

impl VisibilityPolicy for FlatPolicy {
    fn include(&self, tree: &PlayTree, id: NodeId) -> bool {
        tree.is_leaf(id)
    }

    fn descend(&self, _tree: &PlayTree, _id: NodeId) -> bool {
        true
    }

    fn row_depth(&self, _depth: usize) -> usize {
        1
    }
}

/// Stack frame for the iterative depth-first flatten.
struct Frame {
    id: NodeId,
    depth: usize,
}

/// Flattens the visible sequence under the given policy.
///
/// Traversal is an explicit-stack depth-first pre-order over the top-level
/// items; tombstones are skipped transparently (not yielded, not entered).
pub fn flatten_with_policy<P: VisibilityPolicy>(tree: &PlayTree, policy: &P) -> Vec<VisibleRow> {
    let mut rows = Vec::new();
    let mut stack: Vec<Frame> = tree
        .root_children()
        .iter()
        .rev()
        .map(|&id| Frame { id, depth: 1 })
        .collect();

    while let Some(frame) = stack.pop() {
        let Some(node) = tree.get(frame.id) else {
            continue;
        };
        if node.deleted {
            continue;
        }

        if policy.include(tree, frame.id) {
            rows.push(VisibleRow {
                id: frame.id,
                depth: policy.row_depth(frame.depth),
                is_leaf: node.children.is_empty(),
            });
        }

        if policy.descend(tree, frame.id) {
            for &child in node.children.iter().rev() {
                stack.push(Frame {
                    id: child,
                    depth: frame.depth + 1,
                });
            }
        }
    }

    rows
}

/// Flattens the visible sequence for a traversal mode.
pub fn flatten(tree: &PlayTree, mode: TraversalMode) -> Vec<VisibleRow> {
    match mode {
        TraversalMode::Hierarchical => flatten_with_policy(tree, &HierarchicalPolicy),
        TraversalMode::Flat => flatten_with_policy(tree, &FlatPolicy),
    }
}

/// Full visibility: every live node, every subtree entered. Used for
/// depth-first-order questions that ignore expansion (e.g. "the next leaf
/// after this node").
pub struct FullPolicy;

impl VisibilityPolicy for FullPolicy {
    fn include(&self, _tree: &PlayTree, _id: NodeId) -> bool {
        true
    }

    fn descend(&self, _tree: &PlayTree, _id: NodeId) -> bool {
        true
    }
}

/// The first leaf strictly after `id` in full depth-first order.
pub fn next_leaf_after(tree: &PlayTree, id: NodeId) -> Option<NodeId> {
    let order = flatten_with_policy(tree, &FullPolicy);
    let idx = order.iter().position(|r| r.id == id)?;
    order[idx + 1..].iter().find(|r| r.is_leaf).map(|r| r.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// album(expanded) -> t1, t2 ; single
    fn sample_tree() -> (PlayTree, [NodeId; 4]) {
        let mut tree = PlayTree::new();
        let album = tree.add_node(None, "album");
        let t1 = tree.add_node(Some(album), "t1");
        let t2 = tree.add_node(Some(album), "t2");
        let single = tree.add_node(None, "single");
        tree.set_expanded(album, true);
        (tree, [album, t1, t2, single])
    }

    fn ids(rows: &[VisibleRow]) -> Vec<NodeId> {
        rows.iter().map(|r| r.id).collect()
    }

    #[test]
    fn hierarchical_preorder_with_expansion() {
        let (tree, [album, t1, t2, single]) = sample_tree();
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        assert_eq!(ids(&rows), vec![album, t1, t2, single]);
        assert_eq!(rows[0].depth, 1);
        assert_eq!(rows[1].depth, 2);
        assert!(!rows[0].is_leaf);
        assert!(rows[1].is_leaf);
    }

    #[test]
    fn collapsed_children_are_hidden() {
        let (mut tree, [album, _, _, single]) = sample_tree();
        tree.set_expanded(album, false);
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        assert_eq!(ids(&rows), vec![album, single]);
    }

    #[test]
    fn flat_mode_yields_leaves_regardless_of_expansion() {
        let (mut tree, [album, t1, t2, single]) = sample_tree();
        tree.set_expanded(album, false);
        let rows = flatten(&tree, TraversalMode::Flat);
        assert_eq!(ids(&rows), vec![t1, t2, single]);
        // Flat depth is pinned to 1 to suppress indentation.
        assert!(rows.iter().all(|r| r.depth == 1));
    }

    #[test]
    fn tombstones_are_skipped_with_their_subtrees() {
        let (mut tree, [album, _, _, single]) = sample_tree();
        tree.set_selected(album, true);
        tree.delete_selected();

        assert_eq!(
            ids(&flatten(&tree, TraversalMode::Hierarchical)),
            vec![single]
        );
        assert_eq!(ids(&flatten(&tree, TraversalMode::Flat)), vec![single]);
    }

    #[test]
    fn deep_nesting_depths() {
        let mut tree = PlayTree::new();
        let a = tree.add_node(None, "a");
        let b = tree.add_node(Some(a), "b");
        let c = tree.add_node(Some(b), "c");
        tree.set_expanded(a, true);
        tree.set_expanded(b, true);

        let rows = flatten(&tree, TraversalMode::Hierarchical);
        assert_eq!(ids(&rows), vec![a, b, c]);
        assert_eq!(rows[2].depth, 3);
    }

    #[test]
    fn empty_tree_flattens_to_nothing() {
        let tree = PlayTree::new();
        assert!(flatten(&tree, TraversalMode::Hierarchical).is_empty());
        assert!(flatten(&tree, TraversalMode::Flat).is_empty());
    }

    #[test]
    fn next_leaf_after_enters_the_subtree_first() {
        let (tree, [album, t1, _, single]) = sample_tree();
        // From the album the next leaf is its own first track, collapsed or
        // not; from the last track it is the trailing single.
        assert_eq!(next_leaf_after(&tree, album), Some(t1));
        assert_eq!(next_leaf_after(&tree, single), None);
    }
}
