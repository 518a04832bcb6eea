//! Playlist tree storage.
//!
//! This module owns the backing store for the playlist hierarchy:
//! - Id-addressed nodes with display label and per-node flags
//! - Structural mutations (append, tombstone delete, compaction)
//! - Parent/child navigation and depth queries
//! - Change notifications consumed by the widget layer
//!
//! Nodes are referenced everywhere by [`NodeId`], never by address, so a
//! stale reference can only resolve to "gone", not to freed memory.

use std::collections::HashMap;

/// Stable identifier of a playlist node. Never reused within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A single node of the playlist tree.
///
/// Flags are owned by the node; the widget layer only flips them and reacts
/// to the structural notifications in [`TreeEvent`].
#[derive(Debug, Clone)]
pub struct PlayNode {
    /// Display string for the item.
    pub label: String,
    /// Part of the current multi-selection.
    pub selected: bool,
    /// Children participate in the hierarchical visible sequence.
    pub expanded: bool,
    /// Tombstone: the node stays in storage until [`PlayTree::compact`]
    /// but is skipped by all traversal.
    pub deleted: bool,
    /// Currently-playing marker (at most one per tree).
    pub playing: bool,
    /// Back-reference; `None` for top-level items.
    pub parent: Option<NodeId>,
    /// Ordered child ids.
    pub children: Vec<NodeId>,
}

/// Structural change notification, handed to the widget by whoever mutated
/// the tree (or produced by the tree's own mutation helpers).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeEvent {
    /// A single item changed in place (label, playing flag, ...).
    /// `active` marks the item as the one that just started playing.
    ItemUpdated { id: NodeId, active: bool },
    /// The whole tree was rebuilt or bulk-edited.
    Reset,
    /// A new item was appended.
    Appended { id: NodeId },
    /// One or more items were tombstoned.
    Deleted { id: NodeId },
}

/// The playlist tree.
///
/// Top-level items hang off an implicit root that is never traversed as an
/// item itself; their depth is 1.
#[derive(Debug, Clone, Default)]
pub struct PlayTree {
    nodes: HashMap<NodeId, PlayNode>,
    root_children: Vec<NodeId>,
    next_id: u64,
}

impl PlayTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    // ===== Node access =====

    /// Looks up a node by id. Tombstoned nodes are still returned; callers
    /// that care check [`PlayNode::deleted`].
    pub fn get(&self, id: NodeId) -> Option<&PlayNode> {
        self.nodes.get(&id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut PlayNode> {
        self.nodes.get_mut(&id)
    }

    /// Returns true if the id resolves to a live (non-tombstoned) node.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| !n.deleted)
    }

    /// Ordered ids of the top-level items.
    pub fn root_children(&self) -> &[NodeId] {
        &self.root_children
    }

    /// Total number of stored nodes, tombstones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if no nodes are stored.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Distance from the root; top-level items are at depth 1.
    ///
    /// Returns 0 for unknown ids.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = Some(id);
        while let Some(c) = cur {
            match self.get(c) {
                Some(node) => {
                    depth += 1;
                    cur = node.parent;
                }
                None => return 0,
            }
        }
        depth
    }

    /// Parent id, if the node has a non-root parent.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Number of children, tombstones included.
    pub fn child_count(&self, id: NodeId) -> usize {
        self.get(id).map_or(0, |n| n.children.len())
    }

    /// True if the node has no children at all (tombstoned or live).
    ///
    /// A node whose children are all tombstoned is still not a leaf until
    /// compaction.
    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.child_count(id) == 0
    }

    /// First live child, if any.
    pub fn first_live_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?
            .children
            .iter()
            .copied()
            .find(|&c| self.is_live(c))
    }

    /// True if the node has at least one live child.
    pub fn has_live_children(&self, id: NodeId) -> bool {
        self.first_live_child(id).is_some()
    }

    // ===== Flag mutations =====

    /// Sets the selected flag. Unknown ids are ignored.
    pub fn set_selected(&mut self, id: NodeId, selected: bool) {
        if let Some(node) = self.get_mut(id) {
            node.selected = selected;
        }
    }

    /// Inverts the selected flag. Unknown ids are ignored.
    pub fn toggle_selected(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.selected = !node.selected;
        }
    }

    /// Sets the expanded flag. Unknown ids are ignored.
    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if let Some(node) = self.get_mut(id) {
            node.expanded = expanded;
        }
    }

    /// Inverts the expanded flag. Unknown ids are ignored.
    pub fn toggle_expanded(&mut self, id: NodeId) {
        if let Some(node) = self.get_mut(id) {
            node.expanded = !node.expanded;
        }
    }

    /// Expands every ancestor of `id` so the node can appear in the
    /// hierarchical visible sequence. The node itself is left as-is.
    pub fn ensure_expanded(&mut self, id: NodeId) {
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            cur = self.parent(p);
            self.set_expanded(p, true);
        }
    }

    /// Marks `id` as the currently playing item, clearing the flag on every
    /// other node.
    pub fn set_playing(&mut self, id: NodeId) {
        for node in self.nodes.values_mut() {
            node.playing = false;
        }
        if let Some(node) = self.get_mut(id) {
            node.playing = true;
        }
    }

    /// Id of the currently playing live node, if any.
    pub fn playing_item(&self) -> Option<NodeId> {
        self.nodes
            .iter()
            .find(|(_, n)| n.playing && !n.deleted)
            .map(|(&id, _)| id)
    }

    /// Ids of all selected live nodes, in no particular order.
    pub fn selected_ids(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|(_, n)| n.selected && !n.deleted)
            .map(|(&id, _)| id)
            .collect()
    }

    /// Clears the selected flag on every node.
    pub fn clear_selection(&mut self) {
        for node in self.nodes.values_mut() {
            node.selected = false;
        }
    }

    // ===== Structural mutations =====

    /// Appends a new collapsed, unselected node under `parent` (or at the
    /// top level for `None`) and returns its id.
    ///
    /// Unknown parents fall back to the top level rather than erroring, so
    /// a stale parent id cannot lose the item.
    pub fn add_node(&mut self, parent: Option<NodeId>, label: impl Into<String>) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let parent = parent.filter(|p| self.nodes.contains_key(p));
        self.nodes.insert(
            id,
            PlayNode {
                label: label.into(),
                selected: false,
                expanded: false,
                deleted: false,
                playing: false,
                parent,
                children: Vec::new(),
            },
        );
        match parent {
            Some(p) => {
                if let Some(node) = self.get_mut(p) {
                    node.children.push(id);
                }
            }
            None => self.root_children.push(id),
        }
        id
    }

    /// Tombstones every selected node together with its whole subtree.
    ///
    /// Storage is untouched until [`compact`](Self::compact); traversal
    /// skips tombstones immediately.
    ///
    /// # Returns
    /// Ids of the nodes whose subtrees were tombstoned (roots of deletion).
    pub fn delete_selected(&mut self) -> Vec<NodeId> {
        let roots: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.selected && !n.deleted)
            .map(|(&id, _)| id)
            .collect();
        for &id in &roots {
            self.tombstone_subtree(id);
        }
        roots
    }

    fn tombstone_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(cur) = stack.pop() {
            if let Some(node) = self.get_mut(cur) {
                node.deleted = true;
                node.selected = false;
                stack.extend(node.children.iter().copied());
            }
        }
    }

    /// Physically removes all tombstoned nodes from storage and from their
    /// parents' child lists.
    pub fn compact(&mut self) {
        let dead: Vec<NodeId> = self
            .nodes
            .iter()
            .filter(|(_, n)| n.deleted)
            .map(|(&id, _)| id)
            .collect();
        for id in &dead {
            self.nodes.remove(id);
        }
        let nodes = &self.nodes;
        self.root_children.retain(|c| nodes.contains_key(c));
        for node in self.nodes.values_mut() {
            node.children.retain(|c| !dead.contains(c));
        }
    }
}
