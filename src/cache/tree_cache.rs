//! Caching logic for visible-sequence computations.

use crate::domain::visibility::{self, TraversalMode, VisibleRow};
use crate::tree::PlayTree;

/// Cache for the flattened visible sequence.
///
/// Flattening is linear in the tree size, and every rank, neighbor and
/// scroll computation needs the same vector, so the widget memoizes one
/// flatten per structural generation. The cache is invalidated whenever
/// expansion state or tree structure changes.
#[derive(Debug, Default)]
pub struct TreeCache {
    /// Memoized visible rows, in sequence order.
    rows: Option<Vec<VisibleRow>>,
    /// Generation counter, bumped on every invalidation.
    pub generation: u64,
}

impl TreeCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the visible rows, flattening on a cache miss.
    pub fn rows<'a>(&'a mut self, tree: &PlayTree, mode: TraversalMode) -> &'a [VisibleRow] {
        if self.rows.is_none() {
            self.rows = Some(visibility::flatten(tree, mode));
        }
        self.rows.as_deref().unwrap_or(&[])
    }

    /// Invalidates all cached data.
    ///
    /// Call whenever:
    /// - A node is expanded or collapsed
    /// - Items are appended, tombstoned or compacted
    /// - The whole tree is reset
    pub fn invalidate(&mut self) {
        self.rows = None;
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_memoized_until_invalidated() {
        let mut tree = PlayTree::new();
        tree.add_node(None, "a");
        let mut cache = TreeCache::new();

        assert_eq!(cache.rows(&tree, TraversalMode::Hierarchical).len(), 1);

        // A mutation without invalidation is not observed...
        tree.add_node(None, "b");
        assert_eq!(cache.rows(&tree, TraversalMode::Hierarchical).len(), 1);

        // ...until the cache is told.
        cache.invalidate();
        assert_eq!(cache.rows(&tree, TraversalMode::Hierarchical).len(), 2);
        assert_eq!(cache.generation, 1);
    }
}
