//! The playlist view widget.
//!
//! `PlaylistView` ties the pieces together: it owns the tree, the viewport
//! and selection state, the flatten cache, the skin and icon bitmaps, and
//! the offscreen image. Every entry point runs to completion, re-renders
//! when appearance changed, and reports whether the host needs to repaint.
//!
//! The observer machinery of a reactive-variable toolkit is replaced by
//! explicit calls: the tree owner applies a mutation and hands the widget a
//! [`TreeEvent`]; the scroll-position owner calls
//! [`set_scroll_fraction`](PlaylistView::set_scroll_fraction); the widget
//! republishes fractions it derived itself through its own state, tagged
//! [`ScrollOrigin::Viewport`] so no feedback loop can form.

use crate::cache::TreeCache;
use crate::domain::visibility::{self, TraversalMode, VisibleRow};
use crate::rendering::surface::{Bitmap, ScaledBackground};
use crate::rendering::tree_renderer::{
    self, DEFAULT_ICONS, IconSet, RenderParams, item_height, item_image_width,
};
use crate::state::{EnsureVisible, ScrollOrigin, SelectionState, ViewportState};
use crate::theme::{SkinColors, SkinManager};
use crate::traits::{FontEngine, WidgetSize};
use crate::tree::{NodeId, PlayTree, TreeEvent};

/// Playlist tree view rendering into an offscreen bitmap.
pub struct PlaylistView {
    pub(crate) tree: PlayTree,
    pub(crate) mode: TraversalMode,
    pub(crate) viewport: ViewportState,
    pub(crate) selection: SelectionState,
    pub(crate) cache: TreeCache,
    pub(crate) colors: SkinColors,
    pub(crate) background: Option<Bitmap>,
    pub(crate) icons: IconSet,
    pub(crate) font: Box<dyn FontEngine>,
    pub(crate) size: Option<WidgetSize>,
    pub(crate) bg_cache: ScaledBackground,
    image: Option<Bitmap>,
}

impl PlaylistView {
    /// Creates a widget over an empty tree with the default skin and icons.
    ///
    /// The traversal mode is fixed here for the widget's lifetime.
    pub fn new(mode: TraversalMode, font: Box<dyn FontEngine>) -> Self {
        let mut view = Self {
            tree: PlayTree::new(),
            mode,
            viewport: ViewportState::new(),
            selection: SelectionState::new(),
            cache: TreeCache::new(),
            colors: SkinManager::new().current_skin().colors.clone(),
            background: None,
            icons: DEFAULT_ICONS.clone(),
            font,
            size: None,
            bg_cache: ScaledBackground::new(),
            image: None,
        };
        view.sync_first_pos();
        view
    }

    // ===== Configuration =====

    /// Replaces the skin palette.
    pub fn set_colors(&mut self, colors: SkinColors) {
        self.colors = colors;
        self.render();
    }

    /// Sets or clears the skin background bitmap.
    pub fn set_background(&mut self, background: Option<Bitmap>) {
        self.background = background;
        self.bg_cache.invalidate();
        self.render();
    }

    /// Replaces the icon set (affects row metrics).
    pub fn set_icons(&mut self, icons: IconSet) {
        self.icons = icons;
        self.on_resize();
    }

    // ===== Geometry =====

    /// Assigns or clears the widget's pixel bounding box.
    pub fn set_geometry(&mut self, size: Option<WidgetSize>) {
        self.size = size;
        self.on_resize();
    }

    /// Geometry change: the row capacity may differ, so the window is
    /// re-derived from the stored fraction and the image rebuilt.
    fn on_resize(&mut self) {
        let rows = self.rows_snapshot();
        let max_items = self.max_items();
        self.viewport.reapply_fraction(&rows, max_items);
        self.render();
    }

    /// Point-in-widget hit test over local coordinates.
    pub fn mouse_over(&self, x: i32, y: i32) -> bool {
        self.size.is_some_and(|s| s.contains(x, y))
    }

    /// Rows that fit the viewport, or `None` before layout.
    pub fn max_items(&self) -> Option<usize> {
        let size = self.size?;
        let row_h = self.item_height();
        if row_h == 0 {
            return None;
        }
        Some((size.height / row_h) as usize)
    }

    /// Nominal row height in pixels.
    pub fn item_height(&self) -> u32 {
        item_height(
            self.font.height(),
            &self.icons,
            self.mode == TraversalMode::Flat,
        )
    }

    /// Icon column width (indentation unit) in pixels.
    pub fn item_image_width(&self) -> u32 {
        item_image_width(&self.icons, self.mode == TraversalMode::Flat)
    }

    // ===== Tree access =====

    /// Read access to the underlying tree.
    pub fn tree(&self) -> &PlayTree {
        &self.tree
    }

    /// Mutable access for the tree owner. Structural changes applied here
    /// must be followed by [`on_tree_event`](Self::on_tree_event).
    pub fn tree_mut(&mut self) -> &mut PlayTree {
        &mut self.tree
    }

    /// Appends an item and runs the append reconciliation in one step.
    pub fn append_item(&mut self, parent: Option<NodeId>, label: impl Into<String>) -> NodeId {
        let id = self.tree.add_node(parent, label);
        self.on_tree_event(TreeEvent::Appended { id });
        id
    }

    // ===== Visible sequence =====

    pub(crate) fn rows_snapshot(&mut self) -> Vec<VisibleRow> {
        self.cache.rows(&self.tree, self.mode).to_vec()
    }

    /// Number of items in the visible sequence.
    pub fn visible_count(&mut self) -> usize {
        self.cache.rows(&self.tree, self.mode).len()
    }

    /// The first rendered row, or `None` when the sequence is empty.
    pub fn first_pos(&self) -> Option<NodeId> {
        self.viewport.first_pos()
    }

    /// 1-based rank of an item in the visible sequence.
    pub fn rank_of(&mut self, id: NodeId) -> Option<usize> {
        let rows = self.rows_snapshot();
        crate::domain::tree_operations::rank_of(&rows, id)
    }

    /// Item at `offset` rows below the window top; `None` past the end.
    pub fn item_at_row(&mut self, offset: usize) -> Option<NodeId> {
        let rows = self.rows_snapshot();
        self.viewport.item_at_row(&rows, offset)
    }

    /// True iff the item's rank lies inside the rendered window.
    pub fn is_item_visible(&mut self, id: NodeId) -> bool {
        let rows = self.rows_snapshot();
        let max_items = self.max_items();
        self.viewport.is_item_visible(&rows, max_items, id)
    }

    /// Current selection anchor, if it is still live.
    pub fn anchor(&self) -> Option<NodeId> {
        self.selection.anchor(&self.tree)
    }

    fn sync_first_pos(&mut self) {
        let rows = self.rows_snapshot();
        self.viewport.adopt_start_if_unset(&rows);
    }

    // ===== Scroll synchronization =====

    /// The stored scroll fraction (1.0 = top).
    pub fn scroll_fraction(&self) -> f64 {
        self.viewport.fraction()
    }

    /// External scroll-position write (scrollbar, host application).
    ///
    /// # Returns
    /// `true` when the window moved and the image was rebuilt.
    pub fn set_scroll_fraction(&mut self, fraction: f64) -> bool {
        let rows = self.rows_snapshot();
        let max_items = self.max_items();
        let moved = self
            .viewport
            .set_fraction(&rows, max_items, fraction, ScrollOrigin::External);
        if moved {
            self.render();
        }
        moved
    }

    /// Scrolls the window so `id` is visible, expanding its ancestors.
    ///
    /// # Returns
    /// `true` when the window moved.
    pub fn ensure_visible(&mut self, id: NodeId) -> bool {
        self.tree.ensure_expanded(id);
        self.cache.invalidate();
        let rows = self.rows_snapshot();
        let max_items = self.max_items();
        match self.viewport.ensure_visible(&rows, max_items, id) {
            EnsureVisible::Scrolled(fraction) => {
                self.viewport
                    .set_fraction(&rows, max_items, fraction, ScrollOrigin::External);
                true
            }
            EnsureVisible::AlreadyVisible => false,
        }
    }

    /// Scrolls to the currently playing item, if there is one.
    pub fn auto_scroll(&mut self) -> bool {
        match self.tree.playing_item() {
            Some(id) => self.ensure_visible(id),
            None => false,
        }
    }

    /// Window -> fraction fix-up after the widget changed the sequence
    /// shape itself (expand/collapse). Republishes the stored fraction with
    /// viewport origin, so no window re-derivation happens.
    pub(crate) fn refraction_after_structure(&mut self) {
        self.cache.invalidate();
        let rows = self.rows_snapshot();
        self.viewport.refraction_after_structure(&self.tree, &rows);
    }

    // ===== Structural change notifications =====

    /// Applies a structural-change notification from the tree owner.
    ///
    /// # Returns
    /// `true` when the image was rebuilt (the host should repaint).
    pub fn on_tree_event(&mut self, event: TreeEvent) -> bool {
        match event {
            TreeEvent::ItemUpdated { id, active } => {
                let mut repaint = false;
                if active {
                    repaint |= self.auto_scroll();
                }
                if self.is_item_visible(id) {
                    repaint = true;
                }
                if repaint {
                    self.render();
                }
                repaint
            }
            TreeEvent::Reset => {
                self.cache.invalidate();
                let rows = self.rows_snapshot();
                self.viewport.reconcile_after_reset(&rows);
                self.selection.clear_anchor();
                self.render();
                true
            }
            TreeEvent::Appended { id } => {
                self.cache.invalidate();
                let rows = self.rows_snapshot();
                let mut repaint = false;

                if self.mode == TraversalMode::Flat {
                    // A window top that shows nothing beneath it in the
                    // flat sequence slides forward to the next leaf, so a
                    // lazily growing list never appears to scroll backward.
                    match self.viewport.first_pos() {
                        None => repaint = self.viewport.adopt_start_if_unset(&rows),
                        Some(fp) if !self.tree.is_leaf(fp) => {
                            let next = visibility::next_leaf_after(&self.tree, fp);
                            if next.is_some() {
                                self.viewport.set_first_pos(next);
                                repaint = true;
                            }
                        }
                        Some(_) => {}
                    }
                } else {
                    repaint = self.viewport.adopt_start_if_unset(&rows);
                }

                let max_items = self.max_items();
                if self.viewport.is_item_visible(&rows, max_items, id) {
                    repaint = true;
                }
                if repaint {
                    self.render();
                }
                repaint
            }
            TreeEvent::Deleted { id } => {
                // The cache still holds the pre-deletion sequence; the
                // reconciliation walk needs it.
                let stale_rows = self.rows_snapshot();
                let max_items = self.max_items();
                let was_visible = self.viewport.is_item_visible(&stale_rows, max_items, id);
                let moved = self.viewport.reconcile_after_delete(&stale_rows, &self.tree);
                self.cache.invalidate();
                if moved || was_visible {
                    self.render();
                    return true;
                }
                false
            }
        }
    }

    // ===== Rendering =====

    /// Rebuilds the offscreen image from current state. Without assigned
    /// geometry the image is dropped and rendering skipped.
    pub fn render(&mut self) {
        let Some(size) = self.size else {
            self.image = None;
            return;
        };
        let rows = self.rows_snapshot();
        let first_index = self.viewport.first_index(&rows);
        let params = RenderParams {
            size,
            rows: &rows,
            first_index,
            colors: &self.colors,
            icons: &self.icons,
            background: self.background.as_ref(),
            flat: self.mode == TraversalMode::Flat,
        };
        self.image = Some(tree_renderer::make_image(
            &self.tree,
            &params,
            self.font.as_mut(),
            &mut self.bg_cache,
        ));
    }

    /// The current offscreen image, if geometry is assigned.
    pub fn image(&self) -> Option<&Bitmap> {
        self.image.as_ref()
    }
}
