//! Input handling for the playlist view.
//!
//! This module classifies pre-decoded input events and dispatches them to
//! the selection engine and viewport model:
//! - Keyboard selection movement, expand/collapse, delete, paging
//! - Mouse selection (plain / ctrl / shift / ctrl-shift), expander-column
//!   clicks, double-click activation
//! - Scroll-wheel position nudges
//!
//! Every handler returns an [`Interaction`] describing what the host has to
//! do: repaint, trigger an item action, or forward an unconsumed key.

use crate::domain::tree_operations::{step_backward_clamped, step_forward_clamped};
use crate::domain::viewport_operations::wheel_step;
use crate::domain::visibility::TraversalMode;
use crate::state::MoveDir;
use crate::tree::NodeId;
use crate::ui::playlist_view::PlaylistView;

/// Pre-classified key codes the widget understands. Anything else arrives
/// as `Other` and is forwarded to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Enter,
    Space,
    Delete,
    PageUp,
    PageDown,
    /// Raw key code the widget does not consume.
    Other(u32),
}

/// Modifier set attached to mouse button events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
}

/// Left-button event sub-classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down(Modifiers),
    DoubleClick,
}

/// A pre-classified input event in widget-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    Mouse { kind: MouseKind, x: i32, y: i32 },
    Scroll { up: bool },
}

/// What an input event amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Interaction {
    /// The image was rebuilt; the host should repaint.
    pub repaint: bool,
    /// The item whose action should run (Enter/Space/double-click, or
    /// descending into an expanded empty node).
    pub activated: Option<NodeId>,
    /// Key the widget did not consume, for the host's global key handling.
    pub forwarded: Option<Key>,
}

impl Interaction {
    fn repaint() -> Self {
        Self {
            repaint: true,
            ..Self::default()
        }
    }
}

impl PlaylistView {
    /// Routes one input event. See [`Interaction`] for the outcome.
    pub fn handle_event(&mut self, event: InputEvent) -> Interaction {
        match event {
            InputEvent::KeyDown(key) => self.handle_key(key),
            InputEvent::Mouse { kind, x, y } => self.handle_mouse(kind, x, y),
            InputEvent::Scroll { up } => self.handle_scroll(up),
        }
    }

    fn handle_key(&mut self, key: Key) -> Interaction {
        match key {
            Key::Delete => {
                let rows = self.rows_snapshot();
                let deleted = self.selection.delete_selected(&mut self.tree, &rows);
                if !deleted.is_empty() {
                    self.viewport.reconcile_after_delete(&rows, &self.tree);
                }
                self.cache.invalidate();
                self.render();
                Interaction::repaint()
            }
            Key::Up | Key::Down => {
                let rows = self.rows_snapshot();
                let dir = if key == Key::Up {
                    MoveDir::Up
                } else {
                    MoveDir::Down
                };
                let target = self.selection.move_anchor(&mut self.tree, &rows, dir);
                if let Some(target) = target {
                    self.ensure_visible(target);
                }
                self.render();
                Interaction::repaint()
            }
            Key::Right => self.key_right(),
            Key::Left => self.key_left(),
            Key::Enter | Key::Space => {
                let mut out = Interaction::repaint();
                out.activated = self.anchor();
                self.render();
                out
            }
            Key::PageDown => self.page(true),
            Key::PageUp => self.page(false),
            Key::Other(code) => Interaction {
                forwarded: Some(Key::Other(code)),
                ..Interaction::default()
            },
        }
    }

    /// Right: descend into an expanded node, activate an expanded empty
    /// one, or expand a collapsed one in place.
    fn key_right(&mut self) -> Interaction {
        let Some(anchor) = self.anchor() else {
            return Interaction::default();
        };
        let mut out = Interaction::repaint();
        let expanded = self.tree.get(anchor).is_some_and(|n| n.expanded);
        if expanded {
            if let Some(child) = self.tree.first_live_child(anchor) {
                self.tree.set_selected(anchor, false);
                self.tree.set_selected(child, true);
                self.selection.set_anchor(child);
            } else {
                out.activated = Some(anchor);
            }
        } else {
            self.tree.set_expanded(anchor, true);
            self.refraction_after_structure();
        }
        self.render();
        out
    }

    /// Left: collapse an expanded node, or climb to a non-root parent.
    fn key_left(&mut self) -> Interaction {
        let Some(anchor) = self.anchor() else {
            return Interaction::default();
        };
        let expanded = self.tree.get(anchor).is_some_and(|n| n.expanded);
        if expanded && self.tree.child_count(anchor) > 0 {
            self.tree.set_expanded(anchor, false);
            self.refraction_after_structure();
        } else if let Some(parent) = self.tree.parent(anchor) {
            self.tree.set_selected(anchor, false);
            self.tree.set_selected(parent, true);
            self.selection.set_anchor(parent);
        }
        self.render();
        Interaction::repaint()
    }

    /// Page movement: reposition the window roughly 1.5x (down) or 0.5x
    /// (up) of its capacity, stopping at the sequence boundary. Selection
    /// is untouched.
    fn page(&mut self, down: bool) -> Interaction {
        let Some(max_items) = self.max_items() else {
            return Interaction::default();
        };
        let rows = self.rows_snapshot();
        let Some(first) = self.first_pos().or_else(|| rows.first().map(|r| r.id)) else {
            return Interaction::default();
        };
        let target = if down {
            step_forward_clamped(&rows, first, max_items + max_items / 2)
        } else {
            step_backward_clamped(&rows, first, max_items.div_ceil(2))
        };
        match target {
            Some(target) if target != first => {
                self.ensure_visible(target);
                self.render();
                Interaction::repaint()
            }
            _ => Interaction::default(),
        }
    }

    fn handle_mouse(&mut self, kind: MouseKind, x: i32, y: i32) -> Interaction {
        let row_h = self.item_height();
        if row_h == 0 || y < 0 {
            return Interaction::default();
        }
        let offset = (y as u32 / row_h) as usize;
        let clicked = self.item_at_row(offset);

        match kind {
            MouseKind::DoubleClick => {
                let mut out = Interaction::repaint();
                out.activated = clicked;
                self.render();
                out
            }
            MouseKind::Down(mods) => {
                let rows = self.rows_snapshot();
                match (mods.ctrl, mods.shift) {
                    (true, true) | (false, true) => {
                        if let Some(clicked) = clicked {
                            self.selection
                                .select_range(&mut self.tree, &rows, clicked, mods.ctrl);
                        }
                    }
                    (true, false) => {
                        if let Some(clicked) = clicked {
                            self.selection.toggle(&mut self.tree, clicked);
                        }
                    }
                    (false, false) => {
                        if let Some(clicked) = clicked {
                            if self.expander_column_hit(clicked, x, &rows) {
                                self.tree.toggle_expanded(clicked);
                                self.refraction_after_structure();
                            } else {
                                self.selection.select_only(&mut self.tree, &rows, clicked);
                            }
                        }
                    }
                }
                self.render();
                Interaction::repaint()
            }
        }
    }

    /// True when a plain click landed in the indentation/icon column of an
    /// expandable node (hierarchical mode only).
    fn expander_column_hit(
        &self,
        clicked: NodeId,
        x: i32,
        rows: &[crate::domain::visibility::VisibleRow],
    ) -> bool {
        if self.mode == TraversalMode::Flat {
            return false;
        }
        if self.tree.is_leaf(clicked) {
            return false;
        }
        let Some(row) = rows.iter().find(|r| r.id == clicked) else {
            return false;
        };
        let icon_col = self.item_image_width() as i64;
        let x = x as i64;
        let depth = row.depth as i64;
        x > (depth - 1) * icon_col && x < depth * icon_col
    }

    fn handle_scroll(&mut self, up: bool) -> Interaction {
        let total = self.visible_count();
        let step = wheel_step(total);
        let fraction = self.scroll_fraction() + if up { step } else { -step };
        if self.set_scroll_fraction(fraction) {
            Interaction::repaint()
        } else {
            Interaction::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rendering::font::BlockFont;
    use crate::traits::WidgetSize;
    use crate::tree::TreeEvent;

    fn track_view(n: usize) -> (PlaylistView, Vec<NodeId>) {
        let mut view = PlaylistView::new(
            TraversalMode::Hierarchical,
            Box::new(BlockFont::new(9, 6)),
        );
        let mut ids = Vec::new();
        for i in 0..n {
            ids.push(view.append_item(None, format!("t{i}")));
        }
        // Default icons + 9px block font give 10px rows: 4 fit in 40px.
        view.set_geometry(Some(WidgetSize::new(120, 40)));
        (view, ids)
    }

    fn key(view: &mut PlaylistView, key: Key) -> Interaction {
        view.handle_event(InputEvent::KeyDown(key))
    }

    #[test]
    fn down_selects_first_then_walks() {
        let (mut view, ids) = track_view(3);
        key(&mut view, Key::Down);
        assert_eq!(view.anchor(), Some(ids[0]));
        key(&mut view, Key::Down);
        assert_eq!(view.anchor(), Some(ids[1]));
        key(&mut view, Key::Up);
        assert_eq!(view.anchor(), Some(ids[0]));
        // Pinned at the boundary.
        key(&mut view, Key::Up);
        assert_eq!(view.anchor(), Some(ids[0]));
    }

    #[test]
    fn enter_activates_the_anchor() {
        let (mut view, ids) = track_view(2);
        key(&mut view, Key::Down);
        let out = key(&mut view, Key::Enter);
        assert_eq!(out.activated, Some(ids[0]));
    }

    #[test]
    fn unknown_keys_are_forwarded() {
        let (mut view, _) = track_view(1);
        let out = key(&mut view, Key::Other(0x41));
        assert_eq!(out.forwarded, Some(Key::Other(0x41)));
        assert!(!out.repaint);
    }

    #[test]
    fn right_expands_then_descends() {
        let mut view = PlaylistView::new(
            TraversalMode::Hierarchical,
            Box::new(BlockFont::new(9, 6)),
        );
        let album = view.append_item(None, "album");
        let track = view.append_item(Some(album), "track");
        view.set_geometry(Some(WidgetSize::new(120, 60)));

        key(&mut view, Key::Down);
        assert_eq!(view.anchor(), Some(album));

        // First Right expands in place.
        key(&mut view, Key::Right);
        assert!(view.tree().get(album).unwrap().expanded);
        assert_eq!(view.anchor(), Some(album));

        // Second Right descends to the first child.
        key(&mut view, Key::Right);
        assert_eq!(view.anchor(), Some(track));
        assert!(view.tree().get(track).unwrap().selected);
        assert!(!view.tree().get(album).unwrap().selected);

        // Left climbs back up to the parent.
        key(&mut view, Key::Left);
        assert_eq!(view.anchor(), Some(album));

        // Left again collapses.
        key(&mut view, Key::Left);
        assert!(!view.tree().get(album).unwrap().expanded);
    }

    #[test]
    fn delete_key_removes_selection_and_reanchors() {
        let (mut view, ids) = track_view(3);
        view.tree_mut().set_selected(ids[1], true);
        view.selection.set_anchor(ids[1]);

        key(&mut view, Key::Delete);
        assert!(!view.tree().is_live(ids[1]));
        assert_eq!(view.anchor(), Some(ids[0]));
    }

    #[test]
    fn plain_click_selects_row_under_cursor() {
        let (mut view, ids) = track_view(3);
        let row_h = view.item_height() as i32;
        let out = view.handle_event(InputEvent::Mouse {
            kind: MouseKind::Down(Modifiers::default()),
            x: 100,
            y: row_h + 1,
        });
        assert!(out.repaint);
        assert_eq!(view.anchor(), Some(ids[1]));
        assert!(view.tree().get(ids[1]).unwrap().selected);
    }

    #[test]
    fn expander_column_click_toggles_instead_of_selecting() {
        let mut view = PlaylistView::new(
            TraversalMode::Hierarchical,
            Box::new(BlockFont::new(9, 6)),
        );
        let album = view.append_item(None, "album");
        view.append_item(Some(album), "track");
        view.set_geometry(Some(WidgetSize::new(120, 60)));

        // Depth 1: the expander column is (0, icon_col) exclusive.
        let x = (view.item_image_width() / 2) as i32;
        view.handle_event(InputEvent::Mouse {
            kind: MouseKind::Down(Modifiers::default()),
            x,
            y: 1,
        });
        assert!(view.tree().get(album).unwrap().expanded);
        assert!(!view.tree().get(album).unwrap().selected);
    }

    #[test]
    fn double_click_activates() {
        let (mut view, ids) = track_view(2);
        let out = view.handle_event(InputEvent::Mouse {
            kind: MouseKind::DoubleClick,
            x: 50,
            y: 1,
        });
        assert_eq!(out.activated, Some(ids[0]));
    }

    #[test]
    fn click_below_the_last_item_is_harmless() {
        let (mut view, _) = track_view(1);
        let out = view.handle_event(InputEvent::Mouse {
            kind: MouseKind::Down(Modifiers::default()),
            x: 50,
            y: 35,
        });
        assert!(out.repaint);
        assert_eq!(out.activated, None);
        assert_eq!(view.anchor(), None);
    }

    #[test]
    fn wheel_moves_the_fraction_by_two_rows() {
        let (mut view, _) = track_view(10);
        let before = view.scroll_fraction();
        let out = view.handle_event(InputEvent::Scroll { up: false });
        assert!(out.repaint);
        assert!((before - view.scroll_fraction() - 0.2).abs() < 1e-9);
    }

    #[test]
    fn ctrl_shift_click_keeps_prior_selection() {
        let (mut view, ids) = track_view(5);
        view.tree_mut().set_selected(ids[4], true);
        view.selection.set_anchor(ids[0]);
        let row_h = view.item_height() as i32;

        view.handle_event(InputEvent::Mouse {
            kind: MouseKind::Down(Modifiers {
                ctrl: true,
                shift: true,
            }),
            x: 100,
            y: row_h * 2 + 1,
        });
        let selected: Vec<bool> = ids
            .iter()
            .map(|&id| view.tree().get(id).unwrap().selected)
            .collect();
        assert_eq!(selected, vec![true, true, true, false, true]);
    }

    #[test]
    fn delete_event_reconciles_first_pos() {
        let (mut view, ids) = track_view(10);
        // Scroll to the bottom: with 4 of 10 rows visible the window top
        // lands at rank 7.
        view.set_scroll_fraction(0.0);
        let fp = view.first_pos().unwrap();

        view.tree_mut().set_selected(fp, true);
        view.tree_mut().delete_selected();
        let repainted = view.on_tree_event(TreeEvent::Deleted { id: fp });
        assert!(repainted);
        let new_fp = view.first_pos().unwrap();
        assert!(view.tree().is_live(new_fp));
        assert_ne!(new_fp, fp);
        let _ = ids;
    }
}
