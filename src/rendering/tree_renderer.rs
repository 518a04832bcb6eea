//! Playlist row rendering.
//!
//! Builds the widget's offscreen image: background bands (skin bitmap or
//! alternating colors), selection highlight, expand/collapse/leaf icons and
//! label text, walking the visible sequence from the window top.
//!
//! The pass is a pure function of widget state; any state change triggers a
//! full rebuild of the surface. A text backend failure aborts the pass and
//! leaves the partial frame in place (corrected on the next repaint).

use crate::domain::visibility::VisibleRow;
use crate::rendering::surface::{Bitmap, ScaledBackground};
use crate::theme::SkinColors;
use crate::traits::{FontEngine, WidgetSize};
use crate::tree::PlayTree;
use egui::Color32;
use once_cell::sync::Lazy;

/// Pixels inserted between two rows.
pub const LINE_INTERVAL: u32 = 1;

/// Icon bitmaps for the three row kinds.
#[derive(Debug, Clone, Default)]
pub struct IconSet {
    /// Expanded node.
    pub open: Option<Bitmap>,
    /// Collapsed node.
    pub closed: Option<Bitmap>,
    /// Leaf item.
    pub leaf: Option<Bitmap>,
}

impl IconSet {
    /// No icons at all; rows are text-only.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Built-in 9x9 icons: right/down triangles and a square marker.
pub static DEFAULT_ICONS: Lazy<IconSet> = Lazy::new(|| {
    let gray = Color32::from_rgb(110, 110, 110);

    let mut closed = Bitmap::new(9, 9);
    for i in 0..4i64 {
        closed.fill_rect(2 + i, 1 + i, 1, (7 - 2 * i) as u32, gray);
    }

    let mut open = Bitmap::new(9, 9);
    for i in 0..4i64 {
        open.fill_rect(1 + i, 2 + i, (7 - 2 * i) as u32, 1, gray);
    }

    let mut leaf = Bitmap::new(9, 9);
    leaf.fill_rect(2, 2, 5, 5, gray);

    IconSet {
        open: Some(open),
        closed: Some(closed),
        leaf: Some(leaf),
    }
});

/// Everything the render pass reads, borrowed from the widget.
pub struct RenderParams<'a> {
    pub size: WidgetSize,
    pub rows: &'a [VisibleRow],
    /// 0-based index of the window top within `rows`.
    pub first_index: usize,
    pub colors: &'a SkinColors,
    pub icons: &'a IconSet,
    /// Optional skin background, scaled to fit through `bg_cache`.
    pub background: Option<&'a Bitmap>,
    /// Hierarchical mode draws open/closed node icons; flat mode only ever
    /// meets leaves.
    pub flat: bool,
}

/// Row height: the tallest of font line and configured icons, plus the line
/// interval. Node icons participate only in hierarchical mode.
pub fn item_height(font_height: u32, icons: &IconSet, flat: bool) -> u32 {
    let mut h = font_height;
    if !flat {
        if let Some(closed) = &icons.closed {
            h = h.max(closed.height());
        }
        if let Some(open) = &icons.open {
            h = h.max(open.height());
        }
    }
    if let Some(leaf) = &icons.leaf {
        h = h.max(leaf.height());
    }
    h + LINE_INTERVAL
}

/// Icon column width: the widest configured icon over a 5px floor, plus
/// fixed padding. Indentation advances by this per depth level.
pub fn item_image_width(icons: &IconSet, flat: bool) -> u32 {
    let mut w = 5;
    if !flat {
        if let Some(closed) = &icons.closed {
            w = w.max(closed.width());
        }
        if let Some(open) = &icons.open {
            w = w.max(open.width());
        }
    }
    if let Some(leaf) = &icons.leaf {
        w = w.max(leaf.width());
    }
    w + 2
}

fn is_selected(tree: &PlayTree, row: &VisibleRow) -> bool {
    tree.get(row.id).is_some_and(|n| n.selected)
}

/// Builds the offscreen image.
///
/// Returns the freshly painted surface; on a text backend failure the
/// surface holds whatever rows were completed before the abort.
pub fn make_image(
    tree: &PlayTree,
    params: &RenderParams<'_>,
    font: &mut dyn FontEngine,
    bg_cache: &mut ScaledBackground,
) -> Bitmap {
    let width = params.size.width;
    let height = params.size.height;
    let mut image = Bitmap::new(width, height);
    let row_h = item_height(font.height(), params.icons, params.flat);
    if row_h == 0 || width == 0 || height == 0 {
        return image;
    }

    let visible = &params.rows[params.first_index.min(params.rows.len())..];

    // Background pass.
    if let Some(bg) = params.background {
        let scaled = bg_cache.get(bg, width, height);
        image.blit(scaled, 0, 0, 0, 0, width, height, false);

        let mut y = 0i64;
        for row in visible {
            if y >= height as i64 {
                break;
            }
            if is_selected(tree, row) {
                let band = row_h.min((height as i64 - y) as u32);
                image.fill_rect(0, y, width, band, params.colors.selection);
            }
            y += row_h as i64;
        }
    } else {
        // Alternating bands, reset to the first color at the top.
        let mut band_color = params.colors.background1;
        let mut row_iter = visible.iter();
        let mut y = 0i64;
        while y < height as i64 {
            let band = row_h.min((height as i64 - y) as u32);
            let color = match row_iter.next() {
                Some(row) if is_selected(tree, row) => params.colors.selection,
                _ => band_color,
            };
            image.fill_rect(0, y, width, band, color);
            band_color = if band_color == params.colors.background1 {
                params.colors.background2
            } else {
                params.colors.background1
            };
            y += row_h as i64;
        }
    }

    // Foreground pass.
    let icon_col = item_image_width(params.icons, params.flat) as i64;
    let mut y = 0i64;
    for row in visible {
        if y >= height as i64 {
            break;
        }
        let Some(node) = tree.get(row.id) else {
            continue;
        };
        let color = if node.playing {
            params.colors.playing
        } else {
            params.colors.foreground
        };

        let text_width = (width as i64 - icon_col * row.depth as i64).max(0) as u32;
        let Some(text) = font.render(&node.label, color, text_width) else {
            // Backend failure: keep the partial frame.
            return image;
        };

        let icon = if !row.is_leaf {
            if node.expanded {
                params.icons.open.as_ref()
            } else {
                params.icons.closed.as_ref()
            }
        } else {
            params.icons.leaf.as_ref()
        };
        if let Some(icon) = icon {
            // Center the icon on the nominal row.
            let icon_y = y + (row_h as i64 - icon.height() as i64 + 1) / 2;
            if icon_y >= height as i64 {
                break;
            }
            image.blit(
                icon,
                0,
                0,
                icon_col * (row.depth as i64 - 1),
                icon_y,
                icon.width(),
                icon.height(),
                true,
            );
        }

        // Short labels sit at the bottom of their row slot; wrapped labels
        // may take more than one nominal row.
        let text_y = y + (row_h as i64 - text.height() as i64).max(0);
        image.blit(
            &text,
            0,
            0,
            icon_col * row.depth as i64,
            text_y,
            text.width(),
            text.height(),
            true,
        );
        y += (row_h).max(text.height()) as i64;
    }

    image
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::visibility::{TraversalMode, flatten};
    use crate::rendering::font::BlockFont;

    fn params<'a>(
        rows: &'a [VisibleRow],
        colors: &'a SkinColors,
        icons: &'a IconSet,
    ) -> RenderParams<'a> {
        RenderParams {
            size: WidgetSize::new(60, 40),
            rows,
            first_index: 0,
            colors,
            icons,
            background: None,
            flat: false,
        }
    }

    fn test_colors() -> SkinColors {
        SkinColors {
            foreground: Color32::WHITE,
            playing: Color32::from_rgb(255, 0, 0),
            background1: Color32::from_rgb(10, 10, 10),
            background2: Color32::from_rgb(20, 20, 20),
            selection: Color32::from_rgb(0, 0, 200),
        }
    }

    #[test]
    fn metrics_grow_with_icons_and_mode() {
        let mut icons = IconSet::empty();
        assert_eq!(item_height(10, &icons, false), 11);
        assert_eq!(item_image_width(&icons, false), 7);

        icons.open = Some(Bitmap::new(16, 14));
        assert_eq!(item_height(10, &icons, false), 15);
        assert_eq!(item_image_width(&icons, false), 18);
        // Flat mode ignores node icons.
        assert_eq!(item_height(10, &icons, true), 11);
        assert_eq!(item_image_width(&icons, true), 7);
    }

    #[test]
    fn alternating_bands_and_selection_highlight() {
        let mut tree = PlayTree::new();
        let a = tree.add_node(None, "a");
        tree.add_node(None, "b");
        tree.set_selected(a, true);
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        let colors = test_colors();
        let icons = IconSet::empty();
        let p = params(&rows, &colors, &icons);
        let mut font = BlockFont::new(9, 6);
        let mut bg = ScaledBackground::new();

        let image = make_image(&tree, &p, &mut font, &mut bg);
        // Row 0 selected, row 1 is band two (row height 10).
        assert_eq!(image.get(59, 0), Some(colors.selection));
        assert_eq!(image.get(59, 10), Some(colors.background2));
        assert_eq!(image.get(59, 20), Some(colors.background1));
    }

    #[test]
    fn playing_row_uses_play_color_for_text() {
        let mut tree = PlayTree::new();
        let a = tree.add_node(None, "aaaa");
        tree.set_playing(a);
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        let colors = test_colors();
        let icons = IconSet::empty();
        let p = params(&rows, &colors, &icons);
        let mut font = BlockFont::new(9, 6);
        let mut bg = ScaledBackground::new();

        let image = make_image(&tree, &p, &mut font, &mut bg);
        // Text starts at x = icon_col * depth = 7, bottom-aligned in the
        // 10px row slot -> y = 1.
        assert_eq!(image.get(7, 1), Some(colors.playing));
    }

    #[test]
    fn font_failure_aborts_but_keeps_background() {
        let mut tree = PlayTree::new();
        tree.add_node(None, "a");
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        let colors = test_colors();
        let icons = IconSet::empty();
        let p = params(&rows, &colors, &icons);
        let mut font = BlockFont::failing();
        let mut bg = ScaledBackground::new();

        let image = make_image(&tree, &p, &mut font, &mut bg);
        assert_eq!(image.get(0, 0), Some(colors.background1));
    }

    #[test]
    fn skin_background_is_scaled_and_blitted() {
        let tree = PlayTree::new();
        let rows: Vec<VisibleRow> = Vec::new();
        let colors = test_colors();
        let icons = IconSet::empty();
        let skin_bg = Bitmap::filled(4, 4, Color32::from_rgb(1, 2, 3));
        let mut p = params(&rows, &colors, &icons);
        p.background = Some(&skin_bg);
        let mut font = BlockFont::new(9, 6);
        let mut bg = ScaledBackground::new();

        let image = make_image(&tree, &p, &mut font, &mut bg);
        assert_eq!(image.get(30, 30), Some(Color32::from_rgb(1, 2, 3)));
    }

    #[test]
    fn icons_are_indented_by_depth() {
        let mut tree = PlayTree::new();
        let album = tree.add_node(None, "album");
        tree.add_node(Some(album), "track");
        tree.set_expanded(album, true);
        let rows = flatten(&tree, TraversalMode::Hierarchical);
        let colors = test_colors();
        let icons = IconSet {
            open: Some(Bitmap::filled(5, 5, Color32::YELLOW)),
            closed: None,
            leaf: Some(Bitmap::filled(5, 5, Color32::GREEN)),
        };
        let p = params(&rows, &colors, &icons);
        let mut font = BlockFont::new(9, 6);
        let mut bg = ScaledBackground::new();

        let image = make_image(&tree, &p, &mut font, &mut bg);
        // Depth-1 open icon in column 0; depth-2 leaf icon one column in.
        let icon_col = item_image_width(&icons, false);
        assert_eq!(image.get(2, 4), Some(Color32::YELLOW));
        assert_eq!(image.get(icon_col + 2, 10 + 4), Some(Color32::GREEN));
    }
}
