//! Collaborator contracts consumed by the playlist view.
//!
//! The widget core treats text rasterization as an external service: labels
//! go in, pixel bitmaps come out, and a backend that cannot produce one for
//! a row makes the render pass stop early (the partial frame stands until
//! the next repaint). Implementations live in `rendering::font`.

use crate::rendering::surface::Bitmap;
use egui::Color32;

/// Text-to-bitmap backend.
///
/// `render` may fail (missing glyph data, zero-width constraint); the
/// contract is `None`, never a panic.
pub trait FontEngine {
    /// Nominal line height in pixels, used for row sizing.
    fn height(&self) -> u32;

    /// Rasterizes `text` in `color`, wrapping within `max_width` pixels.
    ///
    /// The returned bitmap may be taller than one line when the label
    /// wraps. Returns `None` when nothing can be produced.
    fn render(&mut self, text: &str, color: Color32, max_width: u32) -> Option<Bitmap>;
}

/// Pixel bounding box assigned to the widget by the surrounding layout.
///
/// `None` anywhere upstream means "not laid out yet": size queries return
/// sentinels and rendering is skipped entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSize {
    pub width: u32,
    pub height: u32,
}

impl WidgetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Point-in-widget hit test over local coordinates.
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as i64) < self.width as i64 && (y as i64) < self.height as i64
    }
}
