//! Font engine implementations.
//!
//! Two [`FontEngine`]s are provided:
//! - [`CosmicFontEngine`] shapes and rasterizes labels with `cosmic-text`
//!   against the system font database
//! - [`BlockFont`] draws fixed-size cells per character; deterministic,
//!   font-free, used by tests and as a fallback on fontless systems

use crate::rendering::surface::Bitmap;
use crate::traits::FontEngine;
use cosmic_text::{Attrs, Buffer, FontSystem, Metrics, Shaping, SwashCache};
use egui::Color32;

/// System-font rasterizer built on cosmic-text.
pub struct CosmicFontEngine {
    font_system: FontSystem,
    swash_cache: SwashCache,
    font_size: f32,
    line_height: f32,
}

impl CosmicFontEngine {
    /// Creates an engine at the given pixel size. Font discovery scans the
    /// system database once, here.
    pub fn new(font_size: f32) -> Self {
        Self {
            font_system: FontSystem::new(),
            swash_cache: SwashCache::new(),
            font_size,
            line_height: (font_size * 1.2).ceil(),
        }
    }
}

impl FontEngine for CosmicFontEngine {
    fn height(&self) -> u32 {
        self.line_height as u32
    }

    fn render(&mut self, text: &str, color: Color32, max_width: u32) -> Option<Bitmap> {
        if max_width == 0 {
            return None;
        }

        let metrics = Metrics::new(self.font_size, self.line_height);
        let mut buffer = Buffer::new(&mut self.font_system, metrics);
        buffer.set_size(&mut self.font_system, Some(max_width as f32), None);
        buffer.set_text(
            &mut self.font_system,
            text,
            &Attrs::new(),
            Shaping::Advanced,
            None,
        );
        buffer.shape_until_scroll(&mut self.font_system, false);

        let line_count = buffer.layout_runs().count().max(1);
        let height = (line_count as f32 * self.line_height).ceil() as u32;
        let mut bitmap = Bitmap::new(max_width, height);

        let text_color = cosmic_text::Color::rgba(color.r(), color.g(), color.b(), color.a());
        buffer.draw(
            &mut self.font_system,
            &mut self.swash_cache,
            text_color,
            |x, y, w, h, c| {
                if c.a() == 0 {
                    return;
                }
                let px = Color32::from_rgba_unmultiplied(c.r(), c.g(), c.b(), c.a());
                bitmap.fill_rect(x as i64, y as i64, w, h, px);
            },
        );

        Some(bitmap)
    }
}

/// Deterministic block font: each character becomes a `(advance-1) x height`
/// cell, spaces stay empty. Wraps within `max_width` like a real engine.
#[derive(Debug, Clone)]
pub struct BlockFont {
    /// Cell height in pixels.
    pub height: u32,
    /// Horizontal advance per character.
    pub advance: u32,
    /// When set, `render` reports failure; tests use this to drive the
    /// abort-the-pass error path.
    pub fail: bool,
}

impl BlockFont {
    pub fn new(height: u32, advance: u32) -> Self {
        Self {
            height,
            advance,
            fail: false,
        }
    }

    /// An engine that refuses to render anything.
    pub fn failing() -> Self {
        Self {
            height: 10,
            advance: 6,
            fail: true,
        }
    }
}

impl FontEngine for BlockFont {
    fn height(&self) -> u32 {
        self.height
    }

    fn render(&mut self, text: &str, color: Color32, max_width: u32) -> Option<Bitmap> {
        if self.fail || max_width == 0 {
            return None;
        }
        let per_line = (max_width / self.advance).max(1) as usize;
        let chars: Vec<char> = text.chars().collect();
        let lines = chars.len().div_ceil(per_line).max(1);
        let mut bitmap = Bitmap::new(max_width, lines as u32 * self.height);

        for (i, ch) in chars.iter().enumerate() {
            if *ch == ' ' {
                continue;
            }
            let line = i / per_line;
            let col = i % per_line;
            bitmap.fill_rect(
                (col as u32 * self.advance) as i64,
                (line as u32 * self.height) as i64,
                self.advance - 1,
                self.height - 1,
                color,
            );
        }
        Some(bitmap)
    }
}
