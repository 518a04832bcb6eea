//! Offscreen pixel surfaces.
//!
//! The widget renders into a [`Bitmap`]: a plain RGBA pixel buffer that the
//! host blits to the screen (or a texture) however it likes. The surface is
//! replaced wholesale on every render; there is no partial repaint.

use egui::Color32;

/// An owned RGBA pixel buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Color32>,
}

impl Bitmap {
    /// Creates a fully transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Color32::TRANSPARENT)
    }

    /// Creates a bitmap filled with one color.
    pub fn filled(width: u32, height: u32, color: Color32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Raw pixel row-major slice.
    pub fn pixels(&self) -> &[Color32] {
        &self.pixels
    }

    /// Pixel accessor; out-of-bounds reads return `None`.
    pub fn get(&self, x: u32, y: u32) -> Option<Color32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    fn put(&mut self, x: i64, y: i64, color: Color32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        self.pixels[(y as u32 * self.width + x as u32) as usize] = color;
    }

    fn blend(&mut self, x: i64, y: i64, color: Color32) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = (y as u32 * self.width + x as u32) as usize;
        let dst = self.pixels[idx];
        // Source-over with premultiplied components.
        let inv = 255 - color.a() as u32;
        let r = color.r() as u32 + dst.r() as u32 * inv / 255;
        let g = color.g() as u32 + dst.g() as u32 * inv / 255;
        let b = color.b() as u32 + dst.b() as u32 * inv / 255;
        let a = color.a() as u32 + dst.a() as u32 * inv / 255;
        self.pixels[idx] = Color32::from_rgba_premultiplied(
            r.min(255) as u8,
            g.min(255) as u8,
            b.min(255) as u8,
            a.min(255) as u8,
        );
    }

    /// Fills a rectangle, clipped to the surface.
    pub fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Color32) {
        for dy in 0..h as i64 {
            for dx in 0..w as i64 {
                self.put(x + dx, y + dy, color);
            }
        }
    }

    /// Blits a region of `src` onto this surface.
    ///
    /// # Arguments
    /// * `src_x`, `src_y` - Top-left of the source region
    /// * `dst_x`, `dst_y` - Destination position (may be negative)
    /// * `w`, `h` - Region extent, clipped to both surfaces
    /// * `alpha` - Blend with source-over instead of overwriting
    pub fn blit(
        &mut self,
        src: &Bitmap,
        src_x: u32,
        src_y: u32,
        dst_x: i64,
        dst_y: i64,
        w: u32,
        h: u32,
        alpha: bool,
    ) {
        let w = w.min(src.width.saturating_sub(src_x));
        let h = h.min(src.height.saturating_sub(src_y));
        for dy in 0..h {
            for dx in 0..w {
                let Some(px) = src.get(src_x + dx, src_y + dy) else {
                    continue;
                };
                if alpha {
                    self.blend(dst_x + dx as i64, dst_y + dy as i64, px);
                } else {
                    self.put(dst_x + dx as i64, dst_y + dy as i64, px);
                }
            }
        }
    }

    /// Nearest-neighbor resample to the given size.
    pub fn scaled_to(&self, width: u32, height: u32) -> Bitmap {
        let mut out = Bitmap::new(width, height);
        if self.width == 0 || self.height == 0 || width == 0 || height == 0 {
            return out;
        }
        for y in 0..height {
            let sy = (y as u64 * self.height as u64 / height as u64) as u32;
            for x in 0..width {
                let sx = (x as u64 * self.width as u64 / width as u64) as u32;
                if let Some(px) = self.get(sx, sy) {
                    out.put(x as i64, y as i64, px);
                }
            }
        }
        out
    }
}

/// Cache for the skin background scaled to the widget size.
///
/// Rescaling happens only when the widget dimensions change; repaints at a
/// stable size reuse the cached copy.
#[derive(Debug, Default)]
pub struct ScaledBackground {
    cached: Option<Bitmap>,
}

impl ScaledBackground {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the background scaled to `width` x `height`, reusing the
    /// cached copy when the size matches.
    pub fn get(&mut self, source: &Bitmap, width: u32, height: u32) -> &Bitmap {
        let stale = self
            .cached
            .as_ref()
            .map(|b| b.width() != width || b.height() != height)
            .unwrap_or(true);
        if stale {
            self.cached = Some(source.scaled_to(width, height));
        }
        self.cached
            .get_or_insert_with(|| source.scaled_to(width, height))
    }

    /// Drops the cache (e.g. when the skin background changes).
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}
