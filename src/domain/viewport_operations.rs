//! Scroll-fraction math for the viewport model.
//!
//! This module provides pure functions converting between the normalized
//! scroll fraction (1.0 = top of the list, 0.0 = bottom) and positions in
//! the visible sequence. They are stateless and tested independently.

/// Rounds half away from zero, so fraction boundaries do not drift the
/// viewport by a row depending on float representation.
pub fn round_half_away_from_zero(x: f64) -> i64 {
    if x >= 0.0 {
        (x + 0.5).floor() as i64
    } else {
        (x - 0.5).ceil() as i64
    }
}

/// Clamps a scroll fraction into [0, 1].
pub fn clamp_fraction(fraction: f64) -> f64 {
    fraction.clamp(0.0, 1.0)
}

/// 0-based index of the first visible row for a scroll fraction.
///
/// When the whole sequence fits (`total <= max_items`), the window is
/// pinned to the start. Otherwise the fraction maps linearly onto the
/// excess rows: fraction 1.0 shows the start, 0.0 shows the last window.
///
/// # Arguments
/// * `fraction` - Normalized scroll position in [0, 1]
/// * `total` - Length of the visible sequence
/// * `max_items` - Rows that fit in the viewport
pub fn first_index_for_fraction(fraction: f64, total: usize, max_items: usize) -> usize {
    if total <= max_items {
        return 0;
    }
    let excess = (total - max_items) as i64;
    let fraction = clamp_fraction(fraction);
    let index = round_half_away_from_zero((1.0 - fraction) * excess as f64);
    index.clamp(0, excess) as usize
}

/// Scroll fraction that puts the row at 0-based `index` at the top.
///
/// Inverse of the mapping above, up to rounding: `1.0 - index / (total-1)`.
/// Degenerate sequences (one row or fewer) report fully-scrolled-up.
pub fn fraction_for_index(index: usize, total: usize) -> f64 {
    if total <= 1 {
        return 1.0;
    }
    let index_max = (total - 1) as f64;
    clamp_fraction(1.0 - index as f64 / index_max)
}

/// Fraction delta of one scroll-wheel notch: two rows' worth of travel.
pub fn wheel_step(total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    2.0 / total as f64
}
