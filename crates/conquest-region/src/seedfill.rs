//! Seed fill operations
//!
//! Flood fill over a single pixel grid, in one of two modes:
//!
//! - **Border mode** (`border` set): the fill spreads to every 4-connected
//!   pixel whose value is neither the fill value nor the border value.
//! - **Threshold mode** (`border` unset): the fill spreads to every
//!   4-connected pixel whose difference from the seed's original value is
//!   at most `threshold`.
//!
//! The grid is modified in place: every accepted pixel is overwritten with
//! the fill value, which is also how already-claimed pixels are skipped.

use conquest_core::{PixMut, color};
use std::collections::VecDeque;

/// Options for seed fill operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFillOptions {
    /// Value written into every filled pixel
    pub fill_value: u32,
    /// Border value that stops the fill; `None` selects threshold mode
    pub border: Option<u32>,
    /// Maximum tolerated difference from the seed's value (threshold mode)
    pub threshold: u32,
}

impl Default for SeedFillOptions {
    fn default() -> Self {
        Self {
            fill_value: 0,
            border: None,
            threshold: 0,
        }
    }
}

impl SeedFillOptions {
    /// Create options that fill with `fill_value` in threshold mode
    pub fn new(fill_value: u32) -> Self {
        Self {
            fill_value,
            ..Self::default()
        }
    }

    /// Set the fill value
    pub fn with_fill_value(mut self, value: u32) -> Self {
        self.fill_value = value;
        self
    }

    /// Stop the fill at pixels equal to `border`
    pub fn with_border(mut self, border: u32) -> Self {
        self.border = Some(border);
        self
    }

    /// Set the color-difference tolerance
    pub fn with_threshold(mut self, threshold: u32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Flood fill from a seed point.
///
/// Returns the coordinates that were filled, seed first, in breadth-first
/// order. Each pixel appears at most once.
///
/// Returns an empty vector when the seed lies outside the image, or when
/// the seed already matches the fill value within `threshold` (re-filling
/// a filled area is a no-op).
pub fn floodfill(
    pix: &mut PixMut,
    seed_x: u32,
    seed_y: u32,
    options: &SeedFillOptions,
) -> Vec<(u32, u32)> {
    let depth = pix.depth();
    let Some(background) = pix.get_pixel(seed_x, seed_y) else {
        return Vec::new();
    };
    let value = options.fill_value & depth.max_value();
    if color::color_diff(depth, value, background) <= options.threshold {
        return Vec::new();
    }

    let accepts = |p: u32| match options.border {
        Some(border) => p != value && p != border,
        None => color::color_diff(depth, p, background) <= options.threshold,
    };

    let width = pix.width();
    let height = pix.height();
    let mut filled = Vec::new();
    let mut queue = VecDeque::new();

    pix.set_pixel_unchecked(seed_x, seed_y, value);
    queue.push_back((seed_x, seed_y));

    while let Some((x, y)) = queue.pop_front() {
        filled.push((x, y));

        let neighbors = [
            (x + 1 < width).then(|| (x + 1, y)),
            (x > 0).then(|| (x - 1, y)),
            (y + 1 < height).then(|| (x, y + 1)),
            (y > 0).then(|| (x, y - 1)),
        ];
        for (nx, ny) in neighbors.into_iter().flatten() {
            if accepts(pix.get_pixel_unchecked(nx, ny)) {
                pix.set_pixel_unchecked(nx, ny, value);
                queue.push_back((nx, ny));
            }
        }
    }

    filled
}

#[cfg(test)]
mod tests {
    use super::*;
    use conquest_core::{Pix, PixelDepth};

    fn gray(w: u32, h: u32, vals: &[u32]) -> PixMut {
        let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().into_mut();
        for (i, v) in vals.iter().enumerate() {
            pm.set_pixel(i as u32 % w, i as u32 / w, *v).unwrap();
        }
        pm
    }

    #[test]
    fn test_border_mode_stops_at_border() {
        #[rustfmt::skip]
        let mut pm = gray(5, 3, &[
            200, 200,   0, 90, 90,
            200, 100,   0, 90, 90,
              0,   0,   0, 90, 90,
        ]);
        let opts = SeedFillOptions::new(0).with_border(0);
        let mut filled = floodfill(&mut pm, 0, 0, &opts);
        filled.sort();
        assert_eq!(filled, vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        assert_eq!(pm.get_pixel(1, 1), Some(0));
        assert_eq!(pm.get_pixel(3, 0), Some(90));
    }

    #[test]
    fn test_threshold_mode_same_color() {
        #[rustfmt::skip]
        let mut pm = gray(4, 2, &[
            50, 52, 60, 50,
            50, 50, 50, 50,
        ]);
        let opts = SeedFillOptions::new(255);
        assert_eq!(floodfill(&mut pm, 0, 0, &opts).len(), 6);
        assert_eq!(pm.get_pixel(1, 0), Some(52));

        let mut pm = gray(4, 2, &[50, 52, 60, 50, 50, 50, 50, 50]);
        let opts = SeedFillOptions::new(255).with_threshold(2);
        assert_eq!(floodfill(&mut pm, 0, 0, &opts).len(), 7);
    }

    #[test]
    fn test_refill_is_noop() {
        let mut pm = gray(3, 3, &[7; 9]);
        let opts = SeedFillOptions::new(1).with_border(0);
        assert_eq!(floodfill(&mut pm, 1, 1, &opts).len(), 9);
        assert!(floodfill(&mut pm, 1, 1, &opts).is_empty());
    }

    #[test]
    fn test_out_of_bounds_seed() {
        let mut pm = gray(3, 3, &[7; 9]);
        let opts = SeedFillOptions::new(1);
        assert!(floodfill(&mut pm, 3, 0, &opts).is_empty());
        assert!(floodfill(&mut pm, 0, 99, &opts).is_empty());
    }

    #[test]
    fn test_no_diagonal_leak() {
        #[rustfmt::skip]
        let mut pm = gray(2, 2, &[
            9, 0,
            0, 9,
        ]);
        let opts = SeedFillOptions::new(0).with_border(0);
        assert_eq!(floodfill(&mut pm, 0, 0, &opts), vec![(0, 0)]);
    }

    #[test]
    fn test_rgb_threshold() {
        let mut pm = Pix::new(2, 1, PixelDepth::Bit32).unwrap().into_mut();
        pm.set_rgb(0, 0, 10, 10, 10).unwrap();
        pm.set_rgb(1, 0, 11, 11, 10).unwrap();
        let fill = color::compose_rgb(255, 0, 0);
        let opts = SeedFillOptions::new(fill).with_threshold(1);
        assert_eq!(floodfill(&mut pm, 0, 0, &opts).len(), 1);
        let opts = SeedFillOptions::new(fill).with_threshold(2);
        let mut pm2 = Pix::new(2, 1, PixelDepth::Bit32).unwrap().into_mut();
        pm2.set_rgb(0, 0, 10, 10, 10).unwrap();
        pm2.set_rgb(1, 0, 11, 11, 10).unwrap();
        assert_eq!(floodfill(&mut pm2, 0, 0, &opts).len(), 2);
    }
}
