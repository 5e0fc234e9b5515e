//! Seed fill regression test
//!
//! Border-mode and threshold-mode flood fill on map-like grids.

use conquest_core::{Color, Pix, PixelDepth};
use conquest_region::{SeedFillOptions, floodfill};
use conquest_test::{FIXTURE_LAND, RegParams, bordered_grid, cell_origin};

/// 8 bpp image with a horizontal gradient: pixel value = x * step
fn make_gradient(w: u32, h: u32, step: u32) -> Pix {
    let mut pm = Pix::new(w, h, PixelDepth::Bit8).unwrap().into_mut();
    for y in 0..h {
        for x in 0..w {
            pm.set_pixel_unchecked(x, y, x * step);
        }
    }
    pm.into()
}

// ============================================================================
// Border mode
// ============================================================================

#[test]
fn seedfill_border_reg() {
    let mut rp = RegParams::new("seedfill_border");

    let mut grid = bordered_grid(2, 2, 6).unwrap().into_mut();
    let opts = SeedFillOptions::new(0).with_border(0);

    let (x, y) = cell_origin(1, 1, 6);
    let filled = floodfill(&mut grid, x + 2, y + 3, &opts);
    rp.compare_values(36.0, filled.len() as f64, 0.0);
    rp.check(
        filled.iter().all(|&(fx, fy)| fx >= x && fx < x + 6 && fy >= y && fy < y + 6),
        "fill stays inside its cell",
    );
    rp.compare_values(0.0, grid.get_pixel(x, y).unwrap() as f64, 0.0);

    // Neighboring cell is untouched
    let (nx, ny) = cell_origin(0, 1, 6);
    rp.compare_values(FIXTURE_LAND as f64, grid.get_pixel(nx, ny).unwrap() as f64, 0.0);

    // Refill of a claimed area, and a seed on the border itself, are no-ops
    rp.compare_values(0.0, floodfill(&mut grid, x, y, &opts).len() as f64, 0.0);
    rp.compare_values(0.0, floodfill(&mut grid, 0, 0, &opts).len() as f64, 0.0);

    // Out-of-bounds seeds are not errors
    rp.compare_values(0.0, floodfill(&mut grid, 500, 1, &opts).len() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn seedfill_border_ignores_seed_color_reg() {
    let mut rp = RegParams::new("seedfill_border_mixed");

    // Mixed interior colors are one region in border mode
    let mut pm = make_gradient(10, 3, 20).into_mut();
    for y in 0..3 {
        pm.set_pixel_unchecked(0, y, 0);
    }
    let filled = floodfill(&mut pm, 5, 1, &SeedFillOptions::new(0).with_border(0));
    rp.compare_values(27.0, filled.len() as f64, 0.0);

    assert!(rp.cleanup());
}

// ============================================================================
// Threshold mode
// ============================================================================

#[test]
fn seedfill_threshold_reg() {
    let mut rp = RegParams::new("seedfill_threshold");

    // Gradient steps of 5: threshold 10 reaches two columns either side
    let mut pm = make_gradient(20, 4, 5).into_mut();
    let opts = SeedFillOptions::new(255).with_threshold(10);
    let filled = floodfill(&mut pm, 10, 0, &opts);
    rp.compare_values(5.0 * 4.0, filled.len() as f64, 0.0);
    let mut xs: Vec<u32> = filled.iter().map(|&(x, _)| x).collect();
    xs.sort();
    xs.dedup();
    rp.check(xs == vec![8, 9, 10, 11, 12], "columns within tolerance");

    // Exact match only
    let mut pm = make_gradient(20, 4, 5).into_mut();
    let filled = floodfill(&mut pm, 10, 0, &SeedFillOptions::new(255));
    rp.compare_values(4.0, filled.len() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn seedfill_rgb_reg() {
    let mut rp = RegParams::new("seedfill_rgb");

    let mut pm = Pix::new(6, 2, PixelDepth::Bit32).unwrap().into_mut();
    pm.fill_color(Color::GREEN);
    pm.fill_rect_color(3, 0, 3, 2, Color::new(0, 250, 0));

    let fill = Color::RED.to_pixel32();
    let filled = floodfill(&mut pm, 0, 0, &SeedFillOptions::new(fill));
    rp.compare_values(6.0, filled.len() as f64, 0.0);

    let mut pm2 = Pix::new(6, 2, PixelDepth::Bit32).unwrap().into_mut();
    pm2.fill_color(Color::GREEN);
    pm2.fill_rect_color(3, 0, 3, 2, Color::new(0, 250, 0));
    let filled = floodfill(&mut pm2, 0, 0, &SeedFillOptions::new(fill).with_threshold(5));
    rp.compare_values(12.0, filled.len() as f64, 0.0);
    rp.check(pm2.get_pixel(5, 1) == Some(fill), "fill value written");

    assert!(rp.cleanup());
}
