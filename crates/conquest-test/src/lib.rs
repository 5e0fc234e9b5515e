//! conquest-test - Regression test support for the conquest map engine
//!
//! Provides [`RegParams`] for counting and reporting checks the way every
//! `tests/*_reg.rs` file in the workspace does, plus synthetic map
//! fixtures so tests never depend on image files checked into the tree.
//!
//! # Usage
//!
//! ```ignore
//! use conquest_test::{RegParams, bordered_grid};
//!
//! let mut rp = RegParams::new("regioner");
//! let map = bordered_grid(3, 2, 8).unwrap();
//! rp.compare_values(28.0, map.width() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```

mod error;
mod params;

pub use error::{TestError, TestResult};
pub use params::RegParams;

use conquest_core::{Pix, PixelDepth};
use std::path::{Path, PathBuf};

/// Gray level of region interiors in generated maps.
pub const FIXTURE_LAND: u32 = 255;

/// Gray level of borders in generated maps.
pub const FIXTURE_WALL: u32 = 0;

/// Initialize a tracing subscriber for tests.
///
/// Safe to call from every test; only the first call installs it.
/// Respects `RUST_LOG`, defaults to "info".
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Top-left interior pixel of cell `(col, row)` in a [`bordered_grid`].
pub fn cell_origin(col: u32, row: u32, cell: u32) -> (u32, u32) {
    (1 + col * (cell + 1), 1 + row * (cell + 1))
}

/// Build an 8 bpp map of `cols` x `rows` white square cells of side
/// `cell`, separated and surrounded by 1 px black borders.
pub fn bordered_grid(cols: u32, rows: u32, cell: u32) -> TestResult<Pix> {
    let width = cols * (cell + 1) + 1;
    let height = rows * (cell + 1) + 1;
    let mut pm = Pix::new(width, height, PixelDepth::Bit8)?.into_mut();
    for y in 0..height {
        for x in 0..width {
            let wall = x % (cell + 1) == 0 || y % (cell + 1) == 0;
            let val = if wall { FIXTURE_WALL } else { FIXTURE_LAND };
            pm.set_pixel_unchecked(x, y, val);
        }
    }
    Ok(pm.into())
}

/// Every coordinate of the `w` x `h` rectangle at `(x0, y0)`, row-major.
pub fn rect_points(x0: u32, y0: u32, w: u32, h: u32) -> Vec<(u32, u32)> {
    (y0..y0 + h)
        .flat_map(|y| (x0..x0 + w).map(move |x| (x, y)))
        .collect()
}

/// Write `pix` as PNG to `dir/name` and return the path.
pub fn write_test_image(dir: &Path, name: &str, pix: &Pix) -> TestResult<PathBuf> {
    let path = dir.join(name);
    conquest_io::write_image(pix, &path).map_err(|e| TestError::ImageWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

/// Write a region mask `masks_dir/<key>.png` with `points` filled.
pub fn write_mask(
    masks_dir: &Path,
    key: u32,
    width: u32,
    height: u32,
    points: &[(u32, u32)],
) -> TestResult<PathBuf> {
    std::fs::create_dir_all(masks_dir)?;
    let mask = Pix::mask_from_points(width, height, points)?;
    write_test_image(masks_dir, &format!("{}.png", key), &mask)
}

/// Load an image written by a test.
pub fn load_test_image(path: &Path) -> TestResult<Pix> {
    conquest_io::read_image(path).map_err(|e| TestError::ImageLoad {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bordered_grid_layout() {
        let pix = bordered_grid(3, 2, 4).unwrap();
        assert_eq!(pix.width(), 16);
        assert_eq!(pix.height(), 11);
        assert_eq!(pix.get_pixel(0, 0), Some(FIXTURE_WALL));
        assert_eq!(pix.get_pixel(5, 3), Some(FIXTURE_WALL));
        let (x, y) = cell_origin(2, 1, 4);
        assert_eq!((x, y), (11, 6));
        assert_eq!(pix.get_pixel(x, y), Some(FIXTURE_LAND));
        assert_eq!(pix.get_pixel(x + 3, y + 3), Some(FIXTURE_LAND));
    }

    #[test]
    fn test_rect_points() {
        assert_eq!(rect_points(1, 2, 2, 2), vec![(1, 2), (2, 2), (1, 3), (2, 3)]);
    }
}
