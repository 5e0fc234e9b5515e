//! Full-image segmentation
//!
//! The [`Regioner`] splits a map image into regions: every maximal
//! 4-connected area of non-border pixels becomes one region with its own
//! mask file and [`Region`] record.
//!
//! # Scan order
//!
//! The grid is divided into tiles of `dimension / 10` pixels along each
//! axis (at least 1; the last tile in a row or column absorbs the
//! remainder). Tile rows are visited top to bottom, tiles left to right,
//! and pixels row-major inside each tile. Scan order only decides which
//! key a region receives, never the regions themselves.
//!
//! Older tooling scanned plain row-major over the whole image. On images 20
//! pixels or taller the two orders diverge, so a map segmented here can
//! number its regions differently from the same map segmented by that
//! tooling. Keys of existing maps are read from `data.json` and are never
//! renumbered on load.

use crate::error::{RegionError, RegionResult};
use crate::label::{LabelOptions, create_number_mask};
use crate::region::Region;
use crate::seedfill::{SeedFillOptions, floodfill};
use conquest_core::Pix;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Directory, inside the map directory, that holds region masks
pub const MASKS_DIR: &str = "masks";

/// Default base image file name
pub const DEFAULT_BASE_FILENAME: &str = "blank.png";

/// Number of tiles along each axis
const TILES_PER_AXIS: u32 = 10;

/// Path of the mask file for region `key`
pub fn mask_path(masks_dir: &Path, key: u32) -> PathBuf {
    masks_dir.join(format!("{}.png", key))
}

/// Options for the region scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionerOptions {
    /// Gray level of region borders
    pub wall_color: u8,
    /// When set, only pixels of exactly this gray level seed regions
    pub region_color: Option<u8>,
    /// Base image file name inside the map directory
    pub base_filename: String,
    /// Label overlay rendering
    pub labels: LabelOptions,
}

impl Default for RegionerOptions {
    fn default() -> Self {
        Self {
            wall_color: 0,
            region_color: None,
            base_filename: DEFAULT_BASE_FILENAME.to_string(),
            labels: LabelOptions::default(),
        }
    }
}

impl RegionerOptions {
    /// Set the border gray level
    pub fn with_wall_color(mut self, wall: u8) -> Self {
        self.wall_color = wall;
        self
    }

    /// Only seed regions from pixels of this gray level
    pub fn with_region_color(mut self, color: u8) -> Self {
        self.region_color = Some(color);
        self
    }

    /// Set the base image file name
    pub fn with_base_filename(mut self, name: impl Into<String>) -> Self {
        self.base_filename = name.into();
        self
    }

    /// Set the label rendering options
    pub fn with_labels(mut self, labels: LabelOptions) -> Self {
        self.labels = labels;
        self
    }
}

/// Segments the base image of one map directory.
#[derive(Debug, Clone)]
pub struct Regioner {
    filepath: PathBuf,
    options: RegionerOptions,
}

impl Regioner {
    /// Create a regioner for the map directory `filepath` with default
    /// options.
    pub fn new(filepath: impl Into<PathBuf>) -> Self {
        Self::with_options(filepath, RegionerOptions::default())
    }

    /// Create a regioner with explicit options
    pub fn with_options(filepath: impl Into<PathBuf>, options: RegionerOptions) -> Self {
        Self {
            filepath: filepath.into(),
            options,
        }
    }

    /// The options in effect
    pub fn options(&self) -> &RegionerOptions {
        &self.options
    }

    /// Scan the base image, write one mask per region and the label
    /// overlays, and return the regions keyed from 1 in discovery order.
    ///
    /// # Errors
    ///
    /// Returns [`RegionError::MissingResource`] if the base image does not
    /// exist; nothing is written in that case.
    pub fn execute(&self) -> RegionResult<BTreeMap<u32, Region>> {
        let base_path = self.filepath.join(&self.options.base_filename);
        if !base_path.exists() {
            return Err(RegionError::MissingResource { path: base_path });
        }
        let base = conquest_io::read_image(&base_path)?;

        let masks_dir = self.filepath.join(MASKS_DIR);
        std::fs::create_dir_all(&masks_dir)?;

        let regions = self.segment(&base, |key, mask| {
            conquest_io::write_image(mask, mask_path(&masks_dir, key))?;
            Ok(())
        })?;

        create_number_mask(
            &regions,
            &self.filepath,
            &self.options.base_filename,
            &self.options.labels,
        )?;

        tracing::info!(
            map = %self.filepath.display(),
            regions = regions.len(),
            "segmentation finished"
        );
        Ok(regions)
    }

    /// Segment `base` without touching the filesystem, handing each mask
    /// to `on_mask` as it is discovered.
    pub fn segment<F>(&self, base: &Pix, mut on_mask: F) -> RegionResult<BTreeMap<u32, Region>>
    where
        F: FnMut(u32, &Pix) -> RegionResult<()>,
    {
        let mut grid = base.to_gray()?.into_mut();
        let (width, height) = (grid.width(), grid.height());
        let wall = self.options.wall_color as u32;
        let fill = SeedFillOptions::new(wall).with_border(wall);

        let is_seed = |val: u32| match self.options.region_color {
            None => val != wall,
            Some(region) => val == region as u32,
        };

        let mut regions = BTreeMap::new();
        let mut count = 0u32;

        for (x, y) in scan_order(width, height) {
            if !is_seed(grid.get_pixel_unchecked(x, y)) {
                continue;
            }
            let filled = floodfill(&mut grid, x, y, &fill);
            let Some(region) = Region::from_points(&filled) else {
                continue;
            };
            count += 1;
            let mask = Pix::mask_from_points(width, height, &filled)?;
            on_mask(count, &mask)?;
            tracing::debug!(key = count, weight = region.weight, "region found");
            regions.insert(count, region);
        }

        Ok(regions)
    }
}

/// Pixel visiting order of a scan over a `width` x `height` grid.
pub fn scan_order(width: u32, height: u32) -> impl Iterator<Item = (u32, u32)> {
    let tile_w = (width / TILES_PER_AXIS).max(1);
    let tile_h = (height / TILES_PER_AXIS).max(1);
    let tile_starts = |len: u32, tile: u32| {
        let count = (len / tile).max(1);
        (0..count).map(move |i| {
            let start = i * tile;
            let end = if i + 1 == count { len } else { start + tile };
            (start, end)
        })
    };
    tile_starts(height, tile_h).flat_map(move |(y0, y1)| {
        tile_starts(width, tile_w).flat_map(move |(x0, x1)| {
            (y0..y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
        })
    })
}
