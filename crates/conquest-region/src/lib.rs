//! conquest-region - Map segmentation
//!
//! This crate turns a map image into numbered regions:
//!
//! - **Seed fill** - 4-connected flood fill in border or threshold mode
//! - **Regions** - centroid, pixel weight and free-form attributes
//! - **Regioner** - full-image scan producing one mask per region
//! - **Labels** - the numbered overlays drawn at each region's centroid
//!
//! # Examples
//!
//! ## Flood fill
//!
//! ```
//! use conquest_region::{floodfill, SeedFillOptions};
//! use conquest_core::{Pix, PixelDepth};
//!
//! let mut pix_mut = Pix::new(10, 10, PixelDepth::Bit8).unwrap().into_mut();
//! pix_mut.set_all_arbitrary(255);
//!
//! // Fill everything that is not the border value 0
//! let opts = SeedFillOptions::new(0).with_border(0);
//! let filled = floodfill(&mut pix_mut, 5, 5, &opts);
//! assert_eq!(filled.len(), 100);
//! ```
//!
//! ## Segmenting a map image
//!
//! ```no_run
//! use conquest_region::Regioner;
//!
//! // Reads `maps/usa/blank.png`, writes `maps/usa/masks/<n>.png`
//! let regions = Regioner::new("maps/usa").execute().unwrap();
//! for (key, region) in &regions {
//!     println!("{key}: {:?} ({} px)", region.center, region.weight);
//! }
//! ```

pub mod error;
pub mod label;
pub mod region;
pub mod regioner;
pub mod seedfill;

pub use error::{RegionError, RegionResult};
pub use label::{
    GlyphSet, LabelFont, LabelOptions, LabelOverlays, NUMBERS_BACKGROUND_FILE, NUMBERS_FILE,
    NUMBERS_INVERSE_FILE, create_number_mask, render_labels,
};
pub use region::{Region, center_of, weighted_center};
pub use regioner::{
    DEFAULT_BASE_FILENAME, MASKS_DIR, Regioner, RegionerOptions, mask_path, scan_order,
};
pub use seedfill::{SeedFillOptions, floodfill};
