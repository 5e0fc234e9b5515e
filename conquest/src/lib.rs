//! Conquest - Map segmentation and region editing
//!
//! Splits a map image into regions separated by a border color, keeps one
//! mask file and one registry record per region, and edits that
//! segmentation: merging, deleting, pruning, sorting and recalculating
//! regions, plus highlighted and labeled previews.
//!
//! # Overview
//!
//! - [`region`] - flood fill, the [`Regioner`] scan and label overlays
//! - [`map`] - the registry, [`MapMaker`] mutations and the async worker
//! - [`io`] - PNG persistence and upload decoding
//!
//! # Example
//!
//! ```
//! use conquest::{Pix, PixelDepth};
//!
//! // Create a new 8-bit grayscale image
//! let pix = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
//! assert_eq!(pix.width(), 640);
//! assert_eq!(pix.height(), 480);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use conquest_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use conquest_io as io;
pub use conquest_map as map;
pub use conquest_region as region;

// The types most callers start from
pub use conquest_map::{ConquestMap, MapData, MapError, MapMaker, MapWorker, SortStrategy};
pub use conquest_region::{Region, Regioner, RegionerOptions};
