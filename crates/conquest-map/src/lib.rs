//! conquest-map - Region registry and map editing
//!
//! A map is a directory holding a base image, one mask per region and a
//! `data.json` registry. This crate keeps the registry and the mask files
//! consistent while regions are merged, deleted, renumbered and
//! recalculated, and renders highlighted previews.
//!
//! - [`MapData`] - the persisted registry
//! - [`ConquestMap`] - paths, registry loading, samples and label overlays
//! - [`MapMaker`] - every mutation
//! - [`composite_regions`] - highlight regions through their masks
//! - [`MapWorker`] - async wrapper that serializes operations per map
//!
//! # Example
//!
//! ```no_run
//! use conquest_map::{MapMaker, SortStrategy};
//!
//! # fn main() -> conquest_map::MapResult<()> {
//! let mut maker = MapMaker::open("maps/usa")?;
//! let survivor = maker.combine_masks(&[3, 5, 2])?;
//! assert_eq!(survivor, 2);
//! maker.prune_masks()?;
//! maker.sort_regions(SortStrategy::Fast)?;
//! # Ok(())
//! # }
//! ```

pub mod composite;
pub mod data;
pub mod error;
pub mod maker;
pub mod map;
pub mod worker;

pub use composite::{combine_masks, composite_masks, composite_regions, load_mask};
pub use data::MapData;
pub use error::{MapError, MapResult};
pub use maker::{MapMaker, SortStrategy};
pub use map::{ConquestMap, DATA_FILE, HighlightColors, MapSample, NUMBERED_FILE};
pub use worker::MapWorker;
