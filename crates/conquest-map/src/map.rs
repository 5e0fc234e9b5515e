//! Read-side view of a map directory
//!
//! A map directory contains:
//!
//! | File | Content |
//! |------|---------|
//! | `blank.png` | Base image |
//! | `data.json` | Registry |
//! | `masks/<key>.png` | One 1 bpp mask per region |
//! | `numbers.png` | Label glyphs, black on white |
//! | `numbers_background.png` | Label boxes, black on white |
//! | `numbers2.png` | Label boxes with white glyphs |
//! | `numbered.png` | Base image with labels |
//!
//! [`ConquestMap`] loads the registry and renders previews. Every operation
//! that changes the registry lives on [`MapMaker`](crate::MapMaker).

use crate::composite::{composite_regions, load_mask};
use crate::data::MapData;
use crate::error::{MapError, MapResult};
use conquest_core::{Color, Pix};
use conquest_region::{
    DEFAULT_BASE_FILENAME, LabelOptions, LabelOverlays, MASKS_DIR, NUMBERS_BACKGROUND_FILE,
    NUMBERS_FILE, NUMBERS_INVERSE_FILE, Region, create_number_mask,
};
use rand::seq::SliceRandom;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Registry file name
pub const DATA_FILE: &str = "data.json";

/// Labeled base image file name
pub const NUMBERED_FILE: &str = "numbered.png";

/// Colors used when highlighting regions in samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightColors {
    /// Color of a single highlighted region
    pub single: Color,
    /// Colors of the four groups in an all-regions sample
    pub quarters: [Color; 4],
}

impl Default for HighlightColors {
    fn default() -> Self {
        Self {
            single: Color::RED,
            quarters: [Color::RED, Color::GREEN, Color::BLUE, Color::YELLOW],
        }
    }
}

impl HighlightColors {
    /// Set the single-region color
    pub fn with_single(mut self, color: Color) -> Self {
        self.single = color;
        self
    }

    /// Set the four group colors
    pub fn with_quarters(mut self, colors: [Color; 4]) -> Self {
        self.quarters = colors;
        self
    }
}

/// Preview of a map
#[derive(Debug, Clone)]
pub struct MapSample {
    /// Path of the base image
    pub blank_path: PathBuf,
    /// Base image with regions highlighted, if the map has masks
    pub highlighted: Option<Pix>,
    /// `highlighted` with the label overlay applied
    pub numbered: Option<Pix>,
}

/// A map directory and its registry.
#[derive(Debug, Clone)]
pub struct ConquestMap {
    pub(crate) path: PathBuf,
    pub(crate) data: MapData,
    labels: LabelOptions,
    highlight: HighlightColors,
}

impl ConquestMap {
    /// Create a map rooted at `path` with an empty registry.
    ///
    /// Nothing is read until [`load_data`](Self::load_data).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            data: MapData::default(),
            labels: LabelOptions::default(),
            highlight: HighlightColors::default(),
        }
    }

    /// Create a map and load its registry.
    pub fn open(path: impl Into<PathBuf>) -> MapResult<Self> {
        let mut map = Self::new(path);
        map.load_data()?;
        Ok(map)
    }

    /// Set the label rendering options
    pub fn with_label_options(mut self, labels: LabelOptions) -> Self {
        self.labels = labels;
        self
    }

    /// Set the sample highlight colors
    pub fn with_highlight_colors(mut self, highlight: HighlightColors) -> Self {
        self.highlight = highlight;
        self
    }

    /// Map directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// In-memory registry
    pub fn data(&self) -> &MapData {
        &self.data
    }

    /// Display name from the registry, if set
    pub fn name(&self) -> Option<&str> {
        self.data.name.as_deref()
    }

    /// Whether the registry marks the map as custom
    pub fn custom(&self) -> Option<bool> {
        self.data.custom
    }

    /// Highest region key currently assigned
    pub fn region_max(&self) -> Option<u32> {
        self.data.region_max
    }

    /// Region records by key
    pub fn regions(&self) -> &BTreeMap<u32, Region> {
        &self.data.regions
    }

    /// Options used when drawing number overlays
    pub fn label_options(&self) -> &LabelOptions {
        &self.labels
    }

    /// Directory holding one mask per region
    pub fn masks_path(&self) -> PathBuf {
        self.path.join(MASKS_DIR)
    }

    /// Path of `data.json`
    pub fn data_path(&self) -> PathBuf {
        self.path.join(DATA_FILE)
    }

    /// Path of the base image
    pub fn blank_path(&self) -> PathBuf {
        self.path.join(DEFAULT_BASE_FILENAME)
    }

    /// Path of the glyph overlay
    pub fn numbers_path(&self) -> PathBuf {
        self.path.join(NUMBERS_FILE)
    }

    /// Path of the base image with numbers drawn on it
    pub fn numbered_path(&self) -> PathBuf {
        self.path.join(NUMBERED_FILE)
    }

    /// Path of the label-box overlay
    pub fn numbers_background_path(&self) -> PathBuf {
        self.path.join(NUMBERS_BACKGROUND_FILE)
    }

    /// Path of the boxed, inverted glyph overlay
    pub fn numbers2_path(&self) -> PathBuf {
        self.path.join(NUMBERS_INVERSE_FILE)
    }

    /// Replace the in-memory registry with the content of `data.json`.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::MissingResource`] if the file does not exist.
    pub fn load_data(&mut self) -> MapResult<()> {
        let path = require(self.data_path())?;
        self.data = MapData::load(&path)?;
        tracing::debug!(
            map = %self.path.display(),
            regions = self.data.regions.len(),
            "registry loaded"
        );
        Ok(())
    }

    /// Render and save the label overlays for the current registry.
    pub fn create_number_mask(&self) -> MapResult<LabelOverlays> {
        Ok(create_number_mask(
            &self.data.regions,
            &self.path,
            DEFAULT_BASE_FILENAME,
            &self.labels,
        )?)
    }

    /// Filled coordinates of the mask of region `key`, row-major.
    pub fn get_points_from_mask(&self, key: u32) -> MapResult<Vec<(u32, u32)>> {
        Ok(load_mask(&self.masks_path(), key)?.filled_points()?)
    }

    /// Base image with region `key` highlighted, followed by its labeled
    /// version when `include_numbered` is set.
    ///
    /// An unknown key yields an empty list.
    pub fn sample_region(&self, key: u32, include_numbered: bool) -> MapResult<Vec<Pix>> {
        if !self.data.regions.contains_key(&key) {
            return Ok(Vec::new());
        }
        let blank = self.read_blank()?;
        let masks_dir = self.masks_path();
        let highlighted =
            composite_regions(&blank, &[key], self.highlight.single, &masks_dir)?.unwrap_or(blank);

        let mut images = Vec::with_capacity(2);
        if include_numbered {
            let numbered = self.get_numbered(&highlighted)?;
            images.push(highlighted);
            images.push(numbered);
        } else {
            images.push(highlighted);
        }
        Ok(images)
    }

    /// Preview of the map.
    ///
    /// With `Some(key)` only that region is highlighted (nothing, if the key
    /// is unknown). With `None` all regions are shuffled and split into four
    /// groups, each highlighted in its own color.
    pub fn get_sample(&self, region: Option<u32>) -> MapResult<MapSample> {
        let mut order: Vec<u32> = self.data.regions.keys().copied().collect();
        order.shuffle(&mut rand::rng());
        self.get_sample_with_order(region, &order)
    }

    /// [`get_sample`](Self::get_sample) with the group split taken from
    /// `order` instead of a random shuffle.
    ///
    /// `order` is split into quarters of `len / 4` keys; the last group
    /// also takes the remainder.
    pub fn get_sample_with_order(
        &self,
        region: Option<u32>,
        order: &[u32],
    ) -> MapResult<MapSample> {
        let blank_path = self.blank_path();
        let masks_dir = self.masks_path();
        if !masks_dir.is_dir() {
            return Ok(MapSample {
                blank_path,
                highlighted: None,
                numbered: None,
            });
        }

        let mut current = self.read_blank()?;
        match region {
            Some(key) => {
                if self.data.regions.contains_key(&key) {
                    if let Some(out) =
                        composite_regions(&current, &[key], self.highlight.single, &masks_dir)?
                    {
                        current = out;
                    }
                }
            }
            None => {
                let fourth = order.len() / 4;
                let groups = [
                    &order[..fourth],
                    &order[fourth..fourth * 2],
                    &order[fourth * 2..fourth * 3],
                    &order[fourth * 3..],
                ];
                for (keys, color) in groups.into_iter().zip(self.highlight.quarters) {
                    if let Some(out) = composite_regions(&current, keys, color, &masks_dir)? {
                        current = out;
                    }
                }
            }
        }

        let numbered = self.get_numbered(&current)?;
        Ok(MapSample {
            blank_path,
            highlighted: Some(current),
            numbered: Some(numbered),
        })
    }

    /// Apply the label overlay: inside every label box the pixels of
    /// `numbers2.png` replace the image.
    pub fn get_numbered(&self, current: &Pix) -> MapResult<Pix> {
        let boxes = conquest_io::read_image(require(self.numbers_background_path())?)?.to_mask()?;
        let labels = conquest_io::read_image(require(self.numbers2_path())?)?.to_rgb()?;
        let mut out = current.to_rgb()?.into_mut();
        out.combine_masked(&labels, &boxes)?;
        Ok(out.into())
    }

    /// Invert the image under every label glyph of `numbers.png`.
    pub fn get_inverted_numbered(&self, current: &Pix) -> MapResult<Pix> {
        let glyphs = conquest_io::read_image(require(self.numbers_path())?)?.to_mask()?;
        let rgb = current.to_rgb()?;
        let mut out = rgb.to_mut();
        out.combine_masked(&rgb.invert(), &glyphs)?;
        Ok(out.into())
    }

    /// The labeled base image.
    pub fn get_blank_numbered(&self) -> MapResult<Pix> {
        self.get_numbered(&self.read_blank()?)
    }

    /// Write the labeled base image to `numbered.png` and return its path.
    pub fn save_blank_numbered(&self) -> MapResult<PathBuf> {
        let path = self.numbered_path();
        conquest_io::write_image(&self.get_blank_numbered()?, &path)?;
        Ok(path)
    }

    fn read_blank(&self) -> MapResult<Pix> {
        Ok(conquest_io::read_image(require(self.blank_path())?)?)
    }
}

/// `path` if it exists, else [`MapError::MissingResource`]
pub(crate) fn require(path: PathBuf) -> MapResult<PathBuf> {
    if path.exists() {
        Ok(path)
    } else {
        Err(MapError::MissingResource { path })
    }
}
