//! Registry mutations
//!
//! [`MapMaker`] owns a [`ConquestMap`] and implements every operation that
//! changes it: creating a map, segmenting it, merging, deleting,
//! renumbering and reconciling regions with their mask files.
//!
//! Each mutation checks all of its inputs before the first write, so an
//! error leaves both the registry and the masks directory untouched. A
//! successful mutation returns only after `data.json` has been rewritten.
//!
//! # Renumbering
//!
//! Prune and sort assign new keys to existing masks. Renaming in place
//! could overwrite a mask that has not been moved yet (`4 -> 3` before
//! `3 -> 2`), so every moved mask first goes to `<old>_old.png` and only
//! then to `<new>.png`.

use crate::composite::{combine_masks, load_mask};
use crate::data::MapData;
use crate::error::{MapError, MapResult};
use crate::map::{ConquestMap, require};
use conquest_core::Pix;
use conquest_region::{
    Region, RegionError, Regioner, RegionerOptions, center_of, mask_path, weighted_center,
};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};

/// How [`MapMaker::sort_regions`] orders regions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortStrategy {
    /// Top to bottom by each region's topmost pixel
    #[default]
    Fast,
    /// Tile-ordered like the segmentation scan (not implemented)
    Chunked,
}

/// Editable map.
#[derive(Debug, Clone)]
pub struct MapMaker {
    map: ConquestMap,
}

impl Deref for MapMaker {
    type Target = ConquestMap;

    fn deref(&self) -> &ConquestMap {
        &self.map
    }
}

impl DerefMut for MapMaker {
    fn deref_mut(&mut self) -> &mut ConquestMap {
        &mut self.map
    }
}

impl From<ConquestMap> for MapMaker {
    fn from(map: ConquestMap) -> Self {
        Self { map }
    }
}

impl MapMaker {
    /// Editor for the map at `path` with an empty registry
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            map: ConquestMap::new(path),
        }
    }

    /// Editor for an existing map, registry loaded
    pub fn open(path: impl Into<PathBuf>) -> MapResult<Self> {
        Ok(Self {
            map: ConquestMap::open(path)?,
        })
    }

    /// Give up editing and keep the map
    pub fn into_map(self) -> ConquestMap {
        self.map
    }

    /// Write the registry to `data.json`.
    pub fn save_data(&self) -> MapResult<()> {
        self.map.data.save(&self.map.data_path())
    }

    /// Set up a map directory at `path` for `image`.
    ///
    /// Creates the directory if needed, persists a registry holding only
    /// `name` and stores the image as `blank.png`.
    pub fn init_directory(
        &mut self,
        name: &str,
        path: impl Into<PathBuf>,
        image: &Pix,
    ) -> MapResult<()> {
        let path = path.into();
        std::fs::create_dir_all(&path)?;

        self.map.path = path;
        self.map.data.name = Some(name.to_string());
        self.save_data()?;
        conquest_io::write_image(image, self.blank_path())?;

        tracing::info!(map = %self.path().display(), name, "map directory initialized");
        Ok(())
    }

    /// [`init_directory`](Self::init_directory) from encoded image bytes
    /// in any supported format.
    pub fn init_directory_from_bytes(
        &mut self,
        name: &str,
        path: impl Into<PathBuf>,
        bytes: &[u8],
    ) -> MapResult<()> {
        let image = conquest_io::read_image_mem(bytes)?;
        self.init_directory(name, path, &image)
    }

    /// Copy the map to `new_path` under `new_name`.
    ///
    /// The copy is marked custom and becomes the map this editor works on.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::AlreadyExists`] if `new_path` exists.
    pub fn change_name(&mut self, new_name: &str, new_path: impl Into<PathBuf>) -> MapResult<()> {
        let new_path = new_path.into();
        if new_path.exists() {
            return Err(MapError::AlreadyExists { path: new_path });
        }
        copy_dir_all(&self.map.path, &new_path)?;

        self.map.data.custom = Some(true);
        self.map.data.name = Some(new_name.to_string());
        self.map.path = new_path;
        self.save_data()?;

        tracing::info!(map = %self.path().display(), name = new_name, "map copied");
        Ok(())
    }

    /// Segment `blank.png` and replace the registry with the result.
    pub fn generate_masks(&mut self) -> MapResult<&BTreeMap<u32, Region>> {
        require(self.blank_path())?;
        let options = RegionerOptions::default().with_labels(self.label_options().clone());
        let regions = Regioner::with_options(&self.map.path, options)
            .execute()
            .map_err(|e| match e {
                RegionError::MissingResource { path } => MapError::MissingResource { path },
                other => other.into(),
            })?;

        self.map.data.region_max = regions.keys().next_back().copied();
        self.map.data.regions = regions;
        self.save_data()?;
        Ok(&self.map.data.regions)
    }

    /// Merge regions into the one with the lowest key and return that key.
    ///
    /// The survivor's mask becomes the bitwise AND of all input masks, its
    /// weight the sum of their weights and its center their
    /// weight-averaged center. The other keys leave the registry; their
    /// mask files stay on disk until the next prune.
    ///
    /// # Errors
    ///
    /// - [`MapError::TooFewKeys`] for fewer than two distinct keys
    /// - [`MapError::InvalidKeys`] if a key is not registered
    /// - [`MapError::MissingResource`] if the base image, the masks
    ///   directory or an input mask is missing
    pub fn combine_masks(&mut self, keys: &[u32]) -> MapResult<u32> {
        let keys: BTreeSet<u32> = keys.iter().copied().collect();
        if keys.len() < 2 {
            return Err(MapError::TooFewKeys { count: keys.len() });
        }
        let keys: Vec<u32> = keys.into_iter().collect();
        self.check_keys(&keys)?;
        let blank = conquest_io::read_image(require(self.blank_path())?)?;
        let masks_dir = require(self.masks_path())?;
        for &key in &keys {
            require(mask_path(&masks_dir, key))?;
        }

        let mut masks = vec![Pix::new_mask(blank.width(), blank.height())?];
        for &key in &keys {
            masks.push(load_mask(&masks_dir, key)?);
        }
        let Some(combined) = combine_masks(&masks)? else {
            return Err(MapError::TooFewKeys { count: 0 });
        };

        let (survivor, eliminated) = (keys[0], &keys[1..]);
        let regions = &self.map.data.regions;
        let center = weighted_center(keys.iter().filter_map(|k| regions.get(k)));
        let weight: u32 = keys.iter().filter_map(|k| regions.get(k)).map(|r| r.weight).sum();

        conquest_io::write_image(&combined, mask_path(&masks_dir, survivor))?;

        let regions = &mut self.map.data.regions;
        for key in eliminated {
            regions.remove(key);
        }
        if let Some(region) = regions.get_mut(&survivor) {
            if let Some(center) = center {
                region.center = center;
            }
            region.weight = weight;
        }
        self.map.data.region_max = self.map.data.max_key();

        self.refresh_labels()?;
        self.save_data()?;
        tracing::info!(survivor, eliminated = ?eliminated, weight, "regions merged");
        Ok(survivor)
    }

    /// Remove regions from the registry and return the removed keys.
    ///
    /// Mask files are left in place.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::InvalidKeys`] if any key is not registered;
    /// nothing is removed in that case.
    pub fn delete_masks(&mut self, keys: &[u32]) -> MapResult<Vec<u32>> {
        self.check_keys(keys)?;
        let removed: Vec<u32> = keys
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        for key in &removed {
            self.map.data.regions.remove(key);
        }
        self.map.data.region_max = self.map.data.max_key();

        self.refresh_labels()?;
        self.save_data()?;
        tracing::info!(removed = ?removed, "regions deleted");
        Ok(removed)
    }

    /// Delete orphan masks and renumber the remaining regions `1..=n`.
    ///
    /// Returns the keys of the deleted mask files in ascending order.
    /// Files in the masks directory whose name is not a number are left
    /// alone.
    pub fn prune_masks(&mut self) -> MapResult<Vec<u32>> {
        let masks_dir = require(self.masks_path())?;
        for &key in self.regions().keys() {
            require(mask_path(&masks_dir, key))?;
        }

        let files = std::fs::read_dir(&masks_dir)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;

        let mut pruned = Vec::new();
        for path in files {
            let Some(key) = mask_key(&path) else {
                tracing::warn!(file = %path.display(), "skipping non-mask file");
                continue;
            };
            if !self.regions().contains_key(&key) {
                std::fs::remove_file(&path)?;
                pruned.push(key);
            }
        }
        pruned.sort_unstable();

        let order: Vec<u32> = self.regions().keys().copied().collect();
        self.renumber(&masks_dir, &order)?;

        self.refresh_labels()?;
        self.save_data()?;
        tracing::info!(pruned = pruned.len(), regions = order.len(), "masks pruned");
        Ok(pruned)
    }

    /// Renumber regions top to bottom.
    ///
    /// Each region is placed by the row of its topmost mask pixel; ties keep
    /// key order. Regions whose mask is empty go last.
    ///
    /// # Errors
    ///
    /// Returns [`MapError::NotSupported`] for [`SortStrategy::Chunked`].
    pub fn sort_regions(&mut self, strategy: SortStrategy) -> MapResult<()> {
        if strategy == SortStrategy::Chunked {
            return Err(MapError::NotSupported("chunked region sort".to_string()));
        }
        let masks_dir = require(self.masks_path())?;

        let mut tops = Vec::with_capacity(self.regions().len());
        for &key in self.regions().keys() {
            let top = load_mask(&masks_dir, key)?.topmost_filled()?;
            if top.is_none() {
                tracing::warn!(key, "region mask is empty, sorting it last");
            }
            tops.push((top.map(|(_, y)| y), key));
        }
        tops.sort_by_key(|&(y, _)| (y.is_none(), y));

        let order: Vec<u32> = tops.into_iter().map(|(_, key)| key).collect();
        self.renumber(&masks_dir, &order)?;

        self.refresh_labels()?;
        self.save_data()?;
        tracing::info!(regions = order.len(), "regions sorted");
        Ok(())
    }

    /// Recompute center and weight of regions from their mask files.
    ///
    /// `None` recalculates every region. A region whose mask is empty gets
    /// weight 0 and keeps its center.
    pub fn recalculate_region(&mut self, keys: Option<&[u32]>) -> MapResult<()> {
        let keys: Vec<u32> = match keys {
            Some(keys) => {
                self.check_keys(keys)?;
                keys.to_vec()
            }
            None => self.regions().keys().copied().collect(),
        };
        let masks_dir = require(self.masks_path())?;

        let mut updates = Vec::with_capacity(keys.len());
        for key in keys {
            let points = load_mask(&masks_dir, key)?.filled_points()?;
            updates.push((key, center_of(&points), points.len() as u32));
        }

        for (key, center, weight) in updates {
            let Some(region) = self.map.data.regions.get_mut(&key) else {
                continue;
            };
            match center {
                Some(center) => region.center = center,
                None => tracing::warn!(key, "region mask is empty, keeping its center"),
            }
            region.weight = weight;
            tracing::debug!(key, weight, "region recalculated");
        }

        self.save_data()
    }

    /// Re-save every mask file as a two-level 1 bpp PNG and return how many
    /// were converted.
    pub fn convert_masks(&self) -> MapResult<usize> {
        let masks_dir = require(self.masks_path())?;
        let mut count = 0;
        for entry in std::fs::read_dir(&masks_dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "png") {
                continue;
            }
            let mask = conquest_io::read_image(&path)?.to_mask()?;
            conquest_io::write_image(&mask, &path)?;
            count += 1;
        }
        tracing::info!(count, "masks converted");
        Ok(count)
    }

    /// Suggested merge candidates.
    ///
    /// # Errors
    ///
    /// Always returns [`MapError::NotSupported`].
    pub fn recommended_combinations(&self) -> MapResult<Vec<Vec<u32>>> {
        Err(MapError::NotSupported(
            "combination recommendations".to_string(),
        ))
    }

    /// Replace the registry wholesale and persist it.
    pub fn set_data(&mut self, data: MapData) -> MapResult<()> {
        self.map.data = data;
        self.save_data()
    }

    fn check_keys(&self, keys: &[u32]) -> MapResult<()> {
        let mut missing = self.map.data.missing_keys(keys);
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort_unstable();
        missing.dedup();
        Err(MapError::InvalidKeys { keys: missing })
    }

    /// Give the region at `order[i]` key `i + 1`, moving mask files in two
    /// phases.
    fn renumber(&mut self, masks_dir: &Path, order: &[u32]) -> MapResult<()> {
        let moves: Vec<(u32, u32)> = order
            .iter()
            .zip(1..)
            .map(|(&old, new)| (old, new))
            .filter(|&(old, new)| old != new)
            .collect();

        for &(old, _) in &moves {
            std::fs::rename(mask_path(masks_dir, old), staged_path(masks_dir, old))?;
        }
        for &(old, new) in &moves {
            std::fs::rename(staged_path(masks_dir, old), mask_path(masks_dir, new))?;
            tracing::debug!(old, new, "mask renumbered");
        }

        let mut old = std::mem::take(&mut self.map.data.regions);
        self.map.data.regions = order
            .iter()
            .zip(1..)
            .filter_map(|(key, new)| old.remove(key).map(|region| (new, region)))
            .collect();
        self.map.data.region_max = self.map.data.max_key();
        Ok(())
    }

    /// Regenerate the label overlays if the base image is present.
    fn refresh_labels(&self) -> MapResult<()> {
        if self.blank_path().exists() {
            self.create_number_mask()?;
        } else {
            tracing::warn!(map = %self.path().display(), "no base image, labels not updated");
        }
        Ok(())
    }
}

/// Temporary name of a mask during renumbering
fn staged_path(masks_dir: &Path, key: u32) -> PathBuf {
    masks_dir.join(format!("{}_old.png", key))
}

/// Region key of a mask file name, `None` if it is not `<number>.png`
fn mask_key(path: &Path) -> Option<u32> {
    if path.extension()? != "png" {
        return None;
    }
    path.file_stem()?.to_str()?.parse().ok()
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let target = dst.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            std::fs::copy(entry.path(), target)?;
        }
    }
    Ok(())
}
