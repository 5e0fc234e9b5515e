//! Async access to a map
//!
//! [`MapWorker`] lets an async caller drive a [`MapMaker`] without blocking
//! its runtime. Operations on one worker run one at a time: each call takes
//! the map's lock and holds it while the pixel work runs on tokio's blocking
//! pool.

use crate::data::MapData;
use crate::error::MapResult;
use crate::maker::{MapMaker, SortStrategy};
use crate::map::MapSample;
use conquest_core::Pix;
use conquest_region::Region;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Shared handle to one map; clones refer to the same map.
#[derive(Debug, Clone)]
pub struct MapWorker {
    inner: Arc<Mutex<MapMaker>>,
}

impl MapWorker {
    /// Wrap `maker`; the worker takes ownership of the map
    pub fn new(maker: MapMaker) -> Self {
        Self {
            inner: Arc::new(Mutex::new(maker)),
        }
    }

    /// Run `f` against the map on the blocking pool.
    ///
    /// The lock is held until `f` returns, so later calls wait for it.
    pub async fn run<F, T>(&self, f: F) -> MapResult<T>
    where
        F: FnOnce(&mut MapMaker) -> MapResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let mut guard = self.inner.clone().lock_owned().await;
        tokio::task::spawn_blocking(move || f(&mut *guard)).await?
    }

    /// Copy of the current registry
    pub async fn data(&self) -> MapData {
        self.inner.lock().await.data().clone()
    }

    /// Segment the base image; see [`MapMaker::generate_masks`]
    pub async fn generate_masks(&self) -> MapResult<BTreeMap<u32, Region>> {
        self.run(|maker| maker.generate_masks().cloned()).await
    }

    pub async fn combine_masks(&self, keys: Vec<u32>) -> MapResult<u32> {
        self.run(move |maker| maker.combine_masks(&keys)).await
    }

    pub async fn delete_masks(&self, keys: Vec<u32>) -> MapResult<Vec<u32>> {
        self.run(move |maker| maker.delete_masks(&keys)).await
    }

    pub async fn prune_masks(&self) -> MapResult<Vec<u32>> {
        self.run(|maker| maker.prune_masks()).await
    }

    pub async fn sort_regions(&self, strategy: SortStrategy) -> MapResult<()> {
        self.run(move |maker| maker.sort_regions(strategy)).await
    }

    pub async fn recalculate_region(&self, keys: Option<Vec<u32>>) -> MapResult<()> {
        self.run(move |maker| maker.recalculate_region(keys.as_deref()))
            .await
    }

    pub async fn sample_region(&self, key: u32, include_numbered: bool) -> MapResult<Vec<Pix>> {
        self.run(move |maker| maker.sample_region(key, include_numbered))
            .await
    }

    pub async fn get_sample(&self, region: Option<u32>) -> MapResult<MapSample> {
        self.run(move |maker| maker.get_sample(region)).await
    }

    pub async fn get_blank_numbered(&self) -> MapResult<Pix> {
        self.run(|maker| maker.get_blank_numbered()).await
    }

    pub async fn save_data(&self) -> MapResult<()> {
        self.run(|maker| maker.save_data()).await
    }
}

impl From<MapMaker> for MapWorker {
    fn from(maker: MapMaker) -> Self {
        Self::new(maker)
    }
}
