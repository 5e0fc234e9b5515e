//! Async worker regression test
//!
//! Drives a map through [`MapWorker`] from concurrent tasks and checks that
//! operations are applied one at a time.

use conquest_map::{MapError, MapMaker, MapWorker, SortStrategy};
use conquest_test::{RegParams, bordered_grid, init_tracing, write_test_image};

#[tokio::test]
async fn worker_reg() {
    init_tracing();
    let mut rp = RegParams::new("worker");
    let dir = tempfile::tempdir().unwrap();
    write_test_image(dir.path(), "blank.png", &bordered_grid(3, 3, 6).unwrap()).unwrap();

    let worker = MapWorker::new(MapMaker::new(dir.path()));
    let regions = worker.generate_masks().await.unwrap();
    rp.compare_values(9.0, regions.len() as f64, 0.0);

    // Two concurrent merges on disjoint keys both land
    let (a, b) = tokio::join!(
        worker.combine_masks(vec![1, 2]),
        worker.combine_masks(vec![5, 9, 6]),
    );
    rp.compare_values(1.0, a.unwrap() as f64, 0.0);
    rp.compare_values(5.0, b.unwrap() as f64, 0.0);

    let data = worker.data().await;
    rp.check(
        data.regions.keys().copied().eq([1, 3, 4, 5, 7, 8]),
        "both merges applied",
    );
    rp.compare_values(72.0, data.regions[&1].weight as f64, 0.0);
    rp.compare_values(108.0, data.regions[&5].weight as f64, 0.0);

    // Prune and sort through spawned tasks
    let pruner = worker.clone();
    let pruned = tokio::spawn(async move { pruner.prune_masks().await })
        .await
        .unwrap()
        .unwrap();
    rp.check(pruned == vec![2, 6, 9], "orphans pruned");
    worker.sort_regions(SortStrategy::Fast).await.unwrap();
    let data = worker.data().await;
    rp.check(data.regions.keys().copied().eq(1..=6), "keys dense after prune");

    // Errors come back unchanged
    let err = worker.sort_regions(SortStrategy::Chunked).await.unwrap_err();
    rp.check(matches!(err, MapError::NotSupported(_)), "not supported");
    let err = worker.delete_masks(vec![40]).await.unwrap_err();
    rp.check(matches!(err, MapError::InvalidKeys { .. }), "invalid keys");

    // Reads
    let sample = worker.get_sample(None).await.unwrap();
    rp.check(sample.highlighted.is_some(), "sample rendered");
    let numbered = worker.get_blank_numbered().await.unwrap();
    rp.compare_values(22.0, numbered.width() as f64, 0.0);
    rp.compare_values(2.0, worker.sample_region(1, true).await.unwrap().len() as f64, 0.0);

    assert!(rp.cleanup());
}
