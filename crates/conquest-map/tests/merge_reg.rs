//! Merge and delete regression test
//!
//! Segments a 3x2 grid of 8x8 cells, then merges and deletes regions and
//! checks the survivor, weights, centers, `region_max`, the mask files and
//! that rejected requests leave the registry alone.
//!
//! Keys follow the grid row-major: 1 2 3 on top, 4 5 6 below.

use conquest_map::{MapData, MapError, MapMaker};
use conquest_test::{RegParams, bordered_grid, init_tracing, write_test_image};
use std::path::Path;

const CELL: u32 = 8;

fn segmented_map(dir: &Path) -> MapMaker {
    let grid = bordered_grid(3, 2, CELL).unwrap();
    write_test_image(dir, "blank.png", &grid).unwrap();
    let mut maker = MapMaker::new(dir);
    maker.generate_masks().unwrap();
    maker
}

// ============================================================================
// Merge
// ============================================================================

#[test]
fn merge_reg() {
    init_tracing();
    let mut rp = RegParams::new("merge");
    let dir = tempfile::tempdir().unwrap();
    let mut maker = segmented_map(dir.path());
    rp.compare_values(6.0, maker.region_max().unwrap() as f64, 0.0);

    // --- lowest key survives ---
    let survivor = maker.combine_masks(&[3, 5, 2]).unwrap();
    rp.compare_values(2.0, survivor as f64, 0.0);
    rp.check(
        maker.regions().keys().copied().eq([1, 2, 4, 6]),
        "eliminated keys removed",
    );

    let merged = &maker.regions()[&2];
    rp.compare_values(3.0 * 64.0, merged.weight as f64, 0.0);
    // Centers of keys 2, 3, 5: (13.5, 4.5), (22.5, 4.5), (13.5, 13.5)
    rp.compare_values(16.5, merged.center.0, 1e-9);
    rp.compare_values(7.5, merged.center.1, 1e-9);
    rp.compare_values(6.0, maker.region_max().unwrap() as f64, 0.0);

    // --- survivor mask covers all inputs; eliminated files stay ---
    let points = maker.get_points_from_mask(2).unwrap();
    rp.compare_values(192.0, points.len() as f64, 0.0);
    rp.check(maker.masks_path().join("3.png").exists(), "3.png kept");
    rp.check(maker.masks_path().join("5.png").exists(), "5.png kept");

    // --- persisted ---
    let saved = MapData::load(&maker.data_path()).unwrap();
    rp.check(&saved == maker.data(), "registry persisted");

    // --- merging the max key recomputes region_max ---
    let survivor = maker.combine_masks(&[6, 4]).unwrap();
    rp.compare_values(4.0, survivor as f64, 0.0);
    rp.compare_values(4.0, maker.region_max().unwrap() as f64, 0.0);

    assert!(rp.cleanup());
}

#[test]
fn merge_rejects_reg() {
    let mut rp = RegParams::new("merge_rejects");
    let dir = tempfile::tempdir().unwrap();
    let mut maker = segmented_map(dir.path());
    let before = maker.data().clone();
    let mask_before = maker.get_points_from_mask(1).unwrap();

    let err = maker.combine_masks(&[1, 9]).unwrap_err();
    rp.check(
        matches!(&err, MapError::InvalidKeys { keys } if keys == &[9]),
        "unknown key reported",
    );
    let err = maker.combine_masks(&[1]).unwrap_err();
    rp.check(
        matches!(err, MapError::TooFewKeys { count: 1 }),
        "single key rejected",
    );
    let err = maker.combine_masks(&[]).unwrap_err();
    rp.check(
        matches!(err, MapError::TooFewKeys { count: 0 }),
        "empty list rejected",
    );

    // A missing mask file is caught before anything is written
    std::fs::remove_file(maker.masks_path().join("2.png")).unwrap();
    let err = maker.combine_masks(&[1, 2]).unwrap_err();
    rp.check(
        matches!(err, MapError::MissingResource { .. }),
        "missing mask reported",
    );

    rp.check(maker.data() == &before, "registry unchanged");
    rp.check(
        MapData::load(&maker.data_path()).unwrap() == before,
        "persisted registry unchanged",
    );
    rp.check(
        maker.get_points_from_mask(1).unwrap() == mask_before,
        "mask unchanged",
    );

    assert!(rp.cleanup());
}

// ============================================================================
// Delete
// ============================================================================

#[test]
fn delete_reg() {
    let mut rp = RegParams::new("delete");
    let dir = tempfile::tempdir().unwrap();
    let mut maker = segmented_map(dir.path());

    let removed = maker.delete_masks(&[6, 2]).unwrap();
    rp.check(removed == vec![2, 6], "removed keys reported");
    rp.check(
        maker.regions().keys().copied().eq([1, 3, 4, 5]),
        "keys removed from registry",
    );
    rp.compare_values(5.0, maker.region_max().unwrap() as f64, 0.0);
    rp.check(maker.masks_path().join("6.png").exists(), "mask files kept");

    // All-or-nothing
    let err = maker.delete_masks(&[1, 7]).unwrap_err();
    rp.check(
        matches!(&err, MapError::InvalidKeys { keys } if keys == &[7]),
        "unknown key reported",
    );
    rp.compare_values(4.0, maker.regions().len() as f64, 0.0);

    // Deleting everything leaves no max
    maker.delete_masks(&[1, 3, 4, 5]).unwrap();
    rp.check(maker.region_max().is_none(), "empty registry has no max");
    let saved = MapData::load(&maker.data_path()).unwrap();
    rp.check(saved.regions.is_empty(), "empty registry persisted");

    assert!(rp.cleanup());
}
