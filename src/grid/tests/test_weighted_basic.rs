//! Tests for the weighted lattice variant and its cache invalidation.

use crate::grid::{
    BumpOptions, DEFAULT_WEIGHT, Point3, WeightError, WeightedGrid,
};

/// A 7x13 frame subdivided into 3x4, matching the canonical fixture.
fn small_weighted_grid() -> WeightedGrid {
    let mut grid = WeightedGrid::new(7.0, 13.0).expect("valid frame");
    grid.generate(3.0, 4.0).expect("valid sizes");
    grid
}

#[test]
fn default_weight_is_one() {
    let grid = small_weighted_grid();
    assert_eq!(grid.weight(), DEFAULT_WEIGHT);
}

#[test]
fn weighted_lattice_appends_default_weight() {
    let mut grid = small_weighted_grid();
    let expected = [
        [
            [0.0, 0.0, 0.0, 1.0],
            [0.0, 3.25, 0.0, 1.0],
            [0.0, 6.5, 0.0, 1.0],
            [0.0, 9.75, 0.0, 1.0],
            [0.0, 13.0, 0.0, 1.0],
        ],
        [
            [2.3333333333333335, 0.0, 0.0, 1.0],
            [2.3333333333333335, 3.25, 0.0, 1.0],
            [2.3333333333333335, 6.5, 0.0, 1.0],
            [2.3333333333333335, 9.75, 0.0, 1.0],
            [2.3333333333333335, 13.0, 0.0, 1.0],
        ],
        [
            [4.666666666666667, 0.0, 0.0, 1.0],
            [4.666666666666667, 3.25, 0.0, 1.0],
            [4.666666666666667, 6.5, 0.0, 1.0],
            [4.666666666666667, 9.75, 0.0, 1.0],
            [4.666666666666667, 13.0, 0.0, 1.0],
        ],
        [
            [7.0, 0.0, 0.0, 1.0],
            [7.0, 3.25, 0.0, 1.0],
            [7.0, 6.5, 0.0, 1.0],
            [7.0, 9.75, 0.0, 1.0],
            [7.0, 13.0, 0.0, 1.0],
        ],
    ];

    for (row, expected_row) in grid.grid().iter().zip(expected.iter()) {
        assert_eq!(row.len(), expected_row.len());
        for (point, expected_point) in row.iter().zip(expected_row.iter()) {
            assert_eq!(point.to_array(), *expected_point);
        }
    }
}

#[test]
fn weight_change_reflects_without_regeneration() {
    let mut grid = small_weighted_grid();
    // prime the cache first
    assert_eq!(grid.grid()[1][1].w, 1.0);

    grid.set_weight(0.35).expect("valid weight");
    assert_eq!(grid.weight(), 0.35);
    for row in grid.grid() {
        for point in row {
            assert_eq!(point.w, 0.35);
        }
    }
    // positions are untouched
    assert_eq!(grid.grid()[1][1].position(), Point3::new(2.3333333333333335, 3.25, 0.0));
}

#[test]
fn invalid_weights_are_rejected() {
    let mut grid = small_weighted_grid();
    assert!(matches!(
        grid.set_weight(-0.1),
        Err(WeightError::NotPositive { .. })
    ));
    assert!(matches!(
        grid.set_weight(0.0),
        Err(WeightError::NotPositive { .. })
    ));
    assert!(matches!(
        grid.set_weight(f64::NAN),
        Err(WeightError::NotFinite { .. })
    ));
    // a failed assignment leaves the previous weight in place
    assert_eq!(grid.weight(), DEFAULT_WEIGHT);
}

#[test]
fn weight_survives_regeneration() {
    let mut grid = small_weighted_grid();
    grid.set_weight(0.35).expect("valid weight");

    grid.generate(2.0, 2.0).expect("valid sizes");
    assert_eq!(grid.weight(), 0.35);
    assert_eq!(grid.grid().len(), 3);
    assert_eq!(grid.grid()[0].len(), 3);
    assert_eq!(grid.grid()[0][0].w, 0.35);
}

#[test]
fn reset_restores_default_weight_and_clears_cache() {
    let mut grid = small_weighted_grid();
    grid.set_weight(0.33).expect("valid weight");
    let _ = grid.grid();

    grid.reset();
    assert_eq!(grid.weight(), DEFAULT_WEIGHT);
    assert!(grid.grid().is_empty());
    assert_eq!(grid.size_u(), 0);
    assert_eq!(grid.size_v(), 0);
    assert_eq!(grid.frame().origin(), Point3::ORIGIN);
}

#[test]
fn bumps_invalidate_cached_expansion() {
    let mut grid = WeightedGrid::new(7.0, 13.0).expect("valid frame");
    grid.generate(15.0, 15.0).expect("valid sizes");
    // prime the cache with the flat lattice
    assert!(grid.grid().iter().flatten().all(|p| p.z == 0.0));

    let options = BumpOptions {
        all_positive: true,
        seed: Some(42),
        ..BumpOptions::default()
    };
    grid.bumps(2.0, &options).expect("2 bumps fit");

    let peaks = grid
        .grid()
        .iter()
        .flatten()
        .filter(|p| p.z == 5.0)
        .count();
    assert_eq!(peaks, 2);
}

#[test]
fn translate_invalidates_cached_expansion() {
    let mut grid = small_weighted_grid();
    assert_eq!(grid.grid()[0][0].position(), Point3::ORIGIN);

    let target = Point3::new(1.0, 2.0, 3.0);
    grid.translate(target).expect("generated grid translates");
    assert_eq!(grid.grid()[0][0].position(), target);
    assert_eq!(grid.grid()[0][0].w, DEFAULT_WEIGHT);
}
