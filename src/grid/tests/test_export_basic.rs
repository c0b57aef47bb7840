//! Tests for the flat-text exporter: lifecycle guards, fallback names and
//! round-trippability of the written format.

use std::fs;
use std::path::{Path, PathBuf};

use crate::grid::{ExportError, Grid, WeightedGrid, DEFAULT_FILE_NAME};

fn temp_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("surfgrid_{}_{}.txt", name, std::process::id()))
}

fn parse_rows(content: &str) -> Vec<Vec<Vec<f64>>> {
    content
        .lines()
        .map(|line| {
            line.split(';')
                .map(|point| {
                    point
                        .split(',')
                        .map(|c| c.parse::<f64>().expect("numeric component"))
                        .collect()
                })
                .collect()
        })
        .collect()
}

#[test]
fn save_requires_generated_lattice() {
    let grid = Grid::new(5.0, 7.0).expect("valid frame");
    assert!(matches!(grid.save(), Err(ExportError::NotGenerated)));

    let weighted = WeightedGrid::new(5.0, 7.0).expect("valid frame");
    assert!(matches!(
        weighted.save_to("weighted.txt"),
        Err(ExportError::NotGenerated)
    ));
}

#[test]
fn save_writes_non_empty_file() {
    let mut grid = Grid::new(7.0, 13.0).expect("valid frame");
    grid.generate(3.0, 4.0).expect("valid sizes");

    let path = temp_file("plain");
    let diagnostics = grid
        .save_to(path.to_str().expect("utf-8 temp path"))
        .expect("save succeeds");

    assert_eq!(diagnostics.path, path);
    assert!(!diagnostics.has_warnings());
    let metadata = fs::metadata(&path).expect("file exists");
    assert!(metadata.len() > 0);
    assert_eq!(metadata.len() as usize, diagnostics.byte_count);

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn saved_file_round_trips_into_the_same_lattice() {
    let mut grid = Grid::new(7.0, 13.0).expect("valid frame");
    grid.generate(3.0, 4.0).expect("valid sizes");

    let path = temp_file("roundtrip");
    grid.save_to(path.to_str().expect("utf-8 temp path"))
        .expect("save succeeds");

    let content = fs::read_to_string(&path).expect("file readable");
    let parsed = parse_rows(&content);

    assert_eq!(parsed.len(), grid.grid().len());
    for (parsed_row, row) in parsed.iter().zip(grid.grid()) {
        assert_eq!(parsed_row.len(), row.len());
        for (parsed_point, point) in parsed_row.iter().zip(row) {
            assert_eq!(parsed_point.as_slice(), point.to_array().as_slice());
        }
    }

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn weighted_save_writes_four_components() {
    let mut grid = WeightedGrid::new(7.0, 13.0).expect("valid frame");
    grid.generate(3.0, 4.0).expect("valid sizes");
    grid.set_weight(0.35).expect("valid weight");

    let path = temp_file("weighted");
    grid.save_to(path.to_str().expect("utf-8 temp path"))
        .expect("save succeeds");

    let content = fs::read_to_string(&path).expect("file readable");
    let parsed = parse_rows(&content);
    assert_eq!(parsed.len(), 4);
    for row in &parsed {
        assert_eq!(row.len(), 5);
        for point in row {
            assert_eq!(point.len(), 4);
            assert_eq!(point[3], 0.35);
        }
    }

    fs::remove_file(&path).expect("cleanup");
}

#[test]
fn unusable_names_fall_back_to_the_default() {
    let mut grid = Grid::new(7.0, 13.0).expect("valid frame");
    grid.generate(2.0, 2.0).expect("valid sizes");

    // blank name: substituted before writing
    let diagnostics = grid.save_to("  ").expect("fallback succeeds");
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.path, Path::new(DEFAULT_FILE_NAME));
    assert!(fs::metadata(DEFAULT_FILE_NAME).expect("file exists").len() > 0);
    fs::remove_file(DEFAULT_FILE_NAME).expect("cleanup");

    // unwritable name: retried under the default after the write fails
    let missing_dir = std::env::temp_dir().join(format!(
        "surfgrid_missing_{}",
        std::process::id()
    ));
    let unwritable = missing_dir.join("grid_out.txt");
    let diagnostics = grid
        .save_to(unwritable.to_str().expect("utf-8 temp path"))
        .expect("fallback succeeds");
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.path, Path::new(DEFAULT_FILE_NAME));
    assert!(fs::metadata(DEFAULT_FILE_NAME).expect("file exists").len() > 0);
    fs::remove_file(DEFAULT_FILE_NAME).expect("cleanup");
}
