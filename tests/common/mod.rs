//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use numerize::pipeline::{ProgressReporter, Stage};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tempfile::TempDir;

/// The `[color, size]` table used throughout the examples
pub fn create_color_size_dataframe() -> DataFrame {
    df! {
        "color" => ["red", "blue", "red"],
        "size" => [10i64, 20, 30],
    }
    .unwrap()
}

/// A table mixing every kind of column the transform handles
///
/// - `id`: free text, usually excluded
/// - `city`: categorical text with a missing value
/// - `score`: float with a missing value
/// - `count`: integer with a missing value
/// - `active`: boolean
/// - `amount`: numeric text
pub fn create_mixed_dataframe() -> DataFrame {
    df! {
        "id" => ["a-1", "a-2", "a-3", "a-4", "a-5"],
        "city" => [Some("Paris"), Some("Oslo"), None, Some("Paris"), Some("Lima")],
        "score" => [Some(1.0f64), None, Some(3.0), Some(4.0), Some(7.0)],
        "count" => [Some(3i64), Some(1), Some(4), None, Some(1)],
        "active" => [true, false, true, true, false],
        "amount" => ["1.25", "2", "3.5", "4", "5"],
    }
    .unwrap()
}

/// Random categorical data with a fixed seed
pub fn create_random_categorical_dataframe(rows: usize, categories: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let labels: Vec<String> = (0..categories).map(|i| format!("cat_{}", i)).collect();

    let values: Vec<Option<String>> = (0..rows)
        .map(|_| {
            if rng.gen_bool(0.05) {
                None
            } else {
                Some(labels[rng.gen_range(0..categories)].clone())
            }
        })
        .collect();
    let numbers: Vec<f64> = (0..rows).map(|_| rng.gen::<f64>() * 100.0).collect();

    df! {
        "label" => values,
        "value" => numbers,
    }
    .unwrap()
}

/// Write raw text to a file in `dir`
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("test_data.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("test_data.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Read a CSV file back into a DataFrame
pub fn read_csv(path: &Path) -> DataFrame {
    LazyCsvReader::new(path).finish().unwrap().collect().unwrap()
}

/// Integer values of a column
pub fn i64_values(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Int64)
        .unwrap()
        .i64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Float values of a column
pub fn f64_values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

/// Column names in order
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(rows, expected_rows, "Row count mismatch: expected {}, got {}", expected_rows, rows);
    assert_eq!(cols, expected_cols, "Column count mismatch: expected {}, got {}", expected_cols, cols);
}

/// Assert that every column is numeric
pub fn assert_all_numeric(df: &DataFrame, except: &[&str]) {
    for column in df.get_columns() {
        if except.contains(&column.name().as_str()) {
            continue;
        }
        assert!(
            column.dtype().is_primitive_numeric(),
            "Column '{}' should be numeric, got {}",
            column.name(),
            column.dtype()
        );
    }
}

/// Reporter that records the stages it is told about
#[derive(Default)]
pub struct RecordingReporter {
    pub started: RefCell<Vec<Stage>>,
    pub finished: RefCell<Vec<(Stage, String)>>,
}

impl RecordingReporter {
    pub fn started(&self) -> Vec<Stage> {
        self.started.borrow().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn stage_started(&self, stage: Stage) {
        self.started.borrow_mut().push(stage);
    }

    fn stage_finished(&self, stage: Stage, detail: &str) {
        self.finished.borrow_mut().push((stage, detail.to_string()));
    }
}
