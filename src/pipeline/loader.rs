//! Dataset loader for CSV, TSV and Parquet files

use std::path::{Path, PathBuf};

use polars::prelude::*;

use super::error::PipelineError;

/// Supported table file formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Tsv,
    Parquet,
}

impl FileFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "csv" => Some(FileFormat::Csv),
            "tsv" | "tab" => Some(FileFormat::Tsv),
            "parquet" => Some(FileFormat::Parquet),
            _ => None,
        }
    }

    /// Field separator for delimited formats
    pub fn separator(&self) -> u8 {
        match self {
            FileFormat::Tsv => b'\t',
            _ => b',',
        }
    }
}

/// Options for reading delimited files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadOptions {
    /// Rows used for schema inference; 0 scans the whole file
    pub infer_schema_length: usize,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            infer_schema_length: 10_000,
        }
    }
}

/// A loaded table and where it came from
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub df: DataFrame,
    pub path: PathBuf,
    pub rows: usize,
    pub cols: usize,
}

/// Resolve an input file name against a working directory.
///
/// An absolute `file_name` is returned unchanged.
pub fn resolve_input(working_dir: &Path, file_name: &Path) -> PathBuf {
    working_dir.join(file_name)
}

/// Load `file_name` from `working_dir` into memory.
pub fn load_table(
    working_dir: &Path,
    file_name: &Path,
    options: &LoadOptions,
) -> Result<LoadedTable, PipelineError> {
    let path = resolve_input(working_dir, file_name);
    let df = load_dataset(&path, options)?;
    let (rows, cols) = df.shape();

    tracing::debug!(path = %path.display(), rows, cols, "loaded table");

    Ok(LoadedTable {
        df,
        path,
        rows,
        cols,
    })
}

/// Load a dataset from a file (CSV, TSV or Parquet based on extension)
pub fn load_dataset(path: &Path, options: &LoadOptions) -> Result<DataFrame, PipelineError> {
    let format = check_input(path)?;

    let lf = match format {
        FileFormat::Csv | FileFormat::Tsv => {
            // 0 means full table scan
            let schema_length = if options.infer_schema_length == 0 {
                None
            } else {
                Some(options.infer_schema_length)
            };
            LazyCsvReader::new(path)
                .with_separator(format.separator())
                .with_infer_schema_length(schema_length)
                .with_has_header(true)
                .finish()
        }
        FileFormat::Parquet => LazyFrame::scan_parquet(path, Default::default()),
    }
    .map_err(|e| PipelineError::load(path, e))?;

    lf.collect().map_err(|e| PipelineError::load(path, e))
}

/// Read only the column names of a dataset
pub fn get_column_names(path: &Path) -> Result<Vec<String>, PipelineError> {
    let format = check_input(path)?;

    let mut lf = match format {
        FileFormat::Csv | FileFormat::Tsv => LazyCsvReader::new(path)
            .with_separator(format.separator())
            .with_has_header(true)
            .finish(),
        FileFormat::Parquet => LazyFrame::scan_parquet(path, Default::default()),
    }
    .map_err(|e| PipelineError::load(path, e))?;

    let schema = lf
        .collect_schema()
        .map_err(|e| PipelineError::load(path, e))?;
    Ok(schema.iter_names().map(|s| s.to_string()).collect())
}

fn check_input(path: &Path) -> Result<FileFormat, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::load(path, "file not found"));
    }
    if !path.is_file() {
        return Err(PipelineError::load(path, "not a regular file"));
    }
    FileFormat::from_path(path).ok_or_else(|| {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        PipelineError::load(
            path,
            format!(
                "Unsupported file format: '{}'. Supported formats: csv, tsv, parquet",
                extension
            ),
        )
    })
}
