//! Table writer for delimited and Parquet output
//!
//! Output is written to a hidden sibling file first and renamed into place,
//! so a failed write never leaves a complete-looking file at the target.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use polars::prelude::*;

use super::error::PipelineError;
use super::loader::FileFormat;

/// Save a table to `path`.
///
/// The format follows the extension: `.parquet` writes Parquet, `.tsv`/`.tab`
/// tab-separated text, anything else comma-separated CSV with a header row.
pub fn write_table(df: &mut DataFrame, path: &Path) -> Result<(), PipelineError> {
    let format = FileFormat::from_path(path).unwrap_or(FileFormat::Csv);
    let tmp = temp_path(path);

    let result = write_format(df, &tmp, format).and_then(|()| {
        std::fs::rename(&tmp, path).map_err(|e| PipelineError::write(path, e))
    });

    if result.is_err() && tmp.exists() {
        // Best effort
        let _ = std::fs::remove_file(&tmp);
    }

    if result.is_ok() {
        tracing::debug!(path = %path.display(), rows = df.height(), "wrote table");
    }
    result
}

fn write_format(df: &mut DataFrame, tmp: &Path, format: FileFormat) -> Result<(), PipelineError> {
    let file = File::create(tmp).map_err(|e| PipelineError::write(tmp, e))?;

    match format {
        FileFormat::Csv | FileFormat::Tsv => {
            let mut writer = BufWriter::new(file);
            CsvWriter::new(&mut writer)
                .include_header(true)
                .with_separator(format.separator())
                .finish(df)
                .map_err(|e| PipelineError::write(tmp, e))?;
            writer.flush().map_err(|e| PipelineError::write(tmp, e))?;
        }
        FileFormat::Parquet => {
            ParquetWriter::new(file)
                .finish(df)
                .map_err(|e| PipelineError::write(tmp, e))?;
        }
    }

    Ok(())
}

/// Hidden sibling of `path` used while writing
fn temp_path(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.partial", file_name))
}
