//! Category code mapping export
//!
//! Writes the value -> code table of every encoded column as JSON, so the
//! numeric output can be decoded later.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;

use crate::pipeline::{ColumnAction, EncodingOrder, MissingPolicy, TransformReport};

/// Metadata about the run that produced the mapping
#[derive(Debug, Serialize)]
pub struct MappingMetadata {
    /// Timestamp of the export (RFC 3339)
    pub timestamp: String,
    /// numerize version
    pub numerize_version: String,
    /// Input file path
    pub input_file: String,
    /// Output file path
    pub output_file: String,
    /// Code assignment order
    pub encoding: String,
    /// Missing-value policy
    pub missing: String,
    /// Sentinel written for missing cells, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<f64>,
}

/// One original value and its code
#[derive(Debug, Serialize, PartialEq)]
pub struct CategoryCode {
    pub value: String,
    pub code: i64,
}

/// Code table of one encoded column
#[derive(Debug, Serialize)]
pub struct ColumnMapping {
    pub column: String,
    pub codes: Vec<CategoryCode>,
}

/// Complete mapping export
#[derive(Debug, Serialize)]
pub struct MappingExport {
    pub metadata: MappingMetadata,
    pub columns: Vec<ColumnMapping>,
    /// Columns left untouched because they were excluded
    pub excluded: Vec<String>,
}

/// Parameters for the export metadata
pub struct ExportParams<'a> {
    pub input_file: &'a Path,
    pub output_file: &'a Path,
    pub encoding: EncodingOrder,
    pub missing: MissingPolicy,
}

/// Build the export document from a transform report
pub fn build_mapping_export(report: &TransformReport, params: &ExportParams) -> MappingExport {
    let columns = report
        .encoded()
        .map(|outcome| ColumnMapping {
            column: outcome.column.clone(),
            codes: outcome
                .categories
                .iter()
                .flatten()
                .enumerate()
                .map(|(code, value)| CategoryCode {
                    value: value.clone(),
                    code: code as i64,
                })
                .collect(),
        })
        .collect();

    let excluded = report
        .columns
        .iter()
        .filter(|c| c.action == ColumnAction::Excluded)
        .map(|c| c.column.clone())
        .collect();

    let fill_value = match params.missing {
        MissingPolicy::Constant(v) => Some(v),
        _ => None,
    };

    MappingExport {
        metadata: MappingMetadata {
            timestamp: Utc::now().to_rfc3339(),
            numerize_version: env!("CARGO_PKG_VERSION").to_string(),
            input_file: params.input_file.display().to_string(),
            output_file: params.output_file.display().to_string(),
            encoding: params.encoding.to_string(),
            missing: params.missing.to_string(),
            fill_value,
        },
        columns,
        excluded,
    }
}

/// Export the code mappings of a transform to a JSON file
pub fn export_mappings(report: &TransformReport, output_path: &Path, params: &ExportParams) -> Result<()> {
    let export = build_mapping_export(report, params);

    let json = serde_json::to_string_pretty(&export)
        .context("Failed to serialize category mappings to JSON")?;

    std::fs::write(output_path, json)
        .with_context(|| format!("Failed to write category mappings to {}", output_path.display()))?;

    Ok(())
}
