//! Transform configuration parsed from the JSON CLI argument
//!
//! The configuration is a closed record: unknown keys are rejected instead of
//! being silently ignored, and option combinations are checked before any
//! column is touched.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Order in which categorical codes are assigned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingOrder {
    /// Codes follow the row order in which each value first appears.
    #[default]
    #[serde(alias = "label", alias = "first_seen")]
    Ordinal,
    /// Codes follow ascending value order (numeric for numbers, byte order for text).
    Sorted,
}

impl fmt::Display for EncodingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodingOrder::Ordinal => write!(f, "ordinal"),
            EncodingOrder::Sorted => write!(f, "sorted"),
        }
    }
}

/// Missing-value strategy as written in the JSON config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingStrategy {
    Keep,
    Constant,
    Mean,
    Median,
    Zero,
}

/// Missing-value policy after validation
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum MissingPolicy {
    /// Leave nulls in place.
    #[default]
    Keep,
    /// Replace nulls with a fixed sentinel.
    Constant(f64),
    /// Replace nulls in numeric columns with the column mean.
    Mean,
    /// Replace nulls in numeric columns with the column median.
    Median,
}

impl fmt::Display for MissingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissingPolicy::Keep => write!(f, "keep"),
            MissingPolicy::Constant(v) => write!(f, "constant({})", v),
            MissingPolicy::Mean => write!(f, "mean"),
            MissingPolicy::Median => write!(f, "median"),
        }
    }
}

/// Options controlling [`transform`](super::transform)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TransformConfig {
    /// Columns always coded as categories, even when numeric
    pub categorical: Vec<String>,
    /// Columns left untouched
    pub exclude: Vec<String>,
    /// Code assignment order for categorical columns
    pub encoding: EncodingOrder,
    /// Missing-value strategy; defaults to `keep`, or `constant` when `fill_value` is set
    pub missing: Option<MissingStrategy>,
    /// Sentinel used by the `constant` strategy
    pub fill_value: Option<f64>,
    /// Text markers treated as missing (compared after trimming)
    pub na_values: Vec<String>,
    /// Code text columns that are not listed in `categorical`
    pub auto_categorical: bool,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            categorical: Vec::new(),
            exclude: Vec::new(),
            encoding: EncodingOrder::default(),
            missing: None,
            fill_value: None,
            na_values: Vec::new(),
            auto_categorical: true,
        }
    }
}

impl TransformConfig {
    /// Parse a configuration from a JSON object.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let trimmed = json.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(trimmed)
            .map_err(|e| PipelineError::Config(format!("invalid transform options: {}", e)))
    }

    /// Resolve `missing` and `fill_value` into a single policy.
    pub fn missing_policy(&self) -> Result<MissingPolicy, PipelineError> {
        if let Some(value) = self.fill_value {
            if !value.is_finite() {
                return Err(PipelineError::Config(format!(
                    "fill_value must be a finite number, got {}",
                    value
                )));
            }
        }

        match (self.missing, self.fill_value) {
            (None, None) | (Some(MissingStrategy::Keep), None) => Ok(MissingPolicy::Keep),
            (None, Some(v)) | (Some(MissingStrategy::Constant), Some(v)) => {
                Ok(MissingPolicy::Constant(v))
            }
            (Some(MissingStrategy::Constant), None) => Err(PipelineError::Config(
                "missing strategy 'constant' requires a fill_value".to_string(),
            )),
            (Some(MissingStrategy::Zero), None) => Ok(MissingPolicy::Constant(0.0)),
            (Some(MissingStrategy::Mean), None) => Ok(MissingPolicy::Mean),
            (Some(MissingStrategy::Median), None) => Ok(MissingPolicy::Median),
            (Some(strategy), Some(_)) => Err(PipelineError::Config(format!(
                "fill_value is only valid with the 'constant' missing strategy, got '{}'",
                serde_json::to_value(strategy)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default()
            ))),
        }
    }

    /// Check every referenced column against the table's columns.
    ///
    /// Fails on the first name the table does not have, or on a column
    /// that is both categorical and excluded.
    pub fn validate_columns(&self, available: &[String]) -> Result<(), PipelineError> {
        let known: HashSet<&str> = available.iter().map(String::as_str).collect();

        for (option, names) in [("categorical", &self.categorical), ("exclude", &self.exclude)] {
            if let Some(missing) = names.iter().find(|n| !known.contains(n.as_str())) {
                return Err(PipelineError::Config(format!(
                    "{} column '{}' not found in table. Available columns: {:?}",
                    option, missing, available
                )));
            }
        }

        let excluded: HashSet<&str> = self.exclude.iter().map(String::as_str).collect();
        if let Some(both) = self
            .categorical
            .iter()
            .find(|n| excluded.contains(n.as_str()))
        {
            return Err(PipelineError::Config(format!(
                "column '{}' is listed as both categorical and excluded",
                both
            )));
        }

        Ok(())
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    pub fn is_excluded(&self, column: &str) -> bool {
        self.exclude.iter().any(|c| c == column)
    }
}
