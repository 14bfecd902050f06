//! Column-wise coercion of a table to numeric form
//!
//! The transform runs in two phases. Every included column is first planned
//! into a replacement column without touching the table; only when all
//! columns planned successfully are the replacements written back. A failed
//! transform therefore leaves the table exactly as it was.

use std::fmt;
use std::hash::Hash;

use polars::prelude::*;
use serde::Serialize;

use super::config::{MissingPolicy, TransformConfig};
use super::encoding::{encode, Encoded, NumericKey};
use super::error::PipelineError;
use super::missing::{fill_missing, null_missing_markers};

/// What the transform did to a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnAction {
    /// Listed in `exclude`; left untouched
    Excluded,
    /// Already numeric
    Unchanged,
    /// Values replaced by integer category codes
    Encoded,
    /// Numeric text parsed to numbers
    Parsed,
    /// Booleans, temporals, decimals or an all-null column cast to numbers
    Cast,
}

impl fmt::Display for ColumnAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ColumnAction::Excluded => "excluded",
            ColumnAction::Unchanged => "unchanged",
            ColumnAction::Encoded => "encoded",
            ColumnAction::Parsed => "parsed",
            ColumnAction::Cast => "cast",
        };
        write!(f, "{}", label)
    }
}

/// Per-column result of a transform
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnOutcome {
    pub column: String,
    pub action: ColumnAction,
    /// Data type before the transform
    pub source_dtype: String,
    /// Data type after the transform
    pub dtype: String,
    /// Text cells turned into nulls by missing markers
    pub nulls_marked: usize,
    /// Null cells replaced by the missing-value policy
    pub nulls_filled: usize,
    /// Original values in code order, for encoded columns
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
}

impl ColumnOutcome {
    /// Whether the column's content changed
    pub fn changed(&self) -> bool {
        !matches!(self.action, ColumnAction::Excluded | ColumnAction::Unchanged)
            || self.nulls_marked > 0
            || self.nulls_filled > 0
    }
}

/// Summary of a transform, one entry per column in table order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TransformReport {
    pub rows: usize,
    pub columns: Vec<ColumnOutcome>,
}

impl TransformReport {
    pub fn outcome(&self, column: &str) -> Option<&ColumnOutcome> {
        self.columns.iter().find(|c| c.column == column)
    }

    pub fn count(&self, action: ColumnAction) -> usize {
        self.columns.iter().filter(|c| c.action == action).count()
    }

    pub fn encoded(&self) -> impl Iterator<Item = &ColumnOutcome> {
        self.columns
            .iter()
            .filter(|c| c.action == ColumnAction::Encoded)
    }

    pub fn total_filled(&self) -> usize {
        self.columns.iter().map(|c| c.nulls_filled).sum()
    }
}

/// Coerce every included column of `df` to numeric form, in place.
///
/// Fails with [`PipelineError::Config`] before touching the table when the
/// configuration is inconsistent or names a column the table lacks, and with
/// [`PipelineError::Transform`] when a column cannot be coerced. In both
/// cases `df` is unmodified.
pub fn transform(df: &mut DataFrame, config: &TransformConfig) -> Result<TransformReport, PipelineError> {
    let policy = config.missing_policy()?;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();
    config.validate_columns(&names)?;

    let mut replacements: Vec<Column> = Vec::new();
    let mut report = TransformReport {
        rows: df.height(),
        columns: Vec::with_capacity(names.len()),
    };

    for name in &names {
        let column = df
            .column(name)
            .map_err(|e| PipelineError::transform(name, e))?;

        if config.is_excluded(name) {
            let dtype = column.dtype().to_string();
            report.columns.push(ColumnOutcome {
                column: name.clone(),
                action: ColumnAction::Excluded,
                source_dtype: dtype.clone(),
                dtype,
                nulls_marked: 0,
                nulls_filled: 0,
                categories: None,
            });
            continue;
        }

        let (replacement, outcome) = plan_column(column, config, policy)?;
        tracing::debug!(
            column = %outcome.column,
            action = %outcome.action,
            dtype = %outcome.dtype,
            nulls_filled = outcome.nulls_filled,
            "planned column"
        );
        if outcome.changed() {
            replacements.push(replacement);
        }
        report.columns.push(outcome);
    }

    for column in replacements {
        let name = column.name().to_string();
        df.with_column(column)
            .map_err(|e| PipelineError::transform(&name, e))?;
    }

    tracing::info!(
        rows = report.rows,
        encoded = report.count(ColumnAction::Encoded),
        parsed = report.count(ColumnAction::Parsed),
        excluded = report.count(ColumnAction::Excluded),
        filled = report.total_filled(),
        "transform complete"
    );

    Ok(report)
}

/// Compute the replacement for one column without touching the table.
fn plan_column(
    column: &Column,
    config: &TransformConfig,
    policy: MissingPolicy,
) -> Result<(Column, ColumnOutcome), PipelineError> {
    let name = column.name().to_string();
    let polars_err = |e: PolarsError| PipelineError::transform(&name, e);
    let source_dtype = column.dtype().clone();

    let (working, nulls_marked) = if source_dtype == DataType::String {
        null_missing_markers(column, &config.na_values).map_err(polars_err)?
    } else {
        (column.clone(), 0)
    };

    let (coerced, action, categories) = if config.is_categorical(&name) {
        let sentinel = match policy {
            MissingPolicy::Constant(v) => Some(v),
            _ => None,
        };
        let (coded, categories) = encode_column(&working, config, sentinel)?;
        (coded, ColumnAction::Encoded, Some(categories))
    } else {
        let dtype = working.dtype().clone();
        match &dtype {
            dt if dt.is_primitive_numeric() => (working, ColumnAction::Unchanged, None),
            DataType::Boolean | DataType::Decimal(_, _) | DataType::Null => {
                let target = if dtype == DataType::Boolean {
                    DataType::Int64
                } else {
                    DataType::Float64
                };
                let cast = working.cast(&target).map_err(polars_err)?;
                (cast, ColumnAction::Cast, None)
            }
            dt if dt.is_temporal() => {
                let cast = working.cast(&DataType::Int64).map_err(polars_err)?;
                (cast, ColumnAction::Cast, None)
            }
            DataType::String => match parse_numeric_text(&working).map_err(polars_err)? {
                Some(parsed) => (parsed, ColumnAction::Parsed, None),
                None if config.auto_categorical => {
                    let (coded, categories) = encode_column(&working, config, None)?;
                    (coded, ColumnAction::Encoded, Some(categories))
                }
                None => return Err(non_numeric_error(&working)),
            },
            DataType::Categorical(_, _) | DataType::Enum(_, _) if config.auto_categorical => {
                let (coded, categories) = encode_column(&working, config, None)?;
                (coded, ColumnAction::Encoded, Some(categories))
            }
            other => {
                return Err(PipelineError::transform(
                    &name,
                    format!("cannot coerce values of type {} to numeric", other),
                ))
            }
        }
    };

    let coded = action == ColumnAction::Encoded;
    if coded {
        let n_categories = categories.as_ref().map_or(0, Vec::len);
        check_coded_fill(&name, &coerced, n_categories, config, policy)?;
    }
    let (filled, nulls_filled) = fill_missing(coerced, policy, coded).map_err(polars_err)?;

    let outcome = ColumnOutcome {
        column: name.clone(),
        action,
        source_dtype: source_dtype.to_string(),
        dtype: filled.dtype().to_string(),
        nulls_marked,
        nulls_filled,
        categories,
    };
    Ok((filled, outcome))
}

/// Replace a column's values with category codes.
///
/// Numeric columns are keyed by numeric value so that `sorted` order is
/// numeric order. In a numeric column, cells equal to `sentinel` count as
/// missing, which keeps a previously filled coded column stable.
fn encode_column(
    column: &Column,
    config: &TransformConfig,
    sentinel: Option<f64>,
) -> Result<(Column, Vec<String>), PipelineError> {
    let name = column.name().clone();
    let polars_err = |e: PolarsError| PipelineError::transform(name.as_str(), e);
    let order = config.encoding;

    let (codes, categories) = match column.dtype() {
        DataType::String => {
            let ca = column.str().map_err(polars_err)?;
            split(encode(ca.into_iter(), order))
        }
        DataType::Boolean => {
            let ca = column.bool().map_err(polars_err)?;
            split(encode(ca.into_iter(), order))
        }
        DataType::UInt64 => {
            let ca = column.u64().map_err(polars_err)?;
            let sentinel = sentinel.filter(|s| *s >= 0.0 && s.fract() == 0.0).map(|s| s as u64);
            split(encode(
                ca.into_iter().map(|v| v.filter(|x| Some(*x) != sentinel)),
                order,
            ))
        }
        dt if dt.is_integer() || dt.is_temporal() => {
            let cast = column.cast(&DataType::Int64).map_err(polars_err)?;
            let ca = cast.i64().map_err(polars_err)?;
            let sentinel = sentinel.filter(|s| s.fract() == 0.0).map(|s| s as i64);
            split(encode(
                ca.into_iter().map(|v| v.filter(|x| Some(*x) != sentinel)),
                order,
            ))
        }
        dt if dt.is_float() || matches!(dt, DataType::Decimal(_, _)) => {
            let cast = column.cast(&DataType::Float64).map_err(polars_err)?;
            let ca = cast.f64().map_err(polars_err)?;
            split(encode(
                ca.into_iter()
                    .map(|v| v.filter(|x| Some(*x) != sentinel).map(NumericKey::new)),
                order,
            ))
        }
        DataType::Null => (vec![None; column.len()], Vec::new()),
        DataType::Categorical(_, _) | DataType::Enum(_, _) => {
            let cast = column.cast(&DataType::String).map_err(polars_err)?;
            let ca = cast.str().map_err(polars_err)?;
            split(encode(ca.into_iter(), order))
        }
        other => {
            return Err(PipelineError::transform(
                name.as_str(),
                format!("cannot encode values of type {} as categories", other),
            ))
        }
    };

    Ok((Column::new(name, codes), categories))
}

fn split<K: fmt::Display + Eq + Hash + Ord + Clone>(encoded: Encoded<K>) -> (Vec<Option<i64>>, Vec<String>) {
    let labels = encoded.categories.iter().map(|k| k.to_string()).collect();
    (encoded.codes, labels)
}

/// Parse a text column whose every non-null value is a number.
///
/// Yields Int64 when all values are integer literals, Float64 otherwise, and
/// `None` when any value is not numeric.
fn parse_numeric_text(column: &Column) -> PolarsResult<Option<Column>> {
    let ca = column.str()?;
    let name = column.name().clone();

    if ca.null_count() == ca.len() {
        return Ok(Some(Column::new(name, vec![None::<f64>; ca.len()])));
    }

    let ints: Option<Vec<Option<i64>>> = ca
        .into_iter()
        .map(|v| match v {
            Some(s) => s.trim().parse::<i64>().ok().map(Some),
            None => Some(None),
        })
        .collect();
    if let Some(ints) = ints {
        return Ok(Some(Column::new(name, ints)));
    }

    let floats: Option<Vec<Option<f64>>> = ca
        .into_iter()
        .map(|v| match v {
            Some(s) => s.trim().parse::<f64>().ok().map(Some),
            None => Some(None),
        })
        .collect();
    Ok(floats.map(|f| Column::new(name, f)))
}

/// Reject fills whose result a second run could not reproduce.
///
/// A whole-number sentinel in `0..n_categories` is indistinguishable from a
/// category code once written. `Mean`/`Median` leave a coded column's nulls in
/// place, so an auto-coded column with nulls would be filled on the next run,
/// when it is plain integers.
fn check_coded_fill(
    name: &str,
    coded: &Column,
    n_categories: usize,
    config: &TransformConfig,
    policy: MissingPolicy,
) -> Result<(), PipelineError> {
    let listed = config.is_categorical(name);
    let has_nulls = coded.null_count() > 0;

    match policy {
        MissingPolicy::Constant(v)
            if (listed || has_nulls) && v.fract() == 0.0 && v >= 0.0 && v < n_categories as f64 =>
        {
            Err(PipelineError::transform(
                name,
                format!(
                    "fill_value {} collides with category code {} of {} codes; \
                     use a negative or fractional fill_value",
                    v, v as i64, n_categories
                ),
            ))
        }
        MissingPolicy::Mean | MissingPolicy::Median if !listed && has_nulls => {
            Err(PipelineError::Config(format!(
                "missing strategy '{}' cannot fill column '{}': it is coded as categories \
                 and has missing values; list it under 'categorical' or 'exclude', \
                 or use a constant fill_value",
                policy, name
            )))
        }
        _ => Ok(()),
    }
}

/// Build the error for a text column that is neither numeric nor allowed to be coded
fn non_numeric_error(column: &Column) -> PipelineError {
    let name = column.name().to_string();
    let offending = column.str().ok().and_then(|ca| {
        ca.into_iter()
            .enumerate()
            .find_map(|(row, v)| match v {
                Some(s) if s.trim().parse::<f64>().is_err() => Some((row, s.to_string())),
                _ => None,
            })
    });

    match offending {
        Some((row, value)) => PipelineError::transform(
            &name,
            format!(
                "non-numeric value '{}' at row {} and auto_categorical is disabled; \
                 list the column under 'categorical' or 'exclude'",
                value, row
            ),
        ),
        None => PipelineError::transform(&name, "column is not numeric"),
    }
}

impl fmt::Display for TransformReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} rows, {} columns ({} encoded, {} parsed, {} cast, {} excluded)",
            self.rows,
            self.columns.len(),
            self.count(ColumnAction::Encoded),
            self.count(ColumnAction::Parsed),
            self.count(ColumnAction::Cast),
            self.count(ColumnAction::Excluded),
        )
    }
}
