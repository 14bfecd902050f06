//! Missing value detection and filling

use polars::prelude::*;

use super::config::MissingPolicy;

/// Whether a text cell counts as missing: blank after trimming, or equal to
/// one of the configured markers.
pub fn is_missing_marker(value: &str, markers: &[String]) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || markers.iter().any(|m| m.trim() == trimmed)
}

/// Replace missing markers in a text column with nulls.
///
/// Returns the new column and the number of cells that were nulled.
pub fn null_missing_markers(column: &Column, markers: &[String]) -> PolarsResult<(Column, usize)> {
    let ca = column.str()?;
    let mut marked = 0usize;
    let values: Vec<Option<&str>> = ca
        .into_iter()
        .map(|v| match v {
            Some(s) if is_missing_marker(s, markers) => {
                marked += 1;
                None
            }
            other => other,
        })
        .collect();

    if marked == 0 {
        return Ok((column.clone(), 0));
    }
    Ok((Column::new(column.name().clone(), values), marked))
}

/// Mean of the non-null, non-NaN values
pub fn mean(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Median of the non-null, non-NaN values
pub fn median(values: &[Option<f64>]) -> Option<f64> {
    let mut sorted: Vec<f64> = values
        .iter()
        .flatten()
        .copied()
        .filter(|v| !v.is_nan())
        .collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Fill the nulls of a numeric column according to `policy`.
///
/// `Mean`/`Median` leave the nulls of coded columns alone and always yield
/// Float64. A constant sentinel keeps integer columns integer when it is
/// integral.
///
/// Returns the (possibly new) column and the number of filled cells.
pub fn fill_missing(column: Column, policy: MissingPolicy, coded: bool) -> PolarsResult<(Column, usize)> {
    let nulls = column.null_count();
    if nulls == 0 {
        return Ok((column, 0));
    }

    let fill = match policy {
        MissingPolicy::Keep => return Ok((column, 0)),
        MissingPolicy::Constant(v) => v,
        MissingPolicy::Mean | MissingPolicy::Median if coded => return Ok((column, 0)),
        MissingPolicy::Mean | MissingPolicy::Median => {
            let values: Vec<Option<f64>> = column.cast(&DataType::Float64)?.f64()?.into_iter().collect();
            let stat = if policy == MissingPolicy::Mean {
                mean(&values)
            } else {
                median(&values)
            };
            match stat {
                Some(s) => s,
                // Nothing to derive a statistic from
                None => return Ok((column, 0)),
            }
        }
    };

    let name = column.name().clone();
    let integral = fill.fract() == 0.0 && fill >= i64::MIN as f64 && fill <= i64::MAX as f64;

    // UInt64 values above i64::MAX would not survive the Int64 cast
    let fits_i64 = column.dtype().is_integer() && column.dtype() != &DataType::UInt64;
    if fits_i64 && integral && matches!(policy, MissingPolicy::Constant(_)) {
        let ca = column.cast(&DataType::Int64)?;
        let values: Vec<i64> = ca
            .i64()?
            .into_iter()
            .map(|v| v.unwrap_or(fill as i64))
            .collect();
        return Ok((Column::new(name, values), nulls));
    }

    let ca = column.cast(&DataType::Float64)?;
    let values: Vec<f64> = ca.f64()?.into_iter().map(|v| v.unwrap_or(fill)).collect();
    Ok((Column::new(name, values), nulls))
}
