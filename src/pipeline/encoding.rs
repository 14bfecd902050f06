//! Categorical code assignment
//!
//! Maps each distinct non-null value of a column to an integer code in
//! `0..n`. Equal values share a code, distinct values never do, and nulls
//! are never coded.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use super::config::EncodingOrder;

/// Float wrapper usable as a category key.
///
/// `-0.0` and `0.0` are the same category, as are all NaN payloads.
/// Ordering follows `f64::total_cmp` on the normalized value.
#[derive(Debug, Clone, Copy)]
pub struct NumericKey(f64);

impl NumericKey {
    pub fn new(value: f64) -> Self {
        if value == 0.0 {
            NumericKey(0.0)
        } else if value.is_nan() {
            NumericKey(f64::NAN)
        } else {
            NumericKey(value)
        }
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl PartialEq for NumericKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for NumericKey {}

impl Hash for NumericKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for NumericKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumericKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for NumericKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of coding one column
#[derive(Debug, Clone, PartialEq)]
pub struct Encoded<K> {
    /// One code per input row; `None` where the input was null
    pub codes: Vec<Option<i64>>,
    /// Distinct values in code order: `categories[code]` is the original value
    pub categories: Vec<K>,
}

/// Assign integer codes to a sequence of optional values.
///
/// With [`EncodingOrder::Ordinal`] codes follow first appearance; with
/// [`EncodingOrder::Sorted`] they follow the keys' `Ord`.
pub fn encode<K, I>(values: I, order: EncodingOrder) -> Encoded<K>
where
    K: Eq + Hash + Ord + Clone,
    I: IntoIterator<Item = Option<K>>,
{
    let values: Vec<Option<K>> = values.into_iter().collect();

    let mut categories: Vec<K> = Vec::new();
    let mut codes: HashMap<K, i64> = HashMap::new();
    for value in values.iter().flatten() {
        if !codes.contains_key(value) {
            codes.insert(value.clone(), categories.len() as i64);
            categories.push(value.clone());
        }
    }

    if order == EncodingOrder::Sorted {
        categories.sort();
        for (code, category) in categories.iter().enumerate() {
            codes.insert(category.clone(), code as i64);
        }
    }

    let codes = values
        .iter()
        .map(|v| v.as_ref().and_then(|k| codes.get(k).copied()))
        .collect();

    Encoded { codes, categories }
}
