//! numerize: Tabular Data Coercion Library
//!
//! Loads tabular files, coerces their columns to numeric form (category
//! codes, parsed numeric text, missing-value fills) and writes the result.

pub mod cli;
pub mod pipeline;
pub mod report;
pub mod utils;
