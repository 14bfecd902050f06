//! Report module - summarizing transform results

pub mod mapping_export;
pub mod summary;

pub use mapping_export::*;
pub use summary::*;
