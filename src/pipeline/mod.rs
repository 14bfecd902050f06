//! Pipeline module - load, transform and write a table

pub mod config;
pub mod encoding;
pub mod error;
pub mod loader;
pub mod missing;
pub mod progress;
pub mod runner;
pub mod transform;
pub mod writer;

pub use config::*;
pub use encoding::*;
pub use error::*;
pub use loader::*;
pub use missing::*;
pub use progress::*;
pub use runner::*;
pub use transform::*;
pub use writer::*;
