//! Error types for the load -> transform -> write pipeline.
//!
//! Every variant names the stage that produced it, so the binary can report
//! where the run stopped without inspecting the message text.

use std::path::PathBuf;

use thiserror::Error;

use super::progress::Stage;

/// Errors that abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Input file missing, unreadable, of an unsupported format, or not a
    /// rectangular table. Also raised for an invalid working directory.
    #[error("load error: {path}: {message}")]
    Load { path: PathBuf, message: String },

    /// Invalid JSON, unknown option, or a reference to a column the table
    /// does not have.
    #[error("config error: {0}")]
    Config(String),

    /// A column cannot be coerced under the active policy.
    #[error("transform error in column '{column}': {message}")]
    Transform { column: String, message: String },

    /// Output could not be persisted.
    #[error("write error: {path}: {message}")]
    Write { path: PathBuf, message: String },
}

impl PipelineError {
    pub(crate) fn load(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        PipelineError::Load {
            path: path.into(),
            message: message.to_string(),
        }
    }

    pub(crate) fn transform(column: &str, message: impl ToString) -> Self {
        PipelineError::Transform {
            column: column.to_string(),
            message: message.to_string(),
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        PipelineError::Write {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// The pipeline stage this error aborted.
    pub fn stage(&self) -> Stage {
        match self {
            PipelineError::Load { .. } => Stage::Loading,
            PipelineError::Config(_) | PipelineError::Transform { .. } => Stage::Transforming,
            PipelineError::Write { .. } => Stage::Writing,
        }
    }
}
