//! Pipeline stages and the progress-reporting seam

use std::fmt;

/// A step of a pipeline run, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    SettingDirectories,
    Loading,
    Transforming,
    Writing,
    Complete,
}

impl Stage {
    /// Console text announcing the stage.
    pub fn message(&self) -> &'static str {
        match self {
            Stage::SettingDirectories => "Setting directories...",
            Stage::Loading => "Loading Data...",
            Stage::Transforming => "Transforming Data...",
            Stage::Writing => "Writing file...",
            Stage::Complete => "Process Complete",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::SettingDirectories => "directories",
            Stage::Loading => "load",
            Stage::Transforming => "transform",
            Stage::Writing => "write",
            Stage::Complete => "complete",
        };
        write!(f, "{}", name)
    }
}

/// Receives stage notifications from [`run_pipeline`](super::run_pipeline).
///
/// Implementations decide how progress is shown; the pipeline itself never
/// writes to the console.
pub trait ProgressReporter {
    /// Called before a stage starts.
    fn stage_started(&self, stage: Stage);

    /// Called after a stage finished successfully, with a short detail line.
    fn stage_finished(&self, _stage: Stage, _detail: &str) {}
}

/// Reporter that discards every notification
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn stage_started(&self, _stage: Stage) {}
}
