//! Load -> transform -> write, stage by stage

use std::path::{Path, PathBuf};

use super::config::TransformConfig;
use super::error::PipelineError;
use super::loader::{load_table, LoadOptions};
use super::progress::{ProgressReporter, Stage};
use super::transform::{transform, TransformReport};
use super::writer::write_table;

/// Output file name used when no output path is given
pub const DEFAULT_OUTPUT_FILE: &str = "numeric_file.csv";

/// Everything one pipeline run needs
#[derive(Debug, Clone)]
pub struct PipelineJob {
    pub working_dir: PathBuf,
    pub input: PathBuf,
    pub config: TransformConfig,
    pub output: Option<PathBuf>,
    pub load_options: LoadOptions,
}

impl PipelineJob {
    pub fn new(working_dir: impl Into<PathBuf>, input: impl Into<PathBuf>, config: TransformConfig) -> Self {
        Self {
            working_dir: working_dir.into(),
            input: input.into(),
            config,
            output: None,
            load_options: LoadOptions::default(),
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_load_options(mut self, options: LoadOptions) -> Self {
        self.load_options = options;
        self
    }

    /// Destination file, defaulting to `numeric_file.csv` in the working directory.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| self.working_dir.join(DEFAULT_OUTPUT_FILE))
    }
}

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub report: TransformReport,
}

/// Run the whole pipeline, reporting each stage.
///
/// The first failing stage aborts the run; later stages never start.
pub fn run_pipeline(job: &PipelineJob, reporter: &dyn ProgressReporter) -> Result<RunOutcome, PipelineError> {
    let span = tracing::info_span!("pipeline", input = %job.input.display());
    let _guard = span.enter();

    enter(reporter, Stage::SettingDirectories);
    check_working_dir(&job.working_dir)?;
    let output_path = job.output_path();
    reporter.stage_finished(
        Stage::SettingDirectories,
        &format!("Working directory {}", job.working_dir.display()),
    );

    enter(reporter, Stage::Loading);
    let loaded = load_table(&job.working_dir, &job.input, &job.load_options)?;
    let mut df = loaded.df;
    reporter.stage_finished(
        Stage::Loading,
        &format!("Loaded {} rows x {} columns", loaded.rows, loaded.cols),
    );

    enter(reporter, Stage::Transforming);
    let report = transform(&mut df, &job.config)?;
    reporter.stage_finished(Stage::Transforming, &report.to_string());

    enter(reporter, Stage::Writing);
    write_table(&mut df, &output_path)?;
    reporter.stage_finished(
        Stage::Writing,
        &format!("Saved to {}", output_path.display()),
    );

    enter(reporter, Stage::Complete);

    Ok(RunOutcome {
        input_path: loaded.path,
        output_path,
        report,
    })
}

fn enter(reporter: &dyn ProgressReporter, stage: Stage) {
    tracing::info!(stage = %stage, "{}", stage.message());
    reporter.stage_started(stage);
}

fn check_working_dir(dir: &Path) -> Result<(), PipelineError> {
    if !dir.exists() {
        return Err(PipelineError::load(dir, "working directory not found"));
    }
    if !dir.is_dir() {
        return Err(PipelineError::load(dir, "working directory is not a directory"));
    }
    Ok(())
}
