//! Command-line argument definitions using clap

use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::{LoadOptions, PipelineError, PipelineJob, TransformConfig};

/// numerize - Coerce the columns of a tabular data file to numbers
#[derive(Parser, Debug)]
#[command(name = "numerize")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory the input file name is resolved against
    pub working_directory: PathBuf,

    /// Input file name (CSV, TSV or Parquet)
    pub input_filename: PathBuf,

    /// Transform options as a JSON object.
    /// Keys: categorical, exclude, encoding ("ordinal" | "sorted"),
    /// missing ("keep" | "constant" | "mean" | "median" | "zero"),
    /// fill_value, na_values, auto_categorical.
    /// Example: '{"categorical": ["color"], "fill_value": -1}'
    pub json_config: String,

    /// Output file path (CSV by default, TSV or Parquet by extension).
    /// Defaults to 'numeric_file.csv' in the working directory.
    pub output_path: Option<PathBuf>,

    /// Number of rows to use for schema inference (CSV/TSV only).
    /// Use 0 for full table scan.
    #[arg(long, default_value = "10000")]
    pub infer_schema_length: usize,

    /// Write the value -> code mapping of encoded columns to this JSON file
    #[arg(long)]
    pub mapping: Option<PathBuf>,

    /// Skip the per-column summary table
    #[arg(long, default_value = "false")]
    pub no_summary: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Build the pipeline job, parsing the JSON options.
    pub fn job(&self) -> Result<PipelineJob, PipelineError> {
        let config = TransformConfig::from_json(&self.json_config)?;
        let mut job = PipelineJob::new(&self.working_directory, &self.input_filename, config)
            .with_load_options(LoadOptions {
                infer_schema_length: self.infer_schema_length,
            });
        if let Some(output) = &self.output_path {
            job = job.with_output(output);
        }
        Ok(job)
    }
}
