//! numerize: Tabular Data Coercion CLI Tool
//!
//! Loads a CSV, TSV or Parquet file, coerces its columns to numbers and
//! writes the result as a delimited file.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use numerize::cli::Cli;
use numerize::pipeline::run_pipeline;
use numerize::report::{export_mappings, ExportParams, TransformSummary};
use numerize::utils::{
    init_logging, level_from_flags, print_banner, print_completion, print_config, print_info,
    ConsoleReporter,
};

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(level_from_flags(cli.verbose, cli.quiet)) {
        eprintln!("error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let job = cli.job()?;
    let missing = job.config.missing_policy()?;

    print_banner(env!("CARGO_PKG_VERSION"));
    print_config(
        &job.working_dir.join(&job.input),
        &job.output_path(),
        &job.config.encoding.to_string(),
        &missing.to_string(),
    );

    let reporter = ConsoleReporter::new();
    let outcome = run_pipeline(&job, &reporter)
        .inspect_err(|e| tracing::error!(stage = %e.stage(), "pipeline aborted"))?;

    if !cli.no_summary {
        TransformSummary::new(&outcome.report).display();
    }

    if let Some(mapping_path) = &cli.mapping {
        let params = ExportParams {
            input_file: &outcome.input_path,
            output_file: &outcome.output_path,
            encoding: job.config.encoding,
            missing,
        };
        export_mappings(&outcome.report, mapping_path, &params)?;
        print_info(&format!(
            "Category mappings written to {}",
            mapping_path.display()
        ));
    }

    print_completion(&outcome.output_path);

    Ok(())
}
