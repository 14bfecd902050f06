//! Progress helpers using indicatif, and the console progress reporter

use std::cell::RefCell;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::pipeline::{ProgressReporter, Stage};

/// Create a spinner for indeterminate progress
pub fn create_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        pb.set_style(spinner_style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "));
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

/// Finish a progress bar with a success message
pub fn finish_with_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("{} {}", style("✓").green(), message));
}

/// Prints each stage to stdout and spins while it runs
#[derive(Default)]
pub struct ConsoleReporter {
    spinner: RefCell<Option<ProgressBar>>,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressReporter for ConsoleReporter {
    fn stage_started(&self, stage: Stage) {
        if let Some(previous) = self.spinner.borrow_mut().take() {
            previous.finish_and_clear();
        }

        match stage {
            Stage::Complete => println!("{}", style(stage.message()).green().bold()),
            _ => println!("{}", style(stage.message()).cyan().bold()),
        }

        let working = match stage {
            Stage::Loading => Some("Reading input..."),
            Stage::Transforming => Some("Coercing columns..."),
            Stage::Writing => Some("Writing output..."),
            Stage::SettingDirectories | Stage::Complete => None,
        };
        if let Some(message) = working {
            *self.spinner.borrow_mut() = Some(create_spinner(message));
        }
    }

    fn stage_finished(&self, _stage: Stage, detail: &str) {
        match self.spinner.borrow_mut().take() {
            Some(pb) => finish_with_success(&pb, detail),
            None => println!("  {}", style(detail).dim()),
        }
    }
}

impl Drop for ConsoleReporter {
    fn drop(&mut self) {
        // A failed stage never reports finished
        if let Some(pb) = self.spinner.get_mut().take() {
            pb.abandon();
        }
    }
}
