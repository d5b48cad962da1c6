//! CSV-based output handler implementation
//!
//! Complete runs and aborted runs go to different files, so a partial result set can
//! never overwrite a complete one.

use crate::config::OutputConfig;
use crate::output::csv::write_results_file;
use crate::output::traits::{OutputHandler, OutputResult};
use crate::state::RunOutcome;
use std::path::PathBuf;

/// CSV-based output handler
pub struct CsvOutputHandler {
    complete_path: PathBuf,
    partial_path: PathBuf,
}

impl CsvOutputHandler {
    /// Creates a new CSV output handler
    ///
    /// # Arguments
    ///
    /// * `complete_path` - Destination when every pairing was counted
    /// * `partial_path` - Destination when the run stopped early
    pub fn new(complete_path: impl Into<PathBuf>, partial_path: impl Into<PathBuf>) -> Self {
        Self {
            complete_path: complete_path.into(),
            partial_path: partial_path.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.complete_path, &config.partial_path)
    }

    /// Where an outcome would be written
    pub fn destination(&self, outcome: &RunOutcome) -> &PathBuf {
        if outcome.is_partial() {
            &self.partial_path
        } else {
            &self.complete_path
        }
    }
}

impl OutputHandler for CsvOutputHandler {
    fn write_outcome(&mut self, outcome: &RunOutcome) -> OutputResult<PathBuf> {
        let path = self.destination(outcome).clone();
        write_results_file(&path, &outcome.results)?;

        if outcome.is_partial() {
            tracing::warn!(
                "Run incomplete: wrote {} of {} pairings to {}",
                outcome.results.len(),
                outcome.total_pairings,
                path.display()
            );
        } else {
            tracing::info!(
                "Wrote {} pairings to {}",
                outcome.results.len(),
                path.display()
            );
        }

        Ok(path)
    }
}
