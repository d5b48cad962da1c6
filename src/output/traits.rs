//! Output handler traits and types
//!
//! This module defines the trait interface for output handlers and the associated
//! error type.

use crate::state::RunOutcome;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Malformed results file: {0}")]
    Format(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for persisting the outcome of a run
pub trait OutputHandler {
    /// Writes the outcome and returns where it went
    ///
    /// Partial outcomes must land somewhere a complete data set never does.
    fn write_outcome(&mut self, outcome: &RunOutcome) -> OutputResult<PathBuf>;
}
