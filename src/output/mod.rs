//! Output module for persisting count results and reports
//!
//! This module handles:
//! - Writing count results as CSV, to separate files for complete and partial runs
//! - Reading result files back for reporting
//! - Generating markdown summaries of a complete result set
//! - Aggregate run statistics

pub mod csv;
mod csv_output;
mod markdown;
pub mod stats;
mod traits;

pub use csv::{read_records, write_results_file, ShipRecord};
pub use csv_output::CsvOutputHandler;
pub use markdown::{
    build_summary, format_markdown_summary, generate_markdown_summary, top_ships, ShipSummary,
};
pub use stats::RunStatistics;
pub use traits::{OutputError, OutputHandler, OutputResult};
