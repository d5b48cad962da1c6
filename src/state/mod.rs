//! State management for crawl runs
//!
//! This module provides the types used to track a crawl:
//! - CrawlPhase: the controller's state machine
//! - RunState: append-only results plus the cursor into the pairing list
//! - RunOutcome: what a finished or aborted run hands to persistence

mod crawl_phase;
mod run_state;

pub use crawl_phase::CrawlPhase;
pub use run_state::{CountResult, RunOutcome, RunState, RunStatus};
