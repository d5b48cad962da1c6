//! Ship-Tally: a polite relationship-tag census
//!
//! This crate enumerates every pairing of a character roster, derives the archive's
//! canonical relationship tag for each pairing, and counts how many works (and how many
//! explicit works) the archive's search reports for that tag, pacing requests so the
//! remote rate limiter is never tripped.

pub mod config;
pub mod crawler;
pub mod output;
pub mod roster;
pub mod state;
pub mod wrangler;

use thiserror::Error;

/// Main error type for Ship-Tally operations
#[derive(Debug, Error)]
pub enum TallyError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Roster-specific errors
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("Failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Roster is empty")]
    Empty,

    #[error("Duplicate character name in roster: {0}")]
    Duplicate(String),
}

/// Result type alias for Ship-Tally operations
pub type Result<T> = std::result::Result<T, TallyError>;

// Re-export commonly used types
pub use config::Config;
pub use roster::{enumerate_pairings, load_roster, Pairing};
pub use state::{CountResult, CrawlPhase, RunOutcome, RunState, RunStatus};
pub use wrangler::{FandomClassifier, FandomLabel, TagWrangler};
