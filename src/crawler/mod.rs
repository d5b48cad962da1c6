//! Crawler module for counting works per pairing
//!
//! This module contains the core crawling logic, including:
//! - Session setup and login
//! - Transport-level retry with exponential backoff
//! - Search result parsing
//! - The paced, rate-limit-aware crawl loop

mod coordinator;
mod fetcher;
mod parser;
mod retry;
mod session;

pub use coordinator::Coordinator;
pub use fetcher::{
    search_query, ArchiveFetcher, CountSource, FetchError, SEARCH_FIELD_QUERY,
    SEARCH_FIELD_RATING,
};
pub use parser::{extract_authenticity_token, parse_work_count, WorkCount};
pub use retry::{parse_retry_after, RetryPolicy};
pub use session::{build_http_client, ArchiveSession};

use crate::config::{Config, Credentials};
use crate::roster::Pairing;
use crate::state::RunOutcome;
use crate::wrangler::TagWrangler;
use crate::TallyError;

/// Builds a live coordinator from configuration
///
/// This will:
/// 1. Build the HTTP client
/// 2. Log in when credentials are given, otherwise stay anonymous
/// 3. Wire the archive fetcher and tag wrangler into a coordinator
///
/// # Returns
///
/// * `Ok(Coordinator)` - Ready to run
/// * `Err(TallyError)` - Client construction or login failed
pub async fn connect(
    config: &Config,
    credentials: Option<&Credentials>,
) -> Result<Coordinator<ArchiveFetcher>, TallyError> {
    let client = build_http_client(&config.user_agent)?;
    let session = ArchiveSession::connect(
        client,
        &config.archive,
        RetryPolicy::from_config(&config.retry),
        credentials,
    )
    .await?;

    Ok(Coordinator::new(
        ArchiveFetcher::new(session, config.archive.explicit_rating_id),
        TagWrangler::from_config(&config.wrangling),
        config.crawler.pacing_interval(),
    ))
}

/// Runs a complete crawl over `pairings`
///
/// # Example
///
/// ```no_run
/// use ship_tally::config::load_config;
/// use ship_tally::crawler::crawl;
/// use ship_tally::roster::{enumerate_pairings, load_roster};
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("config.toml"))?;
/// let roster = load_roster(Path::new(&config.crawler.roster_path))?;
/// let outcome = crawl(&config, None, &enumerate_pairings(&roster)).await?;
/// println!("{} results", outcome.results.len());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    config: &Config,
    credentials: Option<&Credentials>,
    pairings: &[Pairing],
) -> Result<RunOutcome, TallyError> {
    let mut coordinator = connect(config, credentials).await?;
    coordinator.run(pairings).await
}
