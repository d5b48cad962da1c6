//! Work count fetcher
//!
//! This module turns a canonical tag into a work count:
//! - building the exact-phrase search query, optionally filtered to explicit works
//! - issuing it through the archive session (which owns retries)
//! - classifying the response: count, rate limited, or unexpected

use crate::crawler::parser::{parse_work_count, WorkCount};
use crate::crawler::session::ArchiveSession;
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

/// Search form field holding the query text
pub const SEARCH_FIELD_QUERY: &str = "work_search[query]";

/// Search form field holding the rating filter
pub const SEARCH_FIELD_RATING: &str = "work_search[rating_ids]";

/// Errors raised while counting works for a tag
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited while counting {tag:?}: {reason}")]
    RateLimited { tag: String, reason: String },

    #[error("HTTP error while counting {tag:?}: {source}")]
    Http {
        tag: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP {status} while counting {tag:?}")]
    Status { tag: String, status: u16 },

    #[error("could not read work count for {tag:?}: {message}")]
    Parse { tag: String, message: String },
}

impl FetchError {
    /// True for the one failure that ends a run gracefully
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Anything that can answer "how many works carry this tag"
///
/// The crawl controller only talks to this trait, so tests can count calls on a stub
/// instead of standing up an HTTP server.
#[async_trait]
pub trait CountSource: Send + Sync {
    async fn fetch_count(&self, tag: &str, explicit_only: bool) -> Result<u64, FetchError>;
}

/// Builds the search query for a tag
///
/// The tag is wrapped in double quotes so the archive matches the exact phrase.
pub fn search_query(
    tag: &str,
    explicit_only: bool,
    explicit_rating_id: u32,
) -> Vec<(&'static str, String)> {
    let mut query = vec![(SEARCH_FIELD_QUERY, format!("\"{}\"", tag))];
    if explicit_only {
        query.push((SEARCH_FIELD_RATING, explicit_rating_id.to_string()));
    }
    query
}

/// Counts works on the live archive
pub struct ArchiveFetcher {
    session: ArchiveSession,
    explicit_rating_id: u32,
}

impl ArchiveFetcher {
    pub fn new(session: ArchiveSession, explicit_rating_id: u32) -> Self {
        Self {
            session,
            explicit_rating_id,
        }
    }

    pub fn session(&self) -> &ArchiveSession {
        &self.session
    }
}

#[async_trait]
impl CountSource for ArchiveFetcher {
    /// Fetches the work count for a tag
    ///
    /// # Response handling
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | HTTP 429 (after retries) | RateLimited |
    /// | Other non-2xx | Status |
    /// | No `div#main` | RateLimited |
    /// | No count heading | 0 |
    /// | Count heading | the count |
    async fn fetch_count(&self, tag: &str, explicit_only: bool) -> Result<u64, FetchError> {
        let query = search_query(tag, explicit_only, self.explicit_rating_id);

        let response = self
            .session
            .search(&query)
            .await
            .map_err(|source| FetchError::Http {
                tag: tag.to_string(),
                source,
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited {
                tag: tag.to_string(),
                reason: "HTTP 429 after retries".to_string(),
            });
        }

        if !status.is_success() {
            return Err(FetchError::Status {
                tag: tag.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Http {
            tag: tag.to_string(),
            source,
        })?;

        match parse_work_count(&body) {
            Ok(WorkCount::Found(count)) => Ok(count),
            Ok(WorkCount::MissingMain) => {
                let excerpt: String = body.chars().take(500).collect();
                tracing::debug!(
                    "HTTP {} without #main for {:?}, treating as rate limited: {}",
                    status.as_u16(),
                    tag,
                    excerpt
                );
                Err(FetchError::RateLimited {
                    tag: tag.to_string(),
                    reason: "response has no main content".to_string(),
                })
            }
            Err(message) => Err(FetchError::Parse {
                tag: tag.to_string(),
                message,
            }),
        }
    }
}
