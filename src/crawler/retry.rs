//! Transport-level retry policy for rate-limited responses
//!
//! The archive answers 429 when it wants us to slow down. Those responses are retried
//! here with exponential backoff before the caller ever sees them:
//!
//! | Retry | Delay |
//! |-------|-------|
//! | 1 | factor |
//! | 2 | factor * 2 |
//! | n | min(factor * 2^(n-1), max backoff) |
//!
//! A `Retry-After` header on a retryable response replaces the computed delay and is
//! waited out in full. Once retries run out, the last response is returned
//! unchanged and the fetcher decides what it means.

use crate::config::RetryConfig;
use chrono::{DateTime, Utc};
use reqwest::header::RETRY_AFTER;
use reqwest::{RequestBuilder, Response, StatusCode};
use std::time::Duration;

/// Retry/backoff settings for outbound requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    backoff_factor: Duration,
    max_backoff: Duration,
    status_forcelist: Vec<u16>,
}

impl RetryPolicy {
    pub fn new(
        max_retries: u32,
        backoff_factor: Duration,
        max_backoff: Duration,
        status_forcelist: Vec<u16>,
    ) -> Self {
        Self {
            max_retries,
            backoff_factor,
            max_backoff,
            status_forcelist,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.total,
            Duration::from_millis(config.backoff_factor),
            Duration::from_millis(config.max_backoff),
            config.status_forcelist.clone(),
        )
    }

    /// A policy that never retries
    pub fn none() -> Self {
        Self::new(0, Duration::ZERO, Duration::ZERO, Vec::new())
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Returns true if a response with this status should be retried
    pub fn is_retryable(&self, status: StatusCode) -> bool {
        self.status_forcelist.contains(&status.as_u16())
    }

    /// Backoff before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry == 0 {
            return Duration::ZERO;
        }
        let multiplier = 2u32.saturating_pow(retry - 1);
        self.backoff_factor
            .saturating_mul(multiplier)
            .min(self.max_backoff)
    }

    /// Delay before retry number `retry`
    ///
    /// A server-provided `Retry-After` is waited out in full; `max_backoff` only bounds
    /// the computed backoff.
    pub fn delay_for(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| self.backoff(retry))
    }

    /// Sends a request, retrying retryable statuses until the policy is exhausted
    ///
    /// `build` is called once per attempt since a sent request cannot be reused.
    /// Transport errors (timeouts, refused connections) are not retried.
    pub async fn execute<F>(&self, build: F) -> Result<Response, reqwest::Error>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut retries = 0;

        loop {
            let response = build().send().await?;
            let status = response.status();

            if !self.is_retryable(status) || retries >= self.max_retries {
                return Ok(response);
            }

            retries += 1;
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(parse_retry_after);
            let delay = self.delay_for(retries, retry_after);

            tracing::warn!(
                "HTTP {} from {}, retry {}/{} in {:?}",
                status.as_u16(),
                response.url(),
                retries,
                self.max_retries,
                delay
            );

            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Parses a `Retry-After` value: either delta-seconds or an HTTP date
pub fn parse_retry_after(value: &str) -> Option<Duration> {
    let value = value.trim();

    if let Ok(seconds) = value.parse::<u64>() {
        return Some(Duration::from_secs(seconds));
    }

    let at = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = at.with_timezone(&Utc) - Utc::now();
    // Dates in the past mean "retry now"
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}
