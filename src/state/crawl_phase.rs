/// Crawl phase definitions for the pairing loop
///
/// This module defines the states the crawl controller moves through while counting one
/// pairing at a time.
use std::fmt;

/// Represents the current phase of a crawl run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    // ===== Active States =====
    /// Waiting to start the next pairing
    Idle,

    /// Counting all works for the current pairing's tag
    FetchingTotal,

    /// Counting explicit works for the current pairing's tag
    FetchingExplicit,

    /// Appending the current pairing's counts to the run state
    Recording,

    // ===== Terminal States =====
    /// Every pairing was counted
    Completed,

    /// The archive rate limited us; results so far are partial
    Aborted,
}

impl CrawlPhase {
    /// Returns true if this is a terminal state (the run is over)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Returns true while a request to the archive is in flight
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::FetchingTotal | Self::FetchingExplicit)
    }

    /// Returns true if the run may move from this phase to `next`
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        use CrawlPhase::*;
        matches!(
            (*self, next),
            (Idle, FetchingTotal)
                | (Idle, Completed)
                | (FetchingTotal, FetchingExplicit)
                | (FetchingTotal, Recording)
                | (FetchingTotal, Aborted)
                | (FetchingExplicit, Recording)
                | (FetchingExplicit, Aborted)
                | (Recording, Idle)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingTotal => "fetching_total",
            Self::FetchingExplicit => "fetching_explicit",
            Self::Recording => "recording",
            Self::Completed => "completed",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
