//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that walks the pairing list in order:
//! - deriving each pairing's canonical tag
//! - counting total works, then explicit works when there are any
//! - pacing every request after the first
//! - stopping cleanly, with results intact, when the archive rate limits us

use crate::crawler::fetcher::CountSource;
use crate::output::RunStatistics;
use crate::roster::Pairing;
use crate::state::{CountResult, CrawlPhase, RunOutcome, RunState, RunStatus};
use crate::wrangler::TagWrangler;
use crate::TallyError;
use std::time::Duration;

/// Main crawler coordinator structure
pub struct Coordinator<S> {
    source: S,
    wrangler: TagWrangler,
    pacing: Duration,
    phase: CrawlPhase,
    state: RunState,
}

impl<S: CountSource> Coordinator<S> {
    /// Creates a new coordinator
    ///
    /// # Arguments
    ///
    /// * `source` - Where work counts come from
    /// * `wrangler` - Derives the tag searched for each pairing
    /// * `pacing` - Pause between consecutive requests
    pub fn new(source: S, wrangler: TagWrangler, pacing: Duration) -> Self {
        Self {
            source,
            wrangler,
            pacing,
            phase: CrawlPhase::Idle,
            state: RunState::default(),
        }
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Results collected so far in the current run
    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Runs the crawl loop over `pairings`
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutcome)` - Completed, or aborted by a rate limit with every result
    ///   obtained before the abort
    /// * `Err(TallyError)` - Any other failure; results so far stay available through
    ///   [`Coordinator::take_partial`]
    pub async fn run(&mut self, pairings: &[Pairing]) -> Result<RunOutcome, TallyError> {
        self.phase = CrawlPhase::Idle;
        self.state = RunState::new(pairings.len());

        tracing::info!("Counting works for {} pairings", pairings.len());

        for (index, pairing) in pairings.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(self.pacing).await;
            }

            match self.count_pairing(pairing).await {
                Ok(result) => {
                    self.transition(CrawlPhase::Recording)?;
                    tracing::info!(
                        "[{} of {}] {}: {} ({} explicit)",
                        index + 1,
                        pairings.len(),
                        result.tag,
                        result.total,
                        result.explicit
                    );
                    self.state.record(result);
                    self.transition(CrawlPhase::Idle)?;
                }
                Err(TallyError::Fetch(e)) if e.is_rate_limited() => {
                    self.transition(CrawlPhase::Aborted)?;
                    tracing::warn!(
                        "Rate limited at pairing {} of {}, aborting with {} results: {}",
                        index + 1,
                        pairings.len(),
                        self.state.cursor(),
                        e
                    );
                    return Ok(self.finish(RunStatus::Aborted {
                        at: index,
                        reason: e.to_string(),
                    }));
                }
                Err(e) => return Err(e),
            }
        }

        self.transition(CrawlPhase::Completed)?;
        Ok(self.finish(RunStatus::Completed))
    }

    /// Hands off whatever was collected after `run` returned an error
    pub fn take_partial(&mut self, reason: &str) -> RunOutcome {
        let at = self.state.cursor();
        self.finish(RunStatus::Aborted {
            at,
            reason: reason.to_string(),
        })
    }

    /// Counts total and explicit works for one pairing
    async fn count_pairing(&mut self, pairing: &Pairing) -> Result<CountResult, TallyError> {
        let tag = self.wrangler.canonical_tag(&pairing.a, &pairing.b);

        self.transition(CrawlPhase::FetchingTotal)?;
        let total = self.source.fetch_count(&tag, false).await?;

        let explicit = if total > 0 {
            tokio::time::sleep(self.pacing).await;
            self.transition(CrawlPhase::FetchingExplicit)?;
            let explicit = self.source.fetch_count(&tag, true).await?;
            clamp_explicit(&tag, total, explicit)
        } else {
            0
        };

        Ok(CountResult {
            pairing: pairing.clone(),
            tag,
            total,
            explicit,
        })
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<(), TallyError> {
        if !self.phase.can_transition_to(next) {
            return Err(TallyError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }

    fn finish(&mut self, status: RunStatus) -> RunOutcome {
        let outcome = std::mem::take(&mut self.state).finish(status);
        RunStatistics::from_results(&outcome.results).log(outcome.total_pairings);
        outcome
    }
}

/// Works can be added between the two searches; explicit never exceeds total
fn clamp_explicit(tag: &str, total: u64, explicit: u64) -> u64 {
    if explicit > total {
        tracing::warn!(
            "{}: explicit count {} exceeds total {}, clamping",
            tag,
            explicit,
            total
        );
        total
    } else {
        explicit
    }
}
