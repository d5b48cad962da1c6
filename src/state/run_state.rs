use crate::roster::Pairing;

/// Work counts for one pairing
#[derive(Debug, Clone, PartialEq)]
pub struct CountResult {
    pub pairing: Pairing,

    /// Canonical relationship tag used as the search key
    pub tag: String,

    /// Number of works tagged with the relationship
    pub total: u64,

    /// Number of those works rated explicit
    pub explicit: u64,
}

impl CountResult {
    /// Share of works rated explicit, undefined when there are no works
    pub fn proportion(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.explicit as f64 / self.total as f64)
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Every pairing was counted
    Completed,

    /// The run stopped at pairing index `at`; nothing from `at` onwards was recorded
    Aborted { at: usize, reason: String },
}

impl RunStatus {
    pub fn is_partial(&self) -> bool {
        matches!(self, Self::Aborted { .. })
    }
}

/// Append-only results of a run plus the cursor to the next unprocessed pairing
#[derive(Debug, Clone, Default)]
pub struct RunState {
    results: Vec<CountResult>,
    total_pairings: usize,
}

impl RunState {
    pub fn new(total_pairings: usize) -> Self {
        Self {
            results: Vec::with_capacity(total_pairings),
            total_pairings,
        }
    }

    /// Index of the next pairing to process
    pub fn cursor(&self) -> usize {
        self.results.len()
    }

    pub fn total_pairings(&self) -> usize {
        self.total_pairings
    }

    pub fn remaining(&self) -> usize {
        self.total_pairings.saturating_sub(self.cursor())
    }

    pub fn is_complete(&self) -> bool {
        self.remaining() == 0
    }

    /// Appends a result and advances the cursor
    pub fn record(&mut self, result: CountResult) {
        self.results.push(result);
    }

    pub fn results(&self) -> &[CountResult] {
        &self.results
    }

    /// Hands the collected results off, ending the run with `status`
    pub fn finish(self, status: RunStatus) -> RunOutcome {
        RunOutcome {
            status,
            total_pairings: self.total_pairings,
            results: self.results,
        }
    }
}

/// Final product of a run, ready for persistence
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub total_pairings: usize,
    pub results: Vec<CountResult>,
}

impl RunOutcome {
    pub fn is_partial(&self) -> bool {
        self.status.is_partial()
    }
}
