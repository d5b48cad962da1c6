//! Aggregate statistics over count results

use crate::output::csv::ShipRecord;
use crate::state::CountResult;

/// Totals over a set of pairings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    /// Pairings counted
    pub pairings: usize,

    /// Pairings with at least one work
    pub with_works: usize,

    /// Sum of work counts
    pub total_works: u64,

    /// Sum of explicit work counts
    pub explicit_works: u64,
}

impl RunStatistics {
    /// Builds statistics from (total, explicit) pairs
    pub fn from_counts<I>(counts: I) -> Self
    where
        I: IntoIterator<Item = (u64, u64)>,
    {
        counts
            .into_iter()
            .fold(Self::default(), |mut stats, (total, explicit)| {
                stats.pairings += 1;
                if total > 0 {
                    stats.with_works += 1;
                }
                stats.total_works += total;
                stats.explicit_works += explicit;
                stats
            })
    }

    pub fn from_results(results: &[CountResult]) -> Self {
        Self::from_counts(results.iter().map(|r| (r.total, r.explicit)))
    }

    pub fn from_records(records: &[ShipRecord]) -> Self {
        Self::from_counts(records.iter().map(|r| (r.fics, r.explicit)))
    }

    /// Explicit share over all counted works
    ///
    /// Works tagged with several pairings are counted once per pairing.
    pub fn explicit_share(&self) -> Option<f64> {
        if self.total_works == 0 {
            None
        } else {
            Some(self.explicit_works as f64 / self.total_works as f64)
        }
    }

    /// Logs a one-line run summary
    pub fn log(&self, total_pairings: usize) {
        tracing::info!(
            "Counted {} of {} pairings: {} with works, {} works ({} explicit)",
            self.pairings,
            total_pairings,
            self.with_works,
            self.total_works,
            self.explicit_works
        );
    }
}
