//! Markdown summary generation
//!
//! This module ranks the most-written pairings of a complete result set and renders
//! them, ordered by explicit share, as a markdown report.

use crate::output::csv::ShipRecord;
use crate::output::stats::RunStatistics;
use crate::output::traits::OutputResult;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Data behind the markdown report
#[derive(Debug, Clone)]
pub struct ShipSummary {
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub config_hash: String,
    pub statistics: RunStatistics,
    pub top_n: usize,
    /// Top pairings by work count, ordered by explicit share ascending
    pub top: Vec<ShipRecord>,
}

/// Builds a summary from the records of a complete run
pub fn build_summary(
    records: &[ShipRecord],
    top_n: usize,
    source: &str,
    config_hash: &str,
) -> ShipSummary {
    ShipSummary {
        generated_at: Utc::now(),
        source: source.to_string(),
        config_hash: config_hash.to_string(),
        statistics: RunStatistics::from_records(records),
        top_n,
        top: top_ships(records, top_n),
    }
}

/// Picks the `n` pairings with the most works and orders them by explicit share
///
/// Pairings without works are ignored. Pairings tied with the `n`th work count are all
/// kept, so the result can be longer than `n`. Pairings with equal shares stay in
/// descending work-count order.
pub fn top_ships(records: &[ShipRecord], n: usize) -> Vec<ShipRecord> {
    let mut ranked: Vec<&ShipRecord> = records.iter().filter(|r| r.p.is_some()).collect();
    if n == 0 || ranked.is_empty() {
        return Vec::new();
    }

    ranked.sort_by(|x, y| y.fics.cmp(&x.fics));
    let cutoff = ranked[(n - 1).min(ranked.len() - 1)].fics;

    let mut top: Vec<ShipRecord> = ranked
        .into_iter()
        .take_while(|r| r.fics >= cutoff)
        .cloned()
        .collect();

    // Stable: equal shares keep work-count order
    top.sort_by(|x, y| x.p.partial_cmp(&y.p).unwrap_or(Ordering::Equal));
    top
}

/// Writes the markdown summary to `output_path`
pub fn generate_markdown_summary(summary: &ShipSummary, output_path: &Path) -> OutputResult<()> {
    let markdown = format_markdown_summary(summary);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a summary as markdown
pub fn format_markdown_summary(summary: &ShipSummary) -> String {
    let mut md = String::new();
    let stats = &summary.statistics;

    md.push_str("# Ship-Tally Summary\n\n");

    md.push_str("## Run Information\n\n");
    md.push_str(&format!(
        "- **Generated**: {}\n",
        summary.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    md.push_str(&format!("- **Source**: {}\n", summary.source));
    md.push_str(&format!("- **Config Hash**: {}\n\n", summary.config_hash));

    md.push_str("## Overall Statistics\n\n");
    md.push_str(&format!("- **Pairings**: {}\n", stats.pairings));
    md.push_str(&format!("- **Pairings With Works**: {}\n", stats.with_works));
    md.push_str(&format!("- **Works**: {}\n", stats.total_works));
    md.push_str(&format!("- **Explicit Works**: {}\n", stats.explicit_works));
    if let Some(share) = stats.explicit_share() {
        md.push_str(&format!("- **Explicit Share**: {:.2}%\n", share * 100.0));
    }
    md.push('\n');

    md.push_str(&format!(
        "## Top {} Ships by Explicit Share\n\n",
        summary.top_n
    ));

    if summary.top.is_empty() {
        md.push_str("_No pairings with works._\n");
        return md;
    }

    md.push_str("| Ship | Works | Explicit | p |\n");
    md.push_str("|------|------:|---------:|--:|\n");
    for record in &summary.top {
        md.push_str(&format!(
            "| {} | {} | {}/{} | {:.3} |\n",
            record.ship.replace('|', "\\|"),
            record.fics,
            record.explicit,
            record.fics,
            record.p.unwrap_or_default()
        ));
    }

    md
}
