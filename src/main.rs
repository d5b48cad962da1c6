//! Ship-Tally main entry point
//!
//! This is the command-line interface for the Ship-Tally relationship-tag census.

use clap::Parser;
use ship_tally::config::{load_config_with_hash, Config, Credentials};
use ship_tally::crawler;
use ship_tally::output::{
    build_summary, generate_markdown_summary, read_records, CsvOutputHandler, OutputHandler,
};
use ship_tally::roster::{enumerate_pairings, load_roster, pairing_count};
use ship_tally::wrangler::TagWrangler;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Ship-Tally: a polite relationship-tag census
///
/// Ship-Tally pairs every character of a roster with every other (and itself), derives
/// the canonical relationship tag for each pairing, and counts how many works and how
/// many explicit works the archive lists under it.
#[derive(Parser, Debug)]
#[command(name = "ship-tally")]
#[command(version = "1.0.0")]
#[command(about = "A polite relationship-tag census", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and roster, and list the tags that would be searched
    #[arg(long, conflicts_with = "export_summary")]
    dry_run: bool,

    /// Generate markdown summary from the complete results file and exit
    #[arg(long, conflicts_with = "dry_run")]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config, &config_hash)?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ship_tally=info,warn"),
            1 => EnvFilter::new("ship_tally=debug,info"),
            2 => EnvFilter::new("ship_tally=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates inputs and lists every tag that would be searched
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Ship-Tally Dry Run ===\n");

    println!("Archive:");
    println!("  Base URL: {}", config.archive.base_url);
    println!("  Search path: {}", config.archive.search_path);
    println!("  Explicit rating id: {}", config.archive.explicit_rating_id);

    println!("\nCrawler Configuration:");
    println!("  Sleep period: {}ms", config.crawler.sleep_period);
    println!("  Roster: {}", config.crawler.roster_path);
    println!(
        "  Retries: {} (backoff factor {}ms, max {}ms, statuses {:?})",
        config.retry.total,
        config.retry.backoff_factor,
        config.retry.max_backoff,
        config.retry.status_forcelist
    );

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Complete results: {}", config.output.complete_path);
    println!("  Partial results: {}", config.output.partial_path);
    println!("  Summary: {}", config.output.summary_path);

    let roster = load_roster(Path::new(&config.crawler.roster_path))?;
    let pairings = enumerate_pairings(&roster);
    let wrangler = TagWrangler::from_config(&config.wrangling);

    println!("\nRoster ({} characters):", roster.len());
    for name in &roster {
        println!(
            "  - {} ({})",
            name,
            wrangler.classifier().label_text(wrangler.classifier().classify(name))
        );
    }

    println!("\nTags ({}):", pairings.len());
    for pairing in &pairings {
        println!("  {}", wrangler.canonical_tag(&pairing.a, &pairing.b));
    }

    // Lower bound: one search per pairing, a second only for pairings with works
    let min_seconds =
        config.crawler.pacing_interval().as_secs() * (pairings.len() as u64).saturating_sub(1);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would count {} pairings (n(n+1)/2 = {}), at least {}s of pacing",
        pairings.len(),
        pairing_count(roster.len()),
        min_seconds
    );

    Ok(())
}

/// Handles the --export-summary mode: generates markdown summary from the complete CSV
fn handle_export_summary(
    config: &Config,
    config_hash: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Exporting Ship Summary ===\n");
    println!("Results: {}", config.output.complete_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    tracing::info!("Loading results from {}", config.output.complete_path);
    let records = read_records(Path::new(&config.output.complete_path))?;

    tracing::info!("Generating markdown summary...");
    let summary = build_summary(
        &records,
        config.output.summary_top,
        &config.output.complete_path,
        config_hash,
    );
    generate_markdown_summary(&summary, Path::new(&config.output.summary_path))?;

    println!("✓ Summary exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let roster = load_roster(Path::new(&config.crawler.roster_path))?;
    let pairings = enumerate_pairings(&roster);
    tracing::info!(
        "Roster: {} characters, {} pairings",
        roster.len(),
        pairings.len()
    );

    let credentials = Credentials::from_env().or_else(|| config.credentials.clone());

    let mut coordinator = crawler::connect(config, credentials.as_ref()).await?;
    let mut output = CsvOutputHandler::from_config(&config.output);

    match coordinator.run(&pairings).await {
        Ok(outcome) => {
            output.write_outcome(&outcome)?;
            if outcome.is_partial() {
                tracing::warn!("Crawl stopped early; rerun later to complete the data set");
            } else {
                tracing::info!("Crawl completed successfully");
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            let partial = coordinator.take_partial(&e.to_string());
            if let Err(write_err) = output.write_outcome(&partial) {
                tracing::error!("Failed to save partial results: {}", write_err);
            }
            Err(e.into())
        }
    }
}
