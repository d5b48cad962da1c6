use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Ship-Tally
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub archive: ArchiveConfig,
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub wrangling: WranglingConfig,
    #[serde(default)]
    pub credentials: Option<Credentials>,
}

/// Remote archive endpoints
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ArchiveConfig {
    /// Scheme and host of the archive, without a trailing path
    pub base_url: String,

    /// Path of the work search endpoint
    pub search_path: String,

    /// Path of the login endpoint
    pub login_path: String,

    /// Rating id used to filter searches to explicit works
    pub explicit_rating_id: u32,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://archiveofourown.org".to_string(),
            search_path: "/works/search".to_string(),
            login_path: "/users/login".to_string(),
            explicit_rating_id: 13,
        }
    }
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Pause between consecutive requests (milliseconds)
    pub sleep_period: u64,

    /// Path to the roster file, one character name per line
    pub roster_path: String,
}

impl CrawlerConfig {
    pub fn pacing_interval(&self) -> Duration {
        Duration::from_millis(self.sleep_period)
    }
}

/// Transport-level retry policy for rate-limited responses
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RetryConfig {
    /// Number of retries after the initial request
    pub total: u32,

    /// Base of the exponential backoff (milliseconds)
    pub backoff_factor: u64,

    /// Upper bound for a single computed backoff delay (milliseconds); a server's
    /// `Retry-After` is not bounded by it
    pub max_backoff: u64,

    /// Status codes that trigger a retry
    pub status_forcelist: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            total: 7,
            backoff_factor: 60_000,
            max_backoff: 120_000,
            status_forcelist: vec![429],
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// CSV written when every pairing was counted
    pub complete_path: String,

    /// CSV written when the run was aborted
    pub partial_path: String,

    /// Markdown summary generated from the complete CSV
    pub summary_path: String,

    /// Number of top pairings (by work count) in the summary
    #[serde(default = "default_summary_top")]
    pub summary_top: usize,
}

fn default_summary_top() -> usize {
    20
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            complete_path: "ships.csv".to_string(),
            partial_path: "temp.csv".to_string(),
            summary_path: "summary.md".to_string(),
            summary_top: default_summary_top(),
        }
    }
}

/// Tag wrangling data: fandom labels and name lists
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct WranglingConfig {
    /// Fandom label for characters in `champions`
    pub champion_fandom: String,

    /// Fandom label for every other character
    pub default_fandom: String,

    /// Characters belonging to the champion fandom
    pub champions: Vec<String>,

    /// Names treated as a single opaque token even when they contain spaces
    pub atomic_names: Vec<String>,
}

impl Default for WranglingConfig {
    fn default() -> Self {
        // Vander's canonical tag lives in the League fandom, not Arcane.
        let champions = [
            "Caitlyn",
            "Ekko",
            "Heimerdinger",
            "Jayce",
            "Jinx",
            "Singed",
            "Vander",
            "Vi",
            "Viktor",
        ];

        Self {
            champion_fandom: "League of Legends".to_string(),
            default_fandom: "Arcane: League of Legends".to_string(),
            champions: champions.iter().map(|s| s.to_string()).collect(),
            atomic_names: vec!["Brothel Girl".to_string(), "Local Cuisine Guy".to_string()],
        }
    }
}

/// Archive account credentials
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Reads `AO3_USERNAME` / `AO3_PASSWORD`, returning None unless both are set
    pub fn from_env() -> Option<Self> {
        let username = std::env::var("AO3_USERNAME").ok()?;
        let password = std::env::var("AO3_PASSWORD").ok()?;
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }
}
