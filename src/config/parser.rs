use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Recorded in the summary so a result set can be traced back to the settings that
/// produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const MINIMAL: &str = r#"
[crawler]
sleep-period = 5000
roster-path = "names.txt"

[user-agent]
crawler-name = "ShipTally"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"
"#;

    #[test]
    fn test_load_minimal_config_uses_defaults() {
        let file = create_temp_config(MINIMAL);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.crawler.sleep_period, 5000);
        assert_eq!(config.archive.base_url, "https://archiveofourown.org");
        assert_eq!(config.archive.explicit_rating_id, 13);
        assert_eq!(config.retry.total, 7);
        assert_eq!(config.retry.status_forcelist, vec![429]);
        assert_eq!(config.output.complete_path, "ships.csv");
        assert_eq!(config.output.partial_path, "temp.csv");
        assert!(config.wrangling.champions.contains(&"Jinx".to_string()));
        assert!(config.credentials.is_none());
    }

    #[test]
    fn test_partial_tables_fill_in_defaults() {
        let config_content = format!(
            r#"{}
[archive]
base-url = "https://mirror.example.org"

[retry]
total = 3

[output]
summary-top = 5

[wrangling]
champions = ["Jinx", "Vi"]
"#,
            MINIMAL
        );

        let file = create_temp_config(&config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.archive.base_url, "https://mirror.example.org");
        assert_eq!(config.archive.search_path, "/works/search");
        assert_eq!(config.archive.explicit_rating_id, 13);
        assert_eq!(config.retry.total, 3);
        assert_eq!(config.retry.backoff_factor, 60_000);
        assert_eq!(config.retry.status_forcelist, vec![429]);
        assert_eq!(config.output.summary_top, 5);
        assert_eq!(config.output.complete_path, "ships.csv");
        assert_eq!(config.wrangling.champions, vec!["Jinx", "Vi"]);
        assert_eq!(config.wrangling.champion_fandom, "League of Legends");
        assert_eq!(config.wrangling.atomic_names.len(), 2);
    }

    #[test]
    fn test_load_full_config() {
        let config_content = r#"
[archive]
base-url = "https://archive.example.org"
search-path = "/works/search"
login-path = "/users/login"
explicit-rating-id = 13

[crawler]
sleep-period = 2000
roster-path = "roster.txt"

[retry]
total = 3
backoff-factor = 1000
max-backoff = 4000
status-forcelist = [429, 503]

[user-agent]
crawler-name = "ShipTally"
crawler-version = "1.0"
contact-url = "https://example.com/about"
contact-email = "admin@example.com"

[output]
complete-path = "out/ships.csv"
partial-path = "out/partial.csv"
summary-path = "out/summary.md"
summary-top = 10

[wrangling]
champion-fandom = "Champions"
default-fandom = "Others"
champions = ["Jinx"]
atomic-names = []

[credentials]
username = "reader"
password = "hunter2"
"#;

        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.archive.base_url, "https://archive.example.org");
        assert_eq!(config.retry.status_forcelist, vec![429, 503]);
        assert_eq!(config.output.summary_top, 10);
        assert_eq!(config.wrangling.champions, vec!["Jinx".to_string()]);
        assert_eq!(config.credentials.unwrap().username, "reader");
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_config_with_validation_error() {
        let config_content = MINIMAL.replace("sleep-period = 5000", "sleep-period = 10");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
