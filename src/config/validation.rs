use crate::config::types::{
    ArchiveConfig, Config, CrawlerConfig, Credentials, OutputConfig, RetryConfig,
    UserAgentConfig, WranglingConfig,
};
use crate::ConfigError;
use url::Url;

/// Anything faster than one request per second gets noticed by the archive.
const MIN_SLEEP_PERIOD_MS: u64 = 1000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_archive_config(&config.archive)?;
    validate_crawler_config(&config.crawler)?;
    validate_retry_config(&config.retry)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_output_config(&config.output)?;
    validate_wrangling_config(&config.wrangling)?;
    if let Some(credentials) = &config.credentials {
        validate_credentials(credentials)?;
    }
    Ok(())
}

/// Validates archive endpoints
fn validate_archive_config(config: &ArchiveConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base_url: {}", e)))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::InvalidUrl(format!(
            "base_url must use http or https, got '{}'",
            config.base_url
        )));
    }

    for (name, path) in [
        ("search_path", &config.search_path),
        ("login_path", &config.login_path),
    ] {
        if !path.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "{} must start with '/', got '{}'",
                name, path
            )));
        }
    }

    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.sleep_period < MIN_SLEEP_PERIOD_MS {
        return Err(ConfigError::Validation(format!(
            "sleep_period must be >= {}ms, got {}ms",
            MIN_SLEEP_PERIOD_MS, config.sleep_period
        )));
    }

    if config.roster_path.is_empty() {
        return Err(ConfigError::Validation(
            "roster_path cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the retry policy
fn validate_retry_config(config: &RetryConfig) -> Result<(), ConfigError> {
    if config.max_backoff < config.backoff_factor {
        return Err(ConfigError::Validation(format!(
            "max_backoff ({}ms) must be >= backoff_factor ({}ms)",
            config.max_backoff, config.backoff_factor
        )));
    }

    if let Some(code) = config
        .status_forcelist
        .iter()
        .find(|code| !(100..=599).contains(*code))
    {
        return Err(ConfigError::Validation(format!(
            "status_forcelist contains invalid HTTP status {}",
            code
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    Url::parse(&config.contact_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid contact_url: {}", e)))?;

    validate_email(&config.contact_email)?;

    Ok(())
}

/// Validates output configuration
fn validate_output_config(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.complete_path.is_empty() || config.partial_path.is_empty() {
        return Err(ConfigError::Validation(
            "complete_path and partial_path cannot be empty".to_string(),
        ));
    }

    // Partial results must never overwrite a complete data set.
    if config.complete_path == config.partial_path {
        return Err(ConfigError::Validation(format!(
            "complete_path and partial_path must differ, both are '{}'",
            config.complete_path
        )));
    }

    if config.summary_path.is_empty() {
        return Err(ConfigError::Validation(
            "summary_path cannot be empty".to_string(),
        ));
    }

    if config.summary_top == 0 {
        return Err(ConfigError::Validation(
            "summary_top must be >= 1".to_string(),
        ));
    }

    Ok(())
}

/// Validates tag wrangling data
fn validate_wrangling_config(config: &WranglingConfig) -> Result<(), ConfigError> {
    if config.champion_fandom.trim().is_empty() || config.default_fandom.trim().is_empty() {
        return Err(ConfigError::Validation(
            "fandom labels cannot be empty".to_string(),
        ));
    }

    if config.champion_fandom == config.default_fandom {
        return Err(ConfigError::Validation(format!(
            "champion_fandom and default_fandom must differ, both are '{}'",
            config.champion_fandom
        )));
    }

    Ok(())
}

/// Validates configured credentials
fn validate_credentials(credentials: &Credentials) -> Result<(), ConfigError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(ConfigError::Validation(
            "credentials need both username and password".to_string(),
        ));
    }
    Ok(())
}

/// Basic email validation
fn validate_email(email: &str) -> Result<(), ConfigError> {
    if email.is_empty() {
        return Err(ConfigError::Validation(
            "contact_email cannot be empty".to_string(),
        ));
    }

    let parts: Vec<&str> = email.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
        return Err(ConfigError::Validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }

    if !parts[1].contains('.') {
        return Err(ConfigError::Validation(format!(
            "Invalid email domain: '{}'",
            email
        )));
    }

    Ok(())
}
