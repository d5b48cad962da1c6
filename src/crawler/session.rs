//! Archive session: HTTP client construction and login
//!
//! A session is the request-issuing capability the fetcher uses. It carries the cookie
//! jar (and therefore any login state), the endpoint URLs and the retry policy.

use crate::config::{ArchiveConfig, Credentials, UserAgentConfig};
use crate::crawler::parser::extract_authenticity_token;
use crate::crawler::retry::RetryPolicy;
use crate::TallyError;
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use std::time::Duration;
use url::Url;

/// Builds an HTTP client with proper configuration
///
/// Redirects are not followed: a successful login answers 302, and a redirect on a
/// search request is an anomaly the fetcher must see.
///
/// # Example
///
/// ```no_run
/// use ship_tally::config::UserAgentConfig;
/// use ship_tally::crawler::build_http_client;
///
/// let config = UserAgentConfig {
///     crawler_name: "ShipTally".to_string(),
///     crawler_version: "1.0".to_string(),
///     contact_url: "https://example.com/about".to_string(),
///     contact_email: "admin@example.com".to_string(),
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig) -> Result<Client, reqwest::Error> {
    // Format: CrawlerName/Version (+ContactURL; ContactEmail)
    let user_agent = format!(
        "{}/{} (+{}; {})",
        config.crawler_name, config.crawler_version, config.contact_url, config.contact_email
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::none())
        .cookie_store(true)
        .gzip(true)
        .brotli(true)
        .build()
}

/// An anonymous or logged-in connection to the archive
#[derive(Debug, Clone)]
pub struct ArchiveSession {
    client: Client,
    search_url: Url,
    login_url: Url,
    retry: RetryPolicy,
    username: Option<String>,
}

impl ArchiveSession {
    /// Creates an anonymous session
    ///
    /// Anonymous users cannot see works restricted to logged-in users, so counts may be
    /// lower than for an authenticated session.
    pub fn anonymous(
        client: Client,
        archive: &ArchiveConfig,
        retry: RetryPolicy,
    ) -> Result<Self, TallyError> {
        let base = Url::parse(&archive.base_url)?;
        Ok(Self {
            client,
            search_url: base.join(&archive.search_path)?,
            login_url: base.join(&archive.login_path)?,
            retry,
            username: None,
        })
    }

    /// Creates a session, logging in when credentials are given
    pub async fn connect(
        client: Client,
        archive: &ArchiveConfig,
        retry: RetryPolicy,
        credentials: Option<&Credentials>,
    ) -> Result<Self, TallyError> {
        let mut session = Self::anonymous(client, archive, retry)?;

        match credentials {
            Some(credentials) => {
                session.login(credentials).await?;
                tracing::info!("Logged in as {}", credentials.username);
            }
            None => {
                tracing::warn!("Anonymous session, not all works will be visible");
            }
        }

        Ok(session)
    }

    /// Logs in with the archive's form login
    ///
    /// # Flow
    ///
    /// 1. GET the login page under the retry policy and read its `authenticity_token`
    /// 2. POST username, password and token without following redirects
    /// 3. A 302 means success; anything else is an authentication failure
    ///
    /// The POST is never retried. The session cookie lands in the client's cookie store.
    pub async fn login(&mut self, credentials: &Credentials) -> Result<(), TallyError> {
        let response = self
            .retry
            .execute(|| self.client.get(self.login_url.clone()))
            .await?;

        if !response.status().is_success() {
            return Err(TallyError::Authentication(format!(
                "login page answered HTTP {}",
                response.status().as_u16()
            )));
        }

        let page = response.text().await?;

        let token = extract_authenticity_token(&page).ok_or_else(|| {
            TallyError::Authentication("login page has no authenticity token".to_string())
        })?;

        let form = [
            ("user[login]", credentials.username.as_str()),
            ("user[password]", credentials.password.as_str()),
            ("authenticity_token", token.as_str()),
        ];

        let response = self
            .client
            .post(self.login_url.clone())
            .form(&form)
            .send()
            .await?;

        if response.status() != StatusCode::FOUND {
            tracing::debug!("Login answered HTTP {}", response.status().as_u16());
            return Err(TallyError::Authentication(
                "invalid username or password".to_string(),
            ));
        }

        self.username = Some(credentials.username.clone());
        Ok(())
    }

    /// Issues a GET against the search endpoint under the retry policy
    pub async fn search(&self, query: &[(&str, String)]) -> Result<Response, reqwest::Error> {
        self.retry
            .execute(|| self.client.get(self.search_url.clone()).query(query))
            .await
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.username.is_some()
    }

    pub fn search_url(&self) -> &Url {
        &self.search_url
    }
}
