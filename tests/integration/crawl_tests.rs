//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the archive and run the full cycle
//! end-to-end: roster, tag wrangling, paced searches, retries, login and CSV output.

use ship_tally::config::{
    ArchiveConfig, Config, CrawlerConfig, Credentials, OutputConfig, RetryConfig,
    UserAgentConfig, WranglingConfig,
};
use ship_tally::crawler::{self, SEARCH_FIELD_QUERY, SEARCH_FIELD_RATING};
use ship_tally::output::{read_records, CsvOutputHandler, OutputHandler};
use ship_tally::roster::{enumerate_pairings, load_roster};
use ship_tally::state::RunStatus;
use ship_tally::TallyError;
use std::path::Path;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock archive
///
/// Built directly rather than parsed, so the short pacing skips validation.
fn create_test_config(base_url: &str, dir: &Path, retries: u32) -> Config {
    Config {
        archive: ArchiveConfig {
            base_url: base_url.to_string(),
            ..ArchiveConfig::default()
        },
        crawler: CrawlerConfig {
            sleep_period: 10, // Very short for testing
            roster_path: dir.join("roster.txt").display().to_string(),
        },
        retry: RetryConfig {
            total: retries,
            backoff_factor: 10,
            max_backoff: 50,
            status_forcelist: vec![429],
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            complete_path: dir.join("ships.csv").display().to_string(),
            partial_path: dir.join("temp.csv").display().to_string(),
            summary_path: dir.join("summary.md").display().to_string(),
            summary_top: 20,
        },
        wrangling: WranglingConfig::default(),
        credentials: None,
    }
}

fn results_page(count: Option<&str>) -> String {
    let heading = count
        .map(|c| format!(r#"<h3 class="heading">{} Works found</h3>"#, c))
        .unwrap_or_default();
    format!(
        r#"<html><body><div id="main"><h2 class="heading">Search Results</h2>{}</div></body></html>"#,
        heading
    )
}

fn quoted(tag: &str) -> String {
    format!("\"{}\"", tag)
}

/// Mounts a search response for one tag; `explicit` narrows it to the rated search
async fn mount_count(server: &MockServer, tag: &str, explicit: bool, count: Option<&str>) {
    let mock = Mock::given(method("GET"))
        .and(path("/works/search"))
        .and(query_param(SEARCH_FIELD_QUERY, quoted(tag).as_str()));
    let mock = if explicit {
        mock.and(query_param(SEARCH_FIELD_RATING, "13"))
    } else {
        mock
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_string(results_page(count)))
        .mount(server)
        .await;
}

fn write_roster(config: &Config, names: &[&str]) {
    std::fs::write(&config.crawler.roster_path, names.join("\n")).unwrap();
}

#[tokio::test]
async fn test_full_run_writes_complete_csv() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 0);
    write_roster(&config, &["Jinx", "Viktor"]);

    // Explicit mocks first: the first matching mock answers
    mount_count(&mock_server, "Jinx/Jinx (League of Legends)", true, Some("4")).await;
    mount_count(&mock_server, "Jinx/Viktor (League of Legends)", true, Some("300")).await;
    Mock::given(method("GET"))
        .and(path("/works/search"))
        .and(query_param(SEARCH_FIELD_RATING, "13"))
        .and(query_param(
            SEARCH_FIELD_QUERY,
            quoted("Viktor/Viktor (League of Legends)").as_str(),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(None)))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_count(&mock_server, "Jinx/Jinx (League of Legends)", false, Some("40")).await;
    mount_count(&mock_server, "Jinx/Viktor (League of Legends)", false, Some("1,234")).await;
    mount_count(&mock_server, "Viktor/Viktor (League of Legends)", false, None).await;

    let roster = load_roster(Path::new(&config.crawler.roster_path)).unwrap();
    let pairings = enumerate_pairings(&roster);
    let outcome = crawler::crawl(&config, None, &pairings)
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.results.len(), 3);

    let mut output = CsvOutputHandler::from_config(&config.output);
    let written = output.write_outcome(&outcome).unwrap();
    assert_eq!(written, dir.path().join("ships.csv"));
    assert!(!dir.path().join("temp.csv").exists());

    let content = std::fs::read_to_string(&written).unwrap();
    assert_eq!(
        content,
        "A,B,ship,fics,explicit,p\n\
         Jinx,Jinx,Jinx/Jinx (League of Legends),40,4,0.1\n\
         Jinx,Viktor,Jinx/Viktor (League of Legends),1234,300,0.24311183144246354\n\
         Viktor,Viktor,Viktor/Viktor (League of Legends),0,0,\n"
    );
}

#[tokio::test]
async fn test_rate_limit_writes_partial_csv() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 0);
    write_roster(&config, &["Jinx", "Vi", "Viktor"]);

    // Third pairing trips the limiter
    Mock::given(method("GET"))
        .and(path("/works/search"))
        .and(query_param(
            SEARCH_FIELD_QUERY,
            quoted("Jinx/Viktor (League of Legends)").as_str(),
        ))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&mock_server)
        .await;

    // Everything else has no works; only the first two pairings get here
    Mock::given(method("GET"))
        .and(path("/works/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(None)))
        .expect(2)
        .mount(&mock_server)
        .await;

    let roster = load_roster(Path::new(&config.crawler.roster_path)).unwrap();
    let pairings = enumerate_pairings(&roster);
    assert_eq!(pairings.len(), 6);

    let outcome = crawler::crawl(&config, None, &pairings)
        .await
        .expect("Rate limit should end the run gracefully");

    assert!(outcome.is_partial());
    assert!(matches!(outcome.status, RunStatus::Aborted { at: 2, .. }));
    assert_eq!(outcome.total_pairings, 6);

    let mut output = CsvOutputHandler::from_config(&config.output);
    let written = output.write_outcome(&outcome).unwrap();
    assert_eq!(written, dir.path().join("temp.csv"));
    assert!(!dir.path().join("ships.csv").exists());

    let records = read_records(&written).unwrap();
    let ships: Vec<&str> = records.iter().map(|r| r.ship.as_str()).collect();
    assert_eq!(
        ships,
        vec!["Jinx/Jinx (League of Legends)", "Jinx/Vi (League of Legends)"]
    );
    assert!(records.iter().all(|r| r.fics == 0 && r.p.is_none()));
}

#[tokio::test]
async fn test_retry_after_recovers() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 3);
    write_roster(&config, &["Caitlyn"]);

    // Mounted first so it answers the first attempt, then steps aside
    Mock::given(method("GET"))
        .and(path("/works/search"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_count(&mock_server, "Caitlyn/Caitlyn (League of Legends)", true, Some("2")).await;
    mount_count(&mock_server, "Caitlyn/Caitlyn (League of Legends)", false, Some("7")).await;

    let roster = load_roster(Path::new(&config.crawler.roster_path)).unwrap();
    let outcome = crawler::crawl(&config, None, &enumerate_pairings(&roster))
        .await
        .expect("Crawl failed");

    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.results[0].total, 7);
    assert_eq!(outcome.results[0].explicit, 2);
}

#[tokio::test]
async fn test_server_error_is_not_a_rate_limit() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 0);
    write_roster(&config, &["Jinx", "Vi"]);

    Mock::given(method("GET"))
        .and(path("/works/search"))
        .and(query_param(
            SEARCH_FIELD_QUERY,
            quoted("Jinx/Vi (League of Legends)").as_str(),
        ))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/works/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(None)))
        .mount(&mock_server)
        .await;

    let roster = load_roster(Path::new(&config.crawler.roster_path)).unwrap();
    let pairings = enumerate_pairings(&roster);
    let mut coordinator = crawler::connect(&config, None).await.unwrap();

    let result = coordinator.run(&pairings).await;
    match result {
        Err(TallyError::Fetch(e)) => assert!(!e.is_rate_limited()),
        other => panic!("expected a fetch error, got {:?}", other.map(|o| o.status)),
    }

    let partial = coordinator.take_partial("HTTP 503");
    assert_eq!(partial.results.len(), 1);

    let mut output = CsvOutputHandler::from_config(&config.output);
    let written = output.write_outcome(&partial).unwrap();
    assert_eq!(written, dir.path().join("temp.csv"));
}

#[tokio::test]
async fn test_login_then_search() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 0);
    write_roster(&config, &["Silco"]);

    Mock::given(method("GET"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<html><body><form action="/users/login" method="post">
                <input type="hidden" name="authenticity_token" value="tok123">
                <input name="user[login]"><input name="user[password]" type="password">
            </form></body></html>"#,
        ))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .and(body_string_contains("authenticity_token=tok123"))
        .and(body_string_contains("user%5Blogin%5D=reader"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", "/")
                .insert_header("Set-Cookie", "_otwarchive_session=abc; Path=/"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_count(&mock_server, "Silco/Silco (Arcane: League of Legends)", false, None).await;

    let credentials = Credentials {
        username: "reader".to_string(),
        password: "hunter2".to_string(),
    };

    let roster = load_roster(Path::new(&config.crawler.roster_path)).unwrap();
    let mut coordinator = crawler::connect(&config, Some(&credentials))
        .await
        .expect("Login failed");
    assert!(coordinator.source().session().is_authenticated());
    assert_eq!(coordinator.source().session().username(), Some("reader"));

    let outcome = coordinator.run(&enumerate_pairings(&roster)).await.unwrap();
    assert_eq!(outcome.status, RunStatus::Completed);
    assert_eq!(outcome.results[0].total, 0);
}

#[tokio::test]
async fn test_login_rejected() {
    let mock_server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = create_test_config(&mock_server.uri(), dir.path(), 0);

    Mock::given(method("GET"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<form><input type="hidden" name="authenticity_token" value="tok123"></form>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Incorrect password"))
        .mount(&mock_server)
        .await;
    // No search may be issued without a session
    Mock::given(method("GET"))
        .and(path("/works/search"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let credentials = Credentials {
        username: "reader".to_string(),
        password: "wrong".to_string(),
    };

    let result = crawler::crawl(&config, Some(&credentials), &[]).await;
    assert!(matches!(result, Err(TallyError::Authentication(_))));
}
