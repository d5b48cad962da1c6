//! HTML parsing for archive pages
//!
//! This module extracts the two things the crawler needs from archive HTML:
//! - the result count heading of a work search page
//! - the authenticity token of the login form

use scraper::{Html, Selector};

/// What a search results page says about the number of matching works
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkCount {
    /// A normal results page; zero when there is no count heading
    Found(u64),

    /// The page has no `div#main` at all
    ///
    /// The archive serves pages like this when it is blocking us without a 429. This is
    /// a heuristic on page structure, not a documented contract.
    MissingMain,
}

/// Reads the work count from a search results page
///
/// # Rules
///
/// - no `div#main` → [`WorkCount::MissingMain`]
/// - `div#main` without an `h3.heading` → zero works
/// - otherwise the leading run of digits and commas of the heading text, e.g.
///   `"1,234 Works found"` → 1234
///
/// # Returns
///
/// * `Ok(WorkCount)` - The page was understood
/// * `Err(String)` - A heading was present but did not start with a number
///
/// # Example
///
/// ```
/// use ship_tally::crawler::{parse_work_count, WorkCount};
///
/// let html = r#"<div id="main"><h3 class="heading">1,234 Works</h3></div>"#;
/// assert_eq!(parse_work_count(html).unwrap(), WorkCount::Found(1234));
/// ```
pub fn parse_work_count(html: &str) -> Result<WorkCount, String> {
    let document = Html::parse_document(html);

    let main_selector = Selector::parse("div#main").map_err(|e| e.to_string())?;
    let heading_selector = Selector::parse("h3.heading").map_err(|e| e.to_string())?;

    let main = match document.select(&main_selector).next() {
        Some(main) => main,
        None => return Ok(WorkCount::MissingMain),
    };

    let heading = match main.select(&heading_selector).next() {
        Some(heading) => heading.text().collect::<String>(),
        None => return Ok(WorkCount::Found(0)),
    };

    parse_leading_count(&heading).map(WorkCount::Found)
}

/// Parses the number at the start of a heading, ignoring thousands separators
fn parse_leading_count(text: &str) -> Result<u64, String> {
    let digits: String = text
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == ',')
        .filter(|c| *c != ',')
        .collect();

    digits
        .parse::<u64>()
        .map_err(|_| format!("heading does not start with a count: {:?}", text.trim()))
}

/// Extracts the `authenticity_token` hidden input from a login page
pub fn extract_authenticity_token(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"input[name="authenticity_token"]"#).ok()?;

    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("value"))
        .map(|value| value.to_string())
        .filter(|value| !value.is_empty())
}
