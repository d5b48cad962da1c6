//! Character roster loading and pairing enumeration

mod pairing;

pub use pairing::{enumerate_pairings, pairing_count, Pairing};

use crate::RosterError;
use std::collections::HashSet;
use std::path::Path;

/// Reads a roster file, one character name per line
///
/// Surrounding whitespace is trimmed and blank lines are skipped. The roster keeps file
/// order, which fixes the order of the pairing enumeration and of the output rows.
pub fn load_roster(path: &Path) -> Result<Vec<String>, RosterError> {
    let content = std::fs::read_to_string(path)?;
    parse_roster(&content)
}

/// Parses roster text, rejecting duplicates and empty rosters
pub fn parse_roster(content: &str) -> Result<Vec<String>, RosterError> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for line in content.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }
        if !seen.insert(name) {
            return Err(RosterError::Duplicate(name.to_string()));
        }
        names.push(name.to_string());
    }

    if names.is_empty() {
        return Err(RosterError::Empty);
    }

    Ok(names)
}
