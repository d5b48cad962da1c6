//! Name-ordering rules: surname-first sort keys and token counting

use std::collections::HashSet;

/// Rules for interpreting character names
///
/// Atomic names (e.g. "Brothel Girl") are opaque: they are never reordered and always
/// count as a single token, whatever whitespace they contain.
#[derive(Debug, Clone, Default)]
pub struct NameRules {
    atomic_names: HashSet<String>,
}

impl NameRules {
    pub fn new<I, S>(atomic_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            atomic_names: atomic_names.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_atomic(&self, name: &str) -> bool {
        self.atomic_names.contains(name)
    }

    /// Sort key that orders names by family name
    ///
    /// "Jayce Talis" becomes "Talis Jayce"; atomic names are returned unchanged.
    pub fn sort_key(&self, name: &str) -> String {
        if self.is_atomic(name) {
            return name.to_string();
        }
        let mut tokens: Vec<&str> = name.split_whitespace().collect();
        tokens.reverse();
        tokens.join(" ")
    }

    /// True when the name has both a given name and a family name
    pub fn is_multi_token(&self, name: &str) -> bool {
        !self.is_atomic(name) && name.split_whitespace().nth(1).is_some()
    }
}
