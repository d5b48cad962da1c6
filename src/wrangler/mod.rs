//! Canonical relationship-tag derivation
//!
//! The archive's tag wranglers follow a small set of rules when naming a relationship:
//!
//! - names are ordered alphabetically by family name and joined with `/`
//! - characters from the same fandom where at least one has a family name get no fandom
//!   disambiguation
//! - characters from the same fandom with single names get one fandom disambiguation at
//!   the end of the tag
//! - characters from different fandoms get a disambiguation on each single name
//!
//! [`TagWrangler::canonical_tag`] applies those rules so a pairing can be used as an
//! exact-phrase search key.

mod fandom;
mod names;

pub use fandom::{FandomClassifier, FandomLabel};
pub use names::NameRules;

use crate::config::WranglingConfig;

/// Derives canonical relationship tags from pairs of character names
#[derive(Debug, Clone)]
pub struct TagWrangler {
    classifier: FandomClassifier,
    names: NameRules,
}

impl TagWrangler {
    pub fn new(classifier: FandomClassifier, names: NameRules) -> Self {
        Self { classifier, names }
    }

    /// Builds a wrangler from the `[wrangling]` configuration section
    pub fn from_config(config: &WranglingConfig) -> Self {
        Self::new(
            FandomClassifier::new(
                config.champions.iter().cloned(),
                &config.champion_fandom,
                &config.default_fandom,
            ),
            NameRules::new(config.atomic_names.iter().cloned()),
        )
    }

    pub fn classifier(&self) -> &FandomClassifier {
        &self.classifier
    }

    /// Returns the canonical relationship tag for a pairing
    ///
    /// The result does not depend on argument order.
    ///
    /// # Example
    ///
    /// ```
    /// use ship_tally::config::WranglingConfig;
    /// use ship_tally::wrangler::TagWrangler;
    ///
    /// let wrangler = TagWrangler::from_config(&WranglingConfig::default());
    /// assert_eq!(
    ///     wrangler.canonical_tag("Viktor", "Jinx"),
    ///     "Jinx/Viktor (League of Legends)"
    /// );
    /// ```
    pub fn canonical_tag(&self, name1: &str, name2: &str) -> String {
        let (first, second) = self.order(name1, name2);

        let label1 = self.classifier.classify(first);
        let label2 = self.classifier.classify(second);
        let multi1 = self.names.is_multi_token(first);
        let multi2 = self.names.is_multi_token(second);

        let (keep1, keep2) = if label1 == label2 {
            (false, !(multi1 || multi2))
        } else {
            (!multi1, !multi2)
        };

        let suffix = |keep: bool, label: FandomLabel| {
            if keep {
                self.classifier.suffix(label)
            } else {
                String::new()
            }
        };

        format!(
            "{}{}/{}{}",
            first,
            suffix(keep1, label1),
            second,
            suffix(keep2, label2)
        )
    }

    /// Orders two names by family-name sort key, falling back to the raw names on a tie
    fn order<'a>(&self, name1: &'a str, name2: &'a str) -> (&'a str, &'a str) {
        let key1 = self.names.sort_key(name1);
        let key2 = self.names.sort_key(name2);

        if (key1.as_str(), name1) <= (key2.as_str(), name2) {
            (name1, name2)
        } else {
            (name2, name1)
        }
    }
}
