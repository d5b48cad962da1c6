//! Fandom classification for character names

use std::collections::HashSet;
use std::fmt;

/// The two fandom buckets a character can belong to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FandomLabel {
    /// Member of the champion set
    Champion,
    /// Everyone else
    Default,
}

impl fmt::Display for FandomLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Champion => write!(f, "champion"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Static champion-set lookup plus the label text used in disambiguation suffixes
///
/// Built once from configuration and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct FandomClassifier {
    champions: HashSet<String>,
    champion_fandom: String,
    default_fandom: String,
}

impl FandomClassifier {
    pub fn new<I, S>(champions: I, champion_fandom: &str, default_fandom: &str) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            champions: champions.into_iter().map(Into::into).collect(),
            champion_fandom: champion_fandom.to_string(),
            default_fandom: default_fandom.to_string(),
        }
    }

    /// Classifies a character by champion-set membership
    pub fn classify(&self, name: &str) -> FandomLabel {
        if self.champions.contains(name) {
            FandomLabel::Champion
        } else {
            FandomLabel::Default
        }
    }

    /// Human-readable fandom text for a label, e.g. `League of Legends`
    pub fn label_text(&self, label: FandomLabel) -> &str {
        match label {
            FandomLabel::Champion => &self.champion_fandom,
            FandomLabel::Default => &self.default_fandom,
        }
    }

    /// Disambiguation suffix for a label, e.g. ` (League of Legends)`
    pub fn suffix(&self, label: FandomLabel) -> String {
        format!(" ({})", self.label_text(label))
    }
}
