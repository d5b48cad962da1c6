/// An unordered pair of roster characters; both sides may be the same character
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Pairing {
    /// Character at the earlier roster position
    pub a: String,

    /// Character at the same or a later roster position
    pub b: String,
}

impl Pairing {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn is_self_pairing(&self) -> bool {
        self.a == self.b
    }
}

/// Enumerates all combinations with replacement of the roster, in roster order
///
/// For each character `A` in order, `B` ranges from `A`'s own position to the end of the
/// roster, so a roster of `n` names yields `n * (n + 1) / 2` pairings.
pub fn enumerate_pairings(roster: &[String]) -> Vec<Pairing> {
    let mut pairings = Vec::with_capacity(pairing_count(roster.len()));
    for (i, a) in roster.iter().enumerate() {
        for b in &roster[i..] {
            pairings.push(Pairing::new(a.as_str(), b.as_str()));
        }
    }
    pairings
}

/// Number of pairings for a roster of `n` characters
pub fn pairing_count(n: usize) -> usize {
    n * (n + 1) / 2
}
