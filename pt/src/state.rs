//! World-state snapshots

use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use crate::proposition::Proposition;

/// Capabilities of a set of propositions holding at one point in a trace
///
/// The patcher only talks to states through this trait, so tests can
/// substitute their own implementation.
pub trait WorldState {
    /// Number of literals held
    fn size(&self) -> usize;

    /// Membership query for one literal
    fn contains(&self, prop: &Proposition) -> bool;

    /// Insert a literal if absent; returns true if it was added
    fn add_proposition(&mut self, prop: Proposition) -> bool;

    /// Literals in insertion order
    fn literals(&self) -> &[Proposition];

    /// Literals as a set
    fn all_propositions(&self) -> BTreeSet<Proposition> {
        self.literals().iter().cloned().collect()
    }

    /// Make the closed-world assumption explicit against `universe`
    ///
    /// Every positive atom of the universe that this state does not hold is
    /// added as `(not atom)`, so absence no longer has to be read as false.
    fn complete_under_cwa(&mut self, universe: &BTreeSet<Proposition>) -> usize {
        let missing: Vec<Proposition> = universe
            .iter()
            .filter(|p| !p.is_negated() && !self.contains(p))
            .map(Proposition::negate)
            .collect();

        let mut added = 0;
        for negative in missing {
            if self.add_proposition(negative) {
                added += 1;
            }
        }
        debug!(%added, universe = universe.len(), "WorldState::complete_under_cwa: done");
        added
    }
}

/// Insertion-ordered set of literals
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    literals: Vec<Proposition>,
    index: HashSet<Proposition>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.literals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposition> {
        self.literals.iter()
    }
}

impl WorldState for Snapshot {
    fn size(&self) -> usize {
        self.literals.len()
    }

    fn contains(&self, prop: &Proposition) -> bool {
        self.index.contains(prop)
    }

    fn add_proposition(&mut self, prop: Proposition) -> bool {
        if self.index.insert(prop.clone()) {
            self.literals.push(prop);
            true
        } else {
            false
        }
    }

    fn literals(&self) -> &[Proposition] {
        &self.literals
    }
}

impl FromIterator<Proposition> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Proposition>>(iter: I) -> Self {
        let mut snapshot = Snapshot::new();
        for prop in iter {
            snapshot.add_proposition(prop);
        }
        snapshot
    }
}
