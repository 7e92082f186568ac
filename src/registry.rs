use std::collections::BTreeSet;

use crate::types::{Identity, TicketId};

/// Insertion-only set: a redeemed ticket or a voter who has voted stays recorded
/// for the campaign's lifetime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppendOnlySet<K: Ord> {
    members: BTreeSet<K>,
}

/// Tickets that have been redeemed.
pub type TicketRegistry = AppendOnlySet<TicketId>;
/// Identities that have cast a ballot.
pub type VoterRegistry = AppendOnlySet<Identity>;

impl<K: Ord> AppendOnlySet<K> {
    #[must_use]
    pub const fn new() -> Self {
        Self { members: BTreeSet::new() }
    }

    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.members.contains(key)
    }

    /// Check-and-set in one step: returns `false` (and changes nothing) if `key` was present.
    pub fn insert_if_absent(&mut self, key: K) -> bool {
        self.members.insert(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.members.iter()
    }
}

impl<K: Ord> Default for AppendOnlySet<K> {
    fn default() -> Self {
        Self::new()
    }
}
