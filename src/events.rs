use ballot_primitives::{constants, h_tag, le_bytes, merkle_path, merkle_root, merkle_verify_leaf, Hash256, MerklePath};
use serde::{Deserialize, Serialize};

use crate::types::{CandidateId, Identity, ReceiptId, TicketId};

/// Public record of one successful redemption.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteCast {
    pub ranked: Vec<CandidateId>,
    pub ticket: TicketId,
    pub voter: Identity,
    pub receipt_id: ReceiptId,
}

impl VoteCast {
    /// Canonical bytes: `LE(receipt_id,8) || voter || ticket || LE(n,4) || Σ LE(id,4)`.
    #[must_use]
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(8 + 20 + 32 + 4 + 4 * self.ranked.len());
        out.extend_from_slice(&le_bytes::<8>(u128::from(self.receipt_id)));
        out.extend_from_slice(self.voter.as_bytes());
        out.extend_from_slice(self.ticket.as_bytes());
        out.extend_from_slice(&le_bytes::<4>(self.ranked.len() as u128));
        for id in &self.ranked {
            out.extend_from_slice(&le_bytes::<4>(u128::from(*id)));
        }
        out
    }

    /// `H("ballot.vote.cast", [canonical_bytes])`
    #[must_use]
    pub fn digest(&self) -> Hash256 {
        h_tag(constants::TAG_VOTE_CAST, &[&self.canonical_bytes()])
    }
}

/// Receives vote-cast notifications after the commit has been released.
/// Sinks may call back into the engine.
pub trait VoteSink: Send + Sync {
    fn on_vote_cast(&self, event: &VoteCast);
}

/// Append-only log of `VoteCast` records in commit order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventLog {
    entries: Vec<VoteCast>,
}

impl EventLog {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub(crate) fn from_entries(entries: Vec<VoteCast>) -> Self {
        Self { entries }
    }

    pub(crate) fn append(&mut self, event: VoteCast) {
        self.entries.push(event);
    }

    #[must_use]
    pub fn entries(&self) -> &[VoteCast] {
        &self.entries
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn leaves(&self) -> Vec<Vec<u8>> {
        self.entries.iter().map(VoteCast::canonical_bytes).collect()
    }

    /// Merkle commitment over the canonical bytes of every entry, in log order.
    #[must_use]
    pub fn audit_root(&self) -> Hash256 {
        audit_root_of(&self.entries)
    }

    /// Inclusion path for the entry at `position`.
    #[must_use]
    pub fn inclusion_proof(&self, position: u64) -> Option<MerklePath> {
        merkle_path(&self.leaves(), position)
    }
}

/// Recompute the audit root from an externally obtained log.
#[must_use]
pub fn audit_root_of(entries: &[VoteCast]) -> Hash256 {
    let leaves: Vec<Vec<u8>> = entries.iter().map(VoteCast::canonical_bytes).collect();
    merkle_root(&leaves)
}

/// Check that `event` is committed under `root` at `path.index`.
#[must_use]
pub fn verify_inclusion(root: &Hash256, event: &VoteCast, path: &MerklePath) -> bool {
    merkle_verify_leaf(root, &event.canonical_bytes(), path)
}
