use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::clock::Clock;
use crate::engine::{check_ballot_shape, CampaignState, VoteEngine};
use crate::errors::SnapshotError;
use crate::events::{EventLog, VoteCast};
use crate::params::CampaignParameters;
use crate::receipt::ReceiptIssuer;
use crate::registry::{TicketRegistry, VoterRegistry};
use crate::tally::TallyStore;
use crate::types::{Identity, ReceiptId, TicketId};
use crate::verifier::SignatureVerifier;

pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable image of one campaign's persisted state.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignSnapshot {
    pub version: u32,
    pub params: CampaignParameters,
    pub tally: Vec<u64>,
    pub voters: Vec<Identity>,
    pub tickets: Vec<TicketId>,
    pub next_receipt_id: ReceiptId,
    pub receipt_owners: Vec<Identity>,
    pub events: Vec<VoteCast>,
}

impl CampaignState {
    #[must_use]
    pub fn to_snapshot(&self) -> CampaignSnapshot {
        CampaignSnapshot {
            version: SNAPSHOT_VERSION,
            params: self.params.clone(),
            tally: self.tally.snapshot(),
            voters: self.voters.iter().copied().collect(),
            tickets: self.tickets.iter().copied().collect(),
            next_receipt_id: self.receipts.issued(),
            receipt_owners: self.receipts.owners().to_vec(),
            events: self.log.entries().to_vec(),
        }
    }

    /// Rebuild state, rejecting any snapshot that could not have been produced by a
    /// sequence of successful votes.
    pub fn from_snapshot(snap: CampaignSnapshot) -> Result<Self, SnapshotError> {
        if snap.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::Version(snap.version));
        }
        let count = snap.params.candidate_count();
        if count == 0 || snap.tally.len() != count as usize {
            return Err(SnapshotError::Inconsistent("tally length differs from candidate count"));
        }
        let issued = snap.receipt_owners.len();
        if snap.next_receipt_id != issued as ReceiptId {
            return Err(SnapshotError::Inconsistent("receipt counter differs from ownership table"));
        }
        if snap.voters.len() != issued || snap.tickets.len() != issued || snap.events.len() != issued {
            return Err(SnapshotError::Inconsistent("registries, receipts and log disagree in size"));
        }

        // Registries are rebuilt from the log; each voter and each ticket appears once.
        let mut voters = VoterRegistry::new();
        let mut tickets = TicketRegistry::new();
        let mut replay = TallyStore::new(count);
        for (i, ev) in snap.events.iter().enumerate() {
            if ev.receipt_id != i as ReceiptId || snap.receipt_owners[i] != ev.voter {
                return Err(SnapshotError::Inconsistent("log entry does not match its receipt"));
            }
            check_ballot_shape(&ev.ranked, &[])
                .map_err(|_| SnapshotError::Inconsistent("log entry has an invalid ballot"))?;
            if !voters.insert_if_absent(ev.voter) {
                return Err(SnapshotError::Inconsistent("voter appears twice in the log"));
            }
            if !tickets.insert_if_absent(ev.ticket) {
                return Err(SnapshotError::Inconsistent("ticket appears twice in the log"));
            }
            replay
                .increment_all(&ev.ranked)
                .map_err(|_| SnapshotError::Inconsistent("log entry names unknown candidate"))?;
        }
        if !voters.iter().eq(sorted(snap.voters).iter()) {
            return Err(SnapshotError::Inconsistent("voter registry differs from the log"));
        }
        if !tickets.iter().eq(sorted(snap.tickets).iter()) {
            return Err(SnapshotError::Inconsistent("ticket registry differs from the log"));
        }
        if replay.snapshot() != snap.tally {
            return Err(SnapshotError::Inconsistent("tally does not match the log"));
        }

        Ok(Self {
            params: snap.params,
            tally: TallyStore::from_counters(snap.tally),
            voters,
            tickets,
            receipts: ReceiptIssuer::from_owners(snap.receipt_owners),
            log: EventLog::from_entries(snap.events),
        })
    }
}

fn sorted<K: Ord>(mut keys: Vec<K>) -> Vec<K> {
    keys.sort_unstable();
    keys
}

impl<V: SignatureVerifier, C: Clock> VoteEngine<V, C> {
    #[must_use]
    pub fn snapshot(&self) -> CampaignSnapshot {
        self.with_state(CampaignState::to_snapshot)
    }

    pub fn restore(snap: CampaignSnapshot, verifier: V, clock: C) -> Result<Self, SnapshotError> {
        let state = CampaignState::from_snapshot(snap)?;
        info!(receipts = state.receipts().issued(), "campaign restored from snapshot");
        Ok(Self::from_state(state, verifier, clock))
    }
}

/// JSON file store; writes go to a temp file and are renamed into place.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new<P: AsRef<Path>>(data_dir: P) -> Result<Self, SnapshotError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self {
            path: data_dir.as_ref().join("campaign_snapshot.json"),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<CampaignSnapshot>, SnapshotError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)?;
        let snap = serde_json::from_slice::<CampaignSnapshot>(&data)?;
        Ok(Some(snap))
    }

    pub fn save(&self, snapshot: &CampaignSnapshot) -> Result<(), SnapshotError> {
        let data = serde_json::to_vec_pretty(snapshot)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data)?;
        fs::rename(&tmp_path, &self.path)?;
        info!(path = %self.path.display(), receipts = snapshot.next_receipt_id, "snapshot saved");
        Ok(())
    }
}
