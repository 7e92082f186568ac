mod common;

use std::sync::Arc;

use ballot_engine::{
    Ballot, CampaignSnapshot, ManualClock, Secp256k1Verifier, SnapshotError, SnapshotStore, VoteEngine, VoteError,
    SNAPSHOT_VERSION,
};
use common::{fixture, ticket, voter, Fixture, OPEN};
use tempfile::tempdir;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn populated() -> Fixture {
    let f = fixture(4);
    f.vote(voter(1), &[0, 1, 3], ticket(1)).unwrap();
    f.vote(voter(2), &[2], ticket(2)).unwrap();
    f.vote(voter(3), &[1, 2], ticket(3)).unwrap();
    f
}

#[test]
fn store_roundtrip_restores_an_equivalent_engine() {
    init_tracing();
    let f = populated();
    let dir = tempdir().expect("temporary directory");
    let store = SnapshotStore::new(dir.path().join("campaign")).unwrap();
    assert!(store.load().unwrap().is_none());

    store.save(&f.engine.snapshot()).unwrap();
    assert!(store.path().exists());
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, f.engine.snapshot());

    let clock = Arc::new(ManualClock::new(OPEN + 50));
    let restored = VoteEngine::restore(loaded, Secp256k1Verifier, Arc::clone(&clock)).unwrap();
    assert_eq!(restored.tally(), f.engine.tally());
    assert_eq!(restored.events(), f.engine.events());
    assert_eq!(restored.audit_root(), f.engine.audit_root());
    assert_eq!(restored.receipt_uri(2).as_deref(), Some("ipfs://receipts/2.json"));

    // Guards survive the restart.
    let sig2 = f.sign(&ticket(2));
    let reused = Ballot { ranked: &[0], memo: b"", ticket: ticket(2), signature: &sig2 };
    assert_eq!(restored.cast_vote(voter(9), &reused), Err(VoteError::TicketReused));
    let sig4 = f.sign(&ticket(4));
    let fresh = Ballot { ranked: &[3], memo: b"", ticket: ticket(4), signature: &sig4 };
    assert_eq!(restored.cast_vote(voter(1), &fresh), Err(VoteError::AlreadyVoted(voter(1))));
    assert_eq!(restored.cast_vote(voter(4), &fresh), Ok(3));
}

fn rejects(mutate: impl FnOnce(&mut CampaignSnapshot)) -> SnapshotError {
    let mut snap = populated().engine.snapshot();
    mutate(&mut snap);
    let clock = Arc::new(ManualClock::new(OPEN));
    match VoteEngine::restore(snap, Secp256k1Verifier, clock) {
        Ok(_) => panic!("inconsistent snapshot accepted"),
        Err(e) => e,
    }
}

#[test]
fn inconsistent_snapshots_are_rejected() {
    assert!(matches!(rejects(|s| s.version = SNAPSHOT_VERSION + 1), SnapshotError::Version(_)));
    let cases: Vec<Box<dyn FnOnce(&mut CampaignSnapshot)>> = vec![
        Box::new(|s| s.tally[0] += 1),
        Box::new(|s| s.tally.push(0)),
        Box::new(|s| s.next_receipt_id += 1),
        Box::new(|s| {
            s.voters.pop();
        }),
        Box::new(|s| s.tickets[1] = s.tickets[0]),
        Box::new(|s| s.receipt_owners.swap(0, 1)),
        Box::new(|s| s.events[2].ranked = vec![3]),
        Box::new(|s| s.events[0].receipt_id = 7),
        Box::new(|s| s.voters[0] = voter(77)),
        Box::new(|s| s.events[1].ticket = s.events[0].ticket),
        Box::new(|s| s.events[0].ranked = vec![0, 1, 2, 3]),
    ];
    for mutate in cases {
        assert!(matches!(rejects(mutate), SnapshotError::Inconsistent(_)));
    }
}

#[test]
fn corrupt_file_reports_json_error() {
    let dir = tempdir().expect("temporary directory");
    let store = SnapshotStore::new(dir.path()).unwrap();
    std::fs::write(store.path(), b"{ not json").unwrap();
    assert!(matches!(store.load(), Err(SnapshotError::Json(_))));
}

#[test]
fn log_must_hold_each_voter_and_ticket_once() {
    // Voter 1 holding two receipts while voter 2 sits in the registry with none.
    let err = rejects(|s| {
        s.events[1].voter = voter(1);
        s.receipt_owners[1] = voter(1);
    });
    assert!(matches!(err, SnapshotError::Inconsistent("voter appears twice in the log")));

    let err = rejects(|s| s.events[2].ticket = s.events[1].ticket);
    assert!(matches!(err, SnapshotError::Inconsistent("ticket appears twice in the log")));
}

#[test]
fn log_entries_must_be_valid_ballots() {
    // Same candidates as the original entry, so only the ordering is wrong.
    let err = rejects(|s| s.events[0].ranked = vec![1, 0, 3]);
    assert!(matches!(err, SnapshotError::Inconsistent("log entry has an invalid ballot")));

    let err = rejects(|s| s.events[1].ranked = vec![]);
    assert!(matches!(err, SnapshotError::Inconsistent("log entry has an invalid ballot")));
}
