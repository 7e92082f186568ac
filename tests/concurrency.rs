mod common;

use std::collections::BTreeSet;
use std::thread;

use ballot_engine::{Ballot, VoteError};
use common::{fixture, ticket, voter};

#[test]
fn shared_ticket_is_redeemed_exactly_once() {
    let f = fixture(3);
    let t = ticket(42);
    let sig = f.sign(&t);

    let results: Vec<Result<u64, VoteError>> = thread::scope(|s| {
        let handles: Vec<_> = (0..100u16)
            .map(|n| {
                let (f, sig) = (&f, &sig);
                s.spawn(move || {
                    f.engine.cast_vote(
                        voter(n),
                        &Ballot { ranked: &[1], memo: b"", ticket: t, signature: sig },
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let ok = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(ok, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|e| *e == VoteError::TicketReused));
    assert_eq!(f.engine.tally(), vec![0, 1, 0]);
    assert_eq!(f.engine.receipts_issued(), 1);
    assert_eq!(f.engine.events().len(), 1);
}

#[test]
fn same_voter_racing_with_distinct_tickets_votes_once() {
    let f = fixture(2);
    let sigs: Vec<Vec<u8>> = (0..32).map(|n| f.sign(&ticket(n))).collect();

    let ok = thread::scope(|s| {
        let handles: Vec<_> = sigs
            .iter()
            .enumerate()
            .map(|(n, sig)| {
                let f = &f;
                s.spawn(move || f.vote_with(voter(9), &[0], b"", ticket(n as u32), sig))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).filter(Result::is_ok).count()
    });

    assert_eq!(ok, 1);
    assert_eq!(f.engine.tally(), vec![1, 0]);
    assert_eq!(f.engine.receipts_of(&voter(9)), vec![0]);
}

#[test]
fn concurrent_distinct_voters_get_gapless_receipts() {
    let f = fixture(4);
    let sigs: Vec<Vec<u8>> = (0..64).map(|n| f.sign(&ticket(n))).collect();

    thread::scope(|s| {
        for (n, sig) in sigs.iter().enumerate() {
            let f = &f;
            s.spawn(move || {
                let ranked: &[u32] = if n % 2 == 0 { &[0, 3] } else { &[1] };
                f.vote_with(voter(n as u16), ranked, b"", ticket(n as u32), sig).unwrap();
            });
        }
    });

    assert_eq!(f.engine.receipts_issued(), 64);
    assert_eq!(f.engine.tally(), vec![32, 32, 0, 32]);

    let events = f.engine.events();
    let ids: Vec<u64> = events.iter().map(|e| e.receipt_id).collect();
    assert_eq!(ids, (0..64).collect::<Vec<_>>());
    let owners: BTreeSet<_> = events
        .iter()
        .map(|e| {
            assert_eq!(f.engine.receipt_owner(e.receipt_id), Some(e.voter));
            e.voter
        })
        .collect();
    assert_eq!(owners.len(), 64);
}
