use std::sync::Arc;

use ballot_engine::{
    audit_root_of, ticket_digest, Ballot, CampaignParameters, Identity, ManualClock, Secp256k1Verifier,
    SignatureVerifier, TicketId, TicketSigner, VoteCast, VoteEngine,
};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn bench_signature_recover(c: &mut Criterion) {
    let signer = TicketSigner::from_bytes(&[0x5A; 32]).unwrap();
    let ticket = TicketId([7u8; 32]);
    let digest = ticket_digest(&ticket);
    let sig = signer.sign_ticket(&ticket).unwrap();

    c.bench_function("signature_recover", |b| {
        b.iter(|| {
            let _ = Secp256k1Verifier.recover_identity(black_box(&digest), black_box(&sig));
        });
    });
}

fn bench_ticket_sign(c: &mut Criterion) {
    let signer = TicketSigner::from_bytes(&[0x5A; 32]).unwrap();
    let ticket = TicketId([7u8; 32]);

    c.bench_function("ticket_sign", |b| {
        b.iter(|| {
            let _ = signer.sign_ticket(black_box(&ticket));
        });
    });
}

fn bench_cast_vote(c: &mut Criterion) {
    let signer = TicketSigner::from_bytes(&[0x5A; 32]).unwrap();
    let params = CampaignParameters::new(0, u64::MAX, 8, signer.identity()).unwrap();
    let engine = VoteEngine::new(params, Secp256k1Verifier, Arc::new(ManualClock::new(1)));
    let mut n = 0u64;

    c.bench_function("cast_vote", |b| {
        b.iter_batched(
            || {
                n += 1;
                let mut t = [0u8; 32];
                t[..8].copy_from_slice(&n.to_le_bytes());
                let mut v = [0u8; 20];
                v[..8].copy_from_slice(&n.to_le_bytes());
                let ticket = TicketId(t);
                (Identity(v), ticket, signer.sign_ticket(&ticket).unwrap())
            },
            |(voter, ticket, sig)| {
                let ballot = Ballot { ranked: &[1, 4, 6], memo: b"", ticket, signature: &sig };
                let _ = engine.cast_vote(voter, black_box(&ballot));
            },
            BatchSize::SmallInput,
        );
    });
}

fn bench_audit_root(c: &mut Criterion) {
    let events: Vec<VoteCast> = (0..1024u64)
        .map(|i| VoteCast {
            ranked: vec![0, 3],
            ticket: TicketId([i as u8; 32]),
            voter: Identity([(i >> 2) as u8; 20]),
            receipt_id: i,
        })
        .collect();

    c.bench_function("audit_root_1024", |b| {
        b.iter(|| {
            let _ = audit_root_of(black_box(&events));
        });
    });
}

criterion_group!(
    benches,
    bench_signature_recover,
    bench_ticket_sign,
    bench_cast_vote,
    bench_audit_root
);
criterion_main!(benches);
