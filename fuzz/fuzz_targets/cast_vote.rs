#![no_main]

use std::sync::Arc;

use ballot_engine::{
    Ballot, CampaignParameters, Identity, ManualClock, Secp256k1Verifier, TicketId, TicketSigner, VoteEngine,
};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // voter(20) || ticket(32) || n(1) || ranked(4 each) || memo_len(1) || sign(1) || rest = raw signature
    if data.len() < 20 + 32 + 1 + 1 + 1 { return; }
    let Ok(signer) = TicketSigner::from_bytes(&[0x5A; 32]) else { return };
    let Ok(params) = CampaignParameters::new(0, 100, 4, signer.identity()) else { return };
    let engine = VoteEngine::new(params, Secp256k1Verifier, Arc::new(ManualClock::new(50)));

    let mut offset = 0;
    let voter = Identity(data[offset..offset + 20].try_into().unwrap_or([0u8; 20]));
    offset += 20;
    let ticket = TicketId(data[offset..offset + 32].try_into().unwrap_or([0u8; 32]));
    offset += 32;
    let n = usize::from(data[offset] % 5);
    offset += 1;
    if data.len() < offset + 4 * n + 2 { return; }
    let ranked: Vec<u32> = data[offset..offset + 4 * n]
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes(c.try_into().unwrap_or([0u8; 4])) % 6)
        .collect();
    offset += 4 * n;
    let memo_len = usize::from(data[offset]);
    offset += 1;
    let use_admin = data[offset] & 1 == 1;
    offset += 1;
    let memo = vec![0u8; memo_len];

    let signature = if use_admin {
        signer.sign_ticket(&ticket).map(|s| s.to_vec()).unwrap_or_default()
    } else {
        data[offset..].to_vec()
    };
    let ballot = Ballot { ranked: &ranked, memo: &memo, ticket, signature: &signature };

    let before = engine.tally();
    let first = engine.cast_vote(voter, &ballot);
    // A rejected ballot must not touch the tally; an accepted one cannot be replayed
    if first.is_err() {
        assert_eq!(engine.tally(), before);
    } else {
        assert!(engine.cast_vote(voter, &ballot).is_err());
        assert_eq!(engine.receipts_issued(), 1);
    }
});
