#![no_main]

use std::sync::Arc;

use ballot_engine::{CampaignSnapshot, ManualClock, Secp256k1Verifier, VoteEngine};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Decoding and consistency checks must reject garbage without panicking
    if let Ok(snap) = serde_json::from_slice::<CampaignSnapshot>(data) {
        let _ = VoteEngine::restore(snap, Secp256k1Verifier, Arc::new(ManualClock::new(0)));
    }
});
