#![no_main]

use ballot_engine::{Secp256k1Verifier, SignatureVerifier};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 32 { return; }
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&data[..32]);

    // Any byte string must yield an identity or Malformed, never a panic
    let _ = Secp256k1Verifier.recover_identity(&digest, &data[32..]);
});
