#![forbid(unsafe_code)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::multiple_crate_versions
)]

//! Ballot ledger primitives: hashing, address derivation, fixed-width encodings, binary Merkle trees.
//
// Shared by the vote engine and by external auditors recomputing the public log:
//
// - Keccak-256 and the personal-message digest used for ticket signatures
// - 20-byte address derivation from uncompressed secp256k1 public keys
// - Domain-tagged SHA3-256 with length framing
// - Binary Merkle (duplicate last when odd) and leaf verification
// - Constant-time equality helpers for 32-byte digests

use sha3::{Digest, Keccak256, Sha3_256};
use subtle::ConstantTimeEq;

/// 32-byte hash (SHA3-256 or Keccak-256 output).
pub type Hash256 = [u8; 32];

/// 20-byte account address (tail of Keccak-256 over the public key).
pub type Address20 = [u8; 20];

pub mod constants;

/// Convert an unsigned integer to fixed-width little-endian bytes.
///
/// The output is exactly `W` bytes (no overlong encodings).
#[must_use]
pub fn le_bytes<const W: usize>(mut x: u128) -> [u8; W] {
    let mut out = [0u8; W];
    let mut i = 0usize;
    while i < W {
        out[i] = (x & 0xFF) as u8;
        x >>= 8;
        i += 1;
    }
    out
}

/// Plain Keccak-256 (pre-standard SHA3 padding), as used for account addresses.
#[must_use]
pub fn keccak256(input: &[u8]) -> Hash256 {
    let mut hasher = Keccak256::new();
    hasher.update(input);
    hasher.finalize().into()
}

/// `keccak256("\x19Ethereum Signed Message:\n32" || payload)`
#[must_use]
pub fn personal_message_hash(payload: &Hash256) -> Hash256 {
    let mut hasher = Keccak256::new();
    hasher.update(constants::ETH_MESSAGE_PREFIX_32);
    hasher.update(payload);
    hasher.finalize().into()
}

/// Derive the 20-byte address from the raw `X || Y` coordinates of a public key.
#[must_use]
pub fn address_from_coordinates(xy: &[u8]) -> Address20 {
    let digest = keccak256(xy);
    let mut out = [0u8; 20];
    out.copy_from_slice(&digest[12..]);
    out
}

/// Derive the 20-byte address from a SEC1 uncompressed public key (`0x04 || X || Y`).
///
/// Returns `None` unless the input is exactly 65 bytes with the `0x04` prefix.
#[must_use]
pub fn address_from_uncompressed(pubkey: &[u8]) -> Option<Address20> {
    if pubkey.len() != 65 || pubkey[0] != 0x04 {
        return None;
    }
    Some(address_from_coordinates(&pubkey[1..]))
}

/// Parse a hex address, with or without a `0x` prefix.
#[must_use]
pub fn parse_address(s: &str) -> Option<Address20> {
    let body = s.strip_prefix("0x").unwrap_or(s);
    let mut out = [0u8; 20];
    hex::decode_to_slice(body, &mut out).ok()?;
    Some(out)
}

/// Domain-tagged SHA3-256 with length framing:
/// `H(tag_ascii, parts[])` = `SHA3_256`( UTF8(tag) || Σ ( LE(|p|,8) || p ) )
#[must_use]
pub fn h_tag(tag: &str, parts: &[&[u8]]) -> Hash256 {
    debug_assert!(
        tag.starts_with("ballot."),
        "non-ballot.* tag used in ledger hashing: {tag}"
    );
    let mut hasher = Sha3_256::new();
    hasher.update(tag.as_bytes());
    for p in parts {
        let len_le = le_bytes::<8>(p.len() as u128);
        hasher.update(len_le);
        hasher.update(p);
    }
    hasher.finalize().into()
}

/// Compute the Merkle leaf hash of a payload using the shared leaf domain tag.
#[must_use]
pub fn merkle_leaf(payload: &[u8]) -> Hash256 {
    h_tag(constants::TAG_MERKLE_LEAF, &[payload])
}

/// Compute the Merkle node hash from two child node hashes using the shared node domain tag.
#[must_use]
pub fn merkle_node(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut cat = [0u8; 64];
    cat[..32].copy_from_slice(left);
    cat[32..].copy_from_slice(right);
    h_tag(constants::TAG_MERKLE_NODE, &[&cat])
}

/// Compute the binary Merkle root. When the number of nodes at a level is odd,
/// the last node is duplicated. The empty tree root is `H("ballot.merkle.empty", [])`.
#[must_use]
pub fn merkle_root(leaves_payload: &[Vec<u8>]) -> Hash256 {
    if leaves_payload.is_empty() {
        return h_tag(constants::TAG_MERKLE_EMPTY, &[]);
    }
    let mut level: Vec<Hash256> = leaves_payload.iter().map(|p| merkle_leaf(p)).collect();
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            if let Some(last) = level.last().copied() {
                level.push(last);
            }
        }
        let next: Vec<Hash256> = level
            .chunks_exact(2)
            .map(|pair| merkle_node(&pair[0], &pair[1]))
            .collect();
        level = next;
    }
    level[0]
}

/// Authentication path from a leaf to the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MerklePath {
    /// Sibling hashes from leaf to root.
    pub siblings: Vec<Hash256>,
    /// Leaf index in the tree (0-based).
    pub index: u64,
}

/// Build the authentication path for leaf `index`, or `None` if out of range.
#[must_use]
pub fn merkle_path(leaves_payload: &[Vec<u8>], index: u64) -> Option<MerklePath> {
    let pos = usize::try_from(index).ok()?;
    if pos >= leaves_payload.len() {
        return None;
    }
    let mut level: Vec<Hash256> = leaves_payload.iter().map(|p| merkle_leaf(p)).collect();
    let mut siblings = Vec::new();
    let mut idx = pos;
    while level.len() > 1 {
        if level.len() % 2 == 1 {
            if let Some(last) = level.last().copied() {
                level.push(last);
            }
        }
        siblings.push(level[idx ^ 1]);
        level = level
            .chunks_exact(2)
            .map(|pair| merkle_node(&pair[0], &pair[1]))
            .collect();
        idx >>= 1;
    }
    Some(MerklePath { siblings, index })
}

/// Verify a Merkle leaf payload against the supplied root with the given path.
#[must_use]
pub fn merkle_verify_leaf(root: &Hash256, leaf_payload: &[u8], path: &MerklePath) -> bool {
    let mut h = merkle_leaf(leaf_payload);
    let mut idx = path.index;
    for sib in &path.siblings {
        h = if idx & 1 == 0 {
            merkle_node(&h, sib)
        } else {
            merkle_node(sib, &h)
        };
        idx >>= 1;
    }
    ct_eq_hash(root, &h)
}

/// Constant-time equality for two 32-byte hashes.
#[must_use]
pub fn ct_eq_hash(a: &Hash256, b: &Hash256) -> bool {
    a.ct_eq(b).into()
}

/// Constant-time equality for two addresses.
#[must_use]
pub fn ct_eq_address(a: &Address20, b: &Address20) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tag_asserts {
    use super::*;

    #[test]
    fn all_public_tag_constants_are_ballot_namespaced() {
        let tags = [
            constants::TAG_MERKLE_LEAF,
            constants::TAG_MERKLE_NODE,
            constants::TAG_MERKLE_EMPTY,
            constants::TAG_VOTE_CAST,
        ];
        for t in tags {
            assert!(t.starts_with("ballot."), "tag not ballot.*: {t}");
        }
    }
}
