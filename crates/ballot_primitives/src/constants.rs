#![forbid(unsafe_code)]

pub const TAG_MERKLE_LEAF: &str = "ballot.merkle.leaf";
pub const TAG_MERKLE_NODE: &str = "ballot.merkle.node";
pub const TAG_MERKLE_EMPTY: &str = "ballot.merkle.empty";

pub const TAG_VOTE_CAST: &str = "ballot.vote.cast";

/// Personal-message prefix for a 32-byte payload (EIP-191 version `0x45`).
pub const ETH_MESSAGE_PREFIX_32: &[u8] = b"\x19Ethereum Signed Message:\n32";
