use thiserror::Error;

use crate::types::{CandidateId, Identity, Timestamp};

/// Signature recovery failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("malformed signature: not a valid recoverable secp256k1 encoding")]
    Malformed,
}

/// Candidate id beyond the configured candidate count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("candidate {candidate} out of range: campaign has {count} candidates")]
pub struct OutOfRange {
    pub candidate: CandidateId,
    pub count: u32,
}

/// Rejection reasons for a ballot redemption. None of them leave state behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VoteError {
    #[error("campaign not open: now {now}, opens at {start}")]
    NotOpen { now: Timestamp, start: Timestamp },

    #[error("campaign closed: now {now}, closed at {end}")]
    Closed { now: Timestamp, end: Timestamp },

    #[error("voter {0} has already cast a ballot")]
    AlreadyVoted(Identity),

    #[error("invalid ballot size: {got} (expected 1..={max})")]
    InvalidBallotSize { got: usize, max: usize },

    #[error("ranked candidates must be strictly ascending")]
    InvalidOrdering,

    #[error("memo too long: {got} bytes (max {max})")]
    MemoTooLong { got: usize, max: usize },

    #[error("ticket already redeemed")]
    TicketReused,

    #[error("ticket not signed by the campaign administrator")]
    Unauthorized,

    #[error(transparent)]
    OutOfRange(#[from] OutOfRange),

    #[error(transparent)]
    Verification(#[from] VerificationError),
}

/// Administrative write rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdminError {
    #[error("caller {0} is not the campaign administrator")]
    NotAdministrator(Identity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid length: expected {expected} got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex encoding")]
    BadHex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SignerError {
    #[error("invalid secret key")]
    InvalidKey,

    #[error("signing failed")]
    SigningFailed,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("candidate count must be at least 1")]
    NoCandidates,

    #[error("invalid window: start {start} is after end {end}")]
    InvalidWindow { start: Timestamp, end: Timestamp },

    #[error("invalid administrator address: {0}")]
    BadAdministrator(DecodeError),
}

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    Version(u32),

    #[error("inconsistent snapshot: {0}")]
    Inconsistent(&'static str),
}
