#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

//! Ticket-authorized ranked-choice voting ledger.
//!
//! An administrator pre-signs single-use 32-byte tickets. A holder redeems a
//! ticket exactly once to cast a ranked ballot (up to three candidates,
//! strictly ascending) inside the campaign window; each redemption increments
//! the per-candidate tally and issues a sequential, non-transferable receipt.
//
// Fixed choices:
// - Signature: secp256k1 ECDSA with public-key recovery (`k256`)
// - Identity: last 20 bytes of Keccak-256 over the uncompressed public key
// - Ticket digest: personal-message hash of the 32-byte ticket
// - Audit log commitment: binary Merkle over domain-tagged SHA3-256
//
// No wall clock, network, or storage access inside the engine; time, signature
// recovery and persistence are injected.

pub mod types;
pub mod errors;
pub mod clock;
pub mod verifier;
pub mod registry;
pub mod tally;
pub mod receipt;
pub mod params;
pub mod events;
pub mod engine;
pub mod config;
pub mod snapshot;

pub use types::*;
pub use errors::{AdminError, ConfigError, DecodeError, OutOfRange, SignerError, SnapshotError, VerificationError, VoteError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use verifier::{ticket_digest, Secp256k1Verifier, SignatureVerifier, TicketSigner};
pub use registry::{AppendOnlySet, TicketRegistry, VoterRegistry};
pub use tally::TallyStore;
pub use receipt::{render_receipt_uri, ReceiptIssuer};
pub use params::CampaignParameters;
pub use events::{audit_root_of, verify_inclusion, EventLog, VoteCast, VoteSink};
pub use engine::{check_ballot_shape, CampaignState, VoteEngine};
pub use config::CampaignConfig;
pub use snapshot::{CampaignSnapshot, SnapshotStore, SNAPSHOT_VERSION};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
