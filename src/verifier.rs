use ballot_primitives::{address_from_coordinates, personal_message_hash, Hash256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::scalar::IsHigh;
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use rand_core::OsRng;

use crate::errors::{SignerError, VerificationError};
use crate::types::{Identity, TicketId};

pub const SIGNATURE_LEN: usize = 65; // r || s || v
pub const COMPACT_SIGNATURE_LEN: usize = 64; // r || yParity·2^255 + s (EIP-2098)

/// Signer recovery used by the redemption engine to authorize tickets.
pub trait SignatureVerifier: Send + Sync {
    /// Recover the identity whose key produced `signature` over `digest`.
    ///
    /// # Errors
    /// Returns `VerificationError::Malformed` if the bytes are not a valid recoverable signature.
    fn recover_identity(&self, digest: &Hash256, signature: &[u8]) -> Result<Identity, VerificationError>;
}

/// Digest the administrator signs to authorize `ticket`.
#[must_use]
pub fn ticket_digest(ticket: &TicketId) -> Hash256 {
    personal_message_hash(ticket.as_bytes())
}

/// secp256k1 public-key recovery (`k256`).
#[derive(Clone, Copy, Debug, Default)]
pub struct Secp256k1Verifier;

impl SignatureVerifier for Secp256k1Verifier {
    fn recover_identity(&self, digest: &Hash256, signature: &[u8]) -> Result<Identity, VerificationError> {
        let (sig, recid) = parse_recoverable(signature)?;
        let vk = VerifyingKey::recover_from_prehash(digest, &sig, recid)
            .map_err(|_| VerificationError::Malformed)?;
        Ok(identity_of(&vk))
    }
}

// A verifying key is never the identity point, so its uncompressed encoding is
// always `0x04 || X || Y`.
fn identity_of(vk: &VerifyingKey) -> Identity {
    let point = PublicKey::from(vk).to_encoded_point(false);
    Identity(address_from_coordinates(&point.as_bytes()[1..]))
}

/// Split a 65-byte or 64-byte compact signature into its scalar pair and recovery id.
/// High-`s` values are rejected so every signature has exactly one accepted encoding.
fn parse_recoverable(bytes: &[u8]) -> Result<(Signature, RecoveryId), VerificationError> {
    let mut rs = [0u8; 64];
    let parity = match bytes.len() {
        SIGNATURE_LEN => {
            rs.copy_from_slice(&bytes[..64]);
            match bytes[64] {
                0 | 27 => 0u8,
                1 | 28 => 1u8,
                _ => return Err(VerificationError::Malformed),
            }
        }
        COMPACT_SIGNATURE_LEN => {
            rs.copy_from_slice(bytes);
            let parity = rs[32] >> 7;
            rs[32] &= 0x7F;
            parity
        }
        _ => return Err(VerificationError::Malformed),
    };
    let sig = Signature::from_slice(&rs).map_err(|_| VerificationError::Malformed)?;
    if bool::from(sig.s().is_high()) {
        return Err(VerificationError::Malformed);
    }
    let recid = RecoveryId::from_byte(parity).ok_or(VerificationError::Malformed)?;
    Ok((sig, recid))
}

/// Administrator-side ticket signing. Ticket generation and distribution are up to the caller.
pub struct TicketSigner {
    key: SigningKey,
}

impl TicketSigner {
    /// # Errors
    /// Returns `SignerError::InvalidKey` if `secret` is zero or not below the curve order.
    pub fn from_bytes(secret: &[u8; 32]) -> Result<Self, SignerError> {
        let key = SigningKey::from_slice(secret).map_err(|_| SignerError::InvalidKey)?;
        Ok(Self { key })
    }

    #[must_use]
    pub fn random() -> Self {
        Self { key: SigningKey::random(&mut OsRng) }
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        identity_of(self.key.verifying_key())
    }

    /// Sign `ticket` as `r || s || v` with `v ∈ {27, 28}`.
    pub fn sign_ticket(&self, ticket: &TicketId) -> Result<[u8; SIGNATURE_LEN], SignerError> {
        let (sig, recid) = self.sign_digest(&ticket_digest(ticket))?;
        let mut out = [0u8; SIGNATURE_LEN];
        out[..64].copy_from_slice(&sig.to_bytes());
        out[64] = 27 + recid.to_byte();
        Ok(out)
    }

    /// Sign `ticket` in the 64-byte compact form.
    pub fn sign_ticket_compact(&self, ticket: &TicketId) -> Result<[u8; COMPACT_SIGNATURE_LEN], SignerError> {
        let (sig, recid) = self.sign_digest(&ticket_digest(ticket))?;
        let mut out = [0u8; COMPACT_SIGNATURE_LEN];
        out.copy_from_slice(&sig.to_bytes());
        if recid.is_y_odd() {
            out[32] |= 0x80;
        }
        Ok(out)
    }

    fn sign_digest(&self, digest: &Hash256) -> Result<(Signature, RecoveryId), SignerError> {
        self.key
            .sign_prehash_recoverable(digest)
            .map_err(|_| SignerError::SigningFailed)
    }
}
