use core::fmt;
use core::str::FromStr;

use ballot_primitives::{parse_address, Address20, Hash256};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::DecodeError;

pub const MAX_RANKED: usize = 3;   // candidates per ballot
pub const MAX_MEMO_LEN: usize = 128; // bytes
pub const TICKET_LEN: usize = 32;
pub const IDENTITY_LEN: usize = 20;

/// Unix seconds.
pub type Timestamp = u64;
pub type CandidateId = u32;
pub type ReceiptId = u64;

/// Account identity: a 20-byte address recovered from a secp256k1 key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Identity(pub Address20);

/// Opaque single-use admission ticket value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct TicketId(pub Hash256);

// Exact-sized decode helpers
macro_rules! impl_tryfrom_slice {
    ($t:ty, $len:expr) => {
        impl TryFrom<&[u8]> for $t {
            type Error = DecodeError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                if b.len() != $len {
                    return Err(DecodeError::InvalidLength { expected: $len, got: b.len() });
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(b);
                Ok(Self(arr))
            }
        }
    };
}
impl_tryfrom_slice!(Identity, IDENTITY_LEN);
impl_tryfrom_slice!(TicketId, TICKET_LEN);

// `0x`-prefixed lowercase hex in text form and in serde.
macro_rules! impl_hex_text {
    ($t:ty) => {
        impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }

        impl Serialize for $t {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $t {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}
impl_hex_text!(Identity);
impl_hex_text!(TicketId);

impl FromStr for Identity {
    type Err = DecodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_address(s).map(Self).ok_or(DecodeError::BadHex)
    }
}

impl FromStr for TicketId {
    type Err = DecodeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s.strip_prefix("0x").unwrap_or(s);
        let mut out = [0u8; TICKET_LEN];
        hex::decode_to_slice(body, &mut out).map_err(|_| DecodeError::BadHex)?;
        Ok(Self(out))
    }
}

impl Identity {
    #[must_use]
    pub const fn as_bytes(&self) -> &Address20 {
        &self.0
    }
}

impl TicketId {
    #[must_use]
    pub const fn as_bytes(&self) -> &Hash256 {
        &self.0
    }
}

/// A ballot submission, borrowed from the caller for the duration of one redemption.
#[derive(Clone, Copy, Debug)]
pub struct Ballot<'a> {
    pub ranked: &'a [CandidateId], // strictly ascending, 1..=MAX_RANKED
    pub memo: &'a [u8],            // at most MAX_MEMO_LEN bytes
    pub ticket: TicketId,
    pub signature: &'a [u8], // administrator signature over the ticket digest
}

/// Proof of participation bound to the voter who cast it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: ReceiptId,
    pub owner: Identity,
}
