//! # Account Addresses
//!
//! 20-byte account identifiers shared by callers, creators, the operator,
//! the registry's custody account and every launched token.

use std::fmt;
use std::str::FromStr;

use ethnum::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};

use crate::errors::LaunchpadError;

/// Account or token handle
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

/// Handle of a launched token
pub type TokenHandle = Address;

impl Address {
    /// The all-zero address
    pub const ZERO: Address = Address([0u8; 20]);

    /// Build an address whose last eight bytes hold `value` (big-endian)
    pub fn from_low_u64_be(value: u64) -> Self {
        let mut bytes = [0u8; 20];
        bytes[12..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Build an address from the last 20 bytes of a 32-byte digest
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&digest[12..]);
        Self(bytes)
    }

    /// Address of the `nonce`-th child deployed by `self`
    ///
    /// keccak256(deployer || nonce_be)[12..], the same derivation the
    /// registry uses for every new token ledger.
    pub fn derive_child(&self, nonce: u64) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(self.0);
        hasher.update(nonce.to_be_bytes());
        let digest: [u8; 32] = hasher.finalize().into();
        Self::from_digest(&digest)
    }

    /// Widen to a 256-bit word (left-padded), as used for signal hashing
    pub fn to_u256(&self) -> U256 {
        let mut word = [0u8; 32];
        word[12..].copy_from_slice(&self.0);
        U256::from_be_bytes(word)
    }

    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl FromStr for Address {
    type Err = LaunchpadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let stripped = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(stripped)
            .map_err(|_| LaunchpadError::invalid_config("address", s, "20 hex-encoded bytes"))?;
        let bytes: [u8; 20] = decoded
            .try_into()
            .map_err(|_| LaunchpadError::invalid_config("address", s, "20 hex-encoded bytes"))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
