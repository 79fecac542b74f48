//! Identifiers and scalar aliases used throughout OpenOffer.
//!
//! Accounts use UUIDv7 so test fixtures can mint fresh, distinct identities
//! cheaply. The nil UUID is reserved as the "null account" and is never a
//! valid role holder.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A currency amount in the engine's smallest unit.
pub type Amount = u128;

/// Unix timestamp in seconds. `0` doubles as the "no offer" sentinel.
pub type Timestamp = u64;

/// Basis points: 1/100 of a percent, `10_000` = 100%.
pub type BasisPoints = u32;

// ---------------------------------------------------------------------------
// AccountId
// ---------------------------------------------------------------------------

/// An externally owned account: bidder, asset owner, or role holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// The null account. Rejected wherever a real identity is required.
    pub const NULL: Self = Self(Uuid::nil());

    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_nil()
    }

    /// First four bytes, hex encoded. For log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0.as_bytes()[..4])
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// AssetId
// ---------------------------------------------------------------------------

/// Identifier of an asset tracked by the external registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "asset:{}", self.0)
    }
}
