//! # Offer: an escrowed bid on a single asset
//!
//! At most one offer exists per asset. Its lifecycle is driven purely by the
//! stored expiry compared against the current time:
//!
//! ```text
//!   ┌────────┐  create   ┌────────┐  now >= expires_at  ┌───────────┐
//!   │ ABSENT ├──────────▶│ ACTIVE ├────────────────────▶│ LINGERING │
//!   └────────┘           └───┬────┘                     └─────┬─────┘
//!        ▲   cancel/fulfil   │                                │ remove-expired
//!        └───────────────────┴────────────────────────────────┘ overbid / frozen withdraw
//! ```
//!
//! The cut and flat fee are snapshotted at creation and never change for
//! the life of the offer, whatever later configuration updates say.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, BasisPoints, Timestamp};

/// Where an asset's offer stands at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferState {
    /// No record.
    Absent,
    /// Record present and `now < expires_at`.
    Active,
    /// Record present but expired. Persists until something removes it.
    Lingering,
}

impl OfferState {
    /// Classify a possibly-missing offer at time `now`.
    #[must_use]
    pub fn of(offer: Option<&Offer>, now: Timestamp) -> Self {
        match offer {
            None => Self::Absent,
            Some(o) if o.expires_at == 0 => Self::Absent,
            Some(o) if now < o.expires_at => Self::Active,
            Some(_) => Self::Lingering,
        }
    }
}

impl std::fmt::Display for OfferState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Absent => write!(f, "ABSENT"),
            Self::Active => write!(f, "ACTIVE"),
            Self::Lingering => write!(f, "LINGERING"),
        }
    }
}

/// A bidder's standing, fully funded offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
    /// Absolute expiry (unix seconds).
    pub expires_at: Timestamp,
    /// The account that funded the offer.
    pub bidder: AccountId,
    /// Proportional cut in effect when the offer was created.
    pub offer_cut_bp: BasisPoints,
    /// Everything the bidder deposited, top-ups included.
    pub total: Amount,
    /// Flat fee in effect when the offer was created.
    pub unsuccessful_fee: Amount,
}

impl Offer {
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        OfferState::of(Some(self), now) == OfferState::Active
    }

    /// What the bidder gets back when the offer is displaced or expires.
    ///
    /// Never underflows for offers created under a valid configuration
    /// (`total >= minimum_total >= 2 * unsuccessful_fee`); saturates otherwise.
    #[must_use]
    pub fn refund_after_flat_fee(&self) -> Amount {
        self.total.saturating_sub(self.unsuccessful_fee)
    }
}
