//! Notifications emitted by the engine.
//!
//! Every committed state transition produces exactly one [`OfferEvent`]
//! (plus a [`OfferEvent::PushFundsFailed`] for each delivery that had to be
//! rerouted). Events for an operation are only published once the whole
//! operation has committed.

use serde::{Deserialize, Serialize};

use crate::{AccountId, Amount, AssetId, Role, Timestamp};

/// The configuration parameter a [`OfferEvent::ConfigUpdated`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigField {
    GlobalDuration,
    MinimumTotalValue,
    MinimumPriceIncrement,
    OfferCut,
    UnsuccessfulFee,
}

impl std::fmt::Display for ConfigField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GlobalDuration => write!(f, "global_duration"),
            Self::MinimumTotalValue => write!(f, "minimum_total_value"),
            Self::MinimumPriceIncrement => write!(f, "minimum_price_increment_bp"),
            Self::OfferCut => write!(f, "offer_cut_bp"),
            Self::UnsuccessfulFee => write!(f, "unsuccessful_fee"),
        }
    }
}

/// A notification describing one committed change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OfferEvent {
    /// A new offer replaced whatever was recorded for the asset.
    OfferCreated {
        asset: AssetId,
        bidder: AccountId,
        expires_at: Timestamp,
        total: Amount,
        offer_price: Amount,
    },
    /// The bidder withdrew an active offer.
    OfferCancelled {
        asset: AssetId,
        bidder: AccountId,
        bidder_received: Amount,
        fee: Amount,
    },
    /// The owner (or COO) accepted the offer and the asset changed hands.
    OfferFulfilled {
        asset: AssetId,
        bidder: AccountId,
        owner: AccountId,
        owner_received: Amount,
        fee: Amount,
    },
    /// The bidder refreshed the expiry and optionally topped up.
    OfferUpdated {
        asset: AssetId,
        bidder: AccountId,
        expires_at: Timestamp,
        total: Amount,
    },
    /// A lingering offer was cleared and its bidder refunded.
    ExpiredOfferRemoved {
        asset: AssetId,
        bidder: AccountId,
        bidder_received: Amount,
        fee: Amount,
    },
    /// While frozen, a bidder pulled their whole deposit back.
    BidderWithdrewFundsWhenFrozen {
        asset: AssetId,
        bidder: AccountId,
        amount: Amount,
    },
    /// A best-effort delivery failed; the amount went to lost-and-found.
    PushFundsFailed {
        asset: AssetId,
        recipient: AccountId,
        amount: Amount,
    },
    /// A configuration parameter changed.
    ConfigUpdated {
        field: ConfigField,
        old: Amount,
        new: Amount,
    },
    /// A role changed hands.
    RoleReassigned {
        role: Role,
        previous: AccountId,
        current: AccountId,
    },
    /// The engine entered the irreversible frozen mode.
    EngineFrozen { by: AccountId },
    /// A role holder withdrew its accumulated balance.
    BalanceWithdrawn {
        role: Role,
        recipient: AccountId,
        amount: Amount,
    },
}

impl OfferEvent {
    /// The asset this event concerns, if any.
    #[must_use]
    pub fn asset(&self) -> Option<AssetId> {
        match self {
            Self::OfferCreated { asset, .. }
            | Self::OfferCancelled { asset, .. }
            | Self::OfferFulfilled { asset, .. }
            | Self::OfferUpdated { asset, .. }
            | Self::ExpiredOfferRemoved { asset, .. }
            | Self::BidderWithdrewFundsWhenFrozen { asset, .. }
            | Self::PushFundsFailed { asset, .. } => Some(*asset),
            Self::ConfigUpdated { .. }
            | Self::RoleReassigned { .. }
            | Self::EngineFrozen { .. }
            | Self::BalanceWithdrawn { .. } => None,
        }
    }

    /// Short upper-case name, for logs and metrics labels.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::OfferCreated { .. } => "OFFER_CREATED",
            Self::OfferCancelled { .. } => "OFFER_CANCELLED",
            Self::OfferFulfilled { .. } => "OFFER_FULFILLED",
            Self::OfferUpdated { .. } => "OFFER_UPDATED",
            Self::ExpiredOfferRemoved { .. } => "EXPIRED_OFFER_REMOVED",
            Self::BidderWithdrewFundsWhenFrozen { .. } => "BIDDER_WITHDREW_FUNDS_WHEN_FROZEN",
            Self::PushFundsFailed { .. } => "PUSH_FUNDS_FAILED",
            Self::ConfigUpdated { .. } => "CONFIG_UPDATED",
            Self::RoleReassigned { .. } => "ROLE_REASSIGNED",
            Self::EngineFrozen { .. } => "ENGINE_FROZEN",
            Self::BalanceWithdrawn { .. } => "BALANCE_WITHDRAWN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_extraction() {
        let created = OfferEvent::OfferCreated {
            asset: AssetId(3),
            bidder: AccountId::new(),
            expires_at: 1_000,
            total: 220,
            offer_price: 200,
        };
        assert_eq!(created.asset(), Some(AssetId(3)));
        assert_eq!(created.kind(), "OFFER_CREATED");

        let frozen = OfferEvent::EngineFrozen {
            by: AccountId::new(),
        };
        assert_eq!(frozen.asset(), None);
    }

    #[test]
    fn event_serde_roundtrip() {
        let ev = OfferEvent::PushFundsFailed {
            asset: AssetId(1),
            recipient: AccountId::new(),
            amount: u128::from(u64::MAX) + 1,
        };
        let json = serde_json::to_string(&ev).unwrap();
        assert!(json.contains("PushFundsFailed"));
        let back: OfferEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(ev, back);
    }

    #[test]
    fn config_field_display() {
        assert_eq!(ConfigField::OfferCut.to_string(), "offer_cut_bp");
    }
}
