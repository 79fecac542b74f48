//! Error types for the OpenOffer engine.
//!
//! All errors use the `OO_ERR_` prefix convention for easy grepping in logs.
//! Error codes are grouped by subsystem:
//! - 1xx: Access control
//! - 2xx: Configuration
//! - 3xx: Offer lifecycle
//! - 4xx: Funds / ledger
//! - 5xx: External asset registry
//! - 9xx: General / internal errors
//!
//! Every variant is a precondition failure: the operation that returned it
//! left no trace in engine state. Failed best-effort deliveries are not
//! errors at all; they are rerouted to the lost-and-found balance.

use thiserror::Error;

use crate::{AccountId, Amount, AssetId, BasisPoints, Role, Timestamp};

/// Central error enum for all OpenOffer operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OpenofferError {
    // =================================================================
    // Access Control (1xx)
    // =================================================================
    /// The caller does not hold the role this operation requires.
    #[error("OO_ERR_100: Caller {caller} does not hold role {role}")]
    Unauthorized { role: Role, caller: AccountId },

    /// The engine is frozen; normal operations are permanently disabled.
    #[error("OO_ERR_101: Engine is frozen")]
    Frozen,

    /// The operation is only available once the engine is frozen.
    #[error("OO_ERR_102: Engine is not frozen")]
    NotFrozen,

    /// A role cannot be assigned to the null account.
    #[error("OO_ERR_103: Role {0} cannot be assigned to the null account")]
    NullAccount(Role),

    // =================================================================
    // Configuration (2xx)
    // =================================================================
    /// A basis-point parameter exceeded 10000.
    #[error("OO_ERR_200: {field} must be at most 10000bp, got {value}")]
    BasisPointsOutOfRange {
        field: &'static str,
        value: BasisPoints,
    },

    /// The minimum total must cover the flat fee twice.
    #[error("OO_ERR_201: Minimum total {minimum_total} is below twice the unsuccessful fee {unsuccessful_fee}")]
    MinimumTotalTooLow {
        minimum_total: Amount,
        unsuccessful_fee: Amount,
    },

    /// Configuration could not be parsed or is structurally invalid.
    #[error("OO_ERR_202: Configuration error: {0}")]
    Configuration(String),

    /// Offers need a lifetime of at least one second.
    #[error("OO_ERR_203: Global duration must be non-zero")]
    ZeroDuration,

    // =================================================================
    // Offer Lifecycle (3xx)
    // =================================================================
    /// No offer record exists for this asset.
    #[error("OO_ERR_300: No offer exists for {0}")]
    OfferNotFound(AssetId),

    /// The offer exists but its expiry has passed.
    #[error("OO_ERR_301: Offer for {asset} expired at {expires_at}")]
    OfferExpired {
        asset: AssetId,
        expires_at: Timestamp,
    },

    /// The deposit is below the configured minimum total.
    #[error("OO_ERR_302: Deposit {total} is below the minimum total {minimum}")]
    BelowMinimumTotal { total: Amount, minimum: Amount },

    /// The new offer does not beat the active one by the minimum increment.
    #[error("OO_ERR_303: Offer price {offer_price} is below the minimum overbid {minimum_overbid}")]
    OverbidTooLow {
        offer_price: Amount,
        minimum_overbid: Amount,
    },

    /// The offer price fell below the floor the owner asked for.
    #[error("OO_ERR_304: Offer price {offer_price} is below the accepted minimum {minimum_accepted}")]
    PriceBelowFloor {
        offer_price: Amount,
        minimum_accepted: Amount,
    },

    /// Only the bidder who created the offer may act on it.
    #[error("OO_ERR_305: Caller {caller} is not the bidder on {asset}")]
    NotBidder { asset: AssetId, caller: AccountId },

    /// Only the asset owner (or the COO) may fulfil an offer.
    #[error("OO_ERR_306: Caller {caller} neither owns {asset} nor holds the COO role")]
    NotOwnerOrCoo { asset: AssetId, caller: AccountId },

    /// Expiry computation overflowed the timestamp range.
    #[error("OO_ERR_307: Expiry overflow: now {now} + duration {duration}")]
    ExpiryOverflow { now: Timestamp, duration: u64 },

    // =================================================================
    // Funds / Ledger (4xx)
    // =================================================================
    /// An amount left the supported range.
    #[error("OO_ERR_400: Amount overflow: {reason}")]
    AmountOverflow { reason: String },

    /// A direct (non-recoverable) transfer was refused by the rail.
    #[error("OO_ERR_401: Transfer of {amount} to {recipient} failed: {reason}")]
    TransferFailed {
        recipient: AccountId,
        amount: Amount,
        reason: String,
    },

    /// The withdrawable balance is zero.
    #[error("OO_ERR_402: Nothing to withdraw for role {0}")]
    NothingToWithdraw(Role),

    /// Custody no longer matches the accounted balances.
    #[error("OO_ERR_403: Supply invariant violation: {reason}")]
    SupplyInvariantViolation { reason: String },

    // =================================================================
    // External Registry (5xx)
    // =================================================================
    /// The configured registry does not implement the asset interface.
    #[error("OO_ERR_500: Asset registry does not support the required interface")]
    RegistryInterfaceUnsupported,

    /// The registry rejected a query or transfer.
    #[error("OO_ERR_501: Asset registry rejected the call: {reason}")]
    RegistryRejected { reason: String },

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("OO_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, OpenofferError>;

impl From<serde_json::Error> for OpenofferError {
    fn from(err: serde_json::Error) -> Self {
        Self::Configuration(err.to_string())
    }
}
