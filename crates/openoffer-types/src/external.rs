//! Collaborators the engine talks to but does not own.
//!
//! - [`AssetRegistry`]: who owns which asset, and the ownership transfer itself
//! - [`FundsRail`]: outbound currency movement to external accounts
//! - [`Clock`]: the current time
//!
//! Inbound currency is not modelled here: the amount attached to an
//! operation is passed to the engine directly and is assumed to have
//! already arrived in its custody.

use chrono::Utc;

use crate::{AccountId, Amount, AssetId, Timestamp};

/// Why a collaborator refused a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection(pub String);

impl Rejection {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// The external asset-ownership registry.
pub trait AssetRegistry {
    /// Whether the registry implements the interface identified by `interface_id`.
    fn supports_interface(&self, interface_id: [u8; 4]) -> bool;

    /// Current owner of `asset`. Must not be served from a stale cache.
    fn owner_of(&self, asset: AssetId) -> Result<AccountId, Rejection>;

    /// Move `asset` from `from` to `to`, acting as `operator`.
    ///
    /// Must fail unless `operator` has been authorised by `from` beforehand.
    fn transfer_from(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: AssetId,
    ) -> Result<(), Rejection>;
}

/// Outbound currency transfers.
pub trait FundsRail {
    /// Deliver `amount` to `recipient`. A refusal leaves the funds with the caller.
    fn send(&mut self, recipient: AccountId, amount: Amount) -> Result<(), Rejection>;
}

/// Source of the current time, in unix seconds.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        clamp_unix_secs(Utc::now().timestamp())
    }
}

/// `0` is reserved as the "no offer" sentinel, so a clock reading at or
/// before the epoch is pinned to one second past it.
fn clamp_unix_secs(secs: i64) -> Timestamp {
    u64::try_from(secs).unwrap_or(0).max(1)
}

impl<C: Clock + ?Sized> Clock for std::sync::Arc<C> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }

    #[test]
    fn pre_epoch_clock_never_reads_zero() {
        assert_eq!(clamp_unix_secs(-5), 1);
        assert_eq!(clamp_unix_secs(0), 1);
        assert_eq!(clamp_unix_secs(1_700_000_000), 1_700_000_000);
    }

    #[test]
    fn rejection_display() {
        assert_eq!(Rejection::new("no approval").to_string(), "no approval");
    }
}
