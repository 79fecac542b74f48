//! In-memory collaborators for unit and integration tests.
//! **Never use in production.**

use std::{
    collections::{HashMap, HashSet},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use crate::{
    constants, AccountId, Amount, AssetId, AssetRegistry, Clock, FundsRail, Rejection, Timestamp,
};

// ---------------------------------------------------------------------------
// InMemoryRegistry
// ---------------------------------------------------------------------------

/// A minimal non-fungible registry with per-asset approvals and
/// owner-wide operators.
#[derive(Debug, Clone)]
pub struct InMemoryRegistry {
    owners: HashMap<AssetId, AccountId>,
    approvals: HashMap<AssetId, AccountId>,
    operators: HashSet<(AccountId, AccountId)>,
    supports_interface: bool,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            owners: HashMap::new(),
            approvals: HashMap::new(),
            operators: HashSet::new(),
            supports_interface: true,
        }
    }

    /// A registry that fails the construction-time interface check.
    #[must_use]
    pub fn without_interface() -> Self {
        Self {
            supports_interface: false,
            ..Self::new()
        }
    }

    pub fn mint(&mut self, asset: AssetId, owner: AccountId) {
        self.owners.insert(asset, owner);
    }

    /// Let `operator` move `asset` once.
    pub fn approve(&mut self, asset: AssetId, operator: AccountId) {
        self.approvals.insert(asset, operator);
    }

    pub fn set_approval_for_all(&mut self, owner: AccountId, operator: AccountId, approved: bool) {
        if approved {
            self.operators.insert((owner, operator));
        } else {
            self.operators.remove(&(owner, operator));
        }
    }

    #[must_use]
    pub fn owner(&self, asset: AssetId) -> Option<AccountId> {
        self.owners.get(&asset).copied()
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry for InMemoryRegistry {
    fn supports_interface(&self, interface_id: [u8; 4]) -> bool {
        self.supports_interface && interface_id == constants::ASSET_REGISTRY_INTERFACE_ID
    }

    fn owner_of(&self, asset: AssetId) -> Result<AccountId, Rejection> {
        self.owner(asset)
            .ok_or_else(|| Rejection::new(format!("{asset} does not exist")))
    }

    fn transfer_from(
        &mut self,
        operator: AccountId,
        from: AccountId,
        to: AccountId,
        asset: AssetId,
    ) -> Result<(), Rejection> {
        let owner = self.owner_of(asset)?;
        if owner != from {
            return Err(Rejection::new(format!("{from} does not own {asset}")));
        }
        let authorised = operator == owner
            || self.approvals.get(&asset) == Some(&operator)
            || self.operators.contains(&(owner, operator));
        if !authorised {
            return Err(Rejection::new(format!(
                "{operator} is not approved to move {asset}"
            )));
        }
        self.approvals.remove(&asset);
        self.owners.insert(asset, to);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MockRail
// ---------------------------------------------------------------------------

/// Records deliveries; refuses anything sent to a blocked recipient.
#[derive(Debug, Clone, Default)]
pub struct MockRail {
    received: HashMap<AccountId, Amount>,
    blocked: HashSet<AccountId>,
    total_sent: Amount,
}

impl MockRail {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every future delivery to `recipient` fail.
    pub fn block(&mut self, recipient: AccountId) {
        self.blocked.insert(recipient);
    }

    pub fn unblock(&mut self, recipient: AccountId) {
        self.blocked.remove(&recipient);
    }

    /// Everything successfully delivered to `recipient` so far.
    #[must_use]
    pub fn received(&self, recipient: AccountId) -> Amount {
        self.received.get(&recipient).copied().unwrap_or(0)
    }

    /// Everything successfully delivered to anyone so far.
    #[must_use]
    pub fn total_sent(&self) -> Amount {
        self.total_sent
    }
}

impl FundsRail for MockRail {
    fn send(&mut self, recipient: AccountId, amount: Amount) -> Result<(), Rejection> {
        if self.blocked.contains(&recipient) {
            return Err(Rejection::new(format!("{recipient} refuses payment")));
        }
        *self.received.entry(recipient).or_insert(0) += amount;
        self.total_sent += amount;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ManualClock
// ---------------------------------------------------------------------------

/// A clock tests move by hand. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock(Arc<AtomicU64>);

impl ManualClock {
    #[must_use]
    pub fn starting_at(now: Timestamp) -> Self {
        Self(Arc::new(AtomicU64::new(now)))
    }

    pub fn set(&self, now: Timestamp) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, secs: u64) {
        self.0.fetch_add(secs, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        self.0.load(Ordering::SeqCst)
    }
}
