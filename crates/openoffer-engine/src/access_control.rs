//! Role gates and the irreversible freeze latch.
//!
//! Each privileged operation calls the predicates it needs at its top
//! (`require_role`, `when_not_frozen`, `when_frozen`) and bails out with a
//! typed error before touching any state.

use openoffer_types::{AccountId, OpenofferError, Result, Role, RoleAssignments};

/// Holds the four role identities and the frozen latch.
#[derive(Debug, Clone)]
pub struct AccessControl {
    roles: RoleAssignments,
    /// `false -> true` only.
    frozen: bool,
}

impl AccessControl {
    /// Every role starts with the deployer.
    pub fn new(deployer: AccountId) -> Result<Self> {
        if deployer.is_null() {
            return Err(OpenofferError::NullAccount(Role::Ceo));
        }
        Ok(Self {
            roles: RoleAssignments::all(deployer),
            frozen: false,
        })
    }

    #[must_use]
    pub fn roles(&self) -> &RoleAssignments {
        &self.roles
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    #[must_use]
    pub fn has_role(&self, role: Role, caller: AccountId) -> bool {
        self.roles.holder(role) == caller
    }

    pub fn require_role(&self, role: Role, caller: AccountId) -> Result<()> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(OpenofferError::Unauthorized { role, caller })
        }
    }

    pub fn when_not_frozen(&self) -> Result<()> {
        if self.frozen {
            Err(OpenofferError::Frozen)
        } else {
            Ok(())
        }
    }

    pub fn when_frozen(&self) -> Result<()> {
        if self.frozen {
            Ok(())
        } else {
            Err(OpenofferError::NotFrozen)
        }
    }

    /// CEO-only. Returns the previous holder.
    pub fn reassign(
        &mut self,
        caller: AccountId,
        role: Role,
        new_holder: AccountId,
    ) -> Result<AccountId> {
        self.require_role(Role::Ceo, caller)?;
        if new_holder.is_null() {
            return Err(OpenofferError::NullAccount(role));
        }
        Ok(self.roles.assign(role, new_holder))
    }

    /// CEO-only, once.
    pub fn freeze(&mut self, caller: AccountId) -> Result<()> {
        self.require_role(Role::Ceo, caller)?;
        self.when_not_frozen()?;
        self.frozen = true;
        Ok(())
    }
}
