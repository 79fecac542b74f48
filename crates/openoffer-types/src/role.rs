//! Privileged roles.

use serde::{Deserialize, Serialize};

use crate::AccountId;

/// The four privileged identities the engine recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Reassigns roles and may freeze the engine.
    Ceo,
    /// Tunes configuration and may fulfil offers on an owner's behalf.
    Coo,
    /// Collects accumulated fees.
    Cfo,
    /// Collects funds whose delivery failed.
    LostAndFound,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ceo => write!(f, "CEO"),
            Self::Coo => write!(f, "COO"),
            Self::Cfo => write!(f, "CFO"),
            Self::LostAndFound => write!(f, "LOST_AND_FOUND"),
        }
    }
}

/// Current holder of each role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignments {
    pub ceo: AccountId,
    pub coo: AccountId,
    pub cfo: AccountId,
    pub lost_and_found: AccountId,
}

impl RoleAssignments {
    /// Every role held by the same account.
    #[must_use]
    pub fn all(holder: AccountId) -> Self {
        Self {
            ceo: holder,
            coo: holder,
            cfo: holder,
            lost_and_found: holder,
        }
    }

    #[must_use]
    pub fn holder(&self, role: Role) -> AccountId {
        match role {
            Role::Ceo => self.ceo,
            Role::Coo => self.coo,
            Role::Cfo => self.cfo,
            Role::LostAndFound => self.lost_and_found,
        }
    }

    pub(crate) fn slot_mut(&mut self, role: Role) -> &mut AccountId {
        match role {
            Role::Ceo => &mut self.ceo,
            Role::Coo => &mut self.coo,
            Role::Cfo => &mut self.cfo,
            Role::LostAndFound => &mut self.lost_and_found,
        }
    }

    /// Replace the holder of `role`, returning the previous one.
    pub fn assign(&mut self, role: Role, holder: AccountId) -> AccountId {
        std::mem::replace(self.slot_mut(role), holder)
    }
}
