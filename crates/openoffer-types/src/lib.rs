//! # openoffer-types
//!
//! Shared types, errors, and configuration for the **OpenOffer** escrow engine.
//!
//! This crate is the leaf dependency of the workspace. It defines:
//!
//! - **Identifiers**: [`AccountId`], [`AssetId`], and the [`Amount`] / [`Timestamp`] / [`BasisPoints`] scalars
//! - **Offer model**: [`Offer`], [`OfferState`]
//! - **Roles**: [`Role`], [`RoleAssignments`]
//! - **Configuration**: [`EngineConfig`]
//! - **Notifications**: [`OfferEvent`], [`ConfigField`]
//! - **Collaborators**: [`AssetRegistry`], [`FundsRail`], [`Clock`]
//! - **Errors**: [`OpenofferError`] with `OO_ERR_` prefix codes
//! - **Constants**: basis-point divisor, amount bounds, defaults

pub mod config;
pub mod constants;
pub mod error;
pub mod event;
pub mod external;
pub mod ids;
pub mod offer;
pub mod role;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::*;
pub use error::*;
pub use event::*;
pub use external::*;
pub use ids::*;
pub use offer::*;
pub use role::*;

// Constants are accessed via `openoffer_types::constants::FOO`
// (not re-exported to avoid name collisions).
