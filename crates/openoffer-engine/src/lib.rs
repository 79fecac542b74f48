//! # openoffer-engine
//!
//! Escrow-and-settlement engine for offers on externally owned assets.
//!
//! Anyone may place a fully funded offer on an asset; the asset's current
//! owner may accept it, and every other outcome (cancellation, overbid,
//! expiry, emergency withdrawal) returns the funds minus the applicable fee.
//! All currency stays in the engine's custody until one of those terminal
//! outcomes is reached.
//!
//! ## Components
//!
//! 1. **AccessControl**: four role identities and the one-way freeze latch
//! 2. **OfferSettings**: live configuration with validated setters
//! 3. **OfferEngine**: the per-asset offer state machine
//! 4. **EscrowLedger**: house and lost-and-found balances, fund delivery
//!
//! ## Fee Flows
//!
//! ```text
//! fulfil   : owner  <- price          house <- total - price
//! cancel   : bidder <- price          house <- total - price
//! overbid  : bidder <- total - fee    house <- fee
//! expire   : bidder <- total - fee    house <- fee
//! frozen   : bidder <- total          (no fee)
//! ```
//!
//! A refused delivery never blocks a transition: the amount is parked in
//! the lost-and-found balance instead.

pub mod access_control;
pub mod digest;
pub mod engine;
pub mod escrow_ledger;
pub mod pricing;
pub mod settings;
pub mod supply_conservation;

pub use access_control::AccessControl;
pub use digest::compute_state_digest;
pub use engine::OfferEngine;
pub use escrow_ledger::{EscrowLedger, PushOutcome};
pub use settings::OfferSettings;
pub use supply_conservation::SupplyConservation;
