//! System-wide constants for the OpenOffer engine.

use crate::{Amount, BasisPoints};

/// 100% expressed in basis points.
pub const BASIS_POINTS_DIVISOR: BasisPoints = 10_000;

/// Largest accepted offer total.
///
/// Pricing multiplies a total by at most `2 * BASIS_POINTS_DIVISOR`, so any
/// total at or below this bound keeps every intermediate product in range.
pub const MAX_OFFER_TOTAL: Amount = u128::MAX / (2 * BASIS_POINTS_DIVISOR as u128);

/// Default offer lifetime in seconds (one day).
pub const DEFAULT_GLOBAL_DURATION_SECS: u64 = 86_400;

/// Default minimum deposit for a new offer.
pub const DEFAULT_MINIMUM_TOTAL_VALUE: Amount = 2_000_000;

/// Default minimum overbid increment (10%).
pub const DEFAULT_MINIMUM_PRICE_INCREMENT_BP: BasisPoints = 1_000;

/// Default proportional cut on fulfilled or cancelled offers (3.75%).
pub const DEFAULT_OFFER_CUT_BP: BasisPoints = 375;

/// Default flat fee on displaced or expired offers.
pub const DEFAULT_UNSUCCESSFUL_FEE: Amount = 1_000_000;

/// Interface identifier a registry must advertise before the engine will
/// accept it (the non-fungible asset interface).
pub const ASSET_REGISTRY_INTERFACE_ID: [u8; 4] = [0x80, 0xac, 0x58, 0xcd];

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "OpenOffer";
