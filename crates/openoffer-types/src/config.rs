//! Engine configuration.
//!
//! `EngineConfig` is the initial parameter set handed to the engine at
//! construction. After that the values live in the engine's settings and
//! change only through the COO-gated setters.

use serde::{Deserialize, Serialize};

use crate::{constants, Amount, BasisPoints, OpenofferError, Result};

/// Tunable economic parameters of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Lifetime of a new or refreshed offer, in seconds.
    pub global_duration: u64,
    /// Smallest deposit accepted for a new offer.
    pub minimum_total_value: Amount,
    /// Minimum overbid over the active offer's price, in basis points.
    pub minimum_price_increment_bp: BasisPoints,
    /// Proportional cut on fulfilled or cancelled offers, in basis points.
    pub offer_cut_bp: BasisPoints,
    /// Flat fee on displaced or expired offers.
    pub unsuccessful_fee: Amount,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            global_duration: constants::DEFAULT_GLOBAL_DURATION_SECS,
            minimum_total_value: constants::DEFAULT_MINIMUM_TOTAL_VALUE,
            minimum_price_increment_bp: constants::DEFAULT_MINIMUM_PRICE_INCREMENT_BP,
            offer_cut_bp: constants::DEFAULT_OFFER_CUT_BP,
            unsuccessful_fee: constants::DEFAULT_UNSUCCESSFUL_FEE,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply the same checks the runtime setters apply.
    pub fn validate(&self) -> Result<()> {
        check_global_duration(self.global_duration)?;
        check_basis_points("offer_cut_bp", self.offer_cut_bp)?;
        check_basis_points(
            "minimum_price_increment_bp",
            self.minimum_price_increment_bp,
        )?;
        check_minimum_total(self.minimum_total_value, self.unsuccessful_fee)
    }
}

/// A zero lifetime would let `now + duration` land on the "no offer"
/// sentinel and strand the deposit.
pub fn check_global_duration(duration: u64) -> Result<()> {
    if duration == 0 {
        return Err(OpenofferError::ZeroDuration);
    }
    Ok(())
}

/// Reject basis points above 100%.
pub fn check_basis_points(field: &'static str, value: BasisPoints) -> Result<()> {
    if value > constants::BASIS_POINTS_DIVISOR {
        return Err(OpenofferError::BasisPointsOutOfRange { field, value });
    }
    Ok(())
}

/// The minimum total must be able to absorb the flat fee twice.
pub fn check_minimum_total(minimum_total: Amount, unsuccessful_fee: Amount) -> Result<()> {
    let floor = unsuccessful_fee
        .checked_mul(2)
        .ok_or_else(|| OpenofferError::AmountOverflow {
            reason: format!("2 * unsuccessful fee {unsuccessful_fee}"),
        })?;
    if minimum_total < floor {
        return Err(OpenofferError::MinimumTotalTooLow {
            minimum_total,
            unsuccessful_fee,
        });
    }
    Ok(())
}
