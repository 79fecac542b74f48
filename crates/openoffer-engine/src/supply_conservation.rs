//! Custody conservation checker.
//!
//! Invariant held at every observation point:
//! ```text
//! custody = Σ(deposits) - Σ(successful payouts)
//!         = cfo_earnings + lost_and_found + Σ(recorded offer totals)
//! ```
//!
//! The first equality defines custody; the engine checks the second.

use openoffer_types::{Amount, OpenofferError, Result};

/// Cumulative inbound and outbound currency since the engine was created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplyConservation {
    deposits: Amount,
    payouts: Amount,
}

impl SupplyConservation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record currency arriving with an operation.
    pub fn record_deposit(&mut self, amount: Amount) -> Result<()> {
        self.deposits =
            self.deposits
                .checked_add(amount)
                .ok_or_else(|| OpenofferError::AmountOverflow {
                    reason: format!("cumulative deposits {} + {amount}", self.deposits),
                })?;
        Ok(())
    }

    /// Record a payout the rail confirmed. Payouts never exceed deposits.
    pub fn record_payout(&mut self, amount: Amount) {
        self.payouts += amount;
    }

    /// Currency currently held: deposits - payouts.
    #[must_use]
    pub fn custody(&self) -> Amount {
        self.deposits - self.payouts
    }

    #[must_use]
    pub fn total_deposits(&self) -> Amount {
        self.deposits
    }

    #[must_use]
    pub fn total_payouts(&self) -> Amount {
        self.payouts
    }

    /// Check that the accounted balances add up to custody.
    ///
    /// # Errors
    /// Returns [`OpenofferError::SupplyInvariantViolation`] if they differ.
    pub fn verify(&self, accounted: Amount) -> Result<()> {
        let custody = self.custody();
        if accounted != custody {
            return Err(OpenofferError::SupplyInvariantViolation {
                reason: format!(
                    "accounted {accounted} != custody {custody} \
                     (deposits={}, payouts={})",
                    self.deposits, self.payouts
                ),
            });
        }
        Ok(())
    }
}
