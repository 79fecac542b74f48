//! Escrow ledger: house and lost-and-found balances, plus fund delivery.
//!
//! Two ways money leaves custody:
//!
//! - [`EscrowLedger::push_funds`] is best-effort. A refused delivery is not
//!   an error: the amount is parked in the lost-and-found balance and the
//!   caller's operation carries on.
//! - [`EscrowLedger::pay_direct`] is all-or-nothing. A refusal is returned
//!   as [`OpenofferError::TransferFailed`] and the caller must unwind.

use openoffer_types::{AccountId, Amount, AssetId, FundsRail, OpenofferError, Result, Role};
use serde::{Deserialize, Serialize};

use crate::supply_conservation::SupplyConservation;

/// Result of a best-effort delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PushOutcome {
    /// The recipient has the funds.
    Delivered,
    /// The recipient refused; the amount now sits in lost-and-found.
    Deferred,
}

/// Accumulators for currency the engine holds on behalf of its roles.
///
/// Both balances are bounded by custody, which is itself bounded by the
/// checked sum of all deposits, so additions here cannot overflow.
#[derive(Debug, Clone, Default)]
pub struct EscrowLedger {
    total_cfo_earnings: Amount,
    total_lost_and_found_balance: Amount,
    supply: SupplyConservation,
}

impl EscrowLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Take `amount` into custody.
    pub fn receive(&mut self, amount: Amount) -> Result<()> {
        self.supply.record_deposit(amount)
    }

    /// Book a fee to the house.
    pub fn credit_house(&mut self, fee: Amount) {
        self.total_cfo_earnings += fee;
    }

    /// Try to deliver `amount` to `recipient`, parking it in lost-and-found
    /// if the rail refuses.
    pub fn push_funds<F: FundsRail + ?Sized>(
        &mut self,
        rail: &mut F,
        asset: AssetId,
        recipient: AccountId,
        amount: Amount,
    ) -> PushOutcome {
        if amount == 0 {
            return PushOutcome::Delivered;
        }
        match rail.send(recipient, amount) {
            Ok(()) => {
                self.supply.record_payout(amount);
                PushOutcome::Delivered
            }
            Err(rejection) => {
                self.total_lost_and_found_balance += amount;
                tracing::warn!(
                    asset = %asset,
                    recipient = %recipient,
                    amount,
                    reason = %rejection,
                    "Delivery failed, amount moved to lost-and-found"
                );
                PushOutcome::Deferred
            }
        }
    }

    /// Deliver `amount` to `recipient` or fail without side effects.
    pub fn pay_direct<F: FundsRail + ?Sized>(
        &mut self,
        rail: &mut F,
        recipient: AccountId,
        amount: Amount,
    ) -> Result<()> {
        rail.send(recipient, amount)
            .map_err(|rejection| OpenofferError::TransferFailed {
                recipient,
                amount,
                reason: rejection.0,
            })?;
        self.supply.record_payout(amount);
        Ok(())
    }

    /// Pay out the whole balance owed to `role` (CFO or lost-and-found).
    ///
    /// The balance is zeroed before the transfer and restored if it fails.
    pub fn withdraw_role_balance<F: FundsRail + ?Sized>(
        &mut self,
        rail: &mut F,
        role: Role,
        recipient: AccountId,
    ) -> Result<Amount> {
        let amount = std::mem::take(self.balance_slot(role)?);
        if amount == 0 {
            return Err(OpenofferError::NothingToWithdraw(role));
        }
        if let Err(err) = self.pay_direct(rail, recipient, amount) {
            *self.balance_slot(role)? = amount;
            return Err(err);
        }
        Ok(amount)
    }

    fn balance_slot(&mut self, role: Role) -> Result<&mut Amount> {
        match role {
            Role::Cfo => Ok(&mut self.total_cfo_earnings),
            Role::LostAndFound => Ok(&mut self.total_lost_and_found_balance),
            Role::Ceo | Role::Coo => Err(OpenofferError::Internal(format!(
                "role {role} has no ledger balance"
            ))),
        }
    }

    #[must_use]
    pub fn total_cfo_earnings(&self) -> Amount {
        self.total_cfo_earnings
    }

    #[must_use]
    pub fn total_lost_and_found_balance(&self) -> Amount {
        self.total_lost_and_found_balance
    }

    /// Currency currently held by the engine.
    #[must_use]
    pub fn custody(&self) -> Amount {
        self.supply.custody()
    }

    #[must_use]
    pub fn supply(&self) -> &SupplyConservation {
        &self.supply
    }

    /// Check custody against both accumulators plus `offers_total`.
    pub fn verify(&self, offers_total: Amount) -> Result<()> {
        let accounted = self
            .total_cfo_earnings
            .checked_add(self.total_lost_and_found_balance)
            .and_then(|sum| sum.checked_add(offers_total))
            .ok_or_else(|| OpenofferError::SupplyInvariantViolation {
                reason: "accounted balances overflow".to_string(),
            })?;
        self.supply.verify(accounted)
    }
}
