//! The offer lifecycle state machine.
//!
//! [`OfferEngine`] owns the one-offer-per-asset registry and composes the
//! access gates, live settings, and escrow ledger. Every public operation:
//!
//! 1. runs its gates and validations, touching nothing
//! 2. mutates the offer registry
//! 3. only then calls out (asset registry, funds rail)
//! 4. publishes its notifications
//!
//! Steps 2 and 3 are ordered so that no outbound call can observe a record
//! that is about to disappear. Where an outbound call is not best-effort
//! (asset transfer on fulfilment, direct payouts), its failure restores the
//! record and the operation returns the error with no net state change.

use std::collections::BTreeMap;

use openoffer_types::{
    constants::{self, ASSET_REGISTRY_INTERFACE_ID, MAX_OFFER_TOTAL},
    AccountId, Amount, AssetId, AssetRegistry, BasisPoints, Clock, ConfigField, EngineConfig,
    FundsRail, Offer, OfferEvent, OfferState, OpenofferError, Result, Role, RoleAssignments,
    SystemClock, Timestamp,
};

use crate::{
    access_control::AccessControl,
    digest::{compute_state_digest, DigestInput},
    escrow_ledger::{EscrowLedger, PushOutcome},
    pricing,
    settings::OfferSettings,
};

/// Escrow-and-settlement engine for offers on externally owned assets.
#[derive(Debug)]
pub struct OfferEngine<R, F, C = SystemClock> {
    /// The engine's own identity on the asset registry.
    account: AccountId,
    access: AccessControl,
    settings: OfferSettings,
    offers: BTreeMap<AssetId, Offer>,
    ledger: EscrowLedger,
    registry: R,
    rail: F,
    clock: C,
    /// Committed notifications not yet drained.
    events: Vec<OfferEvent>,
}

impl<R, F, C> OfferEngine<R, F, C>
where
    R: AssetRegistry,
    F: FundsRail,
    C: Clock,
{
    /// Build an engine. `deployer` starts out holding every role.
    ///
    /// # Errors
    /// - `RegistryInterfaceUnsupported` if `registry` is not an asset registry
    /// - configuration errors if `config` fails validation
    /// - `NullAccount` if `deployer` is null
    pub fn new(
        account: AccountId,
        deployer: AccountId,
        config: EngineConfig,
        registry: R,
        rail: F,
        clock: C,
    ) -> Result<Self> {
        if !registry.supports_interface(ASSET_REGISTRY_INTERFACE_ID) {
            return Err(OpenofferError::RegistryInterfaceUnsupported);
        }
        let settings = OfferSettings::new(config)?;
        let access = AccessControl::new(deployer)?;

        tracing::info!(
            engine_name = constants::ENGINE_NAME,
            version = constants::VERSION,
            engine = %account.short(),
            deployer = %deployer.short(),
            duration = config.global_duration,
            minimum_total = config.minimum_total_value,
            offer_cut_bp = config.offer_cut_bp,
            "Offer engine initialised"
        );

        Ok(Self {
            account,
            access,
            settings,
            offers: BTreeMap::new(),
            ledger: EscrowLedger::new(),
            registry,
            rail,
            clock,
            events: Vec::new(),
        })
    }

    // =================================================================
    // Offer lifecycle
    // =================================================================

    /// Place a new offer on `asset`, funded by `deposit`, displacing any
    /// existing one. Returns the owner price of the new offer.
    ///
    /// An active offer must be outbid by the configured increment; a
    /// lingering one is treated as already lost. Either way the displaced
    /// bidder is refunded their total minus their flat fee.
    pub fn create_offer(&mut self, caller: AccountId, asset: AssetId, deposit: Amount) -> Result<Amount> {
        self.access.when_not_frozen()?;
        let cfg = *self.settings.config();
        if deposit < cfg.minimum_total_value {
            return Err(OpenofferError::BelowMinimumTotal {
                total: deposit,
                minimum: cfg.minimum_total_value,
            });
        }
        check_total_bound(deposit)?;

        let now = self.clock.now();
        let expires_at = expiry(now, cfg.global_duration)?;
        let offer_price = pricing::offer_price(deposit, cfg.offer_cut_bp)?;

        let previous = self.offers.get(&asset).cloned();
        if let Some(prev) = previous.as_ref().filter(|p| p.is_active(now)) {
            let prev_price = pricing::offer_price(prev.total, prev.offer_cut_bp)?;
            let minimum_overbid =
                pricing::minimum_overbid_price(prev_price, cfg.minimum_price_increment_bp)?;
            if offer_price < minimum_overbid {
                return Err(OpenofferError::OverbidTooLow {
                    offer_price,
                    minimum_overbid,
                });
            }
        }

        self.ledger.receive(deposit)?;
        self.offers.insert(
            asset,
            Offer {
                expires_at,
                bidder: caller,
                offer_cut_bp: cfg.offer_cut_bp,
                total: deposit,
                unsuccessful_fee: cfg.unsuccessful_fee,
            },
        );

        if let Some(prev) = previous {
            let refund = prev.refund_after_flat_fee();
            self.ledger.credit_house(prev.total - refund);
            self.push_funds(asset, prev.bidder, refund);
            tracing::debug!(
                asset = %asset,
                displaced = %prev.bidder,
                refund,
                "Previous offer displaced"
            );
        }

        tracing::info!(
            asset = %asset,
            bidder = %caller,
            total = deposit,
            offer_price,
            expires_at,
            "Offer created"
        );
        self.emit(OfferEvent::OfferCreated {
            asset,
            bidder: caller,
            expires_at,
            total: deposit,
            offer_price,
        });
        Ok(offer_price)
    }

    /// Withdraw an active offer. The bidder gets the owner price back; the
    /// house keeps the proportional cut. Returns the amount refunded.
    pub fn cancel_offer(&mut self, caller: AccountId, asset: AssetId) -> Result<Amount> {
        self.access.when_not_frozen()?;
        let now = self.clock.now();
        let offer = self.existing_offer(asset)?;
        require_bidder(&offer, asset, caller)?;
        require_active(&offer, asset, now)?;

        let offer_price = pricing::offer_price(offer.total, offer.offer_cut_bp)?;
        let fee = offer.total - offer_price;

        self.offers.remove(&asset);
        self.ledger.credit_house(fee);
        self.push_funds(asset, offer.bidder, offer_price);

        tracing::info!(asset = %asset, bidder = %caller, refund = offer_price, fee, "Offer cancelled");
        self.emit(OfferEvent::OfferCancelled {
            asset,
            bidder: offer.bidder,
            bidder_received: offer_price,
            fee,
        });
        Ok(offer_price)
    }

    /// Accept the active offer on `asset`: the asset moves to the bidder and
    /// the owner is paid the offer price. Returns the owner price.
    ///
    /// `min_offer_price` protects the owner from an approval given for an
    /// earlier, better offer being applied to a cheaper replacement.
    pub fn fulfill_offer(
        &mut self,
        caller: AccountId,
        asset: AssetId,
        min_offer_price: Amount,
    ) -> Result<Amount> {
        self.access.when_not_frozen()?;
        let now = self.clock.now();
        let offer = self.existing_offer(asset)?;
        require_active(&offer, asset, now)?;

        let owner = self
            .registry
            .owner_of(asset)
            .map_err(|rejection| OpenofferError::RegistryRejected { reason: rejection.0 })?;
        if caller != owner && !self.access.has_role(Role::Coo, caller) {
            return Err(OpenofferError::NotOwnerOrCoo { asset, caller });
        }

        let offer_price = pricing::offer_price(offer.total, offer.offer_cut_bp)?;
        if offer_price < min_offer_price {
            return Err(OpenofferError::PriceBelowFloor {
                offer_price,
                minimum_accepted: min_offer_price,
            });
        }
        let fee = offer.total - offer_price;

        self.offers.remove(&asset);
        if let Err(rejection) =
            self.registry
                .transfer_from(self.account, owner, offer.bidder, asset)
        {
            self.offers.insert(asset, offer);
            tracing::warn!(asset = %asset, owner = %owner, reason = %rejection, "Asset transfer rejected");
            return Err(OpenofferError::RegistryRejected { reason: rejection.0 });
        }

        self.ledger.credit_house(fee);
        self.push_funds(asset, owner, offer_price);

        tracing::info!(
            asset = %asset,
            bidder = %offer.bidder,
            owner = %owner,
            offer_price,
            fee,
            "Offer fulfilled"
        );
        self.emit(OfferEvent::OfferFulfilled {
            asset,
            bidder: offer.bidder,
            owner,
            owner_received: offer_price,
            fee,
        });
        Ok(offer_price)
    }

    /// Clear lingering offers, refunding each bidder their total minus the
    /// flat fee. Absent and still-active ids are skipped silently. Anyone may
    /// call this. Returns how many offers were removed.
    pub fn batch_remove_expired(&mut self, assets: &[AssetId]) -> Result<usize> {
        self.access.when_not_frozen()?;
        let now = self.clock.now();
        let mut removed = 0;

        for &asset in assets {
            let Some(offer) = self.offers.get(&asset) else {
                tracing::debug!(asset = %asset, "Skipping: no offer");
                continue;
            };
            if OfferState::of(Some(offer), now) != OfferState::Lingering {
                tracing::debug!(asset = %asset, "Skipping: offer not expired");
                continue;
            }
            let Some(offer) = self.offers.remove(&asset) else {
                continue;
            };

            let refund = offer.refund_after_flat_fee();
            let fee = offer.total - refund;
            self.ledger.credit_house(fee);
            self.push_funds(asset, offer.bidder, refund);

            tracing::info!(asset = %asset, bidder = %offer.bidder, refund, fee, "Expired offer removed");
            self.emit(OfferEvent::ExpiredOfferRemoved {
                asset,
                bidder: offer.bidder,
                bidder_received: refund,
                fee,
            });
            removed += 1;
        }
        Ok(removed)
    }

    /// Refresh the expiry of an active offer and optionally raise its total
    /// by `top_up`. No overbid or minimum check applies to the raise.
    pub fn update_offer(&mut self, caller: AccountId, asset: AssetId, top_up: Amount) -> Result<Offer> {
        self.access.when_not_frozen()?;
        let now = self.clock.now();
        let offer = self.existing_offer(asset)?;
        require_bidder(&offer, asset, caller)?;
        require_active(&offer, asset, now)?;

        let total = offer
            .total
            .checked_add(top_up)
            .ok_or_else(|| OpenofferError::AmountOverflow {
                reason: format!("offer total {} + top-up {top_up}", offer.total),
            })?;
        check_total_bound(total)?;
        let expires_at = expiry(now, self.settings.config().global_duration)?;

        self.ledger.receive(top_up)?;
        let updated = Offer {
            expires_at,
            total,
            ..offer
        };
        self.offers.insert(asset, updated.clone());

        tracing::info!(asset = %asset, bidder = %caller, total, top_up, expires_at, "Offer updated");
        self.emit(OfferEvent::OfferUpdated {
            asset,
            bidder: caller,
            expires_at,
            total,
        });
        Ok(updated)
    }

    /// While frozen, return a bidder's full deposit with no fee, whether the
    /// offer is active or lingering. The payout is direct: if it fails the
    /// whole withdrawal fails.
    pub fn bidder_withdraw_funds(&mut self, caller: AccountId, asset: AssetId) -> Result<Amount> {
        self.access.when_frozen()?;
        let offer = self.existing_offer(asset)?;
        require_bidder(&offer, asset, caller)?;

        self.offers.remove(&asset);
        if let Err(err) = self.ledger.pay_direct(&mut self.rail, offer.bidder, offer.total) {
            self.offers.insert(asset, offer);
            return Err(err);
        }

        tracing::info!(asset = %asset, bidder = %caller, amount = offer.total, "Bidder withdrew funds while frozen");
        self.emit(OfferEvent::BidderWithdrewFundsWhenFrozen {
            asset,
            bidder: offer.bidder,
            amount: offer.total,
        });
        Ok(offer.total)
    }

    // =================================================================
    // Administration
    // =================================================================

    /// CEO-only. Hand `role` to `new_holder`.
    pub fn reassign_role(&mut self, caller: AccountId, role: Role, new_holder: AccountId) -> Result<()> {
        let previous = self.access.reassign(caller, role, new_holder)?;
        tracing::info!(role = %role, previous = %previous, current = %new_holder, "Role reassigned");
        self.emit(OfferEvent::RoleReassigned {
            role,
            previous,
            current: new_holder,
        });
        Ok(())
    }

    /// CEO-only, irreversible. Disables every normal operation; bidders
    /// can only pull their deposits back via [`Self::bidder_withdraw_funds`].
    pub fn freeze(&mut self, caller: AccountId) -> Result<()> {
        self.access.freeze(caller)?;
        tracing::warn!(by = %caller, active_offers = self.offers.len(), "Engine frozen");
        self.emit(OfferEvent::EngineFrozen { by: caller });
        Ok(())
    }

    /// CFO-only. Pays out and zeroes the accumulated fees.
    pub fn withdraw_cfo_earnings(&mut self, caller: AccountId) -> Result<Amount> {
        self.withdraw_role_balance(Role::Cfo, caller)
    }

    /// Lost-and-found-only. Pays out and zeroes the undeliverable balance.
    pub fn withdraw_lost_and_found(&mut self, caller: AccountId) -> Result<Amount> {
        self.withdraw_role_balance(Role::LostAndFound, caller)
    }

    fn withdraw_role_balance(&mut self, role: Role, caller: AccountId) -> Result<Amount> {
        self.access.require_role(role, caller)?;
        let amount = self
            .ledger
            .withdraw_role_balance(&mut self.rail, role, caller)?;
        tracing::info!(role = %role, recipient = %caller, amount, "Balance withdrawn");
        self.emit(OfferEvent::BalanceWithdrawn {
            role,
            recipient: caller,
            amount,
        });
        Ok(amount)
    }

    // =================================================================
    // Configuration (COO-only, not while frozen)
    // =================================================================

    pub fn set_global_duration(&mut self, caller: AccountId, duration: u64) -> Result<()> {
        self.config_gate(caller)?;
        let old = self.settings.set_global_duration(duration)?;
        self.config_updated(ConfigField::GlobalDuration, old.into(), duration.into());
        Ok(())
    }

    pub fn set_minimum_total_value(&mut self, caller: AccountId, minimum_total: Amount) -> Result<()> {
        self.config_gate(caller)?;
        let old = self.settings.set_minimum_total_value(minimum_total)?;
        self.config_updated(ConfigField::MinimumTotalValue, old, minimum_total);
        Ok(())
    }

    pub fn set_minimum_price_increment(&mut self, caller: AccountId, increment_bp: BasisPoints) -> Result<()> {
        self.config_gate(caller)?;
        let old = self.settings.set_minimum_price_increment(increment_bp)?;
        self.config_updated(
            ConfigField::MinimumPriceIncrement,
            old.into(),
            increment_bp.into(),
        );
        Ok(())
    }

    pub fn set_offer_cut(&mut self, caller: AccountId, cut_bp: BasisPoints) -> Result<()> {
        self.config_gate(caller)?;
        let old = self.settings.set_offer_cut(cut_bp)?;
        self.config_updated(ConfigField::OfferCut, old.into(), cut_bp.into());
        Ok(())
    }

    /// Does not re-check the stored minimum total.
    pub fn set_unsuccessful_fee(&mut self, caller: AccountId, fee: Amount) -> Result<()> {
        self.config_gate(caller)?;
        let old = self.settings.set_unsuccessful_fee(fee);
        self.config_updated(ConfigField::UnsuccessfulFee, old, fee);
        Ok(())
    }

    fn config_gate(&self, caller: AccountId) -> Result<()> {
        self.access.require_role(Role::Coo, caller)?;
        self.access.when_not_frozen()
    }

    fn config_updated(&mut self, field: ConfigField, old: Amount, new: Amount) {
        tracing::info!(field = %field, old, new, "Configuration updated");
        self.emit(OfferEvent::ConfigUpdated { field, old, new });
    }

    // =================================================================
    // Views
    // =================================================================

    /// The recorded offer, active or lingering.
    #[must_use]
    pub fn offer(&self, asset: AssetId) -> Option<&Offer> {
        self.offers.get(&asset).filter(|o| o.expires_at != 0)
    }

    #[must_use]
    pub fn offer_state(&self, asset: AssetId) -> OfferState {
        OfferState::of(self.offers.get(&asset), self.clock.now())
    }

    /// Owner price of the recorded offer, from its snapshotted cut.
    pub fn offer_price(&self, asset: AssetId) -> Result<Amount> {
        let offer = self.existing_offer(asset)?;
        pricing::offer_price(offer.total, offer.offer_cut_bp)
    }

    /// The smallest deposit `create_offer` would accept for `asset` right now.
    pub fn minimum_overbid_total(&self, asset: AssetId) -> Result<Amount> {
        let cfg = self.settings.config();
        let now = self.clock.now();
        match self.offers.get(&asset).filter(|o| o.is_active(now)) {
            None => Ok(cfg.minimum_total_value),
            Some(active) => {
                let prev_price = pricing::offer_price(active.total, active.offer_cut_bp)?;
                let target =
                    pricing::minimum_overbid_price(prev_price, cfg.minimum_price_increment_bp)?;
                let total = pricing::minimum_total_for_price(target, cfg.offer_cut_bp)?;
                Ok(total.max(cfg.minimum_total_value))
            }
        }
    }

    /// Number of records that are still active.
    #[must_use]
    pub fn active_offer_count(&self) -> usize {
        let now = self.clock.now();
        self.offers.values().filter(|o| o.is_active(now)).count()
    }

    /// Sum of every recorded offer's total, lingering ones included.
    #[must_use]
    pub fn escrowed_total(&self) -> Amount {
        self.offers.values().map(|o| o.total).sum()
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        self.settings.config()
    }

    #[must_use]
    pub fn roles(&self) -> &RoleAssignments {
        self.access.roles()
    }

    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.access.is_frozen()
    }

    #[must_use]
    pub fn account(&self) -> AccountId {
        self.account
    }

    #[must_use]
    pub fn total_cfo_earnings(&self) -> Amount {
        self.ledger.total_cfo_earnings()
    }

    #[must_use]
    pub fn total_lost_and_found_balance(&self) -> Amount {
        self.ledger.total_lost_and_found_balance()
    }

    /// Currency currently held by the engine.
    #[must_use]
    pub fn custody(&self) -> Amount {
        self.ledger.custody()
    }

    /// Check `custody == cfo + lost_and_found + Σ offer totals`.
    pub fn verify_conservation(&self) -> Result<()> {
        self.ledger.verify(self.escrowed_total())
    }

    #[must_use]
    pub fn state_digest(&self) -> [u8; 32] {
        compute_state_digest(&DigestInput {
            offers: &self.offers,
            config: self.settings.config(),
            total_cfo_earnings: self.ledger.total_cfo_earnings(),
            total_lost_and_found_balance: self.ledger.total_lost_and_found_balance(),
            custody: self.ledger.custody(),
            frozen: self.access.is_frozen(),
        })
    }

    #[must_use]
    pub fn state_digest_hex(&self) -> String {
        hex::encode(self.state_digest())
    }

    /// Notifications committed since the last drain.
    #[must_use]
    pub fn events(&self) -> &[OfferEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<OfferEvent> {
        std::mem::take(&mut self.events)
    }

    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    #[must_use]
    pub fn rail(&self) -> &F {
        &self.rail
    }

    pub fn rail_mut(&mut self) -> &mut F {
        &mut self.rail
    }

    // =================================================================
    // Internals
    // =================================================================

    fn existing_offer(&self, asset: AssetId) -> Result<Offer> {
        self.offer(asset)
            .cloned()
            .ok_or(OpenofferError::OfferNotFound(asset))
    }

    fn emit(&mut self, event: OfferEvent) {
        tracing::trace!(kind = event.kind(), asset = ?event.asset(), "Event committed");
        self.events.push(event);
    }

    fn push_funds(&mut self, asset: AssetId, recipient: AccountId, amount: Amount) -> PushOutcome {
        let outcome = self
            .ledger
            .push_funds(&mut self.rail, asset, recipient, amount);
        if outcome == PushOutcome::Deferred {
            self.emit(OfferEvent::PushFundsFailed {
                asset,
                recipient,
                amount,
            });
        }
        outcome
    }
}

fn require_bidder(offer: &Offer, asset: AssetId, caller: AccountId) -> Result<()> {
    if offer.bidder == caller {
        Ok(())
    } else {
        Err(OpenofferError::NotBidder { asset, caller })
    }
}

fn require_active(offer: &Offer, asset: AssetId, now: Timestamp) -> Result<()> {
    if offer.is_active(now) {
        Ok(())
    } else {
        Err(OpenofferError::OfferExpired {
            asset,
            expires_at: offer.expires_at,
        })
    }
}

fn check_total_bound(total: Amount) -> Result<()> {
    if total > MAX_OFFER_TOTAL {
        return Err(OpenofferError::AmountOverflow {
            reason: format!("offer total {total} exceeds {MAX_OFFER_TOTAL}"),
        });
    }
    Ok(())
}

fn expiry(now: Timestamp, duration: u64) -> Result<Timestamp> {
    now.checked_add(duration)
        .ok_or(OpenofferError::ExpiryOverflow { now, duration })
}
