//! End-to-end integration tests for the offer lifecycle.
//!
//! Each test drives a full engine (in-memory registry, mock rail, manual
//! clock) through a realistic sequence and checks payouts, fee routing,
//! asset ownership, notifications, and custody conservation together.

use openoffer_engine::OfferEngine;
use openoffer_types::testing::{InMemoryRegistry, ManualClock, MockRail};
use openoffer_types::*;

const T0: Timestamp = 1_700_000_000;

/// Helper: an engine plus the accounts around it.
struct Market {
    engine: OfferEngine<InMemoryRegistry, MockRail, ManualClock>,
    clock: ManualClock,
    admin: AccountId,
}

impl Market {
    /// duration=1000, minTotal=200, increment=10%, flatFee=50, cut=10%
    fn new() -> Self {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();

        let admin = AccountId::new();
        let clock = ManualClock::starting_at(T0);
        let config = EngineConfig {
            global_duration: 1_000,
            minimum_total_value: 200,
            minimum_price_increment_bp: 1_000,
            offer_cut_bp: 1_000,
            unsuccessful_fee: 50,
        };
        let engine = OfferEngine::new(
            AccountId::new(),
            admin,
            config,
            InMemoryRegistry::new(),
            MockRail::new(),
            clock.clone(),
        )
        .expect("engine construction should succeed");
        Self {
            engine,
            clock,
            admin,
        }
    }

    /// Mint `asset` to a fresh owner who approves the engine for it.
    fn list(&mut self, asset: AssetId) -> AccountId {
        let owner = AccountId::new();
        let operator = self.engine.account();
        let registry = self.engine.registry_mut();
        registry.mint(asset, owner);
        registry.approve(asset, operator);
        owner
    }

    fn conserved(&self) {
        self.engine
            .verify_conservation()
            .expect("custody must equal balances plus escrowed totals");
    }
}

#[test]
fn fulfilment_pays_owner_and_house() {
    let mut m = Market::new();
    let asset = AssetId(1);
    let owner = m.list(asset);
    let alice = AccountId::new();

    m.engine.create_offer(alice, asset, 220).unwrap();
    m.engine.fulfill_offer(owner, asset, 200).unwrap();

    assert_eq!(m.engine.rail().received(owner), 200);
    assert_eq!(m.engine.total_cfo_earnings(), 20);
    assert_eq!(m.engine.registry().owner(asset), Some(alice));
    assert_eq!(m.engine.custody(), 20);
    m.conserved();

    let kinds: Vec<_> = m.engine.events().iter().map(OfferEvent::kind).collect();
    assert_eq!(kinds, ["OFFER_CREATED", "OFFER_FULFILLED"]);
}

#[test]
fn overbid_threshold_and_displacement() {
    let mut m = Market::new();
    let asset = AssetId(7);
    let owner = m.list(asset);
    let alice = AccountId::new();
    let bob = AccountId::new();

    m.engine.create_offer(alice, asset, 220).unwrap();
    assert_eq!(m.engine.minimum_overbid_total(asset).unwrap(), 242);
    assert!(matches!(
        m.engine.create_offer(bob, asset, 241),
        Err(OpenofferError::OverbidTooLow { .. })
    ));
    m.conserved();

    m.engine.create_offer(bob, asset, 242).unwrap();
    assert_eq!(m.engine.rail().received(alice), 170);
    assert_eq!(m.engine.total_cfo_earnings(), 50);
    m.conserved();

    // Owner takes bob's offer at exactly its price.
    assert_eq!(m.engine.fulfill_offer(owner, asset, 220).unwrap(), 220);
    assert_eq!(m.engine.rail().received(owner), 220);
    assert_eq!(m.engine.total_cfo_earnings(), 72);
    assert_eq!(m.engine.registry().owner(asset), Some(bob));
    m.conserved();
}

#[test]
fn approval_is_single_use_across_offers() {
    let mut m = Market::new();
    let asset = AssetId(3);
    let owner = m.list(asset);
    let alice = AccountId::new();
    let carol = AccountId::new();

    m.engine.create_offer(alice, asset, 220).unwrap();
    m.engine.fulfill_offer(owner, asset, 200).unwrap();

    // Alice now owns the asset but has approved nobody.
    m.engine.create_offer(carol, asset, 300).unwrap();
    assert!(matches!(
        m.engine.fulfill_offer(alice, asset, 0),
        Err(OpenofferError::RegistryRejected { .. })
    ));
    assert_eq!(m.engine.offer(asset).unwrap().bidder, carol);
    m.conserved();

    let operator = m.engine.account();
    m.engine.registry_mut().approve(asset, operator);
    m.engine.fulfill_offer(alice, asset, 0).unwrap();
    assert_eq!(m.engine.registry().owner(asset), Some(carol));
    m.conserved();
}

#[test]
fn freeze_lets_bidders_recover_everything() {
    let mut m = Market::new();
    let alice = AccountId::new();
    let bob = AccountId::new();
    m.list(AssetId(1));
    m.list(AssetId(2));

    m.engine.create_offer(alice, AssetId(1), 220).unwrap();
    m.clock.advance(600);
    m.engine.create_offer(bob, AssetId(2), 500).unwrap();
    m.clock.advance(600);
    // AssetId(1) lingering, AssetId(2) still active.

    m.engine.freeze(m.admin).unwrap();
    assert!(m.engine.is_frozen());
    assert_eq!(m.engine.freeze(m.admin), Err(OpenofferError::Frozen));
    assert_eq!(m.engine.cancel_offer(bob, AssetId(2)), Err(OpenofferError::Frozen));

    assert_eq!(m.engine.bidder_withdraw_funds(alice, AssetId(1)).unwrap(), 220);
    assert_eq!(m.engine.bidder_withdraw_funds(bob, AssetId(2)).unwrap(), 500);
    assert_eq!(m.engine.rail().received(alice), 220);
    assert_eq!(m.engine.rail().received(bob), 500);
    assert_eq!(m.engine.total_cfo_earnings(), 0);
    assert_eq!(m.engine.custody(), 0);
    m.conserved();
}

#[test]
fn house_withdrawals_still_work_when_frozen() {
    let mut m = Market::new();
    let alice = AccountId::new();
    let cfo = AccountId::new();
    m.list(AssetId(1));
    m.engine.reassign_role(m.admin, Role::Cfo, cfo).unwrap();

    m.engine.create_offer(alice, AssetId(1), 220).unwrap();
    m.engine.cancel_offer(alice, AssetId(1)).unwrap();
    m.engine.freeze(m.admin).unwrap();

    assert_eq!(m.engine.withdraw_cfo_earnings(cfo).unwrap(), 20);
    assert_eq!(m.engine.rail().received(cfo), 20);
    assert_eq!(m.engine.custody(), 0);
    m.conserved();
}

#[test]
fn refused_refund_parks_in_lost_and_found() {
    let mut m = Market::new();
    let asset = AssetId(9);
    m.list(asset);
    let alice = AccountId::new();
    let bob = AccountId::new();
    let recovery = AccountId::new();
    m.engine
        .reassign_role(m.admin, Role::LostAndFound, recovery)
        .unwrap();

    m.engine.create_offer(alice, asset, 220).unwrap();
    m.engine.rail_mut().block(alice);

    // The overbid still goes through even though alice refuses her refund.
    m.engine.create_offer(bob, asset, 300).unwrap();
    assert_eq!(m.engine.offer(asset).unwrap().bidder, bob);
    assert_eq!(m.engine.total_lost_and_found_balance(), 170);
    assert_eq!(m.engine.total_cfo_earnings(), 50);
    assert!(m.engine.events().contains(&OfferEvent::PushFundsFailed {
        asset,
        recipient: alice,
        amount: 170,
    }));
    m.conserved();

    assert!(matches!(
        m.engine.withdraw_lost_and_found(m.admin),
        Err(OpenofferError::Unauthorized { .. })
    ));
    assert_eq!(m.engine.withdraw_lost_and_found(recovery).unwrap(), 170);
    assert_eq!(m.engine.rail().received(recovery), 170);
    m.conserved();
}

#[test]
fn expired_offers_swept_in_batch() {
    let mut m = Market::new();
    let bidders: Vec<AccountId> = (0..4).map(|_| AccountId::new()).collect();
    for (i, bidder) in bidders.iter().enumerate() {
        let asset = AssetId(i as u64 + 1);
        m.list(asset);
        m.engine.create_offer(*bidder, asset, 400).unwrap();
    }
    m.clock.advance(999);
    assert_eq!(m.engine.batch_remove_expired(&[AssetId(1)]).unwrap(), 0);

    // Keep AssetId(4) alive, then let the rest lapse.
    m.engine.update_offer(bidders[3], AssetId(4), 0).unwrap();
    m.clock.advance(1);
    assert_eq!(m.engine.active_offer_count(), 1);

    let all: Vec<AssetId> = (1..=5).map(AssetId).collect();
    assert_eq!(m.engine.batch_remove_expired(&all).unwrap(), 3);
    for bidder in &bidders[..3] {
        assert_eq!(m.engine.rail().received(*bidder), 350);
    }
    assert_eq!(m.engine.total_cfo_earnings(), 150);
    assert_eq!(m.engine.escrowed_total(), 400);
    m.conserved();
}

#[test]
fn role_handover_moves_authority() {
    let mut m = Market::new();
    let ceo = AccountId::new();
    let coo = AccountId::new();

    m.engine.reassign_role(m.admin, Role::Coo, coo).unwrap();
    m.engine.reassign_role(m.admin, Role::Ceo, ceo).unwrap();
    assert_eq!(m.engine.roles().holder(Role::Ceo), ceo);

    assert!(matches!(
        m.engine.set_offer_cut(m.admin, 0),
        Err(OpenofferError::Unauthorized { role: Role::Coo, .. })
    ));
    m.engine.set_offer_cut(coo, 0).unwrap();
    assert_eq!(m.engine.config().offer_cut_bp, 0);

    assert!(matches!(
        m.engine.freeze(m.admin),
        Err(OpenofferError::Unauthorized { role: Role::Ceo, .. })
    ));
    assert_eq!(
        m.engine.reassign_role(ceo, Role::Cfo, AccountId::NULL),
        Err(OpenofferError::NullAccount(Role::Cfo))
    );
    m.engine.freeze(ceo).unwrap();

    let kinds: Vec<_> = m.engine.events().iter().map(OfferEvent::kind).collect();
    assert_eq!(
        kinds,
        ["ROLE_REASSIGNED", "ROLE_REASSIGNED", "CONFIG_UPDATED", "ENGINE_FROZEN"]
    );
}

#[test]
fn events_serialize_for_indexers() {
    let mut m = Market::new();
    let asset = AssetId(1);
    m.list(asset);
    let alice = AccountId::new();
    m.engine.create_offer(alice, asset, 220).unwrap();

    let events = m.engine.drain_events();
    let json = serde_json::to_string(&events).unwrap();
    let back: Vec<OfferEvent> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, events);
    assert!(m.engine.events().is_empty());
}

#[test]
fn overbid_acceptance_is_monotonic() {
    // Every deposit at or above the first accepted one also clears the bar.
    let mut first_accepted = None;
    for deposit in 230..=320 {
        let mut m = Market::new();
        let asset = AssetId(1);
        m.list(asset);
        m.engine.create_offer(AccountId::new(), asset, 220).unwrap();

        let accepted = m.engine.create_offer(AccountId::new(), asset, deposit).is_ok();
        match first_accepted {
            None if accepted => first_accepted = Some(deposit),
            None => {}
            Some(_) => assert!(accepted, "deposit {deposit} rejected above threshold"),
        }
    }
    assert_eq!(first_accepted, Some(242));
}
