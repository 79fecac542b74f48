//! Deterministic state digest.
//!
//! Two engines fed the same sequence of operations must end in the same
//! state. The digest commits to the offer registry (in asset order), both
//! ledger accumulators, custody, the live configuration, and the freeze
//! latch, so replicas can be compared without shipping full state.

use std::collections::BTreeMap;

use openoffer_types::{Amount, AssetId, EngineConfig, Offer};
use sha2::{Digest, Sha256};

/// Everything the digest commits to.
pub struct DigestInput<'a> {
    pub offers: &'a BTreeMap<AssetId, Offer>,
    pub config: &'a EngineConfig,
    pub total_cfo_earnings: Amount,
    pub total_lost_and_found_balance: Amount,
    pub custody: Amount,
    pub frozen: bool,
}

#[must_use]
pub fn compute_state_digest(input: &DigestInput<'_>) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(b"openoffer:state:v1:");
    hasher.update([u8::from(input.frozen)]);
    hasher.update(input.total_cfo_earnings.to_le_bytes());
    hasher.update(input.total_lost_and_found_balance.to_le_bytes());
    hasher.update(input.custody.to_le_bytes());

    let cfg = input.config;
    hasher.update(cfg.global_duration.to_le_bytes());
    hasher.update(cfg.minimum_total_value.to_le_bytes());
    hasher.update(cfg.minimum_price_increment_bp.to_le_bytes());
    hasher.update(cfg.offer_cut_bp.to_le_bytes());
    hasher.update(cfg.unsuccessful_fee.to_le_bytes());

    hasher.update((input.offers.len() as u64).to_le_bytes());
    for (asset, offer) in input.offers {
        hasher.update(asset.0.to_le_bytes());
        hasher.update(offer.expires_at.to_le_bytes());
        hasher.update(offer.bidder.0.as_bytes());
        hasher.update(offer.offer_cut_bp.to_le_bytes());
        hasher.update(offer.total.to_le_bytes());
        hasher.update(offer.unsuccessful_fee.to_le_bytes());
    }

    let result = hasher.finalize();
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&result);
    digest
}
