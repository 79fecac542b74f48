//! Live economic parameters with validated setters.
//!
//! Only offer creation (and the expiry refresh in `update_offer`) reads
//! these values. Existing offers carry their own snapshot of the cut and
//! flat fee and are never affected by a setter.

use openoffer_types::{
    check_basis_points, check_global_duration, check_minimum_total, Amount, BasisPoints,
    EngineConfig, Result,
};

/// The engine's current configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OfferSettings {
    config: EngineConfig,
}

impl OfferSettings {
    /// Validate `config` the same way the setters would.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Setters return the value they replaced.
    pub fn set_global_duration(&mut self, duration: u64) -> Result<u64> {
        check_global_duration(duration)?;
        Ok(std::mem::replace(&mut self.config.global_duration, duration))
    }

    /// Checked against the flat fee currently stored.
    pub fn set_minimum_total_value(&mut self, minimum_total: Amount) -> Result<Amount> {
        check_minimum_total(minimum_total, self.config.unsuccessful_fee)?;
        Ok(std::mem::replace(
            &mut self.config.minimum_total_value,
            minimum_total,
        ))
    }

    pub fn set_minimum_price_increment(&mut self, increment_bp: BasisPoints) -> Result<BasisPoints> {
        check_basis_points("minimum_price_increment_bp", increment_bp)?;
        Ok(std::mem::replace(
            &mut self.config.minimum_price_increment_bp,
            increment_bp,
        ))
    }

    pub fn set_offer_cut(&mut self, cut_bp: BasisPoints) -> Result<BasisPoints> {
        check_basis_points("offer_cut_bp", cut_bp)?;
        Ok(std::mem::replace(&mut self.config.offer_cut_bp, cut_bp))
    }

    /// Not cross-checked against the stored minimum total. Raising the fee
    /// past half the minimum is the operator's responsibility.
    pub fn set_unsuccessful_fee(&mut self, fee: Amount) -> Amount {
        std::mem::replace(&mut self.config.unsuccessful_fee, fee)
    }
}

#[cfg(test)]
mod tests {
    use openoffer_types::OpenofferError;

    use super::*;

    fn settings() -> OfferSettings {
        OfferSettings::new(EngineConfig {
            global_duration: 1_000,
            minimum_total_value: 200,
            minimum_price_increment_bp: 1_000,
            offer_cut_bp: 1_000,
            unsuccessful_fee: 50,
        })
        .unwrap()
    }

    #[test]
    fn invalid_initial_config_rejected() {
        let err = OfferSettings::new(EngineConfig {
            minimum_price_increment_bp: 20_000,
            ..EngineConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, OpenofferError::BasisPointsOutOfRange { .. }));
    }

    #[test]
    fn minimum_total_checked_against_current_fee() {
        let mut s = settings();
        assert!(matches!(
            s.set_minimum_total_value(99).unwrap_err(),
            OpenofferError::MinimumTotalTooLow { .. }
        ));
        assert_eq!(s.config().minimum_total_value, 200);

        assert_eq!(s.set_minimum_total_value(100).unwrap(), 200);
        assert_eq!(s.config().minimum_total_value, 100);
    }

    #[test]
    fn fee_setter_does_not_recheck_minimum() {
        let mut s = settings();
        assert_eq!(s.set_unsuccessful_fee(150), 50);
        assert_eq!(s.config().unsuccessful_fee, 150);
        // The stored minimum (200) is now below 2 * fee; the next
        // minimum-total update has to restore the relationship.
        assert!(s.set_minimum_total_value(250).is_err());
        s.set_minimum_total_value(300).unwrap();
    }

    #[test]
    fn basis_point_setters_bounded() {
        let mut s = settings();
        assert!(s.set_offer_cut(10_001).is_err());
        assert!(s.set_minimum_price_increment(10_001).is_err());
        assert_eq!(s.set_offer_cut(10_000).unwrap(), 1_000);
        assert_eq!(s.set_minimum_price_increment(0).unwrap(), 1_000);
        assert_eq!(s.config().offer_cut_bp, 10_000);
        assert_eq!(s.config().minimum_price_increment_bp, 0);
    }

    #[test]
    fn duration_setter_returns_previous() {
        let mut s = settings();
        assert_eq!(s.set_global_duration(60).unwrap(), 1_000);
        assert_eq!(s.config().global_duration, 60);
        assert_eq!(
            s.set_global_duration(0).unwrap_err(),
            OpenofferError::ZeroDuration
        );
        assert_eq!(s.config().global_duration, 60);
    }
}
