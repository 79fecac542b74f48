//! Fee arithmetic.
//!
//! A bidder's deposit `T` covers both what the owner receives `P` and the
//! proportional cut on top of it: `T = P * (10000 + S) / 10000`. Inverting
//! with integer division truncates `P`, so any rounding remainder stays
//! with the house.

use openoffer_types::{constants::BASIS_POINTS_DIVISOR, Amount, BasisPoints, OpenofferError, Result};

const DIVISOR: Amount = BASIS_POINTS_DIVISOR as Amount;

fn overflow(what: &str, amount: Amount) -> OpenofferError {
    OpenofferError::AmountOverflow {
        reason: format!("{what} for {amount}"),
    }
}

/// What the owner would receive from a deposit of `total` at cut `cut_bp`.
pub fn offer_price(total: Amount, cut_bp: BasisPoints) -> Result<Amount> {
    let scaled = total
        .checked_mul(DIVISOR)
        .ok_or_else(|| overflow("offer price", total))?;
    Ok(scaled / (DIVISOR + Amount::from(cut_bp)))
}

/// The smallest owner price that outbids `previous_price` by `increment_bp`.
pub fn minimum_overbid_price(previous_price: Amount, increment_bp: BasisPoints) -> Result<Amount> {
    let scaled = previous_price
        .checked_mul(DIVISOR + Amount::from(increment_bp))
        .ok_or_else(|| overflow("minimum overbid", previous_price))?;
    Ok(scaled / DIVISOR)
}

/// The smallest deposit whose [`offer_price`] at `cut_bp` reaches `price`.
pub fn minimum_total_for_price(price: Amount, cut_bp: BasisPoints) -> Result<Amount> {
    let scaled = price
        .checked_mul(DIVISOR + Amount::from(cut_bp))
        .ok_or_else(|| overflow("minimum total", price))?;
    Ok(scaled.div_ceil(DIVISOR))
}

#[cfg(test)]
mod tests {
    use openoffer_types::constants::MAX_OFFER_TOTAL;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::*;

    #[test]
    fn ten_percent_cut() {
        assert_eq!(offer_price(220, 1_000).unwrap(), 200);
    }

    #[test]
    fn zero_cut_is_identity() {
        assert_eq!(offer_price(12_345, 0).unwrap(), 12_345);
    }

    #[test]
    fn truncates_toward_zero() {
        // 100 * 10000 / 10375 = 96.38...
        assert_eq!(offer_price(100, 375).unwrap(), 96);
    }

    #[test]
    fn overbid_threshold() {
        assert_eq!(minimum_overbid_price(200, 1_000).unwrap(), 220);
        assert_eq!(minimum_overbid_price(200, 0).unwrap(), 200);
    }

    #[test]
    fn total_needed_for_overbid() {
        // Beating a 200 price by 10% at a 10% cut needs a 242 deposit.
        let target = minimum_overbid_price(200, 1_000).unwrap();
        let total = minimum_total_for_price(target, 1_000).unwrap();
        assert_eq!(total, 242);
        assert_eq!(offer_price(total, 1_000).unwrap(), 220);
        assert!(offer_price(total - 1, 1_000).unwrap() < 220);
    }

    #[test]
    fn max_total_does_not_overflow() {
        let p = offer_price(MAX_OFFER_TOTAL, BASIS_POINTS_DIVISOR).unwrap();
        minimum_overbid_price(p, BASIS_POINTS_DIVISOR).unwrap();
        minimum_total_for_price(MAX_OFFER_TOTAL, BASIS_POINTS_DIVISOR).unwrap();
    }

    #[test]
    fn overflow_reported() {
        assert!(matches!(
            offer_price(u128::MAX, 0).unwrap_err(),
            OpenofferError::AmountOverflow { .. }
        ));
    }

    #[test]
    fn price_bounded_by_total_randomized() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..2_000 {
            let total: Amount = rng.gen_range(0..=1_000_000_000_000);
            let cut: BasisPoints = rng.gen_range(0..=BASIS_POINTS_DIVISOR);
            let p = offer_price(total, cut).unwrap();
            assert!(p <= total, "price {p} above total {total}");
            // The inverse never asks for more than the original deposit.
            assert!(minimum_total_for_price(p, cut).unwrap() <= total);
        }
    }
}
