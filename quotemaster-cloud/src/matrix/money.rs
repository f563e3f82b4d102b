//! Decimal helpers for matrix prices and totals
//!
//! All money leaving the engine is rounded to 2 decimal places, half away
//! from zero.

use rust_decimal::prelude::*;
use shared::models::Delta;

const DECIMAL_PLACES: u32 = 2;

/// Maximum accepted unit price (1,000,000), well inside the NUMERIC(14, 4)
/// price columns even after 100% VAT
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Round to 2 decimal places (half away from zero)
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Price including VAT: `round2(price × (1 + vat_rate / 100))`.
///
/// `None` when the product overflows `Decimal`.
pub fn with_vat(price: Decimal, vat_rate: Decimal) -> Option<Decimal> {
    let factor = Decimal::ONE.checked_add(vat_rate.checked_div(Decimal::ONE_HUNDRED)?)?;
    price.checked_mul(factor).map(round2)
}

/// `part / whole × 100`, rounded. Zero when `whole` is zero.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    round2(part / whole * Decimal::ONE_HUNDRED)
}

/// Coverage ratio of two counters in percent
pub fn coverage(count: u32, total: u32) -> Decimal {
    percent_of(Decimal::from(count), Decimal::from(total))
}

/// Relative change of `current` against `reference` in percent.
///
/// `None` when the reference is zero or negative.
pub fn change_percent(current: Decimal, reference: Decimal) -> Option<Decimal> {
    if reference <= Decimal::ZERO {
        return None;
    }
    Some(round2((current - reference) / reference * Decimal::ONE_HUNDRED))
}

/// Delta of `current` against `reference`
pub fn delta(current: Decimal, reference: Decimal) -> Delta {
    let reference = round2(reference);
    let current = round2(current);
    Delta {
        reference,
        amount: current - reference,
        percent: change_percent(current, reference),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn round2_half_away_from_zero() {
        assert_eq!(round2(d("1.005")), d("1.01"));
        assert_eq!(round2(d("1.004")), d("1.00"));
        assert_eq!(round2(d("-1.005")), d("-1.01"));
    }

    #[test]
    fn vat_is_applied_and_rounded() {
        assert_eq!(with_vat(d("10"), d("8")), Some(d("10.80")));
        assert_eq!(with_vat(d("12.345"), d("10")), Some(d("13.58")));
        assert_eq!(with_vat(d("7.5"), Decimal::ZERO), Some(d("7.50")));
    }

    #[test]
    fn vat_overflow_is_reported() {
        assert_eq!(with_vat(Decimal::MAX, d("100")), None);
        assert_eq!(with_vat(MAX_PRICE, d("100")), Some(d("2000000")));
    }

    #[test]
    fn coverage_handles_zero_total() {
        assert_eq!(coverage(0, 0), Decimal::ZERO);
        assert_eq!(coverage(1, 3), d("33.33"));
        assert_eq!(coverage(2, 3), d("66.67"));
        assert_eq!(coverage(4, 4), d("100"));
    }

    #[test]
    fn change_percent_needs_positive_reference() {
        assert_eq!(change_percent(d("110"), d("100")), Some(d("10")));
        assert_eq!(change_percent(d("90"), d("100")), Some(d("-10")));
        assert_eq!(change_percent(d("5"), Decimal::ZERO), None);
    }

    #[test]
    fn delta_of_totals() {
        let delta = delta(d("95.50"), d("100"));
        assert_eq!(delta.reference, d("100"));
        assert_eq!(delta.amount, d("-4.50"));
        assert_eq!(delta.percent, Some(d("-4.50")));

        let empty = super::delta(d("12"), Decimal::ZERO);
        assert_eq!(empty.amount, d("12"));
        assert!(empty.percent.is_none());
    }
}
