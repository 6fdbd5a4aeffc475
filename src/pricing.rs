//! Pricing

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rusty_money::{Money, MoneyError, iso::Currency};

/// Minor units per major unit for every supported currency.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Sums the given prices, starting from zero in `currency`.
///
/// # Errors
///
/// Returns a [`MoneyError`] if any price is in a different currency.
pub fn total_price<'a, 'b>(
    prices: impl IntoIterator<Item = &'b Money<'a, Currency>>,
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, MoneyError>
where
    'a: 'b,
{
    prices
        .into_iter()
        .try_fold(Money::from_minor(0, currency), |acc, price| acc.add(*price))
}

/// Convert a major-unit amount (e.g. `49.50`) to minor units (`4950`).
///
/// Returns `None` if the amount carries more precision than a minor unit or
/// does not fit in an `i64`. Amounts are never rounded.
pub fn minor_units_from_decimal(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))?;

    if !scaled.fract().is_zero() {
        return None;
    }

    scaled.to_i64()
}

/// Convert minor units back to a major-unit decimal amount.
pub fn decimal_from_minor_units(minor_units: i64) -> Decimal {
    Decimal::new(minor_units, 2)
}

/// Convert an `i64` to an `f64` if it can be represented exactly.
///
/// `good_lp` stores coefficients as `f64`. Only integers with absolute value <= 2^53
/// can be represented exactly in an IEEE-754 `f64` mantissa.
pub fn i64_to_f64_exact(v: i64) -> Option<f64> {
    let f = v.to_f64()?;

    (f.to_i64() == Some(v)).then_some(f)
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, INR};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn total_price_sums_prices() -> TestResult {
        let prices = [Money::from_minor(5000, INR), Money::from_minor(4850, INR)];

        assert_eq!(total_price(&prices, INR)?, Money::from_minor(9850, INR));

        Ok(())
    }

    #[test]
    fn total_price_of_nothing_is_zero() -> TestResult {
        let prices: [Money<'static, Currency>; 0] = [];

        assert_eq!(total_price(&prices, INR)?, Money::from_minor(0, INR));

        Ok(())
    }

    #[test]
    fn total_price_rejects_mixed_currencies() {
        let prices = [Money::from_minor(100, INR), Money::from_minor(100, GBP)];

        assert!(total_price(&prices, INR).is_err());
    }

    #[test]
    fn minor_units_from_decimal_scales_by_one_hundred() {
        assert_eq!(minor_units_from_decimal(Decimal::new(4950, 2)), Some(4950));
        assert_eq!(minor_units_from_decimal(Decimal::from(45)), Some(4500));
        assert_eq!(minor_units_from_decimal(Decimal::new(-125, 2)), Some(-125));
    }

    #[test]
    fn minor_units_from_decimal_refuses_to_round() {
        assert_eq!(minor_units_from_decimal(Decimal::new(49_999, 3)), None);
    }

    #[test]
    fn decimal_from_minor_units_keeps_two_places() {
        assert_eq!(decimal_from_minor_units(4950).to_string(), "49.50");
    }

    #[test]
    #[expect(
        clippy::cast_precision_loss,
        reason = "This is a test case for exact conversion"
    )]
    fn i64_to_f64_exact_accepts_exactly_representable_integers() {
        let cases: [i64; 5] = [0, 1, -1, 123, 9_007_199_254_740_992]; // 2^53

        for v in cases {
            assert_eq!(i64_to_f64_exact(v), Some(v as f64));
        }
    }

    #[test]
    fn i64_to_f64_exact_rejects_nonrepresentable_integers() {
        let cases: [i64; 2] = [9_007_199_254_740_993, -9_007_199_254_740_993]; // 2^53 + 1

        for v in cases {
            assert_eq!(i64_to_f64_exact(v), None);
        }
    }
}
