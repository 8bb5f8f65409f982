//! Discounts
//!
//! Discount codes are resolved to a rate by a [`DiscountPolicy`]. The cart only
//! ever asks the policy for a rate, so new codes (or a whole new resolution
//! scheme) can be plugged in without touching the cart.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

/// Errors specific to discount calculations.
#[derive(Debug, Error)]
pub enum DiscountError {
    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// A policy returned a rate below 0% or above 100%.
    #[error("discount rate {0} is outside 0 to 1")]
    InvalidRate(Decimal),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Resolves a discount code to the fraction of the subtotal taken off.
pub trait DiscountPolicy: fmt::Debug + Send + Sync {
    /// Returns the rate for `code`, or `None` if the code isn't recognised.
    fn rate(&self, code: &str) -> Option<Percentage>;
}

/// A fixed table of discount codes.
#[derive(Debug, Clone, Default)]
pub struct DiscountCodes {
    rates: FxHashMap<String, Percentage>,
}

impl DiscountCodes {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock codes: `SAVE10` (10% off) and `SAVE20` (20% off).
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_code("SAVE10", Percentage::from(0.10))
            .with_code("SAVE20", Percentage::from(0.20))
    }

    /// Add a code, returning the table.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<String>, rate: Percentage) -> Self {
        self.insert(code, rate);
        self
    }

    /// Add or replace a code.
    pub fn insert(&mut self, code: impl Into<String>, rate: Percentage) {
        self.rates.insert(code.into(), rate);
    }

    /// Number of codes in the table.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the table has no codes.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl DiscountPolicy for DiscountCodes {
    fn rate(&self, code: &str) -> Option<Percentage> {
        self.rates.get(code).copied()
    }
}

/// Policy that recognises no codes.
#[derive(Debug, Copy, Clone, Default)]
pub struct NoDiscounts;

impl DiscountPolicy for NoDiscounts {
    fn rate(&self, _code: &str) -> Option<Percentage> {
        None
    }
}

/// Adapts a closure into a [`DiscountPolicy`].
pub struct DiscountFn<F>(pub F);

impl<F> fmt::Debug for DiscountFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DiscountFn").finish_non_exhaustive()
    }
}

impl<F> DiscountPolicy for DiscountFn<F>
where
    F: Fn(&str) -> Option<Percentage> + Send + Sync,
{
    fn rate(&self, code: &str) -> Option<Percentage> {
        (self.0)(code)
    }
}

/// Calculate the amount taken off `price` at `percent`, rounded to minor units.
///
/// # Errors
///
/// - [`DiscountError::InvalidRate`]: `percent` is below 0% or above 100%.
/// - [`DiscountError::PercentConversion`]: the amount cannot be represented.
pub fn discount_on<'a>(
    price: &Money<'a, Currency>,
    percent: &Percentage,
) -> Result<Money<'a, Currency>, DiscountError> {
    let fraction = checked_fraction(percent)?;

    let discount_minor = Decimal::from(price.to_minor_units())
        .checked_mul(fraction)
        .map(|amount| amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|amount| amount.to_i64())
        .ok_or(DiscountError::PercentConversion)?;

    Ok(Money::from_minor(discount_minor, price.currency()))
}

/// The fraction `percent` stands for, between 0 and 1 inclusive.
///
/// # Errors
///
/// Returns [`DiscountError::InvalidRate`] if the fraction falls outside that range.
pub fn checked_fraction(percent: &Percentage) -> Result<Decimal, DiscountError> {
    // Percentage keeps its Decimal private; multiplying by one reads it back.
    let fraction = (*percent) * Decimal::ONE;

    if (Decimal::ZERO..=Decimal::ONE).contains(&fraction) {
        Ok(fraction)
    } else {
        Err(DiscountError::InvalidRate(fraction))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn standard_codes_resolve() {
        let codes = DiscountCodes::standard();

        assert_eq!(codes.rate("SAVE10"), Some(Percentage::from(0.10)));
        assert_eq!(codes.rate("SAVE20"), Some(Percentage::from(0.20)));
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn unknown_and_differently_cased_codes_do_not_resolve() {
        let codes = DiscountCodes::standard();

        assert_eq!(codes.rate("SAVE99"), None);
        assert_eq!(codes.rate("save10"), None);
    }

    #[test]
    fn insert_replaces_an_existing_rate() {
        let mut codes = DiscountCodes::standard();

        codes.insert("SAVE10", Percentage::from(0.15));

        assert_eq!(codes.rate("SAVE10"), Some(Percentage::from(0.15)));
        assert_eq!(codes.len(), 2);
    }

    #[test]
    fn no_discounts_never_resolves() {
        assert_eq!(NoDiscounts.rate("SAVE10"), None);
    }

    #[test]
    fn closure_policy_is_consulted() {
        let policy =
            DiscountFn(|code: &str| code.starts_with("STAFF").then_some(Percentage::from(0.5)));

        assert_eq!(policy.rate("STAFF-42"), Some(Percentage::from(0.5)));
        assert_eq!(policy.rate("SAVE10"), None);
        assert!(format!("{policy:?}").contains("DiscountFn"));
    }

    #[test]
    fn discount_on_rounds_to_minor_units() -> TestResult {
        let subtotal = Money::from_minor(249_000, USD);

        assert_eq!(
            discount_on(&subtotal, &Percentage::from(0.10))?,
            Money::from_minor(24_900, USD)
        );
        assert_eq!(
            discount_on(&Money::from_minor(5, USD), &Percentage::from(0.10))?,
            Money::from_minor(1, USD)
        );

        Ok(())
    }

    #[test]
    fn rates_outside_zero_to_one_are_rejected() {
        let price = Money::from_minor(1_000, USD);

        for rate in [1.5, -0.2] {
            assert!(
                matches!(
                    discount_on(&price, &Percentage::from(rate)),
                    Err(DiscountError::InvalidRate(_))
                ),
                "{rate} should be rejected"
            );
        }
    }

    #[test]
    fn full_and_zero_rates_are_accepted() -> TestResult {
        let price = Money::from_minor(1_000, USD);

        assert_eq!(discount_on(&price, &Percentage::from(1.0))?, price);
        assert_eq!(
            discount_on(&price, &Percentage::from(0.0))?,
            Money::from_minor(0, USD)
        );

        Ok(())
    }

    #[test]
    fn checked_fraction_reads_the_rate() -> TestResult {
        assert_eq!(checked_fraction(&Percentage::from(0.25))?, Decimal::new(25, 2));

        Ok(())
    }
}
