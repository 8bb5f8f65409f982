//! Prices

use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::items::CartItem;

/// Errors that can occur while calculating line or cart totals.
#[derive(Debug, Error, PartialEq)]
pub enum PricingError {
    /// A line total or the sum of the lines did not fit in minor units.
    #[error("price calculation overflowed")]
    Overflow,

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates `price × quantity`.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if the result doesn't fit in minor units.
pub fn line_total<'a>(
    price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .ok_or(PricingError::Overflow)?;

    Ok(Money::from_minor(minor, price.currency()))
}

/// Calculates the total price of a list of cart items.
///
/// An empty list totals to zero in `currency`.
///
/// # Errors
///
/// - [`PricingError::Overflow`]: a line total or the running sum overflowed.
/// - [`PricingError::Money`]: an item is priced in a currency other than `currency`.
pub fn total_price<'a>(
    items: &[CartItem<'a>],
    currency: &'a Currency,
) -> Result<Money<'a, Currency>, PricingError> {
    let minor = items
        .iter()
        .try_fold(0_i64, |acc, item| -> Result<i64, PricingError> {
            let line = item.subtotal()?;

            if line.currency() != currency {
                return Err(MoneyError::CurrencyMismatch {
                    expected: currency.iso_alpha_code,
                    actual: line.currency().iso_alpha_code,
                }
                .into());
            }

            acc.checked_add(line.to_minor_units())
                .ok_or(PricingError::Overflow)
        })?;

    Ok(Money::from_minor(minor, currency))
}

/// Formats an amount as `<symbol><amount>` with exactly two decimal places,
/// independent of locale (no digit grouping).
pub fn display_amount(money: &Money<'_, Currency>) -> String {
    format!("{}{:.2}", money.currency().symbol, money.amount())
}
