//! Product Fixtures

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    products::{Category, Product},
};

/// Product Fixture
#[derive(Debug, Deserialize)]
pub struct ProductFixture {
    /// Product name
    pub name: String,

    /// Product price (e.g., "1200.00 USD")
    pub price: String,

    /// Product category
    pub category: Category,

    /// Product description
    #[serde(default)]
    pub description: String,
}

impl ProductFixture {
    /// Build the product, using the fixture key as its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the price can't be parsed or the product is invalid.
    pub fn into_product(self, key: String) -> Result<Product<'static>, FixtureError> {
        let (minor_units, currency) = parse_price(&self.price)?;

        Ok(Product::with_id(
            key,
            self.name,
            Money::from_minor(minor_units, currency),
            self.category,
            self.description,
        )?)
    }
}

/// Parse a price such as `"2.99 GBP"` into minor units and its ISO currency.
///
/// The amount is scaled by the currency's exponent, so `"500 JPY"` is 500 minor
/// units while `"5.00 USD"` is 500 cents.
///
/// # Errors
///
/// - [`FixtureError::InvalidPrice`]: the string isn't `AMOUNT CURRENCY`, or the
///   amount has more decimal places than the currency allows.
/// - [`FixtureError::UnknownCurrency`]: the code isn't an ISO currency.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let invalid = || FixtureError::InvalidPrice(s.to_string());

    let mut parts = s.split_whitespace();
    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let currency =
        iso::find(code).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    let amount = amount.parse::<Decimal>().map_err(|_err| invalid())?;

    let minor_units = 10_i64
        .checked_pow(currency.exponent)
        .and_then(|scale| amount.checked_mul(Decimal::from(scale)))
        .filter(|scaled| scaled.fract().is_zero())
        .and_then(|scaled| scaled.to_i64())
        .ok_or_else(invalid)?;

    Ok((minor_units, currency))
}

/// Parse a discount rate (e.g., "10%" or "0.1") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "10%" for 10%
/// - Decimal format: "0.1" for 10%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or the rate is outside 0–100%.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    let value = if let Some(percent_str) = trimmed.strip_suffix('%') {
        percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
            / 100.0
    } else {
        trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?
    };

    if !(0.0..=1.0).contains(&value) {
        return Err(FixtureError::InvalidPercentage(s.to_string()));
    }

    Ok(Percentage::from(value))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use rusty_money::iso::{EUR, JPY, USD};

    use crate::products::ProductError;

    use super::*;

    #[test]
    fn parse_price_rejects_invalid_format() {
        let result = parse_price("2.99GBP");

        assert!(matches!(result, Err(FixtureError::InvalidPrice(_))));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(FixtureError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_accepts_usd_and_eur() -> Result<(), FixtureError> {
        let (usd_minor, usd) = parse_price("1200.00 USD")?;
        let (eur_minor, eur) = parse_price("2.50 EUR")?;

        assert_eq!(usd_minor, 120_000);
        assert_eq!(usd, USD);
        assert_eq!(eur_minor, 250);
        assert_eq!(eur, EUR);

        Ok(())
    }

    #[test]
    fn parse_price_scales_by_currency_exponent() -> Result<(), FixtureError> {
        let (yen, jpy) = parse_price("500 JPY")?;

        assert_eq!(yen, 500);
        assert_eq!(jpy, JPY);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_sub_minor_precision() {
        for price in ["1.999 USD", "12.5 JPY", "1.00 USD extra"] {
            assert!(
                matches!(parse_price(price), Err(FixtureError::InvalidPrice(_))),
                "{price} should be rejected"
            );
        }
    }

    #[test]
    fn parse_percentage_accepts_both_formats() -> Result<(), FixtureError> {
        assert_eq!(parse_percentage("10%")?, Percentage::from(0.1));
        assert_eq!(parse_percentage("  20% ")?, Percentage::from(0.2));
        assert_eq!(parse_percentage("0.15")?, Percentage::from(0.15));

        Ok(())
    }

    #[test]
    fn parse_percentage_rejects_out_of_range_rates() {
        for rate in ["150%", "-5%", "1.5", "invalid"] {
            assert!(
                matches!(parse_percentage(rate), Err(FixtureError::InvalidPercentage(_))),
                "{rate} should be rejected"
            );
        }
    }

    #[test]
    fn into_product_uses_key_as_id() -> TestResult {
        let fixture = ProductFixture {
            name: "MacBook Air".to_string(),
            price: "1200.00 USD".to_string(),
            category: Category::Electronics,
            description: String::new(),
        };

        let product = fixture.into_product("laptop".to_string())?;

        assert_eq!(product.id().as_str(), "laptop");
        assert_eq!(product.display_price(), "$1200.00");

        Ok(())
    }

    #[test]
    fn into_product_rejects_free_products() {
        let fixture = ProductFixture {
            name: "Sample".to_string(),
            price: "0.00 GBP".to_string(),
            category: Category::Food,
            description: String::new(),
        };

        assert!(matches!(
            fixture.into_product("sample".to_string()),
            Err(FixtureError::Product(ProductError::InvalidPrice(0)))
        ));
    }
}
