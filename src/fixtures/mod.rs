//! Fixtures
//!
//! Checkout scenarios described in YAML: a product catalog, the discount code
//! table, the lines to put in the cart, the code to apply and where to ship.
//!
//! ```yaml
//! discount_codes:
//!   SAVE10: "10%"
//! products:
//!   laptop:
//!     name: MacBook Air
//!     price: "1200.00 USD"
//!     category: electronics
//! cart:
//!   - product: laptop
//!     quantity: 2
//! discount_code: SAVE10
//! shipping_address:
//!   street: Main Street 10
//!   city: Almaty
//!   zip_code: "050000"
//!   country: Kazakhstan
//! ```
//!
//! Without a `discount_codes` table the standard codes are used.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    address::Address,
    cart::{CartError, SharedCart},
    discounts::DiscountCodes,
    fixtures::products::{ProductFixture, parse_percentage},
    products::{Product, ProductError},
};

pub mod products;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format or out of range rate
    #[error("Invalid percentage: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products defined
    #[error("No products defined; currency unknown")]
    NoCurrency,

    /// Product construction error
    #[error(transparent)]
    Product(#[from] ProductError),

    /// Cart construction error
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// Cart line in a scenario
#[derive(Debug, Clone, Deserialize)]
pub struct CartLineFixture {
    /// Key of the product in the `products` map
    pub product: String,

    /// Quantity to add
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Wrapper for a scenario in YAML
#[derive(Debug, Deserialize)]
pub struct ScenarioFixture {
    /// Map of code -> rate (e.g., "10%")
    #[serde(default)]
    pub discount_codes: Option<FxHashMap<String, String>>,

    /// Map of product key -> product fixture
    pub products: FxHashMap<String, ProductFixture>,

    /// Lines to add, in order
    #[serde(default)]
    pub cart: Vec<CartLineFixture>,

    /// Discount code to apply
    #[serde(default)]
    pub discount_code: Option<String>,

    /// Shipping address
    pub shipping_address: Address,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture {
    products: FxHashMap<String, Product<'static>>,
    lines: Vec<CartLineFixture>,
    discount_codes: DiscountCodes,
    discount_code: Option<String>,
    shipping_address: Address,
    currency: &'static Currency,
}

impl Fixture {
    /// Load a named scenario from `./fixtures/<name>.yml`
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the scenario is invalid.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(PathBuf::from("./fixtures").join(format!("{name}.yml")))
    }

    /// Load a scenario from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the scenario is invalid.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let contents = fs::read_to_string(path)?;

        Self::parse(&contents)
    }

    /// Parse a scenario from YAML
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed, a price or rate is invalid,
    /// products use different currencies, or a cart line names an unknown product.
    pub fn parse(yaml: &str) -> Result<Self, FixtureError> {
        let scenario: ScenarioFixture = serde_norway::from_str(yaml)?;

        let mut currency: Option<&'static Currency> = None;
        let mut products = FxHashMap::default();

        for (key, product_fixture) in scenario.products {
            let product = product_fixture.into_product(key.clone())?;
            let product_currency = product.price().currency();

            match currency {
                Some(existing) if existing != product_currency => {
                    return Err(FixtureError::CurrencyMismatch(
                        existing.iso_alpha_code.to_string(),
                        product_currency.iso_alpha_code.to_string(),
                    ));
                }
                Some(_) => {}
                None => currency = Some(product_currency),
            }

            products.insert(key, product);
        }

        let currency = currency.ok_or(FixtureError::NoCurrency)?;

        if let Some(line) = scenario
            .cart
            .iter()
            .find(|line| !products.contains_key(&line.product))
        {
            return Err(FixtureError::ProductNotFound(line.product.clone()));
        }

        let discount_codes = match scenario.discount_codes {
            Some(codes) => {
                let mut table = DiscountCodes::new();

                for (code, rate) in codes {
                    table.insert(code, parse_percentage(&rate)?);
                }

                table
            }
            None => DiscountCodes::standard(),
        };

        Ok(Self {
            products,
            lines: scenario.cart,
            discount_codes,
            discount_code: scenario.discount_code,
            shipping_address: scenario.shipping_address,
            currency,
        })
    }

    /// Get a product by its fixture key
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError::ProductNotFound`] if there is no such product.
    pub fn product(&self, key: &str) -> Result<&Product<'static>, FixtureError> {
        self.products
            .get(key)
            .ok_or_else(|| FixtureError::ProductNotFound(key.to_string()))
    }

    /// Every product in the catalog, in no particular order
    pub fn products(&self) -> impl Iterator<Item = &Product<'static>> {
        self.products.values()
    }

    /// Discount code table
    pub fn discount_codes(&self) -> &DiscountCodes {
        &self.discount_codes
    }

    /// Discount code the scenario applies
    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    /// Shipping address
    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    /// Currency shared by every product
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Build a cart holding the scenario's lines and discount code.
    ///
    /// # Errors
    ///
    /// Returns an error if a line can't be added to the cart.
    pub fn cart(&self) -> Result<SharedCart<'static>, FixtureError> {
        let cart = SharedCart::with_policy(self.currency, self.discount_codes.clone());

        for line in &self.lines {
            cart.add_item(self.product(&line.product)?, line.quantity)?;
        }

        if let Some(code) = &self.discount_code {
            cart.set_discount_code(code.as_str());
        }

        Ok(cart)
    }
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::discounts::DiscountPolicy;

    use super::*;

    const SCENARIO: &str = r#"
discount_codes:
  HALF: "50%"
products:
  laptop:
    name: MacBook Air
    price: "1200.00 USD"
    category: electronics
    description: Apple laptop
  book:
    name: Swift Programming
    price: "45.00 USD"
    category: books
cart:
  - product: laptop
  - product: book
    quantity: 2
discount_code: HALF
shipping_address:
  street: Main Street 10
  city: Almaty
  zip_code: "050000"
  country: Kazakhstan
"#;

    #[test]
    fn parse_builds_catalog_and_cart() -> TestResult {
        let fixture = Fixture::parse(SCENARIO)?;
        let cart = fixture.cart()?;

        assert_eq!(fixture.currency(), USD);
        assert_eq!(fixture.products().count(), 2);
        assert_eq!(fixture.product("book")?.name(), "Swift Programming");
        assert_eq!(fixture.discount_codes().rate("HALF"), Some(Percentage::from(0.5)));
        assert_eq!(fixture.discount_codes().rate("SAVE10"), None);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(cart.subtotal()?, Money::from_minor(129_000, USD));
        assert_eq!(cart.total()?, Money::from_minor(64_500, USD));
        assert_eq!(fixture.shipping_address().city(), "Almaty");

        Ok(())
    }

    #[test]
    fn missing_code_table_falls_back_to_standard_codes() -> TestResult {
        let yaml = SCENARIO
            .replace("discount_codes:\n  HALF: \"50%\"\n", "")
            .replace("discount_code: HALF", "discount_code: SAVE20");

        let fixture = Fixture::parse(&yaml)?;

        assert_eq!(fixture.discount_code(), Some("SAVE20"));
        assert_eq!(fixture.cart()?.total()?, Money::from_minor(103_200, USD));

        Ok(())
    }

    #[test]
    fn unknown_cart_product_is_rejected() {
        let yaml = SCENARIO.replace("- product: book", "- product: tablet");

        assert!(matches!(
            Fixture::parse(&yaml),
            Err(FixtureError::ProductNotFound(key)) if key == "tablet"
        ));
    }

    #[test]
    fn mixed_currencies_are_rejected() {
        let yaml = SCENARIO.replace("\"45.00 USD\"", "\"45.00 GBP\"");

        assert!(matches!(
            Fixture::parse(&yaml),
            Err(FixtureError::CurrencyMismatch(_, _))
        ));
    }

    #[test]
    fn out_of_range_rate_is_rejected() {
        let yaml = SCENARIO.replace("\"50%\"", "\"150%\"");

        assert!(matches!(
            Fixture::parse(&yaml),
            Err(FixtureError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn empty_catalog_has_no_currency() {
        let yaml = r#"
products: {}
shipping_address:
  street: Main Street 10
  city: Almaty
  zip_code: "050000"
  country: Kazakhstan
"#;

        assert!(matches!(Fixture::parse(yaml), Err(FixtureError::NoCurrency)));
    }
}
