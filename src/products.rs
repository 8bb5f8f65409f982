//! Products

use std::fmt;

use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{ids::ProductId, pricing::display_amount};

/// Errors raised while constructing a product.
#[derive(Debug, Error, PartialEq)]
pub enum ProductError {
    /// The price was zero or negative (price in minor units).
    #[error("product price must be positive, got {0} minor units")]
    InvalidPrice(i64),

    /// The name was empty or only whitespace.
    #[error("product name must not be empty")]
    EmptyName,
}

/// Product category
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Electronics
    Electronics,

    /// Clothing
    Clothing,

    /// Food
    Food,

    /// Books
    Books,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Category::Electronics => "electronics",
            Category::Clothing => "clothing",
            Category::Food => "food",
            Category::Books => "books",
        })
    }
}

/// Immutable catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    id: ProductId,
    name: String,
    price: Money<'a, Currency>,
    category: Category,
    description: String,
}

impl<'a> Product<'a> {
    /// Create a product with a freshly generated id.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidPrice`]: `price` is zero or negative.
    /// - [`ProductError::EmptyName`]: `name` is blank.
    pub fn new(
        name: impl Into<String>,
        price: Money<'a, Currency>,
        category: Category,
        description: impl Into<String>,
    ) -> Result<Self, ProductError> {
        Self::with_id(ProductId::generate(), name, price, category, description)
    }

    /// Create a product with the given id.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidPrice`]: `price` is zero or negative.
    /// - [`ProductError::EmptyName`]: `name` is blank.
    pub fn with_id(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money<'a, Currency>,
        category: Category,
        description: impl Into<String>,
    ) -> Result<Self, ProductError> {
        let minor = price.to_minor_units();
        if minor <= 0 {
            return Err(ProductError::InvalidPrice(minor));
        }

        let name = name.into();
        if name.trim().is_empty() {
            return Err(ProductError::EmptyName);
        }

        Ok(Self {
            id: id.into(),
            name,
            price,
            category,
            description: description.into(),
        })
    }

    /// Returns the product id
    pub fn id(&self) -> &ProductId {
        &self.id
    }

    /// Returns the product name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the product price
    pub fn price(&self) -> &Money<'a, Currency> {
        &self.price
    }

    /// Returns the product category
    pub fn category(&self) -> Category {
        self.category
    }

    /// Returns the product description, which may be empty
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Price with a leading currency symbol and exactly two decimals, e.g. `$1200.00`.
    pub fn display_price(&self) -> String {
        display_amount(&self.price)
    }
}
