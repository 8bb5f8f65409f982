//! Shipping addresses

use std::fmt;

use serde::Deserialize;

/// Shipping address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct Address {
    street: String,
    city: String,
    zip_code: String,
    country: String,
}

impl Address {
    /// Create a new address.
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        zip_code: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            zip_code: zip_code.into(),
            country: country.into(),
        }
    }

    /// Street line
    pub fn street(&self) -> &str {
        &self.street
    }

    /// City
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Postal code
    pub fn zip_code(&self) -> &str {
        &self.zip_code
    }

    /// Country
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Multi-line label: street, then `city, zip`, then country.
    pub fn formatted(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{}, {}\n{}",
            self.street, self.city, self.zip_code, self.country
        )
    }
}
