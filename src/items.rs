//! Items

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{
    ids::ProductId,
    pricing::{PricingError, line_total},
    products::Product,
};

/// Errors raised when constructing or changing a cart item.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ItemError {
    /// Quantities must be at least one.
    #[error("quantity must be greater than zero, got {0}")]
    InvalidQuantity(u32),

    /// Increasing the quantity would overflow.
    #[error("quantity {current} cannot be increased by {amount}")]
    QuantityOverflow {
        /// Quantity before the increase
        current: u32,
        /// Requested increase
        amount: u32,
    },
}

/// A product and the quantity of it being bought.
///
/// `CartItem` is a plain value: cloning it produces an independent item, so
/// changing the clone's quantity never touches the original.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem<'a> {
    product: Product<'a>,
    quantity: u32,
}

impl<'a> CartItem<'a> {
    /// Creates a new item.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::InvalidQuantity`] if `quantity` is zero.
    pub fn new(product: Product<'a>, quantity: u32) -> Result<Self, ItemError> {
        if quantity == 0 {
            return Err(ItemError::InvalidQuantity(quantity));
        }

        Ok(Self { product, quantity })
    }

    /// Returns the product of the item
    pub fn product(&self) -> &Product<'a> {
        &self.product
    }

    /// Returns the id of the item's product
    pub fn product_id(&self) -> &ProductId {
        self.product.id()
    }

    /// Returns the quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Replace the quantity.
    ///
    /// Zero is rejected and the item is left unchanged; removing a line is
    /// the cart's job.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::InvalidQuantity`] if `quantity` is zero.
    pub fn set_quantity(&mut self, quantity: u32) -> Result<(), ItemError> {
        if quantity == 0 {
            return Err(ItemError::InvalidQuantity(quantity));
        }

        self.quantity = quantity;

        Ok(())
    }

    /// Increase the quantity by `amount`. Zero is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ItemError::QuantityOverflow`] if the new quantity would not
    /// fit; the item is left unchanged.
    pub fn increase_by(&mut self, amount: u32) -> Result<(), ItemError> {
        self.quantity = self
            .quantity
            .checked_add(amount)
            .ok_or(ItemError::QuantityOverflow {
                current: self.quantity,
                amount,
            })?;

        Ok(())
    }

    /// Price of the product multiplied by the quantity.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line total doesn't fit in minor units.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, PricingError> {
        line_total(self.product.price(), self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::products::Category;

    use super::*;

    fn laptop<'a>() -> Result<Product<'a>, crate::products::ProductError> {
        Product::with_id(
            "laptop",
            "MacBook Air",
            Money::from_minor(120_000, USD),
            Category::Electronics,
            "Apple laptop",
        )
    }

    #[test]
    fn zero_quantity_is_rejected_at_construction() -> TestResult {
        let result = CartItem::new(laptop()?, 0);

        assert_eq!(result, Err(ItemError::InvalidQuantity(0)));

        Ok(())
    }

    #[test]
    fn set_quantity_replaces_quantity() -> TestResult {
        let mut item = CartItem::new(laptop()?, 1)?;

        item.set_quantity(5)?;

        assert_eq!(item.quantity(), 5);

        Ok(())
    }

    #[test]
    fn set_quantity_zero_leaves_item_unchanged() -> TestResult {
        let mut item = CartItem::new(laptop()?, 3)?;

        assert_eq!(item.set_quantity(0), Err(ItemError::InvalidQuantity(0)));
        assert_eq!(item.quantity(), 3);

        Ok(())
    }

    #[test]
    fn increase_by_adds_to_quantity() -> TestResult {
        let mut item = CartItem::new(laptop()?, 1)?;

        item.increase_by(2)?;

        assert_eq!(item.quantity(), 3);

        Ok(())
    }

    #[test]
    fn increase_by_zero_is_a_no_op() -> TestResult {
        let mut item = CartItem::new(laptop()?, 4)?;

        item.increase_by(0)?;

        assert_eq!(item.quantity(), 4);

        Ok(())
    }

    #[test]
    fn increase_by_overflow_leaves_item_unchanged() -> TestResult {
        let mut item = CartItem::new(laptop()?, u32::MAX)?;

        assert_eq!(
            item.increase_by(1),
            Err(ItemError::QuantityOverflow {
                current: u32::MAX,
                amount: 1
            })
        );
        assert_eq!(item.quantity(), u32::MAX);

        Ok(())
    }

    #[test]
    fn subtotal_is_price_times_quantity() -> TestResult {
        let item = CartItem::new(laptop()?, 2)?;

        assert_eq!(item.subtotal()?, Money::from_minor(240_000, USD));

        Ok(())
    }

    #[test]
    fn mutating_a_copy_leaves_the_original_alone() -> TestResult {
        let original = CartItem::new(laptop()?, 1)?;
        let mut copy = original.clone();

        copy.set_quantity(5)?;

        assert_eq!(original.quantity(), 1);
        assert_eq!(copy.quantity(), 5);
        assert_eq!(copy.product_id(), original.product_id());

        Ok(())
    }
}
