//! Orders

use jiff::Timestamp;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::info;

use crate::{
    address::Address,
    cart::{CartError, SharedCart, ShoppingCart},
    ids::TypedUuid,
    items::CartItem,
    pricing::display_amount,
};

/// Order UUID
pub type OrderUuid = TypedUuid<Order<'static>>;

/// Errors raised while placing an order.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The cart totals could not be calculated.
    #[error(transparent)]
    Cart(#[from] CartError),
}

/// A placed order.
///
/// Holds its own copy of the cart lines and of the totals as they were at
/// checkout; later changes to the cart don't reach it.
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    uuid: OrderUuid,
    items: Vec<CartItem<'a>>,
    subtotal: Money<'a, Currency>,
    discount_amount: Money<'a, Currency>,
    total: Money<'a, Currency>,
    discount_code: Option<String>,
    created_at: Timestamp,
    shipping_address: Address,
    currency: &'static Currency,
}

impl<'a> Order<'a> {
    /// Place an order from the cart as it is now.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Cart`] if the cart totals can't be calculated.
    #[tracing::instrument(
        name = "orders.from_cart",
        skip_all,
        fields(lines = cart.len(), discount_code = cart.discount_code())
    )]
    pub fn from_cart(
        cart: &ShoppingCart<'a>,
        shipping_address: Address,
    ) -> Result<Self, OrderError> {
        let totals = cart.totals()?;

        let order = Self {
            uuid: OrderUuid::generate(),
            items: cart.items().to_vec(),
            subtotal: totals.subtotal,
            discount_amount: totals.discount,
            total: totals.total,
            discount_code: cart.discount_code().map(str::to_string),
            created_at: Timestamp::now(),
            shipping_address,
            currency: cart.currency(),
        };

        info!(
            order_uuid = %order.uuid,
            item_count = order.item_count(),
            total = %display_amount(&order.total),
            "created order"
        );

        Ok(order)
    }

    /// Place an order from a shared cart.
    ///
    /// The cart stays locked while the snapshot is taken, so concurrent
    /// changes land either wholly before or wholly after it.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::Cart`] if the cart totals can't be calculated.
    pub fn from_shared_cart(
        cart: &SharedCart<'a>,
        shipping_address: Address,
    ) -> Result<Self, OrderError> {
        cart.read(|cart| Self::from_cart(cart, shipping_address))
    }

    /// Returns the order UUID
    pub fn uuid(&self) -> OrderUuid {
        self.uuid
    }

    /// Lines as they were at checkout
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Total cost before the discount
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Amount taken off by the discount code
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Total amount to pay
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Discount code in effect at checkout
    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    /// When the order was placed
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Where the order ships to
    pub fn shipping_address(&self) -> &Address {
        &self.shipping_address
    }

    /// Currency used for all monetary values
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Total number of units across every line.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the order has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
