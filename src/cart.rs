//! Shopping cart
//!
//! [`ShoppingCart`] is the aggregate itself: an ordered list of [`CartItem`]s
//! with at most one line per product, plus an optional discount code.
//! [`SharedCart`] is the handle callers pass around; every clone of a handle
//! refers to the same cart, so a change made through one is seen by all.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use decimal_percentage::Percentage;
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;
use tracing::debug;

use crate::{
    address::Address,
    discounts::{DiscountCodes, DiscountError, DiscountPolicy, discount_on},
    ids::ProductId,
    items::{CartItem, ItemError},
    orders::{Order, OrderError},
    pricing::{PricingError, total_price},
    products::Product,
};

/// Errors raised by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// An item could not be created or changed.
    #[error(transparent)]
    Item(#[from] ItemError),

    /// The product is priced in a different currency to the cart.
    #[error("product {product} has currency {item}, but cart has currency {cart}")]
    CurrencyMismatch {
        /// Offending product
        product: ProductId,
        /// Currency of the product price
        item: &'static str,
        /// Currency of the cart
        cart: &'static str,
    },

    /// Error calculating the subtotal.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Error calculating the discount.
    #[error(transparent)]
    Discount(#[from] DiscountError),

    /// Wrapped money arithmetic error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Subtotal, discount and total calculated together from one cart state.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CartTotals<'a> {
    /// Sum of every line total
    pub subtotal: Money<'a, Currency>,

    /// Amount taken off by the discount code, zero without one
    pub discount: Money<'a, Currency>,

    /// Subtotal minus discount
    pub total: Money<'a, Currency>,
}

/// Cart
#[derive(Debug)]
pub struct ShoppingCart<'a> {
    items: Vec<CartItem<'a>>,
    discount_code: Option<String>,
    discount_policy: Arc<dyn DiscountPolicy + 'a>,
    currency: &'static Currency,
}

impl<'a> ShoppingCart<'a> {
    /// Create an empty cart that recognises the standard discount codes.
    pub fn new(currency: &'static Currency) -> Self {
        Self::with_policy(currency, DiscountCodes::standard())
    }

    /// Create an empty cart that resolves discount codes with `policy`.
    pub fn with_policy(currency: &'static Currency, policy: impl DiscountPolicy + 'a) -> Self {
        Self {
            items: Vec::new(),
            discount_code: None,
            discount_policy: Arc::new(policy),
            currency,
        }
    }

    /// Replace the discount policy. The discount code is kept.
    pub fn set_discount_policy(&mut self, policy: impl DiscountPolicy + 'a) {
        self.discount_policy = Arc::new(policy);
    }

    /// Add `quantity` of `product`.
    ///
    /// If the product is already in the cart its quantity is increased,
    /// otherwise a new line is appended after the existing ones.
    ///
    /// # Errors
    ///
    /// - [`CartError::Item`]: `quantity` is zero, or the increase overflows.
    /// - [`CartError::CurrencyMismatch`]: the product isn't priced in the cart currency.
    pub fn add_item(&mut self, product: &Product<'a>, quantity: u32) -> Result<(), CartError> {
        let item_currency = product.price().currency();
        if item_currency != self.currency {
            return Err(CartError::CurrencyMismatch {
                product: product.id().clone(),
                item: item_currency.iso_alpha_code,
                cart: self.currency.iso_alpha_code,
            });
        }

        if quantity == 0 {
            return Err(ItemError::InvalidQuantity(quantity).into());
        }

        if let Some(existing) = self
            .items
            .iter_mut()
            .find(|item| item.product_id() == product.id())
        {
            existing.increase_by(quantity)?;

            debug!(
                product_id = %product.id(),
                quantity,
                line_quantity = existing.quantity(),
                "increased cart line"
            );
        } else {
            self.items.push(CartItem::new(product.clone(), quantity)?);

            debug!(product_id = %product.id(), quantity, "added cart line");
        }

        Ok(())
    }

    /// Add a single unit of `product`.
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::add_item`].
    pub fn add_one(&mut self, product: &Product<'a>) -> Result<(), CartError> {
        self.add_item(product, 1)
    }

    /// Remove the line for `product_id`, returning it. Unknown ids are ignored.
    pub fn remove_item(&mut self, product_id: &ProductId) -> Option<CartItem<'a>> {
        let idx = self
            .items
            .iter()
            .position(|item| item.product_id() == product_id)?;

        let removed = self.items.remove(idx);

        debug!(%product_id, quantity = removed.quantity(), "removed cart line");

        Some(removed)
    }

    /// Set the quantity of the line for `product_id`.
    ///
    /// Zero removes the line. Unknown ids are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Item`] if the line rejects the new quantity.
    pub fn update_item_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            self.remove_item(product_id);
            return Ok(());
        }

        if let Some(item) = self
            .items
            .iter_mut()
            .find(|item| item.product_id() == product_id)
        {
            item.set_quantity(quantity)?;

            debug!(%product_id, quantity, "updated cart line quantity");
        }

        Ok(())
    }

    /// Remove every line.
    ///
    /// The discount code is left as it is; use
    /// [`ShoppingCart::clear_discount_code`] to drop it too.
    pub fn clear(&mut self) {
        self.items.clear();

        debug!("cleared cart");
    }

    /// Set the discount code. Unrecognised codes are stored but discount nothing.
    pub fn set_discount_code(&mut self, code: impl Into<String>) {
        let code = code.into();

        debug!(
            %code,
            recognised = self.discount_policy.rate(&code).is_some(),
            "set discount code"
        );

        self.discount_code = Some(code);
    }

    /// Remove the discount code, returning it.
    pub fn clear_discount_code(&mut self) -> Option<String> {
        self.discount_code.take()
    }

    /// Returns the discount code, if one is set.
    pub fn discount_code(&self) -> Option<&str> {
        self.discount_code.as_deref()
    }

    /// Rate of the current discount code, `None` without a recognised code.
    pub fn discount_rate(&self) -> Option<Percentage> {
        self.discount_code
            .as_deref()
            .and_then(|code| self.discount_policy.rate(code))
    }

    /// Calculate the subtotal of the cart.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Pricing`] if a line total overflows.
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(total_price(&self.items, self.currency)?)
    }

    /// Calculate the amount taken off by the discount code.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtotal or the discount can't be calculated.
    pub fn discount_amount(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.totals()?.discount)
    }

    /// Calculate the total after discount.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtotal or the discount can't be calculated.
    pub fn total(&self) -> Result<Money<'a, Currency>, CartError> {
        Ok(self.totals()?.total)
    }

    /// Calculate subtotal, discount and total in one pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the subtotal or the discount can't be calculated.
    pub fn totals(&self) -> Result<CartTotals<'a>, CartError> {
        let subtotal = self.subtotal()?;

        let discount = match self.discount_rate() {
            Some(rate) => discount_on(&subtotal, &rate)?,
            None => Money::from_minor(0, self.currency),
        };

        let total = subtotal.sub(discount)?;

        Ok(CartTotals {
            subtotal,
            discount,
            total,
        })
    }

    /// Total number of units across every line.
    pub fn item_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.quantity()))
            .sum()
    }

    /// Get the number of distinct lines in the cart.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Lines in the order their products were first added.
    pub fn items(&self) -> &[CartItem<'a>] {
        &self.items
    }

    /// Get the line for `product_id`.
    pub fn get(&self, product_id: &ProductId) -> Option<&CartItem<'a>> {
        self.items
            .iter()
            .find(|item| item.product_id() == product_id)
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }
}

/// Shared handle to a [`ShoppingCart`].
///
/// Cloning the handle does not copy the cart. All access goes through one
/// lock per cart, so each operation sees and leaves a consistent cart.
#[derive(Debug, Clone)]
pub struct SharedCart<'a> {
    inner: Arc<Mutex<ShoppingCart<'a>>>,
}

impl<'a> From<ShoppingCart<'a>> for SharedCart<'a> {
    fn from(cart: ShoppingCart<'a>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(cart)),
        }
    }
}

impl<'a> SharedCart<'a> {
    /// Create an empty cart that recognises the standard discount codes.
    pub fn new(currency: &'static Currency) -> Self {
        Self::from(ShoppingCart::new(currency))
    }

    /// Create an empty cart that resolves discount codes with `policy`.
    pub fn with_policy(currency: &'static Currency, policy: impl DiscountPolicy + 'a) -> Self {
        Self::from(ShoppingCart::with_policy(currency, policy))
    }

    // No operation leaves the cart half-changed, so a poisoned lock still
    // guards a valid cart.
    fn lock(&self) -> MutexGuard<'_, ShoppingCart<'a>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the cart while holding the lock.
    pub fn read<R>(&self, f: impl FnOnce(&ShoppingCart<'a>) -> R) -> R {
        let cart = self.lock();

        f(&cart)
    }

    /// Run `f` against the cart mutably while holding the lock.
    pub fn update<R>(&self, f: impl FnOnce(&mut ShoppingCart<'a>) -> R) -> R {
        let mut cart = self.lock();

        f(&mut cart)
    }

    /// See [`ShoppingCart::add_item`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::add_item`].
    pub fn add_item(&self, product: &Product<'a>, quantity: u32) -> Result<(), CartError> {
        self.update(|cart| cart.add_item(product, quantity))
    }

    /// See [`ShoppingCart::add_one`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::add_item`].
    pub fn add_one(&self, product: &Product<'a>) -> Result<(), CartError> {
        self.update(|cart| cart.add_one(product))
    }

    /// See [`ShoppingCart::remove_item`].
    pub fn remove_item(&self, product_id: &ProductId) -> Option<CartItem<'a>> {
        self.update(|cart| cart.remove_item(product_id))
    }

    /// See [`ShoppingCart::update_item_quantity`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::update_item_quantity`].
    pub fn update_item_quantity(
        &self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), CartError> {
        self.update(|cart| cart.update_item_quantity(product_id, quantity))
    }

    /// See [`ShoppingCart::clear`].
    pub fn clear(&self) {
        self.update(ShoppingCart::clear);
    }

    /// See [`ShoppingCart::set_discount_code`].
    pub fn set_discount_code(&self, code: impl Into<String>) {
        self.update(|cart| cart.set_discount_code(code));
    }

    /// See [`ShoppingCart::clear_discount_code`].
    pub fn clear_discount_code(&self) -> Option<String> {
        self.update(ShoppingCart::clear_discount_code)
    }

    /// Returns a copy of the discount code, if one is set.
    pub fn discount_code(&self) -> Option<String> {
        self.read(|cart| cart.discount_code().map(str::to_string))
    }

    /// See [`ShoppingCart::subtotal`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::subtotal`].
    pub fn subtotal(&self) -> Result<Money<'a, Currency>, CartError> {
        self.read(ShoppingCart::subtotal)
    }

    /// See [`ShoppingCart::discount_amount`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::discount_amount`].
    pub fn discount_amount(&self) -> Result<Money<'a, Currency>, CartError> {
        self.read(ShoppingCart::discount_amount)
    }

    /// See [`ShoppingCart::total`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::total`].
    pub fn total(&self) -> Result<Money<'a, Currency>, CartError> {
        self.read(ShoppingCart::total)
    }

    /// See [`ShoppingCart::totals`].
    ///
    /// # Errors
    ///
    /// See [`ShoppingCart::totals`].
    pub fn totals(&self) -> Result<CartTotals<'a>, CartError> {
        self.read(ShoppingCart::totals)
    }

    /// See [`ShoppingCart::item_count`].
    pub fn item_count(&self) -> u64 {
        self.read(ShoppingCart::item_count)
    }

    /// See [`ShoppingCart::len`].
    pub fn len(&self) -> usize {
        self.read(ShoppingCart::len)
    }

    /// See [`ShoppingCart::is_empty`].
    pub fn is_empty(&self) -> bool {
        self.read(ShoppingCart::is_empty)
    }

    /// Copy of the current lines.
    pub fn items(&self) -> Vec<CartItem<'a>> {
        self.read(|cart| cart.items().to_vec())
    }

    /// Copy of the line for `product_id`.
    pub fn get(&self, product_id: &ProductId) -> Option<CartItem<'a>> {
        self.read(|cart| cart.get(product_id).cloned())
    }

    /// Get the currency of the cart.
    pub fn currency(&self) -> &'static Currency {
        self.read(ShoppingCart::currency)
    }

    /// Place an order from the cart as it is now.
    ///
    /// # Errors
    ///
    /// See [`Order::from_cart`].
    pub fn checkout(&self, shipping_address: Address) -> Result<Order<'a>, OrderError> {
        Order::from_shared_cart(self, shipping_address)
    }

    /// Check if both handles refer to the same cart.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}
