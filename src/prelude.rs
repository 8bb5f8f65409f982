//! Trolley prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    address::Address,
    cart::{CartError, CartTotals, SharedCart, ShoppingCart},
    discounts::{DiscountCodes, DiscountError, DiscountFn, DiscountPolicy, NoDiscounts},
    ids::{ProductId, TypedUuid},
    items::{CartItem, ItemError},
    orders::{Order, OrderError, OrderUuid},
    pricing::PricingError,
    products::{Category, Product, ProductError},
    receipt::ReceiptError,
};
