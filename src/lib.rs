//! Trolley
//!
//! Trolley models a shopping cart and its checkout: products go into a cart
//! shared by everyone holding a handle to it, a discount code is resolved by a
//! pluggable policy, and checkout freezes the cart into an immutable order.

pub mod address;
pub mod cart;
pub mod discounts;
pub mod fixtures;
pub mod ids;
pub mod items;
pub mod orders;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod receipt;
pub mod utils;
