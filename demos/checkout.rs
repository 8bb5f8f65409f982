//! Checkout Example
//!
//! Loads a checkout scenario, fills a cart from it, lets a second holder of the
//! same cart add a pair of headphones, places the order, empties the cart and
//! prints the order receipt.
//!
//! Use `-f` to load a fixture set by name
//! Use `-d` to apply a different discount code
//! Use `--log-format json` for JSON logs (`RUST_LOG` sets the filter)

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use trolley::{
    cart::SharedCart,
    fixtures::Fixture,
    pricing::display_amount,
    products::Product,
    utils::{ExampleCheckoutArgs, LogFormat},
};

/// Checkout Example
pub fn main() -> Result<()> {
    let args = ExampleCheckoutArgs::parse();

    init_logging(args.log_format);

    let fixture = Fixture::from_set(&args.fixture)?;
    let cart = fixture.cart()?;

    if let Some(code) = args.discount_code {
        cart.set_discount_code(code);
    }

    info!(
        items = cart.item_count(),
        subtotal = %display_amount(&cart.subtotal()?),
        total = %display_amount(&cart.total()?),
        "cart filled"
    );

    if let Ok(headphones) = fixture.product("headphones") {
        add_from_elsewhere(&cart, headphones)?;
    }

    let order = cart.checkout(fixture.shipping_address().clone())?;

    cart.clear();

    info!(
        cart_items = cart.item_count(),
        order_items = order.item_count(),
        "cart cleared after checkout"
    );

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    order.write_to(&mut handle)?;

    Ok(())
}

/// Another holder of the same cart adds a product.
fn add_from_elsewhere(
    cart: &SharedCart<'static>,
    product: &Product<'static>,
) -> Result<()> {
    let other = cart.clone();

    other.add_one(product)?;

    info!(
        product = product.name(),
        items = cart.item_count(),
        "added through another handle"
    );

    Ok(())
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Compact => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init(),
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_writer(io::stderr),
            )
            .init(),
    }
}
