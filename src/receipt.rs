//! Receipt
//!
//! Renders a placed [`Order`] as a table of lines followed by the totals and
//! the shipping address.

use std::io;

use tabled::{
    builder::Builder,
    settings::{
        Alignment, Color, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    items::CartItem,
    orders::Order,
    pricing::{PricingError, display_amount},
};

/// Errors that can occur when writing a receipt.
#[derive(Debug, Error)]
pub enum ReceiptError {
    /// A line total could not be calculated.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// IO error
    #[error("IO error")]
    IO,
}

impl Order<'_> {
    /// Writes the receipt for this order.
    ///
    /// # Errors
    ///
    /// Returns an error if a line total can't be calculated or writing fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ReceiptError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Item", "Category", "Unit Price", "Qty", "Line Total"]);

        for (idx, item) in self.items().iter().enumerate() {
            builder.push_record(item_row(idx, item)?);
        }

        let mut table = builder.build();

        table.with(Style::modern_rounded());
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(3..6), Alignment::right());

        writeln!(out, "\n{table}").map_err(|_err| ReceiptError::IO)?;

        write_summary(&mut out, self)
    }
}

fn item_row(idx: usize, item: &CartItem<'_>) -> Result<[String; 6], ReceiptError> {
    let product = item.product();

    Ok([
        format!("#{:<3}", idx + 1),
        product.name().to_string(),
        product.category().to_string(),
        product.display_price(),
        item.quantity().to_string(),
        display_amount(&item.subtotal()?),
    ])
}

fn write_summary(out: &mut impl io::Write, order: &Order<'_>) -> Result<(), ReceiptError> {
    let discount_label = match order.discount_code() {
        Some(code) => format!("Discount ({code}):"),
        None => "Discount:".to_string(),
    };

    let rows = [
        ("Subtotal:".to_string(), display_amount(&order.subtotal())),
        (discount_label, format!("-{}", display_amount(&order.discount_amount()))),
        (
            "\x1b[1mTotal:\x1b[0m".to_string(),
            format!("\x1b[1m{}\x1b[0m", display_amount(&order.total())),
        ),
    ];

    let label_width = rows
        .iter()
        .map(|(label, _)| visible_width(label))
        .max()
        .unwrap_or_default();

    for (label, value) in &rows {
        let padding = label_width.saturating_sub(visible_width(label));

        writeln!(out, " {label}{:padding$} {value}", "").map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, " Order:     {}", order.uuid()).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, " Placed:    {}", order.created_at()).map_err(|_err| ReceiptError::IO)?;
    writeln!(out, " Ship to:").map_err(|_err| ReceiptError::IO)?;

    for line in order.shipping_address().formatted().lines() {
        writeln!(out, "   {line}").map_err(|_err| ReceiptError::IO)?;
    }

    writeln!(out).map_err(|_err| ReceiptError::IO)
}

/// Width of `s` ignoring ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;

    for c in s.chars() {
        match (in_escape, c) {
            (false, '\x1b') => in_escape = true,
            (true, 'm') => in_escape = false,
            (true, _) => {}
            (false, _) => width += 1,
        }
    }

    width
}
