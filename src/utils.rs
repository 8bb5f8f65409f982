//! Utils

use clap::{Parser, ValueEnum};

/// Log output format for the example programs
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human readable, one line per event
    #[default]
    Compact,

    /// One JSON object per event
    Json,
}

/// Arguments for the checkout example
#[derive(Debug, Parser)]
pub struct ExampleCheckoutArgs {
    /// Fixture scenario to load from `./fixtures`
    #[clap(short, long, default_value = "lab")]
    pub fixture: String,

    /// Discount code to apply instead of the scenario's own
    #[clap(short, long)]
    pub discount_code: Option<String>,

    /// Log output format (filter with `RUST_LOG`)
    #[clap(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
