//! # Rebal Ext File
//!
//! File-based inputs for the Rebal calculator.
//!
//! This crate provides default implementations for offline use and tests:
//! - CSV asset list loader (the spreadsheet export)
//! - CSV quote and FX snapshot as a [`MarketDataSource`](rebal_traits::MarketDataSource)
//! - An empty source that always reports itself unavailable
//!
//! Live web quotes belong in a separate extension.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod assets;
mod market_data;
mod parse;

pub use assets::*;
pub use market_data::*;

use std::path::Path;

use rebal_traits::error::TraitError;

/// Create a file-based market data source from a quotes CSV and an optional FX CSV.
pub fn create_file_market_data(
    quotes_csv: impl AsRef<Path>,
    fx_csv: Option<&Path>,
) -> Result<CsvMarketDataSource, TraitError> {
    let mut source = CsvMarketDataSource::new(quotes_csv)?;
    if let Some(path) = fx_csv {
        source.load_fx_file(path)?;
    }
    Ok(source)
}
