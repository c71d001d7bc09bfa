//! # Rebal Traits
//!
//! Trait definitions for the Rebal portfolio rebalancing calculator.
//!
//! This crate contains ONLY trait definitions and their error type.
//! Implementations live in extension crates such as `rebal-ext-file`.
//!
//! ## Module Structure
//!
//! - [`market_data`]: The [`MarketDataSource`] capability (price, FX, 52-week range, fundamentals)
//! - [`error`]: [`TraitError`] shared by every implementation
//!
//! ## Dependency Injection
//!
//! The pipeline receives the source explicitly:
//!
//! ```ignore
//! let report = run_pipeline(assets, &source, &config);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod market_data;

// Re-export commonly used types
pub use error::TraitError;
pub use market_data::{MarketDataSource, SourceType};
