//! Domain types for portfolio rebalancing.
//!
//! This module provides type-safe representations of rebalancing concepts:
//!
//! - [`AssetType`]: Closed set of holding categories (Core, Growth, ...)
//! - [`Bucket`]: Investment vs reserve grouping of asset types
//! - [`Currency`]: ISO currency codes
//! - [`PositionSignal`], [`PriceSignal`], [`YieldSignal`], [`PeSignal`]: classification outputs

mod asset_type;
mod currency;
mod signal;

pub use asset_type::{AssetType, Bucket};
pub use currency::Currency;
pub use signal::{PeSignal, PositionSignal, PriceSignal, YieldSignal};
