//! # Rebal Core
//!
//! Core types and error definitions for the Rebal portfolio rebalancing calculator.
//!
//! This crate provides the vocabulary shared by every other Rebal crate:
//!
//! - **Types**: [`AssetType`], [`Bucket`], [`Currency`]
//! - **Signals**: [`PositionSignal`], [`PriceSignal`], [`YieldSignal`], [`PeSignal`]
//! - **Errors**: [`RebalError`] and the [`RebalResult`] alias
//!
//! ## Example
//!
//! ```rust
//! use rebal_core::prelude::*;
//!
//! let kind: AssetType = "growth".parse().unwrap();
//! assert_eq!(kind, AssetType::Growth);
//! assert_eq!(kind.bucket(), Some(Bucket::Investment));
//!
//! let thb = Currency::from_code("thb").unwrap();
//! assert_eq!(thb, Currency::THB);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{RebalError, RebalResult};
    pub use crate::types::{
        AssetType, Bucket, Currency, PeSignal, PositionSignal, PriceSignal, YieldSignal,
    };
}

// Re-export commonly used types at crate root
pub use error::{RebalError, RebalResult};
pub use types::{AssetType, Bucket, Currency, PeSignal, PositionSignal, PriceSignal, YieldSignal};
