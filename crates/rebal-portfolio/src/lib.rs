//! # Rebal Portfolio
//!
//! Valuation, target allocation and drift signals for a personal portfolio.
//!
//! The crate turns a list of holdings into a rebalancing report. Every stage
//! is a plain function over `&mut [AssetRecord]`, so stages can be run and
//! tested on their own.
//!
//! ## Design Philosophy
//!
//! - **Explicit inputs**: configuration and market data source are passed in, never global
//! - **Undefined over wrong**: missing data leaves a field `None`; it is never zero-filled
//! - **Per-asset isolation**: a failed lookup degrades one field of one asset
//! - **Deterministic**: identical inputs give bit-identical reports
//!
//! ## Target Invariant
//!
//! When at least one investment asset is present, per-asset targets sum to 1.
//! The one exception is a portfolio with no reserve asset (cash, bond or
//! gold): targets then sum to `investment_fraction` and the allocation
//! carries an `UnallocatedReserve` warning. Check
//! [`TargetAllocation::is_clean`] before relying on the sum.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rebal_portfolio::prelude::*;
//!
//! let assets = vec![
//!     AssetRecord::new("S&P 500", "VOO", Currency::USD, AssetType::Core, dec!(12)),
//!     AssetRecord::new("Savings", "CASH", Currency::THB, AssetType::Cash, dec!(150_000)),
//! ];
//!
//! let config = PipelineConfig::default();
//! let report = run_pipeline(assets, &source, &config)?;
//! for row in report.by_type() {
//!     println!("{}: {:?} vs {:?}", row.asset_type, row.weight, row.target);
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`enrichment`] - Market data lookup with static fallback
//! - [`valuation`] - Local and base-currency value
//! - [`aggregation`] - Total, weights and summary rows
//! - [`allocation`] - Dynamic target allocation
//! - [`signals`] - Drift, price-level, yield and P/E classification
//! - [`pipeline`] - The full run and its report
//! - [`types`] - Asset record and configuration

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::module_name_repetitions)]

// Module declarations
pub mod aggregation;
pub mod allocation;
pub mod enrichment;
pub mod error;
pub mod pipeline;
pub mod signals;
pub mod types;
pub mod valuation;

// Re-export error types at crate root
pub use error::{AllocationError, PortfolioError, PortfolioResult};

// Re-export main types
pub use types::{AssetRecord, DriftThresholds, MarketInputs, PipelineConfig, RiskProfile};

// Re-export stage functions
pub use aggregation::{assign_weights, summarize_assets, summary_symbol, total_value};
pub use allocation::{
    allocate, assign_targets, compute_target_allocation, AllocationWarning, TargetAllocation,
    BASE_INVESTMENT_WEIGHTS,
};
pub use enrichment::{enrich_assets, EnrichmentReport};
pub use pipeline::{run_pipeline, PortfolioReport, TypeWeight};
pub use signals::{
    apply_drift, apply_pe_signals, apply_price_signals, apply_yield_signals, classify_drift,
    classify_pe, classify_yield, drift_outcome, pe_percentiles, price_level, required_yield,
    DriftOutcome, PriceLevel,
};
pub use valuation::{position_value, value_assets};

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use rebal_portfolio::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{AllocationError, PortfolioError, PortfolioResult};

    // Types
    pub use crate::types::{AssetRecord, DriftThresholds, MarketInputs, PipelineConfig, RiskProfile};

    // Pipeline
    pub use crate::allocation::{AllocationWarning, TargetAllocation};
    pub use crate::enrichment::EnrichmentReport;
    pub use crate::pipeline::{run_pipeline, PortfolioReport, TypeWeight};

    // Signals
    pub use crate::signals::{classify_drift, pe_percentiles};

    // Re-export commonly used types from dependencies
    pub use rebal_core::types::{
        AssetType, Currency, PeSignal, PositionSignal, PriceSignal, YieldSignal,
    };
    pub use rebal_traits::{MarketDataSource, SourceType, TraitError};
    pub use rust_decimal::Decimal;
    pub use rust_decimal_macros::dec;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crate_compiles() {
        // Basic smoke test
        let err = PortfolioError::from(AllocationError::NoInvestmentAssets);
        assert!(err.to_string().contains("No investment assets"));
    }
}
