//! Domain types for the rebalancing pipeline.
//!
//! This module provides type-safe representations of pipeline concepts:
//!
//! - [`AssetRecord`]: A single holding plus everything derived for it
//! - [`MarketInputs`]: Price, FX and fundamentals, static or live
//! - [`RiskProfile`]: Investment fraction, drawdown assumptions, gold share
//! - [`DriftThresholds`]: Absolute and relative drift limits
//! - [`PipelineConfig`]: Configuration for one run

mod asset;
mod config;

// Re-export all types
pub use asset::{default_uses_external_price, AssetRecord, MarketInputs};
pub use config::{DriftThresholds, PipelineConfig, RiskProfile};
