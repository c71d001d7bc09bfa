//! Error types for the rebalancing pipeline.
//!
//! This module defines the error types used throughout the portfolio crate.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for portfolio operations.
pub type PortfolioResult<T> = Result<T, PortfolioError>;

/// Errors that can occur during portfolio operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PortfolioError {
    /// Invalid pipeline configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// The reason the configuration is invalid.
        reason: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {reason}")]
    ConfigFile {
        /// The file path.
        path: String,
        /// The underlying failure.
        reason: String,
    },

    /// Missing required field during construction.
    #[error("Missing required field: {field}")]
    MissingField {
        /// The name of the missing field.
        field: String,
    },

    /// Invalid asset data.
    #[error("Invalid asset '{symbol}': {reason}")]
    InvalidAsset {
        /// The asset symbol.
        symbol: String,
        /// The reason the asset is invalid.
        reason: String,
    },

    /// Target allocation could not be computed.
    #[error(transparent)]
    Allocation(#[from] AllocationError),
}

impl PortfolioError {
    /// Create an invalid configuration error.
    #[must_use]
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }

    /// Create a configuration file error.
    #[must_use]
    pub fn config_file(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConfigFile {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create an invalid asset error.
    #[must_use]
    pub fn invalid_asset(symbol: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAsset {
            symbol: symbol.into(),
            reason: reason.into(),
        }
    }
}

/// Reasons the target allocation cannot be resolved.
///
/// Carried inside the report rather than aborting the run, so valuation and
/// weights are still presented.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationError {
    /// No Core, Growth or Speculative asset is present.
    #[error("No investment assets (Core, Growth, Speculative) to allocate against")]
    NoInvestmentAssets,
}
