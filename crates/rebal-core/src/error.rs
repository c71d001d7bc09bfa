//! Error types for the Rebal library.
//!
//! This module defines the error types shared by the Rebal crates
//! for parsing and validating domain values.

use thiserror::Error;

/// A specialized Result type for Rebal core operations.
pub type RebalResult<T> = Result<T, RebalError>;

/// The main error type for Rebal core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RebalError {
    /// Unrecognized asset type label.
    #[error("Invalid asset type: '{label}'")]
    InvalidAssetType {
        /// The label that could not be parsed.
        label: String,
    },

    /// Unrecognized currency code.
    #[error("Invalid currency code: '{code}'")]
    InvalidCurrency {
        /// The code that could not be parsed.
        code: String,
    },

    /// A numeric input was outside its allowed range.
    #[error("Invalid value for {field}: {value} - {reason}")]
    InvalidValue {
        /// Name of the offending field.
        field: String,
        /// The rejected value.
        value: f64,
        /// Reason for invalidity.
        reason: String,
    },
}

impl RebalError {
    /// Creates an invalid asset type error.
    #[must_use]
    pub fn invalid_asset_type(label: impl Into<String>) -> Self {
        Self::InvalidAssetType {
            label: label.into(),
        }
    }

    /// Creates an invalid currency error.
    #[must_use]
    pub fn invalid_currency(code: impl Into<String>) -> Self {
        Self::InvalidCurrency { code: code.into() }
    }

    /// Creates an invalid value error.
    #[must_use]
    pub fn invalid_value(field: impl Into<String>, value: f64, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value,
            reason: reason.into(),
        }
    }
}
