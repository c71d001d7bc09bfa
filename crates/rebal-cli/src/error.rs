//! CLI error types.

use thiserror::Error;

use rebal_portfolio::PortfolioError;
use rebal_traits::TraitError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid argument combination or value.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Input file could not be read or parsed.
    #[error("Input error: {0}")]
    Input(#[from] TraitError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] PortfolioError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

impl From<csv::Error> for CliError {
    fn from(e: csv::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
