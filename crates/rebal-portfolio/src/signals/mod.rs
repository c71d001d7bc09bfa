//! Per-asset classification signals.
//!
//! - [`drift`]: actual vs target weight
//! - [`price`]: price vs 52-week and 3-year bounds
//! - [`yields`]: dividend yield vs required yield
//! - [`pe`]: P/E vs its historical band

pub mod drift;
pub mod pe;
pub mod price;
pub mod yields;

pub use drift::{apply_drift, classify_drift, drift_outcome, DriftOutcome};
pub use pe::{apply_pe_signals, classify_pe, pe_percentiles};
pub use price::{apply_price_signals, price_level, PriceLevel};
pub use yields::{apply_yield_signals, classify_yield, required_yield};
