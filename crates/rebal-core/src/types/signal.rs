//! Classification signals produced by the rebalancing pipeline.
//!
//! Each signal has a short `label()` used by tables and CSV exports. Neutral
//! states render as `"-"`, matching how the spreadsheet reports them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position-size signal from comparing actual weight with target weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PositionSignal {
    /// Weight is above target beyond the drift thresholds.
    Oversize,
    /// Weight is below target beyond the drift thresholds.
    Undersize,
    /// Weight is within the drift thresholds.
    Aligned,
    /// Weight is undefined.
    #[default]
    Unknown,
}

impl PositionSignal {
    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PositionSignal::Oversize => "oversize",
            PositionSignal::Undersize => "undersize",
            PositionSignal::Aligned => "-",
            PositionSignal::Unknown => "unknown",
        }
    }

    /// Returns true if rebalancing action is suggested.
    #[must_use]
    pub fn is_actionable(&self) -> bool {
        matches!(self, PositionSignal::Oversize | PositionSignal::Undersize)
    }
}

/// Price-level signal from comparing price with historical bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceSignal {
    /// Price has run up faster than the required recovery growth.
    Overbought,
    /// Price has dropped further than the tolerated drawdown.
    Oversold,
    /// Neither bound breached.
    Neutral,
}

impl PriceSignal {
    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PriceSignal::Overbought => "overbought",
            PriceSignal::Oversold => "oversold",
            PriceSignal::Neutral => "-",
        }
    }
}

/// Dividend-yield sufficiency signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YieldSignal {
    /// Dividend yield meets the required yield.
    Sufficient,
    /// Dividend yield falls short of the required yield.
    Insufficient,
}

impl YieldSignal {
    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            YieldSignal::Sufficient => "sufficient",
            YieldSignal::Insufficient => "insufficient",
        }
    }
}

/// Valuation signal from comparing P/E with its historical band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeSignal {
    /// P/E below its 25th percentile.
    Undervalue,
    /// P/E above its 75th percentile.
    Overvalue,
    /// P/E inside the band.
    Neutral,
}

impl PeSignal {
    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            PeSignal::Undervalue => "undervalue",
            PeSignal::Overvalue => "overvalue",
            PeSignal::Neutral => "-",
        }
    }
}

impl fmt::Display for PositionSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PriceSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for YieldSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for PeSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
