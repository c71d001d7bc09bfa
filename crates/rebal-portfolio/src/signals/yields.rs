//! Dividend yield sufficiency.

use crate::types::{AssetRecord, RiskProfile};
use rebal_core::types::YieldSignal;

/// Required yield for an assumed drawdown, raised when the realized one-year
/// drop is worse.
///
/// `max(|mdd| / 5, drop_1y / −5)`
#[must_use]
pub fn required_yield(mdd: f64, drop_1y: Option<f64>) -> f64 {
    let base = mdd.abs() / RiskProfile::YIELD_OFFSET_PERIODS;
    match drop_1y {
        Some(drop) => base.max(drop / -RiskProfile::YIELD_OFFSET_PERIODS),
        None => base,
    }
}

/// Classifies a dividend yield against the required yield.
#[must_use]
pub fn classify_yield(dividend_yield: f64, required: f64) -> YieldSignal {
    if dividend_yield >= required {
        YieldSignal::Sufficient
    } else {
        YieldSignal::Insufficient
    }
}

/// Sets `required_yield` and `yield_signal` on investment-type assets.
///
/// Must run after the price stage so `drop_1y` is available.
pub fn apply_yield_signals(assets: &mut [AssetRecord], risk: &RiskProfile) {
    for asset in assets.iter_mut() {
        let required = risk
            .mdd(asset.asset_type)
            .map(|mdd| required_yield(mdd, asset.drop_1y));
        asset.required_yield = required;
        asset.yield_signal = match (asset.market.dividend_yield, required) {
            (Some(dy), Some(req)) => Some(classify_yield(dy, req)),
            _ => None,
        };
    }
}
