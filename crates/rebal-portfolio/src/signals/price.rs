//! Price-level classification against historical bounds.

use crate::types::{AssetRecord, RiskProfile};
use rebal_core::types::PriceSignal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price changes relative to historical bounds, and the resulting signal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel {
    /// `(price − high_52w) / high_52w`.
    pub drop_1y: Option<f64>,
    /// `(price − low_52w) / low_52w`.
    pub gain_1y: Option<f64>,
    /// `(price − low_3y) / low_3y`.
    pub gain_3y: Option<f64>,
    /// Undefined unless price, 52-week high and 52-week low are all usable.
    pub signal: Option<PriceSignal>,
}

fn positive(value: Option<Decimal>) -> Option<f64> {
    value
        .filter(|v| *v > Decimal::ZERO)
        .and_then(|v| v.to_f64())
}

fn change(price: Option<f64>, reference: Option<f64>) -> Option<f64> {
    Some((price? - reference?) / reference?)
}

/// Computes price changes and classifies the price level.
///
/// - `drop_1y < mdd` → oversold
/// - otherwise `gain_1y > cagr` or `gain_3y > (1 + cagr)³ − 1` → overbought
/// - otherwise neutral
///
/// A missing 3-year low only disables the 3-year test.
#[must_use]
pub fn price_level(
    price: Option<Decimal>,
    high_52w: Option<Decimal>,
    low_52w: Option<Decimal>,
    low_3y: Option<Decimal>,
    mdd: f64,
    cagr: f64,
) -> PriceLevel {
    let price = positive(price);
    let high = positive(high_52w);
    let low = positive(low_52w);

    let drop_1y = change(price, high);
    let gain_1y = change(price, low);
    let gain_3y = change(price, positive(low_3y));

    let signal = match (drop_1y, gain_1y) {
        (Some(drop), Some(gain)) => {
            let three_year_growth = (1.0 + cagr).powi(RiskProfile::RECOVERY_PERIODS) - 1.0;
            if drop < mdd {
                Some(PriceSignal::Oversold)
            } else if gain > cagr || gain_3y.is_some_and(|g| g > three_year_growth) {
                Some(PriceSignal::Overbought)
            } else {
                Some(PriceSignal::Neutral)
            }
        }
        _ => None,
    };

    PriceLevel {
        drop_1y,
        gain_1y,
        gain_3y,
        signal,
    }
}

/// Sets price changes and `price_signal` on investment-type assets.
///
/// Other types are left undefined.
pub fn apply_price_signals(assets: &mut [AssetRecord], risk: &RiskProfile) {
    for asset in assets.iter_mut() {
        let level = match (risk.mdd(asset.asset_type), risk.required_cagr(asset.asset_type)) {
            (Some(mdd), Some(cagr)) => price_level(
                asset.market.price,
                asset.market.high_52w,
                asset.market.low_52w,
                asset.market.low_3y,
                mdd,
                cagr,
            ),
            _ => PriceLevel::default(),
        };
        asset.drop_1y = level.drop_1y;
        asset.gain_1y = level.gain_1y;
        asset.gain_3y = level.gain_3y;
        asset.price_signal = level.signal;
    }
}
