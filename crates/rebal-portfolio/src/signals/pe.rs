//! P/E band classification.

use crate::types::AssetRecord;
use rebal_core::types::PeSignal;
use statrs::statistics::{Data, OrderStatistics};

/// 25th and 75th percentiles of a P/E history.
///
/// Non-finite and non-positive observations are ignored. Returns `None` if
/// nothing usable remains.
#[must_use]
pub fn pe_percentiles(history: &[f64]) -> Option<(f64, f64)> {
    let usable: Vec<f64> = history
        .iter()
        .copied()
        .filter(|pe| pe.is_finite() && *pe > 0.0)
        .collect();
    if usable.is_empty() {
        return None;
    }
    let mut data = Data::new(usable);
    Some((data.percentile(25), data.percentile(75)))
}

/// Classifies a P/E against its band. Any missing or non-positive input
/// leaves the signal undefined.
#[must_use]
pub fn classify_pe(pe: Option<f64>, p25: Option<f64>, p75: Option<f64>) -> Option<PeSignal> {
    let positive = |v: Option<f64>| v.filter(|x| x.is_finite() && *x > 0.0);
    let (pe, p25, p75) = (positive(pe)?, positive(p25)?, positive(p75)?);

    Some(if pe < p25 {
        PeSignal::Undervalue
    } else if pe > p75 {
        PeSignal::Overvalue
    } else {
        PeSignal::Neutral
    })
}

/// Sets `pe_signal` on every asset.
pub fn apply_pe_signals(assets: &mut [AssetRecord]) {
    for asset in assets.iter_mut() {
        asset.pe_signal = classify_pe(
            asset.market.pe_ratio,
            asset.market.pe_p25,
            asset.market.pe_p75,
        );
    }
}
