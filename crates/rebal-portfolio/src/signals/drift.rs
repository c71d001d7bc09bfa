//! Drift classification.

use crate::types::{AssetRecord, DriftThresholds};
use rebal_core::types::PositionSignal;
use serde::{Deserialize, Serialize};

/// Drift figures and the resulting signal for one asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DriftOutcome {
    /// `weight − target`.
    pub drift: Option<f64>,
    /// `drift / target`, undefined when the target is 0.
    pub drift_pct: Option<f64>,
    /// Classification.
    pub signal: PositionSignal,
}

/// Classifies a defined weight against a defined target.
///
/// Either threshold breach triggers. A zero target with a positive weight
/// is always oversize.
#[must_use]
pub fn classify_drift(weight: f64, target: f64, absolute: f64, relative: f64) -> PositionSignal {
    if target == 0.0 {
        return if weight > 0.0 {
            PositionSignal::Oversize
        } else {
            PositionSignal::Aligned
        };
    }

    let drift = weight - target;
    let drift_pct = drift / target;
    if drift > absolute || drift_pct > relative {
        PositionSignal::Oversize
    } else if drift < -absolute || drift_pct < -relative {
        PositionSignal::Undersize
    } else {
        PositionSignal::Aligned
    }
}

/// Drift figures for possibly undefined weight and target.
#[must_use]
pub fn drift_outcome(
    weight: Option<f64>,
    target: Option<f64>,
    thresholds: &DriftThresholds,
) -> DriftOutcome {
    let Some(weight) = weight else {
        return DriftOutcome {
            drift: None,
            drift_pct: None,
            signal: PositionSignal::Unknown,
        };
    };

    match target {
        None => DriftOutcome {
            drift: None,
            drift_pct: None,
            signal: if weight > 0.0 {
                PositionSignal::Oversize
            } else {
                PositionSignal::Aligned
            },
        },
        Some(target) => {
            let drift = weight - target;
            DriftOutcome {
                drift: Some(drift),
                drift_pct: (target != 0.0).then(|| drift / target),
                signal: classify_drift(weight, target, thresholds.absolute, thresholds.relative),
            }
        }
    }
}

/// Sets `drift`, `drift_pct` and `position_signal` on every asset.
pub fn apply_drift(assets: &mut [AssetRecord], thresholds: &DriftThresholds) {
    for asset in assets.iter_mut() {
        let outcome = drift_outcome(asset.weight, asset.target, thresholds);
        asset.drift = outcome.drift;
        asset.drift_pct = outcome.drift_pct;
        asset.position_signal = outcome.signal;
    }
}
