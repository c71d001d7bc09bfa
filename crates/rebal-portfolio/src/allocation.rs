//! Dynamic target allocation.
//!
//! The investment fraction is split across the investment types present using
//! fixed base weights. The reserve is split into cash sized to the expected
//! investment drawdown, gold as a fixed share of the reserve, and bonds taking
//! the remainder. Each type's fraction is shared equally by its holdings.
//!
//! Targets sum to 1 whenever an investment asset and at least one reserve
//! asset (cash, bond or gold) are present. With no reserve asset the reserve
//! fraction has nowhere to go: targets sum to `investment_fraction` and the
//! allocation carries [`AllocationWarning::UnallocatedReserve`], so
//! [`TargetAllocation::is_clean`] is false even though `allocate` succeeded.

use crate::error::AllocationError;
use crate::types::{AssetRecord, RiskProfile};
use rebal_core::types::AssetType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Base weights of the investment types before redistribution.
pub const BASE_INVESTMENT_WEIGHTS: [(AssetType, f64); 3] = [
    (AssetType::Core, 0.6),
    (AssetType::Growth, 0.3),
    (AssetType::Speculative, 0.1),
];

/// Conditions flagged while resolving the allocation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationWarning {
    /// Cash plus gold exceeded the reserve; bonds were clamped to zero and
    /// cash reduced by `overshoot`.
    ReserveInsufficient {
        /// Amount by which the bond fraction went negative.
        overshoot: f64,
    },
    /// No reserve asset could take this fraction, so targets sum below 1.
    UnallocatedReserve {
        /// Fraction left unassigned.
        fraction: f64,
    },
}

impl std::fmt::Display for AllocationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocationWarning::ReserveInsufficient { overshoot } => write!(
                f,
                "reserve insufficient: cash and gold exceed the reserve by {:.2}%",
                overshoot * 100.0
            ),
            AllocationWarning::UnallocatedReserve { fraction } => write!(
                f,
                "no reserve asset to hold {:.2}% of the portfolio",
                fraction * 100.0
            ),
        }
    }
}

/// Type-level allocation for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetAllocation {
    /// Share held in investment assets.
    pub investment_fraction: f64,

    /// Share held in reserve assets.
    pub reserve_fraction: f64,

    /// Base weights renormalized over the investment types present.
    pub investment_weights: BTreeMap<AssetType, f64>,

    /// `Σ weight × mdd` over the investment types present (negative).
    pub weighted_mdd: f64,

    /// `|weighted_mdd| × investment_fraction`.
    pub mdd_investment: f64,

    /// Portfolio fraction per type, after folding absent reserve types.
    pub type_fractions: BTreeMap<AssetType, f64>,

    /// Holdings per type.
    pub counts: BTreeMap<AssetType, usize>,

    /// Holdings whose target was fixed by an override.
    pub overrides: usize,

    /// Flagged conditions.
    pub warnings: Vec<AllocationWarning>,
}

impl TargetAllocation {
    /// Portfolio fraction for a type (0 if absent).
    #[must_use]
    pub fn fraction(&self, asset_type: AssetType) -> f64 {
        self.type_fractions.get(&asset_type).copied().unwrap_or(0.0)
    }

    /// Number of holdings of a type.
    #[must_use]
    pub fn count(&self, asset_type: AssetType) -> usize {
        self.counts.get(&asset_type).copied().unwrap_or(0)
    }

    /// Computed target for one holding of the given type.
    ///
    /// Unknown types and absent types get 0.
    #[must_use]
    pub fn target_for(&self, asset_type: AssetType) -> f64 {
        match self.count(asset_type) {
            0 => 0.0,
            n => self.fraction(asset_type) / n as f64,
        }
    }

    /// Sum of all type fractions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.type_fractions.values().sum()
    }

    /// Returns true if nothing was flagged.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Computes type-level fractions for the given holdings.
///
/// Fails when no investment-type holding is present.
pub fn compute_target_allocation(
    assets: &[AssetRecord],
    risk: &RiskProfile,
) -> Result<TargetAllocation, AllocationError> {
    let mut counts: BTreeMap<AssetType, usize> = BTreeMap::new();
    for asset in assets.iter().filter(|a| a.asset_type != AssetType::Unknown) {
        *counts.entry(asset.asset_type).or_insert(0) += 1;
    }
    let present = |t: AssetType| counts.get(&t).copied().unwrap_or(0) > 0;

    let base_sum: f64 = BASE_INVESTMENT_WEIGHTS
        .iter()
        .filter(|(t, _)| present(*t))
        .map(|(_, w)| w)
        .sum();
    if base_sum <= 0.0 {
        return Err(AllocationError::NoInvestmentAssets);
    }

    let investment_weights: BTreeMap<AssetType, f64> = BASE_INVESTMENT_WEIGHTS
        .iter()
        .filter(|(t, _)| present(*t))
        .map(|(t, w)| (*t, w / base_sum))
        .collect();

    let weighted_mdd: f64 = investment_weights
        .iter()
        .filter_map(|(t, w)| risk.mdd(*t).map(|mdd| w * mdd))
        .sum();

    let inv = risk.investment_fraction;
    let reserve = risk.reserve_fraction();
    let mdd_investment = weighted_mdd.abs() * inv;

    let mut warnings = Vec::new();
    let mut cash = mdd_investment * inv;
    let mut gold = if present(AssetType::Gold) {
        risk.gold_fraction_of_reserve * reserve
    } else {
        0.0
    };
    let mut bond = reserve - cash - gold;

    if bond < 0.0 {
        warn!(overshoot = -bond, "Reserve insufficient, clamping bond target to zero");
        warnings.push(AllocationWarning::ReserveInsufficient { overshoot: -bond });
        cash += bond;
        bond = 0.0;
    }

    if !present(AssetType::Bond) {
        cash += bond;
        bond = 0.0;
    }

    if !present(AssetType::Cash) {
        if present(AssetType::Bond) {
            bond += cash;
        } else if present(AssetType::Gold) {
            gold += cash;
        } else if cash > 0.0 {
            warn!(fraction = cash, "No reserve assets to hold the reserve fraction");
            warnings.push(AllocationWarning::UnallocatedReserve { fraction: cash });
        }
        cash = 0.0;
    }

    let mut type_fractions: BTreeMap<AssetType, f64> = investment_weights
        .iter()
        .map(|(t, w)| (*t, w * inv))
        .collect();
    for (t, fraction) in [
        (AssetType::Cash, cash),
        (AssetType::Bond, bond),
        (AssetType::Gold, gold),
    ] {
        if present(t) {
            type_fractions.insert(t, fraction);
        }
    }

    let overrides = assets.iter().filter(|a| a.target_override.is_some()).count();

    debug!(
        weighted_mdd,
        mdd_investment,
        cash,
        bond,
        gold,
        "Target allocation computed"
    );

    Ok(TargetAllocation {
        investment_fraction: inv,
        reserve_fraction: reserve,
        investment_weights,
        weighted_mdd,
        mdd_investment,
        type_fractions,
        counts,
        overrides,
        warnings,
    })
}

/// Sets `target` on every asset from the allocation.
///
/// An asset's `target_override` replaces its computed target.
pub fn assign_targets(assets: &mut [AssetRecord], allocation: &TargetAllocation) {
    for asset in assets.iter_mut() {
        let target = asset
            .target_override
            .unwrap_or_else(|| allocation.target_for(asset.asset_type));
        asset.target = Some(target.clamp(0.0, 1.0));
    }
}

/// Computes the allocation and assigns targets.
///
/// On error every target is left undefined.
pub fn allocate(
    assets: &mut [AssetRecord],
    risk: &RiskProfile,
) -> Result<TargetAllocation, AllocationError> {
    match compute_target_allocation(assets, risk) {
        Ok(allocation) => {
            assign_targets(assets, &allocation);
            Ok(allocation)
        }
        Err(e) => {
            warn!(error = %e, "Target allocation unresolved");
            for asset in assets.iter_mut() {
                asset.target = None;
            }
            Err(e)
        }
    }
}
