//! End-to-end rebalancing run.
//!
//! Stages run in a fixed order, each reading what the previous one wrote:
//!
//! ```text
//! enrich → value → (summarize) → total/weights → targets → drift → price → yield → P/E
//! ```

use crate::aggregation::{assign_weights, summarize_assets, total_value};
use crate::allocation::{allocate, TargetAllocation};
use crate::enrichment::{enrich_assets, EnrichmentReport};
use crate::error::{AllocationError, PortfolioResult};
use crate::signals::{apply_drift, apply_pe_signals, apply_price_signals, apply_yield_signals};
use crate::types::{AssetRecord, PipelineConfig};
use crate::valuation::value_assets;
use rebal_core::types::{AssetType, Currency};
use rebal_traits::MarketDataSource;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Actual vs target weight for one asset type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeWeight {
    /// Asset type.
    pub asset_type: AssetType,
    /// Rows of this type (summary rows count once).
    pub count: usize,
    /// Sum of defined base-currency values.
    pub value: Decimal,
    /// `value / total`, undefined when the total is not positive.
    pub weight: Option<f64>,
    /// Sum of member targets, undefined when allocation failed.
    pub target: Option<f64>,
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioReport {
    /// Currency values are expressed in.
    pub base_currency: Currency,
    /// Assets with every derived field filled in.
    pub assets: Vec<AssetRecord>,
    /// Sum of defined base-currency values.
    pub total_value: Decimal,
    /// Type-level allocation, or why it could not be computed.
    pub allocation: Result<TargetAllocation, AllocationError>,
    /// What enrichment resolved.
    pub enrichment: EnrichmentReport,
}

impl PortfolioReport {
    /// Per-type actual vs target weight, in [`AssetType::KNOWN`] order,
    /// followed by Unknown if any row has that type.
    #[must_use]
    pub fn by_type(&self) -> Vec<TypeWeight> {
        let allocated = self.allocation.is_ok();
        let unknown_present = self.assets.iter().any(|a| a.asset_type == AssetType::Unknown);

        AssetType::KNOWN
            .iter()
            .copied()
            .chain(unknown_present.then_some(AssetType::Unknown))
            .filter_map(|t| {
                let members: Vec<&AssetRecord> =
                    self.assets.iter().filter(|a| a.asset_type == t).collect();
                if members.is_empty() {
                    return None;
                }
                let value: Decimal = members.iter().filter_map(|a| a.value_base).sum();
                let weight = (self.total_value > Decimal::ZERO)
                    .then(|| (value / self.total_value).to_f64())
                    .flatten();
                let target = allocated.then(|| members.iter().filter_map(|a| a.target).sum());
                Some(TypeWeight {
                    asset_type: t,
                    count: members.len(),
                    value,
                    weight,
                    target,
                })
            })
            .collect()
    }

    /// Assets whose position signal suggests rebalancing.
    #[must_use]
    pub fn actionable(&self) -> Vec<&AssetRecord> {
        self.assets
            .iter()
            .filter(|a| a.position_signal.is_actionable())
            .collect()
    }

    /// Assets without a base-currency value.
    #[must_use]
    pub fn unvalued(&self) -> Vec<&AssetRecord> {
        self.assets.iter().filter(|a| !a.is_valued()).collect()
    }
}

/// Runs every stage over the given assets.
///
/// Only an invalid configuration fails the run. Missing market data and an
/// unresolvable allocation are reported in the returned [`PortfolioReport`].
pub fn run_pipeline<S>(
    mut assets: Vec<AssetRecord>,
    source: &S,
    config: &PipelineConfig,
) -> PortfolioResult<PortfolioReport>
where
    S: MarketDataSource + ?Sized,
{
    config.validate()?;

    let enrichment = enrich_assets(&mut assets, source, config);
    value_assets(&mut assets);

    if config.summarize && !config.merge_types.is_empty() {
        assets = summarize_assets(assets, &config.merge_types, config.base_currency);
    }

    let total = total_value(&assets);
    assign_weights(&mut assets, total);

    let allocation = allocate(&mut assets, &config.risk);

    apply_drift(&mut assets, &config.drift);
    apply_price_signals(&mut assets, &config.risk);
    apply_yield_signals(&mut assets, &config.risk);
    apply_pe_signals(&mut assets);

    let actionable = assets
        .iter()
        .filter(|a| a.position_signal.is_actionable())
        .count();
    info!(
        assets = assets.len(),
        total = %total,
        currency = %config.base_currency,
        actionable,
        allocated = allocation.is_ok(),
        "Rebalancing run complete"
    );

    Ok(PortfolioReport {
        base_currency: config.base_currency,
        assets,
        total_value: total,
        allocation,
        enrichment,
    })
}
