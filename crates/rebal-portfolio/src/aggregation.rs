//! Portfolio total, weights and summary rows.

use crate::types::AssetRecord;
use rebal_core::types::{AssetType, Currency};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::debug;

/// Sum of `value_base` over assets that have one.
#[must_use]
pub fn total_value(assets: &[AssetRecord]) -> Decimal {
    assets.iter().filter_map(|a| a.value_base).sum()
}

/// Sets `weight = value_base / total` on every asset.
///
/// Weights stay undefined when the total is not positive or the asset has
/// no value.
pub fn assign_weights(assets: &mut [AssetRecord], total: Decimal) {
    for asset in assets.iter_mut() {
        asset.weight = if total > Decimal::ZERO {
            asset
                .value_base
                .and_then(|v| (v / total).to_f64())
        } else {
            None
        };
    }
}

/// Symbol of the summary row for a type, e.g. `TOTAL_BOND`.
#[must_use]
pub fn summary_symbol(asset_type: AssetType) -> String {
    format!("TOTAL_{}", asset_type.name().to_uppercase())
}

/// Collapses every asset whose type is in `merge_types` into one row per type.
///
/// Summary rows follow the untouched rows, in `merge_types` order. A type
/// with no holdings produces no row. The summary value is the sum of the
/// members' defined values, or undefined if none of them has a value.
#[must_use]
pub fn summarize_assets(
    assets: Vec<AssetRecord>,
    merge_types: &[AssetType],
    base_currency: Currency,
) -> Vec<AssetRecord> {
    let (merged, mut kept): (Vec<_>, Vec<_>) = assets
        .into_iter()
        .partition(|a| merge_types.contains(&a.asset_type));

    let mut seen = Vec::with_capacity(merge_types.len());
    for &asset_type in merge_types {
        if seen.contains(&asset_type) {
            continue;
        }
        seen.push(asset_type);

        let members: Vec<&AssetRecord> =
            merged.iter().filter(|a| a.asset_type == asset_type).collect();
        if members.is_empty() {
            continue;
        }

        let values: Vec<Decimal> = members.iter().filter_map(|a| a.value_base).collect();
        let value = (!values.is_empty()).then(|| values.iter().copied().sum::<Decimal>());
        let merged_count = members.iter().map(|a| a.merged_count).sum();

        debug!(
            asset_type = %asset_type,
            members = members.len(),
            "Summarizing holdings"
        );

        let mut row = AssetRecord::new(
            format!("Total {}", asset_type.name()),
            summary_symbol(asset_type),
            base_currency,
            asset_type,
            Decimal::ONE,
        )
        .with_external_price(false)
        .with_price(Decimal::ONE)
        .with_fx_rate(Decimal::ONE);
        row.value_local = value;
        row.value_base = value;
        row.merged_count = merged_count;
        row.summary = true;

        kept.push(row);
    }

    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn valued(symbol: &str, asset_type: AssetType, value: Option<Decimal>) -> AssetRecord {
        let mut a = AssetRecord::new(symbol, symbol, Currency::THB, asset_type, Decimal::ONE);
        a.value_local = value;
        a.value_base = value;
        a
    }

    #[test]
    fn test_total_skips_undefined() {
        let assets = vec![
            valued("A", AssetType::Core, Some(dec!(100))),
            valued("B", AssetType::Growth, None),
            valued("C", AssetType::Cash, Some(dec!(50))),
        ];
        assert_eq!(total_value(&assets), dec!(150));
    }

    #[test]
    fn test_weights() {
        let mut assets = vec![
            valued("A", AssetType::Core, Some(dec!(300))),
            valued("B", AssetType::Growth, None),
            valued("C", AssetType::Cash, Some(dec!(100))),
        ];
        let total = total_value(&assets);
        assign_weights(&mut assets, total);

        assert_relative_eq!(assets[0].weight.unwrap(), 0.75);
        assert!(assets[1].weight.is_none());
        assert_relative_eq!(assets[2].weight.unwrap(), 0.25);
    }

    #[test]
    fn test_zero_total_leaves_weights_undefined() {
        let mut assets = vec![valued("A", AssetType::Core, Some(Decimal::ZERO))];
        assign_weights(&mut assets, Decimal::ZERO);
        assert!(assets[0].weight.is_none());
    }

    #[test]
    fn test_summarize() {
        let assets = vec![
            valued("BOND1", AssetType::Bond, Some(dec!(1000))),
            valued("SPY", AssetType::Core, Some(dec!(5000))),
            valued("CASH1", AssetType::Cash, Some(dec!(200))),
            valued("BOND2", AssetType::Bond, Some(dec!(500))),
            valued("CASH2", AssetType::Cash, None),
        ];

        let rows = summarize_assets(assets, &[AssetType::Bond, AssetType::Cash], Currency::THB);
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].symbol, "SPY");

        let bond = &rows[1];
        assert_eq!(bond.symbol, "TOTAL_BOND");
        assert_eq!(bond.name, "Total Bond");
        assert_eq!(bond.asset_type, AssetType::Bond);
        assert_eq!(bond.value_base, Some(dec!(1500)));
        assert_eq!(bond.shares, Decimal::ONE);
        assert_eq!(bond.market.price, Some(Decimal::ONE));
        assert_eq!(bond.market.fx_rate, Some(Decimal::ONE));
        assert_eq!(bond.merged_count, 2);
        assert!(bond.summary);

        let cash = &rows[2];
        assert_eq!(cash.symbol, "TOTAL_CASH");
        assert_eq!(cash.value_base, Some(dec!(200)));
        assert_eq!(cash.merged_count, 2);
    }

    #[test]
    fn test_summarize_skips_empty_and_undefined() {
        let assets = vec![
            valued("SPY", AssetType::Core, Some(dec!(5000))),
            valued("CASH1", AssetType::Cash, None),
        ];

        let rows = summarize_assets(assets, &[AssetType::Bond, AssetType::Cash], Currency::THB);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].symbol, "TOTAL_CASH");
        assert!(rows[1].value_base.is_none());
    }

    #[test]
    fn test_summarize_preserves_total() {
        let assets = vec![
            valued("BOND1", AssetType::Bond, Some(dec!(1000))),
            valued("SPY", AssetType::Core, Some(dec!(5000))),
            valued("BOND2", AssetType::Bond, Some(dec!(500))),
        ];
        let before = total_value(&assets);
        let rows = summarize_assets(assets, &[AssetType::Bond], Currency::THB);
        assert_eq!(total_value(&rows), before);
    }
}
