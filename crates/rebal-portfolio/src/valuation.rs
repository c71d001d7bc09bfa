//! Per-asset valuation.

use crate::types::AssetRecord;
use rust_decimal::Decimal;
use tracing::warn;

/// Local and base-currency value of a position.
///
/// Returns `None` when either the price or the FX rate is missing, or when a
/// product overflows. A missing input is never treated as zero.
#[must_use]
pub fn position_value(
    shares: Decimal,
    price: Option<Decimal>,
    fx_rate: Option<Decimal>,
) -> Option<(Decimal, Decimal)> {
    let local = shares.checked_mul(price?)?;
    let base = local.checked_mul(fx_rate?)?;
    Some((local, base))
}

/// Sets `value_local` and `value_base` on every asset.
pub fn value_assets(assets: &mut [AssetRecord]) {
    for asset in assets.iter_mut() {
        match position_value(asset.shares, asset.market.price, asset.market.fx_rate) {
            Some((local, base)) => {
                asset.value_local = Some(local);
                asset.value_base = Some(base);
            }
            None => {
                if asset.market.price.is_some() && asset.market.fx_rate.is_some() {
                    warn!(symbol = %asset.symbol, "Position value overflows, leaving it undefined");
                }
                asset.value_local = None;
                asset.value_base = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rebal_core::types::{AssetType, Currency};
    use rust_decimal_macros::dec;

    #[test]
    fn test_position_value() {
        assert_eq!(
            position_value(dec!(10), Some(dec!(190.5)), Some(dec!(36))),
            Some((dec!(1905), dec!(68580)))
        );
        assert_eq!(position_value(dec!(10), None, Some(dec!(36))), None);
        assert_eq!(position_value(dec!(10), Some(dec!(190.5)), None), None);
        assert_eq!(
            position_value(Decimal::ZERO, Some(dec!(5)), Some(Decimal::ONE)),
            Some((Decimal::ZERO, Decimal::ZERO))
        );
    }

    #[test]
    fn test_position_value_overflow() {
        assert_eq!(position_value(Decimal::MAX, Some(dec!(500)), Some(Decimal::ONE)), None);
        // local fits, base does not
        assert_eq!(position_value(Decimal::MAX, Some(Decimal::ONE), Some(dec!(36))), None);
    }

    #[test]
    fn test_value_assets_leaves_missing_undefined() {
        let mut assets = vec![
            AssetRecord::new("Apple", "AAPL", Currency::USD, AssetType::Growth, dec!(5))
                .with_price(dec!(200))
                .with_fx_rate(dec!(35)),
            AssetRecord::new("Nvidia", "NVDA", Currency::USD, AssetType::Growth, dec!(5))
                .with_price(dec!(100)),
        ];

        value_assets(&mut assets);
        assert_eq!(assets[0].value_local, Some(dec!(1000)));
        assert_eq!(assets[0].value_base, Some(dec!(35000)));
        assert!(assets[1].value_local.is_none());
        assert!(assets[1].value_base.is_none());
    }

    #[test]
    fn test_value_assets_overflow_is_undefined() {
        let mut assets = vec![
            AssetRecord::new("Huge", "HUGE", Currency::USD, AssetType::Growth, Decimal::MAX)
                .with_price(dec!(500))
                .with_fx_rate(dec!(36)),
            AssetRecord::new("Apple", "AAPL", Currency::USD, AssetType::Growth, dec!(5))
                .with_price(dec!(200))
                .with_fx_rate(dec!(35)),
        ];

        value_assets(&mut assets);
        assert!(assets[0].value_local.is_none());
        assert!(assets[0].value_base.is_none());
        assert_eq!(assets[1].value_base, Some(dec!(35000)));
    }
}
