//! Market data source traits.
//!
//! [`MarketDataSource`] is the single capability the enrichment stage needs:
//! - spot price in the instrument's local currency
//! - FX rate from a local currency into the base currency
//! - 52-week high and low
//! - trailing P/E and trailing dividend yield
//!
//! Every lookup is blocking and individually failable. `Ok(None)` means the
//! source answered but has no value; `Err` means the lookup itself failed.
//! Callers treat both as "missing" and fall back to static data.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TraitError;
use rebal_core::Currency;

/// Source type for market data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceType {
    /// Snapshot/request-response (web quote APIs)
    Snapshot,
    /// File-based (CSV snapshot)
    File,
    /// Manual entry
    Manual,
    /// No data at all (offline mode)
    Offline,
}

/// Trait for market data providers.
///
/// Only [`source_type`](MarketDataSource::source_type),
/// [`price`](MarketDataSource::price) and
/// [`fx_rate`](MarketDataSource::fx_rate) are required. The fundamental
/// lookups default to "no data".
pub trait MarketDataSource {
    /// Source type.
    fn source_type(&self) -> SourceType;

    /// Returns false when the source cannot serve data at all.
    ///
    /// The pipeline checks this once per run and keeps static data when it
    /// returns false.
    fn is_available(&self) -> bool {
        true
    }

    /// Last price for a symbol, in the symbol's trading currency.
    fn price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError>;

    /// Units of `base` per one unit of `currency`.
    fn fx_rate(&self, currency: Currency, base: Currency) -> Result<Option<Decimal>, TraitError>;

    /// 52-week high.
    fn high_52w(&self, _symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(None)
    }

    /// 52-week low.
    fn low_52w(&self, _symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(None)
    }

    /// Trailing twelve-month price/earnings ratio.
    fn trailing_pe(&self, _symbol: &str) -> Result<Option<f64>, TraitError> {
        Ok(None)
    }

    /// Trailing dividend yield as a fraction (0.035 for 3.5%).
    fn trailing_dividend_yield(&self, _symbol: &str) -> Result<Option<f64>, TraitError> {
        Ok(None)
    }

    /// Historical P/E observations, oldest first, used to derive the
    /// percentile band when none is loaded.
    fn pe_history(&self, _symbol: &str) -> Result<Option<Vec<f64>>, TraitError> {
        Ok(None)
    }
}

impl<T: MarketDataSource + ?Sized> MarketDataSource for &T {
    fn source_type(&self) -> SourceType {
        (**self).source_type()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).price(symbol)
    }

    fn fx_rate(&self, currency: Currency, base: Currency) -> Result<Option<Decimal>, TraitError> {
        (**self).fx_rate(currency, base)
    }

    fn high_52w(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).high_52w(symbol)
    }

    fn low_52w(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).low_52w(symbol)
    }

    fn trailing_pe(&self, symbol: &str) -> Result<Option<f64>, TraitError> {
        (**self).trailing_pe(symbol)
    }

    fn trailing_dividend_yield(&self, symbol: &str) -> Result<Option<f64>, TraitError> {
        (**self).trailing_dividend_yield(symbol)
    }

    fn pe_history(&self, symbol: &str) -> Result<Option<Vec<f64>>, TraitError> {
        (**self).pe_history(symbol)
    }
}

impl<T: MarketDataSource + ?Sized> MarketDataSource for Box<T> {
    fn source_type(&self) -> SourceType {
        (**self).source_type()
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }

    fn price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).price(symbol)
    }

    fn fx_rate(&self, currency: Currency, base: Currency) -> Result<Option<Decimal>, TraitError> {
        (**self).fx_rate(currency, base)
    }

    fn high_52w(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).high_52w(symbol)
    }

    fn low_52w(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        (**self).low_52w(symbol)
    }

    fn trailing_pe(&self, symbol: &str) -> Result<Option<f64>, TraitError> {
        (**self).trailing_pe(symbol)
    }

    fn trailing_dividend_yield(&self, symbol: &str) -> Result<Option<f64>, TraitError> {
        (**self).trailing_dividend_yield(symbol)
    }

    fn pe_history(&self, symbol: &str) -> Result<Option<Vec<f64>>, TraitError> {
        (**self).pe_history(symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    struct Fixed;

    impl MarketDataSource for Fixed {
        fn source_type(&self) -> SourceType {
            SourceType::Manual
        }

        fn price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
            match symbol {
                "SPY" => Ok(Some(dec!(500))),
                "ERR" => Err(TraitError::NotFound(symbol.to_string())),
                _ => Ok(None),
            }
        }

        fn fx_rate(&self, currency: Currency, base: Currency) -> Result<Option<Decimal>, TraitError> {
            if currency == base {
                return Ok(Some(Decimal::ONE));
            }
            Ok((currency == Currency::USD && base == Currency::THB).then_some(dec!(36.5)))
        }
    }

    #[test]
    fn test_defaults() {
        let src = Fixed;
        assert!(src.is_available());
        assert_eq!(src.high_52w("SPY").unwrap(), None);
        assert_eq!(src.trailing_pe("SPY").unwrap(), None);
        assert_eq!(src.trailing_dividend_yield("SPY").unwrap(), None);
        assert_eq!(src.pe_history("SPY").unwrap(), None);
    }

    #[test]
    fn test_lookup_outcomes() {
        let src = Fixed;
        assert_eq!(src.price("SPY").unwrap(), Some(dec!(500)));
        assert_eq!(src.price("QQQ").unwrap(), None);
        assert!(src.price("ERR").is_err());
        assert_eq!(src.fx_rate(Currency::USD, Currency::THB).unwrap(), Some(dec!(36.5)));
        assert_eq!(src.fx_rate(Currency::EUR, Currency::THB).unwrap(), None);
    }

    #[test]
    fn test_forwarding_impls() {
        let boxed: Box<dyn MarketDataSource> = Box::new(Fixed);
        assert_eq!(boxed.source_type(), SourceType::Manual);
        assert_eq!(boxed.price("SPY").unwrap(), Some(dec!(500)));

        let by_ref = &Fixed;
        assert_eq!(by_ref.fx_rate(Currency::THB, Currency::THB).unwrap(), Some(Decimal::ONE));
    }

    struct History;

    impl MarketDataSource for History {
        fn source_type(&self) -> SourceType {
            SourceType::Snapshot
        }

        fn price(&self, _symbol: &str) -> Result<Option<Decimal>, TraitError> {
            Ok(None)
        }

        fn fx_rate(&self, _currency: Currency, _base: Currency) -> Result<Option<Decimal>, TraitError> {
            Ok(None)
        }

        fn pe_history(&self, symbol: &str) -> Result<Option<Vec<f64>>, TraitError> {
            Ok((symbol == "SPY").then(|| vec![18.0, 21.0, 24.0]))
        }
    }

    #[test]
    fn test_pe_history_forwarding() {
        let boxed: Box<dyn MarketDataSource> = Box::new(History);
        assert_eq!(boxed.pe_history("SPY").unwrap(), Some(vec![18.0, 21.0, 24.0]));
        assert_eq!(boxed.pe_history("QQQ").unwrap(), None);

        let by_ref = &History;
        assert_eq!(by_ref.pe_history("SPY").unwrap().map(|h| h.len()), Some(3));
    }
}
