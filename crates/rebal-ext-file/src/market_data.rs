//! File-based market data sources.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use rebal_core::types::Currency;
use rebal_traits::error::TraitError;
use rebal_traits::market_data::{MarketDataSource, SourceType};

use crate::parse;

// =============================================================================
// CSV SNAPSHOT SOURCE
// =============================================================================

/// CSV record for quotes.
#[derive(Debug, Deserialize)]
struct QuoteRecord {
    symbol: String,
    #[serde(default)]
    price: Option<String>,
    #[serde(default, rename = "52w_high")]
    high_52w: Option<String>,
    #[serde(default, rename = "52w_low")]
    low_52w: Option<String>,
    #[serde(default)]
    pe: Option<String>,
    #[serde(default, rename = "yield")]
    dividend_yield: Option<String>,
}

/// CSV record for FX rates.
#[derive(Debug, Deserialize)]
struct FxRecord {
    currency: String,
    rate: Option<String>,
}

/// CSV record for one P/E observation.
#[derive(Debug, Deserialize)]
struct PeRecord {
    symbol: String,
    pe: Option<String>,
}

/// Parsed quote for one symbol.
#[derive(Debug, Clone, Default, PartialEq)]
struct Quote {
    price: Option<Decimal>,
    high_52w: Option<Decimal>,
    low_52w: Option<Decimal>,
    pe: Option<f64>,
    dividend_yield: Option<f64>,
}

fn csv_reader(path: &Path) -> Result<csv::Reader<std::fs::File>, TraitError> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .from_path(path)
        .map_err(|e| TraitError::IoError(format!("{}: {e}", path.display())))
}

fn symbol_key(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Quote and FX snapshot read from CSV files.
///
/// Quotes: `symbol,price,52w_high,52w_low,pe,yield`.
/// FX: `currency,rate`, where `rate` is units of the file's base currency
/// (THB unless changed with [`with_base`](Self::with_base)) per one unit of
/// `currency`. Other bases are derived by crossing through the file base.
/// P/E history: `symbol,pe`, one observation per row, in any order.
///
/// A missing file gives an empty source.
#[derive(Debug, Clone)]
pub struct CsvMarketDataSource {
    quotes_path: PathBuf,
    fx_path: Option<PathBuf>,
    pe_history_path: Option<PathBuf>,
    file_base: Currency,
    quotes: HashMap<String, Quote>,
    fx: HashMap<Currency, Decimal>,
    pe_history: HashMap<String, Vec<f64>>,
}

impl CsvMarketDataSource {
    /// Create a new source from a quotes file.
    pub fn new(quotes_path: impl AsRef<Path>) -> Result<Self, TraitError> {
        let mut source = Self {
            quotes_path: quotes_path.as_ref().to_path_buf(),
            fx_path: None,
            pe_history_path: None,
            file_base: Currency::default(),
            quotes: HashMap::new(),
            fx: HashMap::new(),
            pe_history: HashMap::new(),
        };
        source.reload()?;
        Ok(source)
    }

    /// Set the currency FX rates are quoted against.
    #[must_use]
    pub fn with_base(mut self, base: Currency) -> Self {
        self.file_base = base;
        self
    }

    /// Attach an FX file and load it.
    pub fn load_fx_file(&mut self, fx_path: impl AsRef<Path>) -> Result<(), TraitError> {
        self.fx_path = Some(fx_path.as_ref().to_path_buf());
        self.reload_fx()
    }

    /// Attach a P/E history file and load it.
    pub fn load_pe_history_file(&mut self, path: impl AsRef<Path>) -> Result<(), TraitError> {
        self.pe_history_path = Some(path.as_ref().to_path_buf());
        self.reload_pe_history()
    }

    /// Number of symbols with a quote row.
    #[must_use]
    pub fn quote_count(&self) -> usize {
        self.quotes.len()
    }

    /// Number of currencies with a rate.
    #[must_use]
    pub fn fx_count(&self) -> usize {
        self.fx.len()
    }

    /// Number of symbols with a P/E history.
    #[must_use]
    pub fn pe_history_count(&self) -> usize {
        self.pe_history.len()
    }

    /// Reload quotes, FX rates and P/E history from disk.
    pub fn reload(&mut self) -> Result<(), TraitError> {
        self.reload_quotes()?;
        self.reload_fx()?;
        self.reload_pe_history()?;
        info!(
            path = %self.quotes_path.display(),
            quotes = self.quotes.len(),
            fx = self.fx.len(),
            pe_history = self.pe_history.len(),
            "Loaded market data snapshot"
        );
        Ok(())
    }

    fn reload_quotes(&mut self) -> Result<(), TraitError> {
        self.quotes.clear();
        if !self.quotes_path.exists() {
            debug!(path = %self.quotes_path.display(), "Quotes file not found");
            return Ok(()); // Empty source
        }

        let mut reader = csv_reader(&self.quotes_path)?;
        for (i, result) in reader.deserialize::<QuoteRecord>().enumerate() {
            let row = i + 2;
            let record =
                result.map_err(|e| TraitError::ParseError(format!("row {row}: {e}")))?;
            let quote = Quote {
                price: parse::positive_decimal(record.price.as_deref(), "price", row)?,
                high_52w: parse::positive_decimal(record.high_52w.as_deref(), "52w_high", row)?,
                low_52w: parse::positive_decimal(record.low_52w.as_deref(), "52w_low", row)?,
                pe: parse::positive_f64(record.pe.as_deref(), "pe", row)?,
                dividend_yield: parse::non_negative_fraction(
                    record.dividend_yield.as_deref(),
                    "yield",
                    row,
                )?,
            };
            self.quotes.insert(symbol_key(&record.symbol), quote);
        }
        Ok(())
    }

    fn reload_fx(&mut self) -> Result<(), TraitError> {
        self.fx.clear();
        let Some(path) = self.fx_path.as_deref() else {
            return Ok(());
        };
        if !path.exists() {
            debug!(path = %path.display(), "FX file not found");
            return Ok(());
        }

        let mut reader = csv_reader(path)?;
        for (i, result) in reader.deserialize::<FxRecord>().enumerate() {
            let row = i + 2;
            let record =
                result.map_err(|e| TraitError::ParseError(format!("row {row}: {e}")))?;
            let currency = Currency::from_code(&record.currency).ok_or_else(|| {
                TraitError::ParseError(format!("row {row}: unknown currency '{}'", record.currency))
            })?;
            if let Some(rate) = parse::positive_decimal(record.rate.as_deref(), "rate", row)? {
                self.fx.insert(currency, rate);
            }
        }
        Ok(())
    }

    fn reload_pe_history(&mut self) -> Result<(), TraitError> {
        self.pe_history.clear();
        let Some(path) = self.pe_history_path.as_deref() else {
            return Ok(());
        };
        if !path.exists() {
            debug!(path = %path.display(), "P/E history file not found");
            return Ok(());
        }

        let mut reader = csv_reader(path)?;
        for (i, result) in reader.deserialize::<PeRecord>().enumerate() {
            let row = i + 2;
            let record =
                result.map_err(|e| TraitError::ParseError(format!("row {row}: {e}")))?;
            if let Some(pe) = parse::positive_f64(record.pe.as_deref(), "pe", row)? {
                self.pe_history
                    .entry(symbol_key(&record.symbol))
                    .or_default()
                    .push(pe);
            }
        }
        Ok(())
    }

    /// Units of the file base per one unit of `currency`.
    fn rate_to_file_base(&self, currency: Currency) -> Option<Decimal> {
        if currency == self.file_base {
            return Some(Decimal::ONE);
        }
        self.fx.get(&currency).copied()
    }

    fn quote(&self, symbol: &str) -> Option<&Quote> {
        self.quotes.get(&symbol_key(symbol))
    }
}

impl MarketDataSource for CsvMarketDataSource {
    fn source_type(&self) -> SourceType {
        SourceType::File
    }

    fn is_available(&self) -> bool {
        !self.quotes.is_empty() || !self.fx.is_empty()
    }

    fn price(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(self.quote(symbol).and_then(|q| q.price))
    }

    fn fx_rate(&self, currency: Currency, base: Currency) -> Result<Option<Decimal>, TraitError> {
        if currency == base {
            return Ok(Some(Decimal::ONE));
        }
        let (Some(from), Some(to)) = (self.rate_to_file_base(currency), self.rate_to_file_base(base))
        else {
            return Ok(None);
        };
        Ok(from.checked_div(to))
    }

    fn high_52w(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(self.quote(symbol).and_then(|q| q.high_52w))
    }

    fn low_52w(&self, symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(self.quote(symbol).and_then(|q| q.low_52w))
    }

    fn trailing_pe(&self, symbol: &str) -> Result<Option<f64>, TraitError> {
        Ok(self.quote(symbol).and_then(|q| q.pe))
    }

    fn trailing_dividend_yield(&self, symbol: &str) -> Result<Option<f64>, TraitError> {
        Ok(self.quote(symbol).and_then(|q| q.dividend_yield))
    }

    fn pe_history(&self, symbol: &str) -> Result<Option<Vec<f64>>, TraitError> {
        Ok(self.pe_history.get(&symbol_key(symbol)).cloned())
    }
}

// =============================================================================
// EMPTY SOURCE
// =============================================================================

/// Source with no data, used when running offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyMarketDataSource;

impl MarketDataSource for EmptyMarketDataSource {
    fn source_type(&self) -> SourceType {
        SourceType::Offline
    }

    fn is_available(&self) -> bool {
        false
    }

    fn price(&self, _symbol: &str) -> Result<Option<Decimal>, TraitError> {
        Ok(None)
    }

    fn fx_rate(&self, _currency: Currency, _base: Currency) -> Result<Option<Decimal>, TraitError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn quotes() -> NamedTempFile {
        write_file(
            "symbol,price,52w_high,52w_low,pe,yield\n\
             VOO,500,520,420,24,1.3%\n\
             ptt,34.25,36,31,9,0.06\n\
             NEW,12,,,,\n\
             ARKK,48,60,40,,0%\n",
        )
    }

    fn fx() -> NamedTempFile {
        write_file("currency,rate\nUSD,36\nEUR,39.6\nJPY,0\n")
    }

    #[test]
    fn test_quotes() {
        let file = quotes();
        let source = CsvMarketDataSource::new(file.path()).unwrap();

        assert_eq!(source.source_type(), SourceType::File);
        assert!(source.is_available());
        assert_eq!(source.quote_count(), 4);
        assert_eq!(source.price("VOO").unwrap(), Some(dec!(500)));
        assert_eq!(source.high_52w("VOO").unwrap(), Some(dec!(520)));
        assert_eq!(source.low_52w("VOO").unwrap(), Some(dec!(420)));
        assert_eq!(source.trailing_pe("VOO").unwrap(), Some(24.0));
        assert_relative_eq!(
            source.trailing_dividend_yield("VOO").unwrap().unwrap(),
            0.013,
            epsilon = 1e-12
        );
        // lookups ignore case
        assert_eq!(source.price("PTT").unwrap(), Some(dec!(34.25)));
        assert!(source.high_52w("NEW").unwrap().is_none());
        assert!(source.trailing_dividend_yield("NEW").unwrap().is_none());
        // a zero yield is data, not a gap
        assert_eq!(source.trailing_dividend_yield("ARKK").unwrap(), Some(0.0));
        assert!(source.price("MISSING").unwrap().is_none());
    }

    #[test]
    fn test_fx() {
        let q = quotes();
        let f = fx();
        let source = crate::create_file_market_data(q.path(), Some(f.path())).unwrap();

        assert_eq!(source.fx_count(), 2);
        assert_eq!(source.fx_rate(Currency::USD, Currency::THB).unwrap(), Some(dec!(36)));
        assert_eq!(source.fx_rate(Currency::THB, Currency::THB).unwrap(), Some(Decimal::ONE));
        assert_eq!(source.fx_rate(Currency::EUR, Currency::USD).unwrap(), Some(dec!(1.1)));
        assert_eq!(source.fx_rate(Currency::THB, Currency::USD).unwrap(), Some(Decimal::ONE / dec!(36)));
        // zero rate is dropped
        assert!(source.fx_rate(Currency::JPY, Currency::THB).unwrap().is_none());
        assert!(source.fx_rate(Currency::GBP, Currency::THB).unwrap().is_none());
    }

    #[test]
    fn test_with_base() {
        let q = quotes();
        let f = write_file("currency,rate\nTHB,0.0278\n");
        let mut source = CsvMarketDataSource::new(q.path()).unwrap().with_base(Currency::USD);
        source.load_fx_file(f.path()).unwrap();

        assert_eq!(source.fx_rate(Currency::THB, Currency::USD).unwrap(), Some(dec!(0.0278)));
        assert_eq!(source.fx_rate(Currency::USD, Currency::USD).unwrap(), Some(Decimal::ONE));
    }

    #[test]
    fn test_reload() {
        let mut file = quotes();
        let mut source = CsvMarketDataSource::new(file.path()).unwrap();
        assert_eq!(source.quote_count(), 4);

        file.write_all(b"GLD,220,230,180,,\n").unwrap();
        source.reload().unwrap();
        assert_eq!(source.quote_count(), 5);
        assert_eq!(source.price("GLD").unwrap(), Some(dec!(220)));
    }

    #[test]
    fn test_pe_history() {
        let q = quotes();
        let h = write_file("symbol,pe\nVOO,21.5\nvoo,24\nPTT,8\nVOO,-3\nPTT,\nVOO,19\n");
        let mut source = CsvMarketDataSource::new(q.path()).unwrap();
        assert!(source.pe_history("VOO").unwrap().is_none());

        source.load_pe_history_file(h.path()).unwrap();
        assert_eq!(source.pe_history_count(), 2);
        assert_eq!(source.pe_history("voo").unwrap(), Some(vec![21.5, 24.0, 19.0]));
        assert_eq!(source.pe_history("PTT").unwrap(), Some(vec![8.0]));
        assert!(source.pe_history("NEW").unwrap().is_none());

        let bad = write_file("symbol,pe\nVOO,rich\n");
        assert!(source.load_pe_history_file(bad.path()).is_err());
    }

    #[test]
    fn test_missing_file_is_empty() {
        let source = CsvMarketDataSource::new("/nonexistent/quotes.csv").unwrap();
        assert!(!source.is_available());
        assert!(source.price("VOO").unwrap().is_none());
    }

    #[test]
    fn test_bad_values() {
        let file = write_file("symbol,price\nVOO,cheap\n");
        let err = CsvMarketDataSource::new(file.path()).unwrap_err();
        assert!(matches!(err, TraitError::ParseError(_)));

        let q = quotes();
        let f = write_file("currency,rate\nXYZ,1\n");
        assert!(crate::create_file_market_data(q.path(), Some(f.path())).is_err());
    }

    #[test]
    fn test_empty_source() {
        let source = EmptyMarketDataSource;
        assert_eq!(source.source_type(), SourceType::Offline);
        assert!(!source.is_available());
        assert!(source.price("VOO").unwrap().is_none());
        assert!(source.fx_rate(Currency::USD, Currency::THB).unwrap().is_none());
        assert!(source.trailing_pe("VOO").unwrap().is_none());
    }
}
