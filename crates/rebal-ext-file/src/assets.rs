//! Asset list loading from a spreadsheet CSV export.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, info};

use rebal_core::types::{AssetType, Currency};
use rebal_portfolio::types::AssetRecord;
use rebal_traits::error::TraitError;

use crate::parse;

/// Columns every asset file must have.
pub const REQUIRED_COLUMNS: [&str; 5] = ["name", "symbol", "currency", "shares", "type"];

// =============================================================================
// CSV ROW
// =============================================================================

/// One spreadsheet row; every cell is read as text and parsed afterwards.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AssetRow {
    name: Option<String>,
    symbol: Option<String>,
    currency: Option<String>,
    shares: Option<String>,
    price: Option<String>,
    fx: Option<String>,
    #[serde(rename = "type")]
    asset_type: Option<String>,
    #[serde(rename = "52w_high")]
    high_52w: Option<String>,
    #[serde(rename = "52w_low")]
    low_52w: Option<String>,
    #[serde(rename = "3y_low")]
    low_3y: Option<String>,
    pe: Option<String>,
    #[serde(rename = "yield")]
    dividend_yield: Option<String>,
    target: Option<String>,
    pe_p25: Option<String>,
    pe_p75: Option<String>,
    pricing: Option<String>,
}

impl AssetRow {
    fn is_blank(&self) -> bool {
        let text = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        !text(&self.name) && !text(&self.symbol)
    }

    fn into_record(self, row: usize) -> Result<AssetRecord, TraitError> {
        let symbol = self.symbol.as_deref().unwrap_or_default().trim().to_string();
        let name = match self.name.as_deref().map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => symbol.clone(),
        };

        let currency_code = self.currency.as_deref().unwrap_or_default().trim();
        let currency = Currency::from_code(currency_code).ok_or_else(|| {
            TraitError::InvalidInput(format!("row {row}: unknown currency '{currency_code}'"))
        })?;

        let asset_type = AssetType::from_label(self.asset_type.as_deref().unwrap_or_default());
        if asset_type == AssetType::Unknown {
            debug!(row, symbol = %symbol, label = ?self.asset_type, "Unrecognized asset type");
        }

        let shares = parse::decimal(self.shares.as_deref(), "shares", row)?.unwrap_or(Decimal::ZERO);
        let mut record = AssetRecord::new(name, symbol, currency, asset_type, shares);

        if let Some(external) = pricing_mode(self.pricing.as_deref(), row)? {
            record = record.with_external_price(external);
        }

        let market = &mut record.market;
        market.price = parse::positive_decimal(self.price.as_deref(), "price", row)?;
        market.fx_rate = parse::positive_decimal(self.fx.as_deref(), "fx", row)?;
        market.high_52w = parse::positive_decimal(self.high_52w.as_deref(), "52w_high", row)?;
        market.low_52w = parse::positive_decimal(self.low_52w.as_deref(), "52w_low", row)?;
        market.low_3y = parse::positive_decimal(self.low_3y.as_deref(), "3y_low", row)?;
        market.pe_ratio = parse::positive_f64(self.pe.as_deref(), "pe", row)?;
        market.pe_p25 = parse::positive_f64(self.pe_p25.as_deref(), "pe_p25", row)?;
        market.pe_p75 = parse::positive_f64(self.pe_p75.as_deref(), "pe_p75", row)?;
        market.dividend_yield =
            parse::non_negative_fraction(self.dividend_yield.as_deref(), "yield", row)?;

        record.target_override = parse::fraction(self.target.as_deref(), "target", row)?;

        record
            .validate()
            .map_err(|e| TraitError::InvalidInput(format!("row {row}: {e}")))?;
        Ok(record)
    }
}

/// `None` keeps the type's default pricing mode.
fn pricing_mode(raw: Option<&str>, row: usize) -> Result<Option<bool>, TraitError> {
    match raw.map(|s| s.trim().to_lowercase()).as_deref() {
        None | Some("") => Ok(None),
        Some("market" | "live" | "external") => Ok(Some(true)),
        Some("nominal" | "static" | "manual") => Ok(Some(false)),
        Some(other) => Err(TraitError::InvalidInput(format!(
            "row {row}: pricing must be 'market' or 'nominal', got '{other}'"
        ))),
    }
}

fn normalize_headers(headers: &StringRecord) -> Result<StringRecord, TraitError> {
    let normalized: StringRecord = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|c| !normalized.iter().any(|h| h == *c))
        .collect();
    if !missing.is_empty() {
        return Err(TraitError::InvalidInput(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(normalized)
}

// =============================================================================
// LOADER
// =============================================================================

/// Loads holdings from a CSV exported from the portfolio spreadsheet.
///
/// Expected columns: `name,symbol,currency,shares,price,fx,type,52w_high,
/// 52w_low,3y_low,pe,yield`, plus optional `target,pe_p25,pe_p75,pricing`.
/// Header names are matched case-insensitively.
#[derive(Debug, Clone)]
pub struct CsvAssetLoader {
    file_path: PathBuf,
}

impl CsvAssetLoader {
    /// Create a loader for the given file.
    pub fn new(file_path: impl AsRef<Path>) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
        }
    }

    /// Path this loader reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read and parse the file.
    pub fn load(&self) -> Result<Vec<AssetRecord>, TraitError> {
        let file = std::fs::File::open(&self.file_path).map_err(|e| {
            TraitError::IoError(format!("{}: {e}", self.file_path.display()))
        })?;
        let assets = Self::from_reader(file)?;
        info!(
            path = %self.file_path.display(),
            assets = assets.len(),
            "Loaded asset list"
        );
        Ok(assets)
    }

    /// Parse CSV content from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<AssetRecord>, TraitError> {
        let mut reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| TraitError::ParseError(e.to_string()))?
            .clone();
        reader.set_headers(normalize_headers(&headers)?);

        let mut assets = Vec::new();
        for (i, result) in reader.deserialize::<AssetRow>().enumerate() {
            // header is line 1
            let row = i + 2;
            let record = result.map_err(|e| TraitError::ParseError(format!("row {row}: {e}")))?;
            if record.is_blank() {
                continue;
            }
            assets.push(record.into_record(row)?);
        }
        Ok(assets)
    }
}
