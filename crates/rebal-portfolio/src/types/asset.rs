//! Asset record: one holding flowing through the pipeline.

use crate::error::{PortfolioError, PortfolioResult};
use rebal_core::types::{AssetType, Currency, PeSignal, PositionSignal, PriceSignal, YieldSignal};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Market inputs for an asset.
///
/// Loaded values act as the static fallback; enrichment overwrites a field
/// only when the market data source returns a usable value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketInputs {
    /// Last price in the asset's currency.
    pub price: Option<Decimal>,

    /// Units of base currency per unit of the asset's currency.
    pub fx_rate: Option<Decimal>,

    /// 52-week high.
    pub high_52w: Option<Decimal>,

    /// 52-week low.
    pub low_52w: Option<Decimal>,

    /// 3-year low. Static only.
    pub low_3y: Option<Decimal>,

    /// Trailing P/E.
    pub pe_ratio: Option<f64>,

    /// 25th percentile of historical P/E.
    pub pe_p25: Option<f64>,

    /// 75th percentile of historical P/E.
    pub pe_p75: Option<f64>,

    /// Trailing dividend yield (as decimal, e.g., 0.035 for 3.5%).
    pub dividend_yield: Option<f64>,
}

impl MarketInputs {
    /// Creates empty inputs.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A single holding and everything the pipeline derives for it.
///
/// Records are created fresh each run and each stage fills in its own block
/// of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    // =========================================================================
    // IDENTITY
    // =========================================================================
    /// Display name.
    pub name: String,

    /// Ticker or internal symbol.
    pub symbol: String,

    /// Trading currency.
    pub currency: Currency,

    /// Asset category.
    pub asset_type: AssetType,

    /// Number of shares or units held.
    pub shares: Decimal,

    /// Whether the price comes from the market data source.
    ///
    /// When false the static price is used, or 1 if there is none.
    pub uses_external_price: bool,

    /// Fixed target weight that replaces the computed one.
    pub target_override: Option<f64>,

    /// Number of source rows this record stands for.
    pub merged_count: usize,

    /// True for the synthetic rows produced by summarization.
    pub summary: bool,

    // =========================================================================
    // MARKET INPUTS
    // =========================================================================
    /// Price, FX and fundamentals.
    pub market: MarketInputs,

    // =========================================================================
    // VALUATION
    // =========================================================================
    /// `shares × price`.
    pub value_local: Option<Decimal>,

    /// `value_local × fx_rate`.
    pub value_base: Option<Decimal>,

    // =========================================================================
    // ALLOCATION
    // =========================================================================
    /// Target weight (0-1).
    pub target: Option<f64>,

    /// Actual weight (0-1).
    pub weight: Option<f64>,

    // =========================================================================
    // SIGNALS
    // =========================================================================
    /// `weight − target`.
    pub drift: Option<f64>,

    /// `drift / target`.
    pub drift_pct: Option<f64>,

    /// Position-size classification.
    pub position_signal: PositionSignal,

    /// Price change from the 52-week high.
    pub drop_1y: Option<f64>,

    /// Price change from the 52-week low.
    pub gain_1y: Option<f64>,

    /// Price change from the 3-year low.
    pub gain_3y: Option<f64>,

    /// Price-level classification.
    pub price_signal: Option<PriceSignal>,

    /// Dividend yield needed to offset the assumed drawdown.
    pub required_yield: Option<f64>,

    /// Yield sufficiency classification.
    pub yield_signal: Option<YieldSignal>,

    /// P/E band classification.
    pub pe_signal: Option<PeSignal>,
}

impl AssetRecord {
    /// Creates a record with no market data.
    ///
    /// Cash and Bond default to nominal pricing; everything else is priced
    /// from the market.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        currency: Currency,
        asset_type: AssetType,
        shares: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
            currency,
            asset_type,
            shares,
            uses_external_price: default_uses_external_price(asset_type),
            target_override: None,
            merged_count: 1,
            summary: false,
            market: MarketInputs::default(),
            value_local: None,
            value_base: None,
            target: None,
            weight: None,
            drift: None,
            drift_pct: None,
            position_signal: PositionSignal::Unknown,
            drop_1y: None,
            gain_1y: None,
            gain_3y: None,
            price_signal: None,
            required_yield: None,
            yield_signal: None,
            pe_signal: None,
        }
    }

    /// Sets the pricing mode.
    #[must_use]
    pub fn with_external_price(mut self, external: bool) -> Self {
        self.uses_external_price = external;
        self
    }

    /// Sets all market inputs at once.
    #[must_use]
    pub fn with_market(mut self, market: MarketInputs) -> Self {
        self.market = market;
        self
    }

    /// Sets the price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.market.price = Some(price);
        self
    }

    /// Sets the FX rate.
    #[must_use]
    pub fn with_fx_rate(mut self, rate: Decimal) -> Self {
        self.market.fx_rate = Some(rate);
        self
    }

    /// Sets the 52-week high and low.
    #[must_use]
    pub fn with_range_52w(mut self, high: Decimal, low: Decimal) -> Self {
        self.market.high_52w = Some(high);
        self.market.low_52w = Some(low);
        self
    }

    /// Sets the 3-year low.
    #[must_use]
    pub fn with_low_3y(mut self, low: Decimal) -> Self {
        self.market.low_3y = Some(low);
        self
    }

    /// Sets the trailing P/E.
    #[must_use]
    pub fn with_pe_ratio(mut self, pe: f64) -> Self {
        self.market.pe_ratio = Some(pe);
        self
    }

    /// Sets the historical P/E band.
    #[must_use]
    pub fn with_pe_band(mut self, p25: f64, p75: f64) -> Self {
        self.market.pe_p25 = Some(p25);
        self.market.pe_p75 = Some(p75);
        self
    }

    /// Sets the dividend yield.
    #[must_use]
    pub fn with_dividend_yield(mut self, dividend_yield: f64) -> Self {
        self.market.dividend_yield = Some(dividend_yield);
        self
    }

    /// Sets a fixed target weight.
    #[must_use]
    pub fn with_target_override(mut self, target: f64) -> Self {
        self.target_override = Some(target);
        self
    }

    /// Returns the price as f64.
    #[must_use]
    pub fn price_f64(&self) -> Option<f64> {
        self.market.price.and_then(|p| p.to_f64())
    }

    /// Returns the base-currency value as f64.
    #[must_use]
    pub fn value_base_f64(&self) -> Option<f64> {
        self.value_base.and_then(|v| v.to_f64())
    }

    /// Returns true when the record has a base-currency value.
    #[must_use]
    pub fn is_valued(&self) -> bool {
        self.value_base.is_some()
    }

    /// Checks the loaded fields for values the pipeline cannot work with.
    pub fn validate(&self) -> PortfolioResult<()> {
        if self.symbol.trim().is_empty() {
            return Err(PortfolioError::missing_field("symbol"));
        }
        if self.shares.is_sign_negative() {
            return Err(PortfolioError::invalid_asset(
                &self.symbol,
                format!("shares must be non-negative, got {}", self.shares),
            ));
        }
        if let Some(target) = self.target_override {
            if !(0.0..=1.0).contains(&target) {
                return Err(PortfolioError::invalid_asset(
                    &self.symbol,
                    format!("target override must be within [0, 1], got {target}"),
                ));
            }
        }
        let floats = [
            ("pe", self.market.pe_ratio),
            ("pe_p25", self.market.pe_p25),
            ("pe_p75", self.market.pe_p75),
            ("yield", self.market.dividend_yield),
        ];
        for (field, value) in floats {
            if matches!(value, Some(v) if !v.is_finite()) {
                return Err(PortfolioError::invalid_asset(
                    &self.symbol,
                    format!("{field} is not a finite number"),
                ));
            }
        }
        Ok(())
    }
}

/// Default pricing mode for a type: Cash and Bond are held at nominal value.
#[must_use]
pub fn default_uses_external_price(asset_type: AssetType) -> bool {
    !matches!(asset_type, AssetType::Cash | AssetType::Bond)
}
