//! Configuration for the rebalancing pipeline.

use crate::error::{PortfolioError, PortfolioResult};
use rebal_core::types::{AssetType, Currency};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Risk preferences driving target allocation and price/yield signals.
///
/// All fractions are on a 0-1 scale. Drawdowns are negative fractions
/// (-0.25 for a 25% peak-to-trough loss).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskProfile {
    /// Share of the portfolio held in investment assets.
    pub investment_fraction: f64,

    /// Assumed maximum drawdown for Core assets.
    pub mdd_core: f64,

    /// Assumed maximum drawdown for Growth assets.
    pub mdd_growth: f64,

    /// Assumed maximum drawdown for Speculative assets.
    pub mdd_speculative: f64,

    /// Share of the reserve held in Gold.
    pub gold_fraction_of_reserve: f64,
}

impl Default for RiskProfile {
    fn default() -> Self {
        Self {
            investment_fraction: 0.5,
            mdd_core: -0.25,
            mdd_growth: -0.50,
            mdd_speculative: -0.70,
            gold_fraction_of_reserve: 0.20,
        }
    }
}

impl RiskProfile {
    /// Number of periods a drawdown should be recovered within.
    pub const RECOVERY_PERIODS: i32 = 3;

    /// Number of periods dividends should offset a drawdown within.
    pub const YIELD_OFFSET_PERIODS: f64 = 5.0;

    /// Creates a profile with default assumptions.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the investment fraction.
    #[must_use]
    pub fn with_investment_fraction(mut self, fraction: f64) -> Self {
        self.investment_fraction = fraction;
        self
    }

    /// Sets the drawdown assumption for an investment type. Other types are ignored.
    #[must_use]
    pub fn with_mdd(mut self, asset_type: AssetType, mdd: f64) -> Self {
        match asset_type {
            AssetType::Core => self.mdd_core = mdd,
            AssetType::Growth => self.mdd_growth = mdd,
            AssetType::Speculative => self.mdd_speculative = mdd,
            _ => {}
        }
        self
    }

    /// Sets the gold share of the reserve.
    #[must_use]
    pub fn with_gold_fraction(mut self, fraction: f64) -> Self {
        self.gold_fraction_of_reserve = fraction;
        self
    }

    /// Share of the portfolio held in reserve assets.
    #[must_use]
    pub fn reserve_fraction(&self) -> f64 {
        1.0 - self.investment_fraction
    }

    /// Assumed maximum drawdown, for investment types only.
    #[must_use]
    pub fn mdd(&self, asset_type: AssetType) -> Option<f64> {
        match asset_type {
            AssetType::Core => Some(self.mdd_core),
            AssetType::Growth => Some(self.mdd_growth),
            AssetType::Speculative => Some(self.mdd_speculative),
            _ => None,
        }
    }

    /// Annual growth needed to recover from the drawdown within three periods.
    ///
    /// `(1 / (1 + mdd))^(1/3) − 1`
    #[must_use]
    pub fn required_cagr(&self, asset_type: AssetType) -> Option<f64> {
        self.mdd(asset_type)
            .map(|mdd| (1.0 / (1.0 + mdd)).powf(1.0 / f64::from(Self::RECOVERY_PERIODS)) - 1.0)
    }

    /// Dividend yield needed to offset the drawdown within five periods.
    ///
    /// `|mdd| / 5`
    #[must_use]
    pub fn required_yield(&self, asset_type: AssetType) -> Option<f64> {
        self.mdd(asset_type)
            .map(|mdd| mdd.abs() / Self::YIELD_OFFSET_PERIODS)
    }

    /// Checks every fraction is in range.
    pub fn validate(&self) -> PortfolioResult<()> {
        let f = self.investment_fraction;
        if !(f > 0.0 && f < 1.0) {
            return Err(PortfolioError::invalid_config(format!(
                "investment_fraction must be within (0, 1), got {f}"
            )));
        }
        for (name, mdd) in [
            ("mdd_core", self.mdd_core),
            ("mdd_growth", self.mdd_growth),
            ("mdd_speculative", self.mdd_speculative),
        ] {
            if !(mdd > -1.0 && mdd <= 0.0) {
                return Err(PortfolioError::invalid_config(format!(
                    "{name} must be within (-1, 0], got {mdd}"
                )));
            }
        }
        let g = self.gold_fraction_of_reserve;
        if !(0.0..=1.0).contains(&g) {
            return Err(PortfolioError::invalid_config(format!(
                "gold_fraction_of_reserve must be within [0, 1], got {g}"
            )));
        }
        Ok(())
    }
}

/// Drift thresholds. Either breach triggers a signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriftThresholds {
    /// Absolute drift in weight (0.05 = 5 percentage points).
    pub absolute: f64,

    /// Drift relative to target (0.50 = 50% of target).
    pub relative: f64,
}

impl Default for DriftThresholds {
    fn default() -> Self {
        Self {
            absolute: 0.05,
            relative: 0.50,
        }
    }
}

impl DriftThresholds {
    /// Creates thresholds.
    #[must_use]
    pub fn new(absolute: f64, relative: f64) -> Self {
        Self { absolute, relative }
    }

    /// Checks both thresholds are non-negative.
    pub fn validate(&self) -> PortfolioResult<()> {
        if !(self.absolute >= 0.0 && self.relative >= 0.0) {
            return Err(PortfolioError::invalid_config(format!(
                "drift thresholds must be non-negative, got absolute={} relative={}",
                self.absolute, self.relative
            )));
        }
        Ok(())
    }
}

/// Configuration for one pipeline run.
///
/// Passed explicitly into [`run_pipeline`](crate::run_pipeline); never global.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Currency all values are normalized into.
    pub base_currency: Currency,

    /// Collapse holdings of the merge types into one row per type.
    pub summarize: bool,

    /// Types collapsed when `summarize` is on.
    pub merge_types: Vec<AssetType>,

    /// Ask the market data source for live values.
    /// If false, only loaded (static) values are used.
    pub use_live_data: bool,

    /// Risk preferences.
    pub risk: RiskProfile,

    /// Drift thresholds.
    pub drift: DriftThresholds,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            base_currency: Currency::THB,
            summarize: true,
            merge_types: vec![AssetType::Bond, AssetType::Cash],
            use_live_data: true,
            risk: RiskProfile::default(),
            drift: DriftThresholds::default(),
        }
    }
}

impl PipelineConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from TOML. Missing keys take their defaults.
    pub fn from_toml_str(content: &str) -> PortfolioResult<Self> {
        toml::from_str(content).map_err(|e| PortfolioError::invalid_config(e.to_string()))
    }

    /// Loads a config from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> PortfolioResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PortfolioError::config_file(path.display().to_string(), e.to_string()))?;
        toml::from_str(&content)
            .map_err(|e| PortfolioError::config_file(path.display().to_string(), e.to_string()))
    }

    /// Renders the config as TOML.
    pub fn to_toml_string(&self) -> PortfolioResult<String> {
        toml::to_string_pretty(self).map_err(|e| PortfolioError::invalid_config(e.to_string()))
    }

    /// Sets the base currency.
    #[must_use]
    pub fn with_base_currency(mut self, currency: Currency) -> Self {
        self.base_currency = currency;
        self
    }

    /// Sets the risk profile.
    #[must_use]
    pub fn with_risk(mut self, risk: RiskProfile) -> Self {
        self.risk = risk;
        self
    }

    /// Sets the drift thresholds.
    #[must_use]
    pub fn with_drift(mut self, drift: DriftThresholds) -> Self {
        self.drift = drift;
        self
    }

    /// Sets whether merge types are summarized.
    #[must_use]
    pub fn with_summarize(mut self, summarize: bool) -> Self {
        self.summarize = summarize;
        self
    }

    /// Sets the merge types.
    #[must_use]
    pub fn with_merge_types(mut self, types: Vec<AssetType>) -> Self {
        self.merge_types = types;
        self
    }

    /// Sets whether live data is requested.
    #[must_use]
    pub fn with_live_data(mut self, enabled: bool) -> Self {
        self.use_live_data = enabled;
        self
    }

    /// Validates the risk profile and drift thresholds.
    pub fn validate(&self) -> PortfolioResult<()> {
        self.risk.validate()?;
        self.drift.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::io::Write;

    #[test]
    fn test_default() {
        let config = PipelineConfig::default();
        assert_eq!(config.base_currency, Currency::THB);
        assert!(config.summarize);
        assert!(config.use_live_data);
        assert_eq!(config.merge_types, vec![AssetType::Bond, AssetType::Cash]);
        assert_relative_eq!(config.risk.investment_fraction, 0.5);
        assert_relative_eq!(config.drift.absolute, 0.05);
        assert_relative_eq!(config.drift.relative, 0.50);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_required_cagr_and_yield() {
        let risk = RiskProfile::default();

        // -25% needs 1/0.75 over three periods
        let cagr = risk.required_cagr(AssetType::Core).unwrap();
        assert_relative_eq!((1.0 + cagr).powi(3), 1.0 / 0.75, epsilon = 1e-12);

        // -50% doubles over three periods
        let cagr = risk.required_cagr(AssetType::Growth).unwrap();
        assert_relative_eq!(cagr, 2f64.powf(1.0 / 3.0) - 1.0, epsilon = 1e-12);

        assert_relative_eq!(risk.required_yield(AssetType::Core).unwrap(), 0.05);
        assert_relative_eq!(risk.required_yield(AssetType::Speculative).unwrap(), 0.14, epsilon = 1e-12);

        assert!(risk.required_cagr(AssetType::Cash).is_none());
        assert!(risk.required_yield(AssetType::Unknown).is_none());
    }

    #[test]
    fn test_risk_validation() {
        assert!(RiskProfile::new().with_investment_fraction(0.0).validate().is_err());
        assert!(RiskProfile::new().with_investment_fraction(1.0).validate().is_err());
        assert!(RiskProfile::new().with_investment_fraction(0.75).validate().is_ok());
        assert!(RiskProfile::new().with_mdd(AssetType::Core, 0.1).validate().is_err());
        assert!(RiskProfile::new().with_mdd(AssetType::Growth, -1.0).validate().is_err());
        assert!(RiskProfile::new().with_gold_fraction(1.2).validate().is_err());
        assert!(RiskProfile::new().with_investment_fraction(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_drift_validation() {
        assert!(DriftThresholds::new(0.0, 0.0).validate().is_ok());
        assert!(DriftThresholds::new(-0.01, 0.5).validate().is_err());
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_base_currency(Currency::USD)
            .with_risk(RiskProfile::new().with_investment_fraction(0.6))
            .with_drift(DriftThresholds::new(0.03, 0.25))
            .with_summarize(false)
            .with_merge_types(vec![AssetType::Cash])
            .with_live_data(false);

        assert_eq!(config.base_currency, Currency::USD);
        assert_relative_eq!(config.risk.reserve_fraction(), 0.4, epsilon = 1e-12);
        assert_relative_eq!(config.drift.relative, 0.25);
        assert!(!config.summarize);
        assert!(!config.use_live_data);
    }

    #[test]
    fn test_partial_toml() {
        let config = PipelineConfig::from_toml_str(
            r#"
            base_currency = "USD"

            [risk]
            investment_fraction = 0.7
            "#,
        )
        .unwrap();

        assert_eq!(config.base_currency, Currency::USD);
        assert_relative_eq!(config.risk.investment_fraction, 0.7);
        assert_relative_eq!(config.risk.mdd_core, -0.25);
        assert!(config.summarize);
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = PipelineConfig::default().with_summarize(false);
        let text = config.to_toml_string().unwrap();
        let parsed = PipelineConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "summarize = false\n\n[drift]\nabsolute = 0.1").unwrap();

        let config = PipelineConfig::from_file(file.path()).unwrap();
        assert!(!config.summarize);
        assert_relative_eq!(config.drift.absolute, 0.1);
        assert_relative_eq!(config.drift.relative, 0.5);

        let missing = PipelineConfig::from_file("/nonexistent/rebal.toml");
        assert!(matches!(missing, Err(PortfolioError::ConfigFile { .. })));
    }

    #[test]
    fn test_bad_toml() {
        let err = PipelineConfig::from_toml_str("summarize = \"yes\"").unwrap_err();
        assert!(matches!(err, PortfolioError::InvalidConfig { .. }));
    }
}
