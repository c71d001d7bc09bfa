//! CLI command implementations.

pub mod config;
pub mod report;
pub mod targets;

// Re-export submodules for convenience
pub use config::ConfigArgs;
pub use report::ReportArgs;
pub use targets::TargetsArgs;

use std::path::PathBuf;

use clap::Args;
use tracing::debug;

use rebal_core::types::Currency;
use rebal_ext_file::{create_file_market_data, CsvAssetLoader, EmptyMarketDataSource};
use rebal_portfolio::{run_pipeline, PipelineConfig, PortfolioReport};
use rebal_traits::MarketDataSource;

use crate::error::{CliError, CliResult};

/// Inputs shared by every command that runs the pipeline.
#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// Asset list CSV exported from the portfolio spreadsheet
    #[arg(short, long)]
    pub assets: PathBuf,

    /// Quote snapshot CSV (symbol,price,52w_high,52w_low,pe,yield)
    #[arg(long)]
    pub quotes: Option<PathBuf>,

    /// FX rate CSV (currency,rate)
    #[arg(long, requires = "quotes")]
    pub fx: Option<PathBuf>,

    /// P/E history CSV (symbol,pe), used where the asset file has no P/E band
    #[arg(long, requires = "quotes")]
    pub pe_history: Option<PathBuf>,

    /// Currency the FX file is quoted against
    #[arg(long, default_value = "THB")]
    pub fx_base: String,

    /// Configuration file (TOML)
    #[arg(short, long, env = "REBAL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Command-line overrides applied on top of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Fraction of the portfolio held in investment assets (0-1)
    #[arg(long)]
    pub investment: Option<f64>,

    /// Gold share of the reserve (0-1)
    #[arg(long)]
    pub gold: Option<f64>,

    /// Absolute drift threshold (fraction of the portfolio)
    #[arg(long)]
    pub abs_threshold: Option<f64>,

    /// Relative drift threshold (fraction of the target)
    #[arg(long)]
    pub rel_threshold: Option<f64>,

    /// Base currency for valuation
    #[arg(long)]
    pub base_currency: Option<String>,

    /// Keep merged types as individual rows
    #[arg(long)]
    pub no_summarize: bool,

    /// Ignore market data and use the static values in the asset file
    #[arg(long)]
    pub offline: bool,
}

impl ConfigOverrides {
    /// Applies the overrides to a loaded configuration.
    pub fn apply(&self, mut config: PipelineConfig) -> CliResult<PipelineConfig> {
        if let Some(v) = self.investment {
            config.risk = config.risk.with_investment_fraction(v);
        }
        if let Some(v) = self.gold {
            config.risk = config.risk.with_gold_fraction(v);
        }
        if let Some(v) = self.abs_threshold {
            config.drift.absolute = v;
        }
        if let Some(v) = self.rel_threshold {
            config.drift.relative = v;
        }
        if let Some(code) = &self.base_currency {
            config.base_currency = parse_currency(code)?;
        }
        if self.no_summarize {
            config.summarize = false;
        }
        if self.offline {
            config.use_live_data = false;
        }
        config.validate()?;
        Ok(config)
    }
}

/// Parses a currency code given on the command line.
pub fn parse_currency(code: &str) -> CliResult<Currency> {
    Currency::from_code(code)
        .ok_or_else(|| CliError::InvalidArgument(format!("unknown currency '{code}'")))
}

/// Loads the configuration file (or defaults) and applies overrides.
pub fn load_config(path: Option<&PathBuf>, overrides: &ConfigOverrides) -> CliResult<PipelineConfig> {
    let config = match path {
        Some(p) => PipelineConfig::from_file(p)?,
        None => PipelineConfig::default(),
    };
    overrides.apply(config)
}

/// Opens the market data source selected by the arguments.
fn open_source(args: &InputArgs, config: &PipelineConfig) -> CliResult<Box<dyn MarketDataSource>> {
    match &args.quotes {
        Some(quotes) if config.use_live_data => {
            let fx_base = parse_currency(&args.fx_base)?;
            let mut source =
                create_file_market_data(quotes, args.fx.as_deref())?.with_base(fx_base);
            if let Some(path) = &args.pe_history {
                source.load_pe_history_file(path)?;
            }
            Ok(Box::new(source))
        }
        _ => {
            debug!("No market data, running offline");
            Ok(Box::new(EmptyMarketDataSource))
        }
    }
}

/// Loads inputs and runs the full pipeline.
pub fn run_report(args: &InputArgs) -> CliResult<PortfolioReport> {
    let mut config = load_config(args.config.as_ref(), &args.overrides)?;
    let assets = CsvAssetLoader::new(&args.assets).load()?;

    let source = open_source(args, &config)?;
    if !source.is_available() {
        config.use_live_data = false;
    }

    Ok(run_pipeline(assets, source.as_ref(), &config)?)
}
