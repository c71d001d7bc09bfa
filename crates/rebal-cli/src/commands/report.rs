//! Report command implementation.
//!
//! Runs the full pipeline and prints per-asset results.

use anyhow::Result;
use clap::{Args, ValueEnum};
use serde::Serialize;
use tabled::Tabled;

use rebal_portfolio::{AssetRecord, PortfolioReport};

use crate::cli::OutputFormat;
use crate::commands::{run_report, InputArgs};
use crate::error::CliError;
use crate::output::{
    format_decimal, format_float, format_label, format_percent, print_header, print_info,
    print_json, print_output, print_warning, NA,
};

/// Arguments for the report command.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Which table to show
    #[arg(long, value_enum, default_value = "portfolio")]
    pub view: View,
}

/// Report sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    /// Value, weight, target and drift signal
    #[default]
    Portfolio,
    /// Price level, yield and P/E signals
    Signals,
    /// Market inputs used for valuation
    Market,
    /// Every section
    All,
}

/// Portfolio row.
#[derive(Debug, Serialize, Tabled)]
pub struct PortfolioRow {
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "Type")]
    pub asset_type: String,
    #[tabled(rename = "Ccy")]
    pub currency: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Weight")]
    pub weight: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Drift")]
    pub drift: String,
    #[tabled(rename = "Drift %")]
    pub drift_pct: String,
    #[tabled(rename = "Signal")]
    pub signal: String,
}

impl From<&AssetRecord> for PortfolioRow {
    fn from(a: &AssetRecord) -> Self {
        Self {
            symbol: a.symbol.clone(),
            name: a.name.clone(),
            asset_type: a.asset_type.to_string(),
            currency: a.currency.to_string(),
            value: format_decimal(a.value_base, 2),
            weight: format_percent(a.weight),
            target: format_percent(a.target),
            drift: format_percent(a.drift),
            drift_pct: format_percent(a.drift_pct),
            signal: a.position_signal.to_string(),
        }
    }
}

/// Market signal row.
#[derive(Debug, Serialize, Tabled)]
pub struct SignalRow {
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Type")]
    pub asset_type: String,
    #[tabled(rename = "1Y Drop")]
    pub drop_1y: String,
    #[tabled(rename = "1Y Gain")]
    pub gain_1y: String,
    #[tabled(rename = "3Y Gain")]
    pub gain_3y: String,
    #[tabled(rename = "Price")]
    pub price_signal: String,
    #[tabled(rename = "Yield")]
    pub dividend_yield: String,
    #[tabled(rename = "Req. Yield")]
    pub required_yield: String,
    #[tabled(rename = "Yield Signal")]
    pub yield_signal: String,
    #[tabled(rename = "P/E")]
    pub pe: String,
    #[tabled(rename = "P/E Band")]
    pub pe_band: String,
    #[tabled(rename = "P/E Signal")]
    pub pe_signal: String,
}

impl From<&AssetRecord> for SignalRow {
    fn from(a: &AssetRecord) -> Self {
        let pe_band = match (a.market.pe_p25, a.market.pe_p75) {
            (Some(lo), Some(hi)) => format!("{lo:.1}-{hi:.1}"),
            _ => NA.to_string(),
        };
        Self {
            symbol: a.symbol.clone(),
            asset_type: a.asset_type.to_string(),
            drop_1y: format_percent(a.drop_1y),
            gain_1y: format_percent(a.gain_1y),
            gain_3y: format_percent(a.gain_3y),
            price_signal: format_label(a.price_signal),
            dividend_yield: format_percent(a.market.dividend_yield),
            required_yield: format_percent(a.required_yield),
            yield_signal: format_label(a.yield_signal),
            pe: format_float(a.market.pe_ratio, 1),
            pe_band,
            pe_signal: format_label(a.pe_signal),
        }
    }
}

/// Market input row.
#[derive(Debug, Serialize, Tabled)]
pub struct MarketRow {
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Shares")]
    pub shares: String,
    #[tabled(rename = "Price")]
    pub price: String,
    #[tabled(rename = "FX")]
    pub fx_rate: String,
    #[tabled(rename = "Local Value")]
    pub value_local: String,
    #[tabled(rename = "52W High")]
    pub high_52w: String,
    #[tabled(rename = "52W Low")]
    pub low_52w: String,
    #[tabled(rename = "3Y Low")]
    pub low_3y: String,
    #[tabled(rename = "Pricing")]
    pub pricing: String,
}

impl From<&AssetRecord> for MarketRow {
    fn from(a: &AssetRecord) -> Self {
        let pricing = if a.summary {
            format!("merged ({})", a.merged_count)
        } else if a.uses_external_price {
            "market".to_string()
        } else {
            "nominal".to_string()
        };
        Self {
            symbol: a.symbol.clone(),
            shares: a.shares.normalize().to_string(),
            price: format_decimal(a.market.price, 2),
            fx_rate: format_decimal(a.market.fx_rate, 4),
            value_local: format_decimal(a.value_local, 2),
            high_52w: format_decimal(a.market.high_52w, 2),
            low_52w: format_decimal(a.market.low_52w, 2),
            low_3y: format_decimal(a.market.low_3y, 2),
            pricing,
        }
    }
}

fn rows<'a, T: From<&'a AssetRecord>>(report: &'a PortfolioReport) -> Vec<T> {
    report.assets.iter().map(T::from).collect()
}

/// Execute the report command.
pub fn execute(args: ReportArgs, format: OutputFormat) -> Result<()> {
    if format == OutputFormat::Csv && args.view == View::All {
        return Err(CliError::InvalidArgument(
            "CSV output needs a single --view (portfolio, signals or market)".into(),
        )
        .into());
    }

    let report = run_report(&args.input)?;

    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Csv => print_view(&report, args.view, format)?,
        OutputFormat::Table => {
            print_view(&report, args.view, format)?;
            print_summary(&report);
        }
    }

    Ok(())
}

fn print_view(report: &PortfolioReport, view: View, format: OutputFormat) -> Result<()> {
    let table = format == OutputFormat::Table;
    let ccy = report.base_currency;

    if matches!(view, View::Portfolio | View::All) {
        if table {
            print_header(&format!("Portfolio ({ccy})"));
        }
        print_output(&rows::<PortfolioRow>(report), format)?;
    }
    if matches!(view, View::Signals | View::All) {
        if table {
            print_header("Market Signals");
        }
        print_output(&rows::<SignalRow>(report), format)?;
    }
    if matches!(view, View::Market | View::All) {
        if table {
            print_header("Market Inputs");
        }
        print_output(&rows::<MarketRow>(report), format)?;
    }
    Ok(())
}

fn print_summary(report: &PortfolioReport) {
    println!();
    print_info(&format!(
        "Total value: {} {}",
        format_decimal(Some(report.total_value), 2),
        report.base_currency
    ));

    let actionable = report.actionable();
    if !actionable.is_empty() {
        let symbols: Vec<&str> = actionable.iter().map(|a| a.symbol.as_str()).collect();
        print_info(&format!("Rebalance: {}", symbols.join(", ")));
    }

    match &report.allocation {
        Ok(allocation) => {
            for warning in &allocation.warnings {
                print_warning(&warning.to_string());
            }
        }
        Err(e) => print_warning(&format!("Targets unavailable: {e}")),
    }

    let unvalued = report.unvalued();
    if !unvalued.is_empty() {
        let symbols: Vec<&str> = unvalued.iter().map(|a| a.symbol.as_str()).collect();
        print_warning(&format!("No value for: {}", symbols.join(", ")));
    }

    if report.enrichment.offline {
        print_info("Offline: using prices from the asset file");
    }
}
