//! Targets command implementation.
//!
//! Shows actual vs target weight per asset type.

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use rebal_portfolio::{AllocationError, PortfolioReport, TargetAllocation, TypeWeight};

use crate::cli::OutputFormat;
use crate::commands::{run_report, InputArgs};
use crate::output::{
    format_decimal, format_percent, print_header, print_json, print_output, print_warning, KeyValue,
};

/// Arguments for the targets command.
#[derive(Args, Debug)]
pub struct TargetsArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

/// Per-type row.
#[derive(Debug, Serialize, Tabled)]
pub struct TypeRow {
    #[tabled(rename = "Type")]
    pub asset_type: String,
    #[tabled(rename = "Rows")]
    pub count: usize,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Weight")]
    pub weight: String,
    #[tabled(rename = "Target")]
    pub target: String,
    #[tabled(rename = "Gap")]
    pub gap: String,
}

impl From<&TypeWeight> for TypeRow {
    fn from(t: &TypeWeight) -> Self {
        let gap = match (t.weight, t.target) {
            (Some(w), Some(target)) => Some(w - target),
            _ => None,
        };
        Self {
            asset_type: t.asset_type.to_string(),
            count: t.count,
            value: format_decimal(Some(t.value), 2),
            weight: format_percent(t.weight),
            target: format_percent(t.target),
            gap: format_percent(gap),
        }
    }
}

#[derive(Serialize)]
struct TargetsOutput<'a> {
    allocation: &'a Result<TargetAllocation, AllocationError>,
    by_type: Vec<TypeWeight>,
}

fn allocation_summary(allocation: &TargetAllocation) -> Vec<KeyValue> {
    vec![
        KeyValue::from_percent("Investment", allocation.investment_fraction),
        KeyValue::from_percent("Reserve", allocation.reserve_fraction),
        KeyValue::from_percent("Weighted MDD", allocation.weighted_mdd),
        KeyValue::from_percent("Portfolio MDD", allocation.mdd_investment),
        KeyValue::new("Overrides", allocation.overrides.to_string()),
    ]
}

/// Execute the targets command.
pub fn execute(args: TargetsArgs, format: OutputFormat) -> Result<()> {
    let report = run_report(&args.input)?;
    let by_type = report.by_type();

    match format {
        OutputFormat::Json => print_json(&TargetsOutput {
            allocation: &report.allocation,
            by_type,
        })?,
        OutputFormat::Csv => {
            let rows: Vec<TypeRow> = by_type.iter().map(TypeRow::from).collect();
            print_output(&rows, format)?;
        }
        OutputFormat::Table => print_tables(&report, &by_type)?,
    }

    Ok(())
}

fn print_tables(report: &PortfolioReport, by_type: &[TypeWeight]) -> Result<()> {
    let rows: Vec<TypeRow> = by_type.iter().map(TypeRow::from).collect();
    print_header(&format!("Allocation by Type ({})", report.base_currency));
    print_output(&rows, OutputFormat::Table)?;

    match &report.allocation {
        Ok(allocation) => {
            print_header("Allocation");
            print_output(&allocation_summary(allocation), OutputFormat::Table)?;
            for warning in &allocation.warnings {
                print_warning(&warning.to_string());
            }
        }
        Err(e) => print_warning(&format!("Targets unavailable: {e}")),
    }
    Ok(())
}
