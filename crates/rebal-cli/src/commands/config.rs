//! Config command implementation.
//!
//! Shows the effective configuration or writes a default one.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};

use rebal_portfolio::PipelineConfig;

use crate::cli::OutputFormat;
use crate::commands::{load_config, ConfigOverrides};
use crate::error::CliError;
use crate::output::{print_header, print_json, print_output, print_success, KeyValue};

/// Arguments for the config command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Config subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Write the default configuration to a file
    Init(InitArgs),
}

/// Arguments for show subcommand.
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Configuration file to load instead of the defaults
    #[arg(short, long, env = "REBAL_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: ConfigOverrides,
}

/// Arguments for init subcommand.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Destination path
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Execute the config command.
pub fn execute(args: ConfigArgs, format: OutputFormat) -> Result<()> {
    match args.command {
        ConfigCommand::Show(show_args) => execute_show(show_args, format),
        ConfigCommand::Init(init_args) => execute_init(init_args),
    }
}

/// Flattens the configuration into display rows.
fn config_rows(config: &PipelineConfig) -> Vec<KeyValue> {
    let merge: Vec<String> = config.merge_types.iter().map(ToString::to_string).collect();
    vec![
        KeyValue::new("base_currency", config.base_currency.to_string()),
        KeyValue::new("summarize", config.summarize.to_string()),
        KeyValue::new("merge_types", merge.join(", ")),
        KeyValue::new("use_live_data", config.use_live_data.to_string()),
        KeyValue::new("risk.investment_fraction", config.risk.investment_fraction.to_string()),
        KeyValue::new("risk.mdd_core", config.risk.mdd_core.to_string()),
        KeyValue::new("risk.mdd_growth", config.risk.mdd_growth.to_string()),
        KeyValue::new("risk.mdd_speculative", config.risk.mdd_speculative.to_string()),
        KeyValue::new(
            "risk.gold_fraction_of_reserve",
            config.risk.gold_fraction_of_reserve.to_string(),
        ),
        KeyValue::new("drift.absolute", config.drift.absolute.to_string()),
        KeyValue::new("drift.relative", config.drift.relative.to_string()),
    ]
}

/// Show the effective configuration.
fn execute_show(args: ShowArgs, format: OutputFormat) -> Result<()> {
    let config = load_config(args.config.as_ref(), &args.overrides)?;

    match format {
        OutputFormat::Table => {
            print_header("Current Configuration");
            print_output(&config_rows(&config), format)?;
        }
        OutputFormat::Json => print_json(&config)?,
        OutputFormat::Csv => print_output(&config_rows(&config), format)?,
    }

    Ok(())
}

/// Write the default configuration as TOML.
fn execute_init(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        ))
        .into());
    }

    let content = PipelineConfig::default().to_toml_string()?;
    if let Some(parent) = args.path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.path, content)?;

    print_success(&format!("Wrote {}", args.path.display()));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_rows() {
        let rows = config_rows(&PipelineConfig::default());
        assert_eq!(rows[0].value, "THB");
        assert_eq!(rows[2].value, "Bond, Cash");
        assert_eq!(rows[4].value, "0.5");
    }
}
