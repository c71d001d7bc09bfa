//! Rebal CLI - rebalancing report for a personal portfolio.
//!
//! # Usage
//!
//! ```bash
//! # Full report from a spreadsheet export and a quote snapshot
//! rebal report --assets assets.csv --quotes quotes.csv --fx fx.csv
//!
//! # Price and valuation signals only, as JSON
//! rebal --format json report --assets assets.csv --quotes quotes.csv --view signals
//!
//! # Type-level targets with a more defensive split
//! rebal targets --assets assets.csv --investment 0.4
//!
//! # Write the default configuration
//! rebal config init rebal.toml
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod cli;
mod commands;
mod error;
mod output;

use cli::{Cli, Commands};

fn init_tracing(verbose: u8, quiet: bool) {
    let default = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn,rebal=info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.quiet);

    let format = cli.format;

    match cli.command {
        Commands::Report(args) => commands::report::execute(args, format)?,
        Commands::Targets(args) => commands::targets::execute(args, format)?,
        Commands::Config(args) => commands::config::execute(args, format)?,
    }

    Ok(())
}
