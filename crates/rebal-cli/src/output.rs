//! Output formatting utilities.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

use crate::cli::OutputFormat;
use crate::error::CliResult;

/// Placeholder for undefined values.
pub const NA: &str = "-";

/// Formats and prints rows based on the specified format.
pub fn print_output<T: Serialize + Tabled>(data: &[T], format: OutputFormat) -> CliResult<()> {
    match format {
        OutputFormat::Table => print_table(data),
        OutputFormat::Json => print_json(data),
        OutputFormat::Csv => print_csv(data),
    }
}

/// Prints any serializable value as pretty JSON.
pub fn print_json<T: Serialize + ?Sized>(data: &T) -> CliResult<()> {
    println!("{}", serde_json::to_string_pretty(data)?);
    Ok(())
}

/// Prints data as a formatted table.
fn print_table<T: Tabled>(data: &[T]) -> CliResult<()> {
    if data.is_empty() {
        println!("No results.");
        return Ok(());
    }

    let table = Table::new(data)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .with(Modify::new(Columns::first()).with(Alignment::left()))
        .to_string();

    println!("{table}");
    Ok(())
}

/// Prints data as CSV.
fn print_csv<T: Serialize>(data: &[T]) -> CliResult<()> {
    let mut wtr = csv::Writer::from_writer(std::io::stdout());
    for item in data {
        wtr.serialize(item)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Formats a fraction as a percentage, e.g. `0.1234` as `12.34%`.
pub fn format_percent(value: Option<f64>) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{:.2}%", v * 100.0))
}

/// Formats a decimal with a fixed number of places.
pub fn format_decimal(value: Option<Decimal>, places: u32) -> String {
    value.map_or_else(
        || NA.to_string(),
        |v| format!("{:.prec$}", v.round_dp(places), prec = places as usize),
    )
}

/// Formats a float with a fixed number of places.
pub fn format_float(value: Option<f64>, places: usize) -> String {
    value.map_or_else(|| NA.to_string(), |v| format!("{v:.places$}"))
}

/// Formats an optional label.
pub fn format_label<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NA.to_string(), |v| v.to_string())
}

/// Prints a success message.
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

/// Prints a warning message.
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message);
}

/// Prints an info message.
pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue(), message);
}

/// A key-value pair for display.
#[derive(Debug, Clone, Serialize, Tabled)]
pub struct KeyValue {
    #[tabled(rename = "Metric")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Creates a new key-value pair.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Creates a key-value pair formatted as percentage.
    pub fn from_percent(key: impl Into<String>, value: f64) -> Self {
        Self::new(key, format_percent(Some(value)))
    }
}

/// Prints a header for a section.
pub fn print_header(title: &str) {
    println!("\n{}", title.bold().underline());
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_formatting() {
        assert_eq!(format_percent(Some(0.1234)), "12.34%");
        assert_eq!(format_percent(None), "-");
        assert_eq!(format_decimal(Some(dec!(919200.456)), 2), "919200.46");
        assert_eq!(format_decimal(Some(dec!(36)), 2), "36.00");
        assert_eq!(format_float(Some(24.0), 1), "24.0");
        assert_eq!(format_label::<&str>(None), "-");
        assert_eq!(KeyValue::from_percent("Cash", 0.0925).value, "9.25%");
    }
}
