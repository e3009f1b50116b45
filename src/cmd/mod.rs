pub mod dividends;
pub mod display;
pub mod gains;
pub mod holdings;
pub mod report;
pub mod schema;
pub mod validate;

use anyhow::Context;
use chrono::format::{Item, StrftimeItems};
use clap::Args;
use fifotax::core::{config, Config, StatementRecord};
use fifotax::statements;
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Calculation settings shared by every subcommand
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Decimal places for reported amounts
    #[arg(long, global = true, default_value_t = fifotax::core::context::DEFAULT_PRECISION)]
    precision: u32,

    /// Tax rate owed on dividends with no tax withheld (e.g., 0.05 for 5%)
    #[arg(long, global = true, default_value_t = config::DEFAULT_DIVIDEND_TAX_RATE)]
    dividend_tax_rate: Decimal,

    /// strftime format for dates in the output
    #[arg(long, global = true, default_value = config::DEFAULT_DATE_FORMAT)]
    date_format: String,

    /// Merge remaining lots bought on the same day at the same price
    #[arg(long, global = true)]
    merge_lots: bool,
}

impl ConfigArgs {
    pub fn to_config(&self) -> anyhow::Result<Config> {
        if StrftimeItems::new(&self.date_format).any(|item| matches!(item, Item::Error)) {
            anyhow::bail!("Invalid date format: {}", self.date_format);
        }
        if self.dividend_tax_rate.is_sign_negative() {
            anyhow::bail!("Dividend tax rate must not be negative");
        }
        Ok(Config {
            precision: self.precision,
            dividend_tax_rate: self.dividend_tax_rate,
            date_format: self.date_format.clone(),
            merge_lots: self.merge_lots,
        })
    }
}

/// Read statements from a CSV or JSON file (or stdin with "-")
pub fn read_statements(path: &Path) -> anyhow::Result<Vec<StatementRecord>> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let reader = BufReader::new(file);
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let records = if is_json {
        statements::read_json(reader)
    } else {
        statements::read_csv(reader)
    }
    .with_context(|| format!("Failed to read statements from {}", path.display()))?;

    log::info!("Read {} statements from {}", records.len(), path.display());
    Ok(records)
}

fn read_from_stdin() -> anyhow::Result<Vec<StatementRecord>> {
    let mut buffer = Vec::new();
    io::stdin().lock().read_to_end(&mut buffer)?;

    let first = buffer.iter().find(|b| !b.is_ascii_whitespace());
    let records = match first {
        None => anyhow::bail!("No input received. Provide a file or pipe data to stdin."),
        Some(b'{') => statements::read_json(buffer.as_slice())?,
        Some(_) => statements::read_csv(buffer.as_slice())?,
    };
    Ok(records)
}
