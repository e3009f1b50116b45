//! Dividends command - dividend income and tax owed per symbol

use crate::cmd::display::{self, DividendRow, Presenter};
use crate::cmd::read_statements;
use clap::Args;
use fifotax::core::{calculate_dividends, Config, DividendReport};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct DividendsCommand {
    /// Statements file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct DividendTotals {
    pub gross_profit_amount: String,
    pub paid_tax_amount: String,
    pub owe_tax: String,
    pub tax_rate_pct: String,
}

#[derive(Debug, Serialize)]
struct DividendsOutput {
    dividends: Vec<DividendRow>,
    totals: DividendTotals,
}

impl DividendsCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let statements = read_statements(&self.file)?;
        let report = calculate_dividends(&statements, config.dividend_tax_rate, &config.context())?;

        let presenter = Presenter::new(config);
        let rows: Vec<DividendRow> = report.records.iter().map(|r| presenter.dividend(r)).collect();

        if self.csv {
            display::write_csv(rows, io::stdout())
        } else if self.json {
            let output = DividendsOutput {
                dividends: rows,
                totals: totals(&report, config, &presenter),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        } else {
            print_dividends(rows, &totals(&report, config, &presenter));
            Ok(())
        }
    }
}

pub fn totals(report: &DividendReport, config: &Config, presenter: &Presenter) -> DividendTotals {
    DividendTotals {
        gross_profit_amount: presenter.amount(report.total_gross()),
        paid_tax_amount: presenter.amount(report.total_paid_tax()),
        owe_tax: presenter.amount(report.total_owe_tax()),
        tax_rate_pct: (config.dividend_tax_rate * dec!(100)).normalize().to_string(),
    }
}

pub fn print_dividends(rows: Vec<DividendRow>, totals: &DividendTotals) {
    println!();
    println!("DIVIDENDS");
    println!();

    if rows.is_empty() {
        println!("No dividends found");
        return;
    }

    println!("{}", display::table(rows, 2));
    println!(
        "  Gross: {} | Tax paid: {} | Tax owed @ {}%: {}",
        totals.gross_profit_amount, totals.paid_tax_amount, totals.tax_rate_pct, totals.owe_tax
    );
}
