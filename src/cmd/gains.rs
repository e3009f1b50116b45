//! Gains command - realized profit and loss per sale

use crate::cmd::display::{self, Presenter, SaleRow, WarningRow};
use crate::cmd::read_statements;
use clap::Args;
use fifotax::core::{calculate_gains, Config, SaleTotals};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GainsCommand {
    /// Statements file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Filter by symbol
    #[arg(short, long)]
    symbol: Option<String>,

    /// Output as CSV instead of formatted table
    #[arg(long, conflicts_with = "json")]
    csv: bool,

    /// Output as JSON instead of formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
pub struct GainsTotals {
    pub sales: usize,
    pub purchase_price: String,
    pub sell_price: String,
    pub profit: String,
    pub loss: String,
}

#[derive(Debug, Serialize)]
struct GainsOutput {
    sales: Vec<SaleRow>,
    totals: GainsTotals,
    warnings: Vec<WarningRow>,
}

impl GainsCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let statements = read_statements(&self.file)?;
        let mut report = calculate_gains(&statements, &config.context());
        if let Some(symbol) = &self.symbol {
            report.sales.retain(|s| s.symbol.eq_ignore_ascii_case(symbol));
        }

        let presenter = Presenter::new(config);
        let rows: Vec<SaleRow> = report.sales.iter().map(|s| presenter.sale(s)).collect();

        if self.csv {
            display::write_csv(rows, io::stdout())
        } else if self.json {
            let output = GainsOutput {
                sales: rows,
                totals: totals(&report.totals(), &presenter),
                warnings: report.warnings.iter().map(|w| presenter.warning(w)).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        } else {
            print_gains(rows, &totals(&report.totals(), &presenter));
            Ok(())
        }
    }
}

pub fn totals(sums: &SaleTotals, presenter: &Presenter) -> GainsTotals {
    GainsTotals {
        sales: sums.count,
        purchase_price: presenter.amount(sums.purchase_price),
        sell_price: presenter.amount(sums.sell_price),
        profit: presenter.amount(sums.profit),
        loss: presenter.amount(sums.loss),
    }
}

pub fn print_gains(rows: Vec<SaleRow>, totals: &GainsTotals) {
    println!();
    println!("REALIZED GAINS");
    println!();

    if rows.is_empty() {
        println!("No sales found");
        return;
    }

    println!("{}", display::table(rows, 2));
    println!(
        "  Sales: {} | Purchase: {} | Sale: {} | Profit: {} | Loss: {}",
        totals.sales, totals.purchase_price, totals.sell_price, totals.profit, totals.loss
    );
}
