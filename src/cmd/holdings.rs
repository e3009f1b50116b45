//! Holdings command - lots still open after all statements

use crate::cmd::display::{self, HoldingRow, Presenter};
use crate::cmd::read_statements;
use clap::Args;
use fifotax::core::{calculate_gains, holdings, value_holdings, Config, Holdings};
use serde::Serialize;
use std::io;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct HoldingsCommand {
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
struct HoldingsOutput {
    holdings: Vec<HoldingRow>,
    total_cost: String,
}

impl HoldingsCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let statements = read_statements(&self.file)?;
        let ctx = config.context();
        let gains = calculate_gains(&statements, &ctx);
        let mut remaining = value_holdings(&gains.ledger, &ctx, config.merge_lots);
        if let Some(symbol) = &self.symbol {
            remaining.retain(|s, _| s.eq_ignore_ascii_case(symbol));
        }

        let presenter = Presenter::new(config);
        let rows = holding_rows(&remaining, &presenter);

        if self.csv {
            display::write_csv(rows, io::stdout())
        } else if self.json {
            let output = HoldingsOutput {
                holdings: rows,
                total_cost: presenter.amount(holdings::total_cost_reporting(&remaining)),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        } else {
            print_holdings(rows, &presenter.amount(holdings::total_cost_reporting(&remaining)));
            Ok(())
        }
    }
}

pub fn holding_rows(remaining: &Holdings, presenter: &Presenter) -> Vec<HoldingRow> {
    remaining
        .iter()
        .flat_map(|(symbol, lots)| lots.iter().map(move |lot| presenter.holding(symbol, lot)))
        .collect()
}

pub fn print_holdings(rows: Vec<HoldingRow>, total_cost: &str) {
    println!();
    println!("REMAINING HOLDINGS");
    println!();

    if rows.is_empty() {
        println!("No open positions");
        return;
    }

    println!("{}", display::table(rows, 2));
    println!("  Total cost: {}", total_cost);
}
