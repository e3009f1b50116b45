//! Report command - gains, remaining holdings and dividends in one pass

use crate::cmd::display::{self, DividendRow, HoldingRow, Presenter, SaleRow, WarningRow};
use crate::cmd::dividends::{self, DividendTotals};
use crate::cmd::gains::{self, GainsTotals};
use crate::cmd::holdings;
use crate::cmd::read_statements;
use clap::Args;
use fifotax::core::{calculate_tax_report, holdings::total_cost_reporting, Config};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Statements file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted tables
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct ReportOutput {
    sales: Vec<SaleRow>,
    gains_totals: GainsTotals,
    holdings: Vec<HoldingRow>,
    holdings_total_cost: String,
    dividends: Vec<DividendRow>,
    dividend_totals: DividendTotals,
    warnings: Vec<WarningRow>,
}

impl ReportCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let statements = read_statements(&self.file)?;
        let report = calculate_tax_report(&statements, config)?;
        let presenter = Presenter::new(config);

        let output = ReportOutput {
            sales: report.sales.iter().map(|s| presenter.sale(s)).collect(),
            gains_totals: gains::totals(&report.sale_totals(), &presenter),
            holdings: holdings::holding_rows(&report.holdings, &presenter),
            holdings_total_cost: presenter.amount(total_cost_reporting(&report.holdings)),
            dividends: report
                .dividends
                .records
                .iter()
                .map(|r| presenter.dividend(r))
                .collect(),
            dividend_totals: dividends::totals(&report.dividends, config, &presenter),
            warnings: report.warnings.iter().map(|w| presenter.warning(w)).collect(),
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        gains::print_gains(output.sales, &output.gains_totals);
        holdings::print_holdings(output.holdings, &output.holdings_total_cost);
        dividends::print_dividends(output.dividends, &output.dividend_totals);

        if !output.warnings.is_empty() {
            println!();
            println!("WARNINGS");
            println!();
            println!("{}", display::table(output.warnings, 4));
        }
        Ok(())
    }
}
