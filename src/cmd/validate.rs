//! Validate command - surface data quality issues without generating full reports

use crate::cmd::display::Presenter;
use crate::cmd::read_statements;
use clap::Args;
use fifotax::core::{calculate_dividends, calculate_gains, Config, DividendError};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Statements file (CSV or JSON). Reads from stdin if not specified.
    #[arg(default_value = "-")]
    file: PathBuf,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// A validation issue for output
#[derive(Debug, Clone, Serialize)]
struct ValidationIssue {
    #[serde(rename = "type")]
    issue_type: String,
    date: String,
    symbol: String,
    message: String,
    fatal: bool,
}

#[derive(Debug, Serialize)]
struct ValidationOutput {
    statement_count: usize,
    issue_count: usize,
    issues: Vec<ValidationIssue>,
}

impl ValidateCommand {
    pub fn exec(&self, config: &Config) -> anyhow::Result<()> {
        let statements = read_statements(&self.file)?;
        let ctx = config.context();
        let presenter = Presenter::new(config);

        let gains = calculate_gains(&statements, &ctx);
        let mut issues: Vec<ValidationIssue> = gains
            .warnings
            .iter()
            .map(|w| {
                let row = presenter.warning(w);
                ValidationIssue {
                    issue_type: row.kind,
                    date: row.trade_date,
                    symbol: row.symbol,
                    message: row.message,
                    fatal: false,
                }
            })
            .collect();

        if let Err(err) = calculate_dividends(&statements, config.dividend_tax_rate, &ctx) {
            let DividendError::OrphanDividendTax {
                symbol, trade_date, ..
            } = &err;
            issues.push(ValidationIssue {
                issue_type: "OrphanDividendTax".to_string(),
                date: presenter.date(*trade_date),
                symbol: symbol.clone(),
                message: err.to_string(),
                fatal: true,
            });
        }

        if self.json {
            let output = ValidationOutput {
                statement_count: statements.len(),
                issue_count: issues.len(),
                issues: issues.clone(),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(statements.len(), &issues);
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(statement_count: usize, issues: &[ValidationIssue]) {
    println!();
    println!("VALIDATION RESULTS ({} statements)", statement_count);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        let severity = if issue.fatal { " (fatal)" } else { "" };
        println!(
            "  {}. [{}{}] {} {}",
            i + 1,
            issue.issue_type,
            severity,
            issue.date,
            issue.symbol
        );
        println!("     {}", issue.message);
        println!();
    }
}
