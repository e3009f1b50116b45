use super::config::Config;
use super::dividends::{calculate_dividends, DividendError, DividendReport};
use super::gains::{calculate_gains, RealizedSale, SaleTotals};
use super::holdings::{value_holdings, Holdings};
use super::statement::StatementRecord;
use super::warnings::Warning;

/// Everything computed from one statement list
#[derive(Debug, Clone)]
pub struct TaxReport {
    pub sales: Vec<RealizedSale>,
    pub holdings: Holdings,
    pub dividends: DividendReport,
    pub warnings: Vec<Warning>,
}

impl TaxReport {
    pub fn sale_totals(&self) -> SaleTotals {
        SaleTotals::of(&self.sales)
    }
}

/// Run the gains and dividend pipelines over the same statements.
///
/// The dividend pipeline is the only source of a hard failure; anomalies in
/// lot matching are returned as warnings.
pub fn calculate_tax_report(
    statements: &[StatementRecord],
    config: &Config,
) -> Result<TaxReport, DividendError> {
    let ctx = config.context();

    let gains = calculate_gains(statements, &ctx);
    let holdings = value_holdings(&gains.ledger, &ctx, config.merge_lots);
    let dividends = calculate_dividends(statements, config.dividend_tax_rate, &ctx)?;

    Ok(TaxReport {
        sales: gains.sales,
        holdings,
        dividends,
        warnings: gains.warnings,
    })
}
