use super::context::CalcContext;
use super::statement::{ActivityType, StatementRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DividendError {
    #[error("no previous dividend information found for [{symbol}] ({activity} on {trade_date})")]
    OrphanDividendTax {
        symbol: String,
        activity: String,
        trade_date: NaiveDate,
    },
}

/// One received dividend and the tax withheld against it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DividendOccurrence {
    pub company: String,
    pub trade_date: NaiveDate,
    /// Quantized on receipt
    pub gross_profit_amount: Decimal,
    /// Unrounded sum of withheld tax; quantized when reported
    pub paid_tax_amount: Decimal,
}

impl DividendOccurrence {
    /// Tax still due; only owed when nothing was withheld at source
    pub fn owe_tax(&self, rate: Decimal, ctx: &CalcContext) -> Decimal {
        if self.paid_tax_amount.is_zero() {
            ctx.quantize(self.gross_profit_amount * rate)
        } else {
            Decimal::ZERO
        }
    }
}

/// Dividend figures aggregated per symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DividendTaxRecord {
    pub stock_symbol: String,
    pub company: String,
    pub gross_profit_amount: Decimal,
    pub paid_tax_amount: Decimal,
    pub owe_tax: Decimal,
}

/// Received dividends per symbol, in statement order
#[derive(Debug, Clone, Default)]
pub struct DividendLedger {
    occurrences: BTreeMap<String, Vec<DividendOccurrence>>,
}

impl DividendLedger {
    pub fn new() -> Self {
        DividendLedger::default()
    }

    /// Record dividend activity; other statements are ignored.
    pub fn record(
        &mut self,
        statement: &StatementRecord,
        ctx: &CalcContext,
    ) -> Result<(), DividendError> {
        let amount = statement.amount_reporting();

        match &statement.activity_type {
            ActivityType::DividendReceived(code) => {
                let amount = ctx.quantize(amount);
                log::debug!("[{}] [{}] am:[{}]", code, statement.symbol, amount);
                self.occurrences
                    .entry(statement.symbol.clone())
                    .or_default()
                    .push(DividendOccurrence {
                        company: statement.company.clone().unwrap_or_default(),
                        trade_date: statement.trade_date,
                        gross_profit_amount: amount,
                        paid_tax_amount: Decimal::ZERO,
                    });
            }
            ActivityType::DividendTax(code) => {
                log::debug!("[{}] [{}] am:[{}]", code, statement.symbol, amount);
                let latest = self
                    .occurrences
                    .get_mut(&statement.symbol)
                    .and_then(|occurrences| occurrences.last_mut())
                    .ok_or_else(|| DividendError::OrphanDividendTax {
                        symbol: statement.symbol.clone(),
                        activity: code.clone(),
                        trade_date: statement.trade_date,
                    })?;
                latest.paid_tax_amount += amount;
            }
            _ => {}
        }
        Ok(())
    }

    pub fn occurrences(&self, symbol: &str) -> &[DividendOccurrence] {
        self.occurrences
            .get(symbol)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Reduce each occurrence to its owed tax and sum per symbol
    pub fn tax_records(&self, rate: Decimal, ctx: &CalcContext) -> Vec<DividendTaxRecord> {
        self.occurrences
            .iter()
            .filter_map(|(symbol, occurrences)| {
                let first = occurrences.first()?;
                let mut record = DividendTaxRecord {
                    stock_symbol: symbol.clone(),
                    company: first.company.clone(),
                    gross_profit_amount: Decimal::ZERO,
                    paid_tax_amount: Decimal::ZERO,
                    owe_tax: Decimal::ZERO,
                };
                for occurrence in occurrences {
                    let owe_tax = occurrence.owe_tax(rate, ctx);
                    log::debug!(
                        "[{}] td:[{}] gross:[{}] paid:[{}] owe:[{}]",
                        symbol,
                        occurrence.trade_date,
                        occurrence.gross_profit_amount,
                        occurrence.paid_tax_amount,
                        owe_tax
                    );
                    record.gross_profit_amount += occurrence.gross_profit_amount;
                    record.paid_tax_amount += ctx.quantize(occurrence.paid_tax_amount);
                    record.owe_tax += owe_tax;
                }
                Some(record)
            })
            .collect()
    }
}

/// Dividend tax report
#[derive(Debug, Clone, Default)]
pub struct DividendReport {
    pub records: Vec<DividendTaxRecord>,
}

impl DividendReport {
    pub fn total_gross(&self) -> Decimal {
        self.records.iter().map(|r| r.gross_profit_amount).sum()
    }

    pub fn total_paid_tax(&self) -> Decimal {
        self.records.iter().map(|r| r.paid_tax_amount).sum()
    }

    pub fn total_owe_tax(&self) -> Decimal {
        self.records.iter().map(|r| r.owe_tax).sum()
    }
}

/// Aggregate dividend income and withheld tax per symbol.
///
/// Fails on the first tax statement that has no earlier dividend for its
/// symbol; no partial report is produced.
pub fn calculate_dividends(
    statements: &[StatementRecord],
    rate: Decimal,
    ctx: &CalcContext,
) -> Result<DividendReport, DividendError> {
    let mut ledger = DividendLedger::new();
    for statement in statements {
        ledger.record(statement, ctx)?;
    }
    Ok(DividendReport {
        records: ledger.tax_records(rate, ctx),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::statement::fixtures::{date, dividend, trade};
    use rust_decimal_macros::dec;

    const RATE: Decimal = dec!(0.05);

    #[test]
    fn owe_tax_only_from_untaxed_occurrences() {
        let statements = vec![
            dividend("DIV", "KO", "2024-04-01", dec!(100), dec!(1)),
            dividend("DIVNRA", "KO", "2024-04-01", dec!(30), dec!(1)),
            dividend("DIV", "KO", "2024-07-01", dec!(50), dec!(1)),
        ];

        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        assert_eq!(
            report.records,
            vec![DividendTaxRecord {
                stock_symbol: "KO".to_string(),
                company: "KO Inc.".to_string(),
                gross_profit_amount: dec!(150),
                paid_tax_amount: dec!(30),
                owe_tax: dec!(50) * RATE,
            }]
        );
    }

    #[test]
    fn tax_applies_to_most_recent_occurrence() {
        let statements = vec![
            dividend("DIV", "PEP", "2024-01-05", dec!(10), dec!(1)),
            dividend("DIV", "PEP", "2024-04-05", dec!(12), dec!(1)),
            dividend("DIVFT", "PEP", "2024-04-05", dec!(1.2), dec!(1)),
            dividend("DIVFT", "PEP", "2024-04-05", dec!(0.6), dec!(1)),
        ];

        let ctx = CalcContext::default();
        let mut ledger = DividendLedger::new();
        for s in &statements {
            ledger.record(s, &ctx).unwrap();
        }
        let occurrences = ledger.occurrences("PEP");
        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].trade_date, date("2024-01-05"));
        assert_eq!(occurrences[1].trade_date, date("2024-04-05"));
        assert!(occurrences[0].paid_tax_amount.is_zero());
        assert_eq!(occurrences[1].paid_tax_amount, dec!(1.8));
        assert_eq!(occurrences[0].owe_tax(RATE, &ctx), dec!(0.50));
        assert_eq!(occurrences[1].owe_tax(RATE, &ctx), Decimal::ZERO);
    }

    #[test]
    fn amounts_converted_and_quantized() {
        let statements = vec![
            dividend("DIV", "T", "2024-02-01", dec!(3.33), dec!(1.79123)),
        ];

        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        let record = &report.records[0];
        // 3.33 * 1.79123 = 5.9647959
        assert_eq!(record.gross_profit_amount, dec!(5.96));
        // 5.96 * 0.05 = 0.298
        assert_eq!(record.owe_tax, dec!(0.30));
    }

    #[test]
    fn sub_cent_withholding_still_counts_as_withheld() {
        let statements = vec![
            dividend("DIV", "KO", "2024-04-01", dec!(0.40), dec!(1)),
            dividend("DIVNRA", "KO", "2024-04-01", dec!(-0.004), dec!(1)),
        ];

        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        let record = &report.records[0];
        assert_eq!(record.gross_profit_amount, dec!(0.40));
        assert_eq!(record.paid_tax_amount, dec!(0.00));
        assert_eq!(record.owe_tax, Decimal::ZERO);
    }

    #[test]
    fn withheld_tax_quantized_per_occurrence() {
        let statements = vec![
            dividend("DIV", "T", "2024-02-01", dec!(10), dec!(1)),
            dividend("DIVNRA", "T", "2024-02-01", dec!(-0.004), dec!(1)),
            dividend("DIVNRA", "T", "2024-02-01", dec!(-0.004), dec!(1)),
        ];

        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        // -0.008 rounds to -0.01
        assert_eq!(report.records[0].paid_tax_amount, dec!(-0.01));
    }

    #[test]
    fn orphan_tax_statement_is_fatal() {
        let statements = vec![
            dividend("DIV", "KO", "2024-04-01", dec!(100), dec!(1)),
            dividend("DIVNRA", "PEP", "2024-04-02", dec!(15), dec!(1)),
        ];

        let err = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap_err();
        assert_eq!(
            err,
            DividendError::OrphanDividendTax {
                symbol: "PEP".to_string(),
                activity: "DIVNRA".to_string(),
                trade_date: date("2024-04-02"),
            }
        );
        assert!(err.to_string().contains("[PEP]"));
    }

    #[test]
    fn tax_before_dividend_is_fatal() {
        let statements = vec![
            dividend("DIVNRA", "KO", "2024-04-01", dec!(15), dec!(1)),
            dividend("DIV", "KO", "2024-04-01", dec!(100), dec!(1)),
        ];

        assert!(calculate_dividends(&statements, RATE, &CalcContext::default()).is_err());
    }

    #[test]
    fn company_taken_from_first_occurrence() {
        let mut second = dividend("DIV", "ABBV", "2024-05-01", dec!(20), dec!(1));
        second.company = Some("AbbVie Inc".to_string());
        let statements = vec![
            dividend("DIV", "ABBV", "2024-02-01", dec!(20), dec!(1)),
            second,
        ];

        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        assert_eq!(report.records[0].company, "ABBV Inc.");
    }

    #[test]
    fn records_per_symbol_with_totals() {
        let statements = vec![
            dividend("DIV", "MSFT", "2024-03-01", dec!(40), dec!(1)),
            dividend("DIV", "AAPL", "2024-03-02", dec!(20), dec!(1)),
            dividend("DIVNRA", "AAPL", "2024-03-02", dec!(2), dec!(1)),
            trade("BUY", "AAPL", "2024-03-03", dec!(1), dec!(180), dec!(180), dec!(1)),
        ];

        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        let symbols: Vec<_> = report.records.iter().map(|r| r.stock_symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(report.total_gross(), dec!(60));
        assert_eq!(report.total_paid_tax(), dec!(2));
        assert_eq!(report.total_owe_tax(), dec!(2.00));
    }

    #[test]
    fn no_dividends_gives_empty_report() {
        let statements = vec![trade("BUY", "AAPL", "2024-03-03", dec!(1), dec!(180), dec!(180), dec!(1))];
        let report = calculate_dividends(&statements, RATE, &CalcContext::default()).unwrap();
        assert!(report.records.is_empty());
        assert!(report.total_owe_tax().is_zero());
    }
}
