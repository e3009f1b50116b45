use crate::core::{ActivityType, StatementRecord};
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::io::Read;

#[derive(Debug, thiserror::Error)]
pub enum StatementError {
    #[error("row {row}: invalid trade date '{value}'")]
    InvalidDate { row: usize, value: String },
    #[error("row {row}: {activity} statement has no symbol")]
    MissingSymbol { row: usize, activity: String },
    #[error("row {row}: {activity} statement for [{symbol}] has no exchange rate")]
    MissingExchangeRate {
        row: usize,
        activity: String,
        symbol: String,
    },
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON input root
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatementInput {
    pub statements: Vec<StatementRow>,
}

/// Normalized statement as read from CSV or JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StatementRow {
    /// Instrument symbol; a trailing ".OLD" marks surrendered shares
    #[serde(default)]
    pub symbol: String,
    /// BUY, SELL, SSP, MAS, DIV*, DIVNRA, DIVFT, DIVTW or any other code
    pub activity_type: String,
    /// YYYY-MM-DD, optionally followed by a time
    pub trade_date: String,
    /// Signed unit count
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub quantity: Option<Decimal>,
    /// Price per unit in the native currency
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub price: Option<Decimal>,
    /// Total cash amount in the native currency
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<Decimal>,
    /// Native to reporting currency multiplier on the trade date
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub exchange_rate: Option<Decimal>,
    /// Paying company, for dividend statements
    #[serde(default)]
    pub company: Option<String>,
}

impl StatementRow {
    /// Convert to a statement; `row` is 1-based and only used in errors
    pub fn into_statement(self, row: usize) -> Result<StatementRecord, StatementError> {
        let activity_type = ActivityType::from_code(&self.activity_type);
        let trade_date = parse_date(&self.trade_date).ok_or_else(|| StatementError::InvalidDate {
            row,
            value: self.trade_date.clone(),
        })?;

        let relevant = !matches!(activity_type, ActivityType::Other(_));
        let symbol = self.symbol.trim().to_string();
        if relevant && symbol.is_empty() {
            return Err(StatementError::MissingSymbol {
                row,
                activity: activity_type.to_string(),
            });
        }

        let exchange_rate = match self.exchange_rate {
            Some(rate) => rate,
            None if !relevant => Decimal::ONE,
            None => {
                return Err(StatementError::MissingExchangeRate {
                    row,
                    activity: activity_type.to_string(),
                    symbol,
                })
            }
        };

        Ok(StatementRecord {
            symbol,
            activity_type,
            trade_date,
            quantity: self.quantity.unwrap_or_default(),
            price: self.price.unwrap_or_default(),
            amount: self.amount.unwrap_or_default(),
            exchange_rate,
            company: self.company.filter(|c| !c.trim().is_empty()),
        })
    }
}

/// Parse a date that may carry a time component; only the date is kept
fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
}

fn into_statements(rows: Vec<StatementRow>) -> Result<Vec<StatementRecord>, StatementError> {
    let mut statements = rows
        .into_iter()
        .enumerate()
        .map(|(i, row)| row.into_statement(i + 1))
        .collect::<Result<Vec<_>, _>>()?;
    // Stable: statements on the same day keep their file order
    statements.sort_by_key(|s| s.trade_date);
    Ok(statements)
}

/// Read statements from CSV
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<StatementRecord>, StatementError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let rows = rdr
        .deserialize::<StatementRow>()
        .collect::<Result<Vec<_>, _>>()?;
    into_statements(rows)
}

/// Read statements from JSON
pub fn read_json<R: Read>(reader: R) -> Result<Vec<StatementRecord>, StatementError> {
    let input: StatementInput = serde_json::from_reader(reader)?;
    into_statements(input.statements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const CSV: &str = "\
symbol,activity_type,trade_date,quantity,price,amount,exchange_rate,company
AAPL,BUY,2024-01-03,5,180.25,-901.25,1.79,
KO,DIV,2024-04-01,,,4.60,1.81,The Coca-Cola Company
KO,DIVNRA,2024-04-01,,,-0.46,1.81,
AAPL,SELL,2024-02-01T15:30:00,-2,190,380,1.8,
,CDEP,2024-01-01,,,1000,,
";

    #[test]
    fn csv_rows_parsed_and_sorted_by_date() {
        let statements = read_csv(CSV.as_bytes()).unwrap();
        assert_eq!(statements.len(), 5);

        let order: Vec<_> = statements.iter().map(|s| s.activity_type.code()).collect();
        assert_eq!(order, vec!["CDEP", "BUY", "SELL", "DIV", "DIVNRA"]);

        let buy = &statements[1];
        assert_eq!(buy.symbol, "AAPL");
        assert_eq!(buy.quantity, dec!(5));
        assert_eq!(buy.price, dec!(180.25));
        assert_eq!(buy.exchange_rate, dec!(1.79));
        assert_eq!(buy.company, None);

        let sell = &statements[2];
        assert_eq!(sell.trade_date, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(sell.quantity, dec!(-2));

        let div = &statements[3];
        assert_eq!(div.company.as_deref(), Some("The Coca-Cola Company"));
        assert!(div.quantity.is_zero());
        assert_eq!(div.amount, dec!(4.60));

        assert_eq!(statements[0].exchange_rate, Decimal::ONE);
    }

    #[test]
    fn same_day_order_preserved() {
        let csv = "\
symbol,activity_type,trade_date,quantity,price,amount,exchange_rate,company
X,SELL,2024-01-02,-1,10,10,1,
X,BUY,2024-01-02,1,10,10,1,
";
        let statements = read_csv(csv.as_bytes()).unwrap();
        assert_eq!(statements[0].activity_type, ActivityType::Sell);
        assert_eq!(statements[1].activity_type, ActivityType::Buy);
    }

    #[test]
    fn json_statements_parsed() {
        let json = r#"{
            "statements": [
                {"symbol": "MSFT", "activity_type": "BUY", "trade_date": "2024-01-05",
                 "quantity": 2, "price": 370.5, "amount": 741, "exchange_rate": 1.78},
                {"symbol": "MSFT", "activity_type": "DIV", "trade_date": "2024-03-14",
                 "amount": 1.5, "exchange_rate": 1.8, "company": "Microsoft Corp"}
            ]
        }"#;

        let statements = read_json(json.as_bytes()).unwrap();
        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].price, dec!(370.5));
        assert_eq!(
            statements[1].activity_type,
            ActivityType::DividendReceived("DIV".to_string())
        );
        assert_eq!(statements[1].company.as_deref(), Some("Microsoft Corp"));
    }

    #[test]
    fn invalid_date_names_row() {
        let csv = "\
symbol,activity_type,trade_date,quantity,price,amount,exchange_rate,company
X,BUY,2024-01-02,1,10,10,1,
X,BUY,02/01/2024,1,10,10,1,
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, StatementError::InvalidDate { row: 2, .. }));
        assert_eq!(err.to_string(), "row 2: invalid trade date '02/01/2024'");
    }

    #[test]
    fn trade_without_symbol_rejected() {
        let csv = "\
symbol,activity_type,trade_date,quantity,price,amount,exchange_rate,company
,SELL,2024-01-02,1,10,10,1,
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, StatementError::MissingSymbol { row: 1, .. }));
    }

    #[test]
    fn trade_without_exchange_rate_rejected() {
        let csv = "\
symbol,activity_type,trade_date,quantity,price,amount,exchange_rate,company
TSLA,BUY,2024-01-02,1,10,10,,
";
        let err = read_csv(csv.as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            StatementError::MissingExchangeRate { ref symbol, .. } if symbol == "TSLA"
        ));
    }

    #[test]
    fn malformed_number_is_csv_error() {
        let csv = "\
symbol,activity_type,trade_date,quantity,price,amount,exchange_rate,company
TSLA,BUY,2024-01-02,one,10,10,1,
";
        assert!(matches!(
            read_csv(csv.as_bytes()).unwrap_err(),
            StatementError::Csv(_)
        ));
    }

    #[test]
    fn date_formats_accepted() {
        let expected = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();
        assert_eq!(parse_date("2024-06-30"), Some(expected));
        assert_eq!(parse_date("2024-06-30T10:11:12"), Some(expected));
        assert_eq!(parse_date("2024-06-30 10:11:12"), Some(expected));
        assert_eq!(parse_date("2024-06-30T10:11:12.345"), Some(expected));
        assert_eq!(parse_date("30.06.2024"), None);
    }
}
