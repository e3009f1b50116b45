use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

const RECEIVED_DIVIDEND_CODES: &[&str] = &["DIV", "DIVCGL", "DIVCGS", "DIVROC", "DIVTXEX"];
const TAX_DIVIDEND_CODES: &[&str] = &["DIVNRA", "DIVFT", "DIVTW"];

/// Broker activity type of a statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityType {
    Buy,
    Sell,
    /// Stock spin-off
    Ssp,
    /// Merger/acquisition share movement
    Mas,
    /// Dividend income (one of the received dividend codes)
    DividendReceived(String),
    /// Tax withheld at source on a dividend
    DividendTax(String),
    /// Any activity neither pipeline acts on
    Other(String),
}

impl ActivityType {
    /// Classify a broker activity code (case-insensitive)
    pub fn from_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        match code.as_str() {
            "BUY" => return ActivityType::Buy,
            "SELL" => return ActivityType::Sell,
            "SSP" => return ActivityType::Ssp,
            "MAS" => return ActivityType::Mas,
            _ => {}
        }
        if RECEIVED_DIVIDEND_CODES.contains(&code.as_str()) {
            ActivityType::DividendReceived(code)
        } else if TAX_DIVIDEND_CODES.contains(&code.as_str()) {
            ActivityType::DividendTax(code)
        } else {
            ActivityType::Other(code)
        }
    }

    pub fn code(&self) -> &str {
        match self {
            ActivityType::Buy => "BUY",
            ActivityType::Sell => "SELL",
            ActivityType::Ssp => "SSP",
            ActivityType::Mas => "MAS",
            ActivityType::DividendReceived(code)
            | ActivityType::DividendTax(code)
            | ActivityType::Other(code) => code,
        }
    }

    /// Corporate-action share movement (not a taxable sale)
    pub fn is_transfer(&self) -> bool {
        matches!(self, ActivityType::Ssp | ActivityType::Mas)
    }

    pub fn is_dividend(&self) -> bool {
        matches!(
            self,
            ActivityType::DividendReceived(_) | ActivityType::DividendTax(_)
        )
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A normalized brokerage statement line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRecord {
    pub symbol: String,
    pub activity_type: ActivityType,
    pub trade_date: NaiveDate,
    /// Signed; the sign encodes direction for transfer types
    pub quantity: Decimal,
    /// Per-unit price in the instrument's native currency
    pub price: Decimal,
    /// Total cash amount in the native currency
    pub amount: Decimal,
    /// Native currency to reporting currency multiplier for the trade date
    pub exchange_rate: Decimal,
    pub company: Option<String>,
}

impl StatementRecord {
    /// Price per unit in the reporting currency
    pub fn price_reporting(&self) -> Decimal {
        self.price * self.exchange_rate
    }

    /// Cash amount in the reporting currency
    pub fn amount_reporting(&self) -> Decimal {
        self.amount * self.exchange_rate
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn trade(
        activity: &str,
        symbol: &str,
        date_str: &str,
        quantity: Decimal,
        price: Decimal,
        amount: Decimal,
        rate: Decimal,
    ) -> StatementRecord {
        StatementRecord {
            symbol: symbol.to_string(),
            activity_type: ActivityType::from_code(activity),
            trade_date: date(date_str),
            quantity,
            price,
            amount,
            exchange_rate: rate,
            company: None,
        }
    }

    pub fn dividend(
        activity: &str,
        symbol: &str,
        date_str: &str,
        amount: Decimal,
        rate: Decimal,
    ) -> StatementRecord {
        StatementRecord {
            symbol: symbol.to_string(),
            activity_type: ActivityType::from_code(activity),
            trade_date: date(date_str),
            quantity: Decimal::ZERO,
            price: Decimal::ZERO,
            amount,
            exchange_rate: rate,
            company: Some(format!("{symbol} Inc.")),
        }
    }
}
