use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::fmt;

/// Non-fatal anomalies recorded while matching trades against open lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Warning {
    /// A sale or transfer-out referenced a symbol with no open lots.
    /// The statement was skipped.
    MissingCostBasis {
        symbol: String,
        trade_date: NaiveDate,
        activity: String,
        quantity: Decimal,
    },
    /// More units were consumed than the open lots held.
    /// The queue was emptied and the shortfall ignored.
    OverConsumption {
        symbol: String,
        trade_date: NaiveDate,
        available: Decimal,
        requested: Decimal,
    },
}

impl Warning {
    pub fn symbol(&self) -> &str {
        match self {
            Warning::MissingCostBasis { symbol, .. } | Warning::OverConsumption { symbol, .. } => {
                symbol
            }
        }
    }

    pub fn trade_date(&self) -> NaiveDate {
        match self {
            Warning::MissingCostBasis { trade_date, .. }
            | Warning::OverConsumption { trade_date, .. } => *trade_date,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Warning::MissingCostBasis { .. } => "MissingCostBasis",
            Warning::OverConsumption { .. } => "OverConsumption",
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingCostBasis {
                symbol,
                activity,
                quantity,
                ..
            } => write!(
                f,
                "No purchase information found for [{symbol}]: {activity} of {quantity} skipped"
            ),
            Warning::OverConsumption {
                symbol,
                available,
                requested,
                ..
            } => write!(
                f,
                "Open lots for [{symbol}] held {available} but {requested} were consumed"
            ),
        }
    }
}
