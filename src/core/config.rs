use super::context::{CalcContext, DEFAULT_PRECISION};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Rate applied to dividends with no tax withheld at source
pub const DEFAULT_DIVIDEND_TAX_RATE: Decimal = dec!(0.05);

/// Date format used when serializing results
pub const DEFAULT_DATE_FORMAT: &str = "%d.%m.%Y";

/// Settings for one calculation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Decimal places for reported monetary figures
    pub precision: u32,
    pub dividend_tax_rate: Decimal,
    pub date_format: String,
    /// Merge adjacent remaining lots bought on the same day at the same price
    pub merge_lots: bool,
}

impl Config {
    pub fn context(&self) -> CalcContext {
        CalcContext::new(self.precision)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            precision: DEFAULT_PRECISION,
            dividend_tax_rate: DEFAULT_DIVIDEND_TAX_RATE,
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            merge_lots: false,
        }
    }
}
