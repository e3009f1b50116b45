pub mod config;
pub mod context;
pub mod dividends;
pub mod gains;
pub mod holdings;
pub mod lots;
pub mod report;
pub mod statement;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use config::Config;
pub use context::CalcContext;
pub use dividends::{
    calculate_dividends, DividendError, DividendLedger, DividendOccurrence, DividendReport,
    DividendTaxRecord,
};
pub use gains::{calculate_gains, GainsReport, RealizedSale, SaleTotals};
pub use holdings::{value_holdings, Holdings, ValuedLot};
pub use lots::{Lot, LotQueue, PositionLedger, Shortfall};
pub use report::{calculate_tax_report, TaxReport};
pub use statement::{ActivityType, StatementRecord};
pub use warnings::Warning;
