//! FIFO capital gains and dividend tax calculation for brokerage statements.
//!
//! [`core`] holds the pure calculation: lot queues, realized sales, the
//! remaining position valuation and dividend tax aggregation.
//! [`statements`] reads normalized statements from CSV or JSON.

pub mod core;
pub mod statements;
