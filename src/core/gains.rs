use super::context::CalcContext;
use super::lots::{Lot, PositionLedger};
use super::statement::{ActivityType, StatementRecord};
use super::warnings::Warning;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// Marker carried by the symbol of shares surrendered in a corporate action
const OLD_SYMBOL_SUFFIX: &str = ".OLD";

/// A sale matched against the open lots of its symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RealizedSale {
    pub symbol: String,
    pub trade_date: NaiveDate,
    pub quantity: Decimal,
    /// Weighted average unit cost of the open lots before the sale
    pub avg_purchase_price: Decimal,
    pub purchase_price: Decimal,
    pub sell_price: Decimal,
    pub sell_exchange_rate: Decimal,
    pub profit: Decimal,
    pub loss: Decimal,
}

impl RealizedSale {
    /// Net result; profit and loss are never both non-zero
    pub fn profit_or_loss(&self) -> Decimal {
        self.profit + self.loss
    }
}

/// Sums over a set of realized sales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SaleTotals {
    pub count: usize,
    pub purchase_price: Decimal,
    pub sell_price: Decimal,
    pub profit: Decimal,
    pub loss: Decimal,
}

impl SaleTotals {
    pub fn of(sales: &[RealizedSale]) -> Self {
        sales.iter().fold(
            SaleTotals {
                count: sales.len(),
                ..SaleTotals::default()
            },
            |acc, s| SaleTotals {
                purchase_price: acc.purchase_price + s.purchase_price,
                sell_price: acc.sell_price + s.sell_price,
                profit: acc.profit + s.profit,
                loss: acc.loss + s.loss,
                ..acc
            },
        )
    }
}

/// Realized sales plus the lots left open after all statements
#[derive(Debug, Clone, Default)]
pub struct GainsReport {
    pub sales: Vec<RealizedSale>,
    pub ledger: PositionLedger,
    pub warnings: Vec<Warning>,
}

impl GainsReport {
    pub fn totals(&self) -> SaleTotals {
        SaleTotals::of(&self.sales)
    }
}

/// Match sales against open lots, FIFO, in statement order.
///
/// Statements are trusted to be in chronological order; they are never
/// re-sorted here.
pub fn calculate_gains(statements: &[StatementRecord], ctx: &CalcContext) -> GainsReport {
    let mut report = GainsReport::default();

    for statement in statements {
        match statement.activity_type {
            ActivityType::Buy => buy(&mut report.ledger, statement),
            ActivityType::Sell => {
                if let Some(sale) = sell(&mut report, statement, ctx) {
                    report.sales.push(sale);
                }
            }
            ActivityType::Ssp | ActivityType::Mas => transfer(&mut report, statement),
            ActivityType::DividendReceived(_)
            | ActivityType::DividendTax(_)
            | ActivityType::Other(_) => {}
        }
    }

    report
}

fn buy(ledger: &mut PositionLedger, statement: &StatementRecord) {
    let quantity = statement.quantity.abs();
    log::debug!(
        "[BUY] [{}] td:[{}] qt:[{}] pr:[{}] ex:[{}]",
        statement.symbol,
        statement.trade_date,
        quantity,
        statement.price,
        statement.exchange_rate
    );
    ledger.append(&statement.symbol, Lot::from_statement(statement, quantity));
}

fn sell(
    report: &mut GainsReport,
    statement: &StatementRecord,
    ctx: &CalcContext,
) -> Option<RealizedSale> {
    let symbol = statement.symbol.as_str();
    let quantity = statement.quantity.abs();
    log::debug!(
        "[SELL] [{}] td:[{}] qt:[{}] pr:[{}] ex:[{}]",
        symbol,
        statement.trade_date,
        quantity,
        statement.price,
        statement.exchange_rate
    );

    let Some(queue) = report.ledger.open_queue_mut(symbol) else {
        record(
            &mut report.warnings,
            Warning::MissingCostBasis {
                symbol: symbol.to_string(),
                trade_date: statement.trade_date,
                activity: statement.activity_type.to_string(),
                quantity,
            },
        );
        return None;
    };
    log::debug!("Before adjustment: {:?}", queue);

    // Only `None` for a queue with nothing open, which `open_queue_mut` excludes
    let avg_purchase_price = queue.weighted_average_cost()?;
    let purchase_price = ctx.quantize(avg_purchase_price * quantity);
    let sell_price = ctx.quantize(statement.amount_reporting());
    let profit_or_loss = ctx.quantize(sell_price - purchase_price);

    let (profit, loss) = if profit_or_loss > Decimal::ZERO {
        (profit_or_loss, Decimal::ZERO)
    } else {
        (Decimal::ZERO, profit_or_loss)
    };

    let shortfall = queue.consume(quantity).err();
    log::debug!("After adjustment: {:?}", queue);

    if let Some(shortfall) = shortfall {
        record(
            &mut report.warnings,
            Warning::OverConsumption {
                symbol: symbol.to_string(),
                trade_date: statement.trade_date,
                available: shortfall.available,
                requested: shortfall.requested,
            },
        );
    }

    Some(RealizedSale {
        symbol: symbol.to_string(),
        trade_date: statement.trade_date,
        quantity,
        avg_purchase_price,
        purchase_price,
        sell_price,
        sell_exchange_rate: ctx.quantize(statement.exchange_rate),
        profit,
        loss,
    })
}

/// Corporate-action share movement: negative quantities surrender shares
/// of the old symbol, non-negative ones open a lot like a purchase.
fn transfer(report: &mut GainsReport, statement: &StatementRecord) {
    log::debug!(
        "[{}] [{}] td:[{}] qt:[{}] pr:[{}] ex:[{}]",
        statement.activity_type,
        statement.symbol,
        statement.trade_date,
        statement.quantity,
        statement.price,
        statement.exchange_rate
    );

    if statement.quantity >= Decimal::ZERO {
        report
            .ledger
            .append(&statement.symbol, Lot::from_statement(statement, statement.quantity));
        return;
    }

    let symbol = old_symbol(&statement.symbol);
    let quantity = statement.quantity.abs();

    let Some(queue) = report.ledger.open_queue_mut(symbol) else {
        record(
            &mut report.warnings,
            Warning::MissingCostBasis {
                symbol: symbol.to_string(),
                trade_date: statement.trade_date,
                activity: statement.activity_type.to_string(),
                quantity,
            },
        );
        return;
    };

    log::debug!("Before surrender: {:?}", queue);
    let result = queue.consume(quantity);
    log::debug!("After surrender: {:?}", queue);

    if let Err(shortfall) = result {
        record(
            &mut report.warnings,
            Warning::OverConsumption {
                symbol: symbol.to_string(),
                trade_date: statement.trade_date,
                available: shortfall.available,
                requested: shortfall.requested,
            },
        );
    }
}

fn old_symbol(symbol: &str) -> &str {
    symbol.strip_suffix(OLD_SYMBOL_SUFFIX).unwrap_or(symbol)
}

fn record(warnings: &mut Vec<Warning>, warning: Warning) {
    log::warn!("{}", warning);
    warnings.push(warning);
}
