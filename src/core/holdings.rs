use super::context::CalcContext;
use super::lots::{Lot, PositionLedger};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// An open lot valued in both currencies
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuedLot {
    pub trade_date: NaiveDate,
    pub quantity: Decimal,
    pub price: Decimal,
    pub price_native: Decimal,
    pub total_cost_native: Decimal,
    pub total_cost_reporting: Decimal,
}

/// Remaining holdings per symbol, lots in acquisition order
pub type Holdings = BTreeMap<String, Vec<ValuedLot>>;

/// Value every lot still open in the ledger.
///
/// Zero-quantity lots are skipped and symbols with nothing left open are
/// omitted. With `merge` set, adjacent lots bought on the same day at the
/// same price are combined first.
pub fn value_holdings(ledger: &PositionLedger, ctx: &CalcContext, merge: bool) -> Holdings {
    ledger
        .iter()
        .filter_map(|(symbol, queue)| {
            let lots: Vec<Lot> = queue
                .snapshot()
                .filter(|lot| !lot.quantity.is_zero())
                .cloned()
                .collect();
            if lots.is_empty() {
                return None;
            }
            let lots = if merge { merge_lots(lots) } else { lots };
            let valued = lots.iter().map(|lot| value_lot(lot, ctx)).collect();
            Some((symbol.to_string(), valued))
        })
        .collect()
}

fn value_lot(lot: &Lot, ctx: &CalcContext) -> ValuedLot {
    ValuedLot {
        trade_date: lot.trade_date,
        quantity: lot.quantity,
        price: lot.price,
        price_native: lot.price_native,
        total_cost_native: ctx.quantize(lot.price_native * lot.quantity),
        total_cost_reporting: ctx.quantize(lot.price * lot.quantity),
    }
}

/// Combine neighbouring lots with the same date and unit prices.
/// Order, total quantity and total cost are unchanged.
fn merge_lots(lots: Vec<Lot>) -> Vec<Lot> {
    let mut merged: Vec<Lot> = Vec::with_capacity(lots.len());
    for lot in lots {
        match merged.last_mut() {
            Some(last)
                if last.trade_date == lot.trade_date
                    && last.price == lot.price
                    && last.price_native == lot.price_native =>
            {
                last.quantity += lot.quantity;
            }
            _ => merged.push(lot),
        }
    }
    merged
}

/// Total cost of all remaining lots in the reporting currency
pub fn total_cost_reporting(holdings: &Holdings) -> Decimal {
    holdings
        .values()
        .flatten()
        .map(|lot| lot.total_cost_reporting)
        .sum()
}
