use super::statement::StatementRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

/// A batch of shares acquired at one time and price
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lot {
    /// Cost per unit in the reporting currency
    pub price: Decimal,
    /// Cost per unit in the instrument's native currency
    pub price_native: Decimal,
    /// Units still open
    pub quantity: Decimal,
    pub trade_date: NaiveDate,
}

impl Lot {
    /// Lot acquired by the given statement, valued at its exchange rate
    pub fn from_statement(statement: &StatementRecord, quantity: Decimal) -> Self {
        Lot {
            price: statement.price_reporting(),
            price_native: statement.price,
            quantity,
            trade_date: statement.trade_date,
        }
    }

    pub fn cost(&self) -> Decimal {
        self.price * self.quantity
    }
}

/// Units requested beyond what a queue held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shortfall {
    pub available: Decimal,
    pub requested: Decimal,
}

/// Open lots for one symbol, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotQueue {
    lots: VecDeque<Lot>,
}

impl LotQueue {
    pub fn new() -> Self {
        LotQueue::default()
    }

    /// Add a lot behind all existing ones
    pub fn append(&mut self, lot: Lot) {
        debug_assert!(lot.quantity >= Decimal::ZERO);
        self.lots.push_back(lot);
    }

    pub fn is_empty(&self) -> bool {
        self.lots.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lots.len()
    }

    pub fn total_quantity(&self) -> Decimal {
        self.lots.iter().map(|l| l.quantity).sum()
    }

    pub fn total_cost(&self) -> Decimal {
        self.lots.iter().map(Lot::cost).sum()
    }

    /// Cost per unit across all open lots, in the reporting currency.
    /// `None` when there is nothing open to average over.
    pub fn weighted_average_cost(&self) -> Option<Decimal> {
        let quantity = self.total_quantity();
        if quantity.is_zero() {
            return None;
        }
        Some(self.total_cost() / quantity)
    }

    /// Remove `quantity` units, oldest lots first.
    ///
    /// Lots reaching zero are dropped. If the queue holds less than
    /// requested it is emptied and the shortfall returned.
    pub fn consume(&mut self, quantity: Decimal) -> Result<(), Shortfall> {
        let available = self.total_quantity();
        let mut remaining = quantity;

        while remaining > Decimal::ZERO {
            let Some(front) = self.lots.front_mut() else {
                break;
            };
            let taken = front.quantity.min(remaining);
            front.quantity -= taken;
            remaining -= taken;
            if front.quantity.is_zero() {
                self.lots.pop_front();
            }
        }

        if remaining > Decimal::ZERO {
            Err(Shortfall {
                available,
                requested: quantity,
            })
        } else {
            Ok(())
        }
    }

    /// Current lots in acquisition order
    pub fn snapshot(&self) -> impl Iterator<Item = &Lot> {
        self.lots.iter()
    }
}

/// Open lot queues keyed by symbol
#[derive(Debug, Clone, Default)]
pub struct PositionLedger {
    queues: BTreeMap<String, LotQueue>,
}

impl PositionLedger {
    pub fn new() -> Self {
        PositionLedger::default()
    }

    pub fn append(&mut self, symbol: &str, lot: Lot) {
        self.queues.entry(symbol.to_string()).or_default().append(lot);
    }

    pub fn queue(&self, symbol: &str) -> Option<&LotQueue> {
        self.queues.get(symbol)
    }

    /// Queue for a symbol that still has something open to match against
    pub fn open_queue_mut(&mut self, symbol: &str) -> Option<&mut LotQueue> {
        self.queues
            .get_mut(symbol)
            .filter(|q| q.total_quantity() > Decimal::ZERO)
    }

    /// Symbols and their queues in symbol order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LotQueue)> {
        self.queues.iter().map(|(symbol, queue)| (symbol.as_str(), queue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn lot(day: u32, price: Decimal, quantity: Decimal) -> Lot {
        Lot {
            price,
            price_native: price,
            quantity,
            trade_date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
        }
    }

    fn queue(lots: &[(Decimal, Decimal)]) -> LotQueue {
        let mut q = LotQueue::new();
        for (i, (price, qty)) in lots.iter().enumerate() {
            q.append(lot(i as u32 + 1, *price, *qty));
        }
        q
    }

    #[test]
    fn weighted_average_of_equal_lots() {
        let q = queue(&[(dec!(10), dec!(2)), (dec!(20), dec!(2))]);
        assert_eq!(q.weighted_average_cost(), Some(dec!(15)));
    }

    #[test]
    fn weighted_average_follows_quantity() {
        let q = queue(&[(dec!(10), dec!(3)), (dec!(30), dec!(1))]);
        assert_eq!(q.weighted_average_cost(), Some(dec!(15)));
    }

    #[test]
    fn weighted_average_undefined_when_nothing_open() {
        assert_eq!(LotQueue::new().weighted_average_cost(), None);
        let q = queue(&[(dec!(10), dec!(0))]);
        assert_eq!(q.weighted_average_cost(), None);
    }

    #[test]
    fn partial_consume_only_touches_oldest_lot() {
        let mut q = queue(&[(dec!(10), dec!(5)), (dec!(20), dec!(3))]);
        q.consume(dec!(2)).unwrap();

        let lots: Vec<_> = q.snapshot().collect();
        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0].quantity, dec!(3));
        assert_eq!(lots[1].quantity, dec!(3));
        assert_eq!(lots[1].price, dec!(20));
    }

    #[test]
    fn consume_spans_lots_and_drops_exhausted_ones() {
        let mut q = queue(&[
            (dec!(10), dec!(2)),
            (dec!(20), dec!(2)),
            (dec!(30), dec!(2)),
        ]);
        q.consume(dec!(3)).unwrap();

        let lots: Vec<_> = q.snapshot().collect();
        assert_eq!(lots.len(), 2);
        assert_eq!(lots[0].price, dec!(20));
        assert_eq!(lots[0].quantity, dec!(1));
        assert_eq!(lots[1].quantity, dec!(2));
    }

    #[test]
    fn consume_exact_total_empties_queue() {
        let mut q = queue(&[(dec!(10), dec!(2)), (dec!(20), dec!(2))]);
        assert!(q.consume(dec!(4)).is_ok());
        assert!(q.is_empty());
    }

    #[test]
    fn over_consume_reports_shortfall_and_empties_queue() {
        let mut q = queue(&[(dec!(10), dec!(1.5)), (dec!(20), dec!(1))]);
        let shortfall = q.consume(dec!(4)).unwrap_err();
        assert_eq!(
            shortfall,
            Shortfall {
                available: dec!(2.5),
                requested: dec!(4),
            }
        );
        assert!(q.is_empty());
    }

    #[test]
    fn consume_skips_zero_quantity_front_lots() {
        let mut q = queue(&[(dec!(10), dec!(0)), (dec!(20), dec!(2))]);
        q.consume(dec!(1)).unwrap();
        let lots: Vec<_> = q.snapshot().collect();
        assert_eq!(lots.len(), 1);
        assert_eq!(lots[0].quantity, dec!(1));
    }

    #[test]
    fn consume_conserves_quantity() {
        let mut q = queue(&[
            (dec!(10), dec!(1.25)),
            (dec!(11), dec!(3)),
            (dec!(12), dec!(0.75)),
        ]);
        let before = q.total_quantity();
        q.consume(dec!(2.5)).unwrap();
        assert_eq!(q.total_quantity() + dec!(2.5), before);
    }

    #[test]
    fn ledger_only_opens_queues_with_quantity() {
        let mut ledger = PositionLedger::new();
        assert!(ledger.open_queue_mut("AAPL").is_none());

        ledger.append("AAPL", lot(1, dec!(10), dec!(0)));
        assert!(ledger.open_queue_mut("AAPL").is_none());

        ledger.append("AAPL", lot(2, dec!(10), dec!(1)));
        assert!(ledger.open_queue_mut("AAPL").is_some());
    }

    #[test]
    fn ledger_iterates_in_symbol_order() {
        let mut ledger = PositionLedger::new();
        ledger.append("MSFT", lot(1, dec!(1), dec!(1)));
        ledger.append("AAPL", lot(2, dec!(1), dec!(1)));
        let symbols: Vec<_> = ledger.iter().map(|(s, _)| s).collect();
        assert_eq!(symbols, vec!["AAPL", "MSFT"]);
    }
}
