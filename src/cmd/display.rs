//! Row types and formatting shared by the report commands

use chrono::NaiveDate;
use fifotax::core::{Config, DividendTaxRecord, RealizedSale, ValuedLot, Warning};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Formats figures and dates the way the configuration asks
pub struct Presenter<'a> {
    config: &'a Config,
}

impl<'a> Presenter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Presenter { config }
    }

    pub fn amount(&self, amount: Decimal) -> String {
        format!("{:.*}", self.config.precision as usize, amount)
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format(&self.config.date_format).to_string()
    }

    pub fn sale(&self, sale: &RealizedSale) -> SaleRow {
        SaleRow {
            symbol: sale.symbol.clone(),
            trade_date: self.date(sale.trade_date),
            quantity: format_quantity(sale.quantity),
            avg_purchase_price: format_quantity(sale.avg_purchase_price),
            purchase_price: self.amount(sale.purchase_price),
            sell_price: self.amount(sale.sell_price),
            sell_exchange_rate: self.amount(sale.sell_exchange_rate),
            profit: self.amount(sale.profit),
            loss: self.amount(sale.loss),
        }
    }

    pub fn holding(&self, symbol: &str, lot: &ValuedLot) -> HoldingRow {
        HoldingRow {
            symbol: symbol.to_string(),
            trade_date: self.date(lot.trade_date),
            quantity: format_quantity(lot.quantity),
            price_native: format_quantity(lot.price_native),
            price: format_quantity(lot.price),
            total_cost_native: self.amount(lot.total_cost_native),
            total_cost_reporting: self.amount(lot.total_cost_reporting),
        }
    }

    pub fn dividend(&self, record: &DividendTaxRecord) -> DividendRow {
        DividendRow {
            stock_symbol: record.stock_symbol.clone(),
            company: record.company.clone(),
            gross_profit_amount: self.amount(record.gross_profit_amount),
            paid_tax_amount: self.amount(record.paid_tax_amount),
            owe_tax: self.amount(record.owe_tax),
        }
    }

    pub fn warning(&self, warning: &Warning) -> WarningRow {
        WarningRow {
            kind: warning.kind().to_string(),
            trade_date: self.date(warning.trade_date()),
            symbol: warning.symbol().to_string(),
            message: warning.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct SaleRow {
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Date")]
    pub trade_date: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[tabled(rename = "Avg Cost")]
    pub avg_purchase_price: String,
    #[tabled(rename = "Purchase")]
    pub purchase_price: String,
    #[tabled(rename = "Sale")]
    pub sell_price: String,
    #[tabled(rename = "FX")]
    pub sell_exchange_rate: String,
    #[tabled(rename = "Profit")]
    pub profit: String,
    #[tabled(rename = "Loss")]
    pub loss: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct HoldingRow {
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Date")]
    pub trade_date: String,
    #[tabled(rename = "Quantity")]
    pub quantity: String,
    #[tabled(rename = "Unit Cost (native)")]
    pub price_native: String,
    #[tabled(rename = "Unit Cost")]
    pub price: String,
    #[tabled(rename = "Cost (native)")]
    pub total_cost_native: String,
    #[tabled(rename = "Cost")]
    pub total_cost_reporting: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct DividendRow {
    #[tabled(rename = "Symbol")]
    pub stock_symbol: String,
    #[tabled(rename = "Company")]
    pub company: String,
    #[tabled(rename = "Gross")]
    pub gross_profit_amount: String,
    #[tabled(rename = "Tax Paid")]
    pub paid_tax_amount: String,
    #[tabled(rename = "Tax Owed")]
    pub owe_tax: String,
}

#[derive(Debug, Clone, Serialize, Tabled)]
pub struct WarningRow {
    #[serde(rename = "type")]
    #[tabled(rename = "Type")]
    pub kind: String,
    #[tabled(rename = "Date")]
    pub trade_date: String,
    #[tabled(rename = "Symbol")]
    pub symbol: String,
    #[tabled(rename = "Message")]
    pub message: String,
}

/// Render rows as a rounded table with numbers right-aligned
pub fn table<T: Tabled>(rows: Vec<T>, numeric_from: usize) -> String {
    Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(numeric_from..)).with(Alignment::right()))
        .to_string()
}

pub fn write_csv<I, R, W>(records: I, writer: W) -> anyhow::Result<()>
where
    I: IntoIterator<Item = R>,
    R: Serialize,
    W: Write,
{
    let mut wtr = csv::Writer::from_writer(writer);
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn format_quantity(qty: Decimal) -> String {
    qty.normalize().to_string()
}
