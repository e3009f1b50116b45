//! Schema command - print expected input formats

use clap::Args;
use fifotax::statements::StatementInput;
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: json-schema, csv-header or csv-fields
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the input format
    JsonSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(StatementInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => {
                let names: Vec<_> = CSV_FIELDS.iter().map(|(name, _, _)| *name).collect();
                println!("{}", names.join(","));
            }
            SchemaFormat::CsvFields => {
                println!("CSV Input Format");
                println!("================");
                println!();
                for (name, required, description) in CSV_FIELDS {
                    let req = if *required { "required" } else { "optional" };
                    println!("{:15} ({:8})  {}", name, req, description);
                }
                println!();
                println!("Rows are processed in trade date order; same-day rows keep file order.");
            }
        }
        Ok(())
    }
}

const CSV_FIELDS: &[(&str, bool, &str)] = &[
    (
        "symbol",
        false,
        "Instrument symbol (required for trades and dividends; \".OLD\" suffix marks surrendered shares)",
    ),
    (
        "activity_type",
        true,
        "BUY, SELL, SSP, MAS, DIV, DIVCGL, DIVCGS, DIVROC, DIVTXEX, DIVNRA, DIVFT, DIVTW; others ignored",
    ),
    ("trade_date", true, "YYYY-MM-DD or YYYY-MM-DDThh:mm:ss"),
    (
        "quantity",
        false,
        "Signed unit count; negative SSP/MAS quantities surrender shares",
    ),
    ("price", false, "Price per unit in the native currency"),
    ("amount", false, "Total cash amount in the native currency"),
    (
        "exchange_rate",
        false,
        "Native to reporting currency rate (required for trades and dividends)",
    ),
    ("company", false, "Paying company name for dividends"),
];
