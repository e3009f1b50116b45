use clap::{Parser, Subcommand};

mod cmd;

use cmd::{
    dividends::DividendsCommand, gains::GainsCommand, holdings::HoldingsCommand,
    report::ReportCommand, schema::SchemaCommand, validate::ValidateCommand, ConfigArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "fifotax",
    version,
    about = "FIFO capital gains and dividend tax calculator for brokerage statements"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Realized gains, remaining holdings and dividend tax
    Report(ReportCommand),
    /// Realized profit and loss per sale
    Gains(GainsCommand),
    /// Lots still open after all statements
    Holdings(HoldingsCommand),
    /// Dividend income, withheld tax and tax owed per symbol
    Dividends(DividendsCommand),
    /// Check statements for missing cost basis and orphan dividend tax
    Validate(ValidateCommand),
    /// Print the expected input format
    Schema(SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    let config = cli.config.to_config()?;
    log::debug!("Using {:?}", config);

    match cli.command {
        Command::Report(cmd) => cmd.exec(&config),
        Command::Gains(cmd) => cmd.exec(&config),
        Command::Holdings(cmd) => cmd.exec(&config),
        Command::Dividends(cmd) => cmd.exec(&config),
        Command::Validate(cmd) => cmd.exec(&config),
        Command::Schema(cmd) => cmd.exec(),
    }
}
