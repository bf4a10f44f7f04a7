//! [`Args`] definitions.

use clap::Parser;
use common::Date;

/// Calculator of rent balances, late fees and payment statuses.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Path to the ledger file with a contract and its payments.
    #[arg(short, long)]
    pub ledger: String,

    /// Date to derive the balance at, in `YYYY-MM-DD` format.
    ///
    /// Defaults to the current UTC date.
    #[arg(short, long)]
    pub today: Option<Date>,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}
