//! Command-line configuration

use std::path::PathBuf;

use clap::Parser;

use crate::solvers::Method;

pub mod logging;

pub use logging::{LogFormat, LoggingConfig};

/// How the shopping list is printed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Table with store baskets and totals.
    #[default]
    Table,

    /// JSON document.
    Json,
}

/// Larder configuration
#[derive(Debug, Parser)]
#[command(
    name = "larder",
    about = "Split a grocery list across delivery stores at the lowest total cost",
    long_about = None
)]
pub struct CliConfig {
    /// Price table to optimise (`.yml`, `.yaml` or `.json`)
    #[arg(short, long, env = "LARDER_PRICES")]
    pub prices: PathBuf,

    /// Optimisation method (greedy, exact)
    #[arg(
        short,
        long,
        env = "LARDER_METHOD",
        value_enum,
        ignore_case = true,
        default_value_t = Method::Greedy
    )]
    pub method: Method,

    /// Run both methods and report the difference
    #[arg(short, long, env = "LARDER_COMPARE", default_value_t = false)]
    pub compare: bool,

    /// Print the size of the exact model before solving
    #[arg(short, long, env = "LARDER_EXPLAIN", default_value_t = false)]
    pub explain: bool,

    /// Output format (table, json)
    #[arg(short, long, env = "LARDER_OUTPUT", value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}
