//! Configuration
//!
//! Command-line and environment settings for the `satchel` binary.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

use crate::{
    budget::{Budget, BudgetError},
    combinations::EnumerationStrategy,
    items::CURRENCY_EXPONENT,
    solvers::{
        brute_force::{BruteForceSolver, DEFAULT_ITEM_LIMIT},
        dp::{DEFAULT_CELL_LIMIT, DpSolver},
    },
};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Currency code not known to the ISO currency table.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Currency whose minor unit is not a hundredth of the major unit.
    #[error("currency {code} has {exponent} decimal places, only 2 are supported")]
    UnsupportedCurrency {
        /// ISO code
        code: String,
        /// Decimal places of the currency's minor unit
        exponent: u32,
    },

    /// Budget could not be converted to minor units.
    #[error(transparent)]
    Budget(#[from] BudgetError),
}

/// Solving strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Strategy {
    /// Exact dynamic programming over a profit table.
    #[default]
    Dp,

    /// Exhaustive search over incrementally doubled subsets.
    BruteForce,

    /// Exhaustive search over subsets generated size by size.
    Combinations,

    /// Binary integer program.
    Ilp,
}

impl Strategy {
    /// Name shown in reports
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dp => "dp",
            Self::BruteForce => "brute-force",
            Self::Combinations => "combinations",
            Self::Ilp => "ilp",
        }
    }

    /// Enumeration used by the exhaustive strategies
    pub const fn enumeration(self) -> Option<EnumerationStrategy> {
        match self {
            Self::BruteForce => Some(EnumerationStrategy::Doubling),
            Self::Combinations => Some(EnumerationStrategy::SizeIndexed),
            Self::Dp | Self::Ilp => None,
        }
    }
}

/// Report output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Table followed by a summary.
    #[default]
    Table,

    /// YAML document.
    Yaml,
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Budget-constrained action selection
#[derive(Debug, Parser)]
#[command(
    name = "satchel",
    about = "Pick the most profitable actions within a budget",
    long_about = None
)]
pub struct Config {
    /// Catalog file with `name,price,profit` columns
    #[arg(value_name = "CATALOG")]
    pub catalog: PathBuf,

    /// Budget in major currency units
    #[arg(
        short,
        long,
        env = "SATCHEL_BUDGET",
        default_value = "500",
        allow_hyphen_values = true
    )]
    pub budget: Decimal,

    /// ISO currency code for prices and budget
    #[arg(short, long, env = "SATCHEL_CURRENCY", default_value = "EUR")]
    pub currency: String,

    /// Solving strategy
    #[arg(short, long, value_enum, default_value_t = Strategy::Dp)]
    pub strategy: Strategy,

    /// Maximum number of profit table cells for the DP strategy
    #[arg(long, env = "SATCHEL_MAX_CELLS", default_value_t = DEFAULT_CELL_LIMIT)]
    pub max_cells: usize,

    /// Maximum number of items for the exhaustive strategies
    #[arg(
        long,
        env = "SATCHEL_MAX_BRUTE_FORCE_ITEMS",
        default_value_t = DEFAULT_ITEM_LIMIT
    )]
    pub max_brute_force_items: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Include the best profit after each row (DP strategy only)
    #[arg(long)]
    pub progress: bool,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }

    /// Budget in minor units
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Budget`] for a negative or unrepresentable budget.
    pub fn budget(&self) -> Result<Budget, ConfigError> {
        Ok(Budget::from_major(self.budget)?)
    }

    /// Currency for prices and budget
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownCurrency`]: the code is not an ISO currency.
    /// - [`ConfigError::UnsupportedCurrency`]: the currency does not use cents as its minor unit.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        let code = self.currency.trim().to_ascii_uppercase();

        let Some(currency) = iso::find(&code) else {
            return Err(ConfigError::UnknownCurrency(code));
        };

        if currency.exponent != CURRENCY_EXPONENT {
            return Err(ConfigError::UnsupportedCurrency {
                code,
                exponent: currency.exponent,
            });
        }

        Ok(currency)
    }

    /// DP solver with the configured cell limit
    pub fn dp_solver(&self) -> DpSolver {
        DpSolver::with_cell_limit(self.max_cells)
    }

    /// Brute-force solver with the configured item limit and the strategy's enumeration
    pub fn brute_force_solver(&self) -> BruteForceSolver {
        BruteForceSolver::new()
            .with_strategy(self.strategy.enumeration().unwrap_or_default())
            .with_item_limit(self.max_brute_force_items)
    }
}
