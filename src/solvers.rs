//! Cart Assigners

use std::{fmt, str::FromStr};

use good_lp::ResolutionError;
use rusty_money::MoneyError;
use thiserror::Error;
use tracing::{instrument, warn};

use crate::{
    assignment::Assignment,
    solvers::exact::{ExactObserver, NoopObserver},
    table::{DeliveryFees, PriceTable},
};

pub mod exact;
pub mod greedy;

pub use exact::ExactAssigner;
pub use greedy::GreedyAssigner;

/// Solver Errors
#[derive(Debug, Error)]
pub enum SolverError {
    /// The requested optimisation method is not recognised.
    #[error("unknown optimisation method: {0:?} (expected \"greedy\", \"exact\" or \"ilp\")")]
    UnknownMethod(String),

    /// The delivery fee table is in a different currency from the price table.
    #[error("delivery fees are in {fees}, but prices are in {prices}")]
    CurrencyMismatch {
        /// Price table currency code
        prices: &'static str,
        /// Delivery fee table currency code
        fees: &'static str,
    },

    /// Money amount in minor units cannot be represented exactly as a solver coefficient.
    #[error(
        "money amount in minor units cannot be represented exactly as a solver coefficient: {0}"
    )]
    MinorUnitsNotRepresentable(i64),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// The solver could not find any feasible store activation.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// Internal solver invariant was violated (this is a bug).
    #[error("solver invariant violated: {message}")]
    InvariantViolation {
        /// What invariant was violated
        message: &'static str,
    },
}

/// Trait for assigning every item of a price table to a store
pub trait Assigner {
    /// Assign each item of `table` to a store, or leave it unassigned if no store sells it.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the inputs are inconsistent or the solver fails.
    fn assign<'a>(
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
    ) -> Result<Assignment<'a>, SolverError>;
}

/// Optimisation method selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Method {
    /// Cheapest store per item, ignoring delivery fees.
    #[default]
    Greedy,

    /// Jointly optimal items plus delivery fees (integer programme).
    #[value(alias = "ilp")]
    Exact,
}

impl Method {
    /// Run the selected assigner.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] from the underlying assigner.
    pub fn assign<'a>(
        self,
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
    ) -> Result<Assignment<'a>, SolverError> {
        self.assign_with_observer(table, fees, &mut NoopObserver)
    }

    /// Run the selected assigner, reporting the exact model to `observer`.
    ///
    /// The greedy method builds no model, so `observer` is never called for it.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] from the underlying assigner.
    #[instrument(skip_all, fields(method = %self, items = table.len(), stores = table.store_count()))]
    pub fn assign_with_observer<'a>(
        self,
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
        observer: &mut dyn ExactObserver,
    ) -> Result<Assignment<'a>, SolverError> {
        if !table.is_empty() && !table.has_usable_quote() {
            warn!("no store has a usable price for any requested item");
        }

        match self {
            Method::Greedy => GreedyAssigner::assign(table, fees),
            Method::Exact => ExactAssigner::assign_with_observer(table, fees, observer),
        }
    }
}

impl FromStr for Method {
    type Err = SolverError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "greedy" => Ok(Method::Greedy),
            "exact" | "ilp" => Ok(Method::Exact),
            _ => Err(SolverError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Method::Greedy => f.write_str("greedy"),
            Method::Exact => f.write_str("exact"),
        }
    }
}

/// Ensure the delivery fees are priced in the same currency as the table.
pub(crate) fn ensure_same_currency(
    table: &PriceTable<'_>,
    fees: &DeliveryFees<'_>,
) -> Result<(), SolverError> {
    if table.currency() == fees.currency() {
        return Ok(());
    }

    Err(SolverError::CurrencyMismatch {
        prices: table.currency().iso_alpha_code,
        fees: fees.currency().iso_alpha_code,
    })
}
