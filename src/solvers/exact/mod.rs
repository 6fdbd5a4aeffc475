//! Exact Assigner
//!
//! Buying anything from a store incurs that store's delivery fee once, however many
//! items come from it. That fixed charge couples the per-item choices, so the cheapest
//! cart is found with a 0/1 integer programme rather than item by item:
//!
//! ```text
//! minimise   sum(i,s) cost(i,s) * x[i,s] + sum(s) fee(s) * y[s]
//! subject to sum(s) x[i,s] = 1        for every item i
//!            x[i,s] - y[s] <= 0       for every item i and store s
//!            x, y binary
//! ```
//!
//! `cost(i,s)` is the quoted price when store `s` can sell item `i`, and the sentinel
//! cost otherwise. The sentinel exceeds the cost of every all-real cart, so it is only
//! ever chosen for an item no store can sell; such items come back unassigned.

use good_lp::{Expression, Solution, SolverModel};
use rusty_money::Money;
use smallvec::SmallVec;
use tracing::debug;

#[cfg(feature = "solver-highs")]
use good_lp::solvers::highs::highs as default_solver;
#[cfg(all(not(feature = "solver-highs"), feature = "solver-microlp"))]
use good_lp::solvers::microlp::microlp as default_solver;

use crate::{
    assignment::{Assignment, Selection},
    pricing::i64_to_f64_exact,
    solvers::{
        Assigner, SolverError, ensure_same_currency,
        exact::state::{AssignmentRow, ConstraintRelation, ExactConstraint, ExactState},
    },
    table::{DeliveryFees, PriceObservation, PriceTable, StoreKey},
};

pub mod observer;
pub(crate) mod state;

pub use observer::{ExactObserver, ModelStats, NoopObserver};

/// Binary threshold for determining truthiness
pub const BINARY_THRESHOLD: f64 = 0.5;

type StoreList<'t> = SmallVec<[(StoreKey, &'t str); 8]>;

/// Jointly optimal assignment of items to stores, including delivery fees.
#[derive(Debug)]
pub struct ExactAssigner;

impl ExactAssigner {
    /// Solve with an observer for capturing the model as it is built.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError`] if the inputs are inconsistent or the solver fails.
    ///
    /// # Example
    ///
    /// ```rust
    /// use larder::solvers::exact::{ExactAssigner, ModelStats};
    /// use larder::table::{DeliveryFees, PriceObservation, PriceTable};
    /// use rusty_money::{Money, iso::INR};
    /// # fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut table = PriceTable::new(INR);
    /// table.insert("milk", "Blinkit", PriceObservation::available(Money::from_minor(5000, INR)))?;
    ///
    /// let mut stats = ModelStats::default();
    /// let assignment =
    ///     ExactAssigner::assign_with_observer(&table, &DeliveryFees::none(INR), &mut stats)?;
    ///
    /// assert_eq!(stats.variables(), 2);
    /// assert_eq!(assignment.len(), 1);
    /// # Ok(())
    /// # }
    /// # example().unwrap();
    /// ```
    pub fn assign_with_observer<'a>(
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
        observer: &mut dyn ExactObserver,
    ) -> Result<Assignment<'a>, SolverError> {
        ensure_same_currency(table, fees)?;

        // Nothing to buy.
        if table.is_empty() {
            return Ok(Assignment::new(table.currency()));
        }

        // Items but no stores at all: "bought exactly once" has no variables to satisfy.
        if table.store_count() == 0 {
            let mut assignment = Assignment::with_capacity(table.currency(), table.len());

            for item in table.iter() {
                assignment.push(item.name(), None);
            }

            return Ok(assignment);
        }

        let stores: StoreList<'_> = table.stores().collect();
        let sentinel = sentinel_cost(table, fees, &stores)?;

        let mut state = ExactState::new();

        build_activation_variables(&mut state, fees, &stores, observer)?;
        build_assignment_variables(&mut state, table, &stores, sentinel, observer)?;
        add_assignment_constraints(&mut state, observer);
        add_activation_links(&mut state, observer)?;

        debug!(
            items = table.len(),
            stores = stores.len(),
            constraints = state.constraint_count(),
            sentinel_minor = sentinel,
            "built exact cart model"
        );

        let parts = state.into_parts();

        ensure_rows_len(parts.assignment.len(), table.len())?;

        let model = apply_recorded_constraints(
            parts.pb.minimise(parts.cost).using(default_solver),
            parts.constraints,
        );

        let solution = model.solve()?;

        let assignment = extract_assignment(table, &stores, &parts.assignment, &solution)?;

        debug!(
            activated = assignment.activated_stores().len(),
            unassigned = assignment.unavailable().count(),
            "solved exact cart model"
        );

        Ok(assignment)
    }
}

impl Assigner for ExactAssigner {
    fn assign<'a>(
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
    ) -> Result<Assignment<'a>, SolverError> {
        let mut observer = NoopObserver;

        Self::assign_with_observer(table, fees, &mut observer)
    }
}

/// One more than every usable price plus every store fee, in minor units.
fn sentinel_cost(
    table: &PriceTable<'_>,
    fees: &DeliveryFees<'_>,
    stores: &[(StoreKey, &str)],
) -> Result<i64, SolverError> {
    let prices = table
        .iter()
        .flat_map(|item| item.quotes())
        .filter_map(|(_, observation)| observation.usable_price().map(Money::to_minor_units));

    let store_fees = stores
        .iter()
        .map(|(_, name)| fees.fee_for(name).to_minor_units());

    prices
        .chain(store_fees)
        .try_fold(1_i64, i64::checked_add)
        .ok_or(SolverError::InvariantViolation {
            message: "sentinel cost overflows i64",
        })
}

/// Convert minor units to an objective coefficient without losing precision.
fn coefficient(minor_units: i64) -> Result<f64, SolverError> {
    i64_to_f64_exact(minor_units).ok_or(SolverError::MinorUnitsNotRepresentable(minor_units))
}

/// Add `y[s]` for every store, priced at its delivery fee.
fn build_activation_variables(
    state: &mut ExactState,
    fees: &DeliveryFees<'_>,
    stores: &[(StoreKey, &str)],
    observer: &mut dyn ExactObserver,
) -> Result<(), SolverError> {
    for (store_idx, (_, name)) in stores.iter().enumerate() {
        let fee_minor = fees.fee_for(name).to_minor_units();
        let coeff = coefficient(fee_minor)?;
        let var = state.add_activation(coeff);

        observer.on_activation_variable(store_idx, var, fee_minor);
        observer.on_objective_term(var, coeff);
    }

    Ok(())
}

/// Add `x[i,s]` for every item and every store in the table, not only the stores
/// that quoted the item.
fn build_assignment_variables(
    state: &mut ExactState,
    table: &PriceTable<'_>,
    stores: &[(StoreKey, &str)],
    sentinel: i64,
    observer: &mut dyn ExactObserver,
) -> Result<(), SolverError> {
    let sentinel_coeff = coefficient(sentinel)?;

    for (item_idx, item) in table.iter().enumerate() {
        state.begin_item();

        for (store_idx, (store_key, _)) in stores.iter().enumerate() {
            let usable_minor = item
                .quote(*store_key)
                .and_then(PriceObservation::usable_price)
                .map(Money::to_minor_units);

            let (cost_minor, coeff) = match usable_minor {
                Some(minor_units) => (minor_units, coefficient(minor_units)?),
                None => (sentinel, sentinel_coeff),
            };

            let var = state
                .add_assignment(coeff)
                .ok_or(SolverError::InvariantViolation {
                    message: "assignment variable added before its item row",
                })?;

            observer.on_assignment_variable(
                item_idx,
                store_idx,
                var,
                cost_minor,
                usable_minor.is_some(),
            );
            observer.on_objective_term(var, coeff);
        }
    }

    Ok(())
}

/// Every item is bought from exactly one store.
fn add_assignment_constraints(state: &mut ExactState, observer: &mut dyn ExactObserver) {
    let sums: SmallVec<[Expression; 16]> = state
        .assignment()
        .iter()
        .map(|row| row.iter().copied().sum())
        .collect();

    for (item_idx, expr) in sums.into_iter().enumerate() {
        observer.on_assignment_constraint(item_idx, &expr);

        state.add_eq_constraint(expr, 1.0);
    }
}

/// A store must be activated (and its fee paid) before any item is bought there.
fn add_activation_links(
    state: &mut ExactState,
    observer: &mut dyn ExactObserver,
) -> Result<(), SolverError> {
    let mut links: Vec<(usize, usize, Expression)> = Vec::new();

    for (item_idx, row) in state.assignment().iter().enumerate() {
        ensure_rows_len(row.len(), state.activation().len())?;

        for (store_idx, (x, y)) in row.iter().zip(state.activation()).enumerate() {
            links.push((item_idx, store_idx, Expression::from(*x) - *y));
        }
    }

    for (item_idx, store_idx, expr) in links {
        observer.on_activation_link(item_idx, store_idx, &expr);

        state.add_leq_constraint(expr, 0.0);
    }

    Ok(())
}

fn apply_recorded_constraints<S: SolverModel>(
    mut model: S,
    constraints: Vec<ExactConstraint>,
) -> S {
    for constraint in constraints {
        model = match constraint.relation {
            ConstraintRelation::Eq => model.with(constraint.lhs.eq(constraint.rhs)),
            ConstraintRelation::Leq => model.with(constraint.lhs.leq(constraint.rhs)),
        };
    }

    model
}

/// Ensure two per-position collections line up.
fn ensure_rows_len(actual: usize, expected: usize) -> Result<(), SolverError> {
    if actual != expected {
        return Err(SolverError::InvariantViolation {
            message: "variable count does not match the price table",
        });
    }

    Ok(())
}

/// Translate the solver's decisions back into an [`Assignment`].
///
/// Items whose chosen pairing has no usable quote were only placed by the sentinel
/// cost and are reported as unassigned.
fn extract_assignment<'a>(
    table: &PriceTable<'a>,
    stores: &[(StoreKey, &str)],
    rows: &[AssignmentRow],
    solution: &impl Solution,
) -> Result<Assignment<'a>, SolverError> {
    let mut assignment = Assignment::with_capacity(table.currency(), table.len());

    for (item, row) in table.iter().zip(rows) {
        // `var` is a binary decision variable; the solver returns floats, so treat values
        // greater than 0.5 as "selected" (i.e. 1) to tolerate tiny numerical noise.
        let (store_key, store_name) = row
            .iter()
            .zip(stores)
            .find_map(|(var, store)| (solution.value(*var) > BINARY_THRESHOLD).then_some(*store))
            .ok_or(SolverError::InvariantViolation {
                message: "item was not assigned to any store",
            })?;

        let selection = item
            .quote(store_key)
            .and_then(PriceObservation::usable_price)
            .map(|price| Selection::new(store_name, *price));

        if selection.is_none() {
            debug!(item = item.name(), "no usable quote; left unassigned");
        }

        assignment.push(item.name(), selection);
    }

    Ok(assignment)
}
