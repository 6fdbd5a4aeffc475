//! Exact Model Observer

use good_lp::{Expression, Variable};
use serde::Serialize;

/// Observer trait for capturing the exact cart model as it's built.
///
/// Callbacks fire at each step of model construction, so observers can record or
/// report the formulation without re-deriving it. Store and item indexes are
/// positions in the price table's store order and item order respectively.
pub trait ExactObserver {
    /// Called when the activation variable `y[s]` is created for a store.
    ///
    /// # Parameters
    ///
    /// - `store_idx`: Position of the store in table store order
    /// - `var`: The binary decision variable
    /// - `fee_minor`: Delivery fee in minor units
    fn on_activation_variable(&mut self, store_idx: usize, var: Variable, fee_minor: i64);

    /// Called when the assignment variable `x[i,s]` is created.
    ///
    /// # Parameters
    ///
    /// - `item_idx`: Position of the item in the table
    /// - `store_idx`: Position of the store in table store order
    /// - `var`: The binary decision variable
    /// - `cost_minor`: Objective cost in minor units
    /// - `usable`: `false` when `cost_minor` is the sentinel cost
    fn on_assignment_variable(
        &mut self,
        item_idx: usize,
        store_idx: usize,
        var: Variable,
        cost_minor: i64,
        usable: bool,
    );

    /// Called when a term is added to the objective function.
    fn on_objective_term(&mut self, _var: Variable, _coefficient: f64) {}

    /// Called when the "bought exactly once" constraint is added for an item.
    fn on_assignment_constraint(&mut self, item_idx: usize, constraint_expr: &Expression);

    /// Called when the `x[i,s] - y[s] <= 0` link is added.
    fn on_activation_link(&mut self, _item_idx: usize, _store_idx: usize, _expr: &Expression) {}
}

/// No-op observer for unobserved solves.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl ExactObserver for NoopObserver {
    fn on_activation_variable(&mut self, _: usize, _: Variable, _: i64) {}

    fn on_assignment_variable(&mut self, _: usize, _: usize, _: Variable, _: i64, _: bool) {}

    fn on_assignment_constraint(&mut self, _: usize, _: &Expression) {}
}

/// Counts what went into the model.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModelStats {
    /// `y[s]` variables
    pub activation_variables: usize,

    /// `x[i,s]` variables
    pub assignment_variables: usize,

    /// `x[i,s]` variables priced at the sentinel cost
    pub sentinel_pairings: usize,

    /// Objective terms
    pub objective_terms: usize,

    /// "Bought exactly once" constraints
    pub assignment_constraints: usize,

    /// Activation link constraints
    pub activation_links: usize,

    /// Sentinel cost in minor units, zero if no pairing used it
    pub sentinel_minor: i64,
}

impl ModelStats {
    /// Total number of decision variables.
    pub fn variables(&self) -> usize {
        self.activation_variables + self.assignment_variables
    }

    /// Total number of constraints.
    pub fn constraints(&self) -> usize {
        self.assignment_constraints + self.activation_links
    }
}

impl ExactObserver for ModelStats {
    fn on_activation_variable(&mut self, _store_idx: usize, _var: Variable, _fee_minor: i64) {
        self.activation_variables += 1;
    }

    fn on_assignment_variable(
        &mut self,
        _item_idx: usize,
        _store_idx: usize,
        _var: Variable,
        cost_minor: i64,
        usable: bool,
    ) {
        self.assignment_variables += 1;

        if !usable {
            self.sentinel_pairings += 1;
            self.sentinel_minor = cost_minor;
        }
    }

    fn on_objective_term(&mut self, _var: Variable, _coefficient: f64) {
        self.objective_terms += 1;
    }

    fn on_assignment_constraint(&mut self, _item_idx: usize, _constraint_expr: &Expression) {
        self.assignment_constraints += 1;
    }

    fn on_activation_link(&mut self, _item_idx: usize, _store_idx: usize, _expr: &Expression) {
        self.activation_links += 1;
    }
}
