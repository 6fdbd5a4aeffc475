//! Exact Model State

use std::fmt;

use good_lp::{Expression, ProblemVariables, Variable, variable};
use smallvec::SmallVec;

/// Per-item row of `x[i,s]` variables, aligned with table store order.
pub(crate) type AssignmentRow = SmallVec<[Variable; 8]>;

/// Relation operator for a linear constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ConstraintRelation {
    /// Equality (`lhs == rhs`)
    Eq,

    /// Less than or equal (`lhs <= rhs`)
    Leq,
}

/// Recorded linear constraint emitted during model construction.
#[derive(Debug, Clone)]
pub(crate) struct ExactConstraint {
    /// Left-hand side expression
    pub(crate) lhs: Expression,

    /// Relation operator
    pub(crate) relation: ConstraintRelation,

    /// Right-hand side scalar
    pub(crate) rhs: f64,
}

/// Builder state for the exact cart model.
pub(crate) struct ExactState {
    pb: ProblemVariables,
    cost: Expression,
    activation: AssignmentRow,
    assignment: Vec<AssignmentRow>,
    constraints: Vec<ExactConstraint>,
}

impl fmt::Debug for ExactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExactState")
            .field("pb", &"<ProblemVariables>")
            .field("cost", &"<Expression>")
            .field(
                "activation",
                &format!("[{} variables]", self.activation.len()),
            )
            .field("assignment", &format!("[{} items]", self.assignment.len()))
            .field(
                "constraints",
                &format!("[{} constraints]", self.constraints.len()),
            )
            .finish()
    }
}

/// The finished model, ready to hand to a solver.
pub(crate) struct ExactParts {
    pub(crate) pb: ProblemVariables,
    pub(crate) cost: Expression,
    pub(crate) assignment: Vec<AssignmentRow>,
    pub(crate) constraints: Vec<ExactConstraint>,
}

impl ExactState {
    pub(crate) fn new() -> Self {
        Self {
            pb: ProblemVariables::new(),
            cost: Expression::default(),
            activation: SmallVec::new(),
            assignment: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Add a store activation variable `y[s]` priced at `fee`.
    pub(crate) fn add_activation(&mut self, fee: f64) -> Variable {
        let var = self.pb.add(variable().binary());

        self.cost += var * fee;
        self.activation.push(var);

        var
    }

    /// Start the row of assignment variables for the next item.
    pub(crate) fn begin_item(&mut self) {
        self.assignment.push(AssignmentRow::new());
    }

    /// Add an assignment variable `x[i,s]` priced at `cost` to the current item row.
    pub(crate) fn add_assignment(&mut self, cost: f64) -> Option<Variable> {
        let var = self.pb.add(variable().binary());

        self.cost += var * cost;
        self.assignment.last_mut()?.push(var);

        Some(var)
    }

    /// Activation variables in table store order.
    pub(crate) fn activation(&self) -> &[Variable] {
        &self.activation
    }

    /// Assignment variable rows in table item order.
    pub(crate) fn assignment(&self) -> &[AssignmentRow] {
        &self.assignment
    }

    /// Record an equality constraint.
    pub(crate) fn add_eq_constraint(&mut self, lhs: Expression, rhs: f64) {
        self.constraints.push(ExactConstraint {
            lhs,
            relation: ConstraintRelation::Eq,
            rhs,
        });
    }

    /// Record a less-than-or-equal constraint.
    pub(crate) fn add_leq_constraint(&mut self, lhs: Expression, rhs: f64) {
        self.constraints.push(ExactConstraint {
            lhs,
            relation: ConstraintRelation::Leq,
            rhs,
        });
    }

    /// Number of recorded constraints.
    pub(crate) fn constraint_count(&self) -> usize {
        self.constraints.len()
    }

    pub(crate) fn into_parts(self) -> ExactParts {
        ExactParts {
            pb: self.pb,
            cost: self.cost,
            assignment: self.assignment,
            constraints: self.constraints,
        }
    }
}
