//! Larder prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    assignment::{AssignedItem, Assignment, CartCost, Selection},
    comparison::{Comparison, ComparisonSummary},
    fixtures::{CartFixture, FixtureError},
    shopping_list::{ShoppingList, ShoppingListError, ShoppingListView},
    solvers::{
        Assigner, ExactAssigner, GreedyAssigner, Method, SolverError,
        exact::{ExactObserver, ModelStats, NoopObserver},
    },
    table::{DeliveryFees, PriceObservation, PriceTable, PriceTableError, StoreKey},
};
