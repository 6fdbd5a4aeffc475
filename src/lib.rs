//! Larder
//!
//! Larder splits a grocery list across delivery stores. Given what each store charges for
//! each item, it picks a store per item either greedily (cheapest price per item) or exactly
//! (cheapest cart once per-store delivery fees are counted).

pub mod assignment;
pub mod comparison;
pub mod config;
pub mod fixtures;
pub mod observability;
pub mod prelude;
pub mod pricing;
pub mod shopping_list;
pub mod solvers;
pub mod table;
