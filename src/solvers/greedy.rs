//! Greedy Assigner

use rusty_money::{Money, iso::Currency};
use tracing::debug;

use crate::{
    assignment::{Assignment, Selection},
    solvers::{Assigner, SolverError, ensure_same_currency},
    table::{DeliveryFees, ItemQuotes, PriceTable, StoreKey},
};

/// Picks the cheapest usable quote for every item independently.
///
/// Delivery fees take no part in the decision, so the result can be more expensive
/// overall than [`ExactAssigner`](crate::solvers::ExactAssigner) once fees apply.
/// When several stores share the lowest price, the first one recorded for the item wins.
#[derive(Debug)]
pub struct GreedyAssigner;

impl Assigner for GreedyAssigner {
    fn assign<'a>(
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
    ) -> Result<Assignment<'a>, SolverError> {
        ensure_same_currency(table, fees)?;

        let mut assignment = Assignment::with_capacity(table.currency(), table.len());

        for item in table.iter() {
            let selection = cheapest_quote(table, item);

            if selection.is_none() {
                debug!(item = item.name(), "no usable quote");
            }

            assignment.push(item.name(), selection);
        }

        Ok(assignment)
    }
}

/// The strictly cheapest usable quote for `item`, first recorded winning ties.
fn cheapest_quote<'a>(table: &PriceTable<'a>, item: &ItemQuotes<'a>) -> Option<Selection<'a>> {
    let mut best: Option<(StoreKey, &Money<'a, Currency>)> = None;

    for (store, observation) in item.quotes() {
        let Some(price) = observation.usable_price() else {
            continue;
        };

        let is_cheaper = match best {
            Some((_, best_price)) => price.to_minor_units() < best_price.to_minor_units(),
            None => true,
        };

        if is_cheaper {
            best = Some((store, price));
        }
    }

    let (store, price) = best?;

    table
        .store_name(store)
        .map(|name| Selection::new(name, *price))
}
