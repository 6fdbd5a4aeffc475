//! Assignments
//!
//! The output of every assigner: which store each requested item should be bought from.

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::SmallVec;

use crate::{pricing::total_price, table::DeliveryFees};

/// The store an item is bought from, at exactly the price that store quoted.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a> {
    /// Store name
    pub store: String,

    /// Quoted price
    pub price: Money<'a, Currency>,
}

impl<'a> Selection<'a> {
    /// Create a new selection.
    pub fn new(store: impl Into<String>, price: Money<'a, Currency>) -> Self {
        Self {
            store: store.into(),
            price,
        }
    }
}

/// One requested item and where (if anywhere) to buy it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedItem<'a> {
    /// Item name, as requested
    pub item: String,

    /// Chosen store and price, `None` if no store can sell the item
    pub selection: Option<Selection<'a>>,
}

/// Cost breakdown of an assignment under a delivery fee table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartCost<'a> {
    /// Sum of the selected item prices
    pub items: Money<'a, Currency>,

    /// Sum of the delivery fees of every store used at least once
    pub delivery: Money<'a, Currency>,

    /// Items plus delivery
    pub total: Money<'a, Currency>,
}

/// Item -> store assignment, one entry per item of the source table, in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment<'a> {
    currency: &'static Currency,
    entries: Vec<AssignedItem<'a>>,
}

impl<'a> Assignment<'a> {
    /// Create an empty assignment.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            entries: Vec::new(),
        }
    }

    /// Create an empty assignment with room for `capacity` items.
    pub fn with_capacity(currency: &'static Currency, capacity: usize) -> Self {
        Self {
            currency,
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Append the decision for the next item.
    pub fn push(&mut self, item: impl Into<String>, selection: Option<Selection<'a>>) {
        self.entries.push(AssignedItem {
            item: item.into(),
            selection,
        });
    }

    /// Decision for `item`: `None` if the item is not in the assignment,
    /// `Some(None)` if it was left unassigned.
    pub fn get(&self, item: &str) -> Option<Option<&Selection<'a>>> {
        self.entries
            .iter()
            .find(|entry| entry.item == item)
            .map(|entry| entry.selection.as_ref())
    }

    /// Entries in table order.
    pub fn iter(&self) -> impl Iterator<Item = &AssignedItem<'a>> {
        self.entries.iter()
    }

    /// Items no store could sell, in table order.
    pub fn unavailable(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|entry| entry.selection.is_none())
            .map(|entry| entry.item.as_str())
    }

    /// Stores used by at least one item, each once, in order of first use.
    pub fn activated_stores(&self) -> SmallVec<[&str; 8]> {
        let mut stores: SmallVec<[&str; 8]> = SmallVec::new();

        for selection in self.entries.iter().filter_map(|entry| entry.selection.as_ref()) {
            if !stores.contains(&selection.store.as_str()) {
                stores.push(selection.store.as_str());
            }
        }

        stores
    }

    /// Sum of the selected item prices.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if a selected price is in another currency.
    pub fn item_subtotal(&self) -> Result<Money<'a, Currency>, MoneyError> {
        total_price(
            self.entries
                .iter()
                .filter_map(|entry| entry.selection.as_ref())
                .map(|selection| &selection.price),
            self.currency,
        )
    }

    /// Delivery fees payable: each activated store's fee exactly once.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the fee table is in another currency.
    pub fn delivery_total(
        &self,
        fees: &DeliveryFees<'a>,
    ) -> Result<Money<'a, Currency>, MoneyError> {
        let store_fees: SmallVec<[Money<'a, Currency>; 8]> = self
            .activated_stores()
            .into_iter()
            .map(|store| fees.fee_for(store))
            .collect();

        total_price(&store_fees, self.currency)
    }

    /// Full cost breakdown under `fees`.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] on a currency mismatch.
    pub fn cost(&self, fees: &DeliveryFees<'a>) -> Result<CartCost<'a>, MoneyError> {
        let items = self.item_subtotal()?;
        let delivery = self.delivery_total(fees)?;

        Ok(CartCost {
            items,
            delivery,
            total: items.add(delivery)?,
        })
    }

    /// Assignment currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no items.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use super::*;

    fn consolidated<'a>() -> Assignment<'a> {
        let mut assignment = Assignment::new(INR);

        assignment.push("milk", Some(Selection::new("A", Money::from_minor(5000, INR))));
        assignment.push("bread", Some(Selection::new("A", Money::from_minor(3000, INR))));
        assignment.push("rice", None);

        assignment
    }

    #[test]
    fn get_distinguishes_missing_from_unassigned() {
        let assignment = consolidated();

        assert!(assignment.get("rice").is_some_and(|selection| selection.is_none()));
        assert!(assignment.get("ghee").is_none());
    }

    #[test]
    fn unavailable_lists_unassigned_items() {
        let assignment = consolidated();

        assert_eq!(assignment.unavailable().collect::<Vec<_>>(), ["rice"]);
    }

    #[test]
    fn store_fee_is_counted_once_per_activated_store() -> TestResult {
        let assignment = consolidated();
        let fees = DeliveryFees::none(INR)
            .with_fee("A", Money::from_minor(2000, INR))?
            .with_fee("B", Money::from_minor(2000, INR))?;

        let cost = assignment.cost(&fees)?;

        assert_eq!(assignment.activated_stores().as_slice(), ["A"]);
        assert_eq!(cost.items, Money::from_minor(8000, INR));
        assert_eq!(cost.delivery, Money::from_minor(2000, INR));
        assert_eq!(cost.total, Money::from_minor(10_000, INR));

        Ok(())
    }

    #[test]
    fn empty_assignment_costs_nothing() -> TestResult {
        let assignment = Assignment::new(INR);
        let fees = DeliveryFees::none(INR).with_fee("A", Money::from_minor(2000, INR))?;

        let cost = assignment.cost(&fees)?;

        assert!(assignment.is_empty());
        assert_eq!(cost.total, Money::from_minor(0, INR));

        Ok(())
    }
}
