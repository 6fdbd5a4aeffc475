//! Greedy vs Exact Comparison

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::FromPrimitive};
use rusty_money::{Money, MoneyError, iso::Currency};
use serde::Serialize;

use crate::{
    assignment::{Assignment, CartCost},
    pricing::decimal_from_minor_units,
    solvers::{Assigner, ExactAssigner, GreedyAssigner, Method, SolverError},
    table::{DeliveryFees, PriceTable},
};

/// Both assignments for the same request, with their costs under the same fees.
#[derive(Debug, Clone)]
pub struct Comparison<'a> {
    /// Cheapest store per item
    pub greedy: Assignment<'a>,

    /// Cost of the greedy assignment including delivery
    pub greedy_cost: CartCost<'a>,

    /// Jointly optimal assignment
    pub exact: Assignment<'a>,

    /// Cost of the exact assignment including delivery
    pub exact_cost: CartCost<'a>,
}

/// Comparison totals in major units, for reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonSummary {
    /// Greedy total including delivery
    pub greedy_total: Decimal,

    /// Stores the greedy assignment orders from
    pub greedy_stores: usize,

    /// Exact total including delivery
    pub exact_total: Decimal,

    /// Stores the exact assignment orders from
    pub exact_stores: usize,

    /// Greedy total minus exact total
    pub savings: Decimal,

    /// Savings in percent points of the greedy total
    pub savings_percent: Decimal,
}

impl<'a> Comparison<'a> {
    /// Run both assigners.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if either assigner fails.
    pub fn run(table: &PriceTable<'a>, fees: &DeliveryFees<'a>) -> Result<Self, SolverError> {
        Self::reusing(table, fees, None)
    }

    /// Run the assigner that has not produced `solved` yet, reusing `solved` for the other.
    ///
    /// # Errors
    ///
    /// Returns a [`SolverError`] if the remaining assigner fails.
    pub fn reusing(
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
        solved: Option<(Method, Assignment<'a>)>,
    ) -> Result<Self, SolverError> {
        let (greedy, exact) = match solved {
            Some((Method::Greedy, greedy)) => (greedy, ExactAssigner::assign(table, fees)?),
            Some((Method::Exact, exact)) => (GreedyAssigner::assign(table, fees)?, exact),
            None => (
                GreedyAssigner::assign(table, fees)?,
                ExactAssigner::assign(table, fees)?,
            ),
        };

        let greedy_cost = greedy.cost(fees)?;
        let exact_cost = exact.cost(fees)?;

        Ok(Self {
            greedy,
            greedy_cost,
            exact,
            exact_cost,
        })
    }

    /// How much the exact assignment saves over the greedy one.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings(&self) -> Result<Money<'a, Currency>, MoneyError> {
        self.greedy_cost.total.sub(self.exact_cost.total)
    }

    /// Savings as a fraction of the greedy total.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent(&self) -> Result<Percentage, MoneyError> {
        let savings_minor = self.savings()?.to_minor_units();
        let greedy_minor = self.greedy_cost.total.to_minor_units();

        if greedy_minor == 0 {
            return Ok(Percentage::from(0.0));
        }

        let savings_dec = Decimal::from_i64(savings_minor).unwrap_or(Decimal::ZERO);
        let greedy_dec = Decimal::from_i64(greedy_minor).unwrap_or(Decimal::ZERO);

        Ok(Percentage::from(savings_dec / greedy_dec))
    }

    /// Savings in percent points, rounded to two places for display.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn savings_percent_points(&self) -> Result<Decimal, MoneyError> {
        let percentage = self.savings_percent()?;

        // `Percentage` is a fraction (e.g. 0.25), so multiply by 100 to print percent points.
        Ok(((percentage * Decimal::ONE) * Decimal::ONE_HUNDRED).round_dp(2))
    }

    /// Totals and savings for reporting.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the subtraction operation fails.
    pub fn summary(&self) -> Result<ComparisonSummary, MoneyError> {
        Ok(ComparisonSummary {
            greedy_total: decimal_from_minor_units(self.greedy_cost.total.to_minor_units()),
            greedy_stores: self.greedy.activated_stores().len(),
            exact_total: decimal_from_minor_units(self.exact_cost.total.to_minor_units()),
            exact_stores: self.exact.activated_stores().len(),
            savings: decimal_from_minor_units(self.savings()?.to_minor_units()),
            savings_percent: self.savings_percent_points()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::INR;
    use testresult::TestResult;

    use crate::{assignment::Selection, table::PriceObservation};

    use super::*;

    #[test]
    fn consolidation_saves_eighteen_rupees() -> TestResult {
        let mut table = PriceTable::new(INR);
        table.insert("milk", "A", PriceObservation::available(Money::from_minor(5000, INR)))?;
        table.insert("milk", "B", PriceObservation::available(Money::from_minor(4800, INR)))?;
        table.insert("bread", "A", PriceObservation::available(Money::from_minor(3000, INR)))?;
        table.insert("bread", "B", PriceObservation::available(Money::from_minor(6000, INR)))?;

        let fees = DeliveryFees::none(INR)
            .with_fee("A", Money::from_minor(2000, INR))?
            .with_fee("B", Money::from_minor(2000, INR))?;

        let comparison = Comparison::run(&table, &fees)?;

        assert_eq!(comparison.greedy_cost.total, Money::from_minor(11_800, INR));
        assert_eq!(comparison.exact_cost.total, Money::from_minor(10_000, INR));
        assert_eq!(comparison.savings()?, Money::from_minor(1800, INR));
        assert_eq!(comparison.savings_percent_points()?, Decimal::new(1525, 2));

        let summary = comparison.summary()?;

        assert_eq!(summary.greedy_stores, 2);
        assert_eq!(summary.exact_stores, 1);
        assert_eq!(summary.savings, Decimal::new(1800, 2));

        Ok(())
    }

    #[test]
    fn reuses_an_existing_assignment() -> TestResult {
        let mut table = PriceTable::new(INR);
        table.insert("milk", "A", PriceObservation::available(Money::from_minor(5000, INR)))?;
        table.insert("milk", "B", PriceObservation::available(Money::from_minor(4800, INR)))?;

        let fees = DeliveryFees::none(INR).with_fee("B", Money::from_minor(500, INR))?;

        // Greedy would pick B and exact would pick A, so swapped picks must come from the caller.
        let mut at_a = Assignment::new(INR);
        at_a.push("milk", Some(Selection::new("A", Money::from_minor(5000, INR))));

        let mut at_b = Assignment::new(INR);
        at_b.push("milk", Some(Selection::new("B", Money::from_minor(4800, INR))));

        let comparison = Comparison::reusing(&table, &fees, Some((Method::Greedy, at_a.clone())))?;

        assert_eq!(comparison.greedy, at_a);
        assert_eq!(comparison.exact_cost.total, Money::from_minor(5000, INR));

        let comparison = Comparison::reusing(&table, &fees, Some((Method::Exact, at_b.clone())))?;

        assert_eq!(comparison.exact, at_b);
        assert_eq!(comparison.greedy_cost.total, Money::from_minor(5300, INR));

        Ok(())
    }

    #[test]
    fn empty_table_saves_nothing() -> TestResult {
        let table = PriceTable::new(INR);
        let comparison = Comparison::run(&table, &DeliveryFees::none(INR))?;

        assert_eq!(comparison.savings()?, Money::from_minor(0, INR));
        assert_eq!(comparison.savings_percent()?, Percentage::from(0.0));

        Ok(())
    }
}
