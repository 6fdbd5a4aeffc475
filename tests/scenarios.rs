//! Reference scenarios run through both assigners.
//!
//! Prices are in whole rupees; every amount below is `rupees * 100` paise.

use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use larder::{
    assignment::Selection,
    solvers::{Assigner, ExactAssigner, GreedyAssigner, Method},
    table::{DeliveryFees, PriceObservation, PriceTable},
};

fn rupees(amount: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(amount * 100, INR)
}

#[test]
fn basic_minimum() -> TestResult {
    let mut table = PriceTable::new(INR);
    table.insert("milk", "StoreA", PriceObservation::available(rupees(50)))?;
    table.insert("milk", "StoreB", PriceObservation::available(rupees(45)))?;

    let fees = DeliveryFees::none(INR);
    let expected = Selection::new("StoreB", rupees(45));

    for method in [Method::Greedy, Method::Exact] {
        let assignment = method.assign(&table, &fees)?;

        assert_eq!(assignment.get("milk"), Some(Some(&expected)), "{method}");
    }

    Ok(())
}

#[test]
fn unavailable_store_ignored() -> TestResult {
    let mut table = PriceTable::new(INR);
    table.insert("eggs", "StoreA", PriceObservation::unavailable(Some(rupees(40))))?;
    table.insert("eggs", "StoreB", PriceObservation::available(rupees(60)))?;

    let fees = DeliveryFees::none(INR);
    let expected = Selection::new("StoreB", rupees(60));

    for method in [Method::Greedy, Method::Exact] {
        let assignment = method.assign(&table, &fees)?;

        assert_eq!(assignment.get("eggs"), Some(Some(&expected)), "{method}");
    }

    Ok(())
}

#[test]
fn all_unavailable() -> TestResult {
    let mut table = PriceTable::new(INR);
    table.insert("rice", "StoreA", PriceObservation::unavailable(None))?;

    let fees = DeliveryFees::none(INR);

    for method in [Method::Greedy, Method::Exact] {
        let assignment = method.assign(&table, &fees)?;

        assert_eq!(assignment.len(), 1, "{method}");
        assert_eq!(assignment.get("rice"), Some(None), "{method}");
    }

    Ok(())
}

#[test]
fn fee_driven_consolidation() -> TestResult {
    let mut table = PriceTable::new(INR);
    table.insert("milk", "A", PriceObservation::available(rupees(50)))?;
    table.insert("milk", "B", PriceObservation::available(rupees(48)))?;
    table.insert("bread", "A", PriceObservation::available(rupees(30)))?;
    table.insert("bread", "B", PriceObservation::available(rupees(60)))?;

    let fees = DeliveryFees::none(INR)
        .with_fee("A", rupees(20))?
        .with_fee("B", rupees(20))?;

    let greedy = GreedyAssigner::assign(&table, &fees)?;

    assert_eq!(greedy.get("milk"), Some(Some(&Selection::new("B", rupees(48)))));
    assert_eq!(greedy.get("bread"), Some(Some(&Selection::new("A", rupees(30)))));

    let greedy_cost = greedy.cost(&fees)?;

    assert_eq!(greedy_cost.items, rupees(78));
    assert_eq!(greedy_cost.delivery, rupees(40));
    assert_eq!(greedy_cost.total, rupees(118));

    let exact = ExactAssigner::assign(&table, &fees)?;

    assert_eq!(exact.get("milk"), Some(Some(&Selection::new("A", rupees(50)))));
    assert_eq!(exact.get("bread"), Some(Some(&Selection::new("A", rupees(30)))));
    assert_eq!(exact.cost(&fees)?.total, rupees(100));

    Ok(())
}

#[test]
fn empty_input() -> TestResult {
    let table = PriceTable::new(INR);
    let fees = DeliveryFees::none(INR);

    assert!(GreedyAssigner::assign(&table, &fees)?.is_empty());
    assert!(ExactAssigner::assign(&table, &fees)?.is_empty());

    Ok(())
}
