//! Properties that hold for both assigners on a shared set of tables.

use rusty_money::{Money, iso::INR};
use testresult::TestResult;

use larder::{
    solvers::{Assigner, ExactAssigner, GreedyAssigner, Method},
    table::{DeliveryFees, PriceObservation, PriceTable},
};

fn paise(amount: i64) -> Money<'static, rusty_money::iso::Currency> {
    Money::from_minor(amount, INR)
}

/// Five items over four stores, with one item nobody stocks and one only a single store has.
fn weekly_shop<'a>() -> TestResult<(PriceTable<'a>, DeliveryFees<'a>)> {
    let rows: [(&str, &str, Option<i64>, bool); 14] = [
        ("milk", "Blinkit", Some(5400), true),
        ("milk", "Zepto", Some(5300), true),
        ("milk", "Instamart", Some(5400), true),
        ("eggs", "Blinkit", Some(8900), false),
        ("eggs", "Zepto", Some(8450), true),
        ("eggs", "Instamart", Some(8200), true),
        ("atta", "Blinkit", Some(28_900), true),
        ("atta", "Zepto", Some(29_900), true),
        ("atta", "Instamart", Some(27_900), true),
        ("paneer", "Blinkit", Some(9500), true),
        ("paneer", "Zepto", None, true),
        ("saffron", "Blinkit", Some(49_900), false),
        ("saffron", "Instamart", None, false),
        ("atta", "BigBasket", Some(31_000), true),
    ];

    let mut table = PriceTable::new(INR);

    for (item, store, price, available) in rows {
        table.insert(item, store, PriceObservation::new(price.map(paise), available))?;
    }

    table.add_item("dish soap");

    let fees = DeliveryFees::none(INR)
        .with_fee("Blinkit", paise(2500))?
        .with_fee("Zepto", paise(1950))?
        .with_fee("Instamart", paise(3000))?
        .with_fee("BigBasket", paise(4000))?;

    Ok((table, fees))
}

#[test]
fn assignments_are_idempotent() -> TestResult {
    let (table, fees) = weekly_shop()?;

    for method in [Method::Greedy, Method::Exact] {
        let first = method.assign(&table, &fees)?;
        let second = method.assign(&table, &fees)?;

        assert_eq!(first, second, "{method}");
    }

    Ok(())
}

#[test]
fn output_follows_table_order() -> TestResult {
    let (table, fees) = weekly_shop()?;

    for method in [Method::Greedy, Method::Exact] {
        let assignment = method.assign(&table, &fees)?;
        let items: Vec<&str> = assignment.iter().map(|entry| entry.item.as_str()).collect();

        assert_eq!(
            items,
            ["milk", "eggs", "atta", "paneer", "saffron", "dish soap"],
            "{method}"
        );
    }

    Ok(())
}

#[test]
fn greedy_picks_the_cheapest_usable_quote() -> TestResult {
    let (table, fees) = weekly_shop()?;
    let assignment = GreedyAssigner::assign(&table, &fees)?;

    for entry in assignment.iter() {
        let quotes = table.item(&entry.item).ok_or("item missing from table")?;
        let cheapest = quotes
            .quotes()
            .filter_map(|(_, obs)| obs.usable_price())
            .map(Money::to_minor_units)
            .min();

        let chosen = entry
            .selection
            .as_ref()
            .map(|selection| selection.price.to_minor_units());

        assert_eq!(chosen, cheapest, "{}", entry.item);
    }

    Ok(())
}

#[test]
fn exact_never_costs_more_than_greedy() -> TestResult {
    let (table, fees) = weekly_shop()?;

    let greedy = GreedyAssigner::assign(&table, &fees)?.cost(&fees)?;
    let exact = ExactAssigner::assign(&table, &fees)?.cost(&fees)?;

    // Greedy: 53 + 82 + 279 + 95 = 509, delivery from Zepto, Instamart and Blinkit 74.50.
    assert_eq!(greedy.total, paise(58_350));

    // Exact: Blinkit for paneer, Instamart for everything else it has: 510 + 55.
    assert_eq!(exact.total, paise(56_500));
    assert!(exact.total.to_minor_units() <= greedy.total.to_minor_units());

    Ok(())
}

#[test]
fn selections_come_from_usable_quotes() -> TestResult {
    let (table, fees) = weekly_shop()?;

    for method in [Method::Greedy, Method::Exact] {
        let assignment = method.assign(&table, &fees)?;

        for entry in assignment.iter() {
            let Some(selection) = &entry.selection else {
                continue;
            };

            let quotes = table.item(&entry.item).ok_or("item missing from table")?;
            let quoted = quotes
                .quotes()
                .find(|(key, _)| table.store_name(*key) == Some(selection.store.as_str()))
                .and_then(|(_, obs)| obs.usable_price());

            assert_eq!(quoted, Some(&selection.price), "{method}: {}", entry.item);
        }
    }

    Ok(())
}

#[test]
fn unavailable_items_do_not_affect_the_rest() -> TestResult {
    let (table, fees) = weekly_shop()?;

    let mut trimmed = PriceTable::new(INR);

    for item in table.iter() {
        if !item.has_usable_quote() {
            continue;
        }

        for (key, obs) in item.quotes() {
            let store = table.store_name(key).ok_or("store missing")?;
            trimmed.insert(item.name(), store, obs.clone())?;
        }
    }

    for method in [Method::Greedy, Method::Exact] {
        let full = method.assign(&table, &fees)?;
        let without = method.assign(&trimmed, &fees)?;

        assert_eq!(
            full.unavailable().collect::<Vec<_>>(),
            ["saffron", "dish soap"],
            "{method}"
        );
        assert_eq!(full.cost(&fees)?, without.cost(&fees)?, "{method}");
    }

    Ok(())
}

#[test]
fn fees_are_charged_once_per_store_used() -> TestResult {
    let (table, fees) = weekly_shop()?;
    let exact = ExactAssigner::assign(&table, &fees)?;

    let activated = exact.activated_stores();
    let mut expected_delivery = 0;

    for store in &activated {
        expected_delivery += fees.fee_for(store).to_minor_units();
    }

    assert!(!activated.contains(&"BigBasket"));
    assert_eq!(exact.delivery_total(&fees)?.to_minor_units(), expected_delivery);

    Ok(())
}
