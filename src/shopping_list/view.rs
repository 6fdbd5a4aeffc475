//! Serializable shopping list

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Serialize;

use crate::{pricing::decimal_from_minor_units, shopping_list::ShoppingList};

/// A line in a store basket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineView {
    /// Item name, as requested
    pub item: String,

    /// Listing name reported by the store
    pub name: String,

    /// Price in major units
    pub price: Decimal,
}

/// One store's basket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoreView {
    /// Store name
    pub store: String,

    /// Items bought here
    pub items: Vec<LineView>,

    /// Sum of the item prices
    pub subtotal: Decimal,

    /// Delivery fee
    pub delivery_fee: Decimal,
}

/// JSON-friendly shopping list with amounts in major units.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingListView {
    /// `greedy` or `exact`
    pub optimization_method: String,

    /// ISO currency code
    pub currency: &'static str,

    /// Baskets in the order stores were first used
    pub assigned_cart: Vec<StoreView>,

    /// Items no store could sell
    pub unavailable: Vec<String>,

    /// Sum of item prices
    pub items_total: Decimal,

    /// Sum of delivery fees
    pub delivery_total: Decimal,

    /// Items plus delivery
    pub total: Decimal,

    /// One-line summary
    pub summary: String,
}

fn major(money: &Money<'_, Currency>) -> Decimal {
    decimal_from_minor_units(money.to_minor_units())
}

impl From<&ShoppingList<'_>> for ShoppingListView {
    fn from(list: &ShoppingList<'_>) -> Self {
        let assigned_cart = list
            .baskets()
            .iter()
            .map(|basket| StoreView {
                store: basket.store.clone(),
                items: basket
                    .lines
                    .iter()
                    .map(|line| LineView {
                        item: line.item.clone(),
                        name: line.listing.clone(),
                        price: major(&line.price),
                    })
                    .collect(),
                subtotal: major(&basket.subtotal),
                delivery_fee: major(&basket.delivery_fee),
            })
            .collect();

        let cost = list.cost();

        Self {
            optimization_method: list.method().to_string(),
            currency: list.currency().iso_alpha_code,
            assigned_cart,
            unavailable: list.unavailable().to_vec(),
            items_total: major(&cost.items),
            delivery_total: major(&cost.delivery),
            total: major(&cost.total),
            summary: list.summary(),
        }
    }
}
