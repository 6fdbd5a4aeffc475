//! Shopping List
//!
//! Turns an [`Assignment`] into what a shopper acts on: one basket per store, the items
//! nobody sells, and the totals including delivery.

use std::io;

use rusty_money::{Money, MoneyError, iso::Currency};
use smallvec::{SmallVec, smallvec};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    assignment::{Assignment, CartCost},
    pricing::total_price,
    solvers::Method,
    table::{DeliveryFees, PriceTable},
};

pub mod view;

pub use view::ShoppingListView;

/// Errors that can occur when building or writing a shopping list.
#[derive(Debug, Error)]
pub enum ShoppingListError {
    /// Wrapper for money errors.
    #[error(transparent)]
    Money(#[from] MoneyError),

    /// IO error
    #[error("failed to write shopping list: {0}")]
    Io(#[from] io::Error),
}

/// One item to pick up from a store.
#[derive(Debug, Clone, PartialEq)]
pub struct ShoppingLine<'a> {
    /// Item name, as requested
    pub item: String,

    /// Listing name reported by the store, or the item name if it reported none
    pub listing: String,

    /// Price paid
    pub price: Money<'a, Currency>,
}

/// Everything bought from one store.
#[derive(Debug, Clone)]
pub struct StoreBasket<'a> {
    /// Store name
    pub store: String,

    /// Items bought here, in table order
    pub lines: SmallVec<[ShoppingLine<'a>; 8]>,

    /// Sum of the item prices
    pub subtotal: Money<'a, Currency>,

    /// Delivery fee charged by this store
    pub delivery_fee: Money<'a, Currency>,
}

/// Shopping list for a solved cart.
#[derive(Debug, Clone)]
pub struct ShoppingList<'a> {
    method: Method,
    currency: &'static Currency,
    baskets: Vec<StoreBasket<'a>>,
    unavailable: Vec<String>,
    cost: CartCost<'a>,
}

impl<'a> ShoppingList<'a> {
    /// Group an assignment by store.
    ///
    /// Stores appear in the order they were first used.
    ///
    /// # Errors
    ///
    /// Returns a [`ShoppingListError`] if a total cannot be calculated.
    pub fn from_assignment(
        table: &PriceTable<'a>,
        fees: &DeliveryFees<'a>,
        assignment: &Assignment<'a>,
        method: Method,
    ) -> Result<Self, ShoppingListError> {
        let mut baskets: Vec<StoreBasket<'a>> = assignment
            .activated_stores()
            .into_iter()
            .map(|store| StoreBasket {
                store: store.to_string(),
                lines: smallvec![],
                subtotal: Money::from_minor(0, assignment.currency()),
                delivery_fee: fees.fee_for(store),
            })
            .collect();

        let mut unavailable = Vec::new();

        for entry in assignment.iter() {
            let Some(selection) = &entry.selection else {
                unavailable.push(entry.item.clone());
                continue;
            };

            let listing = table
                .item(&entry.item)
                .and_then(|quotes| {
                    quotes
                        .quotes()
                        .find(|(key, _)| table.store_name(*key) == Some(selection.store.as_str()))
                })
                .and_then(|(_, observation)| observation.listing())
                .unwrap_or(entry.item.as_str())
                .to_string();

            if let Some(basket) = baskets
                .iter_mut()
                .find(|basket| basket.store == selection.store)
            {
                basket.lines.push(ShoppingLine {
                    item: entry.item.clone(),
                    listing,
                    price: selection.price,
                });
            }
        }

        for basket in &mut baskets {
            basket.subtotal = total_price(
                basket.lines.iter().map(|line| &line.price),
                assignment.currency(),
            )?;
        }

        Ok(Self {
            method,
            currency: assignment.currency(),
            baskets,
            unavailable,
            cost: assignment.cost(fees)?,
        })
    }

    /// Method that produced the assignment.
    pub fn method(&self) -> Method {
        self.method
    }

    /// Currency used for all monetary values.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Per-store baskets.
    pub fn baskets(&self) -> &[StoreBasket<'a>] {
        &self.baskets
    }

    /// Items no store could sell.
    pub fn unavailable(&self) -> &[String] {
        &self.unavailable
    }

    /// Items, delivery and grand total.
    pub fn cost(&self) -> &CartCost<'a> {
        &self.cost
    }

    /// One-line summary of the cart.
    pub fn summary(&self) -> String {
        if self.baskets.is_empty() {
            return "No prices found for any requested item".to_string();
        }

        format!(
            "Found items across {} stores. Total: {}",
            self.baskets.len(),
            self.cost.total
        )
    }

    /// Serializable view for JSON output.
    pub fn view(&self) -> ShoppingListView {
        ShoppingListView::from(self)
    }

    /// Writes the shopping list as a table followed by the totals.
    ///
    /// # Errors
    ///
    /// Returns an error if the output cannot be written.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), ShoppingListError> {
        let mut builder = Builder::default();

        builder.push_record(["", "Store", "Item", "Listing", "Price"]);

        let mut store_boundary_rows: SmallVec<[usize; 16]> = smallvec![];
        let mut row = 1; // header is row 0

        for basket in &self.baskets {
            store_boundary_rows.push(row);

            for (idx, line) in basket.lines.iter().enumerate() {
                builder.push_record([
                    format!("#{:<3}", idx + 1),
                    if idx == 0 {
                        basket.store.clone()
                    } else {
                        String::new()
                    },
                    line.item.clone(),
                    line.listing.clone(),
                    line.price.to_string(),
                ]);

                row += 1;
            }

            builder.push_record([
                String::new(),
                String::new(),
                "Delivery".to_string(),
                String::new(),
                basket.delivery_fee.to_string(),
            ]);

            row += 1;
        }

        if !self.unavailable.is_empty() {
            store_boundary_rows.push(row);
        }

        for item in &self.unavailable {
            builder.push_record([
                String::new(),
                "-".to_string(),
                item.clone(),
                String::new(),
                "unavailable".to_string(),
            ]);
        }

        let mut table = builder.build();
        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(1, separator);

        for &boundary in &store_boundary_rows {
            if boundary > 1 {
                theme.insert_horizontal_line(boundary, separator);
            }
        }

        table.with(theme);
        table.modify(Rows::first(), Color::BOLD);
        table.modify(Columns::new(4..5), Alignment::right());

        writeln!(out, "\n{table}")?;

        writeln!(out, " Items:    {}", self.cost.items)?;
        writeln!(out, " Delivery: {}", self.cost.delivery)?;
        writeln!(out, " Total:    {}", self.cost.total)?;
        writeln!(out, "\n {} ({})", self.summary(), self.method)?;

        Ok(())
    }
}
