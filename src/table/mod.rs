//! Price Tables
//!
//! A [`PriceTable`] records, for every requested item, what each store quoted for it.
//! Tables are validated as they are built, so the assigners can treat them as trusted
//! input: every price is in the table currency and none is negative.

use rustc_hash::FxHashMap;
use rusty_money::iso::Currency;
use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;
use thiserror::Error;

pub mod fees;
pub mod observation;

pub use fees::DeliveryFees;
pub use observation::PriceObservation;

new_key_type! {
    /// Store Key
    pub struct StoreKey;
}

/// Errors raised while building a price or delivery fee table.
#[derive(Debug, Error, PartialEq)]
pub enum PriceTableError {
    /// A money amount is in a different currency from the table.
    #[error("{context} is priced in {found}, but the table uses {expected}")]
    CurrencyMismatch {
        /// What was being inserted
        context: String,
        /// Table currency code
        expected: &'static str,
        /// Offending currency code
        found: &'static str,
    },

    /// A store quoted a negative price for an item.
    #[error("store {store} quoted a negative price for {item}: {minor_units}")]
    NegativePrice {
        /// Item name
        item: String,
        /// Store name
        store: String,
        /// Quoted amount in minor units
        minor_units: i64,
    },

    /// A store has a negative delivery fee.
    #[error("store {store} has a negative delivery fee: {minor_units}")]
    NegativeFee {
        /// Store name
        store: String,
        /// Fee in minor units
        minor_units: i64,
    },
}

/// All quotes for a single requested item.
#[derive(Debug, Clone)]
pub struct ItemQuotes<'a> {
    name: String,
    quotes: SmallVec<[(StoreKey, PriceObservation<'a>); 4]>,
}

impl<'a> ItemQuotes<'a> {
    /// Item name, exactly as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Quotes in insertion order.
    pub fn quotes(&self) -> impl Iterator<Item = (StoreKey, &PriceObservation<'a>)> {
        self.quotes.iter().map(|(key, observation)| (*key, observation))
    }

    /// The quote from `store`, if that store was observed for this item.
    pub fn quote(&self, store: StoreKey) -> Option<&PriceObservation<'a>> {
        self.quotes
            .iter()
            .find_map(|(key, observation)| (*key == store).then_some(observation))
    }

    /// Whether any store can actually sell this item.
    pub fn has_usable_quote(&self) -> bool {
        self.quotes.iter().any(|(_, observation)| observation.is_usable())
    }

    /// Number of stores quoted for this item.
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    /// Whether no store was observed for this item.
    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

/// Item -> store -> observation table for a single optimisation request.
#[derive(Debug, Clone)]
pub struct PriceTable<'a> {
    currency: &'static Currency,
    stores: SlotMap<StoreKey, String>,
    store_keys: FxHashMap<String, StoreKey>,
    store_order: SmallVec<[StoreKey; 8]>,
    items: Vec<ItemQuotes<'a>>,
    item_index: FxHashMap<String, usize>,
}

impl<'a> PriceTable<'a> {
    /// Create an empty table priced in `currency`.
    pub fn new(currency: &'static Currency) -> Self {
        Self {
            currency,
            stores: SlotMap::with_key(),
            store_keys: FxHashMap::default(),
            store_order: SmallVec::new(),
            items: Vec::new(),
            item_index: FxHashMap::default(),
        }
    }

    /// Register an item, returning its position. Registering an existing item is a no-op.
    ///
    /// Items registered without any quotes are still part of the table and are
    /// always left unassigned.
    pub fn add_item(&mut self, item: impl Into<String>) -> usize {
        let item = item.into();

        if let Some(&idx) = self.item_index.get(&item) {
            return idx;
        }

        let idx = self.items.len();

        self.item_index.insert(item.clone(), idx);
        self.items.push(ItemQuotes {
            name: item,
            quotes: SmallVec::new(),
        });

        idx
    }

    /// Record what `store` quoted for `item`, replacing any earlier quote from that store.
    ///
    /// # Errors
    ///
    /// - [`PriceTableError::CurrencyMismatch`]: the price is not in the table currency.
    /// - [`PriceTableError::NegativePrice`]: the price is below zero.
    pub fn insert(
        &mut self,
        item: impl Into<String>,
        store: impl Into<String>,
        observation: PriceObservation<'a>,
    ) -> Result<(), PriceTableError> {
        let item = item.into();
        let store = store.into();

        if let Some(price) = observation.price() {
            if price.currency() != self.currency {
                return Err(PriceTableError::CurrencyMismatch {
                    context: format!("{item} at {store}"),
                    expected: self.currency.iso_alpha_code,
                    found: price.currency().iso_alpha_code,
                });
            }

            let minor_units = price.to_minor_units();

            if minor_units < 0 {
                return Err(PriceTableError::NegativePrice {
                    item,
                    store,
                    minor_units,
                });
            }
        }

        let store_key = self.intern_store(store);
        let item_idx = self.add_item(item);

        let Some(entry) = self.items.get_mut(item_idx) else {
            return Ok(());
        };

        if let Some(existing) = entry.quotes.iter_mut().find(|(key, _)| *key == store_key) {
            existing.1 = observation;
        } else {
            entry.quotes.push((store_key, observation));
        }

        Ok(())
    }

    fn intern_store(&mut self, store: String) -> StoreKey {
        if let Some(&key) = self.store_keys.get(&store) {
            return key;
        }

        let key = self.stores.insert(store.clone());

        self.store_keys.insert(store, key);
        self.store_order.push(key);

        key
    }

    /// Table currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &ItemQuotes<'a>> {
        self.items.iter()
    }

    /// Look up an item by name.
    pub fn item(&self, name: &str) -> Option<&ItemQuotes<'a>> {
        self.item_index
            .get(name)
            .and_then(|&idx| self.items.get(idx))
    }

    /// Every store that appears anywhere in the table, in first-seen order.
    pub fn stores(&self) -> impl Iterator<Item = (StoreKey, &str)> {
        self.store_order
            .iter()
            .filter_map(|&key| self.stores.get(key).map(|name| (key, name.as_str())))
    }

    /// Store name for a key.
    pub fn store_name(&self, key: StoreKey) -> Option<&str> {
        self.stores.get(key).map(String::as_str)
    }

    /// Number of distinct stores in the table.
    pub fn store_count(&self) -> usize {
        self.store_order.len()
    }

    /// Number of items in the table.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the table has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether any item can be bought anywhere.
    pub fn has_usable_quote(&self) -> bool {
        self.items.iter().any(ItemQuotes::has_usable_quote)
    }
}
