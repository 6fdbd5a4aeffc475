//! Price Observations

use rusty_money::{Money, iso::Currency};

/// One store's quote for one item.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceObservation<'a> {
    price: Option<Money<'a, Currency>>,
    available: bool,
    listing: Option<String>,
}

impl<'a> PriceObservation<'a> {
    /// Create an observation for a store that stocks the item at `price`.
    pub fn available(price: Money<'a, Currency>) -> Self {
        Self {
            price: Some(price),
            available: true,
            listing: None,
        }
    }

    /// Create an observation for a store that does not currently stock the item.
    ///
    /// A last-known `price` may still be recorded; it is never used.
    pub fn unavailable(price: Option<Money<'a, Currency>>) -> Self {
        Self {
            price,
            available: false,
            listing: None,
        }
    }

    /// Create an observation from raw fields.
    pub fn new(price: Option<Money<'a, Currency>>, available: bool) -> Self {
        Self {
            price,
            available,
            listing: None,
        }
    }

    /// Attach the listing name the store reported for the item.
    #[must_use]
    pub fn with_listing(mut self, listing: impl Into<String>) -> Self {
        self.listing = Some(listing.into());
        self
    }

    /// Recorded price, usable or not.
    pub fn price(&self) -> Option<&Money<'a, Currency>> {
        self.price.as_ref()
    }

    /// Whether the store reported the item as in stock.
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Listing name reported by the store, if any.
    pub fn listing(&self) -> Option<&str> {
        self.listing.as_deref()
    }

    /// The price, if this observation can be bought from: in stock and priced.
    pub fn usable_price(&self) -> Option<&Money<'a, Currency>> {
        if self.available {
            self.price.as_ref()
        } else {
            None
        }
    }

    /// Whether this observation can be bought from.
    pub fn is_usable(&self) -> bool {
        self.usable_price().is_some()
    }
}
