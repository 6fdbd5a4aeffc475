//! Delivery Fees

use rustc_hash::FxHashMap;
use rusty_money::{Money, iso::Currency};

use crate::table::PriceTableError;

/// Per-store delivery charges, incurred once per store actually used.
///
/// Stores without an entry deliver for free.
#[derive(Debug, Clone)]
pub struct DeliveryFees<'a> {
    currency: &'static Currency,
    fees: FxHashMap<String, Money<'a, Currency>>,
}

impl<'a> DeliveryFees<'a> {
    /// No delivery fees anywhere.
    pub fn none(currency: &'static Currency) -> Self {
        Self {
            currency,
            fees: FxHashMap::default(),
        }
    }

    /// Set the delivery fee for `store`.
    ///
    /// # Errors
    ///
    /// - [`PriceTableError::CurrencyMismatch`]: the fee is not in the table currency.
    /// - [`PriceTableError::NegativeFee`]: the fee is below zero.
    pub fn insert(
        &mut self,
        store: impl Into<String>,
        fee: Money<'a, Currency>,
    ) -> Result<(), PriceTableError> {
        let store = store.into();

        if fee.currency() != self.currency {
            return Err(PriceTableError::CurrencyMismatch {
                context: format!("delivery fee for {store}"),
                expected: self.currency.iso_alpha_code,
                found: fee.currency().iso_alpha_code,
            });
        }

        let minor_units = fee.to_minor_units();

        if minor_units < 0 {
            return Err(PriceTableError::NegativeFee { store, minor_units });
        }

        self.fees.insert(store, fee);

        Ok(())
    }

    /// Builder-style [`DeliveryFees::insert`].
    ///
    /// # Errors
    ///
    /// See [`DeliveryFees::insert`].
    pub fn with_fee(
        mut self,
        store: impl Into<String>,
        fee: Money<'a, Currency>,
    ) -> Result<Self, PriceTableError> {
        self.insert(store, fee)?;

        Ok(self)
    }

    /// Fee for `store`, zero if none was set.
    pub fn fee_for(&self, store: &str) -> Money<'a, Currency> {
        self.fees
            .get(store)
            .copied()
            .unwrap_or_else(|| Money::from_minor(0, self.currency))
    }

    /// Fee currency.
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Number of stores with an explicit fee.
    pub fn len(&self) -> usize {
        self.fees.len()
    }

    /// Whether no fees were set.
    pub fn is_empty(&self) -> bool {
        self.fees.is_empty()
    }
}
