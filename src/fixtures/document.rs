//! Cart Documents

use std::{fmt, marker::PhantomData};

use rust_decimal::Decimal;
use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};

/// Map that keeps entries in document order.
///
/// Items are reported in the order they were requested, so the usual hash maps
/// can't be used for the price table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<T>(pub Vec<(String, T)>);

impl<T> Default for OrderedMap<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> OrderedMap<T> {
    /// Entries in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Keys in document order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(key, _)| key.as_str())
    }
}

impl<T> IntoIterator for OrderedMap<T> {
    type Item = (String, T);
    type IntoIter = std::vec::IntoIter<(String, T)>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

struct OrderedMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<T> {
    type Value = OrderedMap<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut entries: Vec<(String, T)> = Vec::with_capacity(access.size_hint().unwrap_or(0));

        while let Some((key, value)) = access.next_entry::<String, T>()? {
            if let Some(existing) = entries.iter_mut().find(|(existing, _)| *existing == key) {
                existing.1 = value;
            } else {
                entries.push((key, value));
            }
        }

        Ok(OrderedMap(entries))
    }

    // `rice:` with nothing after it
    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(OrderedMap::default())
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OrderedMap<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(OrderedMapVisitor(PhantomData))
    }
}

/// One store's quote for one item.
///
/// Every field is optional; a quote missing its price or availability is kept but
/// can never be bought.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuoteFixture {
    /// Price in major units, as a number or a numeric string
    #[serde(default)]
    pub price: Option<Decimal>,

    /// Whether the store stocks the item
    #[serde(default)]
    pub available: Option<bool>,

    /// Listing name reported by the store
    #[serde(default)]
    pub name: Option<String>,
}

/// Price table document
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CartDocument {
    /// ISO currency code, INR when omitted
    #[serde(default)]
    pub currency: Option<String>,

    /// Store -> delivery fee in major units
    #[serde(default)]
    pub delivery_fees: OrderedMap<Decimal>,

    /// Item -> store -> quote
    #[serde(default, alias = "price_results")]
    pub prices: OrderedMap<OrderedMap<QuoteFixture>>,
}
