//! Fixtures
//!
//! Loads price tables and delivery fees from YAML or JSON documents:
//!
//! ```yaml
//! currency: INR
//! delivery_fees:
//!   Blinkit: 25
//! prices:
//!   milk:
//!     Blinkit: { price: 50, available: true, name: "Amul Taaza 500ml" }
//!     Zepto: { price: "48.50", available: true }
//!   rice: {}
//! ```

use std::{
    fs,
    path::{Path, PathBuf},
};

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, INR, USD},
};
use thiserror::Error;
use tracing::debug;

use crate::{
    pricing::minor_units_from_decimal,
    table::{DeliveryFees, PriceObservation, PriceTable, PriceTableError},
};

pub mod document;

pub use document::{CartDocument, OrderedMap, QuoteFixture};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// JSON parsing error
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// File extension is not one of `yml`, `yaml` or `json`
    #[error("Unsupported fixture format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The document describes an invalid price table
    #[error(transparent)]
    PriceTable(#[from] PriceTableError),
}

/// A price table and the delivery fees that go with it.
#[derive(Debug, Clone)]
pub struct CartFixture<'a> {
    /// Item -> store -> observation
    pub table: PriceTable<'a>,

    /// Store -> delivery fee
    pub fees: DeliveryFees<'a>,
}

impl CartFixture<'_> {
    /// Default directory for named fixtures
    pub const BASE_PATH: &'static str = "./fixtures";

    /// Load `./fixtures/{name}.yml`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or describes an invalid table.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        Self::from_path(Path::new(Self::BASE_PATH).join(format!("{name}.yml")))
    }

    /// Load a fixture, choosing the parser from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is not supported, the file cannot be read or
    /// parsed, or it describes an invalid table.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        let contents = match extension.as_deref() {
            Some("yml" | "yaml" | "json") => fs::read_to_string(path)?,
            _ => return Err(FixtureError::UnsupportedFormat(path.to_path_buf())),
        };

        debug!(path = %path.display(), bytes = contents.len(), "loading cart fixture");

        if extension.as_deref() == Some("json") {
            Self::from_json_str(&contents)
        } else {
            Self::from_yaml_str(&contents)
        }
    }

    /// Parse a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is malformed or describes an invalid table.
    pub fn from_yaml_str(contents: &str) -> Result<Self, FixtureError> {
        let document: CartDocument = serde_norway::from_str(contents)?;

        document.try_into()
    }

    /// Parse a JSON document.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or describes an invalid table.
    pub fn from_json_str(contents: &str) -> Result<Self, FixtureError> {
        let document: CartDocument = serde_json::from_str(contents)?;

        document.try_into()
    }
}

impl TryFrom<CartDocument> for CartFixture<'_> {
    type Error = FixtureError;

    fn try_from(document: CartDocument) -> Result<Self, Self::Error> {
        let currency = match document.currency.as_deref() {
            Some(code) => parse_currency(code)?,
            None => INR,
        };

        let mut table = PriceTable::new(currency);

        for (item, stores) in document.prices {
            table.add_item(item.as_str());

            for (store, quote) in stores {
                let price = quote
                    .price
                    .map(|amount| parse_amount(amount, currency, &format!("{item} at {store}")))
                    .transpose()?;

                let mut observation =
                    PriceObservation::new(price, quote.available.unwrap_or(false));

                if let Some(name) = quote.name {
                    observation = observation.with_listing(name);
                }

                table.insert(item.as_str(), store, observation)?;
            }
        }

        let mut fees = DeliveryFees::none(currency);

        for (store, amount) in document.delivery_fees {
            let fee = parse_amount(amount, currency, &format!("delivery fee for {store}"))?;

            fees.insert(store, fee)?;
        }

        debug!(
            currency = currency.iso_alpha_code,
            items = table.len(),
            stores = table.store_count(),
            fees = fees.len(),
            "parsed cart fixture"
        );

        Ok(Self { table, fees })
    }
}

/// Look up a supported ISO currency code.
///
/// # Errors
///
/// Returns [`FixtureError::UnknownCurrency`] for anything other than INR, GBP, USD or EUR.
pub fn parse_currency(code: &str) -> Result<&'static Currency, FixtureError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "INR" => Ok(INR),
        "GBP" => Ok(GBP),
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        _ => Err(FixtureError::UnknownCurrency(code.to_string())),
    }
}

/// Convert a major-unit amount into money, refusing to round.
///
/// # Errors
///
/// Returns [`FixtureError::InvalidPrice`] if the amount has more precision than a
/// minor unit or is out of range.
pub fn parse_amount<'a>(
    amount: Decimal,
    currency: &'a Currency,
    context: &str,
) -> Result<Money<'a, Currency>, FixtureError> {
    let minor_units = minor_units_from_decimal(amount)
        .ok_or_else(|| FixtureError::InvalidPrice(format!("{context}: {amount}")))?;

    Ok(Money::from_minor(minor_units, currency))
}
