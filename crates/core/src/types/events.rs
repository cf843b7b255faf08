//! Analytics event payloads.
//!
//! These are the wire shapes consumed by the analytics backend. Field names
//! must not change: the backend matches on `order_id`, `name`, `id`, `sku`,
//! `variation`, `category`, `amount`, `quantity`, `currency` for item
//! records and `order_id`, `total`, `shipping`, `currency`, `items` for the
//! checkout event. All values serialize as strings, matching what the
//! backend has always received.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One item record inside an `addItems` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
    /// Customer-facing order number.
    pub order_id: String,
    /// Item name.
    pub name: String,
    /// SKU when present, otherwise the product id.
    pub id: String,
    /// SKU, or empty when the product has none.
    pub sku: String,
    /// Formatted variation label (empty for simple products).
    pub variation: String,
    /// Slash-joined category terms (empty when uncategorized).
    pub category: String,
    /// Line item total.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// Quantity purchased.
    #[serde(with = "as_string")]
    pub quantity: u32,
    /// ISO 4217 currency code.
    pub currency: String,
}

/// The order-level `checkout` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutEvent {
    /// Customer-facing order number.
    pub order_id: String,
    /// Order grand total.
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    /// Shipping total.
    #[serde(with = "rust_decimal::serde::str")]
    pub shipping: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Total quantity across all line items.
    #[serde(with = "as_string")]
    pub items: u32,
}

/// Traits object for the `identify` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifyTraits {
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
}

/// Serialize an integer as its decimal string, the way the analytics
/// backend has always received counts.
mod as_string {
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn serialize<S: Serializer>(value: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}
