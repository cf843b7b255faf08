//! Order data read from the host's order repository.
//!
//! Monetary amounts are [`Decimal`] values passed through exactly as the
//! order record provides them - no rounding, no currency conversion. They
//! serialize as strings so the scale the store recorded ("3.00", not "3")
//! survives onto the wire.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::id::{OrderId, ProductId};

/// A completed order, as loaded at confirmation-page render time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// The order's id.
    pub id: OrderId,
    /// Customer-facing order number (may differ from the id).
    pub number: String,
    /// ISO 4217 currency code for all amounts on this order.
    pub currency: String,
    /// Grand total.
    #[serde(with = "rust_decimal::serde::str")]
    pub total: Decimal,
    /// Shipping total.
    #[serde(with = "rust_decimal::serde::str")]
    pub shipping_total: Decimal,
    /// Tax total.
    #[serde(with = "rust_decimal::serde::str")]
    pub tax_total: Decimal,
    /// Line items.
    pub lines: Vec<OrderLine>,
}

/// A single line item on an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    /// Item name as it appeared on the order.
    pub name: String,
    /// The purchased product's id.
    pub product_id: ProductId,
    /// SKU, when the product has one. An empty SKU is treated as absent.
    pub sku: Option<String>,
    /// Variation attributes for variable products (empty for simple ones).
    pub variation: Vec<VariationAttribute>,
    /// Line total for this item.
    #[serde(with = "rust_decimal::serde::str")]
    pub line_total: Decimal,
    /// Quantity purchased.
    pub quantity: u32,
}

impl OrderLine {
    /// SKU, filtering out the empty string some stores record for "no SKU".
    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref().filter(|s| !s.is_empty())
    }

    /// Item identifier for event payloads: the SKU when present, otherwise
    /// the product id.
    #[must_use]
    pub fn item_id(&self) -> String {
        self.sku()
            .map_or_else(|| self.product_id.to_string(), ToString::to_string)
    }

    /// Variation label formatted from the variation attributes, e.g.
    /// `Size: L, Color: Blue`. Empty for simple products.
    #[must_use]
    pub fn formatted_variation(&self) -> String {
        self.variation
            .iter()
            .map(|attr| format!("{}: {}", attr.name, attr.value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A name/value pair describing one variation attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAttribute {
    /// Attribute name (e.g., "Size").
    pub name: String,
    /// Selected value (e.g., "L").
    pub value: String,
}
