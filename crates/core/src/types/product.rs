//! Product data for the single-product add-to-cart binder.

use serde::{Deserialize, Serialize};

use crate::types::id::ProductId;

/// The product currently displayed on a single-product page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// The product's id.
    pub id: ProductId,
    /// SKU, when the product has one. An empty SKU is treated as absent.
    pub sku: Option<String>,
    /// Product title.
    pub title: String,
}

impl ProductSummary {
    /// SKU, filtering out the empty string some stores record for "no SKU".
    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.sku.as_deref().filter(|s| !s.is_empty())
    }

    /// Cart-event identifier: the SKU when present, otherwise `#` followed
    /// by the product id.
    #[must_use]
    pub fn cart_item_id(&self) -> String {
        self.sku()
            .map_or_else(|| format!("#{}", self.id), ToString::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_item_id() {
        let with_sku = ProductSummary {
            id: ProductId::new(7),
            sku: Some("HAT-7".to_string()),
            title: "Hat".to_string(),
        };
        assert_eq!(with_sku.cart_item_id(), "HAT-7");

        let without_sku = ProductSummary {
            id: ProductId::new(7),
            sku: None,
            title: "Hat".to_string(),
        };
        assert_eq!(without_sku.cart_item_id(), "#7");
    }
}
