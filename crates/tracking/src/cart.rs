//! Add-to-cart click-event binding.
//!
//! Two flavors of the same handler: on a single-product page the payload is
//! known at render time and baked in as literals; on listing pages the
//! clicked button is only known at click time, so the payload fields are
//! client-side expressions reading the button's `data-product_sku` /
//! `data-product_id` attributes and the nearest product title element.
//! Either way the handler ends in `crowdstream.events.cart(payload)`.

use askama::Template;

use crowdstream_core::ProductSummary;

use crate::error::TrackingError;
use crate::js::JsValue;

/// Selector for the single-product add-to-cart button.
pub const SINGLE_ADD_TO_CART_SELECTOR: &str = ".single_add_to_cart_button";

/// Selector for listing-page add-to-cart buttons. Variable and grouped
/// product buttons are excluded: their "add to cart" leads to an options
/// page, not a cart event.
pub const LOOP_ADD_TO_CART_SELECTOR: &str =
    ".add_to_cart_button:not(.product_type_variable, .product_type_grouped)";

// Click-time expressions for the loop handler. `button` is the matched
// element bound by the handler shell; these never carry user data.
const LOOP_ID_EXPR: &str =
    "button.dataset.product_sku ? button.dataset.product_sku : '#' + button.dataset.product_id";
const LOOP_SKU_EXPR: &str = "button.dataset.product_sku || ''";
const LOOP_NAME_EXPR: &str = "(function () { var item = button.closest('.product'); \
     var title = item && item.querySelector('.product-title'); \
     return title ? title.textContent.trim() : ''; })()";

/// The cart event payload bound to a button's click.
///
/// Fields are [`JsValue`]s so a field can be either a literal (resolved at
/// render time) or a click-time expression. The wire shape after rendering
/// is `{id, sku, name}`.
#[derive(Debug, Clone, PartialEq)]
pub struct CartButtonEvent {
    /// SKU when present, otherwise `#` + product id.
    pub id: JsValue,
    /// SKU, or empty when the product has none.
    pub sku: JsValue,
    /// Item name.
    pub name: JsValue,
}

impl CartButtonEvent {
    /// Payload for the product currently displayed on a single-product page.
    #[must_use]
    pub fn for_product(product: &ProductSummary) -> Self {
        Self {
            id: JsValue::Str(product.cart_item_id()),
            sku: JsValue::Str(product.sku().unwrap_or_default().to_string()),
            name: JsValue::Str(product.title.clone()),
        }
    }

    /// Payload resolved from the clicked button on listing pages.
    #[must_use]
    pub fn for_loop_button() -> Self {
        Self {
            id: JsValue::Expr(LOOP_ID_EXPR.to_string()),
            sku: JsValue::Expr(LOOP_SKU_EXPR.to_string()),
            name: JsValue::Expr(LOOP_NAME_EXPR.to_string()),
        }
    }

    /// The payload as a single object literal value.
    #[must_use]
    pub fn payload(&self) -> JsValue {
        JsValue::Object(vec![
            ("id".to_string(), self.id.clone()),
            ("sku".to_string(), self.sku.clone()),
            ("name".to_string(), self.name.clone()),
        ])
    }
}

/// Pass-through hook for rewriting a cart payload before it is serialized.
pub type CartEventFilter = Box<dyn Fn(CartButtonEvent) -> CartButtonEvent + Send + Sync>;

#[derive(Template)]
#[template(path = "click_handler.js", escape = "none")]
struct ClickHandlerTemplate<'a> {
    selector: &'a str,
    payload: String,
}

/// Render the delegated click-handler snippet for one selector + payload.
pub(crate) fn click_handler(
    selector: &str,
    event: &CartButtonEvent,
) -> Result<String, TrackingError> {
    let template = ClickHandlerTemplate {
        selector,
        payload: event.payload().render(),
    };
    Ok(template.render()?)
}
