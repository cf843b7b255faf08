//! Checkout event assembly for the order-confirmation page.
//!
//! Emits at most one `addItems` + `checkout` pair per order, ever: the
//! renderer checks the order's tracked flag before calling in here, and a
//! successful assembly sets that flag. A reload of the confirmation page
//! after the flag lands emits nothing. (Two requests racing the flag write
//! can still double-emit; the integration relies on the host's single-field
//! update semantics and does not add locking.)

use tracing::{debug, warn};

use crowdstream_core::{
    CheckoutEvent, CheckoutItem, Order, OrderId, OrderRepository, ProductCatalog,
};

use crate::error::TrackingError;
use crate::js::JsValue;

/// Order-meta key for the "checkout event already emitted" flag.
pub const TRACKED_META_KEY: &str = "_crowdstream_tracked";

/// Value stored under [`TRACKED_META_KEY`] once the event is out.
const TRACKED_META_VALUE: &str = "1";

/// Whether the checkout event was already emitted for this order.
///
/// A failing flag read counts as "already tracked": when in doubt the
/// integration skips emission rather than risk a duplicate.
pub fn already_tracked<O: OrderRepository>(orders: &O, order_id: OrderId) -> bool {
    match orders.meta(order_id, TRACKED_META_KEY) {
        Ok(flag) => flag.as_deref() == Some(TRACKED_META_VALUE),
        Err(err) => {
            warn!(%order_id, error = %err, "tracked-flag read failed, skipping checkout emission");
            true
        }
    }
}

/// Assemble the checkout script lines for an order and mark it tracked.
///
/// Returns `None` (and emits nothing) when the order cannot be loaded or a
/// payload fails to serialize; the host render is never interrupted.
pub fn checkout_script<O, C>(orders: &O, catalog: &C, order_id: OrderId) -> Option<String>
where
    O: OrderRepository,
    C: ProductCatalog,
{
    match assemble(orders, catalog, order_id) {
        Ok(Some(script)) => {
            if let Err(err) = orders.set_meta(order_id, TRACKED_META_KEY, TRACKED_META_VALUE) {
                warn!(%order_id, error = %err, "tracked-flag write failed; a reload may re-emit this checkout");
            }
            Some(script)
        }
        Ok(None) => None,
        Err(err) => {
            warn!(%order_id, error = %err, "checkout assembly failed, skipping emission");
            None
        }
    }
}

fn assemble<O, C>(orders: &O, catalog: &C, order_id: OrderId) -> Result<Option<String>, TrackingError>
where
    O: OrderRepository,
    C: ProductCatalog,
{
    let Some(order) = orders.order(order_id)? else {
        debug!(%order_id, "order not found, skipping checkout emission");
        return Ok(None);
    };

    let (items, quantity) = checkout_items(catalog, &order);

    let mut lines = Vec::new();
    if !items.is_empty() {
        let array = JsValue::from_serialize(&items)?;
        lines.push(format!("crowdstream.events.addItems({});", array.render()));
    }

    let event = CheckoutEvent {
        order_id: order.number.clone(),
        total: order.total,
        shipping: order.shipping_total,
        currency: order.currency.clone(),
        items: quantity,
    };
    let object = JsValue::from_serialize(&event)?;
    lines.push(format!("crowdstream.events.checkout({});", object.render()));

    Ok(Some(lines.join("\n")))
}

/// Build the item records and accumulate total quantity.
///
/// A failed category lookup degrades to an empty category for that item;
/// everything else on the record comes straight off the order line.
fn checkout_items<C: ProductCatalog>(catalog: &C, order: &Order) -> (Vec<CheckoutItem>, u32) {
    let mut items = Vec::with_capacity(order.lines.len());
    let mut quantity: u32 = 0;

    for line in &order.lines {
        let category = match catalog.categories(line.product_id) {
            Ok(terms) => terms.join("/"),
            Err(err) => {
                warn!(product_id = %line.product_id, error = %err, "category lookup failed");
                String::new()
            }
        };

        quantity = quantity.saturating_add(line.quantity);
        items.push(CheckoutItem {
            order_id: order.number.clone(),
            name: line.name.clone(),
            id: line.item_id(),
            sku: line.sku().unwrap_or_default().to_string(),
            variation: line.formatted_variation(),
            category,
            amount: line.line_total,
            quantity: line.quantity,
            currency: order.currency.clone(),
        });
    }

    (items, quantity)
}
