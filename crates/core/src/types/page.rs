//! Page context passed into the head-script renderer.

use crate::types::id::OrderId;

/// The page currently being rendered.
///
/// Replaces the original integration's ambient page lookups: the host tells
/// the renderer which page it is on, and the renderer branches on that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    /// Any storefront page without special tracking semantics.
    Standard,
    /// The order-confirmation page shown after checkout, identified by the
    /// order id from the route. An id of zero or below means the route
    /// parameter was absent or malformed and no checkout event is emitted.
    OrderConfirmation {
        /// The completed order's id.
        order_id: OrderId,
    },
}
