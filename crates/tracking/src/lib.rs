//! Crowdstream tracking integration.
//!
//! Assembles the analytics tracking scripts a storefront injects into its
//! rendered pages: the page-head bootstrap (page view, identify, checkout
//! events) and the deferred add-to-cart click handlers. The host storefront
//! calls in at its fixed render points and receives script markup back; the
//! only durable write this crate performs is the per-order checkout
//! idempotency flag, through the host's [`OrderRepository`].
//!
//! # Usage
//!
//! ```rust,ignore
//! let config = IntegrationConfig::load(&settings);
//! let mut injector = TrackingInjector::new(config, session, orders, catalog);
//!
//! // At head render:
//! if let Some(script) = injector.head_script(page, Some(&nonce)) {
//!     head.push_str(&script);
//! }
//!
//! // After the single-product add-to-cart button:
//! injector.product_add_to_cart(&product);
//!
//! // At footer render:
//! injector.loop_add_to_cart();
//! if let Some(script) = injector.footer_scripts(Some(&nonce)) {
//!     footer.push_str(&script);
//! }
//! ```
//!
//! [`OrderRepository`]: crowdstream_core::OrderRepository

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod escape;
pub mod injector;
pub mod js;

pub use cart::{CartButtonEvent, LOOP_ADD_TO_CART_SELECTOR, SINGLE_ADD_TO_CART_SELECTOR};
pub use config::IntegrationConfig;
pub use error::TrackingError;
pub use injector::TrackingInjector;
