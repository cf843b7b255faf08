//! Crowdstream Core - Shared types and host interfaces.
//!
//! This crate provides the common types used across all Crowdstream Commerce
//! components:
//! - `tracking` - The storefront tracking integration
//! - `integration-tests` - End-to-end lifecycle tests
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, visitor/page context, order and product data,
//!   and the analytics event payloads
//! - [`host`] - Narrow interfaces the host storefront implements (settings,
//!   session, orders, product catalog)

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod host;
pub mod types;

pub use host::*;
pub use types::*;
