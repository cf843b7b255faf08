//! Core types for Crowdstream Commerce.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod events;
pub mod id;
pub mod order;
pub mod page;
pub mod product;
pub mod visitor;

pub use events::{CheckoutEvent, CheckoutItem, IdentifyTraits};
pub use id::*;
pub use order::{Order, OrderLine, VariationAttribute};
pub use page::Page;
pub use product::ProductSummary;
pub use visitor::{UserProfile, Visitor};
