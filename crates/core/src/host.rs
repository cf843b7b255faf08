//! Host interfaces the storefront implements for the tracking integration.
//!
//! The integration never reaches into the host's persistence or session
//! machinery directly; everything it needs arrives through these narrow,
//! read-only contracts (plus the single order-meta write used for the
//! checkout idempotency flag). Implementations should be cheap per-request
//! lookups - the integration calls each method at most a handful of times
//! per render.
//!
//! Every method returns `Result` so a failing backend can say so, but no
//! error propagates out of the integration's public surface: failures
//! degrade to "emit nothing" (see the tracking crate's error handling).

use thiserror::Error;

use crate::types::id::{OrderId, ProductId, UserId};
use crate::types::order::Order;
use crate::types::visitor::UserProfile;

// =============================================================================
// Settings Store
// =============================================================================

/// Settings store errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The settings backend reported an error.
    #[error("settings store error: {0}")]
    Backend(String),
}

/// Named string options persisted by the host.
///
/// Used for the app id and the enabled flag, including their legacy option
/// names (see the tracking crate's `config` module for the key set).
pub trait SettingsStore {
    /// Look up a setting by key. `Ok(None)` means the setting was never set.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError`] when the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError>;
}

// =============================================================================
// Session Provider
// =============================================================================

/// Session provider errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The session backend reported an error.
    #[error("session provider error: {0}")]
    Backend(String),
}

/// The host's view of the current request's session and caller.
pub trait SessionProvider {
    /// Whether the current session belongs to a logged-in user.
    fn is_logged_in(&self) -> bool;

    /// Whether the caller is an administrator. Administrators never receive
    /// tracking code.
    fn is_admin(&self) -> bool;

    /// The logged-in user's id, if any.
    fn current_user_id(&self) -> Option<UserId>;

    /// Resolve a user's profile. `Ok(None)` means the user record is gone.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] when the lookup backend fails.
    fn user_profile(&self, id: UserId) -> Result<Option<UserProfile>, SessionError>;
}

// =============================================================================
// Order Repository
// =============================================================================

/// Order repository errors.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The order backend reported an error.
    #[error("order repository error: {0}")]
    Backend(String),
}

/// Read access to orders, plus the one meta write the integration owns.
pub trait OrderRepository {
    /// Load an order. `Ok(None)` means no order exists under that id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] when the backend cannot be read.
    fn order(&self, id: OrderId) -> Result<Option<Order>, OrderError>;

    /// Read a named meta value on an order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] when the backend cannot be read.
    fn meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderError>;

    /// Write a named meta value on an order. The integration uses this for
    /// exactly one key: the checkout-tracked flag. The write is expected to
    /// be a host-atomic single-field update with read-your-writes
    /// consistency per order id.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError`] when the write fails.
    fn set_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderError>;
}

// =============================================================================
// Product Catalog
// =============================================================================

/// Product catalog errors.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog backend reported an error.
    #[error("product catalog error: {0}")]
    Backend(String),
}

/// Read access to product taxonomy.
pub trait ProductCatalog {
    /// Category term names for a product, in display order. Empty when the
    /// product is uncategorized.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError`] when the backend cannot be read.
    fn categories(&self, id: ProductId) -> Result<Vec<String>, CatalogError>;
}

// =============================================================================
// Reference Forwarding
// =============================================================================

// All four contracts are read-side (the meta write goes through `&self`
// too), so a shared reference is as good as the value. This lets a host
// keep one repository and lend it to an injector per request.

impl<T: SettingsStore + ?Sized> SettingsStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        (**self).get(key)
    }
}

impl<T: SessionProvider + ?Sized> SessionProvider for &T {
    fn is_logged_in(&self) -> bool {
        (**self).is_logged_in()
    }

    fn is_admin(&self) -> bool {
        (**self).is_admin()
    }

    fn current_user_id(&self) -> Option<UserId> {
        (**self).current_user_id()
    }

    fn user_profile(&self, id: UserId) -> Result<Option<UserProfile>, SessionError> {
        (**self).user_profile(id)
    }
}

impl<T: OrderRepository + ?Sized> OrderRepository for &T {
    fn order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        (**self).order(id)
    }

    fn meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderError> {
        (**self).meta(id, key)
    }

    fn set_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderError> {
        (**self).set_meta(id, key, value)
    }
}

impl<T: ProductCatalog + ?Sized> ProductCatalog for &T {
    fn categories(&self, id: ProductId) -> Result<Vec<String>, CatalogError> {
        (**self).categories(id)
    }
}
