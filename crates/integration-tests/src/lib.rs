//! Integration tests for Crowdstream Commerce.
//!
//! This crate provides in-memory implementations of the host interfaces so
//! the lifecycle tests under `tests/` can drive the tracking integration
//! exactly the way a storefront would: settings store, session, order
//! repository (with order meta), and product catalog.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p crowdstream-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::sync::Mutex;

use rust_decimal::Decimal;

use crowdstream_core::{
    CatalogError, Order, OrderError, OrderId, OrderLine, OrderRepository, ProductCatalog,
    ProductId, SessionError, SessionProvider, SettingsError, SettingsStore, UserId, UserProfile,
    VariationAttribute,
};
use crowdstream_tracking::config::{APP_ID_KEY, TRACKING_ENABLED_KEY};

/// Initialize test logging once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

// =============================================================================
// Settings
// =============================================================================

/// In-memory settings store.
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    /// An empty store (everything unset).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store configured with the given app id and tracking enabled.
    #[must_use]
    pub fn enabled(app_id: &str) -> Self {
        Self::empty()
            .with(APP_ID_KEY, app_id)
            .with(TRACKING_ENABLED_KEY, "yes")
    }

    /// Add a setting.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Result<Option<String>, SettingsError> {
        Ok(self.values.get(key).cloned())
    }
}

// =============================================================================
// Session
// =============================================================================

/// In-memory session provider.
#[derive(Debug, Default)]
pub struct TestSession {
    logged_in: bool,
    admin: bool,
    user: Option<(UserId, UserProfile)>,
    profile_unavailable: bool,
}

impl TestSession {
    /// An anonymous visitor.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// A logged-in visitor with a resolvable profile.
    #[must_use]
    pub fn logged_in(id: i64, username: &str, email: &str) -> Self {
        Self {
            logged_in: true,
            user: Some((
                UserId::new(id),
                UserProfile {
                    username: username.to_string(),
                    email: email.to_string(),
                },
            )),
            ..Self::default()
        }
    }

    /// An administrator.
    #[must_use]
    pub fn admin() -> Self {
        Self {
            logged_in: true,
            admin: true,
            ..Self::default()
        }
    }

    /// Make profile lookups fail, as when the user backend is down.
    #[must_use]
    pub fn with_profile_unavailable(mut self) -> Self {
        self.profile_unavailable = true;
        self
    }
}

impl SessionProvider for TestSession {
    fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    fn is_admin(&self) -> bool {
        self.admin
    }

    fn current_user_id(&self) -> Option<UserId> {
        self.user.as_ref().map(|(id, _)| *id)
    }

    fn user_profile(&self, _id: UserId) -> Result<Option<UserProfile>, SessionError> {
        if self.profile_unavailable {
            return Err(SessionError::Backend("user backend offline".to_string()));
        }
        Ok(self.user.as_ref().map(|(_, profile)| profile.clone()))
    }
}

// =============================================================================
// Orders
// =============================================================================

/// In-memory order repository with order meta.
#[derive(Debug, Default)]
pub struct MemoryOrders {
    orders: HashMap<i64, Order>,
    meta: Mutex<HashMap<(i64, String), String>>,
}

impl MemoryOrders {
    /// An empty repository.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// A repository holding the given orders.
    #[must_use]
    pub fn holding(orders: impl IntoIterator<Item = Order>) -> Self {
        Self {
            orders: orders
                .into_iter()
                .map(|order| (order.id.as_i64(), order))
                .collect(),
            meta: Mutex::new(HashMap::new()),
        }
    }

    /// Read back a meta value, for assertions.
    ///
    /// # Panics
    ///
    /// Panics when the meta lock is poisoned.
    #[must_use]
    pub fn meta_value(&self, id: OrderId, key: &str) -> Option<String> {
        self.meta
            .lock()
            .expect("meta lock poisoned")
            .get(&(id.as_i64(), key.to_string()))
            .cloned()
    }
}

impl OrderRepository for MemoryOrders {
    fn order(&self, id: OrderId) -> Result<Option<Order>, OrderError> {
        Ok(self.orders.get(&id.as_i64()).cloned())
    }

    fn meta(&self, id: OrderId, key: &str) -> Result<Option<String>, OrderError> {
        Ok(self
            .meta
            .lock()
            .map_err(|_| OrderError::Backend("meta lock poisoned".to_string()))?
            .get(&(id.as_i64(), key.to_string()))
            .cloned())
    }

    fn set_meta(&self, id: OrderId, key: &str, value: &str) -> Result<(), OrderError> {
        self.meta
            .lock()
            .map_err(|_| OrderError::Backend("meta lock poisoned".to_string()))?
            .insert((id.as_i64(), key.to_string()), value.to_string());
        Ok(())
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// In-memory product catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    categories: HashMap<i64, Vec<String>>,
}

impl MemoryCatalog {
    /// A catalog with no categorized products.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Assign category terms to a product.
    #[must_use]
    pub fn with_categories(mut self, id: ProductId, terms: &[&str]) -> Self {
        self.categories
            .insert(id.as_i64(), terms.iter().map(ToString::to_string).collect());
        self
    }
}

impl ProductCatalog for MemoryCatalog {
    fn categories(&self, id: ProductId) -> Result<Vec<String>, CatalogError> {
        Ok(self.categories.get(&id.as_i64()).cloned().unwrap_or_default())
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// The canonical two-item order: qty 2 @ 10.00 and qty 1 @ 5.00, shipping
/// 3.00, tax 1.00, USD.
#[must_use]
pub fn two_item_order(id: i64) -> Order {
    Order {
        id: OrderId::new(id),
        number: id.to_string(),
        currency: "USD".to_string(),
        total: Decimal::new(2900, 2),
        shipping_total: Decimal::new(300, 2),
        tax_total: Decimal::new(100, 2),
        lines: vec![
            OrderLine {
                name: "Widget".to_string(),
                product_id: ProductId::new(10),
                sku: Some("WID-1".to_string()),
                variation: Vec::new(),
                line_total: Decimal::new(2000, 2),
                quantity: 2,
            },
            OrderLine {
                name: "Gizmo".to_string(),
                product_id: ProductId::new(11),
                sku: None,
                variation: vec![VariationAttribute {
                    name: "Color".to_string(),
                    value: "Blue".to_string(),
                }],
                line_total: Decimal::new(500, 2),
                quantity: 1,
            },
        ],
    }
}
