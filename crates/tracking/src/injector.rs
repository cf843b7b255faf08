//! The tracking injector - per-request entry points for the host's render
//! hooks.
//!
//! One injector serves one page render. The host calls `head_script` at
//! head render, `product_add_to_cart` right after the single-product
//! add-to-cart button, and `loop_add_to_cart` + `footer_scripts` at footer
//! render. Click handlers accumulate in a per-request queue and flush as
//! one script block, so a page with several binder call sites still emits a
//! single footer script.
//!
//! Nothing here returns an error: every failure path logs and emits
//! nothing, because a broken analytics vendor must never break the page.

use askama::Template;
use tracing::{debug, instrument, warn};

use crowdstream_core::{
    IdentifyTraits, OrderRepository, Page, ProductCatalog, ProductSummary, SessionProvider,
    SettingsStore, Visitor,
};

use crate::cart::{
    self, CartButtonEvent, CartEventFilter, LOOP_ADD_TO_CART_SELECTOR,
    SINGLE_ADD_TO_CART_SELECTOR,
};
use crate::checkout;
use crate::config::IntegrationConfig;
use crate::escape;
use crate::js::JsValue;

/// Fixed CDN location of the analytics library loaded by the bootstrap.
pub const LIBRARY_URL: &str =
    "https://s3.eu-central-1.amazonaws.com/crowdstream/crowdstream.js";

#[derive(Template)]
#[template(path = "head_script.html", escape = "none")]
struct HeadScriptTemplate {
    nonce_attr: String,
    app_id: String,
    library_url: &'static str,
    ready_calls: Vec<String>,
}

#[derive(Template)]
#[template(path = "footer_scripts.html", escape = "none")]
struct FooterScriptsTemplate {
    nonce_attr: String,
    snippets: Vec<String>,
}

/// Assembles tracking scripts for one page render.
///
/// Generic over the host's collaborator implementations; see the core
/// crate's `host` module for the contracts.
pub struct TrackingInjector<S, O, C> {
    config: IntegrationConfig,
    session: S,
    orders: O,
    catalog: C,
    cart_filter: Option<CartEventFilter>,
    queue: Vec<String>,
}

impl<S, O, C> TrackingInjector<S, O, C>
where
    S: SessionProvider,
    O: OrderRepository,
    C: ProductCatalog,
{
    /// Create an injector with an already-loaded configuration.
    pub fn new(config: IntegrationConfig, session: S, orders: O, catalog: C) -> Self {
        Self {
            config,
            session,
            orders,
            catalog,
            cart_filter: None,
            queue: Vec::new(),
        }
    }

    /// Create an injector, loading the configuration from the settings store.
    pub fn from_settings<T: SettingsStore>(
        settings: &T,
        session: S,
        orders: O,
        catalog: C,
    ) -> Self {
        Self::new(IntegrationConfig::load(settings), session, orders, catalog)
    }

    /// Install a pass-through filter that can rewrite cart payloads before
    /// they are serialized into click handlers.
    #[must_use]
    pub fn with_cart_event_filter(
        mut self,
        filter: impl Fn(CartButtonEvent) -> CartButtonEvent + Send + Sync + 'static,
    ) -> Self {
        self.cart_filter = Some(Box::new(filter));
        self
    }

    /// The configuration this injector renders under.
    #[must_use]
    pub fn config(&self) -> &IntegrationConfig {
        &self.config
    }

    /// The head-render entry point.
    ///
    /// Returns the inline tracking script block, or `None` for
    /// administrators, disabled tracking, or a missing app id.
    #[instrument(skip(self))]
    pub fn head_script(&self, page: Page, nonce: Option<&str>) -> Option<String> {
        if self.tracking_disabled() {
            debug!("tracking disabled for this request, emitting nothing");
            return None;
        }

        let mut ready_calls = Vec::new();

        if let Some(call) = self.identify_call() {
            ready_calls.push(call);
        }

        if let Page::OrderConfirmation { order_id } = page {
            if order_id.as_i64() > 0 && !checkout::already_tracked(&self.orders, order_id) {
                if let Some(script) =
                    checkout::checkout_script(&self.orders, &self.catalog, order_id)
                {
                    ready_calls.push(script);
                }
            }
        }

        let template = HeadScriptTemplate {
            nonce_attr: nonce_attr(nonce),
            app_id: escape::js_string(self.config.app_id()),
            library_url: LIBRARY_URL,
            ready_calls,
        };
        match template.render() {
            Ok(script) => Some(script),
            Err(err) => {
                warn!(error = %err, "head script template failed to render");
                None
            }
        }
    }

    /// The after-add-to-cart-button entry point for single-product pages.
    ///
    /// Enqueues a click handler for the displayed product's button; no-op
    /// when tracking is disabled.
    #[instrument(skip(self, product))]
    pub fn product_add_to_cart(&mut self, product: &ProductSummary) {
        if self.tracking_disabled() {
            return;
        }
        let event = CartButtonEvent::for_product(product);
        self.enqueue_cart_handler(SINGLE_ADD_TO_CART_SELECTOR, event);
    }

    /// The footer entry point for listing pages.
    ///
    /// Enqueues the click handler that resolves the payload from the
    /// clicked button at click time; no-op when tracking is disabled.
    #[instrument(skip(self))]
    pub fn loop_add_to_cart(&mut self) {
        if self.tracking_disabled() {
            return;
        }
        self.enqueue_cart_handler(LOOP_ADD_TO_CART_SELECTOR, CartButtonEvent::for_loop_button());
    }

    /// Flush all queued click handlers as one footer script block.
    ///
    /// Returns `None` when nothing was enqueued. The queue is drained
    /// either way, so a second flush emits nothing.
    pub fn footer_scripts(&mut self, nonce: Option<&str>) -> Option<String> {
        if self.queue.is_empty() {
            return None;
        }
        let template = FooterScriptsTemplate {
            nonce_attr: nonce_attr(nonce),
            snippets: std::mem::take(&mut self.queue),
        };
        match template.render() {
            Ok(script) => Some(script),
            Err(err) => {
                warn!(error = %err, "footer scripts template failed to render");
                None
            }
        }
    }

    /// Administrators never receive tracking code, and a disabled (or
    /// unconfigured) integration emits nothing anywhere.
    fn tracking_disabled(&self) -> bool {
        !self.config.tracking_enabled() || self.session.is_admin()
    }

    /// Derive the visitor from the host session.
    fn visitor(&self) -> Visitor {
        if !self.session.is_logged_in() {
            return Visitor::anonymous();
        }
        let Some(user_id) = self.session.current_user_id() else {
            return Visitor {
                logged_in: true,
                ..Visitor::anonymous()
            };
        };

        let (username, email) = match self.session.user_profile(user_id) {
            Ok(Some(profile)) => (Some(profile.username), Some(profile.email)),
            Ok(None) => {
                debug!(%user_id, "no profile for logged-in user, skipping identify");
                (None, None)
            }
            Err(err) => {
                warn!(%user_id, error = %err, "profile lookup failed, skipping identify");
                (None, None)
            }
        };

        Visitor {
            logged_in: true,
            user_id: Some(user_id),
            username,
            email,
        }
    }

    /// The identify call line, when the visitor fully resolved.
    fn identify_call(&self) -> Option<String> {
        let visitor = self.visitor();
        let user_id = visitor.user_id?;
        let traits = IdentifyTraits {
            username: visitor.username?,
            email: visitor.email?,
        };
        match JsValue::from_serialize(&traits) {
            Ok(value) => Some(format!(
                "crowdstream.events.identify({}, {});",
                JsValue::Str(user_id.to_string()).render(),
                value.render()
            )),
            Err(err) => {
                warn!(error = %err, "identify traits failed to serialize, skipping identify");
                None
            }
        }
    }

    /// Apply the cart filter and enqueue the rendered click handler.
    fn enqueue_cart_handler(&mut self, selector: &str, event: CartButtonEvent) {
        let event = match self.cart_filter.as_ref() {
            Some(filter) => filter(event),
            None => event,
        };
        match cart::click_handler(selector, &event) {
            Ok(snippet) => self.queue.push(snippet),
            Err(err) => {
                warn!(error = %err, "click handler failed to render, skipping binder");
            }
        }
    }
}

/// Render the optional `nonce` attribute for a script tag.
fn nonce_attr(nonce: Option<&str>) -> String {
    nonce.map_or_else(String::new, |value| {
        format!(" nonce=\"{}\"", escape::attribute(value))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crowdstream_core::{
        CatalogError, Order, OrderError, OrderId, ProductId, SessionError, UserId, UserProfile,
    };
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSession {
        logged_in: bool,
        admin: bool,
        user: Option<(UserId, UserProfile)>,
    }

    impl FakeSession {
        fn anonymous() -> Self {
            Self {
                logged_in: false,
                admin: false,
                user: None,
            }
        }

        fn logged_in(id: i64, username: &str, email: &str) -> Self {
            Self {
                logged_in: true,
                admin: false,
                user: Some((
                    UserId::new(id),
                    UserProfile {
                        username: username.to_string(),
                        email: email.to_string(),
                    },
                )),
            }
        }

        fn admin() -> Self {
            Self {
                logged_in: true,
                admin: true,
                user: None,
            }
        }
    }

    impl SessionProvider for FakeSession {
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
            Ok(self.user.as_ref().map(|(_, profile)| profile.clone()))
        }
    }

    struct NoOrders {
        meta: Mutex<HashMap<String, String>>,
    }

    impl NoOrders {
        fn new() -> Self {
            Self {
                meta: Mutex::new(HashMap::new()),
            }
        }
    }

    impl OrderRepository for NoOrders {
        fn order(&self, _id: OrderId) -> Result<Option<Order>, OrderError> {
            Ok(None)
        }

        fn meta(&self, _id: OrderId, key: &str) -> Result<Option<String>, OrderError> {
            Ok(self.meta.lock().unwrap().get(key).cloned())
        }

        fn set_meta(&self, _id: OrderId, key: &str, value: &str) -> Result<(), OrderError> {
            self.meta
                .lock()
                .unwrap()
                .insert(key.to_string(), value.to_string());
            Ok(())
        }
    }

    struct NoCategories;

    impl ProductCatalog for NoCategories {
        fn categories(&self, _id: ProductId) -> Result<Vec<String>, CatalogError> {
            Ok(Vec::new())
        }
    }

    fn enabled_config() -> IntegrationConfig {
        IntegrationConfig::new("cs-app-1", "yes")
    }

    fn injector(
        config: IntegrationConfig,
        session: FakeSession,
    ) -> TrackingInjector<FakeSession, NoOrders, NoCategories> {
        TrackingInjector::new(config, session, NoOrders::new(), NoCategories)
    }

    #[test]
    fn test_disabled_config_emits_nothing() {
        let injector = injector(IntegrationConfig::disabled(), FakeSession::anonymous());
        assert!(injector.head_script(Page::Standard, None).is_none());
    }

    #[test]
    fn test_admin_emits_nothing_even_when_enabled() {
        let injector = injector(enabled_config(), FakeSession::admin());
        assert!(injector.head_script(Page::Standard, None).is_none());
    }

    #[test]
    fn test_standard_page_has_page_call_and_no_checkout() {
        let injector = injector(enabled_config(), FakeSession::anonymous());
        let script = injector.head_script(Page::Standard, None).unwrap();
        assert!(script.contains("crowdstream.events.page();"));
        assert!(script.contains(r#"crowdstream.load("cs-app-1");"#));
        assert!(script.contains(LIBRARY_URL));
        assert!(!script.contains("checkout("));
        assert!(!script.contains("identify("));
    }

    #[test]
    fn test_logged_in_visitor_gets_identify_call() {
        let session = FakeSession::logged_in(42, "alice", "a@x.com");
        let injector = injector(enabled_config(), session);
        let script = injector.head_script(Page::Standard, None).unwrap();
        assert!(script.contains(
            r#"crowdstream.events.identify("42", {username: "alice", email: "a@x.com"});"#
        ));
    }

    #[test]
    fn test_nonce_lands_on_script_tag() {
        let injector = injector(enabled_config(), FakeSession::anonymous());
        let script = injector
            .head_script(Page::Standard, Some("abc123=="))
            .unwrap();
        assert!(script.contains(r#"<script nonce="abc123==">"#));
    }

    #[test]
    fn test_zero_order_id_skips_checkout_lookup() {
        let injector = injector(enabled_config(), FakeSession::anonymous());
        let page = Page::OrderConfirmation {
            order_id: OrderId::new(0),
        };
        let script = injector.head_script(page, None).unwrap();
        assert!(!script.contains("checkout("));
    }

    #[test]
    fn test_binders_are_noops_when_disabled() {
        let mut injector = injector(IntegrationConfig::disabled(), FakeSession::anonymous());
        injector.product_add_to_cart(&ProductSummary {
            id: ProductId::new(7),
            sku: None,
            title: "Hat".to_string(),
        });
        injector.loop_add_to_cart();
        assert!(injector.footer_scripts(None).is_none());
    }

    #[test]
    fn test_footer_flushes_queue_once() {
        let mut injector = injector(enabled_config(), FakeSession::anonymous());
        injector.loop_add_to_cart();

        let script = injector.footer_scripts(None).unwrap();
        assert!(script.contains("crowdstream.events.cart("));
        assert!(script.contains(".add_to_cart_button:not(.product_type_variable, .product_type_grouped)"));

        assert!(injector.footer_scripts(None).is_none());
    }

    #[test]
    fn test_cart_filter_rewrites_payload() {
        let mut injector = injector(enabled_config(), FakeSession::anonymous())
            .with_cart_event_filter(|mut event| {
                event.name = JsValue::Str("Renamed".to_string());
                event
            });
        injector.product_add_to_cart(&ProductSummary {
            id: ProductId::new(7),
            sku: Some("HAT-7".to_string()),
            title: "Hat".to_string(),
        });

        let script = injector.footer_scripts(None).unwrap();
        assert!(script.contains(r#"name: "Renamed""#));
        assert!(!script.contains(r#"name: "Hat""#));
    }
}
