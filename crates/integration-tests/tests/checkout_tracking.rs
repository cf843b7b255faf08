//! Checkout emission on the order-confirmation page, including the
//! once-per-order idempotency flag.

#![allow(clippy::unwrap_used)]

use crowdstream_core::{OrderId, Page, ProductId};
use crowdstream_integration_tests::{
    MemoryCatalog, MemoryOrders, MemorySettings, TestSession, init_tracing, two_item_order,
};
use crowdstream_tracking::TrackingInjector;
use crowdstream_tracking::checkout::TRACKED_META_KEY;

fn confirmation(id: i64) -> Page {
    Page::OrderConfirmation {
        order_id: OrderId::new(id),
    }
}

#[test]
fn first_confirmation_render_emits_add_items_then_checkout() {
    init_tracing();
    let settings = MemorySettings::enabled("cs-app-1");
    let orders = MemoryOrders::holding([two_item_order(1001)]);
    let catalog = MemoryCatalog::empty().with_categories(ProductId::new(10), &["Gadgets", "Widgets"]);

    let injector = TrackingInjector::from_settings(
        &settings,
        TestSession::anonymous(),
        &orders,
        catalog,
    );
    let script = injector.head_script(confirmation(1001), None).unwrap();

    let add_items = script.find("crowdstream.events.addItems([").unwrap();
    let checkout = script.find("crowdstream.events.checkout({").unwrap();
    assert!(add_items < checkout);

    // Two item records, on-wire field shapes intact.
    assert_eq!(script.matches(r#"order_id: "1001""#).count(), 3);
    assert!(script.contains(r#"name: "Widget""#));
    assert!(script.contains(r#"id: "WID-1""#));
    assert!(script.contains(r#"sku: "WID-1""#));
    assert!(script.contains(r#"amount: "20.00""#));
    assert!(script.contains(r#"quantity: "2""#));
    assert!(script.contains(r#"category: "Gadgets/Widgets""#));
    assert!(script.contains(r#"name: "Gizmo""#));
    assert!(script.contains(r#"id: "11""#));
    assert!(script.contains(r#"variation: "Color: Blue""#));

    // Order-level aggregates pass through unrounded.
    assert!(script.contains(r#"total: "29.00""#));
    assert!(script.contains(r#"shipping: "3.00""#));
    assert!(script.contains(r#"currency: "USD""#));
    assert!(script.contains(r#"items: "3""#));

    assert_eq!(
        orders.meta_value(OrderId::new(1001), TRACKED_META_KEY),
        Some("1".to_string())
    );
}

#[test]
fn reloading_the_confirmation_page_does_not_re_emit_checkout() {
    init_tracing();
    let settings = MemorySettings::enabled("cs-app-1");
    let orders = MemoryOrders::holding([two_item_order(1001)]);

    let first = TrackingInjector::from_settings(
        &settings,
        TestSession::anonymous(),
        &orders,
        MemoryCatalog::empty(),
    );
    let script = first.head_script(confirmation(1001), None).unwrap();
    assert!(script.contains("crowdstream.events.checkout({"));

    // A fresh injector over the same store, as on reload.
    let second = TrackingInjector::from_settings(
        &settings,
        TestSession::anonymous(),
        &orders,
        MemoryCatalog::empty(),
    );
    let script = second.head_script(confirmation(1001), None).unwrap();
    assert!(!script.contains("checkout("));
    assert!(!script.contains("addItems("));
    assert!(script.contains("crowdstream.events.page();"));
}

#[test]
fn missing_order_skips_checkout_and_leaves_flag_unset() {
    init_tracing();
    let settings = MemorySettings::enabled("cs-app-1");
    let orders = MemoryOrders::empty();

    let injector = TrackingInjector::from_settings(
        &settings,
        TestSession::anonymous(),
        &orders,
        MemoryCatalog::empty(),
    );
    let script = injector.head_script(confirmation(1001), None).unwrap();

    assert!(!script.contains("checkout("));
    assert!(script.contains("crowdstream.events.page();"));
    assert_eq!(orders.meta_value(OrderId::new(1001), TRACKED_META_KEY), None);
}

#[test]
fn different_orders_each_get_their_own_checkout() {
    init_tracing();
    let settings = MemorySettings::enabled("cs-app-1");
    let orders = MemoryOrders::holding([two_item_order(1001), two_item_order(1002)]);

    for id in [1001, 1002] {
        let injector = TrackingInjector::from_settings(
            &settings,
            TestSession::anonymous(),
            &orders,
            MemoryCatalog::empty(),
        );
        let script = injector.head_script(confirmation(id), None).unwrap();
        assert!(script.contains("crowdstream.events.checkout({"), "order {id}");
        assert_eq!(
            orders.meta_value(OrderId::new(id), TRACKED_META_KEY),
            Some("1".to_string()),
            "order {id}"
        );
    }
}
