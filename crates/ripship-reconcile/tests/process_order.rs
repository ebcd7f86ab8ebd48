use ripship_core::Order;
use ripship_reconcile::{process_order, ReconcileSettings, Stage, TagOutcome};
use ripship_shopify::fake::{Call, CallKind, InMemoryCommerce};

const LOCATION: u64 = 555;
const ORDER_ID: u64 = 9001;
const MARKER: &str = "rip-ship-reconciled";

fn settings() -> ReconcileSettings {
    ReconcileSettings {
        location_id: LOCATION,
        metafield_namespace: "custom".to_string(),
        metafield_key: "master_sku".to_string(),
        order_tag: MARKER.to_string(),
    }
}

fn order(json: serde_json::Value) -> Order {
    serde_json::from_value(json).expect("order payload")
}

fn single_item_order(quantity: u32) -> Order {
    order(serde_json::json!({
        "id": ORDER_ID,
        "tags": "vip",
        "line_items": [
            { "id": 1, "product_id": 10, "variant_id": 20, "quantity": quantity, "sku": "RIP-1" }
        ]
    }))
}

/// Product 10 points at MASTER-1; variant 20 is stocked as item 100 and the
/// master variant 30 as item 200.
fn catalog(master_available: Option<i64>) -> InMemoryCommerce {
    InMemoryCommerce::new()
        .with_metafield(10, "custom", "master_sku", "MASTER-1")
        .with_variant(20, "RIP-1", 100)
        .with_variant(30, "MASTER-1", 200)
        .with_available(200, LOCATION, master_available)
        .with_order_tags(ORDER_ID, "vip")
}

fn reconcile_calls(api: &InMemoryCommerce) -> Vec<Call> {
    api.calls()
        .into_iter()
        .filter(|c| matches!(c, Call::Adjust { .. } | Call::Available { .. }))
        .collect()
}

#[tokio::test]
async fn order_without_virtual_items_is_left_alone() {
    let api = InMemoryCommerce::new().with_order_tags(ORDER_ID, "vip");
    let order = order(serde_json::json!({
        "id": ORDER_ID,
        "tags": "vip",
        "line_items": [
            { "product_id": 11, "variant_id": 21, "quantity": 2 },
            { "product_id": null, "variant_id": null, "quantity": 1, "title": "Gift wrap" }
        ]
    }));

    let report = process_order(&api, &settings(), &order).await.unwrap();

    assert_eq!(report.detected, 0);
    assert!(report.adjustments.is_empty());
    assert_eq!(report.tag, None);
    assert!(api.adjustments().is_empty());
    assert!(api.tag_writes().is_empty());
    assert_eq!(api.calls(), vec![Call::Metafield { product_id: 11 }]);
}

#[tokio::test]
async fn reverses_sold_item_and_deducts_master() {
    let api = catalog(Some(5));

    let report = process_order(&api, &settings(), &single_item_order(3))
        .await
        .unwrap();

    assert_eq!(
        reconcile_calls(&api),
        vec![
            Call::Adjust {
                inventory_item_id: 100,
                location_id: LOCATION,
                delta: 3
            },
            Call::Available {
                inventory_item_id: 200,
                location_id: LOCATION
            },
            Call::Adjust {
                inventory_item_id: 200,
                location_id: LOCATION,
                delta: -3
            },
        ]
    );
    assert_eq!(api.available_now(200, LOCATION), Some(2));
    assert_eq!(report.detected, 1);
    assert_eq!(report.adjustments.len(), 1);
    assert_eq!(report.tag, Some(TagOutcome::Added));
    assert_eq!(api.current_tags(ORDER_ID), "vip, rip-ship-reconciled");
}

#[tokio::test]
async fn short_master_stock_deducts_only_what_is_available() {
    let api = catalog(Some(1));

    let report = process_order(&api, &settings(), &single_item_order(3))
        .await
        .unwrap();

    assert_eq!(api.adjustments(), vec![(100, 3), (200, -1)]);
    assert_eq!(api.available_now(200, LOCATION), Some(0));
    assert!(report.adjustments[0].is_short());
    assert_eq!(report.tag, Some(TagOutcome::Added));
}

#[tokio::test]
async fn empty_or_untracked_master_gets_no_deduction_but_order_is_tagged() {
    for available in [Some(0), None] {
        let api = catalog(available);

        let report = process_order(&api, &settings(), &single_item_order(3))
            .await
            .unwrap();

        assert_eq!(api.adjustments(), vec![(100, 3)], "available={available:?}");
        assert_eq!(report.adjustments[0].deducted, 0);
        assert_eq!(report.tag, Some(TagOutcome::Added));
        assert_eq!(api.tag_writes(), vec!["vip, rip-ship-reconciled".to_string()]);
    }
}

#[tokio::test]
async fn missing_master_variant_skips_item_but_still_tags() {
    let api = InMemoryCommerce::new()
        .with_metafield(10, "custom", "master_sku", "MASTER-404")
        .with_variant(20, "RIP-1", 100)
        .with_order_tags(ORDER_ID, "vip");

    let report = process_order(&api, &settings(), &single_item_order(2))
        .await
        .unwrap();

    assert!(api.adjustments().is_empty());
    assert_eq!(report.skipped_master_missing, vec!["MASTER-404".to_string()]);
    assert_eq!(report.tag, Some(TagOutcome::Added));
}

#[tokio::test]
async fn marker_in_payload_short_circuits_without_calls() {
    let api = catalog(Some(5));
    let order = order(serde_json::json!({
        "id": ORDER_ID,
        "tags": "vip, Rip-Ship-Reconciled",
        "line_items": [{ "product_id": 10, "variant_id": 20, "quantity": 3 }]
    }));

    let report = process_order(&api, &settings(), &order).await.unwrap();

    assert!(report.already_processed);
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn redelivery_after_tagging_is_not_reapplied() {
    let api = catalog(Some(5));
    let order = single_item_order(3);

    let first = process_order(&api, &settings(), &order).await.unwrap();
    let second = process_order(&api, &settings(), &order).await.unwrap();

    assert!(!first.already_processed);
    assert!(second.already_processed);
    assert!(second.adjustments.is_empty());
    assert_eq!(api.adjustments(), vec![(100, 3), (200, -3)]);
    assert_eq!(api.tag_writes().len(), 1);
}

#[tokio::test]
async fn failure_midway_keeps_earlier_items_and_leaves_order_untagged() {
    let api = catalog(Some(10))
        .with_metafield(11, "custom", "master_sku", "MASTER-1")
        .with_variant(21, "RIP-2", 101)
        .failing_on_nth(CallKind::Adjust, 3);
    let order = order(serde_json::json!({
        "id": ORDER_ID,
        "tags": "vip",
        "line_items": [
            { "product_id": 10, "variant_id": 20, "quantity": 1 },
            { "product_id": 11, "variant_id": 21, "quantity": 2 },
            { "product_id": 10, "variant_id": 20, "quantity": 4 }
        ]
    }));

    let err = process_order(&api, &settings(), &order).await.unwrap_err();

    assert_eq!(err.stage(), Stage::Reversal);
    assert_eq!(api.available_now(100, LOCATION), Some(1));
    assert_eq!(api.available_now(200, LOCATION), Some(9));
    assert!(api.tag_writes().is_empty());
    assert_eq!(
        api.calls()
            .iter()
            .filter(|c| matches!(c, Call::Metafield { .. }))
            .count(),
        2
    );
}

#[tokio::test]
async fn tag_write_failure_is_reported() {
    let api = catalog(Some(5)).failing_on(CallKind::UpdateTags);

    let err = process_order(&api, &settings(), &single_item_order(3))
        .await
        .unwrap_err();

    assert_eq!(err.stage(), Stage::UpdateTags);
    assert_eq!(api.adjustments(), vec![(100, 3), (200, -3)]);
}
