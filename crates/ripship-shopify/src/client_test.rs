use super::*;

fn test_client(store_url: &str) -> ShopifyAdminClient {
    ShopifyAdminClient::with_base_url(store_url, "shpat_test", "2024-10", 5, "ripship-test/0.1")
        .expect("client construction should not fail")
}

#[test]
fn endpoint_joins_admin_path() {
    let client = test_client("https://example.myshopify.com");
    let url = client.endpoint("variants/7.json", &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.myshopify.com/admin/api/2024-10/variants/7.json"
    );
}

#[test]
fn endpoint_strips_trailing_slash_on_store() {
    let client = test_client("https://example.myshopify.com/");
    let url = client.endpoint("graphql.json", &[]).unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.myshopify.com/admin/api/2024-10/graphql.json"
    );
}

#[test]
fn endpoint_appends_query_pairs() {
    let client = test_client("https://example.myshopify.com");
    let url = client
        .endpoint(
            "inventory_levels.json",
            &[("inventory_item_ids", "200"), ("location_ids", "555")],
        )
        .unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.myshopify.com/admin/api/2024-10/inventory_levels.json?inventory_item_ids=200&location_ids=555"
    );
}

#[test]
fn endpoint_encodes_query_values() {
    let client = test_client("https://example.myshopify.com");
    let url = client
        .endpoint("products/1/metafields.json", &[("namespace", "rip & ship")])
        .unwrap();
    assert!(
        url.as_str().contains("namespace=rip+%26+ship"),
        "query value should be percent-encoded: {url}"
    );
}

#[test]
fn with_base_url_rejects_invalid_store() {
    let result =
        ShopifyAdminClient::with_base_url("not a url", "t", "2024-10", 5, "ripship-test/0.1");
    assert!(
        matches!(result, Err(ShopifyError::InvalidStoreUrl { .. })),
        "expected InvalidStoreUrl"
    );
}
