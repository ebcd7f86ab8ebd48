//! Shopify Admin API response types.
//!
//! ## Notes on observed shapes
//!
//! ### Metafield `value`
//! The REST endpoint returns `value` as a string for text metafields but as a
//! JSON number for `number_integer` ones. We accept any JSON scalar and turn
//! it into a string; a `null` or blank value counts as absent.
//!
//! ### Inventory `available`
//! `null` when the item is not tracked at the location. An item that was
//! never stocked at the location has no level row at all. Both map to `None`.
//!
//! ### GraphQL ids
//! The GraphQL API returns global ids like `gid://shopify/InventoryItem/200`;
//! REST uses the bare numeric id. [`parse_gid`] converts between them.

use serde::{Deserialize, Serialize};

use crate::error::ShopifyError;

/// A product variant reduced to what the reconciler needs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    pub id: u64,
    #[serde(default)]
    pub sku: Option<String>,
    pub inventory_item_id: u64,
}

/// `GET /products/{id}/metafields.json`
#[derive(Debug, Deserialize)]
pub(crate) struct MetafieldsResponse {
    #[serde(default)]
    pub metafields: Vec<Metafield>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Metafield {
    pub namespace: String,
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl Metafield {
    /// The value as a trimmed, non-empty string.
    pub(crate) fn value_string(&self) -> Option<String> {
        let raw = match &self.value {
            serde_json::Value::String(s) => s.trim().to_owned(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            _ => return None,
        };
        (!raw.is_empty()).then_some(raw)
    }
}

/// `GET /variants/{id}.json`
#[derive(Debug, Deserialize)]
pub(crate) struct VariantResponse {
    pub variant: Variant,
}

/// `GET /inventory_levels.json`
#[derive(Debug, Deserialize)]
pub(crate) struct InventoryLevelsResponse {
    #[serde(default)]
    pub inventory_levels: Vec<InventoryLevel>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryLevel {
    pub inventory_item_id: u64,
    pub location_id: u64,
    #[serde(default)]
    pub available: Option<i64>,
}

/// `POST /inventory_levels/adjust.json`
#[derive(Debug, Serialize)]
pub(crate) struct AdjustRequest {
    pub location_id: u64,
    pub inventory_item_id: u64,
    pub available_adjustment: i64,
}

/// `GET /orders/{id}.json?fields=id,tags` and the `PUT` body.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrderEnvelope {
    pub order: OrderTags,
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct OrderTags {
    pub id: u64,
    #[serde(default)]
    pub tags: Option<String>,
}

/// Body of `POST /graphql.json`.
#[derive(Debug, Serialize)]
pub(crate) struct GraphQlRequest {
    pub query: &'static str,
    pub variables: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GraphQlError {
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantsBySkuData {
    pub product_variants: VariantConnection,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VariantConnection {
    #[serde(default)]
    pub nodes: Vec<VariantNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VariantNode {
    pub id: String,
    #[serde(default)]
    pub sku: Option<String>,
    pub inventory_item: InventoryItemRef,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoryItemRef {
    pub id: String,
}

/// Parses the numeric id from a Shopify global id
/// (`gid://shopify/InventoryItem/200` → `200`).
///
/// # Errors
///
/// Returns [`ShopifyError::InvalidId`] if the last path segment is not a
/// positive integer.
pub fn parse_gid(gid: &str, context: &str) -> Result<u64, ShopifyError> {
    gid.rsplit('/')
        .next()
        .and_then(|tail| tail.split('?').next())
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|&n| n != 0)
        .ok_or_else(|| ShopifyError::InvalidId {
            context: context.to_owned(),
            value: gid.to_owned(),
        })
}
