use async_trait::async_trait;

use crate::error::ShopifyError;
use crate::types::Variant;

/// The commerce-platform operations the reconciler performs.
///
/// Implemented by [`crate::ShopifyAdminClient`] in production and by
/// in-memory fakes in tests.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Reads a product metafield value by namespace and key.
    /// `Ok(None)` when the product has no such metafield.
    async fn product_metafield(
        &self,
        product_id: u64,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, ShopifyError>;

    async fn variant(&self, variant_id: u64) -> Result<Variant, ShopifyError>;

    /// Finds the variant whose SKU equals `sku` exactly.
    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<Variant>, ShopifyError>;

    /// Available count for an item at a location. `Ok(None)` when the item
    /// is untracked or has no level at that location.
    async fn available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
    ) -> Result<Option<i64>, ShopifyError>;

    /// Applies a signed delta to the available count.
    async fn adjust_available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
        delta: i64,
    ) -> Result<(), ShopifyError>;

    /// The order's current comma-separated tag string.
    async fn order_tags(&self, order_id: u64) -> Result<String, ShopifyError>;

    /// Replaces the order's tag string.
    async fn update_order_tags(&self, order_id: u64, tags: &str) -> Result<(), ShopifyError>;
}
