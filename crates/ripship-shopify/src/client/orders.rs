//! Order tag reads and writes.

use crate::error::ShopifyError;
use crate::types::{OrderEnvelope, OrderTags};

use super::ShopifyAdminClient;

impl ShopifyAdminClient {
    /// Reads the order's current tag string (empty when the order has none).
    ///
    /// # Errors
    ///
    /// Any transport, status, or deserialization error.
    pub async fn get_order_tags(&self, order_id: u64) -> Result<String, ShopifyError> {
        let url = self.endpoint(&format!("orders/{order_id}.json"), &[("fields", "id,tags")])?;
        let parsed: OrderEnvelope = self
            .get_json(url, &format!("tags for order {order_id}"))
            .await?;
        Ok(parsed.order.tags.unwrap_or_default())
    }

    /// Replaces the order's tag string.
    ///
    /// # Errors
    ///
    /// Any transport or status error.
    pub async fn put_order_tags(&self, order_id: u64, tags: &str) -> Result<(), ShopifyError> {
        let url = self.endpoint(&format!("orders/{order_id}.json"), &[])?;
        let body = OrderEnvelope {
            order: OrderTags {
                id: order_id,
                tags: Some(tags.to_owned()),
            },
        };

        self.execute(self.client.put(url.clone()).json(&body), &url)
            .await?;
        Ok(())
    }
}
