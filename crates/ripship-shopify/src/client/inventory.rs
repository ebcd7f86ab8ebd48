//! Inventory level reads and relative adjustments.

use crate::error::ShopifyError;
use crate::types::{AdjustRequest, InventoryLevelsResponse};

use super::ShopifyAdminClient;

impl ShopifyAdminClient {
    /// Reads the available count for one item at one location.
    ///
    /// Returns `None` when the item is untracked (`available: null`) or has
    /// no level row at the location.
    ///
    /// # Errors
    ///
    /// Any transport, status, or deserialization error.
    pub async fn get_available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
    ) -> Result<Option<i64>, ShopifyError> {
        let item = inventory_item_id.to_string();
        let location = location_id.to_string();
        let url = self.endpoint(
            "inventory_levels.json",
            &[("inventory_item_ids", &item), ("location_ids", &location)],
        )?;

        let parsed: InventoryLevelsResponse = self
            .get_json(
                url,
                &format!("inventory level for item {inventory_item_id} at {location_id}"),
            )
            .await?;

        Ok(parsed
            .inventory_levels
            .iter()
            .find(|l| l.inventory_item_id == inventory_item_id && l.location_id == location_id)
            .and_then(|l| l.available))
    }

    /// Applies a signed `delta` to the available count.
    ///
    /// # Errors
    ///
    /// Any transport or status error. The response body is not inspected.
    pub async fn post_inventory_adjustment(
        &self,
        inventory_item_id: u64,
        location_id: u64,
        delta: i64,
    ) -> Result<(), ShopifyError> {
        let url = self.endpoint("inventory_levels/adjust.json", &[])?;
        let body = AdjustRequest {
            location_id,
            inventory_item_id,
            available_adjustment: delta,
        };

        self.execute(self.client.post(url.clone()).json(&body), &url)
            .await?;

        tracing::debug!(inventory_item_id, location_id, delta, "inventory adjusted");
        Ok(())
    }
}
