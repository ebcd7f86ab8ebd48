//! Decides whether a line item belongs to the rip & ship family and, if so,
//! which two inventory items the reconciler should touch.

use ripship_core::LineItem;
use ripship_shopify::CommerceApi;

use crate::error::{ReconcileError, Stage};
use crate::settings::ReconcileSettings;

/// Inventory items and quantity for one detected line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileTarget {
    pub sold_inventory_item_id: u64,
    pub master_inventory_item_id: u64,
    pub quantity: u32,
    pub master_sku: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Product, variant, or quantity missing or zero.
    Skipped,
    /// The product has no master-SKU metafield.
    NotVirtual,
    /// Detected, but no variant carries the master SKU.
    MasterMissing { master_sku: String },
    Resolved(ReconcileTarget),
}

impl Resolution {
    /// Whether the item belongs to the rip & ship family, regardless of
    /// whether its master could be found. Detection drives tagging.
    #[must_use]
    pub fn is_detected(&self) -> bool {
        matches!(self, Self::MasterMissing { .. } | Self::Resolved(_))
    }
}

pub struct Resolver<'a, C: CommerceApi + ?Sized> {
    api: &'a C,
    settings: &'a ReconcileSettings,
}

impl<'a, C: CommerceApi + ?Sized> Resolver<'a, C> {
    pub fn new(api: &'a C, settings: &'a ReconcileSettings) -> Self {
        Self { api, settings }
    }

    /// Resolves one line item.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Api`] if a metafield or variant call fails.
    /// Lookup misses are not errors; they come back as a [`Resolution`].
    pub async fn resolve(&self, item: &LineItem) -> Result<Resolution, ReconcileError> {
        let Some(item) = item.reconcilable() else {
            return Ok(Resolution::Skipped);
        };

        let master_sku = self
            .api
            .product_metafield(
                item.product_id,
                &self.settings.metafield_namespace,
                &self.settings.metafield_key,
            )
            .await
            .map_err(ReconcileError::api(Stage::Metafield))?;

        let Some(master_sku) = master_sku else {
            tracing::debug!(
                product_id = item.product_id,
                "no master SKU metafield; not a rip & ship item"
            );
            return Ok(Resolution::NotVirtual);
        };

        tracing::info!(
            product_id = item.product_id,
            variant_id = item.variant_id,
            quantity = item.quantity,
            master_sku = %master_sku,
            "rip & ship item detected"
        );

        let sold = self
            .api
            .variant(item.variant_id)
            .await
            .map_err(ReconcileError::api(Stage::Variant))?;

        let master = self
            .api
            .find_variant_by_sku(&master_sku)
            .await
            .map_err(ReconcileError::api(Stage::MasterLookup))?;

        let Some(master) = master else {
            tracing::warn!(
                product_id = item.product_id,
                master_sku = %master_sku,
                "no variant found for master SKU; skipping item"
            );
            return Ok(Resolution::MasterMissing { master_sku });
        };

        Ok(Resolution::Resolved(ReconcileTarget {
            sold_inventory_item_id: sold.inventory_item_id,
            master_inventory_item_id: master.inventory_item_id,
            quantity: item.quantity,
            master_sku,
        }))
    }
}

#[cfg(test)]
mod tests {
    use ripship_shopify::fake::{Call, CallKind, InMemoryCommerce};

    use super::*;

    fn settings() -> ReconcileSettings {
        ReconcileSettings {
            location_id: 555,
            metafield_namespace: "custom".to_string(),
            metafield_key: "master_sku".to_string(),
            order_tag: "rip-ship-reconciled".to_string(),
        }
    }

    fn item(product_id: u64, variant_id: u64, quantity: u32) -> LineItem {
        LineItem {
            product_id: Some(product_id),
            variant_id: Some(variant_id),
            quantity: Some(quantity),
            ..LineItem::default()
        }
    }

    #[tokio::test]
    async fn skips_incomplete_item_without_calls() {
        let api = InMemoryCommerce::new();
        let settings = settings();
        let resolver = Resolver::new(&api, &settings);

        let incomplete = LineItem {
            product_id: Some(1),
            ..LineItem::default()
        };
        assert_eq!(
            resolver.resolve(&incomplete).await.unwrap(),
            Resolution::Skipped
        );
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn product_without_metafield_is_not_virtual() {
        let api = InMemoryCommerce::new();
        let settings = settings();
        let resolver = Resolver::new(&api, &settings);

        let resolution = resolver.resolve(&item(1, 2, 1)).await.unwrap();
        assert_eq!(resolution, Resolution::NotVirtual);
        assert!(!resolution.is_detected());
        assert_eq!(api.calls(), vec![Call::Metafield { product_id: 1 }]);
    }

    #[tokio::test]
    async fn resolves_sold_and_master_inventory_items() {
        let api = InMemoryCommerce::new()
            .with_metafield(1, "custom", "master_sku", "MASTER-1")
            .with_variant(2, "RIP-1", 100)
            .with_variant(3, "MASTER-1", 200);
        let settings = settings();
        let resolver = Resolver::new(&api, &settings);

        let resolution = resolver.resolve(&item(1, 2, 3)).await.unwrap();
        assert_eq!(
            resolution,
            Resolution::Resolved(ReconcileTarget {
                sold_inventory_item_id: 100,
                master_inventory_item_id: 200,
                quantity: 3,
                master_sku: "MASTER-1".to_string(),
            })
        );
        assert!(resolution.is_detected());
    }

    #[tokio::test]
    async fn missing_master_variant_is_detected_but_unresolved() {
        let api = InMemoryCommerce::new()
            .with_metafield(1, "custom", "master_sku", "MASTER-404")
            .with_variant(2, "RIP-1", 100);
        let settings = settings();
        let resolver = Resolver::new(&api, &settings);

        let resolution = resolver.resolve(&item(1, 2, 1)).await.unwrap();
        assert_eq!(
            resolution,
            Resolution::MasterMissing {
                master_sku: "MASTER-404".to_string()
            }
        );
        assert!(resolution.is_detected());
    }

    #[tokio::test]
    async fn metafield_failure_is_reported_with_stage() {
        let api = InMemoryCommerce::new().failing_on(CallKind::Metafield);
        let settings = settings();
        let resolver = Resolver::new(&api, &settings);

        let err = resolver.resolve(&item(1, 2, 1)).await.unwrap_err();
        assert_eq!(err.stage(), Stage::Metafield);
    }
}
