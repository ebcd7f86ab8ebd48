//! Webhook payload types for the Shopify `orders/create` topic.
//!
//! Only the fields the reconciler reads are modelled; everything else in the
//! payload is ignored. Line-item fields are optional because Shopify sends
//! `null` for custom (non-product) line items and for deleted products.

use serde::Deserialize;

/// An order as delivered in the webhook body.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    pub id: u64,

    /// Comma-separated tag string at the time the webhook fired.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tags: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub line_items: Vec<LineItem>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub product_id: Option<u64>,
    #[serde(default)]
    pub variant_id: Option<u64>,
    #[serde(default)]
    pub quantity: Option<u32>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

/// The three line-item fields reconciliation needs, all known to be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilableItem {
    pub product_id: u64,
    pub variant_id: u64,
    pub quantity: u32,
}

impl LineItem {
    /// Returns the product, variant and quantity when all three are present
    /// and non-zero; `None` means the item is skipped.
    #[must_use]
    pub fn reconcilable(&self) -> Option<ReconcilableItem> {
        let product_id = self.product_id.filter(|&id| id != 0)?;
        let variant_id = self.variant_id.filter(|&id| id != 0)?;
        let quantity = self.quantity.filter(|&q| q != 0)?;
        Some(ReconcilableItem {
            product_id,
            variant_id,
            quantity,
        })
    }
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
