//! In-memory [`CommerceApi`] for tests in this and downstream crates.
//!
//! Enabled with the `test-util` feature. Every call is recorded in order so
//! tests can assert on the exact sequence of remote operations.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::api::CommerceApi;
use crate::error::ShopifyError;
use crate::types::Variant;

/// One recorded call against the fake.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Metafield { product_id: u64 },
    Variant { variant_id: u64 },
    FindSku { sku: String },
    Available { inventory_item_id: u64, location_id: u64 },
    Adjust { inventory_item_id: u64, location_id: u64, delta: i64 },
    OrderTags { order_id: u64 },
    UpdateTags { order_id: u64, tags: String },
}

/// Which operation a fake should fail on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Metafield,
    Variant,
    FindSku,
    Available,
    Adjust,
    OrderTags,
    UpdateTags,
}

impl Call {
    fn kind(&self) -> CallKind {
        match self {
            Call::Metafield { .. } => CallKind::Metafield,
            Call::Variant { .. } => CallKind::Variant,
            Call::FindSku { .. } => CallKind::FindSku,
            Call::Available { .. } => CallKind::Available,
            Call::Adjust { .. } => CallKind::Adjust,
            Call::OrderTags { .. } => CallKind::OrderTags,
            Call::UpdateTags { .. } => CallKind::UpdateTags,
        }
    }
}

#[derive(Default)]
struct State {
    metafields: HashMap<(u64, String, String), String>,
    variants: HashMap<u64, Variant>,
    available: HashMap<(u64, u64), Option<i64>>,
    order_tags: HashMap<u64, String>,
    calls: Vec<Call>,
    fail_on: Option<(CallKind, usize)>,
}

#[derive(Default)]
pub struct InMemoryCommerce {
    state: Mutex<State>,
}

impl InMemoryCommerce {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn with_metafield(self, product_id: u64, namespace: &str, key: &str, value: &str) -> Self {
        self.lock().metafields.insert(
            (product_id, namespace.to_owned(), key.to_owned()),
            value.to_owned(),
        );
        self
    }

    #[must_use]
    pub fn with_variant(self, variant_id: u64, sku: &str, inventory_item_id: u64) -> Self {
        self.lock().variants.insert(
            variant_id,
            Variant {
                id: variant_id,
                sku: Some(sku.to_owned()),
                inventory_item_id,
            },
        );
        self
    }

    #[must_use]
    pub fn with_available(
        self,
        inventory_item_id: u64,
        location_id: u64,
        available: Option<i64>,
    ) -> Self {
        self.lock()
            .available
            .insert((inventory_item_id, location_id), available);
        self
    }

    #[must_use]
    pub fn with_order_tags(self, order_id: u64, tags: &str) -> Self {
        self.lock().order_tags.insert(order_id, tags.to_owned());
        self
    }

    /// Makes the first call of `kind` fail with a 500.
    #[must_use]
    pub fn failing_on(self, kind: CallKind) -> Self {
        self.failing_on_nth(kind, 1)
    }

    /// Makes the `n`-th (1-based) call of `kind` fail with a 500.
    #[must_use]
    pub fn failing_on_nth(self, kind: CallKind, n: usize) -> Self {
        self.lock().fail_on = Some((kind, n));
        self
    }

    #[must_use]
    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    /// Only the inventory adjustments, in order.
    #[must_use]
    pub fn adjustments(&self) -> Vec<(u64, i64)> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Adjust {
                    inventory_item_id,
                    delta,
                    ..
                } => Some((*inventory_item_id, *delta)),
                _ => None,
            })
            .collect()
    }

    /// Only the tag writes, in order.
    #[must_use]
    pub fn tag_writes(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::UpdateTags { tags, .. } => Some(tags.clone()),
                _ => None,
            })
            .collect()
    }

    #[must_use]
    pub fn available_now(&self, inventory_item_id: u64, location_id: u64) -> Option<i64> {
        self.lock()
            .available
            .get(&(inventory_item_id, location_id))
            .copied()
            .flatten()
    }

    #[must_use]
    pub fn current_tags(&self, order_id: u64) -> String {
        self.lock()
            .order_tags
            .get(&order_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Records `call` and returns the injected failure if this is the call
    /// configured to fail.
    fn record(&self, call: Call) -> Result<MutexGuard<'_, State>, ShopifyError> {
        let mut state = self.lock();
        let kind = call.kind();
        state.calls.push(call);
        if let Some((fail_kind, n)) = state.fail_on {
            let seen = state.calls.iter().filter(|c| c.kind() == kind).count();
            if fail_kind == kind && seen == n {
                return Err(ShopifyError::UnexpectedStatus {
                    status: 500,
                    url: format!("fake://{kind:?}"),
                });
            }
        }
        Ok(state)
    }
}

#[async_trait]
impl CommerceApi for InMemoryCommerce {
    async fn product_metafield(
        &self,
        product_id: u64,
        namespace: &str,
        key: &str,
    ) -> Result<Option<String>, ShopifyError> {
        let state = self.record(Call::Metafield { product_id })?;
        Ok(state
            .metafields
            .get(&(product_id, namespace.to_owned(), key.to_owned()))
            .cloned())
    }

    async fn variant(&self, variant_id: u64) -> Result<Variant, ShopifyError> {
        let state = self.record(Call::Variant { variant_id })?;
        state
            .variants
            .get(&variant_id)
            .cloned()
            .ok_or_else(|| ShopifyError::NotFound {
                url: format!("fake://variants/{variant_id}"),
            })
    }

    async fn find_variant_by_sku(&self, sku: &str) -> Result<Option<Variant>, ShopifyError> {
        let state = self.record(Call::FindSku {
            sku: sku.to_owned(),
        })?;
        Ok(state
            .variants
            .values()
            .find(|v| v.sku.as_deref() == Some(sku))
            .cloned())
    }

    async fn available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
    ) -> Result<Option<i64>, ShopifyError> {
        let state = self.record(Call::Available {
            inventory_item_id,
            location_id,
        })?;
        Ok(state
            .available
            .get(&(inventory_item_id, location_id))
            .copied()
            .flatten())
    }

    async fn adjust_available(
        &self,
        inventory_item_id: u64,
        location_id: u64,
        delta: i64,
    ) -> Result<(), ShopifyError> {
        let mut state = self.record(Call::Adjust {
            inventory_item_id,
            location_id,
            delta,
        })?;
        let level = state
            .available
            .entry((inventory_item_id, location_id))
            .or_insert(None);
        *level = Some(level.unwrap_or(0) + delta);
        Ok(())
    }

    async fn order_tags(&self, order_id: u64) -> Result<String, ShopifyError> {
        let state = self.record(Call::OrderTags { order_id })?;
        Ok(state.order_tags.get(&order_id).cloned().unwrap_or_default())
    }

    async fn update_order_tags(&self, order_id: u64, tags: &str) -> Result<(), ShopifyError> {
        let mut state = self.record(Call::UpdateTags {
            order_id,
            tags: tags.to_owned(),
        })?;
        state.order_tags.insert(order_id, tags.to_owned());
        Ok(())
    }
}
