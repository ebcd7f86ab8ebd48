//! Marks reconciled orders with a fixed tag.

use ripship_core::{has_tag, with_tag, Order};
use ripship_shopify::CommerceApi;

use crate::error::{ReconcileError, Stage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Added,
    AlreadyPresent,
}

pub struct Tagger<'a, C: CommerceApi + ?Sized> {
    api: &'a C,
    marker: &'a str,
}

impl<'a, C: CommerceApi + ?Sized> Tagger<'a, C> {
    pub fn new(api: &'a C, marker: &'a str) -> Self {
        Self { api, marker }
    }

    /// Reads the order's current tags and reports whether the marker is set.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Api`] if the tag read fails.
    pub async fn is_tagged(&self, order_id: u64) -> Result<bool, ReconcileError> {
        let current = self
            .api
            .order_tags(order_id)
            .await
            .map_err(ReconcileError::api(Stage::ReadTags))?;
        Ok(has_tag(&current, self.marker))
    }

    /// Adds the marker to the order when `reconciled` is set.
    ///
    /// Returns `None` without any call when `reconciled` is false. Existing
    /// tags are kept; if the marker is already present nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Api`] if the tag read or write fails.
    pub async fn apply(
        &self,
        order: &Order,
        reconciled: bool,
    ) -> Result<Option<TagOutcome>, ReconcileError> {
        if !reconciled {
            return Ok(None);
        }

        let current = self
            .api
            .order_tags(order.id)
            .await
            .map_err(ReconcileError::api(Stage::ReadTags))?;

        let Some(updated) = with_tag(&current, self.marker) else {
            tracing::debug!(order_id = order.id, "order already tagged");
            return Ok(Some(TagOutcome::AlreadyPresent));
        };

        self.api
            .update_order_tags(order.id, &updated)
            .await
            .map_err(ReconcileError::api(Stage::UpdateTags))?;

        tracing::info!(order_id = order.id, tag = self.marker, "order tagged");
        Ok(Some(TagOutcome::Added))
    }
}

#[cfg(test)]
mod tests {
    use ripship_shopify::fake::InMemoryCommerce;

    use super::*;

    const MARKER: &str = "rip-ship-reconciled";

    fn order(id: u64) -> Order {
        Order {
            id,
            tags: String::new(),
            line_items: Vec::new(),
        }
    }

    #[tokio::test]
    async fn not_reconciled_makes_no_calls() {
        let api = InMemoryCommerce::new();
        let outcome = Tagger::new(&api, MARKER)
            .apply(&order(1), false)
            .await
            .unwrap();
        assert_eq!(outcome, None);
        assert!(api.calls().is_empty());
    }

    #[tokio::test]
    async fn appends_marker_and_keeps_existing_tags() {
        let api = InMemoryCommerce::new().with_order_tags(1, "vip, wholesale");
        let outcome = Tagger::new(&api, MARKER)
            .apply(&order(1), true)
            .await
            .unwrap();
        assert_eq!(outcome, Some(TagOutcome::Added));
        assert_eq!(
            api.tag_writes(),
            vec!["vip, wholesale, rip-ship-reconciled".to_string()]
        );
    }

    #[tokio::test]
    async fn second_application_is_a_no_op() {
        let api = InMemoryCommerce::new().with_order_tags(1, "vip");
        let tagger = Tagger::new(&api, MARKER);

        tagger.apply(&order(1), true).await.unwrap();
        let outcome = tagger.apply(&order(1), true).await.unwrap();

        assert_eq!(outcome, Some(TagOutcome::AlreadyPresent));
        assert_eq!(api.tag_writes().len(), 1);
        assert_eq!(api.current_tags(1), "vip, rip-ship-reconciled");
    }

    #[tokio::test]
    async fn is_tagged_reads_remote_tags() {
        let api = InMemoryCommerce::new().with_order_tags(1, "Rip-Ship-Reconciled");
        assert!(Tagger::new(&api, MARKER).is_tagged(1).await.unwrap());
        assert!(!Tagger::new(&api, MARKER).is_tagged(2).await.unwrap());
    }
}
