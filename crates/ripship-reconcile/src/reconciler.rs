//! Reversal-then-deduction for one resolved line item.

use ripship_shopify::CommerceApi;

use crate::error::{ReconcileError, Stage};
use crate::resolver::ReconcileTarget;

/// How much to take from the master: `min(quantity, max(available, 0))`.
/// Untracked stock (`None`) counts as zero.
#[must_use]
pub fn clamp_deduction(quantity: u32, available: Option<i64>) -> i64 {
    i64::from(quantity).min(available.unwrap_or(0).max(0))
}

/// What was applied for one line item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub sold_inventory_item_id: u64,
    pub master_inventory_item_id: u64,
    /// Always the full line-item quantity.
    pub reversed: i64,
    /// Master available count read before the deduction.
    pub master_available: Option<i64>,
    /// Amount taken from the master; zero means no deduction call was made.
    pub deducted: i64,
}

impl Adjustment {
    /// The master had less stock than was sold.
    #[must_use]
    pub fn is_short(&self) -> bool {
        self.deducted < self.reversed
    }
}

pub struct Reconciler<'a, C: CommerceApi + ?Sized> {
    api: &'a C,
    location_id: u64,
}

impl<'a, C: CommerceApi + ?Sized> Reconciler<'a, C> {
    pub fn new(api: &'a C, location_id: u64) -> Self {
        Self { api, location_id }
    }

    /// Returns the sold quantity to the sold item, then deducts up to that
    /// quantity from the master without taking it below zero.
    ///
    /// The read of the master's available count and the deduction are two
    /// separate calls; a concurrent adjustment in between is not detected.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::Api`] on the first failing call. A reversal
    /// that already succeeded is not rolled back.
    pub async fn reconcile(&self, target: &ReconcileTarget) -> Result<Adjustment, ReconcileError> {
        let quantity = i64::from(target.quantity);

        self.api
            .adjust_available(target.sold_inventory_item_id, self.location_id, quantity)
            .await
            .map_err(ReconcileError::api(Stage::Reversal))?;

        let master_available = self
            .api
            .available(target.master_inventory_item_id, self.location_id)
            .await
            .map_err(ReconcileError::api(Stage::ReadAvailable))?;

        let deducted = clamp_deduction(target.quantity, master_available);

        if deducted > 0 {
            self.api
                .adjust_available(target.master_inventory_item_id, self.location_id, -deducted)
                .await
                .map_err(ReconcileError::api(Stage::Deduction))?;
        }

        if deducted < quantity {
            tracing::warn!(
                master_sku = %target.master_sku,
                master_inventory_item_id = target.master_inventory_item_id,
                requested = quantity,
                available = ?master_available,
                deducted,
                "master stock insufficient; short deduction"
            );
        } else {
            tracing::info!(
                master_sku = %target.master_sku,
                sold_inventory_item_id = target.sold_inventory_item_id,
                master_inventory_item_id = target.master_inventory_item_id,
                quantity,
                "reconciled line item"
            );
        }

        Ok(Adjustment {
            sold_inventory_item_id: target.sold_inventory_item_id,
            master_inventory_item_id: target.master_inventory_item_id,
            reversed: quantity,
            master_available,
            deducted,
        })
    }
}

#[cfg(test)]
mod tests {
    use ripship_shopify::fake::{Call, CallKind, InMemoryCommerce};

    use super::*;

    const LOCATION: u64 = 555;

    fn target(quantity: u32) -> ReconcileTarget {
        ReconcileTarget {
            sold_inventory_item_id: 100,
            master_inventory_item_id: 200,
            quantity,
            master_sku: "MASTER-1".to_string(),
        }
    }

    #[test]
    fn clamp_deduction_takes_full_quantity_when_stocked() {
        assert_eq!(clamp_deduction(3, Some(5)), 3);
        assert_eq!(clamp_deduction(5, Some(5)), 5);
    }

    #[test]
    fn clamp_deduction_limits_to_available() {
        assert_eq!(clamp_deduction(3, Some(1)), 1);
    }

    #[test]
    fn clamp_deduction_is_zero_for_empty_negative_or_untracked() {
        assert_eq!(clamp_deduction(3, Some(0)), 0);
        assert_eq!(clamp_deduction(3, Some(-4)), 0);
        assert_eq!(clamp_deduction(3, None), 0);
    }

    #[test]
    fn clamp_deduction_never_leaves_master_negative() {
        for available in -3_i64..=10 {
            for quantity in 1_u32..=8 {
                let deducted = clamp_deduction(quantity, Some(available));
                assert!(deducted >= 0);
                assert!(deducted <= i64::from(quantity));
                if available >= 0 {
                    assert!(available - deducted >= 0, "q={quantity} a={available}");
                }
            }
        }
    }

    #[tokio::test]
    async fn full_deduction_when_master_has_stock() {
        let api = InMemoryCommerce::new()
            .with_available(100, LOCATION, Some(7))
            .with_available(200, LOCATION, Some(5));
        let adjustment = Reconciler::new(&api, LOCATION)
            .reconcile(&target(3))
            .await
            .unwrap();

        assert_eq!(adjustment.reversed, 3);
        assert_eq!(adjustment.deducted, 3);
        assert!(!adjustment.is_short());
        assert_eq!(
            api.calls(),
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
        assert_eq!(api.available_now(100, LOCATION), Some(10));
        assert_eq!(api.available_now(200, LOCATION), Some(2));
    }

    #[tokio::test]
    async fn untracked_master_gets_no_deduction_call() {
        let api = InMemoryCommerce::new().with_available(200, LOCATION, None);
        let adjustment = Reconciler::new(&api, LOCATION)
            .reconcile(&target(2))
            .await
            .unwrap();

        assert_eq!(adjustment.deducted, 0);
        assert!(adjustment.is_short());
        assert_eq!(api.adjustments(), vec![(100, 2)]);
    }

    #[tokio::test]
    async fn deduction_failure_keeps_reversal() {
        let api = InMemoryCommerce::new()
            .with_available(200, LOCATION, Some(5))
            .failing_on_nth(CallKind::Adjust, 2);
        let err = Reconciler::new(&api, LOCATION)
            .reconcile(&target(3))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Deduction);
        assert_eq!(api.available_now(100, LOCATION), Some(3));
        assert_eq!(api.available_now(200, LOCATION), Some(5));
    }

    #[tokio::test]
    async fn reversal_failure_stops_before_reading_master() {
        let api = InMemoryCommerce::new().failing_on(CallKind::Adjust);
        let err = Reconciler::new(&api, LOCATION)
            .reconcile(&target(3))
            .await
            .unwrap_err();

        assert_eq!(err.stage(), Stage::Reversal);
        assert_eq!(api.calls().len(), 1);
    }
}
