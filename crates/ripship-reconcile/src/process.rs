//! Per-order orchestration: resolve, reconcile and tag.

use ripship_core::{has_tag, Order};
use ripship_shopify::CommerceApi;

use crate::error::ReconcileError;
use crate::reconciler::{Adjustment, Reconciler};
use crate::resolver::{Resolution, Resolver};
use crate::settings::ReconcileSettings;
use crate::tagger::{TagOutcome, Tagger};

/// Summary of one processed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderReport {
    pub order_id: u64,
    /// The marker tag was already on the order; nothing was touched.
    pub already_processed: bool,
    /// Line items carrying the master-SKU metafield.
    pub detected: usize,
    pub adjustments: Vec<Adjustment>,
    /// Master SKUs named by detected items but not found in the catalog.
    pub skipped_master_missing: Vec<String>,
    pub tag: Option<TagOutcome>,
}

impl OrderReport {
    fn already_processed(order_id: u64) -> Self {
        Self {
            order_id,
            already_processed: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn tagged(&self) -> bool {
        self.tag.is_some()
    }
}

/// Runs reconciliation for every line item of `order`, one at a time, then
/// tags the order if any item was detected.
///
/// An order already carrying the marker tag is skipped. The payload's own
/// tags are checked first; the remote tags are read once, just before the
/// first detected item is reconciled, since a redelivered payload still
/// carries the tags from creation time.
///
/// # Errors
///
/// Returns the first [`ReconcileError`]. Items reconciled before the failure
/// keep their adjustments and the order is left untagged.
pub async fn process_order<C: CommerceApi + ?Sized>(
    api: &C,
    settings: &ReconcileSettings,
    order: &Order,
) -> Result<OrderReport, ReconcileError> {
    let marker = settings.order_tag.as_str();

    if has_tag(&order.tags, marker) {
        tracing::info!(order_id = order.id, "order already tagged in payload; skipping");
        return Ok(OrderReport::already_processed(order.id));
    }

    let resolver = Resolver::new(api, settings);
    let reconciler = Reconciler::new(api, settings.location_id);
    let tagger = Tagger::new(api, marker);

    let mut report = OrderReport {
        order_id: order.id,
        ..OrderReport::default()
    };

    for item in &order.line_items {
        let resolution = match resolver.resolve(item).await {
            Ok(resolution) => resolution,
            Err(e) => return Err(log_failure(order.id, &report, e)),
        };

        if resolution.is_detected() && report.detected == 0 {
            match tagger.is_tagged(order.id).await {
                Ok(true) => {
                    tracing::info!(order_id = order.id, "order already reconciled; skipping");
                    return Ok(OrderReport::already_processed(order.id));
                }
                Ok(false) => {}
                Err(e) => return Err(log_failure(order.id, &report, e)),
            }
        }

        match resolution {
            Resolution::Skipped | Resolution::NotVirtual => {}
            Resolution::MasterMissing { master_sku } => {
                report.detected += 1;
                report.skipped_master_missing.push(master_sku);
            }
            Resolution::Resolved(target) => {
                report.detected += 1;
                match reconciler.reconcile(&target).await {
                    Ok(adjustment) => report.adjustments.push(adjustment),
                    Err(e) => return Err(log_failure(order.id, &report, e)),
                }
            }
        }
    }

    report.tag = match tagger.apply(order, report.detected > 0).await {
        Ok(tag) => tag,
        Err(e) => return Err(log_failure(order.id, &report, e)),
    };

    tracing::info!(
        order_id = order.id,
        detected = report.detected,
        adjusted = report.adjustments.len(),
        master_missing = report.skipped_master_missing.len(),
        tagged = report.tagged(),
        "order processed"
    );

    Ok(report)
}

fn log_failure(order_id: u64, report: &OrderReport, error: ReconcileError) -> ReconcileError {
    if report.adjustments.is_empty() {
        tracing::error!(order_id, error = %error, "order processing failed");
    } else {
        tracing::error!(
            order_id,
            applied = report.adjustments.len(),
            error = %error,
            "order processing failed after inventory was adjusted; order left untagged, \
             a redelivery will adjust again"
        );
    }
    error
}
