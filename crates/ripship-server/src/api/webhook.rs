use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, State},
    http::{HeaderMap, StatusCode},
    Extension, Json,
};
use ripship_core::Order;
use ripship_reconcile::{process_order, OrderReport};
use serde::Serialize;

use crate::middleware::RequestId;
use crate::signature::{verify_signature, SIGNATURE_HEADER};

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

const TOPIC_HEADER: &str = "x-shopify-topic";
const ORDERS_CREATE: &str = "orders/create";

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub(super) enum WebhookStatus {
    Processed,
    AlreadyProcessed,
    Ignored,
}

#[derive(Debug, Serialize)]
pub(super) struct WebhookAck {
    status: WebhookStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_id: Option<u64>,
    detected: usize,
    adjusted_items: usize,
    tagged: bool,
}

impl WebhookAck {
    fn ignored() -> Self {
        Self {
            status: WebhookStatus::Ignored,
            order_id: None,
            detected: 0,
            adjusted_items: 0,
            tagged: false,
        }
    }

    fn from_report(report: &OrderReport) -> Self {
        Self {
            status: if report.already_processed {
                WebhookStatus::AlreadyProcessed
            } else {
                WebhookStatus::Processed
            },
            order_id: Some(report.order_id),
            detected: report.detected,
            adjusted_items: report.adjustments.len(),
            tagged: report.tagged(),
        }
    }
}

/// `POST /webhooks/orders/create`: verify, decode, reconcile, tag.
pub(super) async fn orders_create(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<ApiResponse<WebhookAck>>, ApiError> {
    let body = body.map_err(|rejection| {
        tracing::warn!(error = %rejection, "webhook body rejected");
        let code = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            "payload_too_large"
        } else {
            "internal_error"
        };
        ApiError::new(req_id.0.clone(), code, rejection.body_text())
    })?;

    if !verify_signature(&body, headers.get(SIGNATURE_HEADER), &state.webhook_secret) {
        tracing::warn!(request_id = %req_id.0, "webhook signature verification failed");
        return Err(ApiError::new(
            req_id.0,
            "unauthorized",
            "missing or invalid webhook signature",
        ));
    }

    if let Some(topic) = headers.get(TOPIC_HEADER) {
        let topic = topic.to_str().unwrap_or_default();
        if topic != ORDERS_CREATE {
            tracing::info!(topic, "ignoring webhook for unexpected topic");
            return Ok(Json(ApiResponse {
                data: WebhookAck::ignored(),
                meta: ResponseMeta::new(req_id.0),
            }));
        }
    }

    let order: Order = serde_json::from_slice(&body).map_err(|e| {
        tracing::error!(error = %e, "webhook payload is not a valid order");
        ApiError::new(req_id.0.clone(), "decode_error", "invalid order payload")
    })?;

    tracing::info!(
        order_id = order.id,
        line_items = order.line_items.len(),
        "order webhook received"
    );

    let report = process_order(state.api.as_ref(), &state.settings, &order)
        .await
        .map_err(|e| {
            tracing::error!(
                order_id = order.id,
                stage = %e.stage(),
                error = %e,
                "reconciliation failed"
            );
            ApiError::new(req_id.0.clone(), "internal_error", "reconciliation failed")
        })?;

    Ok(Json(ApiResponse {
        data: WebhookAck::from_report(&report),
        meta: ResponseMeta::new(req_id.0),
    }))
}

#[cfg(test)]
#[path = "webhook_test.rs"]
mod tests;
