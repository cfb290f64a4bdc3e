//! Webhook receiver for payment provider events.
//!
//! This route takes the raw body bytes: the signature covers the exact
//! byte stream the provider sent, so no JSON extractor may run first.
//! Verification failures are a 400; verified events are always
//! acknowledged, even when they reference an intent this instance never
//! created (another instance, or a replay after restart).

use axum::{Json, body::Bytes, extract::State, http::HeaderMap, http::StatusCode};
use chrono::Utc;
use secrecy::ExposeSecret;
use serde_json::{Value, json};
use tracing::instrument;

use amara_core::PaymentIntentId;

use crate::services::webhook::{EventKind, SIGNATURE_HEADER, WebhookEvent, verify_signature};
use crate::state::AppState;

/// POST /api/webhook
#[instrument(skip_all)]
pub async fn receive(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let Some(signature) = headers.get(SIGNATURE_HEADER).and_then(|v| v.to_str().ok()) else {
        tracing::warn!("Webhook delivery missing signature header");
        return bad_request("missing signature header");
    };

    let secret = state.config().payment.webhook_secret.expose_secret();
    if let Err(e) = verify_signature(secret, signature, &body, Utc::now().timestamp()) {
        tracing::warn!(error = %e, "Webhook signature verification failed");
        return bad_request("invalid signature");
    }

    let event: WebhookEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!(error = %e, "Webhook body failed to parse");
            return bad_request("invalid payload");
        }
    };

    let intent_id = PaymentIntentId::new(&event.data.object.id);
    match event.kind() {
        EventKind::PaymentSucceeded => {
            if state.orders().mark_succeeded(&intent_id) {
                tracing::info!(intent_id = %intent_id, "Payment succeeded");
            } else {
                tracing::warn!(intent_id = %intent_id, "Succeeded event for unknown intent");
            }
        }
        EventKind::PaymentFailed => {
            if state.orders().mark_failed(&intent_id) {
                tracing::info!(intent_id = %intent_id, "Payment failed");
            } else {
                tracing::warn!(intent_id = %intent_id, "Failed event for unknown intent");
            }
        }
        EventKind::PaymentMethodAttached => {
            tracing::info!(intent_id = %intent_id, "Payment method attached");
        }
        EventKind::Other => {
            tracing::debug!(event_type = %event.event_type, "Unhandled webhook event type");
        }
    }

    (StatusCode::OK, Json(json!({ "received": true })))
}

fn bad_request(message: &str) -> (StatusCode, Json<Value>) {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message })))
}
