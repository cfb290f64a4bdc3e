//! Direct payment intent creation.
//!
//! A thin passthrough for clients that drive the provider's widget
//! themselves: the caller supplies the amount in minor units and gets back
//! the client secret. The checkout flow has its own submission path that
//! computes the amount server-side; this endpoint does not touch the
//! session or the in-flight guard.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Intent creation request. Amount is in minor currency units.
#[derive(Debug, Deserialize)]
pub struct CreateIntentBody {
    pub amount: i64,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Intent creation response.
#[derive(Debug, Serialize)]
pub struct CreateIntentResponse {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

/// POST /api/create-payment-intent
#[instrument(skip(state, body), fields(amount = body.amount))]
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateIntentBody>,
) -> Result<Json<CreateIntentResponse>> {
    if body.amount <= 0 {
        return Err(AppError::BadRequest(
            "amount must be a positive number of minor units".to_string(),
        ));
    }

    let configured = state.config().payment.currency.provider_code();
    let currency = body.currency.as_deref().unwrap_or(configured);
    if currency.trim().is_empty() {
        return Err(AppError::BadRequest("currency must not be empty".to_string()));
    }

    let intent = state
        .payments()
        .create_payment_intent(body.amount, currency)
        .await?;

    Ok(Json(CreateIntentResponse {
        client_secret: intent.client_secret,
    }))
}
