//! Payment provider API client.
//!
//! A thin client over the provider's REST API: the storefront only ever
//! creates payment intents; card collection and confirmation happen in the
//! provider's hosted widget, and results come back via the webhook.

use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use amara_core::PaymentIntentId;

use crate::config::PaymentConfig;

/// Upper bound on a confirmation round trip. The timeout is a true
/// cancellation: when the client gives up, the request future is aborted,
/// not merely abandoned. The provider may still settle the charge
/// server-side, which the webhook reconciles.
pub const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Errors from payment provider calls.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The provider did not answer within [`CONFIRMATION_TIMEOUT`].
    #[error("payment request timed out")]
    Timeout,

    /// Transport-level failure.
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider rejected the request (declined card, bad amount, ...).
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider's response could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A created payment intent, as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: PaymentIntentId,
    /// Opaque token authorizing the client to confirm this intent.
    pub client_secret: String,
    pub status: String,
}

/// Provider error envelope: `{"error": {"message": "..."}}`.
#[derive(Debug, Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderErrorDetail {
    message: String,
}

/// Client for the payment provider API.
#[derive(Clone)]
pub struct PaymentClient {
    inner: Arc<PaymentClientInner>,
}

struct PaymentClientInner {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

impl PaymentClient {
    /// Create a new payment client.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &PaymentConfig) -> Result<Self, PaymentError> {
        let client = reqwest::Client::builder()
            .timeout(CONFIRMATION_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(PaymentClientInner {
                client,
                api_base: config.api_base.trim_end_matches('/').to_string(),
                secret_key: config.secret_key.expose_secret().to_string(),
            }),
        })
    }

    /// Create a payment intent for the given amount in minor units.
    ///
    /// No business validation beyond what the provider itself enforces -
    /// amount bounds and currency support are its concern.
    ///
    /// # Errors
    ///
    /// Returns `PaymentError::Timeout` if the provider does not answer in
    /// time, `Provider` for a rejected request, `Request`/`Parse` for
    /// transport or decoding failures.
    #[instrument(skip(self), fields(amount = amount_minor, currency = %currency))]
    pub async fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: &str,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.inner.api_base);
        let params = [
            ("amount", amount_minor.to_string()),
            ("currency", currency.to_string()),
            ("automatic_payment_methods[enabled]", "true".to_string()),
        ];

        let response = self
            .inner
            .client
            .post(&url)
            .bearer_auth(&self.inner.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PaymentError::Timeout
                } else {
                    PaymentError::Request(e)
                }
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ProviderErrorBody>(&body).map_or_else(
                |_| format!("HTTP {status}"),
                |parsed| parsed.error.message,
            );
            tracing::warn!(status = %status, "Payment intent creation rejected");
            return Err(PaymentError::Provider(message));
        }

        let intent: PaymentIntent = serde_json::from_str(&body)?;
        tracing::info!(intent_id = %intent.id, "Payment intent created");
        Ok(intent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_deserializes_provider_shape() {
        let body = r#"{
            "id": "pi_3abc",
            "client_secret": "pi_3abc_secret_xyz",
            "status": "requires_payment_method",
            "amount": 21300,
            "currency": "usd"
        }"#;
        let intent: PaymentIntent = serde_json::from_str(body).expect("deserialize");
        assert_eq!(intent.id, PaymentIntentId::new("pi_3abc"));
        assert_eq!(intent.client_secret, "pi_3abc_secret_xyz");
        assert_eq!(intent.status, "requires_payment_method");
    }

    #[test]
    fn test_provider_error_envelope() {
        let body = r#"{"error": {"message": "Amount must be at least 50 cents", "type": "invalid_request_error"}}"#;
        let parsed: ProviderErrorBody = serde_json::from_str(body).expect("deserialize");
        assert_eq!(parsed.error.message, "Amount must be at least 50 cents");
    }
}
