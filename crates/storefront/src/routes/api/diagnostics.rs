//! Credential presence diagnostics.
//!
//! Answers "is the right key loaded in this environment" without leaking
//! the key: each credential is reported as present/absent plus a short
//! prefix, enough to tell a test key from a live one.

use axum::{Json, extract::State};
use secrecy::ExposeSecret;
use serde::Serialize;
use tracing::instrument;

use crate::state::AppState;

const PREFIX_LEN: usize = 7;

/// One credential's presence report.
#[derive(Debug, Serialize)]
pub struct KeyStatus {
    pub present: bool,
    /// First characters only, e.g. "sk_test…". Never the full value.
    pub prefix: Option<String>,
}

impl KeyStatus {
    fn of(value: &str) -> Self {
        if value.is_empty() {
            return Self {
                present: false,
                prefix: None,
            };
        }
        Self {
            present: true,
            prefix: Some(format!(
                "{}…",
                value.chars().take(PREFIX_LEN).collect::<String>()
            )),
        }
    }
}

/// Diagnostics payload.
#[derive(Debug, Serialize)]
pub struct Diagnostics {
    pub publishable_key: KeyStatus,
    pub secret_key: KeyStatus,
    pub webhook_secret: KeyStatus,
    pub currency: &'static str,
}

/// GET /api/diagnostics
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>) -> Json<Diagnostics> {
    let payment = &state.config().payment;
    Json(Diagnostics {
        publishable_key: KeyStatus::of(&payment.publishable_key),
        secret_key: KeyStatus::of(payment.secret_key.expose_secret()),
        webhook_secret: KeyStatus::of(payment.webhook_secret.expose_secret()),
        currency: payment.currency.provider_code(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_never_exposes_full_key() {
        let status = KeyStatus::of("sk_test_4eC39HqLyjWDarjtT1zdp7dc");
        assert!(status.present);
        assert_eq!(status.prefix.as_deref(), Some("sk_test…"));
    }

    #[test]
    fn test_missing_key_reported_absent() {
        let status = KeyStatus::of("");
        assert!(!status.present);
        assert!(status.prefix.is_none());
    }

    #[test]
    fn test_short_key_prefix_is_whole_value() {
        let status = KeyStatus::of("abc");
        assert_eq!(status.prefix.as_deref(), Some("abc…"));
    }
}
