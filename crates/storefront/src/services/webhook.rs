//! Webhook signature verification and event parsing.
//!
//! The provider signs each delivery with a header of the form
//! `t=<unix ts>,v1=<hex hmac>` where the MAC is HMAC-SHA256 over
//! `"{t}.{raw body}"`. Verification needs the unparsed byte stream, so the
//! webhook route must not run the body through a JSON extractor first.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the delivery signature.
pub const SIGNATURE_HEADER: &str = "Webhook-Signature";

/// Maximum accepted clock skew between the signed timestamp and now.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

/// Signature verification failures. All map to a 400 for the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SignatureError {
    #[error("malformed signature header")]
    MalformedHeader,

    #[error("signed timestamp outside tolerance")]
    TimestampOutOfTolerance,

    #[error("signature mismatch")]
    InvalidSignature,
}

/// Event types the storefront reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PaymentSucceeded,
    PaymentFailed,
    PaymentMethodAttached,
    Other,
}

/// A parsed webhook event.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: EventData,
}

#[derive(Debug, Deserialize)]
pub struct EventData {
    pub object: EventObject,
}

/// The object the event concerns; for payment events, the intent.
#[derive(Debug, Deserialize)]
pub struct EventObject {
    pub id: String,
}

impl WebhookEvent {
    /// Classify the event type string.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self.event_type.as_str() {
            "payment_intent.succeeded" => EventKind::PaymentSucceeded,
            "payment_intent.payment_failed" => EventKind::PaymentFailed,
            "payment_method.attached" => EventKind::PaymentMethodAttached,
            _ => EventKind::Other,
        }
    }
}

/// Verify a delivery signature against the shared signing secret.
///
/// `now` is the current unix timestamp, passed in so verification is
/// deterministic under test.
///
/// # Errors
///
/// Returns a `SignatureError` for a malformed header, a stale timestamp,
/// or a MAC mismatch.
pub fn verify_signature(
    secret: &str,
    header: &str,
    body: &[u8],
    now: i64,
) -> Result<(), SignatureError> {
    let (timestamp, signatures) = parse_signature_header(header)?;

    if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        return Err(SignatureError::TimestampOutOfTolerance);
    }

    let mut signed_payload = Vec::with_capacity(body.len() + 16);
    signed_payload.extend_from_slice(timestamp.to_string().as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(body);

    for signature in &signatures {
        let Ok(expected) = hex::decode(signature) else {
            continue;
        };
        let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
            return Err(SignatureError::InvalidSignature);
        };
        mac.update(&signed_payload);
        // verify_slice is constant-time
        if mac.verify_slice(&expected).is_ok() {
            return Ok(());
        }
    }

    Err(SignatureError::InvalidSignature)
}

/// Split `t=<ts>,v1=<hex>[,v1=<hex>...]` into timestamp and candidate MACs.
fn parse_signature_header(header: &str) -> Result<(i64, Vec<&str>), SignatureError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = value.parse::<i64>().ok();
            }
            Some(("v1", value)) => signatures.push(value),
            _ => {}
        }
    }

    match (timestamp, signatures.is_empty()) {
        (Some(timestamp), false) => Ok((timestamp, signatures)),
        _ => Err(SignatureError::MalformedHeader),
    }
}

/// Compute a valid signature header for a payload.
///
/// Used by tests and local delivery tooling; the inverse of
/// [`verify_signature`].
#[must_use]
pub fn sign_payload(secret: &str, timestamp: i64, body: &[u8]) -> String {
    let mut signed_payload = Vec::with_capacity(body.len() + 16);
    signed_payload.extend_from_slice(timestamp.to_string().as_bytes());
    signed_payload.push(b'.');
    signed_payload.extend_from_slice(body);

    // A MAC key of any length is accepted; new_from_slice cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(&signed_payload);
    let signature = hex::encode(mac.finalize().into_bytes());

    format!("t={timestamp},v1={signature}")
}
