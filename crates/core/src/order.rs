//! Server-side order records.
//!
//! The authoritative payment state lives with the payment provider; the
//! order record exists so webhook events have something to reconcile
//! against instead of being log-only. Orders are keyed by payment intent
//! id - the one identifier both sides of the webhook share.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::PaymentIntentId;

/// Payment lifecycle as reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Intent created; confirmation not yet reported.
    #[default]
    Pending,
    /// Provider confirmed the charge.
    Succeeded,
    /// Provider reported a failed confirmation.
    Failed,
}

/// An order awaiting (or having received) payment reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub payment_intent_id: PaymentIntentId,
    /// Random display string shown on the confirmation view.
    pub order_number: String,
    pub email: String,
    /// Charged amount in minor currency units.
    pub amount_minor: i64,
    pub currency: String,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending order for a freshly created payment intent.
    #[must_use]
    pub fn new(
        payment_intent_id: PaymentIntentId,
        order_number: String,
        email: String,
        amount_minor: i64,
        currency: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            payment_intent_id,
            order_number,
            email,
            amount_minor,
            currency,
            status: PaymentStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    /// Mark the payment as succeeded (webhook reconciliation).
    pub fn mark_succeeded(&mut self) {
        self.status = PaymentStatus::Succeeded;
        self.updated_at = Utc::now();
    }

    /// Mark the payment as failed (webhook reconciliation).
    pub fn mark_failed(&mut self) {
        self.status = PaymentStatus::Failed;
        self.updated_at = Utc::now();
    }
}
