//! Injectable order store.
//!
//! The store is a trait so handlers and tests can share doubles; the
//! default implementation is an in-process map. There is no database in
//! this system - the provider holds the authoritative payment state and
//! this store only mirrors it for the confirmation view and webhook
//! reconciliation.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use amara_core::{Order, PaymentIntentId};

/// Storage for orders keyed by payment intent id.
pub trait OrderStore: Send + Sync {
    /// Insert a freshly created (pending) order.
    fn insert(&self, order: Order);

    /// Fetch an order by payment intent id.
    fn get(&self, intent_id: &PaymentIntentId) -> Option<Order>;

    /// Mark the order's payment succeeded. Returns false if unknown.
    fn mark_succeeded(&self, intent_id: &PaymentIntentId) -> bool;

    /// Mark the order's payment failed. Returns false if unknown.
    fn mark_failed(&self, intent_id: &PaymentIntentId) -> bool;
}

/// In-memory order store.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<PaymentIntentId, Order>>,
}

impl InMemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, order: Order) {
        self.orders
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(order.payment_intent_id.clone(), order);
    }

    fn get(&self, intent_id: &PaymentIntentId) -> Option<Order> {
        self.orders
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(intent_id)
            .cloned()
    }

    fn mark_succeeded(&self, intent_id: &PaymentIntentId) -> bool {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        orders.get_mut(intent_id).is_some_and(|order| {
            order.mark_succeeded();
            true
        })
    }

    fn mark_failed(&self, intent_id: &PaymentIntentId) -> bool {
        let mut orders = self.orders.write().unwrap_or_else(PoisonError::into_inner);
        orders.get_mut(intent_id).is_some_and(|order| {
            order.mark_failed();
            true
        })
    }
}

/// Generate a display order number, e.g. "AMA-7F3A21C9".
///
/// Purely presentational - the payment intent id is the real key.
#[must_use]
pub fn generate_order_number() -> String {
    format!("AMA-{:08X}", rand::random::<u32>())
}
