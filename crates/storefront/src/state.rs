//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::StorefrontConfig;
use crate::services::orders::{InMemoryOrderStore, OrderStore};
use crate::services::payments::{PaymentClient, PaymentError};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog, payment client, and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Catalog,
    payments: PaymentClient,
    orders: Arc<dyn OrderStore>,
}

impl AppState {
    /// Create application state with the default in-memory order store.
    ///
    /// # Errors
    ///
    /// Returns an error if the payment client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, PaymentError> {
        Self::with_order_store(config, Arc::new(InMemoryOrderStore::new()))
    }

    /// Create application state with an injected order store (test doubles).
    ///
    /// # Errors
    ///
    /// Returns an error if the payment client cannot be built.
    pub fn with_order_store(
        config: StorefrontConfig,
        orders: Arc<dyn OrderStore>,
    ) -> Result<Self, PaymentError> {
        let payments = PaymentClient::new(&config.payment)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                catalog: Catalog::load(),
                config,
                payments,
                orders,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.inner.catalog
    }

    /// Get a reference to the payment provider client.
    #[must_use]
    pub fn payments(&self) -> &PaymentClient {
        &self.inner.payments
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &Arc<dyn OrderStore> {
        &self.inner.orders
    }
}
