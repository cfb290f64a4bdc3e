//! Service layer: external collaborators and injectable stores.
//!
//! - [`payments`] - Payment provider HTTP client (intent creation)
//! - [`webhook`] - Webhook signature verification and event parsing
//! - [`orders`] - Injectable order store reconciled by the webhook

pub mod orders;
pub mod payments;
pub mod webhook;
