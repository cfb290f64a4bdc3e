//! Machine-facing API routes.
//!
//! - [`payment_intent`] - direct payment intent creation
//! - [`webhook`] - signed event deliveries from the payment provider
//! - [`diagnostics`] - credential presence report (never full values)

pub mod diagnostics;
pub mod payment_intent;
pub mod webhook;
