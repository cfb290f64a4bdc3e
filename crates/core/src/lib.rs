//! Amara Core - Shared domain library.
//!
//! This crate provides the domain model used across all Amara Atelier
//! components:
//! - `storefront` - Public-facing storefront service
//!
//! # Architecture
//!
//! The core crate contains only types and domain logic - no I/O, no HTTP
//! clients, no session handling. This keeps it lightweight and allows the
//! cart and checkout invariants to be tested in isolation.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs and prices
//! - [`product`] - Immutable catalog product records
//! - [`cart`] - The cart store: line items keyed by (product, size, color)
//! - [`checkout`] - The three-step checkout wizard and derived totals
//! - [`order`] - Server-side order records keyed by payment intent

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod order;
pub mod product;
pub mod types;

pub use cart::{Cart, CartLine};
pub use checkout::{
    BillingInfo, CheckoutError, CheckoutState, CheckoutStep, CheckoutTotals, ShippingInfo,
};
pub use order::{Order, PaymentStatus};
pub use product::Product;
pub use types::*;
