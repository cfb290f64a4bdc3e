//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Products
//! GET  /products               - Catalog listing (?category=&collection=)
//! GET  /products/featured      - Featured rail
//! GET  /products/{id}          - Product detail
//!
//! # Cart
//! GET  /cart                   - Cart contents
//! POST /cart/add               - Add one unit of (product, size, color)
//! POST /cart/update            - Set a line's quantity (<= 0 removes)
//! POST /cart/remove            - Remove a line
//! POST /cart/toggle            - Flip the cart panel open flag
//! POST /cart/clear             - Empty the cart
//! GET  /cart/count             - Cart count badge
//!
//! # Checkout
//! POST /checkout/start          - Open the wizard (requires non-empty cart)
//! GET  /checkout                - Current wizard state + live totals
//! POST /checkout/shipping       - Submit shipping form, advance to payment
//! POST /checkout/back           - Back-transition payment -> shipping
//! POST /checkout/review         - Advance payment -> review
//! POST /checkout/payment        - Create intent for the cart total (guarded)
//! POST /checkout/payment/failed - Release the in-flight guard after failure
//! POST /checkout/complete       - Record success, clear the cart
//! GET  /orders/{payment_intent_id} - Order confirmation view
//!
//! # API
//! POST /api/create-payment-intent - Direct intent creation
//! POST /api/webhook               - Signed provider event deliveries
//! GET  /api/diagnostics           - Credential presence report
//! ```

pub mod api;
pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/featured", get(products::featured))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/toggle", post(cart::toggle))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/start", post(checkout::start))
        .route("/shipping", post(checkout::shipping))
        .route("/back", post(checkout::back))
        .route("/review", post(checkout::review))
        .route("/payment", post(checkout::payment))
        .route("/payment/failed", post(checkout::payment_failed))
        .route("/complete", post(checkout::complete))
}

/// Create the API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(api::payment_intent::create))
        .route("/webhook", post(api::webhook::receive))
        .route("/diagnostics", get(api::diagnostics::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
        // Order confirmation
        .route(
            "/orders/{payment_intent_id}",
            get(checkout::order_confirmation),
        )
        // Machine-facing API
        .nest("/api", api_routes())
}
