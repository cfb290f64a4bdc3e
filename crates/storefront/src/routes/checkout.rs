//! Checkout wizard route handlers.
//!
//! The wizard state lives in the session; every handler rehydrates it,
//! applies one transition from the core state machine, and persists the
//! result. Totals are recomputed from the live cart on every request.
//!
//! The payment submission path is the delicate one: the in-flight guard is
//! persisted BEFORE the provider call so a rapid double submit from a
//! second request sees the guard and is dropped with a 409 instead of
//! creating a second intent.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use amara_core::{
    BillingInfo, CheckoutError, CheckoutState, CheckoutStep, CheckoutTotals, Order, PaymentIntentId,
    PaymentStatus, ShippingInfo, minor_units,
};
use rust_decimal::Decimal;

use crate::error::{AppError, Result};
use crate::models::session::{load_cart, load_checkout, save_cart, save_checkout};
use crate::services::orders::generate_order_number;
use crate::state::AppState;

// =============================================================================
// Views
// =============================================================================

/// Totals rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct TotalsView {
    pub subtotal: String,
    pub shipping: String,
    pub tax: String,
    pub total: String,
}

impl From<CheckoutTotals> for TotalsView {
    fn from(totals: CheckoutTotals) -> Self {
        Self {
            subtotal: format_amount(totals.subtotal),
            shipping: format_amount(totals.shipping),
            tax: format_amount(totals.tax),
            total: format_amount(totals.total),
        }
    }
}

fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2}")
}

/// The wizard as the client sees it.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub shipping: Option<ShippingInfo>,
    pub totals: TotalsView,
    pub payment_in_flight: bool,
    pub order_placed: bool,
    /// True when the client should leave checkout for the shop: the cart
    /// emptied under a checkout that has not started paying.
    pub redirect_to_shop: bool,
}

impl CheckoutView {
    fn build(state: &CheckoutState, subtotal: Decimal, cart_is_empty: bool) -> Self {
        Self {
            step: state.step(),
            shipping: state.shipping().cloned(),
            totals: CheckoutTotals::from_subtotal(subtotal).into(),
            payment_in_flight: state.payment_in_flight(),
            order_placed: state.order_placed(),
            redirect_to_shop: state.should_redirect_to_shop(cart_is_empty),
        }
    }
}

/// Confirmation view for a placed order.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub order_number: String,
    pub payment_intent_id: String,
    pub email: String,
    pub amount: String,
    pub currency: String,
    pub status: PaymentStatus,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        // Minor units back to a display amount.
        let amount = Decimal::new(order.amount_minor, 2);
        Self {
            order_number: order.order_number,
            payment_intent_id: order.payment_intent_id.to_string(),
            email: order.email,
            amount: format_amount(amount),
            currency: order.currency,
            status: order.status,
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Shipping step submission.
#[derive(Debug, Deserialize)]
pub struct ShippingBody {
    pub shipping: ShippingInfo,
    #[serde(default)]
    pub billing: Option<BillingInfo>,
}

/// Payment completion callback from the client after the provider's widget
/// reports success.
#[derive(Debug, Deserialize)]
pub struct CompleteBody {
    pub payment_intent_id: String,
}

/// Response to a payment submission: the client confirms the intent with
/// the provider's widget using this secret.
#[derive(Debug, Serialize)]
pub struct PaymentStarted {
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
    pub payment_intent_id: String,
    pub order_number: String,
}

/// Response to a completed checkout.
#[derive(Debug, Serialize)]
pub struct CheckoutComplete {
    pub order_number: String,
    pub redirect: String,
}

// =============================================================================
// Helpers
// =============================================================================

async fn require_checkout(session: &Session) -> Result<CheckoutState> {
    load_checkout(session)
        .await
        .ok_or_else(|| AppError::NotFound("no checkout in progress".to_string()))
}

// =============================================================================
// Route Handlers
// =============================================================================

/// POST /checkout/start - open the wizard at the shipping step.
#[instrument(skip(session))]
pub async fn start(session: Session) -> Result<Json<CheckoutView>> {
    let cart = load_cart(&session).await;
    if cart.lines().is_empty() {
        return Err(CheckoutError::CartEmpty.into());
    }

    // Restarting checkout resets abandoned or completed state, but never
    // a payment in flight: the guard must not be clobbered mid-confirmation.
    // A placed order does not pin the session - the next purchase begins
    // at the shipping step with nothing carried over.
    let state = match load_checkout(&session).await {
        Some(existing) if existing.payment_in_flight() => existing,
        _ => CheckoutState::new(),
    };
    save_checkout(&session, &state).await?;

    Ok(Json(CheckoutView::build(&state, cart.total_price(), false)))
}

/// GET /checkout - current wizard state with totals from the live cart.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<Json<CheckoutView>> {
    let state = require_checkout(&session).await?;
    let cart = load_cart(&session).await;

    Ok(Json(CheckoutView::build(
        &state,
        cart.total_price(),
        cart.lines().is_empty(),
    )))
}

/// POST /checkout/shipping - submit the shipping form, advance to payment.
#[instrument(skip(session, body))]
pub async fn shipping(
    session: Session,
    Json(body): Json<ShippingBody>,
) -> Result<Json<CheckoutView>> {
    let mut state = require_checkout(&session).await?;
    state.submit_shipping(body.shipping, body.billing.unwrap_or_default())?;
    save_checkout(&session, &state).await?;

    let cart = load_cart(&session).await;
    Ok(Json(CheckoutView::build(
        &state,
        cart.total_price(),
        cart.lines().is_empty(),
    )))
}

/// POST /checkout/back - the one allowed back-transition, payment -> shipping.
#[instrument(skip(session))]
pub async fn back(session: Session) -> Result<Json<CheckoutView>> {
    let mut state = require_checkout(&session).await?;
    state.back_to_shipping()?;
    save_checkout(&session, &state).await?;

    let cart = load_cart(&session).await;
    Ok(Json(CheckoutView::build(
        &state,
        cart.total_price(),
        cart.lines().is_empty(),
    )))
}

/// POST /checkout/review - advance from payment to the review summary.
#[instrument(skip(session))]
pub async fn review(session: Session) -> Result<Json<CheckoutView>> {
    let mut state = require_checkout(&session).await?;
    state.proceed_to_review()?;
    save_checkout(&session, &state).await?;

    let cart = load_cart(&session).await;
    Ok(Json(CheckoutView::build(
        &state,
        cart.total_price(),
        cart.lines().is_empty(),
    )))
}

/// POST /checkout/payment - create a payment intent for the cart total.
///
/// Acquires the in-flight guard and persists it before the provider call;
/// the guard stays held on success (the client is now confirming with the
/// provider) and is released here only when intent creation itself fails.
#[instrument(skip(state, session))]
pub async fn payment(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<PaymentStarted>> {
    let mut checkout = require_checkout(&session).await?;
    let cart = load_cart(&session).await;
    if cart.lines().is_empty() {
        return Err(CheckoutError::CartEmpty.into());
    }

    checkout.begin_payment()?;
    save_checkout(&session, &checkout).await?;

    let totals = CheckoutTotals::from_subtotal(cart.total_price());
    let Some(amount_minor) = minor_units(totals.total) else {
        checkout.payment_failed();
        save_checkout(&session, &checkout).await?;
        return Err(AppError::Internal(format!(
            "order total {} not representable in minor units",
            totals.total
        )));
    };
    let currency = state.config().payment.currency.provider_code();

    match state
        .payments()
        .create_payment_intent(amount_minor, currency)
        .await
    {
        Ok(intent) => {
            let email = checkout
                .shipping()
                .map(|s| s.email.clone())
                .unwrap_or_default();
            let order = Order::new(
                intent.id.clone(),
                generate_order_number(),
                email,
                amount_minor,
                currency.to_string(),
            );
            let order_number = order.order_number.clone();
            state.orders().insert(order);

            Ok(Json(PaymentStarted {
                client_secret: intent.client_secret,
                payment_intent_id: intent.id.to_string(),
                order_number,
            }))
        }
        Err(e) => {
            // Release the guard so the user can resubmit. A timed-out call
            // was truly cancelled client-side; if the provider settled it
            // anyway, the webhook reconciles the order record.
            checkout.payment_failed();
            save_checkout(&session, &checkout).await?;
            Err(e.into())
        }
    }
}

/// POST /checkout/payment/failed - client reports a failed confirmation.
///
/// Releases the in-flight guard; the cart is intact and the user may retry.
#[instrument(skip(session))]
pub async fn payment_failed(session: Session) -> Result<Json<CheckoutView>> {
    let mut state = require_checkout(&session).await?;
    state.payment_failed();
    save_checkout(&session, &state).await?;

    let cart = load_cart(&session).await;
    Ok(Json(CheckoutView::build(
        &state,
        cart.total_price(),
        cart.lines().is_empty(),
    )))
}

/// POST /checkout/complete - client reports a confirmed payment.
///
/// Marks the order placed and clears the cart. The checkout state is saved
/// with `order_placed` set first, so the now-empty cart cannot trigger the
/// back-to-shop redirect while the client navigates to the confirmation.
#[instrument(skip(state, session, body))]
pub async fn complete(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<CompleteBody>,
) -> Result<Json<CheckoutComplete>> {
    let mut checkout = require_checkout(&session).await?;

    let intent_id = PaymentIntentId::new(body.payment_intent_id);
    let order = state
        .orders()
        .get(&intent_id)
        .ok_or_else(|| AppError::NotFound(format!("order for {intent_id}")))?;

    checkout.payment_succeeded();
    save_checkout(&session, &checkout).await?;

    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;

    tracing::info!(order_number = %order.order_number, "Checkout completed");
    Ok(Json(CheckoutComplete {
        order_number: order.order_number,
        redirect: format!("/order-confirmation?payment_intent={intent_id}"),
    }))
}

/// GET /orders/{payment_intent_id} - confirmation view for a placed order.
#[instrument(skip(state))]
pub async fn order_confirmation(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Result<Json<OrderView>> {
    let intent_id = PaymentIntentId::new(payment_intent_id);
    state
        .orders()
        .get(&intent_id)
        .map(|order| Json(OrderView::from(order)))
        .ok_or_else(|| AppError::NotFound(format!("order for {intent_id}")))
}
