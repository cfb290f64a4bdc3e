//! Cart route handlers.
//!
//! Every mutation follows the same load -> mutate -> persist shape: the
//! cart is rehydrated from the session, changed in memory, and written
//! back before the response renders the new state.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use amara_core::{Cart, CartLine, Product, ProductId};

use crate::error::{AppError, Result};
use crate::models::session::{load_cart, save_cart};
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub name: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Cart display data.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub item_count: u32,
    pub is_open: bool,
}

fn format_amount(amount: Decimal) -> String {
    format!("${amount:.2}")
}

impl From<&CartLine> for CartLineView {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id.to_string(),
            name: line.name.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.display(),
            line_total: format_amount(line.line_total()),
        }
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.lines().iter().map(CartLineView::from).collect(),
            subtotal: format_amount(cart.total_price()),
            item_count: cart.total_items(),
            is_open: cart.is_open(),
        }
    }
}

// =============================================================================
// Request Bodies
// =============================================================================

/// Add to cart request.
#[derive(Debug, Deserialize)]
pub struct AddToCartBody {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

/// Update quantity request. A quantity <= 0 removes the line.
#[derive(Debug, Deserialize)]
pub struct UpdateCartBody {
    pub product_id: String,
    pub size: String,
    pub color: String,
    pub quantity: i64,
}

/// Remove from cart request.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartBody {
    pub product_id: String,
    pub size: String,
    pub color: String,
}

/// Cart badge payload.
#[derive(Debug, serde::Serialize)]
pub struct CartCount {
    pub count: u32,
}

// =============================================================================
// Validation
// =============================================================================

/// Resolve and validate the selection against the catalog.
///
/// The cart itself does not enforce size/color membership; the route layer
/// does, so a raw POST cannot inject a selection the product never offered.
fn resolve_selection<'a>(
    state: &'a AppState,
    product_id: &str,
    size: &str,
    color: &str,
) -> Result<&'a Product> {
    let id = ProductId::new(product_id);
    let product = state
        .catalog()
        .by_id(&id)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    if !product.in_stock {
        return Err(AppError::BadRequest(format!("{id} is out of stock")));
    }
    if !product.has_size(size) {
        return Err(AppError::BadRequest(format!(
            "size {size} not offered for {id}"
        )));
    }
    if !product.has_color(color) {
        return Err(AppError::BadRequest(format!(
            "color {color} not offered for {id}"
        )));
    }
    Ok(product)
}

// =============================================================================
// Route Handlers
// =============================================================================

/// GET /cart - current cart contents.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Json<CartView> {
    let cart = load_cart(&session).await;
    Json(CartView::from(&cart))
}

/// POST /cart/add - add one unit of a (product, size, color) selection.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartBody>,
) -> Result<Json<CartView>> {
    let product = resolve_selection(&state, &body.product_id, &body.size, &body.color)?;

    let mut cart = load_cart(&session).await;
    cart.add_item(product, &body.size, &body.color);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// POST /cart/update - set a line's quantity (<= 0 removes it).
#[instrument(skip(session))]
pub async fn update(
    session: Session,
    Json(body): Json<UpdateCartBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.update_quantity(
        &ProductId::new(body.product_id),
        &body.size,
        &body.color,
        body.quantity,
    );
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// POST /cart/remove - remove a line; no-op if absent.
#[instrument(skip(session))]
pub async fn remove(
    session: Session,
    Json(body): Json<RemoveFromCartBody>,
) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.remove_item(&ProductId::new(body.product_id), &body.size, &body.color);
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// POST /cart/toggle - flip the cart panel open flag.
#[instrument(skip(session))]
pub async fn toggle(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.toggle_open();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// POST /cart/clear - empty the cart (open flag untouched).
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    let mut cart = load_cart(&session).await;
    cart.clear();
    save_cart(&session, &cart).await?;

    Ok(Json(CartView::from(&cart)))
}

/// GET /cart/count - badge count (sum of quantities, not lines).
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = load_cart(&session).await;
    Json(CartCount {
        count: cart.total_items(),
    })
}
