//! Product catalog route handlers.
//!
//! Read-only JSON views over the static catalog. Presentation (cards,
//! the animated entry sequence) is a separate client; this service only
//! serves the data.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use tracing::instrument;

use amara_core::{Product, ProductId};

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Catalog listing filters; all optional and combinable.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub collection: Option<String>,
}

/// GET /products - catalog listing with optional filters.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Product>> {
    let products = state
        .catalog()
        .all()
        .iter()
        .filter(|p| {
            params
                .category
                .as_ref()
                .is_none_or(|category| p.category == *category)
        })
        .filter(|p| {
            params
                .collection
                .as_ref()
                .is_none_or(|collection| p.collection == *collection)
        })
        .cloned()
        .collect();

    Json(products)
}

/// GET /products/featured - the featured rail.
#[instrument(skip(state))]
pub async fn featured(State(state): State<AppState>) -> Json<Vec<Product>> {
    Json(state.catalog().featured().into_iter().cloned().collect())
}

/// GET /products/{id} - product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Product>> {
    let id = ProductId::new(id);
    state
        .catalog()
        .by_id(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}
