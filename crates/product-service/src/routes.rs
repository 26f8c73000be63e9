//! HTTP resource layer for `/api/products`.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};
use emporium_core::{Collection, ProductDto, ProductId};
use emporium_runtime::error::{Extracted, Result};
use serde::Deserialize;

use crate::state::AppState;

/// Product routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list).post(create).put(update))
        .route(
            "/api/products/{id}",
            get(fetch).put(update_by_id).delete(remove),
        )
}

/// `GET /api/products?sku=...`
#[derive(Debug, Default, Deserialize)]
struct ListFilter {
    sku: Option<String>,
}

async fn list(
    State(state): State<AppState>,
    filter: Extracted<Query<ListFilter>, QueryRejection>,
) -> Result<Json<Collection<ProductDto>>> {
    let Query(filter) = filter?;
    let products = match filter.sku.as_deref().map(str::trim) {
        Some(sku) if !sku.is_empty() => state.products().find_by_sku(sku).await?,
        _ => state.products().find_all().await?,
    };
    Ok(Json(Collection::new(products)))
}

async fn fetch(
    State(state): State<AppState>,
    id: Extracted<Path<ProductId>, PathRejection>,
) -> Result<Json<ProductDto>> {
    let Path(id) = id?;
    Ok(Json(state.products().find_by_id(id).await?))
}

async fn create(
    State(state): State<AppState>,
    body: Extracted<Json<ProductDto>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductDto>)> {
    let Json(dto) = body?;
    let created = state.products().save(dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    body: Extracted<Json<ProductDto>, JsonRejection>,
) -> Result<Json<ProductDto>> {
    let Json(dto) = body?;
    Ok(Json(state.products().update(dto).await?))
}

async fn update_by_id(
    State(state): State<AppState>,
    id: Extracted<Path<ProductId>, PathRejection>,
    body: Extracted<Json<ProductDto>, JsonRejection>,
) -> Result<Json<ProductDto>> {
    let Path(id) = id?;
    let Json(dto) = body?;
    Ok(Json(state.products().update_by_id(id, dto).await?))
}

async fn remove(
    State(state): State<AppState>,
    id: Extracted<Path<ProductId>, PathRejection>,
) -> Result<Json<bool>> {
    let Path(id) = id?;
    state.products().delete_by_id(id).await?;
    Ok(Json(true))
}
