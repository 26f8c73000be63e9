//! HTTP resource layer for `/api/orders`.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use emporium_core::{Collection, OrderDto, OrderId};
use emporium_runtime::error::{Extracted, Result};

use crate::state::AppState;

/// Order routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/orders", get(list).post(create).put(update))
        .route(
            "/api/orders/{id}",
            get(fetch).put(update_by_id).delete(remove),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Collection<OrderDto>>> {
    Ok(Json(Collection::new(state.orders().find_all().await?)))
}

async fn fetch(
    State(state): State<AppState>,
    id: Extracted<Path<OrderId>, PathRejection>,
) -> Result<Json<OrderDto>> {
    let Path(id) = id?;
    Ok(Json(state.orders().find_by_id(id).await?))
}

async fn create(
    State(state): State<AppState>,
    body: Extracted<Json<OrderDto>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderDto>)> {
    let Json(dto) = body?;
    let created = state.orders().save(dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    body: Extracted<Json<OrderDto>, JsonRejection>,
) -> Result<Json<OrderDto>> {
    let Json(dto) = body?;
    Ok(Json(state.orders().update(dto).await?))
}

async fn update_by_id(
    State(state): State<AppState>,
    id: Extracted<Path<OrderId>, PathRejection>,
    body: Extracted<Json<OrderDto>, JsonRejection>,
) -> Result<Json<OrderDto>> {
    let Path(id) = id?;
    let Json(dto) = body?;
    Ok(Json(state.orders().update_by_id(id, dto).await?))
}

async fn remove(
    State(state): State<AppState>,
    id: Extracted<Path<OrderId>, PathRejection>,
) -> Result<Json<bool>> {
    let Path(id) = id?;
    state.orders().delete_by_id(id).await?;
    Ok(Json(true))
}
