//! HTTP resource layer for `/api/users`.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};
use emporium_core::{Collection, UserDto, UserId};
use emporium_runtime::error::{Extracted, Result};

use crate::state::AppState;

/// User routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list).post(create).put(update))
        .route(
            "/api/users/{id}",
            get(fetch).put(update_by_id).delete(remove),
        )
}

async fn list(State(state): State<AppState>) -> Result<Json<Collection<UserDto>>> {
    let users = state.users().find_all().await?;
    Ok(Json(Collection::new(users)))
}

async fn fetch(
    State(state): State<AppState>,
    id: Extracted<Path<UserId>, PathRejection>,
) -> Result<Json<UserDto>> {
    let Path(id) = id?;
    Ok(Json(state.users().find_by_id(id).await?))
}

async fn create(
    State(state): State<AppState>,
    body: Extracted<Json<UserDto>, JsonRejection>,
) -> Result<(StatusCode, Json<UserDto>)> {
    let Json(dto) = body?;
    let created = state.users().save(dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    State(state): State<AppState>,
    body: Extracted<Json<UserDto>, JsonRejection>,
) -> Result<Json<UserDto>> {
    let Json(dto) = body?;
    Ok(Json(state.users().update(dto).await?))
}

async fn update_by_id(
    State(state): State<AppState>,
    id: Extracted<Path<UserId>, PathRejection>,
    body: Extracted<Json<UserDto>, JsonRejection>,
) -> Result<Json<UserDto>> {
    let Path(id) = id?;
    let Json(dto) = body?;
    Ok(Json(state.users().update_by_id(id, dto).await?))
}

async fn remove(
    State(state): State<AppState>,
    id: Extracted<Path<UserId>, PathRejection>,
) -> Result<Json<bool>> {
    let Path(id) = id?;
    state.users().delete_by_id(id).await?;
    Ok(Json(true))
}
