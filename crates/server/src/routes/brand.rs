//! Brand API routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::error::{AppError, AppResult};
use crate::models::{Brand, CreateBrand, UpdateBrand};
use crate::state::AppState;

/// Create the brand router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/brands", get(list_brands))
        .route("/api/brands", post(create_brand))
        .route("/api/brands/{id}", get(get_brand))
        .route("/api/brands/{id}", put(update_brand))
        .route("/api/brands/{id}", delete(delete_brand))
}

async fn list_brands(State(state): State<AppState>) -> AppResult<Json<Vec<Brand>>> {
    let brands = Brand::list(state.pool()).await?;
    Ok(Json(brands))
}

async fn get_brand(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Brand>> {
    let brand = Brand::find_by_id(state.pool(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(brand))
}

async fn create_brand(
    State(state): State<AppState>,
    Json(input): Json<CreateBrand>,
) -> AppResult<(StatusCode, Json<Brand>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("brand name is required".to_string()));
    }
    if Brand::find_by_name(state.pool(), &input.name).await?.is_some() {
        return Err(AppError::BadRequest("brand already exists".to_string()));
    }

    let brand = Brand::create(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(brand)))
}

async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateBrand>,
) -> AppResult<Json<Brand>> {
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("brand name cannot be blank".to_string()));
        }
    }

    let brand = Brand::update(state.pool(), id, input)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(brand))
}

async fn delete_brand(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !Brand::delete(state.pool(), id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
