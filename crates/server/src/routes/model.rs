//! Model API routes, including per-brand model listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::error::{AppError, AppResult};
use crate::models::{Brand, CreateModel, Model, UpdateModel};
use crate::state::AppState;

/// Create the model router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/models", post(create_model))
        .route("/api/models/{id}", get(get_model))
        .route("/api/models/{id}", put(update_model))
        .route("/api/models/{id}", delete(delete_model))
        .route("/api/brands/{brand_id}/models", get(list_models))
}

async fn list_models(
    State(state): State<AppState>,
    Path(brand_id): Path<i64>,
) -> AppResult<Json<Vec<Model>>> {
    Brand::find_by_id(state.pool(), brand_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let models = Model::list_by_brand(state.pool(), brand_id).await?;
    Ok(Json(models))
}

async fn get_model(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<Model>> {
    let model = Model::find_by_id(state.pool(), id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(model))
}

async fn create_model(
    State(state): State<AppState>,
    Json(input): Json<CreateModel>,
) -> AppResult<(StatusCode, Json<Model>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("model name is required".to_string()));
    }
    if Brand::find_by_id(state.pool(), input.brand_id).await?.is_none() {
        return Err(AppError::BadRequest("brand does not exist".to_string()));
    }

    let model = Model::create(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(model)))
}

async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(input): Json<UpdateModel>,
) -> AppResult<Json<Model>> {
    if let Some(ref name) = input.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest("model name cannot be blank".to_string()));
        }
    }

    let model = Model::update(state.pool(), id, input)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(model))
}

async fn delete_model(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !Model::delete(state.pool(), id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
