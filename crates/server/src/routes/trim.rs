//! Trim API routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{Brand, CreateTrim, Generation, Model, Trim};
use crate::state::AppState;

/// Create the trim router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/trims", post(create_trim))
        .route("/api/trims/{id}", get(get_trim))
        .route("/api/trims/{id}", delete(delete_trim))
        .route("/api/generations/{generation_id}/trims", get(list_trims))
}

async fn list_trims(
    State(state): State<AppState>,
    Path(generation_id): Path<i64>,
) -> AppResult<Json<Vec<Trim>>> {
    Generation::find_by_id(state.pool(), generation_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let trims = Trim::list_by_generation(state.pool(), generation_id).await?;
    Ok(Json(trims))
}

/// A trim with its catalog ancestry spelled out.
#[derive(Serialize)]
struct TrimDetail {
    #[serde(flatten)]
    trim: Trim,
    brand: String,
    model: String,
    generation: String,
}

async fn get_trim(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<TrimDetail>> {
    let trim = Trim::find_by_id(state.pool(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    // Ancestry rows exist by FK, so missing ones are a store error.
    let generation = Generation::find_by_id(state.pool(), trim.generation_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("trim {id} has no generation"))?;
    let model = Model::find_by_id(state.pool(), generation.model_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("generation {} has no model", generation.id))?;
    let brand = Brand::find_by_id(state.pool(), model.brand_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("model {} has no brand", model.id))?;

    Ok(Json(TrimDetail {
        trim,
        brand: brand.name,
        model: model.name,
        generation: generation.code,
    }))
}

async fn create_trim(
    State(state): State<AppState>,
    Json(input): Json<CreateTrim>,
) -> AppResult<(StatusCode, Json<Trim>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest("trim name is required".to_string()));
    }
    if Generation::find_by_id(state.pool(), input.generation_id)
        .await?
        .is_none()
    {
        return Err(AppError::BadRequest("generation does not exist".to_string()));
    }

    let trim = Trim::create(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(trim)))
}

async fn delete_trim(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<StatusCode> {
    if !Trim::delete(state.pool(), id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
