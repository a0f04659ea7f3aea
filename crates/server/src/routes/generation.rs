//! Generation API routes.
//!
//! The detail endpoint composes the generation with its trims and the
//! engine options extracted from their names.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{delete, get, post};
use axum::Router;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::models::{CreateGeneration, Generation, Model, Trim};
use crate::search::extract_engine_options;
use crate::state::AppState;

/// Create the generation router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/generations", post(create_generation))
        .route("/api/generations/{id}", get(get_generation))
        .route("/api/generations/{id}", delete(delete_generation))
        .route("/api/models/{model_id}/generations", get(list_generations))
}

/// A generation with its trims and derived engine options.
#[derive(Serialize)]
struct GenerationDetail {
    #[serde(flatten)]
    generation: Generation,
    trims: Vec<Trim>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    engine_options: Vec<String>,
}

async fn list_generations(
    State(state): State<AppState>,
    Path(model_id): Path<i64>,
) -> AppResult<Json<Vec<Generation>>> {
    Model::find_by_id(state.pool(), model_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let generations = Generation::list_by_model(state.pool(), model_id).await?;
    Ok(Json(generations))
}

async fn get_generation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<GenerationDetail>> {
    let generation = Generation::find_by_id(state.pool(), id)
        .await?
        .ok_or(AppError::NotFound)?;

    let trims = Trim::list_by_generation(state.pool(), id).await?;
    let trim_names: Vec<String> = trims.iter().map(|trim| trim.name.clone()).collect();
    let engine_options = extract_engine_options(&trim_names);

    Ok(Json(GenerationDetail {
        generation,
        trims,
        engine_options,
    }))
}

async fn create_generation(
    State(state): State<AppState>,
    Json(input): Json<CreateGeneration>,
) -> AppResult<(StatusCode, Json<Generation>)> {
    if input.code.trim().is_empty() {
        return Err(AppError::BadRequest("generation code is required".to_string()));
    }
    if let (Some(start), Some(end)) = (input.start_year, input.end_year) {
        if start > end {
            return Err(AppError::BadRequest(
                "start_year must not exceed end_year".to_string(),
            ));
        }
    }
    if Model::find_by_id(state.pool(), input.model_id).await?.is_none() {
        return Err(AppError::BadRequest("model does not exist".to_string()));
    }

    let generation = Generation::create(state.pool(), input).await?;
    Ok((StatusCode::CREATED, Json(generation)))
}

async fn delete_generation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<StatusCode> {
    if !Generation::delete(state.pool(), id).await? {
        return Err(AppError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}
