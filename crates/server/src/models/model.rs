//! Model lines belonging to a brand (e.g. "Golf", "3 Series").

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A car model line.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Model {
    /// Unique identifier.
    pub id: i64,

    /// Owning brand.
    pub brand_id: i64,

    /// Model name.
    pub name: String,

    /// Body style (e.g. "Hatchback", "Sedan").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_style: Option<String>,

    /// Market segment (e.g. "C", "Executive").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segment: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a model.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateModel {
    pub brand_id: i64,
    pub name: String,
    pub body_style: Option<String>,
    pub segment: Option<String>,
}

/// Input for updating a model.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateModel {
    pub name: Option<String>,
    pub body_style: Option<String>,
    pub segment: Option<String>,
}

impl Model {
    /// Find a model by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let model = sqlx::query_as::<_, Self>(
            "SELECT id, brand_id, name, body_style, segment, created_at, updated_at FROM models WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch model")?;

        Ok(model)
    }

    /// List all models of a brand ordered by name.
    pub async fn list_by_brand(pool: &PgPool, brand_id: i64) -> Result<Vec<Self>> {
        let models = sqlx::query_as::<_, Self>(
            r#"
            SELECT id, brand_id, name, body_style, segment, created_at, updated_at
            FROM models
            WHERE brand_id = $1
            ORDER BY name
            "#,
        )
        .bind(brand_id)
        .fetch_all(pool)
        .await
        .context("failed to list models")?;

        Ok(models)
    }

    /// Create a new model.
    pub async fn create(pool: &PgPool, input: CreateModel) -> Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO models (brand_id, name, body_style, segment)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(input.brand_id)
        .bind(&input.name)
        .bind(&input.body_style)
        .bind(&input.segment)
        .fetch_one(pool)
        .await
        .context("failed to create model")?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created model"))
    }

    /// Update a model in place.
    pub async fn update(pool: &PgPool, id: i64, input: UpdateModel) -> Result<Option<Self>> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let name = input.name.unwrap_or(current.name);
        let body_style = input.body_style.or(current.body_style);
        let segment = input.segment.or(current.segment);

        sqlx::query(
            r#"
            UPDATE models
            SET name = $1, body_style = $2, segment = $3, updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(&name)
        .bind(&body_style)
        .bind(&segment)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update model")?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a model (cascades to generations and trims).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM models WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete model")?;

        Ok(result.rows_affected() > 0)
    }
}
