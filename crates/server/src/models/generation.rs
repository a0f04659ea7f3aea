//! Generations: named production runs of a model (e.g. "Mk7", "F30").

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A production run of a model, bounded by a start year and an
/// optional end year. `end_year == None` means the generation is still
/// in production, not that the end is unknown.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Generation {
    /// Unique identifier.
    pub id: i64,

    /// Owning model.
    pub model_id: i64,

    /// Generation code (e.g. "Mk7", "G20", "8V").
    pub code: String,

    /// Display name (e.g. "F30 (2012-2018)").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_facelift: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    /// Source/detail page URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a generation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateGeneration {
    pub model_id: i64,
    pub code: String,
    pub name: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub is_facelift: Option<bool>,
    pub market: Option<String>,
    pub image_url: Option<String>,
    pub link: Option<String>,
}

const GENERATION_COLUMNS: &str = "id, model_id, code, name, start_year, end_year, is_facelift, market, image_url, link, created_at, updated_at";

impl Generation {
    /// Find a generation by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let generation = sqlx::query_as::<_, Self>(&format!(
            "SELECT {GENERATION_COLUMNS} FROM generations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch generation")?;

        Ok(generation)
    }

    /// List all generations of a model, newest first.
    pub async fn list_by_model(pool: &PgPool, model_id: i64) -> Result<Vec<Self>> {
        let generations = sqlx::query_as::<_, Self>(&format!(
            r#"
            SELECT {GENERATION_COLUMNS}
            FROM generations
            WHERE model_id = $1
            ORDER BY start_year DESC NULLS LAST, code
            "#
        ))
        .bind(model_id)
        .fetch_all(pool)
        .await
        .context("failed to list generations")?;

        Ok(generations)
    }

    /// Create a new generation.
    pub async fn create(pool: &PgPool, input: CreateGeneration) -> Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO generations (model_id, code, name, start_year, end_year, is_facelift, market, image_url, link)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(input.model_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.start_year)
        .bind(input.end_year)
        .bind(input.is_facelift)
        .bind(&input.market)
        .bind(&input.image_url)
        .bind(&input.link)
        .fetch_one(pool)
        .await
        .context("failed to create generation")?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created generation"))
    }

    /// Delete a generation (cascades to trims, so no orphans remain).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM generations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete generation")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn ongoing_generation_serializes_without_end_year() {
        let generation = Generation {
            id: 1,
            model_id: 1,
            code: "Mk8".to_string(),
            name: None,
            start_year: Some(2020),
            end_year: None,
            is_facelift: None,
            market: None,
            image_url: None,
            link: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&generation).unwrap();
        assert!(json.contains("start_year"));
        assert!(!json.contains("end_year"));
    }
}
