//! Brand model: car manufacturers, the root of the catalog hierarchy.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A car manufacturer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Brand {
    /// Unique identifier.
    pub id: i64,

    /// Brand name, unique case-insensitively.
    pub name: String,

    /// Country of origin.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,

    /// Logo image URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a brand.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBrand {
    pub name: String,
    pub country: Option<String>,
    pub logo_url: Option<String>,
}

/// Input for updating a brand.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateBrand {
    pub name: Option<String>,
    pub country: Option<String>,
    pub logo_url: Option<String>,
}

impl Brand {
    /// Find a brand by ID.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let brand = sqlx::query_as::<_, Self>(
            "SELECT id, name, country, logo_url, created_at, updated_at FROM brands WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch brand")?;

        Ok(brand)
    }

    /// Find a brand by name (case-insensitive).
    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Self>> {
        let brand = sqlx::query_as::<_, Self>(
            "SELECT id, name, country, logo_url, created_at, updated_at FROM brands WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name)
        .fetch_optional(pool)
        .await
        .context("failed to fetch brand by name")?;

        Ok(brand)
    }

    /// List all brands ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>> {
        let brands = sqlx::query_as::<_, Self>(
            "SELECT id, name, country, logo_url, created_at, updated_at FROM brands ORDER BY name",
        )
        .fetch_all(pool)
        .await
        .context("failed to list brands")?;

        Ok(brands)
    }

    /// Create a new brand.
    pub async fn create(pool: &PgPool, input: CreateBrand) -> Result<Self> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO brands (name, country, logo_url)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.country)
        .bind(&input.logo_url)
        .fetch_one(pool)
        .await
        .context("failed to create brand")?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created brand"))
    }

    /// Update a brand in place.
    pub async fn update(pool: &PgPool, id: i64, input: UpdateBrand) -> Result<Option<Self>> {
        let Some(current) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };

        let name = input.name.unwrap_or(current.name);
        let country = input.country.or(current.country);
        let logo_url = input.logo_url.or(current.logo_url);

        sqlx::query(
            r#"
            UPDATE brands
            SET name = $1, country = $2, logo_url = $3, updated_at = now()
            WHERE id = $4
            "#,
        )
        .bind(&name)
        .bind(&country)
        .bind(&logo_url)
        .bind(id)
        .execute(pool)
        .await
        .context("failed to update brand")?;

        Self::find_by_id(pool, id).await
    }

    /// Delete a brand (cascades to models, generations, and trims).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM brands WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete brand")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn brand_serialization_skips_absent_fields() {
        let brand = Brand {
            id: 1,
            name: "BMW".to_string(),
            country: None,
            logo_url: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_string(&brand).unwrap();
        assert!(json.contains("BMW"));
        assert!(!json.contains("country"));
        assert!(!json.contains("logo_url"));
    }

    #[test]
    fn create_brand_input_optional_fields() {
        let input: CreateBrand = serde_json::from_str(r#"{"name": "Audi"}"#).unwrap();
        assert_eq!(input.name, "Audi");
        assert!(input.country.is_none());
    }
}
