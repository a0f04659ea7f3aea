//! Trims: sellable configurations of a generation (engine + transmission
//! + drivetrain for a given model year), with an optional 1:1 powertrain
//! extension holding engine-specific numbers.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

/// A specific sellable configuration of a generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trim {
    /// Unique identifier.
    pub id: i64,

    /// Owning generation.
    pub generation_id: i64,

    /// Free-text trim name (e.g. "1.5 TSI Style DSG").
    pub name: String,

    /// Model year.
    pub year: i32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub drivetrain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    pub market: String,
    pub currency: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    /// Engine-specific numbers, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub powertrain: Option<TrimPowertrain>,
}

/// Optional 1:1 powertrain extension of a trim.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TrimPowertrain {
    pub trim_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub transmission_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_hp: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub torque_nm: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub displacement_cc: Option<i32>,
}

/// Input for creating a trim.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrim {
    pub generation_id: i64,
    pub name: String,
    pub year: i32,
    pub drivetrain: Option<String>,
    pub image_url: Option<String>,
    pub market: Option<String>,
    pub currency: Option<String>,
    pub powertrain: Option<CreateTrimPowertrain>,
}

/// Powertrain fields accepted on trim creation.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTrimPowertrain {
    pub fuel_type: Option<String>,
    pub transmission_type: Option<String>,
    pub power_hp: Option<i32>,
    pub torque_nm: Option<i32>,
    pub displacement_cc: Option<i32>,
}

/// Flat row shape for trim + powertrain LEFT JOIN queries.
#[derive(sqlx::FromRow)]
struct TrimRow {
    id: i64,
    generation_id: i64,
    name: String,
    year: i32,
    drivetrain: Option<String>,
    image_url: Option<String>,
    market: String,
    currency: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    fuel_type: Option<String>,
    transmission_type: Option<String>,
    power_hp: Option<i32>,
    torque_nm: Option<i32>,
    displacement_cc: Option<i32>,
}

impl From<TrimRow> for Trim {
    fn from(row: TrimRow) -> Self {
        let has_powertrain = row.fuel_type.is_some()
            || row.transmission_type.is_some()
            || row.power_hp.is_some()
            || row.torque_nm.is_some()
            || row.displacement_cc.is_some();

        let powertrain = has_powertrain.then(|| TrimPowertrain {
            trim_id: row.id,
            fuel_type: row.fuel_type,
            transmission_type: row.transmission_type,
            power_hp: row.power_hp,
            torque_nm: row.torque_nm,
            displacement_cc: row.displacement_cc,
        });

        Self {
            id: row.id,
            generation_id: row.generation_id,
            name: row.name,
            year: row.year,
            drivetrain: row.drivetrain,
            image_url: row.image_url,
            market: row.market,
            currency: row.currency,
            created_at: row.created_at,
            updated_at: row.updated_at,
            powertrain,
        }
    }
}

const TRIM_JOIN_COLUMNS: &str = r#"
    t.id, t.generation_id, t.name, t.year, t.drivetrain, t.image_url,
    t.market, t.currency, t.created_at, t.updated_at,
    p.fuel_type, p.transmission_type, p.power_hp, p.torque_nm, p.displacement_cc
"#;

impl Trim {
    /// Find a trim by ID, with its powertrain data when present.
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Self>> {
        let row = sqlx::query_as::<_, TrimRow>(&format!(
            r#"
            SELECT {TRIM_JOIN_COLUMNS}
            FROM trims t
            LEFT JOIN trim_powertrain p ON p.trim_id = t.id
            WHERE t.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
        .context("failed to fetch trim")?;

        Ok(row.map(Into::into))
    }

    /// List all trims of a generation, newest model year first.
    pub async fn list_by_generation(pool: &PgPool, generation_id: i64) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, TrimRow>(&format!(
            r#"
            SELECT {TRIM_JOIN_COLUMNS}
            FROM trims t
            LEFT JOIN trim_powertrain p ON p.trim_id = t.id
            WHERE t.generation_id = $1
            ORDER BY t.year DESC, t.name
            "#
        ))
        .bind(generation_id)
        .fetch_all(pool)
        .await
        .context("failed to list trims")?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Create a trim and, when supplied, its powertrain row in one
    /// transaction.
    pub async fn create(pool: &PgPool, input: CreateTrim) -> Result<Self> {
        let mut tx = pool.begin().await.context("failed to start transaction")?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO trims (generation_id, name, year, drivetrain, image_url, market, currency)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.generation_id)
        .bind(&input.name)
        .bind(input.year)
        .bind(&input.drivetrain)
        .bind(&input.image_url)
        .bind(input.market.as_deref().unwrap_or(""))
        .bind(input.currency.as_deref().unwrap_or("EUR"))
        .fetch_one(&mut *tx)
        .await
        .context("failed to insert trim")?;

        if let Some(ref powertrain) = input.powertrain {
            sqlx::query(
                r#"
                INSERT INTO trim_powertrain (trim_id, fuel_type, transmission_type, power_hp, torque_nm, displacement_cc)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(id)
            .bind(&powertrain.fuel_type)
            .bind(&powertrain.transmission_type)
            .bind(powertrain.power_hp)
            .bind(powertrain.torque_nm)
            .bind(powertrain.displacement_cc)
            .execute(&mut *tx)
            .await
            .context("failed to insert trim powertrain")?;
        }

        tx.commit().await.context("failed to commit transaction")?;

        Self::find_by_id(pool, id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("failed to fetch created trim"))
    }

    /// Delete a trim (cascades to its powertrain row).
    pub async fn delete(pool: &PgPool, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM trims WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .context("failed to delete trim")?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn row(fuel: Option<&str>, hp: Option<i32>) -> TrimRow {
        TrimRow {
            id: 7,
            generation_id: 3,
            name: "1.5 TSI Style".to_string(),
            year: 2021,
            drivetrain: None,
            image_url: None,
            market: "EU".to_string(),
            currency: "EUR".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            fuel_type: fuel.map(str::to_string),
            transmission_type: None,
            power_hp: hp,
            torque_nm: None,
            displacement_cc: None,
        }
    }

    #[test]
    fn trim_row_with_powertrain_fields_maps_powertrain() {
        let trim: Trim = row(Some("Petrol"), Some(150)).into();
        let powertrain = trim.powertrain.unwrap();
        assert_eq!(powertrain.trim_id, 7);
        assert_eq!(powertrain.fuel_type.as_deref(), Some("Petrol"));
        assert_eq!(powertrain.power_hp, Some(150));
    }

    #[test]
    fn trim_row_without_powertrain_fields_maps_none() {
        let trim: Trim = row(None, None).into();
        assert!(trim.powertrain.is_none());

        let json = serde_json::to_string(&trim).unwrap();
        assert!(!json.contains("powertrain"));
    }
}
