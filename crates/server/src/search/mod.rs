//! Catalog search: filtered queries with derived facets.
//!
//! One grouped query produces the result rows; a scan pass turns them
//! into catalog entries while aggregating facet values over the same
//! result set, so facets always describe exactly what the current
//! filters returned. A second batch query fetches trim names to derive
//! each entry's engine options.

mod engine_options;
mod query;

pub use engine_options::{extract_engine_option, extract_engine_options};
pub use query::{SearchCriteria, build_catalog_query};

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use serde::Serialize;
use sqlx::{FromRow, PgPool, Row};
use tracing::warn;

/// One search result: a generation with its ancestry and aggregated
/// powertrain data.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogEntry {
    pub id: i64,
    pub brand: String,
    pub model: String,
    pub generation: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_facelift: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub market: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub powertrain_summary: Option<PowertrainSummary>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub engine_options: Vec<String>,
}

/// Aggregated powertrain data across one generation's trims.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PowertrainSummary {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fuel_types: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transmissions: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hp: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_displacement_cc: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_displacement_cc: Option<i32>,
}

/// Filter values available within the current result set.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetSummary {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fuel_types: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transmissions: Vec<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_hp: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_year: Option<i32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_year: Option<i32>,
}

/// Composite search payload.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResults {
    pub results: Vec<CatalogEntry>,
    pub facets: FacetSummary,
}

/// Flat row shape produced by [`build_catalog_query`].
#[derive(Debug, FromRow)]
struct CatalogRow {
    id: i64,
    brand: String,
    model: String,
    generation: String,
    image_url: Option<String>,
    link: Option<String>,
    start_year: Option<i32>,
    end_year: Option<i32>,
    is_facelift: Option<bool>,
    market: Option<String>,
    fuel_types: Option<String>,
    transmissions: Option<String>,
    min_hp: Option<i32>,
    max_hp: Option<i32>,
    min_displacement_cc: Option<i32>,
    max_displacement_cc: Option<i32>,
}

/// Executes catalog searches against the store.
#[derive(Clone)]
pub struct SearchService {
    pool: PgPool,
}

impl SearchService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a search: execute the filtered query, assemble entries and
    /// facets, then enrich entries with extracted engine options.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<SearchResults> {
        let sql = build_catalog_query(criteria);

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .context("catalog search query failed")?;

        let mut catalog_rows = Vec::with_capacity(rows.len());
        for row in &rows {
            match CatalogRow::from_row(row) {
                Ok(catalog_row) => catalog_rows.push(catalog_row),
                Err(error) => {
                    warn!(%error, "skipping malformed catalog row");
                }
            }
        }

        let (mut results, facets) = assemble(catalog_rows);

        let trim_names = self
            .trim_names_by_generation(results.iter().map(|entry| entry.id).collect())
            .await?;
        for entry in &mut results {
            if let Some(names) = trim_names.get(&entry.id) {
                entry.engine_options = extract_engine_options(names);
            }
        }

        Ok(SearchResults { results, facets })
    }

    /// Fetch trim names for a batch of generations.
    async fn trim_names_by_generation(
        &self,
        generation_ids: Vec<i64>,
    ) -> Result<HashMap<i64, Vec<String>>> {
        let mut by_generation: HashMap<i64, Vec<String>> = HashMap::new();
        if generation_ids.is_empty() {
            return Ok(by_generation);
        }

        let rows =
            sqlx::query("SELECT generation_id, name FROM trims WHERE generation_id = ANY($1)")
                .bind(&generation_ids)
                .fetch_all(&self.pool)
                .await
                .context("failed to fetch trim names")?;

        for row in &rows {
            let generation_id: i64 = row.try_get("generation_id")?;
            let name: String = row.try_get("name")?;
            by_generation.entry(generation_id).or_default().push(name);
        }

        Ok(by_generation)
    }
}

impl std::fmt::Debug for SearchService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchService").finish()
    }
}

/// Turn raw rows into catalog entries while aggregating facets over
/// the same pass.
fn assemble(rows: Vec<CatalogRow>) -> (Vec<CatalogEntry>, FacetSummary) {
    let mut results = Vec::with_capacity(rows.len());

    let mut fuel_types: BTreeSet<String> = BTreeSet::new();
    let mut transmissions: BTreeSet<String> = BTreeSet::new();
    let mut facets = FacetSummary::default();

    for row in rows {
        let entry_fuels = row.fuel_types.as_deref().map(split_csv).unwrap_or_default();
        let entry_transmissions = row
            .transmissions
            .as_deref()
            .map(split_csv)
            .unwrap_or_default();

        fuel_types.extend(entry_fuels.iter().cloned());
        transmissions.extend(entry_transmissions.iter().cloned());

        if let Some(min_hp) = row.min_hp {
            facets.min_hp = Some(facets.min_hp.map_or(min_hp, |current| current.min(min_hp)));
        }
        if let Some(max_hp) = row.max_hp {
            facets.max_hp = Some(facets.max_hp.map_or(max_hp, |current| current.max(max_hp)));
        }

        let label_year = parse_label_year(&row.generation);
        let effective_start = row.start_year.or(label_year);
        let effective_end = row.end_year.or(row.start_year).or(label_year);
        for year in [effective_start, effective_end].into_iter().flatten() {
            facets.min_year = Some(facets.min_year.map_or(year, |current| current.min(year)));
            facets.max_year = Some(facets.max_year.map_or(year, |current| current.max(year)));
        }

        let has_summary = !entry_fuels.is_empty()
            || !entry_transmissions.is_empty()
            || row.min_hp.is_some()
            || row.max_hp.is_some()
            || row.min_displacement_cc.is_some()
            || row.max_displacement_cc.is_some();

        let powertrain_summary = has_summary.then(|| PowertrainSummary {
            fuel_types: entry_fuels,
            transmissions: entry_transmissions,
            min_hp: row.min_hp,
            max_hp: row.max_hp,
            min_displacement_cc: row.min_displacement_cc,
            max_displacement_cc: row.max_displacement_cc,
        });

        results.push(CatalogEntry {
            id: row.id,
            brand: row.brand,
            model: row.model,
            generation: row.generation,
            image_url: row.image_url,
            link: row.link,
            start_year: row.start_year,
            end_year: row.end_year,
            is_facelift: row.is_facelift,
            market: row.market,
            powertrain_summary,
            engine_options: Vec::new(),
        });
    }

    facets.fuel_types = fuel_types.into_iter().collect();
    facets.transmissions = transmissions.into_iter().collect();

    (results, facets)
}

/// Split an aggregated CSV column into trimmed, deduplicated, sorted
/// values.
fn split_csv(csv: &str) -> Vec<String> {
    let values: BTreeSet<&str> = csv
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .collect();
    values.into_iter().map(str::to_string).collect()
}

/// First 4-digit year embedded in a generation label, if any.
fn parse_label_year(label: &str) -> Option<i32> {
    static YEAR: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"[0-9]{4}").ok());
    let regex = YEAR.as_ref()?;
    regex.find(label)?.as_str().parse().ok()
}

/// Parse an optional integer query parameter leniently: absent, blank,
/// or malformed values all mean "not specified".
pub fn lenient_i32(raw: Option<&str>) -> Option<i32> {
    raw?.trim().parse().ok()
}
