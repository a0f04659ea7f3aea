//! Catalog search endpoint.
//!
//! All query parameters are optional. Blank or malformed values are
//! treated as "not specified" rather than rejected.

use axum::extract::{Query, State};
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::error::AppResult;
use crate::search::{lenient_i32, SearchCriteria, SearchResults};
use crate::state::AppState;

/// Create the search router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/search", get(search))
}

/// Raw query parameters. Numeric values arrive as strings so malformed
/// input degrades to "absent" instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    q: Option<String>,
    brand: Option<String>,
    fuel: Option<String>,
    transmission: Option<String>,

    #[serde(rename = "hpMin")]
    hp_min: Option<String>,

    #[serde(rename = "hpMax")]
    hp_max: Option<String>,

    #[serde(rename = "yearMin")]
    year_min: Option<String>,

    #[serde(rename = "yearMax")]
    year_max: Option<String>,
}

impl SearchParams {
    fn into_criteria(self) -> SearchCriteria {
        SearchCriteria {
            query: non_blank(self.q),
            brand: non_blank(self.brand),
            fuel_type: non_blank(self.fuel),
            transmission: non_blank(self.transmission),
            hp_min: lenient_i32(self.hp_min.as_deref()),
            hp_max: lenient_i32(self.hp_max.as_deref()),
            year_min: lenient_i32(self.year_min.as_deref()),
            year_max: lenient_i32(self.year_max.as_deref()),
        }
    }
}

fn non_blank(raw: Option<String>) -> Option<String> {
    let value = raw?.trim().to_string();
    (!value.is_empty()).then_some(value)
}

async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<SearchResults>> {
    let criteria = params.into_criteria();
    let results = state.search().search(&criteria).await?;
    Ok(Json(results))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_malformed_params_become_absent_criteria() {
        let params = SearchParams {
            q: Some("  ".to_string()),
            brand: Some(" BMW ".to_string()),
            hp_min: Some("abc".to_string()),
            year_min: Some("2015".to_string()),
            ..Default::default()
        };

        let criteria = params.into_criteria();
        assert!(criteria.query.is_none());
        assert_eq!(criteria.brand.as_deref(), Some("BMW"));
        assert!(criteria.hp_min.is_none());
        assert_eq!(criteria.year_min, Some(2015));
    }
}
