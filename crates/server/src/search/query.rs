//! Catalog search query builder using SeaQuery.
//!
//! Assembles one grouped SELECT over the full catalog hierarchy from a
//! set of optional criteria. Every absent criterion simply contributes
//! no predicate, so the empty criteria set returns the whole catalog.

use sea_query::{
    Alias, Expr, ExprTrait, Func, Iden, Order, PostgresQueryBuilder, Query, SelectStatement,
    SimpleExpr,
};

#[derive(Iden)]
enum Brands {
    Table,
    Id,
    Name,
}

#[derive(Iden)]
enum Models {
    Table,
    Id,
    BrandId,
    Name,
}

#[derive(Iden)]
enum Generations {
    Table,
    Id,
    ModelId,
    Code,
    StartYear,
    EndYear,
    IsFacelift,
    Market,
    ImageUrl,
    Link,
}

#[derive(Iden)]
enum Trims {
    Table,
    Id,
    GenerationId,
    Name,
}

#[derive(Iden)]
enum TrimPowertrain {
    Table,
    TrimId,
    FuelType,
    TransmissionType,
    PowerHp,
    DisplacementCc,
}

/// Optional filter criteria for a catalog search. Absent fields add no
/// predicate.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    /// Free-text query matched against brand, model, generation code,
    /// and trim names.
    pub query: Option<String>,
    pub brand: Option<String>,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub hp_min: Option<i32>,
    pub hp_max: Option<i32>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
}

/// Effective production start: explicit start year, else a 4-digit
/// year parsed from the generation code.
const EFFECTIVE_START_SQL: &str =
    r#"COALESCE("generations"."start_year", (substring("generations"."code" from '[0-9]{4}'))::integer)"#;

/// Effective production end: explicit end year, else start year, else
/// the code-derived year.
const EFFECTIVE_END_SQL: &str = r#"COALESCE("generations"."end_year", "generations"."start_year", (substring("generations"."code" from '[0-9]{4}'))::integer)"#;

/// Build the grouped catalog search SQL for the given criteria.
///
/// One row per generation, aggregating its trims' powertrain data.
pub fn build_catalog_query(criteria: &SearchCriteria) -> String {
    let mut query = Query::select();

    query
        .column((Generations::Table, Generations::Id))
        .expr_as(Expr::col((Brands::Table, Brands::Name)), Alias::new("brand"))
        .expr_as(Expr::col((Models::Table, Models::Name)), Alias::new("model"))
        .expr_as(
            Expr::col((Generations::Table, Generations::Code)),
            Alias::new("generation"),
        )
        .column((Generations::Table, Generations::ImageUrl))
        .column((Generations::Table, Generations::Link))
        .column((Generations::Table, Generations::StartYear))
        .column((Generations::Table, Generations::EndYear))
        .column((Generations::Table, Generations::IsFacelift))
        .column((Generations::Table, Generations::Market))
        .expr_as(
            Expr::cust(r#"string_agg(DISTINCT "trim_powertrain"."fuel_type", ',')"#),
            Alias::new("fuel_types"),
        )
        .expr_as(
            Expr::cust(r#"string_agg(DISTINCT "trim_powertrain"."transmission_type", ',')"#),
            Alias::new("transmissions"),
        )
        .expr_as(
            Func::min(Expr::col((TrimPowertrain::Table, TrimPowertrain::PowerHp))),
            Alias::new("min_hp"),
        )
        .expr_as(
            Func::max(Expr::col((TrimPowertrain::Table, TrimPowertrain::PowerHp))),
            Alias::new("max_hp"),
        )
        .expr_as(
            Func::min(Expr::col((
                TrimPowertrain::Table,
                TrimPowertrain::DisplacementCc,
            ))),
            Alias::new("min_displacement_cc"),
        )
        .expr_as(
            Func::max(Expr::col((
                TrimPowertrain::Table,
                TrimPowertrain::DisplacementCc,
            ))),
            Alias::new("max_displacement_cc"),
        )
        .from(Generations::Table)
        .inner_join(
            Models::Table,
            Expr::col((Models::Table, Models::Id))
                .equals((Generations::Table, Generations::ModelId)),
        )
        .inner_join(
            Brands::Table,
            Expr::col((Brands::Table, Brands::Id)).equals((Models::Table, Models::BrandId)),
        )
        .left_join(
            Trims::Table,
            Expr::col((Trims::Table, Trims::GenerationId))
                .equals((Generations::Table, Generations::Id)),
        )
        .left_join(
            TrimPowertrain::Table,
            Expr::col((TrimPowertrain::Table, TrimPowertrain::TrimId))
                .equals((Trims::Table, Trims::Id)),
        );

    add_criteria(&mut query, criteria);

    query
        .group_by_col((Generations::Table, Generations::Id))
        .group_by_col((Brands::Table, Brands::Name))
        .group_by_col((Models::Table, Models::Name))
        .order_by((Brands::Table, Brands::Name), Order::Asc)
        .order_by((Models::Table, Models::Name), Order::Asc)
        .order_by((Generations::Table, Generations::Code), Order::Asc);

    query.to_string(PostgresQueryBuilder)
}

/// Add one WHERE predicate per present criterion.
fn add_criteria(query: &mut SelectStatement, criteria: &SearchCriteria) {
    if let Some(ref brand) = criteria.brand {
        query.and_where(
            Func::lower(Expr::col((Brands::Table, Brands::Name))).eq(brand.to_lowercase()),
        );
    }

    if let Some(ref text) = criteria.query {
        let pattern = format!("%{}%", escape_like_wildcards(&text.to_lowercase()));
        query.and_where(
            Func::lower(Expr::col((Brands::Table, Brands::Name)))
                .like(pattern.clone())
                .or(Func::lower(Expr::col((Models::Table, Models::Name))).like(pattern.clone()))
                .or(Func::lower(Expr::col((Generations::Table, Generations::Code)))
                    .like(pattern.clone()))
                .or(trim_name_like(pattern)),
        );
    }

    if let Some(ref fuel) = criteria.fuel_type {
        query.and_where(powertrain_exists(
            Func::lower(Expr::col((TrimPowertrain::Table, TrimPowertrain::FuelType)))
                .eq(fuel.to_lowercase()),
        ));
    }

    if let Some(ref transmission) = criteria.transmission {
        query.and_where(powertrain_exists(
            Func::lower(Expr::col((
                TrimPowertrain::Table,
                TrimPowertrain::TransmissionType,
            )))
            .eq(transmission.to_lowercase()),
        ));
    }

    // A single trim must satisfy both horsepower bounds at once.
    if criteria.hp_min.is_some() || criteria.hp_max.is_some() {
        let mut bounds: Option<SimpleExpr> = None;
        if let Some(min) = criteria.hp_min {
            bounds = Some(
                Expr::col((TrimPowertrain::Table, TrimPowertrain::PowerHp)).gte(min),
            );
        }
        if let Some(max) = criteria.hp_max {
            let upper = Expr::col((TrimPowertrain::Table, TrimPowertrain::PowerHp)).lte(max);
            bounds = Some(match bounds {
                Some(lower) => lower.and(upper),
                None => upper,
            });
        }
        if let Some(bounds) = bounds {
            query.and_where(powertrain_exists(bounds));
        }
    }

    // Year filters test overlap of the effective production range with
    // [year_min, year_max]. NULL effective years fail the comparison,
    // excluding entries with no year information.
    if let Some(year_min) = criteria.year_min {
        query.and_where(Expr::cust(EFFECTIVE_END_SQL).gte(year_min));
    }
    if let Some(year_max) = criteria.year_max {
        query.and_where(Expr::cust(EFFECTIVE_START_SQL).lte(year_max));
    }
}

/// EXISTS over a generation's trim names.
fn trim_name_like(pattern: String) -> SimpleExpr {
    Expr::exists(
        Query::select()
            .expr(Expr::val(1))
            .from(Trims::Table)
            .and_where(
                Expr::col((Trims::Table, Trims::GenerationId))
                    .equals((Generations::Table, Generations::Id)),
            )
            .and_where(Func::lower(Expr::col((Trims::Table, Trims::Name))).like(pattern))
            .take(),
    )
}

/// EXISTS over a generation's trims joined to their powertrain rows,
/// with an extra predicate on the powertrain.
fn powertrain_exists(predicate: SimpleExpr) -> SimpleExpr {
    Expr::exists(
        Query::select()
            .expr(Expr::val(1))
            .from(Trims::Table)
            .inner_join(
                TrimPowertrain::Table,
                Expr::col((TrimPowertrain::Table, TrimPowertrain::TrimId))
                    .equals((Trims::Table, Trims::Id)),
            )
            .and_where(
                Expr::col((Trims::Table, Trims::GenerationId))
                    .equals((Generations::Table, Generations::Id)),
            )
            .and_where(predicate)
            .take(),
    )
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like_wildcards(value: &str) -> String {
    value.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn empty_criteria_has_no_where_clause() {
        let sql = build_catalog_query(&SearchCriteria::default());
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains("GROUP BY"));
        assert!(sql.contains(r#"ORDER BY "brands"."name""#));
    }

    #[test]
    fn brand_criterion_compares_case_insensitively() {
        let criteria = SearchCriteria {
            brand: Some("BMW".to_string()),
            ..Default::default()
        };
        let sql = build_catalog_query(&criteria);
        assert!(sql.contains(r#"LOWER("brands"."name") = 'bmw'"#));
    }

    #[test]
    fn free_text_criterion_spans_names_and_trims() {
        let criteria = SearchCriteria {
            query: Some("Golf".to_string()),
            ..Default::default()
        };
        let sql = build_catalog_query(&criteria);
        assert!(sql.contains("%golf%"));
        assert!(sql.contains(r#"LOWER("models"."name")"#));
        assert!(sql.contains(r#"LOWER("generations"."code")"#));
        assert!(sql.contains("EXISTS"));
    }

    #[test]
    fn free_text_wildcards_are_escaped() {
        let criteria = SearchCriteria {
            query: Some("100%".to_string()),
            ..Default::default()
        };
        let sql = build_catalog_query(&criteria);
        assert!(sql.contains("\\%"));
    }

    #[test]
    fn hp_bounds_share_a_single_exists() {
        let criteria = SearchCriteria {
            hp_min: Some(100),
            hp_max: Some(200),
            ..Default::default()
        };
        let sql = build_catalog_query(&criteria);
        assert_eq!(sql.matches("EXISTS").count(), 1);
        assert!(sql.contains(r#""trim_powertrain"."power_hp" >= 100"#));
        assert!(sql.contains(r#""trim_powertrain"."power_hp" <= 200"#));
    }

    #[test]
    fn year_bounds_test_range_overlap() {
        let criteria = SearchCriteria {
            year_min: Some(2015),
            year_max: Some(2020),
            ..Default::default()
        };
        let sql = build_catalog_query(&criteria);
        // Overlap: effective end >= min, effective start <= max.
        assert!(sql.contains(r#"COALESCE("generations"."end_year", "generations"."start_year""#));
        assert!(sql.contains(">= 2015"));
        assert!(sql.contains("<= 2020"));
    }

    #[test]
    fn fuel_and_transmission_use_exists_subqueries() {
        let criteria = SearchCriteria {
            fuel_type: Some("Diesel".to_string()),
            transmission: Some("DSG".to_string()),
            ..Default::default()
        };
        let sql = build_catalog_query(&criteria);
        assert_eq!(sql.matches("EXISTS").count(), 2);
        assert!(sql.contains(r#"LOWER("trim_powertrain"."fuel_type") = 'diesel'"#));
        assert!(sql.contains(r#"LOWER("trim_powertrain"."transmission_type") = 'dsg'"#));
    }

    #[test]
    fn adding_criteria_only_appends_predicates() {
        let base = build_catalog_query(&SearchCriteria::default());
        let filtered = build_catalog_query(&SearchCriteria {
            brand: Some("Audi".to_string()),
            ..Default::default()
        });
        assert!(filtered.len() > base.len());
        assert!(filtered.contains("GROUP BY"));
    }
}
