#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Search query builder and payload shape tests.

use revline_server::search::{
    build_catalog_query, CatalogEntry, FacetSummary, PowertrainSummary, SearchCriteria,
    SearchResults,
};

fn entry(id: i64) -> CatalogEntry {
    CatalogEntry {
        id,
        brand: "Volkswagen".to_string(),
        model: "Golf".to_string(),
        generation: "Mk7".to_string(),
        image_url: None,
        link: None,
        start_year: Some(2012),
        end_year: Some(2019),
        is_facelift: None,
        market: None,
        powertrain_summary: None,
        engine_options: Vec::new(),
    }
}

#[test]
fn test_unfiltered_query_selects_whole_catalog() {
    let sql = build_catalog_query(&SearchCriteria::default());

    assert!(sql.contains(r#"FROM "generations""#));
    assert!(sql.contains(r#""models""#));
    assert!(sql.contains(r#""brands""#));
    assert!(sql.contains(r#""trim_powertrain""#));
    assert!(sql.contains("GROUP BY"));
    assert!(!sql.contains("WHERE"));
}

#[test]
fn test_each_criterion_adds_exactly_one_predicate() {
    let unfiltered = build_catalog_query(&SearchCriteria::default());

    let filters = [
        SearchCriteria {
            brand: Some("Audi".to_string()),
            ..Default::default()
        },
        SearchCriteria {
            fuel_type: Some("Diesel".to_string()),
            ..Default::default()
        },
        SearchCriteria {
            year_min: Some(2015),
            ..Default::default()
        },
    ];

    for criteria in filters {
        let sql = build_catalog_query(&criteria);
        assert!(sql.contains("WHERE"));
        assert!(sql.len() > unfiltered.len());
        // The grouped select itself is unchanged.
        assert!(sql.contains("GROUP BY"));
        assert!(sql.contains(r#"ORDER BY "brands"."name""#));
    }
}

#[test]
fn test_hp_range_binds_to_a_single_trim() {
    let sql = build_catalog_query(&SearchCriteria {
        hp_min: Some(100),
        hp_max: Some(200),
        ..Default::default()
    });

    // Both bounds live inside one EXISTS so a single trim must satisfy
    // the whole range.
    assert_eq!(sql.matches("EXISTS").count(), 1);
    assert!(sql.contains(">= 100"));
    assert!(sql.contains("<= 200"));
}

#[test]
fn test_year_filter_uses_overlap_not_containment() {
    let sql = build_catalog_query(&SearchCriteria {
        year_min: Some(2017),
        year_max: Some(2020),
        ..Default::default()
    });

    // A 2015-2019 generation overlaps [2017, 2020]: its effective end
    // is tested against the minimum and its effective start against
    // the maximum.
    assert!(sql.contains(r#"COALESCE("generations"."end_year", "generations"."start_year""#));
    assert!(sql.contains(">= 2017"));
    assert!(sql.contains(r#"COALESCE("generations"."start_year""#));
    assert!(sql.contains("<= 2020"));
}

#[test]
fn test_year_filter_falls_back_to_label_year() {
    let sql = build_catalog_query(&SearchCriteria {
        year_min: Some(2010),
        ..Default::default()
    });

    assert!(sql.contains(r#"substring("generations"."code" from '[0-9]{4}')"#));
}

#[test]
fn test_free_text_matches_all_name_levels() {
    let sql = build_catalog_query(&SearchCriteria {
        query: Some("Golf".to_string()),
        ..Default::default()
    });

    assert!(sql.contains(r#"LOWER("brands"."name")"#));
    assert!(sql.contains(r#"LOWER("models"."name")"#));
    assert!(sql.contains(r#"LOWER("generations"."code")"#));
    assert!(sql.contains(r#"LOWER("trims"."name")"#));
    assert!(sql.contains("%golf%"));
}

#[test]
fn test_search_payload_shape() {
    let mut first = entry(1);
    first.powertrain_summary = Some(PowertrainSummary {
        fuel_types: vec!["Diesel".to_string(), "Petrol".to_string()],
        transmissions: vec!["DSG".to_string()],
        min_hp: Some(110),
        max_hp: Some(245),
        min_displacement_cc: Some(1395),
        max_displacement_cc: Some(1984),
    });
    first.engine_options = vec!["1.4 TSI".to_string(), "2.0 TDI".to_string()];

    let payload = SearchResults {
        results: vec![first, entry(2)],
        facets: FacetSummary {
            fuel_types: vec!["Diesel".to_string(), "Petrol".to_string()],
            transmissions: vec!["DSG".to_string()],
            min_hp: Some(110),
            max_hp: Some(245),
            min_year: Some(2012),
            max_year: Some(2019),
        },
    };

    let json = serde_json::to_value(&payload).unwrap();

    assert!(json["results"].is_array());
    assert_eq!(json["results"][0]["brand"], "Volkswagen");
    assert_eq!(json["results"][0]["powertrain_summary"]["min_hp"], 110);
    assert_eq!(json["results"][0]["engine_options"][0], "1.4 TSI");
    assert_eq!(json["facets"]["fuel_types"][1], "Petrol");
    assert_eq!(json["facets"]["max_year"], 2019);

    // Entries without powertrain data omit the summary entirely.
    assert!(json["results"][1].get("powertrain_summary").is_none());
}
