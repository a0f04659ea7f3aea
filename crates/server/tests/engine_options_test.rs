#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Engine option extraction tests.

use revline_server::search::{extract_engine_option, extract_engine_options};

#[test]
fn test_displacement_with_family() {
    assert_eq!(extract_engine_option("1.4 TSI Sport"), "1.4 TSI");
    assert_eq!(extract_engine_option("2.0 TDI DSG 4Motion"), "2.0 TDI");
    assert_eq!(extract_engine_option("1.0 TCe 90"), "1.0 TCe");
    assert_eq!(extract_engine_option("1.5 dCi Zen"), "1.5 dCi");
}

#[test]
fn test_displacement_only() {
    assert_eq!(extract_engine_option("Sport 1.4"), "1.4");
    assert_eq!(extract_engine_option("2.5 V6"), "2.5");
}

#[test]
fn test_no_engine_information() {
    assert_eq!(extract_engine_option("Sport Line"), "");
    assert_eq!(extract_engine_option("GTI Clubsport"), "");
    assert_eq!(extract_engine_option(""), "");
}

#[test]
fn test_mixed_case_family_variants() {
    assert_eq!(extract_engine_option("1.2 PureTech"), "1.2");
    assert_eq!(extract_engine_option("1.5 BlueHDi 130"), "1.5 BlueHDi");
    assert_eq!(extract_engine_option("1.5 eTSI R-Line"), "1.5 eTSI");
}

#[test]
fn test_batch_output_is_sorted_and_deduped() {
    let names: Vec<String> = [
        "2.0 TDI Elegance",
        "1.4 TSI Comfortline",
        "1.4 TSI Highline",
        "1.4 tsi Trendline",
        "Base",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect();

    let options = extract_engine_options(&names);
    assert_eq!(options, vec!["1.4 TSI", "2.0 TDI"]);
}

#[test]
fn test_batch_is_capped_at_twenty_options() {
    let names: Vec<String> = (0..30)
        .map(|n| format!("{}.{} TSI Line", 1 + n / 10, n % 10))
        .collect();

    let options = extract_engine_options(&names);
    assert_eq!(options.len(), 20);
}

#[test]
fn test_empty_batch() {
    assert!(extract_engine_options(&[]).is_empty());
    assert!(extract_engine_options(&["Style".to_string()]).is_empty());
}
