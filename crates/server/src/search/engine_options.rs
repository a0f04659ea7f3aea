//! Heuristic extraction of engine options from free-text trim names.
//!
//! Trim names in the catalog come from scraped listings and carry
//! marketing noise ("1.5 TSI Style DSG 7st."). The displayed engine
//! option is the displacement token plus, when the next token is an
//! engine family designation, that designation ("1.5 TSI").

/// Punctuation stripped from both ends of a token before matching.
const TOKEN_TRIM: &[char] = &['(', ')', '[', ']', '{', '}', ':', ';', ','];

/// Engine family designations matched exactly (case-insensitive).
const ENGINE_FAMILIES: &[&str] = &[
    "TSI", "TDI", "TFSI", "TGI", "ETSI", "EDRIVE", "TCE", "DCI", "CDI", "ECONETIC",
];

/// Extract a single engine option from a trim name.
///
/// Returns `"1.5 TSI"` for `"1.5 TSI Style DSG"`, `"2.0"` for
/// `"Sport 2.0 quattro"`, and `""` when no displacement token exists.
pub fn extract_engine_option(trim_name: &str) -> String {
    let trimmed = trim_name.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    for (i, raw) in parts.iter().enumerate() {
        let token = raw.trim_matches(TOKEN_TRIM);
        if !looks_like_displacement(token) {
            continue;
        }
        if let Some(next_raw) = parts.get(i + 1) {
            let next = next_raw.trim_matches(TOKEN_TRIM);
            if looks_like_engine_family(next) {
                return format!("{token} {next}");
            }
        }
        return token.to_string();
    }

    String::new()
}

/// Extract, dedupe, and sort engine options from a batch of trim names.
///
/// Duplicates are detected case-insensitively and the first casing
/// encountered wins. The result is sorted and capped at 20 entries.
pub fn extract_engine_options(trim_names: &[String]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut out: Vec<String> = Vec::new();

    for name in trim_names {
        let option = extract_engine_option(name);
        if option.is_empty() {
            continue;
        }
        let key = option.to_lowercase();
        if seen.contains(&key) {
            continue;
        }
        seen.push(key);
        out.push(option);
    }

    out.sort();
    out.truncate(20);
    out
}

/// A displacement token is 3 to 5 bytes shaped like `D.D...`
/// (e.g. "1.0", "2.0d", "1.5e").
fn looks_like_displacement(token: &str) -> bool {
    let bytes = token.as_bytes();
    if bytes.len() < 3 || bytes.len() > 5 {
        return false;
    }
    bytes[1] == b'.' && bytes[0].is_ascii_digit() && bytes[2].is_ascii_digit()
}

/// Engine family designations, either an exact vocabulary match or a
/// token embedding a known family string (e.g. "eTSI", "BlueHDi").
fn looks_like_engine_family(token: &str) -> bool {
    if token.is_empty() {
        return false;
    }
    let upper = token.to_uppercase();
    if ENGINE_FAMILIES.contains(&upper.as_str()) {
        return true;
    }
    upper.contains("TSI") || upper.contains("TDI") || upper.contains("HDI")
}
