use once_cell::sync::Lazy;
use regex::Regex;

/// Standalone runs of three or four capital letters.
static METRO_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[A-Z]{3,4}\b").expect("metro code pattern is valid"));

/// Derives metro codes from a free-text site description such as
/// `"CLT (Charlotte), PHX (Phoenix)"`.
///
/// Heuristic and lossy: lowercase codes are missed, and any other all-caps word of the
/// right length (e.g. `"NEW"`) is picked up. Results are de-duplicated in first-seen order.
pub fn extract_metro_codes(metro_site: &str) -> Vec<String> {
    let mut codes: Vec<String> = Vec::new();
    for found in METRO_CODE_PATTERN.find_iter(metro_site) {
        let code = found.as_str();
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    codes
}
