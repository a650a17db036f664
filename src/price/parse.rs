//! Locale-tolerant normalization of scraped price text.

use once_cell::sync::Lazy;
use regex::Regex;

/// First price-like number in a string: grouped thousands with an optional
/// two-digit decimal part, or a bare decimal
static NUMBER_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d{1,3}(?:[,\s]\d{3})*(?:[.,]\d{1,2})?|\d+[.,]\d{1,2}")
        .expect("price token pattern is valid")
});

/// Parse the first price-like number out of scraped text.
///
/// Non-breaking spaces are treated as spaces. A comma with no period is read
/// as a European decimal point; otherwise commas and spaces are thousands
/// separators and dropped. Returns `None` when no number is present or the
/// token does not parse.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned = raw.replace('\u{a0}', " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }

    let token = NUMBER_TOKEN.find(cleaned)?.as_str();

    let normalized: String = if token.contains(',') && !token.contains('.') {
        token.replace(',', ".")
    } else {
        token.chars().filter(|c| !matches!(c, ',' | ' ')).collect()
    };

    normalized.parse::<f64>().ok()
}
