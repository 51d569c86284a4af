use std::sync::LazyLock;

use regex::Regex;

static URL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"List_of_disasters_in_([A-Za-z_]+)_by").unwrap(),
        Regex::new(r"List_of_([A-Za-z_]+)_disasters_by").unwrap(),
        Regex::new(r"List_of_([A-Za-z_]+)_disasters$").unwrap(),
    ]
});

// Qualifiers that occupy the region slot without naming a country.
const NON_COUNTRY_QUALIFIERS: &[&str] = &["natural", "environmental", "maritime", "nuclear", "industrial"];

// Normalization from URL spellings to canonical country names. Keys keep
// the underscore form they would carry in a page identifier.
const COUNTRY_ALIASES: &[(&str, &str)] = &[
    ("the_United_States", "United States"),
    ("the_United_Kingdom", "United Kingdom"),
    ("Great_Britain", "United Kingdom"),
    ("UK", "United Kingdom"),
    ("US", "United States"),
    ("USA", "United States"),
    ("New_Zealand", "New Zealand"),
    ("Saudi_Arabia", "Saudi Arabia"),
    ("South_Africa", "South Africa"),
    ("South_Korea", "South Korea"),
    ("Czech", "Czech Republic"),
];

/// Extract a country name from a source-page identifier that follows a
/// `List_of_disasters_in_<region>_by_…` or `List_of_<region>_disasters…`
/// convention. Returns `None` when no convention matches or the region
/// slot holds a non-country qualifier.
pub fn country_from_url(url: &str) -> Option<String> {
    for re in URL_PATTERNS.iter() {
        let Some(caps) = re.captures(url) else { continue };
        let raw = &caps[1];
        let spaced = raw.replace('_', " ");
        if NON_COUNTRY_QUALIFIERS.iter().any(|q| q.eq_ignore_ascii_case(&spaced)) {
            continue;
        }
        for (alias, canonical) in COUNTRY_ALIASES {
            if alias.eq_ignore_ascii_case(raw) {
                return Some((*canonical).to_string());
            }
        }
        return Some(spaced);
    }
    None
}
