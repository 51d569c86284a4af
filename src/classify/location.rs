use std::sync::LazyLock;

use regex::Regex;

use crate::classify::url_hint;
use crate::record::UNKNOWN;

// Gazetteer: canonical place name → surface-text variants (historical,
// native, abbreviated). Matched as case-insensitive substrings of the
// combined location + name + details text.
const CITIES: &[(&str, &[&str])] = &[
    ("London", &["London", "Blackfriars, London", "Greater London", "City of London", "Londinium"]),
    ("Paris", &["Paris", "Île-de-France", "Lutetia"]),
    ("Berlin", &["Berlin", "Berlino"]),
    ("Madrid", &["Madrid", "Villa de Madrid"]),
    ("Rome", &["Rome", "Roma", "Eternal City"]),
    ("Vienna", &["Vienna", "Wien"]),
    ("Prague", &["Prague", "Praha"]),
    ("Moscow", &["Moscow", "Moskva"]),
    ("Saint Petersburg", &["Saint Petersburg", "St. Petersburg", "Leningrad", "Petrograd"]),
    ("New York", &["New York", "New York City", "Manhattan", "Brooklyn", "Queens"]),
    ("Los Angeles", &["Los Angeles", "City of Angels"]),
    ("Chicago", &["Chicago", "Windy City"]),
    ("Toronto", &["Toronto", "Greater Toronto"]),
    ("Montreal", &["Montreal", "Montréal"]),
    ("San Francisco", &["San Francisco", "Bay Area"]),
    ("Boston", &["Boston", "Beantown"]),
    ("Houston", &["Houston", "Space City"]),
    ("Tokyo", &["Tokyo", "Tōkyō", "Edo"]),
    ("Beijing", &["Beijing", "Peking", "Běijīng"]),
    ("Shanghai", &["Shanghai", "Shànghǎi"]),
    ("Hong Kong", &["Hong Kong", "Xiānggǎng"]),
    ("Seoul", &["Seoul", "Sŏul"]),
    ("Bangkok", &["Bangkok", "Krung Thep"]),
    ("Mumbai", &["Mumbai", "Bombay", "Mumbaī"]),
    ("Delhi", &["Delhi", "New Delhi", "Dilli"]),
    ("Sydney", &["Sydney", "Harbour City"]),
    ("Melbourne", &["Melbourne"]),
    ("Auckland", &["Auckland", "Tāmaki Makaurau"]),
    ("São Paulo", &["São Paulo", "Sao Paulo"]),
    ("Rio de Janeiro", &["Rio de Janeiro", "Cidade Maravilhosa"]),
    ("Buenos Aires", &["Buenos Aires"]),
    ("Cairo", &["Cairo", "Al-Qāhirah"]),
    ("Johannesburg", &["Johannesburg", "Joburg"]),
    ("Cape Town", &["Cape Town", "Kaapstad"]),
    ("Lagos", &["Lagos"]),
];

const COUNTRIES: &[(&str, &[&str])] = &[
    ("United Kingdom", &[
        "Britain", "Great Britain", "England", "Scotland", "Wales", "Northern Ireland",
        "County Durham", "Yorkshire", "Lancashire", "Cornwall", "Devon", "Staffordshire",
        "Derbyshire", "Isle of Man", "Isles of Scilly", "Shetland", "Thames", "British",
        "United Kingdom",
    ]),
    ("Ireland", &["Ireland", "Dublin", "County Galway", "County Donegal", "Bantry Bay", "Irish", "Eire"]),
    ("France", &["France", "French", "Paris", "Brittany", "Normandy", "Beauvais", "Lyon", "Marseille"]),
    ("United States", &["United States", "America", "American", "New York", "California", "Texas", "Florida", "Chicago", "Los Angeles", "Houston"]),
    ("Australia", &["Australia", "Australian", "Victoria", "Tasmania", "Sydney", "Melbourne", "Brisbane", "Canberra"]),
    ("Austria", &["Austria", "Austrian", "Vienna", "Innsbruck", "Salzburg", "Tyrol"]),
    ("Belgium", &["Belgium", "Belgian", "Brussels", "Antwerp", "Ghent", "Flanders", "Aarsele"]),
    ("Germany", &["Germany", "German", "Bavaria", "Berlin", "Munich", "Hamburg", "Cologne"]),
    ("Japan", &["Japan", "Japanese", "Tokyo", "Osaka", "Kyoto", "Yokohama", "Hiroshima", "Nagasaki"]),
    ("China", &["China", "Chinese", "Beijing", "Shanghai", "Hong Kong", "Guangzhou", "Chengdu"]),
    ("Russia", &["Russia", "Russian", "Moscow", "Saint Petersburg", "Siberia", "Kazan"]),
    ("India", &["India", "Indian", "Mumbai", "Delhi", "Bangalore", "Chennai", "Kolkata"]),
    ("Brazil", &["Brazil", "Brazilian", "São Paulo", "Rio de Janeiro", "Brasília", "Salvador"]),
    ("Canada", &["Canada", "Canadian", "Toronto", "Montreal", "Vancouver", "Ottawa", "Quebec"]),
    ("Italy", &["Italy", "Italian", "Rome", "Milan", "Venice", "Naples", "Turin"]),
    ("Spain", &["Spain", "Spanish", "Madrid", "Barcelona", "Valencia", "Seville"]),
    ("Mexico", &["Mexico", "Mexican", "Mexico City", "Guadalajara", "Monterrey"]),
    ("South Korea", &["South Korea", "Korean", "Seoul", "Busan", "Incheon"]),
    ("Netherlands", &["Netherlands", "Dutch", "Amsterdam", "Rotterdam", "The Hague", "Utrecht"]),
    ("Switzerland", &["Switzerland", "Swiss", "Zurich", "Geneva", "Basel", "Bern"]),
    ("Sweden", &["Sweden", "Swedish", "Stockholm", "Gothenburg", "Malmö", "Uppsala"]),
    ("Norway", &["Norway", "Norwegian", "Oslo", "Bergen", "Trondheim"]),
    ("Denmark", &["Denmark", "Danish", "Copenhagen", "Aarhus", "Odense"]),
    ("Finland", &["Finland", "Finnish", "Helsinki", "Tampere", "Turku"]),
    ("Poland", &["Poland", "Polish", "Warsaw", "Kraków", "Gdańsk"]),
    ("Greece", &["Greece", "Greek", "Athens", "Thessaloniki", "Patras"]),
    ("Turkey", &["Turkey", "Turkish", "Istanbul", "Ankara", "Bursa"]),
    ("Egypt", &["Egypt", "Egyptian", "Cairo", "Alexandria", "Giza", "Suez"]),
    ("South Africa", &["South Africa", "South African", "Johannesburg", "Cape Town", "Durban", "Pretoria"]),
    ("New Zealand", &["New Zealand", "Auckland", "Wellington", "Christchurch", "Dunedin"]),
];

// Candidates the regex fallback must never accept as a city.
const CITY_DENYLIST: &[&str] = &[
    "England", "Scotland", "Wales", "Ireland", "Britain", "France", "Germany", "Italy",
    "Spain", "Russia", "China", "Japan", "India", "Brazil", "Canada", "Australia",
    "New Zealand", "South Africa", "Egypt", "Turkey", "Greece", "Poland", "Hungary",
    "Mexico", "South Korea", "Netherlands", "Switzerland", "Sweden", "Norway", "Denmark",
    "Finland", "United States", "United Kingdom", "United Arab Emirates", "Saudi Arabia",
    "South America", "North America", "Europe", "Asia", "Africa", "Oceania",
];

static SERVICE_WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(accidents?|and|disasters?|by|death|toll)\b").unwrap());
static PUNCT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s,]").unwrap());

static CITY_FALLBACK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"in ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"at ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"near ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"^([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+disaster",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+accident",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+incident",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

static COUNTRY_FALLBACK_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"in ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"at ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"near ([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)(?:,|\s|$)",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+disaster",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+accident",
        r"([A-Z][a-z]+(?:\s+[A-Z][a-z]+)*)\s+incident",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

fn cleaned_text(location: &str, event_name: &str, details: &str) -> String {
    let combined = format!("{} {} {}", location, event_name, details);
    let no_service = SERVICE_WORD_RE.replace_all(&combined, "");
    PUNCT_RE.replace_all(&no_service, " ").to_string()
}

/// Resolve a city from free text: gazetteer lookup first, then a
/// capitalized-phrase fallback with a country/region denylist.
pub fn extract_city(location: &str, event_name: &str, details: &str) -> String {
    if location.is_empty() && event_name.is_empty() && details.is_empty() {
        return UNKNOWN.to_string();
    }
    let text = cleaned_text(location, event_name, details);
    let lower = text.to_lowercase();

    for (city, variants) in CITIES {
        if variants.iter().any(|v| lower.contains(&v.to_lowercase())) {
            return (*city).to_string();
        }
    }

    // Best-effort: pull a proper noun out of "in/at/near <X>" shapes.
    for re in CITY_FALLBACK_RES.iter() {
        if let Some(caps) = re.captures(&text) {
            let candidate = caps[1].trim();
            if !CITY_DENYLIST.contains(&candidate) {
                return candidate.to_string();
            }
        }
    }

    UNKNOWN.to_string()
}

/// Resolve a country from free text, the source-page URL, or a
/// capitalized-phrase fallback, in that priority order. The regex path
/// only accepts candidates that name a known country or variant.
pub fn resolve_country(location: &str, event_name: &str, details: &str, url: Option<&str>) -> String {
    if location.is_empty() && event_name.is_empty() && details.is_empty() && url.is_none() {
        return UNKNOWN.to_string();
    }
    let text = cleaned_text(location, event_name, details);
    let lower = text.to_lowercase();

    for (country, variants) in COUNTRIES {
        if variants.iter().any(|v| lower.contains(&v.to_lowercase())) {
            return (*country).to_string();
        }
    }

    if let Some(url) = url {
        if let Some(country) = url_hint::country_from_url(url) {
            return country;
        }
    }

    for re in COUNTRY_FALLBACK_RES.iter() {
        if let Some(caps) = re.captures(&text) {
            let candidate = caps[1].trim();
            if let Some(canonical) = canonical_country(candidate) {
                return canonical.to_string();
            }
        }
    }

    UNKNOWN.to_string()
}

fn canonical_country(candidate: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .find(|(country, variants)| *country == candidate || variants.contains(&candidate))
        .map(|(country, _)| *country)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gazetteer_city_hit() {
        assert_eq!(extract_city("Tokyo Bay", "ferry sinking", ""), "Tokyo");
        assert_eq!(extract_city("", "Great fire of Londinium", ""), "London");
    }

    #[test]
    fn gazetteer_beats_regex_fallback() {
        // "Tokyo" resolves via the gazetteer even when a capitalized
        // denylist region also appears in "in <X>" position.
        assert_eq!(extract_city("", "explosion in Europe near Tokyo harbour", ""), "Tokyo");
    }

    #[test]
    fn regex_fallback_is_best_effort() {
        let city = extract_city("", "mine collapse near Wankie", "");
        assert_eq!(city, "Wankie");
    }

    #[test]
    fn denylist_rejects_regions() {
        assert_eq!(extract_city("", "storm in England", ""), "unknown");
    }

    #[test]
    fn country_from_variants() {
        assert_eq!(resolve_country("Yorkshire", "", "", None), "United Kingdom");
        assert_eq!(resolve_country("", "Sinking off Hiroshima", "", None), "Japan");
    }

    #[test]
    fn country_from_url_hint() {
        let url = "https://en.wikipedia.org/wiki/List_of_disasters_in_Sweden_by_death_toll";
        assert_eq!(resolve_country("", "mine explosion", "", Some(url)), "Sweden");
    }

    #[test]
    fn text_beats_url_hint() {
        let url = "https://en.wikipedia.org/wiki/List_of_disasters_in_Sweden_by_death_toll";
        assert_eq!(resolve_country("Tokyo", "", "", Some(url)), "Japan");
    }

    #[test]
    fn unresolvable_is_unknown() {
        assert_eq!(resolve_country("", "", "", None), "unknown");
        assert_eq!(extract_city("", "", ""), "unknown");
    }

    #[test]
    fn service_words_do_not_leak() {
        // "death toll" wording must not block resolution of the rest.
        assert_eq!(resolve_country("", "flood death toll rises in Warsaw", "", None), "Poland");
    }
}
