use std::sync::LazyLock;

use regex::Regex;

const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(1\d{3}|20[0-2]\d)\b").unwrap());

static DATE_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    let months = MONTH_NAMES.join("|");
    [
        // "1912 April 15"
        Regex::new(&format!(r"\b(1\d{{3}}|20[0-2]\d)\s+({months})\s+\d{{1,2}}\b")).unwrap(),
        // "April 15, 1912"
        Regex::new(&format!(r"\b({months})\s+\d{{1,2}},\s+(1\d{{3}}|20[0-2]\d)\b")).unwrap(),
        // "15 April 1912"
        Regex::new(&format!(r"\b\d{{1,2}}\s+({months})\s+(1\d{{3}}|20[0-2]\d)\b")).unwrap(),
    ]
});

// Shapes a casualty cell can take: bare integer, comma-grouped, range,
// approximate (~, c.), comparison (<, >).
static TOLL_SHAPE_RES: LazyLock<[Regex; 6]> = LazyLock::new(|| {
    [
        Regex::new(r"^\d+$").unwrap(),
        Regex::new(r"^\d{1,3}(,\d{3})*$").unwrap(),
        Regex::new(r"^\d{1,3}(,\d{3})*[-–]\d{1,3}(,\d{3})*$").unwrap(),
        Regex::new(r"^\d+[-–]\d+$").unwrap(),
        Regex::new(r"^[~c\. ]*\d+$").unwrap(),
        Regex::new(r"^[<>]\s*\d+$").unwrap(),
    ]
});

static NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").unwrap());

// Prose casualty mentions, number-first ("1,500 deaths", "12 people
// were killed") and verb-first ("killed 44 miners").
static DEATH_MENTION_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)\b(\d+(?:,\d+)*)\s+(?:deaths?|casualties|fatalities|dead\b|(?:people|miners|passengers|workers|victims)\s+(?:killed|died|perished|lost\s+their\s+lives|were\s+(?:killed|dead|found\s+dead|reported\s+dead|confirmed\s+dead|presumed\s+dead)))",
        r"(?i)\b(?:killed|killing|claimed(?:\s+the\s+lives\s+of)?|left)\s+(?:at\s+least\s+|about\s+|around\s+|approximately\s+|over\s+|more\s+than\s+|some\s+|up\s+to\s+)?(\d+(?:,\d+)*)",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// True iff a plausible 4-digit year (1000-2029) appears anywhere.
pub fn looks_like_year(text: &str) -> bool {
    YEAR_RE.is_match(text)
}

/// True iff the text contains a date in one of the month-name shapes
/// seen in source tables.
pub fn looks_like_date(text: &str) -> bool {
    DATE_RES.iter().any(|re| re.is_match(text))
}

/// True iff trimmed text has the shape of a casualty count. The check
/// order matters: a month name rules the cell out as a date before any
/// shape matching, and a plain 4-digit number whose every embedded value
/// sits in 1800-2024 is treated as a year, not a count.
pub fn looks_like_death_toll(text: &str) -> bool {
    let text = text.trim();
    let lower = text.to_lowercase();
    if MONTH_NAMES.iter().any(|m| lower.contains(&m.to_lowercase())) {
        return false;
    }

    for re in TOLL_SHAPE_RES.iter() {
        if re.is_match(text) {
            let numbers: Vec<u32> = NUM_RE
                .find_iter(text)
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            if !numbers.is_empty() && numbers.iter().all(|&n| (1800..=2024).contains(&n)) {
                return false;
            }
            return true;
        }
    }
    false
}

/// Parse a casualty cell into a single integer. Ranges average all
/// embedded numbers; comma grouping and approximate/comparison markers
/// are stripped. `None` when no digits remain.
pub fn parse_death_toll(text: &str) -> Option<u32> {
    let cleaned = text.replace([',', '"', '\''], "");
    let numbers: Vec<u64> = NUM_RE
        .find_iter(&cleaned)
        .filter_map(|m| m.as_str().parse().ok())
        .collect();
    if numbers.is_empty() {
        return None;
    }
    if cleaned.contains('-') || cleaned.contains('–') {
        let mean = numbers.iter().sum::<u64>() / numbers.len() as u64;
        return u32::try_from(mean).ok();
    }
    u32::try_from(numbers[0]).ok()
}

/// Find a prose casualty mention ("1,500 deaths", "12 people killed")
/// anywhere in free text.
pub fn find_death_mention(text: &str) -> Option<u32> {
    let caps = DEATH_MENTION_RES.iter().find_map(|re| re.captures(text))?;
    caps[1].replace(',', "").parse().ok()
}

/// Return the first date-shaped substring, if any.
pub fn find_date_text(text: &str) -> Option<&str> {
    DATE_RES.iter().find_map(|re| re.find(text)).map(|m| m.as_str())
}

/// Return the first plausible 4-digit year, if any.
pub fn find_year(text: &str) -> Option<&str> {
    YEAR_RE.find(text).map(|m| m.as_str())
}

/// Semantic field a table column is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    DeathToll,
    Date,
    Location,
    Event,
    Details,
}

/// Map lower-cased header text to a column role via a fixed word table.
/// The first recognized token wins.
pub fn classify_column_header(header: &str) -> Option<ColumnRole> {
    for token in header.to_lowercase().split_whitespace() {
        let token = token.trim_matches(|c: char| !c.is_alphanumeric());
        let role = match token {
            "death" | "deaths" | "casualties" | "fatalities" | "killed" | "toll" | "dead" => {
                Some(ColumnRole::DeathToll)
            }
            "date" | "year" | "when" | "time" => Some(ColumnRole::Date),
            "location" | "place" | "where" | "area" | "region" | "country" | "site" => {
                Some(ColumnRole::Location)
            }
            "event" | "incident" | "disaster" | "name" => Some(ColumnRole::Event),
            "notes" | "details" | "description" | "comments" | "additional" => {
                Some(ColumnRole::Details)
            }
            _ => None,
        };
        if role.is_some() {
            return role;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_name_is_never_a_toll() {
        assert!(!looks_like_death_toll("March 5, 1912"));
        assert!(!looks_like_death_toll("1912 April 15"));
        assert!(!looks_like_death_toll("December"));
    }

    #[test]
    fn toll_shapes() {
        assert!(looks_like_death_toll("123"));
        assert!(looks_like_death_toll("1,234"));
        assert!(looks_like_death_toll("100-200"));
        assert!(looks_like_death_toll("~100"));
        assert!(looks_like_death_toll("<200"));
        assert!(looks_like_death_toll("c. 30"));
        assert!(!looks_like_death_toll("about forty"));
    }

    #[test]
    fn decoy_year_exclusion() {
        // Every embedded number in 1800-2024 reads as a year, not a count.
        assert!(!looks_like_death_toll("1824"));
        assert!(!looks_like_death_toll("1912-1913"));
        // Outside the window it is a plausible count again.
        assert!(looks_like_death_toll("2500"));
        assert!(looks_like_death_toll("150"));
    }

    #[test]
    fn year_and_date_predicates() {
        assert!(looks_like_year("the 1824 storm"));
        assert!(looks_like_year("2029"));
        assert!(!looks_like_year("2150"));
        assert!(looks_like_date("1912 April 15"));
        assert!(looks_like_date("April 15, 1912"));
        assert!(looks_like_date("15 April 1912"));
        assert!(!looks_like_date("15/04/1912"));
    }

    #[test]
    fn toll_parsing() {
        assert_eq!(parse_death_toll("1,500"), Some(1500));
        assert_eq!(parse_death_toll("100-200"), Some(150));
        assert_eq!(parse_death_toll("~100"), Some(100));
        assert_eq!(parse_death_toll("<200"), Some(200));
        assert_eq!(parse_death_toll("none"), None);
    }

    #[test]
    fn death_mentions_in_prose() {
        assert_eq!(find_death_mention("around 1,500 deaths were recorded"), Some(1500));
        assert_eq!(find_death_mention("12 people were killed in the blaze"), Some(12));
        assert_eq!(find_death_mention("57 casualties"), Some(57));
        assert_eq!(find_death_mention("the blast killed 38 miners"), Some(38));
        assert_eq!(find_death_mention("killing at least 1,300"), Some(1300));
        assert_eq!(find_death_mention("no one was hurt"), None);
    }

    #[test]
    fn header_roles() {
        assert_eq!(classify_column_header("Deaths"), Some(ColumnRole::DeathToll));
        assert_eq!(classify_column_header("Where"), Some(ColumnRole::Location));
        assert_eq!(classify_column_header("Death toll"), Some(ColumnRole::DeathToll));
        assert_eq!(classify_column_header("Date of event"), Some(ColumnRole::Date));
        assert_eq!(classify_column_header("Notes"), Some(ColumnRole::Details));
        assert_eq!(classify_column_header("Foo"), None);
    }
}
