use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::record::UNKNOWN;

static NOISE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s\-/\.]").unwrap());
static RANGE_SPLIT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[–-]").unwrap());
static YEAR_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(1\d{3}|20[0-2]\d)\b").unwrap());

static ISO_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})-(\d{2})-(\d{2})").unwrap());
static DMY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})(?:st|nd|rd|th)?\s+([A-Za-z]+)\s+(\d{4})").unwrap());
static MDY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Za-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?,?\s+(\d{4})").unwrap());
static YMD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})\s+([A-Za-z]+)\s+(\d{1,2})(?:st|nd|rd|th)?").unwrap());
static SLASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})/(\d{1,2})/(\d{4})").unwrap());
static DOT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})\.(\d{1,2})\.(\d{4})").unwrap());

fn month_number(name: &str) -> Option<u32> {
    let n = match name {
        "January" | "Jan" => 1,
        "February" | "Feb" => 2,
        "March" | "Mar" => 3,
        "April" | "Apr" => 4,
        "May" => 5,
        "June" | "Jun" => 6,
        "July" | "Jul" => 7,
        "August" | "Aug" => 8,
        "September" | "Sep" => 9,
        "October" | "Oct" => 10,
        "November" | "Nov" => 11,
        "December" | "Dec" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parse free-form date text into canonical `YYYY-MM-DD`, or `"unknown"`.
///
/// Patterns are tried in a fixed priority order; for a range only the
/// start is parsed; an impossible calendar combination (Feb 30) falls
/// back to the bare-year form.
pub fn format_date(text: &str) -> String {
    if text.trim().is_empty() {
        return UNKNOWN.to_string();
    }

    let cleaned = NOISE_RE.replace_all(text, " ");
    let cleaned = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    // A range keeps only its start. An ISO date splits into three parts,
    // so it never takes this path.
    if cleaned.contains('-') || cleaned.contains('–') {
        let parts: Vec<&str> = RANGE_SPLIT_RE.split(&cleaned).collect();
        if parts.len() == 2 {
            if let Some(date) = try_patterns(parts[0].trim()) {
                return date;
            }
        }
    }

    if let Some(date) = try_patterns(&cleaned) {
        return date;
    }

    // Last resort: any bare year anywhere in the text.
    if let Some(caps) = YEAR_RE.captures(&cleaned) {
        return format!("{}-01-01", &caps[1]);
    }

    UNKNOWN.to_string()
}

fn try_patterns(text: &str) -> Option<String> {
    let candidate = if let Some(c) = ISO_RE.captures(text) {
        Some((c[1].parse().ok()?, c[2].parse().ok()?, c[3].parse().ok()?))
    } else if let Some(c) = DMY_RE.captures(text) {
        Some((c[3].parse().ok()?, month_number(&c[2]).unwrap_or(1), c[1].parse().ok()?))
    } else if let Some(c) = MDY_RE.captures(text) {
        Some((c[3].parse().ok()?, month_number(&c[1]).unwrap_or(1), c[2].parse().ok()?))
    } else if let Some(c) = YMD_RE.captures(text) {
        Some((c[1].parse().ok()?, month_number(&c[2]).unwrap_or(1), c[3].parse().ok()?))
    } else if let Some(c) = SLASH_RE.captures(text) {
        Some((c[3].parse().ok()?, c[2].parse().ok()?, c[1].parse().ok()?))
    } else if let Some(c) = DOT_RE.captures(text) {
        Some((c[3].parse().ok()?, c[2].parse().ok()?, c[1].parse().ok()?))
    } else {
        YEAR_RE.captures(text).map(|c| {
            let y: i32 = c[1].parse().unwrap_or(1);
            (y, 1, 1)
        })
    };

    let (year, month, day) = candidate?;
    // Reject impossible calendar dates (Feb 30); the caller falls back
    // to the bare-year form.
    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    Some(date.format("%Y-%m-%d").to_string())
}
