use tracing::warn;

use crate::classify::event::{classify_event, short_event_name};
use crate::classify::fields::{
    classify_column_header, looks_like_date, looks_like_death_toll, parse_death_toll, ColumnRole,
};
use crate::classify::location::{extract_city, resolve_country};
use crate::classify::{date, text};
use crate::record::{EventRecord, UNKNOWN};

use super::document::TableData;

const LONG_NAME_THRESHOLD: usize = 50;

/// Column indices resolved from a header row. The first header matching
/// a role claims it; later matches for the same role are ignored.
#[derive(Debug, Default)]
struct ColumnMap {
    death_toll: Option<usize>,
    date: Option<usize>,
    location: Option<usize>,
    event: Option<usize>,
    details: Option<usize>,
}

impl ColumnMap {
    fn from_header(header: &[String]) -> Self {
        let mut map = ColumnMap::default();
        for (idx, cell) in header.iter().enumerate() {
            let Some(role) = classify_column_header(cell) else { continue };
            let slot = match role {
                ColumnRole::DeathToll => &mut map.death_toll,
                ColumnRole::Date => &mut map.date,
                ColumnRole::Location => &mut map.location,
                ColumnRole::Event => &mut map.event,
                ColumnRole::Details => &mut map.details,
            };
            if slot.is_none() {
                *slot = Some(idx);
            }
        }
        map
    }

    fn is_empty(&self) -> bool {
        self.death_toll.is_none()
            && self.date.is_none()
            && self.location.is_none()
            && self.event.is_none()
            && self.details.is_none()
    }
}

/// Assemble one record per usable data row across every data table on
/// the page.
pub fn assemble(tables: &[TableData], page_url: &str) -> Vec<EventRecord> {
    let mut records = Vec::new();
    for table in tables {
        records.extend(assemble_table(table, page_url));
    }
    records
}

fn assemble_table(table: &TableData, page_url: &str) -> Vec<EventRecord> {
    let header = &table.rows[0];
    let mut map = ColumnMap::from_header(header);
    if map.is_empty() {
        warn!(url = page_url, "no recognizable columns, skipping table");
        return Vec::new();
    }

    // Some tables carry the toll under an unhelpful header. Probe the
    // first data row for a cell shaped like a casualty count.
    if map.death_toll.is_none() {
        if let Some(first) = table.rows.get(1) {
            map.death_toll = first.iter().position(|cell| {
                looks_like_death_toll(cell) && !looks_like_date(cell)
            });
        }
    }

    let mut records = Vec::new();
    for row in &table.rows[1..] {
        if row.len() < header.len() {
            // Rowspan carry-over rows lack the leading cells; their
            // values belong to the previous record.
            continue;
        }
        if let Some(record) = assemble_row(row, &map, page_url) {
            records.push(record);
        }
    }
    records
}

fn cell<'a>(row: &'a [String], idx: Option<usize>) -> Option<&'a str> {
    idx.and_then(|i| row.get(i)).map(String::as_str).filter(|s| !s.is_empty())
}

fn assemble_row(row: &[String], map: &ColumnMap, page_url: &str) -> Option<EventRecord> {
    let mut toll_text = cell(row, map.death_toll).map(str::to_string);
    let mut date_text = cell(row, map.date).map(str::to_string);

    // Cross-check: column classification works off headers, so a
    // mislabelled table can put dates in the toll column or vice versa.
    if let Some(t) = toll_text.as_deref() {
        if looks_like_date(t) && !looks_like_death_toll(t) && date_text.is_none() {
            date_text = toll_text.take();
        }
    }
    if let Some(d) = date_text.as_deref() {
        if looks_like_death_toll(d) && !looks_like_date(d) && toll_text.is_none() {
            toll_text = date_text.take();
        }
    }

    // A cell that is shaped like neither a toll nor a date (a bare year,
    // say) must not be read as a casualty count.
    let death_toll = toll_text
        .as_deref()
        .filter(|t| looks_like_death_toll(t))
        .and_then(parse_death_toll);
    let date = date_text
        .as_deref()
        .map(date::format_date)
        .unwrap_or_else(|| UNKNOWN.to_string());

    let raw_event = cell(row, map.event).map(text::normalize);
    let mut details = cell(row, map.details).map(|d| text::collapse(d)).unwrap_or_default();

    let event_name = match raw_event {
        Some(name) if name.chars().count() > LONG_NAME_THRESHOLD => {
            // Long cells are descriptions, not titles. Keep the full
            // text as details and derive a compact name from it.
            if details.is_empty() {
                details = name.clone();
            }
            short_event_name(&name)
        }
        Some(name) => name,
        None => UNKNOWN.to_string(),
    };

    let location = cell(row, map.location).unwrap_or("");
    let city = extract_city(location, &event_name, &details);
    let country = resolve_country(location, &event_name, &details, Some(page_url));
    let (event_type, event_subtype) = classify_event(&event_name, &details);

    Some(EventRecord {
        death_toll,
        event_name,
        city,
        country,
        date,
        details,
        event_type,
        event_subtype,
        source_url: page_url.to_string(),
    })
}
