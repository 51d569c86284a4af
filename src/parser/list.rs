use crate::classify::event::{classify_event, has_disaster_keyword, short_event_name};
use crate::classify::fields::{find_date_text, find_death_mention, find_year};
use crate::classify::location::{extract_city, resolve_country};
use crate::classify::{date, text};
use crate::record::{EventRecord, UNKNOWN};

use super::document::ListItem;
use super::{absolutize, PageOutcome};

/// Cap on second-level fetches spawned by a single page.
pub const FOLLOWUP_LIMIT: usize = 10;

/// A linked article worth fetching to fill gaps in the record at
/// `slot`. Only the flagged fields may be patched from it.
#[derive(Debug, Clone)]
pub struct Followup {
    pub slot: usize,
    pub url: String,
    pub need_date: bool,
    pub need_toll: bool,
    pub need_location: bool,
}

/// Assemble one record per accepted list item. Items that read like a
/// disaster but lack a date, toll, or location get a follow-up entry
/// pointing at their linked article.
pub fn assemble(items: &[ListItem], page_url: &str) -> PageOutcome {
    let mut outcome = PageOutcome::default();

    for item in items {
        let accepted = has_disaster_keyword(&item.text)
            || find_death_mention(&item.text).is_some()
            || find_date_text(&item.text).is_some()
            || find_year(&item.text).is_some();
        if !accepted {
            continue;
        }

        let event_name = match item.link_text.as_deref() {
            Some(t) if !t.is_empty() => short_event_name(t),
            _ => UNKNOWN.to_string(),
        };

        let date = find_date_text(&item.text)
            .map(date::format_date)
            .or_else(|| find_year(&item.text).map(|y| format!("{y}-01-01")))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let death_toll = find_death_mention(&item.text);

        // An item whose whole text is just the link label carries no
        // prose of its own; the section heading is the best context.
        let details = if item.link_text.as_deref() == Some(item.text.as_str()) {
            item.section.clone().map(|s| text::normalize(&s)).unwrap_or_default()
        } else {
            text::normalize(&item.text)
        };

        let link_url = item.link_href.as_deref().map(absolutize);
        let source_url = link_url.clone().unwrap_or_else(|| page_url.to_string());

        let city = extract_city("", &event_name, &details);
        let country = resolve_country("", &event_name, &details, Some(page_url));
        let (event_type, event_subtype) = classify_event(&event_name, &details);

        let need_date = date == UNKNOWN;
        let need_toll = death_toll.is_none();
        let need_location = city == UNKNOWN || country == UNKNOWN;

        let slot = outcome.records.len();
        outcome.records.push(EventRecord {
            death_toll,
            event_name,
            city,
            country,
            date,
            details,
            event_type,
            event_subtype,
            source_url,
        });

        if (need_date || need_toll || need_location)
            && outcome.followups.len() < FOLLOWUP_LIMIT
        {
            if let Some(url) = link_url {
                outcome.followups.push(Followup {
                    slot,
                    url,
                    need_date,
                    need_toll,
                    need_location,
                });
            }
        }
    }

    outcome
}

/// Patch a record in place from the text of its linked article. Only
/// fields the follow-up was queued for, and still unresolved, change.
pub fn patch_followup(record: &mut EventRecord, followup: &Followup, article_text: &str) {
    if followup.need_date && record.date == UNKNOWN {
        if let Some(d) = find_date_text(article_text) {
            record.date = date::format_date(d);
        } else if let Some(y) = find_year(article_text) {
            record.date = format!("{y}-01-01");
        }
    }
    if followup.need_toll && record.death_toll.is_none() {
        record.death_toll = find_death_mention(article_text);
    }
    if followup.need_location {
        if record.city == UNKNOWN {
            record.city = extract_city(article_text, &record.event_name, "");
        }
        if record.country == UNKNOWN {
            record.country = resolve_country(article_text, &record.event_name, "", None);
        }
    }
}
