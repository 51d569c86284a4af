use crate::classify::event::{classify_event, has_disaster_keyword, short_event_name};
use crate::classify::fields::{find_date_text, find_death_mention, find_year};
use crate::classify::location::{extract_city, resolve_country};
use crate::classify::{date, text};
use crate::record::{EventRecord, UNKNOWN};

use super::absolutize;
use super::document::ParagraphLink;

/// Last-resort strategy for pages with neither tables nor item lists:
/// every internal link in running prose is a candidate event, judged by
/// the sentence fragment that follows it.
pub fn assemble(links: &[ParagraphLink], page_url: &str) -> Vec<EventRecord> {
    let mut records = Vec::new();

    for link in links {
        if link.text.is_empty() {
            continue;
        }
        let combined = format!("{} {}", link.text, link.trailing);
        if !has_disaster_keyword(&combined) {
            continue;
        }

        let event_name = short_event_name(&link.text);
        let details = text::normalize(&link.trailing);

        let date = find_date_text(&combined)
            .map(date::format_date)
            .or_else(|| find_year(&combined).map(|y| format!("{y}-01-01")))
            .unwrap_or_else(|| UNKNOWN.to_string());

        let death_toll = find_death_mention(&combined);
        let city = extract_city("", &event_name, &details);
        let country = resolve_country("", &event_name, &details, Some(page_url));
        let (event_type, event_subtype) = classify_event(&event_name, &details);

        records.push(EventRecord {
            death_toll,
            event_name,
            city,
            country,
            date,
            details,
            event_type,
            event_subtype,
            source_url: absolutize(&link.href),
        });
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::document::Document;
    use crate::record::{EventSubtype, EventType};

    const URL: &str = "https://en.wikipedia.org/wiki/List_of_disasters_in_Sweden_by_death_toll";

    fn links(html: &str) -> Vec<ParagraphLink> {
        Document::parse(html).paragraph_links()
    }

    #[test]
    fn prose_links_become_records() {
        let records = assemble(&links(r#"<p>
            The <a href="/wiki/Vasa_(ship)">Vasa disaster</a> saw the ship capsize and sink,
            killing 30 people in Stockholm in 1628, while the
            <a href="/wiki/Some_treaty">treaty of 1648</a> ended the war.
        </p>"#), URL);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.event_name, "Vasa disaster");
        assert_eq!(r.death_toll, Some(30));
        assert_eq!(r.date, "1628-01-01");
        assert_eq!(r.city, "Stockholm");
        assert_eq!(r.country, "Sweden");
        assert_eq!(r.source_url, "https://en.wikipedia.org/wiki/Vasa_(ship)");
        assert_eq!(r.event_type, EventType::HumanAccident);
        assert_eq!(r.event_subtype, EventSubtype::MaritimeAccident);
    }

    #[test]
    fn links_without_disaster_context_are_skipped() {
        let prose = links(r#"<p><a href="/wiki/Stockholm">Stockholm</a> is the capital of Sweden.</p>"#);
        assert!(assemble(&prose, URL).is_empty());
    }
}
