//! Page parsing and record assembly.
//!
//! A page is parsed once into a [`document::Document`], then handed to
//! the strategy matching its structure: `wikitable` pages yield one
//! record per row, list pages one per item, and pages with neither fall
//! back to scanning paragraph links.

pub mod document;
pub mod list;
pub mod paragraph;
pub mod table;

use tracing::debug;

use crate::record::EventRecord;
use crate::seeds::ORIGIN;

use document::{Document, ListItem, ParagraphLink, TableData};
use list::Followup;

/// How a page's events are laid out, carrying the structural elements
/// already extracted so the DOM is only walked once.
#[derive(Debug)]
pub enum Strategy {
    Table(Vec<TableData>),
    List(Vec<ListItem>),
    Paragraph(Vec<ParagraphLink>),
}

/// Records assembled from one page, plus any second-level fetches the
/// list strategy wants resolved.
#[derive(Debug, Default)]
pub struct PageOutcome {
    pub records: Vec<EventRecord>,
    pub followups: Vec<Followup>,
}

pub fn choose_strategy(doc: &Document) -> Strategy {
    let tables = doc.data_tables();
    if !tables.is_empty() {
        return Strategy::Table(tables);
    }
    let items = doc.list_items();
    if !items.is_empty() {
        return Strategy::List(items);
    }
    Strategy::Paragraph(doc.paragraph_links())
}

impl Strategy {
    fn name(&self) -> &'static str {
        match self {
            Strategy::Table(_) => "table",
            Strategy::List(_) => "list",
            Strategy::Paragraph(_) => "paragraph",
        }
    }

    pub fn assemble(&self, page_url: &str) -> PageOutcome {
        match self {
            Strategy::Table(tables) => PageOutcome {
                records: table::assemble(tables, page_url),
                followups: Vec::new(),
            },
            Strategy::List(items) => list::assemble(items, page_url),
            Strategy::Paragraph(links) => PageOutcome {
                records: paragraph::assemble(links, page_url),
                followups: Vec::new(),
            },
        }
    }
}

pub fn assemble(doc: &Document, page_url: &str) -> PageOutcome {
    let strategy = choose_strategy(doc);
    debug!(url = page_url, strategy = strategy.name(), "assembling records");
    strategy.assemble(page_url)
}

/// Turn a site-relative `/wiki/` href into a full URL.
pub fn absolutize(href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else {
        format!("{ORIGIN}{href}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_strategy_wins_over_lists() {
        let doc = Document::parse(r#"
            <table class="wikitable">
              <tr><th>Deaths</th><th>Event</th></tr>
              <tr><td>10</td><td>Storm</td></tr>
            </table>
            <ul><li><a href="/wiki/X">X disaster</a></li></ul>"#);
        assert!(matches!(choose_strategy(&doc), Strategy::Table(_)));
    }

    #[test]
    fn list_strategy_when_no_tables() {
        let doc = Document::parse(r#"<ul><li>flood of 1902</li></ul>"#);
        assert!(matches!(choose_strategy(&doc), Strategy::List(_)));
    }

    #[test]
    fn paragraph_strategy_is_the_fallback() {
        let doc = Document::parse(r#"<p>just prose</p>"#);
        assert!(matches!(choose_strategy(&doc), Strategy::Paragraph(_)));
    }

    #[test]
    fn selection_carries_the_extracted_structures() {
        let doc = Document::parse(r#"
            <table class="wikitable">
              <tr><th>Deaths</th><th>Event</th></tr>
              <tr><td>10</td><td>Storm</td></tr>
            </table>"#);
        let Strategy::Table(tables) = choose_strategy(&doc) else {
            panic!("expected table strategy");
        };
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows.len(), 2);
    }

    #[test]
    fn absolutize_relative_and_full() {
        assert_eq!(absolutize("/wiki/Foo"), "https://en.wikipedia.org/wiki/Foo");
        assert_eq!(absolutize("https://example.org/x"), "https://example.org/x");
    }
}
