use std::sync::LazyLock;

use scraper::{ElementRef, Html, Node, Selector};

use crate::classify::text::collapse;

static CONTENT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.mw-parser-output").unwrap());
static WIKITABLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table.wikitable").unwrap());
static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th, td").unwrap());
static PARA_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// One data table, normalized to cell text. Row 0 is the header row.
#[derive(Debug, Clone)]
pub struct TableData {
    pub rows: Vec<Vec<String>>,
}

/// One list item with its first internal link and nearest section heading.
#[derive(Debug, Clone)]
pub struct ListItem {
    pub text: String,
    pub link_href: Option<String>,
    pub link_text: Option<String>,
    pub section: Option<String>,
}

/// One internal hyperlink inside a paragraph, with the inline text that
/// follows it up to the next internal link.
#[derive(Debug, Clone)]
pub struct ParagraphLink {
    pub href: String,
    pub text: String,
    pub trailing: String,
}

/// Read-only structural view over a parsed page: the element shapes the
/// record assemblers walk. Not `Send`; confine to a single parse scope.
pub struct Document {
    html: Html,
}

impl Document {
    pub fn parse(html: &str) -> Self {
        Document {
            html: Html::parse_document(html),
        }
    }

    fn content_root(&self) -> ElementRef<'_> {
        self.html
            .select(&CONTENT_SEL)
            .next()
            .unwrap_or_else(|| self.html.root_element())
    }

    /// Data tables (header row plus at least one data row). Pages mark
    /// their data tables with the `wikitable` class; plain tables are
    /// only considered when no marked one exists.
    pub fn data_tables(&self) -> Vec<TableData> {
        let root = self.content_root();
        let mut tables: Vec<TableData> = root
            .select(&WIKITABLE_SEL)
            .filter_map(table_data)
            .collect();
        if tables.is_empty() {
            tables = root.select(&TABLE_SEL).filter_map(table_data).collect();
        }
        tables
    }

    /// List items in document order, each annotated with the nearest
    /// preceding section heading. Items inside navigation boxes or
    /// tables are skipped.
    pub fn list_items(&self) -> Vec<ListItem> {
        let root = self.content_root();
        let mut items = Vec::new();
        let mut section: Option<String> = None;

        for node in root.descendants() {
            let Some(el) = ElementRef::wrap(node) else { continue };
            match el.value().name() {
                "h2" | "h3" | "h4" => {
                    let title = collapse(&el.text().collect::<String>());
                    section = (!title.is_empty()).then_some(title);
                }
                "li" => {
                    if inside(el, &["nav", "table"]) {
                        continue;
                    }
                    let text = collapse(&el.text().collect::<String>());
                    if text.is_empty() {
                        continue;
                    }
                    let link = el
                        .select(&ANCHOR_SEL)
                        .find(|a| a.value().attr("href").is_some_and(|h| h.starts_with("/wiki/")));
                    items.push(ListItem {
                        text,
                        link_href: link
                            .and_then(|a| a.value().attr("href"))
                            .map(str::to_string),
                        link_text: link.map(|a| collapse(&a.text().collect::<String>())),
                        section: section.clone(),
                    });
                }
                _ => {}
            }
        }
        items
    }

    /// Internal links inside paragraphs, each paired with the trailing
    /// inline text up to the next internal link.
    pub fn paragraph_links(&self) -> Vec<ParagraphLink> {
        let root = self.content_root();
        let mut links = Vec::new();

        for p in root.select(&PARA_SEL) {
            let mut current: Option<ParagraphLink> = None;
            for child in p.children() {
                if let Some(el) = ElementRef::wrap(child) {
                    let is_wiki_link = el.value().name() == "a"
                        && el.value().attr("href").is_some_and(|h| h.starts_with("/wiki/"));
                    if is_wiki_link {
                        if let Some(done) = current.take() {
                            links.push(done);
                        }
                        current = Some(ParagraphLink {
                            href: el.value().attr("href").unwrap_or_default().to_string(),
                            text: collapse(&el.text().collect::<String>()),
                            trailing: String::new(),
                        });
                    } else if let Some(link) = current.as_mut() {
                        // Inline formatting keeps its text; citation
                        // anchors and the like contribute nothing useful
                        // but are harmless in the trailing run.
                        link.trailing.push(' ');
                        link.trailing.push_str(&el.text().collect::<String>());
                    }
                } else if let Node::Text(text) = child.value() {
                    if let Some(link) = current.as_mut() {
                        link.trailing.push(' ');
                        link.trailing.push_str(text);
                    }
                }
            }
            if let Some(done) = current.take() {
                links.push(done);
            }
        }

        for link in &mut links {
            link.trailing = collapse(&link.trailing);
        }
        links
    }

    /// All visible text of the main content area, whitespace-collapsed.
    pub fn main_text(&self) -> String {
        collapse(&self.content_root().text().collect::<String>())
    }
}

fn table_data(table: ElementRef<'_>) -> Option<TableData> {
    let rows: Vec<Vec<String>> = table
        .select(&ROW_SEL)
        .map(|tr| {
            tr.select(&CELL_SEL)
                .map(|cell| collapse(&cell.text().collect::<String>()))
                .collect::<Vec<String>>()
        })
        .filter(|cells| !cells.is_empty())
        .collect();
    // A data table needs a header row and at least one data row.
    (rows.len() >= 2).then_some(TableData { rows })
}

fn inside(el: ElementRef<'_>, names: &[&str]) -> bool {
    el.ancestors().any(|a| {
        ElementRef::wrap(a).is_some_and(|e| names.contains(&e.value().name()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_rows_and_cells() {
        let html = r#"
            <table class="wikitable">
              <tr><th>Date</th><th>Deaths</th></tr>
              <tr><td>1912</td><td>1,500</td></tr>
            </table>"#;
        let doc = Document::parse(html);
        let tables = doc.data_tables();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].rows[0], vec!["Date", "Deaths"]);
        assert_eq!(tables[0].rows[1], vec!["1912", "1,500"]);
    }

    #[test]
    fn single_row_tables_are_not_data_tables() {
        let doc = Document::parse(r#"<table><tr><th>Only header</th></tr></table>"#);
        assert!(doc.data_tables().is_empty());
    }

    #[test]
    fn list_items_with_links_and_sections() {
        let html = r#"
            <h2>Mining</h2>
            <ul>
              <li><a href="/wiki/Pit_fire">Pit fire</a>, 12 deaths, 5 March 1912</li>
              <li>no link here</li>
            </ul>"#;
        let doc = Document::parse(html);
        let items = doc.list_items();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].link_href.as_deref(), Some("/wiki/Pit_fire"));
        assert_eq!(items[0].link_text.as_deref(), Some("Pit fire"));
        assert_eq!(items[0].section.as_deref(), Some("Mining"));
        assert!(items[0].text.contains("12 deaths"));
        assert!(items[1].link_href.is_none());
    }

    #[test]
    fn nav_and_table_lists_are_skipped() {
        let html = r#"
            <nav><ul><li><a href="/wiki/Nav_item">Nav item</a></li></ul></nav>
            <ul><li>real item</li></ul>"#;
        let doc = Document::parse(html);
        let items = doc.list_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].text, "real item");
    }

    #[test]
    fn paragraph_links_collect_trailing_text() {
        let html = r#"<p>
            <a href="/wiki/First_fire">First fire</a> killed 12 people in 1901, and
            <a href="/wiki/Second_flood">Second flood</a> followed a year later.
        </p>"#;
        let doc = Document::parse(html);
        let links = doc.paragraph_links();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].text, "First fire");
        assert!(links[0].trailing.contains("killed 12 people in 1901"));
        assert!(!links[0].trailing.contains("Second"));
        assert!(links[1].trailing.contains("followed a year later"));
    }

    #[test]
    fn external_links_are_not_candidates() {
        let html = r#"<p><a href="https://example.org">elsewhere</a> text</p>"#;
        let doc = Document::parse(html);
        assert!(doc.paragraph_links().is_empty());
    }

    #[test]
    fn content_root_preferred_when_present() {
        let html = r#"
            <div class="mw-parser-output"><p>inside</p></div>
            <footer><p>outside</p></footer>"#;
        let doc = Document::parse(html);
        assert_eq!(doc.main_text(), "inside");
    }
}
