//! Discovery of the per-country and per-kind list pages reachable from
//! the root index.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use anyhow::Result;
use scraper::{Html, Selector};
use tracing::info;

use crate::fetch::Fetcher;

pub const ORIGIN: &str = "https://en.wikipedia.org";

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Fetch the root index and collect the disaster list pages it links
/// to, deduplicated and sorted.
pub async fn discover_pages(fetcher: &Fetcher, root_url: &str) -> Result<Vec<String>> {
    let body = fetcher.get(root_url).await?;
    let pages = extract_list_links(&body);
    info!("discovered {} list pages from {root_url}", pages.len());
    Ok(pages)
}

fn extract_list_links(html: &str) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut seen = BTreeSet::new();
    for anchor in doc.select(&ANCHOR_SEL) {
        let Some(href) = anchor.value().attr("href") else { continue };
        if !is_list_page(href) {
            continue;
        }
        let url = if href.starts_with('/') {
            format!("{ORIGIN}{href}")
        } else {
            href.to_string()
        };
        seen.insert(url);
    }
    seen.into_iter().collect()
}

fn is_list_page(href: &str) -> bool {
    href.contains("/wiki/List_of_") && href.to_lowercase().contains("disaster")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_links_are_kept_and_absolutized() {
        let html = r#"
            <a href="/wiki/List_of_disasters_in_Sweden_by_death_toll">Sweden</a>
            <a href="/wiki/List_of_maritime_disasters">Maritime</a>
            <a href="/wiki/Sweden">Sweden article</a>
            <a href="/wiki/List_of_countries">Countries</a>
            <a href="https://example.org/other">off-site</a>"#;
        let links = extract_list_links(html);
        assert_eq!(
            links,
            vec![
                "https://en.wikipedia.org/wiki/List_of_disasters_in_Sweden_by_death_toll",
                "https://en.wikipedia.org/wiki/List_of_maritime_disasters",
            ]
        );
    }

    #[test]
    fn duplicates_collapse() {
        let html = r#"
            <a href="/wiki/List_of_disasters_in_Japan_by_death_toll">a</a>
            <a href="/wiki/List_of_disasters_in_Japan_by_death_toll">b</a>"#;
        assert_eq!(extract_list_links(html).len(), 1);
    }
}
