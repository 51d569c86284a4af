//! The scrape driver: concurrent page fetching, record assembly,
//! follow-up resolution, and the final merge.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::fetch::{self, Fetcher};
use crate::parser::{self, document::Document, list};
use crate::record::EventRecord;

/// Per-page result streamed back to the collector.
struct PageResult {
    url: String,
    records: Vec<EventRecord>,
    failed: bool,
}

/// Run stats returned after completion.
pub struct RunStats {
    pub pages: usize,
    pub failed_pages: usize,
    pub raw_records: usize,
}

/// Scrape pages concurrently, collecting each page's records as it
/// finishes. A failed page logs a warning and contributes nothing.
pub async fn scrape_pages(
    fetcher: Arc<Fetcher>,
    pages: Vec<String>,
    workers: usize,
) -> Result<(Vec<EventRecord>, RunStats)> {
    let semaphore = Arc::new(Semaphore::new(workers));
    let total = pages.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")?
            .progress_chars("=> "),
    );

    // Channel: workers send per-page results, main loop collects
    let (tx, mut rx) = tokio::sync::mpsc::channel::<PageResult>(workers * 2);

    for url in pages {
        let fetcher = Arc::clone(&fetcher);
        let sem = Arc::clone(&semaphore);
        let tx = tx.clone();

        tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();
            let result = match scrape_page(&fetcher, &url).await {
                Ok(records) => PageResult {
                    url,
                    records,
                    failed: false,
                },
                Err(e) => {
                    warn!("page failed for {}: {}", url, e);
                    PageResult {
                        url,
                        records: Vec::new(),
                        failed: true,
                    }
                }
            };
            let _ = tx.send(result).await;
        });
    }

    // Drop our copy of tx so rx closes when all spawned tasks finish
    drop(tx);

    let mut all = Vec::new();
    let mut failed = 0usize;
    while let Some(result) = rx.recv().await {
        if result.failed {
            failed += 1;
        } else {
            info!("{}: {} records", result.url, result.records.len());
        }
        all.extend(result.records);
        pb.inc(1);
    }
    pb.finish();

    let stats = RunStats {
        pages: total,
        failed_pages: failed,
        raw_records: all.len(),
    };
    Ok((all, stats))
}

/// Fetch and assemble one page, then resolve its follow-up fetches.
/// The parsed DOM is confined to non-async blocks; only the assembled
/// records cross an await point.
async fn scrape_page(fetcher: &Fetcher, url: &str) -> Result<Vec<EventRecord>> {
    let body = fetcher.get(url).await?;
    let mut outcome = {
        let doc = Document::parse(&body);
        parser::assemble(&doc, url)
    };

    let followups = std::mem::take(&mut outcome.followups);
    for followup in &followups {
        match fetcher.get(&followup.url).await {
            Ok(sub_body) => {
                let text = { Document::parse(&sub_body).main_text() };
                list::patch_followup(&mut outcome.records[followup.slot], followup, &text);
            }
            Err(e) => warn!("follow-up failed for {}: {}", followup.url, e),
        }
    }

    Ok(outcome.records)
}

/// Reassemble records from every cached page, in parallel, without
/// touching the network. Follow-ups only resolve against pages already
/// in the cache.
pub fn process_cached(cache_dir: &Path) -> Result<Vec<EventRecord>> {
    let entries = fetch::read_all_entries(cache_dir)?;
    info!("reprocessing {} cached pages", entries.len());

    let records: Vec<EventRecord> = entries
        .par_iter()
        .flat_map_iter(|entry| {
            let doc = Document::parse(&entry.body);
            parser::assemble(&doc, &entry.url).records
        })
        .collect();

    Ok(records)
}

/// Final dataset shape: duplicates removed, records without a resolved
/// death toll dropped, sorted by date then name.
pub fn merge(records: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen = HashSet::new();
    let mut merged: Vec<EventRecord> = records
        .into_iter()
        .filter(|r| r.death_toll.is_some())
        .filter(|r| seen.insert(r.clone()))
        .collect();
    merged.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event_name.cmp(&b.event_name)));
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{EventSubtype, EventType, UNKNOWN};

    fn record(name: &str, date: &str, toll: Option<u32>) -> EventRecord {
        EventRecord {
            death_toll: toll,
            event_name: name.to_string(),
            city: UNKNOWN.to_string(),
            country: UNKNOWN.to_string(),
            date: date.to_string(),
            details: String::new(),
            event_type: EventType::Nature,
            event_subtype: EventSubtype::Flood,
            source_url: "https://en.wikipedia.org/wiki/X".to_string(),
        }
    }

    #[test]
    fn merge_drops_exact_duplicates() {
        let a = record("flood", "1902-01-01", Some(40));
        let merged = merge(vec![a.clone(), a.clone(), a]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn merge_keeps_near_duplicates() {
        let a = record("flood", "1902-01-01", Some(40));
        let mut b = a.clone();
        b.death_toll = Some(41);
        assert_eq!(merge(vec![a, b]).len(), 2);
    }

    #[test]
    fn merge_drops_unresolved_tolls() {
        let merged = merge(vec![
            record("flood", "1902-01-01", Some(40)),
            record("mystery", "1903-01-01", None),
        ]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].event_name, "flood");
    }

    #[test]
    fn merge_sorts_by_date_then_name() {
        let merged = merge(vec![
            record("b", "1910-01-01", Some(1)),
            record("a", "1910-01-01", Some(2)),
            record("c", "1905-06-01", Some(3)),
        ]);
        let names: Vec<&str> = merged.iter().map(|r| r.event_name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
