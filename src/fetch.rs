//! HTTP fetching with an on-disk page cache.
//!
//! Every fetched page lands in the cache directory as one JSON file, so
//! reruns and the offline `process` subcommand never touch the network
//! for pages already seen.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;
const BASE_BACKOFF_MS: u64 = 2000;
const REQUEST_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("disaster_scraper/", env!("CARGO_PKG_VERSION"));

/// One cached page: the URL, when it was fetched, and the raw body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CacheEntry {
    pub url: String,
    pub fetched_at: i64,
    pub body: String,
}

pub struct Fetcher {
    client: reqwest::Client,
    cache_dir: PathBuf,
    ttl_secs: i64,
}

impl Fetcher {
    pub fn new(cache_dir: impl Into<PathBuf>, ttl_secs: i64) -> Result<Self> {
        let cache_dir = cache_dir.into();
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("creating cache dir {}", cache_dir.display()))?;
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .context("building HTTP client")?;
        Ok(Fetcher {
            client,
            cache_dir,
            ttl_secs,
        })
    }

    /// Fetch a page body, preferring a fresh cache entry over the
    /// network. A live fetch rewrites the cache entry.
    pub async fn get(&self, url: &str) -> Result<String> {
        if let Some(entry) = self.read_cache(url) {
            if is_fresh(&entry, Utc::now().timestamp(), self.ttl_secs) {
                debug!(url, "cache hit");
                return Ok(entry.body);
            }
        }

        let body = self.fetch_with_retry(url).await?;
        self.write_cache(url, &body)?;
        Ok(body)
    }

    async fn fetch_with_retry(&self, url: &str) -> Result<String> {
        for attempt in 0..=MAX_RETRIES {
            match self.fetch_once(url).await {
                Ok(body) => return Ok(body),
                Err(FetchError::Retryable(status)) if attempt < MAX_RETRIES => {
                    let backoff = Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt));
                    warn!(
                        "{} on {} (attempt {}/{}), backing off {:.1}s",
                        status,
                        url,
                        attempt + 1,
                        MAX_RETRIES,
                        backoff.as_secs_f64()
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(FetchError::Retryable(status)) => {
                    anyhow::bail!("{url}: still {status} after {MAX_RETRIES} retries")
                }
                Err(FetchError::Fatal(e)) => return Err(e),
            }
        }
        unreachable!("retry loop always returns")
    }

    async fn fetch_once(&self, url: &str) -> std::result::Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Fatal(e.into()))?;
        let status = response.status();
        if status.as_u16() == 429 || status.is_server_error() {
            return Err(FetchError::Retryable(status));
        }
        if !status.is_success() {
            return Err(FetchError::Fatal(anyhow::anyhow!("{url}: HTTP {status}")));
        }
        response.text().await.map_err(|e| FetchError::Fatal(e.into()))
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", sanitize_url(url)))
    }

    fn read_cache(&self, url: &str) -> Option<CacheEntry> {
        let raw = std::fs::read_to_string(self.cache_path(url)).ok()?;
        match serde_json::from_str(&raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(url, "discarding unreadable cache entry: {e}");
                None
            }
        }
    }

    fn write_cache(&self, url: &str, body: &str) -> Result<()> {
        let entry = CacheEntry {
            url: url.to_string(),
            fetched_at: Utc::now().timestamp(),
            body: body.to_string(),
        };
        let path = self.cache_path(url);
        std::fs::write(&path, serde_json::to_string(&entry)?)
            .with_context(|| format!("writing cache entry {}", path.display()))?;
        Ok(())
    }
}

enum FetchError {
    Retryable(reqwest::StatusCode),
    Fatal(anyhow::Error),
}

fn is_fresh(entry: &CacheEntry, now: i64, ttl_secs: i64) -> bool {
    now - entry.fetched_at < ttl_secs
}

/// Flatten a URL into a filesystem-safe cache file stem.
fn sanitize_url(url: &str) -> String {
    url.trim_start_matches("https://")
        .trim_start_matches("http://")
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Read every entry in a cache directory, for offline reprocessing.
pub fn read_all_entries(cache_dir: &Path) -> Result<Vec<CacheEntry>> {
    let mut entries = Vec::new();
    for dirent in std::fs::read_dir(cache_dir)
        .with_context(|| format!("reading cache dir {}", cache_dir.display()))?
    {
        let path = dirent?.path();
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }
        let raw = std::fs::read_to_string(&path)?;
        match serde_json::from_str(&raw) {
            Ok(entry) => entries.push(entry),
            Err(e) => warn!("skipping {}: {e}", path.display()),
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn freshness_window() {
        let entry = CacheEntry {
            url: "https://en.wikipedia.org/wiki/X".into(),
            fetched_at: 1000,
            body: String::new(),
        };
        assert!(is_fresh(&entry, 1500, 600));
        assert!(!is_fresh(&entry, 1700, 600));
        assert!(!is_fresh(&entry, 1600, 600));
    }

    #[test]
    fn sanitized_stems_are_flat() {
        let stem = sanitize_url("https://en.wikipedia.org/wiki/List_of_disasters");
        assert!(!stem.contains('/'));
        assert!(!stem.contains(':'));
        assert!(stem.starts_with("en_wikipedia_org"));
    }

    #[test]
    fn cache_round_trip() {
        let dir = std::env::temp_dir().join("disaster_scraper_cache_test");
        let _ = std::fs::remove_dir_all(&dir);
        let fetcher = Fetcher::new(&dir, 3600).unwrap();
        fetcher.write_cache("https://en.wikipedia.org/wiki/X", "<html>x</html>").unwrap();
        let entry = fetcher.read_cache("https://en.wikipedia.org/wiki/X").unwrap();
        assert_eq!(entry.body, "<html>x</html>");
        let all = read_all_entries(&dir).unwrap();
        assert_eq!(all.len(), 1);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
