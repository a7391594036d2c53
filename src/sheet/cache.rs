// src/sheet/cache.rs
//! Per-URL TTL cache over a [`SheetFetcher`].
//!
//! Staleness is checked lazily on read; nothing is evicted in the background.
//! An entry is replaced whole after a successful fetch, so readers see either
//! the previous rows or the new ones, never a mix.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use metrics::{counter, histogram};
use tokio::time::Instant;

use super::{parse_csv, Row, SheetFetcher};
use crate::config::events::is_wired_url;
use crate::error::SheetError;

/// Shared, immutable snapshot of a sheet's rows.
pub type Rows = Arc<Vec<Row>>;

#[derive(Clone)]
struct CacheEntry {
    fetched_at: Instant,
    rows: Rows,
}

pub struct SheetCache {
    fetcher: Arc<dyn SheetFetcher>,
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl SheetCache {
    pub fn new(fetcher: Arc<dyn SheetFetcher>, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Rows for `url`, served from cache while fresh, refetched otherwise.
    /// Blank or placeholder URLs yield no rows and no network call.
    pub async fn get(&self, url: &str) -> Result<Rows, SheetError> {
        if !is_wired_url(url) {
            return Ok(Arc::new(Vec::new()));
        }
        let key = url.trim();

        if let Some(rows) = self.fresh(key) {
            counter!("sheet_cache_hits_total").increment(1);
            return Ok(rows);
        }

        counter!("sheet_cache_misses_total").increment(1);
        self.fetch_and_store(key).await
    }

    /// Unconditionally fetch, parse, and replace the entry for `url`.
    /// On failure the previous entry (if any) is left untouched.
    pub async fn fetch_and_store(&self, url: &str) -> Result<Rows, SheetError> {
        if !is_wired_url(url) {
            return Ok(Arc::new(Vec::new()));
        }
        let key = url.trim();

        let t0 = std::time::Instant::now();
        let result = match self.fetcher.fetch_csv(key).await {
            Ok(body) => parse_csv(&body),
            Err(e) => Err(e),
        };
        histogram!("sheet_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        let rows = match result {
            Ok(rows) => Arc::new(rows),
            Err(e) => {
                counter!("sheet_fetch_errors_total", "kind" => e.kind()).increment(1);
                return Err(e);
            }
        };

        tracing::debug!(
            target: "sheet",
            url = key,
            rows = rows.len(),
            "sheet fetched"
        );

        self.write().insert(
            key.to_string(),
            CacheEntry {
                fetched_at: Instant::now(),
                rows: Arc::clone(&rows),
            },
        );
        Ok(rows)
    }

    /// Number of stored entries, fresh or stale.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn fresh(&self, key: &str) -> Option<Rows> {
        let entries = self.read();
        let entry = entries.get(key)?;
        (entry.fetched_at.elapsed() < self.ttl).then(|| Arc::clone(&entry.rows))
    }

    // Guards are never held across an await, so a poisoned lock still holds a whole entry.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, CacheEntry>> {
        match self.entries.read() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, CacheEntry>> {
        match self.entries.write() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}
