// src/lookup.rs
//! Registration lookup across every configured event sheet.
//!
//! One branch per event runs concurrently; results are joined in roster
//! order, so the answer never depends on which sheet responded first.

use std::sync::Arc;

use futures::future::join_all;
use metrics::counter;
use serde::Serialize;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{info, warn};

use crate::config::EventSource;
use crate::error::LookupError;
use crate::matching::{sheet_matches, SearchKey};
use crate::sheet::SheetCache;

pub const MISSING_SEARCH_MSG: &str = "Enter email or mobile number";
pub const STATUS_REGISTERED: &str = "Registered";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedEvent {
    pub name: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResult {
    pub matched_events: Vec<MatchedEvent>,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventListing {
    pub name: String,
    #[serde(rename = "hasSheet")]
    pub has_source: bool,
}

/// Outcome of probing one source for `/debug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status")]
pub enum SourceReport {
    #[serde(rename = "OK")]
    Ok {
        name: String,
        #[serde(rename = "rowCount")]
        row_count: usize,
        columns: Vec<String>,
    },
    #[serde(rename = "ERROR")]
    Error { name: String, error: String },
}

pub struct RegistrationLookup {
    events: Arc<[EventSource]>,
    cache: Arc<SheetCache>,
}

impl RegistrationLookup {
    pub fn new(events: Vec<EventSource>, cache: Arc<SheetCache>) -> Self {
        Self {
            events: events.into(),
            cache,
        }
    }

    pub fn events(&self) -> &[EventSource] {
        &self.events
    }

    pub fn cache(&self) -> &Arc<SheetCache> {
        &self.cache
    }

    /// Every event whose sheet contains `search_value`, in roster order.
    ///
    /// Only a blank search fails; sheet errors are logged and count as "no match".
    pub async fn check_registration(&self, search_value: &str) -> Result<LookupResult, LookupError> {
        let key = SearchKey::new(search_value)
            .ok_or_else(|| LookupError::Validation(MISSING_SEARCH_MSG.to_string()))?;
        counter!("registration_lookups_total").increment(1);

        // join_all yields outputs in input order regardless of completion order
        let hits = join_all(self.events.iter().map(|ev| self.event_matches(ev, &key))).await;

        let matched_events: Vec<MatchedEvent> = self
            .events
            .iter()
            .zip(hits)
            .filter(|(_, hit)| *hit)
            .map(|(ev, _)| MatchedEvent {
                name: ev.name.clone(),
                status: STATUS_REGISTERED,
            })
            .collect();

        counter!("registration_matches_total").increment(matched_events.len() as u64);
        info!(
            target: "lookup",
            id = %key.fingerprint(),
            matched = matched_events.len(),
            "registration lookup"
        );

        let total_count = matched_events.len();
        Ok(LookupResult {
            matched_events,
            total_count,
        })
    }

    async fn event_matches(&self, ev: &EventSource, key: &SearchKey) -> bool {
        match self.cache.get(&ev.url).await {
            Ok(rows) => sheet_matches(key, &rows),
            Err(e) => {
                warn!(target: "lookup", event = %ev.name, error = %e, "sheet unavailable, skipping");
                false
            }
        }
    }

    /// Roster with wiring status. No network access.
    pub fn list_events(&self) -> Vec<EventListing> {
        self.events
            .iter()
            .map(|ev| EventListing {
                name: ev.name.clone(),
                has_source: ev.has_source(),
            })
            .collect()
    }

    /// Probe every source through the cache and report row count + columns or the error.
    pub async fn debug_sources(&self) -> Vec<SourceReport> {
        let probes = self.events.iter().map(|ev| async move {
            match self.cache.get(&ev.url).await {
                Ok(rows) => SourceReport::Ok {
                    name: ev.name.clone(),
                    row_count: rows.len(),
                    columns: rows
                        .first()
                        .map(|r| r.columns().map(str::to_string).collect())
                        .unwrap_or_default(),
                },
                Err(e) => SourceReport::Error {
                    name: ev.name.clone(),
                    error: e.to_string(),
                },
            }
        });
        join_all(probes).await
    }

    /// Fetch every wired-up source in the background. Does not block the caller;
    /// each outcome is logged as its task finishes.
    pub fn warm(&self) -> JoinHandle<()> {
        let mut set = JoinSet::new();
        for ev in self.events.iter().filter(|ev| ev.has_source()) {
            let cache = Arc::clone(&self.cache);
            let ev = ev.clone();
            set.spawn(async move {
                let res = cache.fetch_and_store(&ev.url).await;
                (ev.name, res.map(|rows| rows.len()))
            });
        }

        tokio::spawn(async move {
            while let Some(joined) = set.join_next().await {
                match joined {
                    Ok((name, Ok(rows))) => {
                        info!(target: "lookup", event = %name, rows, "sheet pre-warmed")
                    }
                    Ok((name, Err(e))) => {
                        warn!(target: "lookup", event = %name, error = %e, "pre-warm failed")
                    }
                    Err(e) => warn!(target: "lookup", error = %e, "pre-warm task aborted"),
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;
    use crate::sheet::SheetFetcher;
    use async_trait::async_trait;
    use std::time::Duration;

    struct Fixed;

    #[async_trait]
    impl SheetFetcher for Fixed {
        async fn fetch_csv(&self, url: &str) -> Result<String, SheetError> {
            match url {
                "https://x/ok.csv" => Ok("Email,Phone\na@x.io,123\n".into()),
                _ => Err(SheetError::Status(500)),
            }
        }
    }

    fn engine(events: Vec<EventSource>) -> RegistrationLookup {
        let cache = Arc::new(SheetCache::new(Arc::new(Fixed), Duration::from_secs(60)));
        RegistrationLookup::new(events, cache)
    }

    #[tokio::test]
    async fn blank_search_is_a_validation_error() {
        let e = engine(vec![EventSource::new("A", "https://x/ok.csv")]);
        let err = e.check_registration("   ").await.unwrap_err();
        assert_eq!(err, LookupError::Validation(MISSING_SEARCH_MSG.into()));
        assert!(e.cache().is_empty());
    }

    #[tokio::test]
    async fn failing_source_does_not_hide_others() {
        let e = engine(vec![
            EventSource::new("Broken", "https://x/broken.csv"),
            EventSource::new("Good", "https://x/ok.csv"),
        ]);
        let res = e.check_registration("A@X.io").await.unwrap();
        assert_eq!(res.total_count, 1);
        assert_eq!(res.matched_events[0].name, "Good");
        assert_eq!(res.matched_events[0].status, STATUS_REGISTERED);
    }

    #[test]
    fn list_events_reports_wiring_without_fetching() {
        let e = engine(vec![
            EventSource::new("A", "https://x/ok.csv"),
            EventSource::new("B", ""),
            EventSource::new("C", "YOUR_C_URL"),
        ]);
        let listed = e.list_events();
        assert_eq!(
            listed.iter().map(|l| l.has_source).collect::<Vec<_>>(),
            vec![true, false, false]
        );
        assert!(e.cache().is_empty());
    }

    #[test]
    fn source_report_serializes_with_status_tag() {
        let ok = SourceReport::Ok {
            name: "A".into(),
            row_count: 2,
            columns: vec!["Email".into()],
        };
        let v = serde_json::to_value(&ok).unwrap();
        assert_eq!(
            v,
            serde_json::json!({"status": "OK", "name": "A", "rowCount": 2, "columns": ["Email"]})
        );

        let err = SourceReport::Error {
            name: "B".into(),
            error: "Failed to fetch sheet (500)".into(),
        };
        let v = serde_json::to_value(&err).unwrap();
        assert_eq!(v["status"], "ERROR");
        assert_eq!(v["error"], "Failed to fetch sheet (500)");
    }
}
