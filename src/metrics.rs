// src/metrics.rs
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use metrics::{describe_counter, describe_gauge, describe_histogram, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

pub struct Metrics {
    pub handle: PrometheusHandle,
}

impl Metrics {
    /// Install the Prometheus recorder and publish the sheet cache TTL as a static gauge.
    /// Call once per process; a second install fails.
    pub fn init(ttl_secs: u64) -> Result<Self> {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("prometheus: install recorder")?;

        describe_all();
        gauge!("sheet_cache_ttl_secs").set(ttl_secs as f64);

        Ok(Self { handle })
    }

    /// Returns a router exposing `/metrics` with the Prometheus exposition format.
    pub fn router(&self) -> Router {
        let handle = self.handle.clone();
        Router::new().route(
            "/metrics",
            get(move || {
                let h = handle.clone();
                async move { h.render() }
            }),
        )
    }
}

fn describe_all() {
    describe_counter!("sheet_cache_hits_total", "Sheet reads served from cache.");
    describe_counter!(
        "sheet_cache_misses_total",
        "Sheet reads that needed a fetch (absent or stale entry)."
    );
    describe_counter!(
        "sheet_fetch_errors_total",
        "Sheet fetch/parse failures by kind."
    );
    describe_counter!("registration_lookups_total", "Registration lookups served.");
    describe_counter!(
        "registration_matches_total",
        "Events matched across all lookups."
    );
    describe_histogram!("sheet_fetch_ms", "Sheet fetch + parse time in milliseconds.");
    describe_gauge!("sheet_cache_ttl_secs", "Configured sheet cache TTL.");
}
