//! Fest registration service — Binary Entrypoint
//! Boots the Axum HTTP server, wiring routes, shared state, and the sheet pre-warm.

use fest_registration::{api, config::Settings, metrics::Metrics};
use shuttle_axum::ShuttleAxum;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fest_registration=info,warn"));

    // Shuttle may already have installed a subscriber; keep theirs if so.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let settings = Settings::from_env();
    let state = api::AppState::from_env(&settings)?;

    let events = state.lookup.events();
    info!(
        events = events.len(),
        wired = events.iter().filter(|e| e.has_source()).count(),
        ttl_secs = settings.cache_ttl.as_secs(),
        "registration lookup configured"
    );

    // Warm in the background; readiness never waits on remote sheets.
    if settings.prewarm {
        let _warm = state.lookup.warm();
    }

    let mut router = api::router(state);
    match Metrics::init(settings.cache_ttl.as_secs()) {
        Ok(m) => router = router.merge(m.router()),
        Err(e) => warn!(error = ?e, "metrics disabled"),
    }

    Ok(router.into())
}
