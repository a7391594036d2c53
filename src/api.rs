// src/api.rs
use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::{load_events_default, EventSource, Settings};
use crate::error::LookupError;
use crate::lookup::{EventListing, MatchedEvent, RegistrationLookup, SourceReport};
use crate::sheet::{HttpSheetFetcher, SheetCache, SheetFetcher};

#[derive(Clone)]
pub struct AppState {
    pub lookup: Arc<RegistrationLookup>,
}

impl AppState {
    pub fn new(lookup: RegistrationLookup) -> Self {
        Self {
            lookup: Arc::new(lookup),
        }
    }

    /// Wire a lookup engine over any fetcher (tests pass stubs here).
    pub fn with_fetcher(
        events: Vec<EventSource>,
        fetcher: Arc<dyn SheetFetcher>,
        settings: &Settings,
    ) -> Self {
        let cache = Arc::new(SheetCache::new(fetcher, settings.cache_ttl));
        Self::new(RegistrationLookup::new(events, cache))
    }

    /// Roster from env/config, fetching over HTTP.
    pub fn from_env(settings: &Settings) -> Result<Self> {
        let events = load_events_default()?;
        let fetcher = Arc::new(HttpSheetFetcher::new(settings.fetch_timeout)?);
        Ok(Self::with_fetcher(events, fetcher, settings))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/check-registration", post(check_registration))
        .route("/events", get(list_events))
        .route("/debug", get(debug_sources))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

impl IntoResponse for LookupError {
    fn into_response(self) -> Response {
        match self {
            LookupError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": msg }))).into_response()
            }
        }
    }
}

#[derive(serde::Deserialize)]
struct CheckReq {
    #[serde(rename = "searchValue", default)]
    search_value: Option<Value>,
}

#[derive(serde::Serialize)]
struct CheckResp {
    #[serde(rename = "searchValue")]
    search_value: String,
    #[serde(rename = "registeredEvents")]
    registered_events: Vec<MatchedEvent>,
    #[serde(rename = "totalRegistrations")]
    total_registrations: usize,
}

/// Bad JSON, absent field and non-text values all read as "no search value".
fn search_value_of(body: Result<Json<CheckReq>, JsonRejection>) -> String {
    match body.ok().and_then(|Json(b)| b.search_value) {
        Some(Value::String(s)) => s,
        // phone numbers sometimes arrive unquoted
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

async fn check_registration(
    State(state): State<AppState>,
    body: Result<Json<CheckReq>, JsonRejection>,
) -> Result<Json<CheckResp>, LookupError> {
    let search_value = search_value_of(body);
    let res = state.lookup.check_registration(&search_value).await?;
    Ok(Json(CheckResp {
        search_value,
        registered_events: res.matched_events,
        total_registrations: res.total_count,
    }))
}

#[derive(serde::Serialize)]
struct EventsResp {
    events: Vec<EventListing>,
}

async fn list_events(State(state): State<AppState>) -> Json<EventsResp> {
    Json(EventsResp {
        events: state.lookup.list_events(),
    })
}

#[derive(serde::Serialize)]
struct DebugResp {
    debug: Vec<SourceReport>,
}

async fn debug_sources(State(state): State<AppState>) -> Json<DebugResp> {
    Json(DebugResp {
        debug: state.lookup.debug_sources().await,
    })
}
