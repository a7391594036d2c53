// src/config/mod.rs
//! Runtime configuration: the event roster and lookup tunables.

pub mod events;

use std::time::Duration;

pub use events::{load_events_default, load_events_from, EventSource};

// --- env names & defaults ---
pub const ENV_CACHE_TTL_SECS: &str = "SHEET_CACHE_TTL_SECS";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "SHEET_FETCH_TIMEOUT_SECS";
pub const ENV_PREWARM: &str = "SHEET_PREWARM";

pub const DEFAULT_CACHE_TTL_SECS: u64 = 5 * 60;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 10;

/// Tunables for the sheet cache and fetcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub cache_ttl: Duration,
    pub fetch_timeout: Duration,
    pub prewarm: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            prewarm: true,
        }
    }
}

impl Settings {
    /// Read tunables from the environment; unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        let ttl = parse_secs_env(std::env::var(ENV_CACHE_TTL_SECS).ok())
            .unwrap_or(DEFAULT_CACHE_TTL_SECS);
        // zero timeout would fail every fetch
        let timeout = parse_secs_env(std::env::var(ENV_FETCH_TIMEOUT_SECS).ok())
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_FETCH_TIMEOUT_SECS);
        let prewarm = parse_flag_env(std::env::var(ENV_PREWARM).ok()).unwrap_or(true);

        Self {
            cache_ttl: Duration::from_secs(ttl),
            fetch_timeout: Duration::from_secs(timeout),
            prewarm,
        }
    }
}

fn parse_secs_env(raw: Option<String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

fn parse_flag_env(raw: Option<String>) -> Option<bool> {
    let v = raw?.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
