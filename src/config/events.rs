// src/config/events.rs
use anyhow::{anyhow, bail, Context, Result};
use serde::Serialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_PATH: &str = "EVENTS_CONFIG_PATH";
pub const DEFAULT_EVENTS_PATH: &str = "config/events.toml";

/// Template value left in `.env.example`; treated the same as an empty URL.
pub const PLACEHOLDER_PREFIX: &str = "YOUR_";

/// Built-in roster: (event name, env var holding its CSV export URL).
pub const DEFAULT_ROSTER: &[(&str, &str)] = &[
    ("Hardware Expo", "HARDWARE_EXPO_CSV"),
    ("Paper Presentation", "PAPER_PRESENTATION_CSV"),
    ("Robo Wars", "ROBO_WARS_CSV"),
    ("Digital Hackathon", "DIGITAL_HACKATHON_CSV"),
    ("Fun Events", "FUN_EVENTS_CSV"),
];

/// One event and the sheet export its registrations live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventSource {
    pub name: String,
    /// May be empty or a placeholder when the sheet isn't wired up yet.
    pub url: String,
}

impl EventSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    pub fn has_source(&self) -> bool {
        is_wired_url(&self.url)
    }
}

/// True iff `url` is neither blank nor a placeholder.
pub fn is_wired_url(url: &str) -> bool {
    let t = url.trim();
    !t.is_empty() && !t.starts_with(PLACEHOLDER_PREFIX)
}

/// Built-in roster with URLs resolved from the environment (missing var => empty URL).
pub fn default_roster() -> Vec<EventSource> {
    DEFAULT_ROSTER
        .iter()
        .map(|(name, var)| EventSource::new(*name, std::env::var(var).unwrap_or_default()))
        .collect()
}

/// Load the roster from an explicit TOML file.
pub fn load_events_from(path: &Path) -> Result<Vec<EventSource>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading events from {}", path.display()))?;
    parse_events(&content).with_context(|| format!("parsing events in {}", path.display()))
}

/// Load the roster using env var + fallbacks:
/// 1) $EVENTS_CONFIG_PATH
/// 2) config/events.toml
/// 3) built-in roster
pub fn load_events_default() -> Result<Vec<EventSource>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_events_from(&pb);
        } else {
            return Err(anyhow!("EVENTS_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_EVENTS_PATH);
    if toml_p.exists() {
        return load_events_from(&toml_p);
    }
    Ok(default_roster())
}

fn parse_events(s: &str) -> Result<Vec<EventSource>> {
    #[derive(serde::Deserialize)]
    struct EventsFile {
        events: Vec<EventEntry>,
    }
    #[derive(serde::Deserialize)]
    struct EventEntry {
        name: String,
        #[serde(default)]
        url: Option<String>,
        #[serde(default)]
        url_env: Option<String>,
    }

    let file: EventsFile = toml::from_str(s)?;
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(file.events.len());
    for e in file.events {
        let name = e.name.trim().to_string();
        if name.is_empty() {
            bail!("event with blank name");
        }
        if !seen.insert(name.clone()) {
            bail!("duplicate event name '{name}'");
        }
        // literal url wins over url_env
        let url = match e.url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            Some(u) => u,
            None => e
                .url_env
                .and_then(|var| std::env::var(var.trim()).ok())
                .map(|u| u.trim().to_string())
                .unwrap_or_default(),
        };
        out.push(EventSource { name, url });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_urls_are_not_wired() {
        assert!(!is_wired_url(""));
        assert!(!is_wired_url("   "));
        assert!(!is_wired_url("YOUR_ROBO_WARS_CSV_URL"));
        assert!(is_wired_url("https://docs.google.com/spreadsheets/d/x/pub?output=csv"));
        assert!(EventSource::new("A", "https://x/a.csv").has_source());
        assert!(!EventSource::new("A", "").has_source());
    }

    #[test]
    fn parse_keeps_order_and_prefers_literal_url() {
        let toml = r#"
[[events]]
name = " Robo Wars "
url = "https://x/robo.csv"
url_env = "SOME_UNSET_VAR_FOR_TEST"

[[events]]
name = "Fun Events"
"#;
        let evs = parse_events(toml).unwrap();
        assert_eq!(
            evs,
            vec![
                EventSource::new("Robo Wars", "https://x/robo.csv"),
                EventSource::new("Fun Events", ""),
            ]
        );
    }

    #[test]
    fn parse_rejects_duplicates_and_blank_names() {
        let dup = r#"
[[events]]
name = "A"
[[events]]
name = "A "
"#;
        assert!(parse_events(dup).is_err());

        let blank = r#"
[[events]]
name = "  "
"#;
        assert!(parse_events(blank).is_err());
    }

    #[serial_test::serial]
    #[test]
    fn default_roster_reads_env_urls() {
        std::env::set_var("ROBO_WARS_CSV", "https://x/robo.csv");
        std::env::remove_var("FUN_EVENTS_CSV");
        let roster = default_roster();
        assert_eq!(roster.len(), 5);
        assert_eq!(roster[0].name, "Hardware Expo");
        assert_eq!(roster[2].url, "https://x/robo.csv");
        assert_eq!(roster[4].url, "");
        std::env::remove_var("ROBO_WARS_CSV");
    }
}
