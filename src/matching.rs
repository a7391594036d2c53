// src/matching.rs
//! Registration matching: decides whether a search value (email or phone)
//! appears anywhere in a sheet row.
//!
//! Both sides are normalized two ways and a cell matches on either:
//! - `lower`: trimmed + lowercased (emails compare case-insensitively)
//! - `clean`: whitespace, hyphens and parentheses stripped, case kept
//!   (phones compare regardless of formatting)
//!
//! Every column is scanned; there is no notion of an "email column".

use once_cell::sync::Lazy;
use regex::Regex;

use crate::sheet::Row;

static RE_PHONE_PUNCT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-()]").expect("phone punctuation regex"));

/// Trimmed, lowercased form.
pub fn normalize_lower(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Form with whitespace, `-`, `(` and `)` removed.
pub fn normalize_clean(s: &str) -> String {
    RE_PHONE_PUNCT.replace_all(s, "").into_owned()
}

/// Pre-normalized search value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchKey {
    lower: String,
    clean: String,
}

impl SearchKey {
    /// `None` when nothing is left to search for after trimming.
    pub fn new(raw: &str) -> Option<Self> {
        let lower = normalize_lower(raw);
        if lower.is_empty() {
            return None;
        }
        Some(Self {
            lower,
            clean: normalize_clean(raw),
        })
    }

    pub fn lower(&self) -> &str {
        &self.lower
    }

    pub fn clean(&self) -> &str {
        &self.clean
    }

    pub fn matches_cell(&self, cell: &str) -> bool {
        if normalize_lower(cell) == self.lower {
            return true;
        }
        // a search made only of punctuation must not match every blank cell
        !self.clean.is_empty() && normalize_clean(cell) == self.clean
    }

    /// Short, non-reversible id for logs. Raw search values are never logged.
    pub fn fingerprint(&self) -> String {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(self.lower.as_bytes());
        let mut out = String::with_capacity(12);
        for b in digest.iter().take(6) {
            use std::fmt::Write as _;
            let _ = write!(&mut out, "{:02x}", b);
        }
        out
    }
}

pub fn row_matches(key: &SearchKey, row: &Row) -> bool {
    row.values().any(|cell| key.matches_cell(cell))
}

/// True if at least one row matches.
pub fn sheet_matches(key: &SearchKey, rows: &[Row]) -> bool {
    rows.iter().any(|row| row_matches(key, row))
}
