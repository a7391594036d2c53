// src/sheet/mod.rs
//! Sheet sources: the fetch boundary, CSV parsing, and the TTL cache.

pub mod cache;
pub mod http;

pub use cache::SheetCache;
pub use self::http::HttpSheetFetcher;

use async_trait::async_trait;

use crate::error::SheetError;

/// Fetches the raw CSV export behind a sheet URL.
///
/// The cache owns parsing; implementors only deal with transport.
#[async_trait]
pub trait SheetFetcher: Send + Sync {
    async fn fetch_csv(&self, url: &str) -> Result<String, SheetError>;
}

/// One parsed record, keyed by the header row. Column order follows the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    cells: Vec<(String, String)>,
}

impl Row {
    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut row = Row::default();
        for (k, v) in pairs {
            row.set(k.into(), v.into());
        }
        row
    }

    /// Later duplicates of a column overwrite the earlier value in place.
    fn set(&mut self, column: String, value: String) {
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Parse a CSV export: first line is the header, quoted fields allowed,
/// blank lines skipped. A record whose width differs from the header is an error.
pub fn parse_csv(text: &str) -> Result<Vec<Row>, SheetError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();

    let mut rows = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        rows.push(Row::from_pairs(
            headers.iter().cloned().zip(rec.iter().map(str::to_string)),
        ));
    }
    Ok(rows)
}
