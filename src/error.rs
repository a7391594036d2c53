// src/error.rs
//! Error taxonomy for sheet sources and registration lookups.
//!
//! Sheet errors never leave the lookup engine except through `/debug`,
//! so their `Display` text is what operators read there.

use thiserror::Error;

/// Per-source failure while fetching or parsing a sheet export.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SheetError {
    /// Remote answered with a non-2xx status.
    #[error("Failed to fetch sheet ({0})")]
    Status(u16),
    /// Connection, TLS, or timeout failure before a status was received.
    #[error("Failed to reach sheet: {0}")]
    Transport(String),
    /// Body could not be read as text.
    #[error("Failed to read sheet body: {0}")]
    Decode(String),
    /// Body is not well-formed CSV.
    #[error("Failed to parse sheet: {0}")]
    Parse(String),
}

impl SheetError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SheetError::Status(_) => "status",
            SheetError::Transport(_) => "transport",
            SheetError::Decode(_) => "decode",
            SheetError::Parse(_) => "parse",
        }
    }
}

impl From<csv::Error> for SheetError {
    fn from(e: csv::Error) -> Self {
        SheetError::Parse(e.to_string())
    }
}

/// Errors that fail a whole lookup request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("{0}")]
    Validation(String),
}
