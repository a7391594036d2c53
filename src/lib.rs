// src/lib.rs
// Public library surface for integration tests and the Shuttle binary.

pub mod api;
pub mod config;
pub mod error;
pub mod lookup;
pub mod matching;
pub mod metrics;
pub mod sheet;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::error::{LookupError, SheetError};
pub use crate::lookup::{LookupResult, RegistrationLookup};
