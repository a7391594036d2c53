// src/sheet/http.rs
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;

use super::SheetFetcher;
use crate::error::SheetError;

/// reqwest-backed fetcher for published spreadsheet CSV exports.
#[derive(Clone)]
pub struct HttpSheetFetcher {
    client: Client,
}

impl HttpSheetFetcher {
    /// `timeout` bounds each whole request so one hung sheet can't stall a lookup forever.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent("fest-registration/0.1")
            .connect_timeout(timeout.min(Duration::from_secs(4)))
            .timeout(timeout)
            .build()
            .context("building sheet http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl SheetFetcher for HttpSheetFetcher {
    async fn fetch_csv(&self, url: &str) -> Result<String, SheetError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SheetError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(SheetError::Status(status.as_u16()));
        }

        resp.text()
            .await
            .map_err(|e| SheetError::Decode(e.to_string()))
    }
}
