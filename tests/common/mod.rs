// tests/common/mod.rs
// Scriptable in-memory SheetFetcher shared by integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use fest_registration::error::SheetError;
use fest_registration::sheet::SheetFetcher;

#[derive(Clone)]
struct Script {
    delay: Duration,
    body: Result<String, SheetError>,
}

#[derive(Default)]
pub struct StubFetcher {
    scripts: HashMap<String, Script>,
    calls: Mutex<Vec<String>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn csv(mut self, url: &str, body: &str) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script {
                delay: Duration::ZERO,
                body: Ok(body.to_string()),
            },
        );
        self
    }

    pub fn slow_csv(mut self, url: &str, delay: Duration, body: &str) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script {
                delay,
                body: Ok(body.to_string()),
            },
        );
        self
    }

    pub fn failing(mut self, url: &str, err: SheetError) -> Self {
        self.scripts.insert(
            url.to_string(),
            Script {
                delay: Duration::ZERO,
                body: Err(err),
            },
        );
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SheetFetcher for StubFetcher {
    async fn fetch_csv(&self, url: &str) -> Result<String, SheetError> {
        self.calls.lock().unwrap().push(url.to_string());
        let script = self
            .scripts
            .get(url)
            .cloned()
            .unwrap_or(Script {
                delay: Duration::ZERO,
                body: Err(SheetError::Status(404)),
            });
        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        }
        script.body
    }
}
