use std::time::Duration;

use anyhow::{Context, Result};

use crate::usecase::ports::storage::SnapshotSource;

pub struct HttpSnapshot {
    url: String,
}

impl HttpSnapshot {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl SnapshotSource for HttpSnapshot {
    fn describe(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> Result<Vec<u8>> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("failed to build http client")?;
        let response = client
            .get(&self.url)
            .send()
            .with_context(|| format!("request failed: {}", self.url))?
            .error_for_status()
            .with_context(|| format!("server rejected request: {}", self.url))?;
        let bytes = response
            .bytes()
            .with_context(|| format!("failed to read response body: {}", self.url))?;
        Ok(bytes.to_vec())
    }
}
