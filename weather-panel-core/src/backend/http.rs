use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::model::{LocationEnvelope, Units, WeatherEnvelope};

use super::WeatherBackend;

/// Backend reached over HTTP at `{base_url}/api/...`.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { base_url: base_url.trim().trim_end_matches('/').to_string(), http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `path` and decode the JSON body regardless of status code; the
    /// backend puts its error message in the body of 4xx/5xx responses.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to {url}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {url}"))?;

        debug!(%status, bytes = body.len(), "backend responded");

        serde_json::from_str(&body).map_err(|e| {
            anyhow!(
                "Failed to parse JSON from {url} (status {status}): {e}: {}",
                truncate_body(&body)
            )
        })
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    #[instrument(skip(self))]
    async fn weather(&self, location: &str, units: Units) -> Result<WeatherEnvelope> {
        self.get_json("/api/weather", &[("location", location), ("units", units.as_str())])
            .await
    }

    #[instrument(skip(self))]
    async fn detect_location(&self) -> Result<LocationEnvelope> {
        self.get_json("/api/location", &[]).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_dropped() {
        let backend = HttpBackend::new("http://localhost:5000/", None).unwrap();
        assert_eq!(backend.base_url(), "http://localhost:5000");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(300);
        let short = truncate_body(&long);
        assert!(short.ends_with("..."));
        assert_eq!(short.chars().count(), 203);
        assert_eq!(truncate_body("ok"), "ok");
    }
}
