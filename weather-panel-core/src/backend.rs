use crate::{
    Config,
    backend::http::HttpBackend,
    model::{LocationEnvelope, Units, WeatherEnvelope},
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod http;

/// The weather backend the panel talks to.
///
/// Both calls return the decoded envelope. `Err` means the request or the body
/// decoding failed; a backend-reported failure is an `Ok` envelope with
/// `success == false`.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn weather(&self, location: &str, units: Units) -> anyhow::Result<WeatherEnvelope>;

    async fn detect_location(&self) -> anyhow::Result<LocationEnvelope>;
}

/// Construct the HTTP backend described by `config`.
pub fn backend_from_config(config: &Config) -> anyhow::Result<HttpBackend> {
    let base_url = config.backend_url();
    if base_url.trim().is_empty() {
        return Err(anyhow::anyhow!(
            "No backend URL configured.\n\
             Hint: run `weather-panel configure` or pass --backend-url."
        ));
    }

    HttpBackend::new(base_url, config.timeout())
}
