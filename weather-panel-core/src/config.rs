use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::model::Units;

pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000";

/// Environment variable that overrides the configured backend URL.
pub const BACKEND_URL_ENV: &str = "WEATHER_PANEL_BACKEND_URL";

/// Fixed UI delays, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// How long the error panel stays up.
    pub error_dismiss_ms: u64,
    /// Delay before the temperature emphasis effect.
    pub pulse_delay_ms: u64,
    /// Delay between a detected location and the weather fetch for it.
    pub detect_delay_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self { error_dismiss_ms: 5000, pulse_delay_ms: 500, detect_delay_ms: 500 }
    }
}

impl Timings {
    pub fn error_dismiss(&self) -> Duration {
        Duration::from_millis(self.error_dismiss_ms)
    }

    pub fn pulse_delay(&self) -> Duration {
        Duration::from_millis(self.pulse_delay_ms)
    }

    pub fn detect_delay(&self) -> Duration {
        Duration::from_millis(self.detect_delay_ms)
    }
}

/// What the view controller needs from the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerSettings {
    pub units: Units,
    pub timings: Timings,
    pub discard_stale_responses: bool,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Config::default().controller_settings()
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// backend_url = "http://localhost:5000"
/// units = "imperial"
///
/// [timings]
/// error_dismiss_ms = 5000
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub units: Units,
    /// Drop responses that arrive after a newer request was issued.
    pub discard_stale_responses: bool,
    /// Optional per-request timeout. Requests never time out when unset.
    pub timeout_secs: Option<u64>,
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            units: Units::default(),
            discard_stale_responses: true,
            timeout_secs: None,
            timings: Timings::default(),
        }
    }
}

impl Config {
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    pub fn set_backend_url(&mut self, url: &str) {
        self.backend_url = url.to_string();
    }

    pub fn set_units(&mut self, units: Units) {
        self.units = units;
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn controller_settings(&self) -> ControllerSettings {
        ControllerSettings {
            units: self.units,
            timings: self.timings,
            discard_stale_responses: self.discard_stale_responses,
        }
    }

    /// Apply an override for the backend URL, ignoring blank values.
    pub fn apply_backend_override(&mut self, value: Option<&str>) {
        if let Some(url) = value.map(str::trim).filter(|v| !v.is_empty()) {
            self.backend_url = url.to_string();
        }
    }

    /// Load config from disk (or defaults), then apply the environment override.
    pub fn load() -> Result<Self> {
        let mut cfg = Self::load_file()?;
        let env_url = std::env::var(BACKEND_URL_ENV).ok();
        cfg.apply_backend_override(env_url.as_deref());
        Ok(cfg)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(path)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-panel", "weather-panel")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_panel_behaviour() {
        let cfg = Config::default();
        assert_eq!(cfg.backend_url(), DEFAULT_BACKEND_URL);
        assert_eq!(cfg.units, Units::Metric);
        assert_eq!(cfg.timings.error_dismiss(), Duration::from_millis(5000));
        assert_eq!(cfg.timings.pulse_delay(), Duration::from_millis(500));
        assert_eq!(cfg.timings.detect_delay(), Duration::from_millis(500));
        assert!(cfg.discard_stale_responses);
        assert_eq!(cfg.timeout(), None);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml(
            r#"
            units = "imperial"

            [timings]
            error_dismiss_ms = 2000
            "#,
        )
        .expect("config should parse");

        assert_eq!(cfg.units, Units::Imperial);
        assert_eq!(cfg.timings.error_dismiss_ms, 2000);
        assert_eq!(cfg.timings.pulse_delay_ms, 500);
        assert_eq!(cfg.backend_url(), DEFAULT_BACKEND_URL);
    }

    #[test]
    fn unknown_units_fail_to_parse() {
        assert!(Config::from_toml(r#"units = "kelvin""#).is_err());
    }

    #[test]
    fn toml_roundtrip() {
        let mut cfg = Config::default();
        cfg.set_backend_url("http://example.test");
        cfg.set_units(Units::Imperial);
        cfg.timeout_secs = Some(15);

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.backend_url(), "http://example.test");
        assert_eq!(back.units, Units::Imperial);
        assert_eq!(back.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut cfg = Config::default();
        cfg.apply_backend_override(Some("  "));
        assert_eq!(cfg.backend_url(), DEFAULT_BACKEND_URL);

        cfg.apply_backend_override(Some(" http://other:9000 "));
        assert_eq!(cfg.backend_url(), "http://other:9000");

        let settings = cfg.controller_settings();
        assert!(settings.discard_stale_responses);
    }
}
