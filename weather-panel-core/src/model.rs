use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unit system requested from the backend. The panel never converts values itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial]
    }

    /// Label shown on the unit toggle button.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Units {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.trim().to_lowercase();

        match lower.as_str() {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            _ => Err(anyhow::anyhow!(
                "Unknown unit system '{value}'. Supported unit systems: metric, imperial."
            )),
        }
    }
}

/// One fetched weather result. Every value arrives pre-formatted by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub location: String,
    pub timestamp: String,
    pub coordinates: String,
    pub emoji: String,
    pub temperature: String,
    pub feels_like: String,
    pub temp_max: String,
    pub temp_min: String,
    pub humidity: String,
    pub pressure: String,
    pub wind_speed: String,
    pub wind_direction: String,
    pub visibility: String,
    pub cloudiness: String,
    pub sunrise: String,
    pub sunset: String,
    pub description: String,
}

/// Body of `GET /api/weather`.
///
/// Error responses from the backend carry only `error`, so `success` defaults to false.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<WeatherSnapshot>,
    #[serde(default)]
    pub error: Option<String>,
}

impl WeatherEnvelope {
    pub fn ok(data: WeatherSnapshot) -> Self {
        Self { success: true, data: Some(data), error: None }
    }

    pub fn failed(error: Option<String>) -> Self {
        Self { success: false, data: None, error }
    }
}

/// Body of `GET /api/location`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl LocationEnvelope {
    /// The detected location, if the backend reported one.
    pub fn detected(&self) -> Option<&str> {
        if !self.success {
            return None;
        }
        self.location.as_deref().filter(|l| !l.trim().is_empty())
    }
}

/// Lifecycle phase of the result area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Mutable state owned by the view controller.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub units: Units,
    pub snapshot: Option<WeatherSnapshot>,
    pub phase: DisplayPhase,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ViewState {
    pub fn new(units: Units) -> Self {
        Self { units, ..Self::default() }
    }
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        location: "London, GB".into(),
        timestamp: "2024-05-01 12:00:00".into(),
        coordinates: "51.51, -0.13".into(),
        emoji: "🌧️".into(),
        temperature: "12.3°C".into(),
        feels_like: "11.1°C".into(),
        temp_max: "14.0°C".into(),
        temp_min: "9.5°C".into(),
        humidity: "72%".into(),
        pressure: "1012 hPa".into(),
        wind_speed: "4.6 m/s".into(),
        wind_direction: "230°".into(),
        visibility: "10.0 km".into(),
        cloudiness: "90%".into(),
        sunrise: "05:32".into(),
        sunset: "20:21".into(),
        description: "Light Rain".into(),
    }
}
