//! Snapshot rendering.
//!
//! [`WeatherView`] shapes a snapshot into the fixed panel layout. The embedded
//! Tera templates turn that view model into markup ([`render_html`]) or terminal
//! text ([`render_text`]).

use serde::Serialize;
use std::{collections::HashMap, sync::LazyLock};
use tera::{Context, Tera, Value};
use thiserror::Error;

use crate::model::{Units, WeatherSnapshot};

const HTML_TEMPLATE: &str = "panel.html";
const TEXT_TEMPLATE: &str = "panel.txt";

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template compilation failed: {0}")]
    Compile(String),

    #[error("Template rendering failed: {0}")]
    Render(#[from] tera::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailCard {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitToggle {
    pub units: Units,
    pub label: &'static str,
    pub active: bool,
}

/// View model for one rendered snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherView {
    pub location: String,
    pub timestamp: String,
    pub coordinates: String,
    pub toggles: Vec<UnitToggle>,
    pub emoji: String,
    pub temperature: String,
    pub description: String,
    pub feels_like: String,
    pub high: String,
    pub low: String,
    pub details: Vec<DetailCard>,
}

impl WeatherView {
    pub fn new(snapshot: &WeatherSnapshot, units: Units) -> Self {
        let toggles = Units::all()
            .iter()
            .map(|u| UnitToggle { units: *u, label: u.toggle_label(), active: *u == units })
            .collect();

        let card = |icon, label, value: &String| DetailCard { icon, label, value: value.clone() };

        let details = vec![
            card("fa-tint", "Humidity", &snapshot.humidity),
            card("fa-thermometer-half", "Pressure", &snapshot.pressure),
            card("fa-wind", "Wind Speed", &snapshot.wind_speed),
            card("fa-compass", "Wind Direction", &snapshot.wind_direction),
            card("fa-eye", "Visibility", &snapshot.visibility),
            card("fa-cloud", "Cloudiness", &snapshot.cloudiness),
            card("fa-sun", "Sunrise", &snapshot.sunrise),
            card("fa-moon", "Sunset", &snapshot.sunset),
        ];

        Self {
            location: snapshot.location.clone(),
            timestamp: snapshot.timestamp.clone(),
            coordinates: snapshot.coordinates.clone(),
            toggles,
            emoji: snapshot.emoji.clone(),
            temperature: snapshot.temperature.clone(),
            description: snapshot.description.clone(),
            feels_like: snapshot.feels_like.clone(),
            high: snapshot.temp_max.clone(),
            low: snapshot.temp_min.clone(),
            details,
        }
    }
}

/// `snapshot × units → markup`.
pub fn render(snapshot: &WeatherSnapshot, units: Units) -> Result<String, RenderError> {
    render_html(&WeatherView::new(snapshot, units))
}

pub fn render_html(view: &WeatherView) -> Result<String, RenderError> {
    render_template(HTML_TEMPLATE, view)
}

pub fn render_text(view: &WeatherView) -> Result<String, RenderError> {
    render_template(TEXT_TEMPLATE, view)
}

fn render_template(name: &str, view: &WeatherView) -> Result<String, RenderError> {
    let tera = TEMPLATES.as_ref().map_err(|e| RenderError::Compile(e.clone()))?;
    let context = Context::from_serialize(view)?;
    Ok(tera.render(name, &context)?)
}

static TEMPLATES: LazyLock<Result<Tera, String>> =
    LazyLock::new(|| build_templates().map_err(|e| e.to_string()));

fn build_templates() -> tera::Result<Tera> {
    let mut tera = Tera::default();

    // Values are only ever placed in text nodes; `text` escapes what matters there.
    tera.autoescape_on(vec![]);
    tera.register_filter("text", text_filter);

    tera.add_raw_template(HTML_TEMPLATE, embedded::PANEL_HTML)?;
    tera.add_raw_template(TEXT_TEMPLATE, embedded::PANEL_TEXT)?;

    Ok(tera)
}

/// Escape `&`, `<` and `>` so a value can sit in an element's text.
fn text_filter(value: &Value, _args: &HashMap<String, Value>) -> tera::Result<Value> {
    let s = value.as_str().ok_or_else(|| tera::Error::msg("text requires a string"))?;
    Ok(Value::String(s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")))
}

mod embedded {
    pub const PANEL_HTML: &str = r#"<div class="weather-card">
  <div class="row">
    <div class="col-md-6">
      <h2><i class="fas fa-map-marker-alt"></i> {{ location | text }}</h2>
      <p class="mb-1"><i class="fas fa-clock"></i> {{ timestamp | text }}</p>
      <p><i class="fas fa-globe"></i> {{ coordinates | text }}</p>
    </div>
    <div class="col-md-6 text-end">
      <div class="units-toggle">
{%- for toggle in toggles %}
        <button data-units="{{ toggle.units }}" class="{% if toggle.active %}active{% endif %}">{{ toggle.label }}</button>
{%- endfor %}
      </div>
    </div>
  </div>
  <div class="text-center">
    <div class="weather-icon">{{ emoji | text }}</div>
    <div class="temperature-display">{{ temperature | text }}</div>
    <h4>{{ description | text }}</h4>
    <p>Feels like {{ feels_like | text }}</p>
    <p>High: {{ high | text }} | Low: {{ low | text }}</p>
  </div>
  <div class="weather-details">
{%- for card in details %}
    <div class="detail-card">
      <div class="detail-icon"><i class="fas {{ card.icon }}"></i></div>
      <h5>{{ card.label }}</h5>
      <p>{{ card.value | text }}</p>
    </div>
{%- endfor %}
  </div>
</div>
"#;

    pub const PANEL_TEXT: &str = r"📍 {{ location }}   {% for toggle in toggles %} {% if toggle.active %}[{{ toggle.label }}]{% else %} {{ toggle.label }} {% endif %}{% endfor %}
   {{ timestamp }}  ({{ coordinates }})

   {{ emoji }}  {{ temperature }}  {{ description }}
   Feels like {{ feels_like }}
   High: {{ high }} | Low: {{ low }}
{% for card in details %}
   {{ card.label }}: {{ card.value }}
{%- endfor %}
";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::sample_snapshot;

    fn assert_each_value_once(snapshot: &WeatherSnapshot, html: &str) {
        let values = [
            &snapshot.location,
            &snapshot.temperature,
            &snapshot.humidity,
            &snapshot.pressure,
            &snapshot.wind_speed,
            &snapshot.wind_direction,
            &snapshot.visibility,
            &snapshot.cloudiness,
            &snapshot.sunrise,
            &snapshot.sunset,
        ];
        for value in values {
            assert_eq!(html.matches(value.as_str()).count(), 1, "{value} should appear once");
        }
    }

    #[test]
    fn markup_contains_each_value_once() {
        let snapshot = sample_snapshot();
        let html = render(&snapshot, Units::Metric).unwrap();
        assert_each_value_once(&snapshot, &html);
    }

    #[test]
    fn apostrophes_and_slashes_render_literally() {
        let snapshot = WeatherSnapshot {
            location: "St. John's, CA".into(),
            wind_speed: "4.6 m/s".into(),
            ..sample_snapshot()
        };
        let html = render(&snapshot, Units::Metric).unwrap();

        assert_each_value_once(&snapshot, &html);
        assert!(html.contains("<p>4.6 m/s</p>"));
    }

    #[test]
    fn eight_cards_in_fixed_order() {
        let view = WeatherView::new(&sample_snapshot(), Units::Metric);
        let labels: Vec<_> = view.details.iter().map(|c| c.label).collect();
        assert_eq!(
            labels,
            [
                "Humidity",
                "Pressure",
                "Wind Speed",
                "Wind Direction",
                "Visibility",
                "Cloudiness",
                "Sunrise",
                "Sunset"
            ]
        );
        let html = render_html(&view).unwrap();
        assert_eq!(html.matches("class=\"detail-card\"").count(), 8);
        assert!(html.contains("<h5>Wind Direction</h5>"));
        assert!(html.contains("<i class=\"fas fa-moon\"></i>"));
    }

    #[test]
    fn active_toggle_follows_units() {
        let snapshot = sample_snapshot();

        let html = render(&snapshot, Units::Imperial).unwrap();
        assert!(html.contains("<button data-units=\"imperial\" class=\"active\">°F</button>"));
        assert!(html.contains("<button data-units=\"metric\" class=\"\">°C</button>"));

        let view = WeatherView::new(&snapshot, Units::Metric);
        let active: Vec<_> = view.toggles.iter().filter(|t| t.active).map(|t| t.units).collect();
        assert_eq!(active, vec![Units::Metric]);
    }

    #[test]
    fn values_are_not_converted() {
        let html = render(&sample_snapshot(), Units::Imperial).unwrap();
        assert!(html.contains("<div class=\"temperature-display\">12.3°C</div>"));
    }

    #[test]
    fn markup_characters_are_escaped() {
        let snapshot = WeatherSnapshot {
            location: "<b>Bad & Co</b>".into(),
            ..sample_snapshot()
        };
        let html = render(&snapshot, Units::Metric).unwrap();
        assert!(html.contains("&lt;b&gt;Bad &amp; Co&lt;/b&gt;"));
        assert!(!html.contains("<b>Bad"));
    }

    #[test]
    fn text_rendering_lists_all_cards() {
        let view = WeatherView::new(&sample_snapshot(), Units::Metric);
        let text = render_text(&view).unwrap();
        assert!(text.contains("📍 London, GB"));
        assert!(text.contains("[°C]"));
        assert!(!text.contains("[°F]"));
        for card in &view.details {
            assert!(text.contains(&format!("{}: {}", card.label, card.value)));
        }
    }

    #[test]
    fn text_filter_leaves_quotes_alone() {
        let out = text_filter(&Value::String("O'Hare \"A\" & <B>".into()), &HashMap::new()).unwrap();
        assert_eq!(out, Value::String("O'Hare \"A\" &amp; &lt;B&gt;".into()));
    }
}
